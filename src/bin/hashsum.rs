use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use hashsum::common;
use hashsum::hash::{self, BatchConfig, Comparison, ErrorPolicy, HashAlgorithm, HashEvent};

const TOOL_NAME: &str = "hashsum";

#[derive(Parser)]
#[command(
    name = "hashsum",
    version,
    about = "Compute MD5, SHA1, SHA256 or SHA512 checksums of files"
)]
struct Cli {
    /// Hash algorithm: md5, sha1, sha256, sha512
    #[arg(short = 'a', value_name = "ALGORITHM", default_value = "sha256")]
    algorithm: String,

    /// Hash to compare the file to (single file only)
    #[arg(short = 'r', value_name = "HASH")]
    reference: Option<String>,

    /// Output file for computed hashes (overwritten if present)
    #[arg(short = 'o', value_name = "OUTFILE")]
    output: Option<PathBuf>,

    /// Report unreadable files and continue instead of aborting
    #[arg(short = 'k', long = "keep-going")]
    keep_going: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Files to process (UTF-8 paths)
    files: Vec<String>,
}

fn main() {
    common::reset_sigpipe();
    let cli = Cli::parse();
    common::init_logging(cli.verbose);
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    if cli.files.is_empty() {
        let prog = std::env::args().next().unwrap_or_else(|| TOOL_NAME.to_string());
        let hint = writeln!(
            io::stdout(),
            "No file(s) specified. Use {} -h to get usage information.",
            prog
        );
        if let Err(e) = hint {
            report_stdout_error(&e);
            return 1;
        }
        return 0;
    }

    let algo: HashAlgorithm = match cli.algorithm.parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", TOOL_NAME, e);
            return 2;
        }
    };

    // An empty reference counts as not given.
    if let Some(reference) = cli.reference.as_deref().filter(|r| !r.is_empty()) {
        return run_compare(cli, algo, reference);
    }

    run_batch(cli, algo)
}

fn run_compare(cli: &Cli, algo: HashAlgorithm, reference: &str) -> i32 {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let (printed, code) = compare_and_print(&mut out, cli, algo, reference);
    if let Err(e) = printed.and_then(|()| out.flush()) {
        report_stdout_error(&e);
        return 1;
    }
    code
}

fn compare_and_print(
    out: &mut impl Write,
    cli: &Cli,
    algo: HashAlgorithm,
    reference: &str,
) -> (io::Result<()>, i32) {
    if cli.files.len() > 1 {
        if let Err(e) = writeln!(
            out,
            "Multiple files provided. Selecting first file for hash comparison."
        ) {
            return (Err(e), 1);
        }
    }

    match hash::compare_reference(&cli.files[0], algo, reference) {
        Ok(Comparison::Match { path }) => (writeln!(out, "{}  ok", path), 0),
        Ok(Comparison::Mismatch {
            path,
            actual,
            expected,
        }) => (
            writeln!(
                out,
                "{}  mismatching hashes\n{}  (expected)\n{}  (computed)",
                path, expected, actual
            ),
            1,
        ),
        Err(e) => {
            eprintln!("{}: {}", TOOL_NAME, e);
            (Ok(()), 1)
        }
    }
}

fn run_batch(cli: &Cli, algo: HashAlgorithm) -> i32 {
    let config = BatchConfig {
        algorithm: algo,
        policy: if cli.keep_going {
            ErrorPolicy::BestEffort
        } else {
            ErrorPolicy::FailFast
        },
    };

    let mut had_error = false;
    let digests = match hash::compute_digests_with(&cli.files, &config, |event| {
        had_error |= event.is_failure();
        report_event(&event);
    }) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}: {}", TOOL_NAME, e);
            return 1;
        }
    };

    // Everything goes through one BufWriter, so failures surface on flush.
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if let Err(e) = hash::print_digests(&mut out, &digests).and_then(|()| out.flush()) {
        report_stdout_error(&e);
        had_error = true;
    }

    if let Some(path) = &cli.output {
        let summary = hash::write_summary(digests.len(), path);
        if let Err(e) = writeln!(out, "{}", summary).and_then(|()| out.flush()) {
            report_stdout_error(&e);
            had_error = true;
        }
        if let Err(e) = hash::write_digest_file(&digests, path) {
            eprintln!("{}: {}", TOOL_NAME, e);
            had_error = true;
        }
    }

    if had_error { 1 } else { 0 }
}

fn report_stdout_error(e: &io::Error) {
    eprintln!("{}: write error: {}", TOOL_NAME, common::io_error_msg(e));
}

fn report_event(event: &HashEvent) {
    match event {
        HashEvent::SkippedDirectory { path } => {
            eprintln!("{}: '{}' is a directory (not hashable).", TOOL_NAME, path);
        }
        HashEvent::OpenFailed { error, .. } | HashEvent::ReadFailed { error, .. } => {
            eprintln!("{}: {}", TOOL_NAME, error);
        }
    }
}
