pub mod io;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Reset SIGPIPE to default behavior (SIG_DFL) for GNU coreutils compatibility.
/// Rust sets SIGPIPE to SIG_IGN by default, so `hashsum ... | head` would
/// otherwise end in a broken-pipe error instead of exiting quietly.
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// GNU coreutils prints e.g. "No such file or directory" while Rust's
/// Display impl adds " (os error 2)".
pub fn io_error_msg(e: &std::io::Error) -> String {
    match e.raw_os_error() {
        Some(raw) => std::io::Error::from_raw_os_error(raw)
            .to_string()
            .replace(&format!(" (os error {})", raw), ""),
        None => e.to_string(),
    }
}

/// Pick the log filter: `RUST_LOG` wins, then `--verbose`, then warnings only.
pub fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    })
}

/// Install the global tracing subscriber. Logs go to stderr; stdout carries
/// only the digest listing.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(log_filter(verbose))
        .try_init();
}
