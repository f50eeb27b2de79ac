use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::batch::FileDigestMap;
use super::core::{hex_decode, hex_encode};
use super::error::HashError;

/// Check if a filename needs escaping (contains backslash, newline or CR).
#[inline]
fn needs_escape(name: &str) -> bool {
    name.bytes().any(|b| matches!(b, b'\\' | b'\n' | b'\r'))
}

/// Escape a filename: `\` becomes `\\`, newline `\n`, carriage return `\r`.
fn escape_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_filename`]. Unknown escapes are rejected.
fn unescape_filename(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}

/// Write one listing line: "hash  filename\n"
///
/// Names containing a backslash, newline or CR are escaped and the line gets
/// a leading `\`, the same convention GNU md5sum uses.
pub fn print_hash(out: &mut impl Write, digest: &[u8], filename: &str) -> io::Result<()> {
    if needs_escape(filename) {
        writeln!(
            out,
            "\\{}  {}",
            hex_encode(digest),
            escape_filename(filename)
        )
    } else {
        writeln!(out, "{}  {}", hex_encode(digest), filename)
    }
}

/// Write the whole map as listing lines, in map order.
pub fn print_digests(out: &mut impl Write, digests: &FileDigestMap) -> io::Result<()> {
    for (name, digest) in digests {
        print_hash(out, digest, name)?;
    }
    Ok(())
}

/// Save the map to `path` as listing lines. Any existing file is replaced.
/// Returns the number of lines written.
pub fn write_digest_file(digests: &FileDigestMap, path: &Path) -> Result<usize, HashError> {
    let write_err = |source| HashError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    print_digests(&mut out, digests).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    info!(path = %path.display(), count = digests.len(), "wrote digest listing");
    Ok(digests.len())
}

/// Parse a listing line "hash  filename" (or the escaped "\\hash  filename")
/// into digest bytes and filename. The filename is everything after the
/// first two-space separator, so it may itself contain spaces.
pub fn parse_digest_line(line: &str) -> Option<(Vec<u8>, Cow<'_, str>)> {
    let (escaped, line) = match line.strip_prefix('\\') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let (hex, name) = line.split_once("  ")?;
    if hex.is_empty() || name.is_empty() {
        return None;
    }
    let name = if escaped {
        Cow::Owned(unescape_filename(name)?)
    } else {
        Cow::Borrowed(name)
    };
    Some((hex_decode(hex)?, name))
}

/// Read a listing back into a map. Blank lines are ignored, and a trailing
/// CR from CRLF line endings is dropped (a CR in a name is always escaped).
pub fn read_digest_listing<R: BufRead>(reader: R) -> Result<FileDigestMap, HashError> {
    let mut digests = FileDigestMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| HashError::Read {
            path: "digest listing".to_string(),
            source,
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }
        let (digest, name) =
            parse_digest_line(line).ok_or(HashError::MalformedLine { line: idx + 1 })?;
        digests.insert(name.into_owned(), digest);
    }
    Ok(digests)
}

/// "Write 1 filehash to ..." vs "Write 3 filehashes to ..."
pub fn write_summary(count: usize, path: &Path) -> String {
    let postfix = if count == 1 { "" } else { "es" };
    format!("Write {} filehash{} to '{}'", count, postfix, path.display())
}
