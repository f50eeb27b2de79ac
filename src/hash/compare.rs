use std::path::Path;

use super::batch::is_dir;
use super::core::{HashAlgorithm, hash_file, hex_encode};
use super::error::HashError;

/// Outcome of checking one file against a caller-supplied digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match {
        path: String,
    },
    Mismatch {
        path: String,
        actual: String,
        expected: String,
    },
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match { .. })
    }
}

/// Hash `path` and compare its lowercase hex digest with `reference`.
///
/// The comparison is case-sensitive, so an uppercase reference never matches.
pub fn compare_reference(
    path: &str,
    algo: HashAlgorithm,
    reference: &str,
) -> Result<Comparison, HashError> {
    if is_dir(Path::new(path)) {
        return Err(HashError::NotHashable {
            path: path.to_string(),
        });
    }

    let actual = hex_encode(&hash_file(algo, Path::new(path))?);
    if actual == reference {
        Ok(Comparison::Match {
            path: path.to_string(),
        })
    } else {
        Ok(Comparison::Mismatch {
            path: path.to_string(),
            actual,
            expected: reference.to_string(),
        })
    }
}
