use std::io;

use thiserror::Error;

/// Everything that can go wrong while hashing, comparing or writing digests.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("unknown hash algorithm '{0}'. Supports only md5, sha1, sha256 and sha512.")]
    UnknownAlgorithm(String),

    #[error("'{path}' is a directory (not hashable).")]
    NotHashable { path: String },

    #[error("{path}: {}", crate::common::io_error_msg(.source))]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {}", crate::common::io_error_msg(.source))]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {}", crate::common::io_error_msg(.source))]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: improperly formatted digest line")]
    MalformedLine { line: usize },
}

impl HashError {
    /// True for failures tied to one input file, which a best-effort batch may skip.
    pub fn is_per_file(&self) -> bool {
        matches!(self, HashError::Open { .. } | HashError::Read { .. })
    }
}
