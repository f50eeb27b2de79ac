use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::core::{HashAlgorithm, hash_file};
use super::error::HashError;

/// Path as given by the caller mapped to its raw digest bytes.
///
/// Ordered by path so listings are reproducible.
pub type FileDigestMap = BTreeMap<String, Vec<u8>>;

/// How open and read failures inside a batch are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole batch on the first unreadable file.
    #[default]
    FailFast,
    /// Record the failure as an event and continue with the next path.
    BestEffort,
}

/// Configuration for a hashing batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchConfig {
    pub algorithm: HashAlgorithm,
    pub policy: ErrorPolicy,
}

/// Something noteworthy that happened to one path during a batch.
/// The caller decides how to render these.
#[derive(Debug)]
pub enum HashEvent {
    SkippedDirectory { path: String },
    OpenFailed { path: String, error: HashError },
    ReadFailed { path: String, error: HashError },
}

impl HashEvent {
    pub fn path(&self) -> &str {
        match self {
            HashEvent::SkippedDirectory { path }
            | HashEvent::OpenFailed { path, .. }
            | HashEvent::ReadFailed { path, .. } => path,
        }
    }

    /// Directory skips are expected; open/read failures mean the run was incomplete.
    pub fn is_failure(&self) -> bool {
        !matches!(self, HashEvent::SkippedDirectory { .. })
    }
}

/// Result of one batch: the digests plus everything that was skipped.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub digests: FileDigestMap,
    pub events: Vec<HashEvent>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.events.iter().any(HashEvent::is_failure)
    }
}

/// Check if a path is a directory. Unreadable metadata counts as "not a directory"
/// so that the subsequent open reports the real error.
pub fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Hash every path in input order, handing each [`HashEvent`] to `on_event`
/// as soon as it happens.
///
/// Directories are skipped with a [`HashEvent::SkippedDirectory`]. Open and read
/// failures either abort the batch or become events, depending on
/// `config.policy`. Each file gets its own freshly initialized digest.
pub fn compute_digests_with<S, F>(
    paths: &[S],
    config: &BatchConfig,
    mut on_event: F,
) -> Result<FileDigestMap, HashError>
where
    S: AsRef<str>,
    F: FnMut(HashEvent),
{
    let mut digests = FileDigestMap::new();

    for path in paths {
        let path = path.as_ref();
        if is_dir(Path::new(path)) {
            debug!(path, "skipping directory");
            on_event(HashEvent::SkippedDirectory {
                path: path.to_string(),
            });
            continue;
        }

        match hash_file(config.algorithm, Path::new(path)) {
            Ok(digest) => {
                debug!(path, algorithm = %config.algorithm, "hashed file");
                digests.insert(path.to_string(), digest);
            }
            Err(err) if err.is_per_file() && config.policy == ErrorPolicy::BestEffort => {
                debug!(path, error = %err, "continuing past unreadable file");
                let path = path.to_string();
                on_event(if matches!(err, HashError::Open { .. }) {
                    HashEvent::OpenFailed { path, error: err }
                } else {
                    HashEvent::ReadFailed { path, error: err }
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(digests)
}

/// Hash every path and collect the digests together with all events.
pub fn compute_digests<S: AsRef<str>>(
    paths: &[S],
    config: &BatchConfig,
) -> Result<BatchReport, HashError> {
    let mut events = Vec::new();
    let digests = compute_digests_with(paths, config, |event| events.push(event))?;
    Ok(BatchReport { digests, events })
}

/// Same as [`compute_digests`] with the algorithm picked by name and the
/// default fail-fast policy. An unknown name is an error, never an empty map.
pub fn calculate_hashes<S: AsRef<str>>(
    paths: &[S],
    algorithm: &str,
) -> Result<BatchReport, HashError> {
    let config = BatchConfig {
        algorithm: algorithm.parse()?,
        ..BatchConfig::default()
    };
    compute_digests(paths, &config)
}
