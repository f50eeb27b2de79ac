mod batch;
mod compare;
mod core;
mod error;
mod output;


pub use self::batch::{
    BatchConfig, BatchReport, ErrorPolicy, FileDigestMap, HashEvent, calculate_hashes,
    compute_digests, compute_digests_with, is_dir,
};
pub use self::compare::{Comparison, compare_reference};
pub use self::core::{HashAlgorithm, hash_bytes, hash_file, hash_reader, hex_decode, hex_encode};
pub use self::error::HashError;
pub use self::output::{
    parse_digest_line, print_digests, print_hash, read_digest_listing, write_digest_file,
    write_summary,
};
