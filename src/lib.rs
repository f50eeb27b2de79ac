//! Streaming MD5 / SHA-1 / SHA-256 / SHA-512 checksums over lists of files.

/// Use mimalloc as the global allocator for the binary and tests.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod hash;
