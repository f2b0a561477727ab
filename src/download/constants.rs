//! Constants for the download module.

/// Default HTTP connect timeout for media downloads (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP total timeout for media downloads (5 minutes for large video).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Local name used when a reference name sanitizes to nothing usable.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// Progress message emitted once a batch has finished.
pub const BATCH_COMPLETE_MESSAGE: &str = "Download complete";
