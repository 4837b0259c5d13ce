#![allow(dead_code)]

/// Routes the crate's `log` records to the test output. Safe to call from
/// every test; only the first call installs the logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `len` bytes counting up and wrapping at 256.
#[must_use]
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}
