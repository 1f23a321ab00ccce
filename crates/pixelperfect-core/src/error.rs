#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error("buffer of {width}x{height} pixels does not fit in memory")]
    TooLarge { width: u32, height: u32 },
}
