use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("font `{0}` is not loaded")]
    FontNotFound(String),
    #[error("BDF parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
