use pixelperfect_ui::UiError;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("invalid {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("display sink: {0}")]
    Sink(#[from] std::io::Error),
    #[error("cannot start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Ui(#[from] UiError),
}
