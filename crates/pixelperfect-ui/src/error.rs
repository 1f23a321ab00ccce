use pixelperfect_text::TextError;
use taffy::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("layout for node {0:?} read before it was computed (or after it went stale)")]
    LayoutNotComputed(NodeId),
    #[error("node {node:?} ({widget}) has no measure function and no explicit size")]
    Unmeasurable { node: NodeId, widget: &'static str },
    #[error("node {0:?} is not in this tree")]
    UnknownNode(NodeId),
    #[error("layout engine: {0}")]
    Taffy(#[from] taffy::TaffyError),
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("icon: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Core(#[from] pixelperfect_core::CoreError),
}
