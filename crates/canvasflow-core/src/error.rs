pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("canvas document JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("node {id} has an invalid size {width}x{height} (must be finite and positive)")]
    InvalidNodeSize { id: String, width: f64, height: f64 },

    #[error("node {id} has a non-finite position ({x}, {y})")]
    NonFinitePosition { id: String, x: f64, y: f64 },
}
