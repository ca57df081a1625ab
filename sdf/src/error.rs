use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("render worker panicked")]
    WorkerPanicked,
}
