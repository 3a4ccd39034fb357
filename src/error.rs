// One error type for the whole library.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Backing storage for a pixel buffer could not be obtained.
    #[error("cannot allocate a {width}x{height} pixel buffer")]
    Allocation { width: usize, height: usize },

    /// Width, height or stride do not describe a usable raster.
    #[error("invalid pixel buffer layout: {0}")]
    InvalidLayout(String),

    /// A saved property could not be applied (unknown position name etc).
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A blur job was superseded before it finished.
    #[error("blur job cancelled")]
    Cancelled,

    /// The blur worker thread could not be started
    #[error("blur worker error: {0}")]
    Worker(String),

    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Encoding or writing an exported image failed
    #[error("image export error: {0}")]
    Image(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
