use easel_surface::SurfaceCreationError;

/// A failure reported by a platform backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("platform not supported: {0}")]
    Unsupported(String),

    #[error("could not connect to the display: {0}")]
    Connection(String),

    #[error("native window creation failed: {0}")]
    WindowCreation(String),

    #[error("could not present frame: {0}")]
    Present(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("could not spawn the dispatcher thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("the dispatcher thread exited before connecting")]
    DispatcherExited,
}

#[derive(Debug, thiserror::Error)]
pub enum WindowCreationError {
    #[error("window size {width}x{height} is below the {min_width}x{min_height} minimum")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("could not create the root surface: {0}")]
    Surface(#[from] SurfaceCreationError),

    #[error("the dispatcher thread is no longer running")]
    DispatcherUnavailable,

    #[error("scenes cannot be created from the dispatcher thread")]
    OnDispatcherThread,
}
