use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidCanvas { width: i32, height: i32 },

    #[error("invalid option: {0}")]
    Validation(String),

    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
}

impl ChartError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry(message.into())
    }

    pub(crate) fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
