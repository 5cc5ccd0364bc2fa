#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no canvas: surface `{0}` is missing or not drawable")]
    InvalidSurface(String),
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("window error: {0}")]
    Window(#[from] iced::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
