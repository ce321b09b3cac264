use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Site error: {message}")]
    Site { message: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
