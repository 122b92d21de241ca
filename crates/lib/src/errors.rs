use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the extractor.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("{0}")]
    ImageFetch(String),
    #[error("URL did not return an image (Content-Type: {0})")]
    NotAnImage(String),
    #[error("Failed to read image file {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Please provide a valid image before running.")]
    MissingImage,
    #[error("Failed to send request to OpenAI API: {0}")]
    ApiRequest(reqwest::Error),
    #[error("HTTP {status} {message}")]
    Api { status: u16, message: String },
    #[error("Failed to deserialize OpenAI API response: {0}")]
    Deserialization(reqwest::Error),
    #[error("OpenAI API key is required.")]
    MissingApiKey,
}
