use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("Result channel closed after {received} of {expected} results.")]
    ChannelClosed { received: usize, expected: usize },

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Request for code {code} failed with Status: {status}")]
    BadStatus { code: u32, status: u16 },

    #[error("Batches are numbered from 1, got {0}")]
    InvalidBatch(usize),

    #[error("failed to open file {file:?}: {source}")]
    OpenFile {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to upload file {key}: {reason}")]
    Upload { key: String, reason: String },
}
