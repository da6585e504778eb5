use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("access token acquisition failed: {0}")]
    Auth(String),

    #[error("device api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("device response is missing `{0}`")]
    MissingField(String),

    #[error("device `{0}` not found in enterprise")]
    DeviceNotFound(String),

    #[error("http transport error: {0}")]
    Transport(String),

    #[error("{} holds no value", .0.display())]
    EmptyValueFile(PathBuf),

    #[error("{} holds `{value}`, which is not a temperature", .path.display())]
    InvalidSetpoint { path: PathBuf, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
