use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed usage record (row {row}, key '{key}'): {reason}")]
    MalformedRecord {
        row: usize,
        key: String,
        reason: String,
    },

    #[error("Usage dataset is empty: total key presses is zero")]
    EmptyDataset,

    #[error("Layout entry '{key}' is missing required attribute '{attribute}'")]
    MissingLayoutAttribute { key: String, attribute: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Render Error: {0}")]
    Render(String),
}

pub type HmResult<T> = Result<T, HeatmapError>;
