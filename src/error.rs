use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("failed to read signals: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse signals: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signals must be a JSON object with `rankings` and `popularity` maps")]
    Shape,
}
