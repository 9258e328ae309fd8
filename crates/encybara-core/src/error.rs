use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0} (run `encybara init` first)")]
    ConfigNotFound(String),

    // Serialization
    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
