use thiserror::Error;

#[derive(Error, Debug)]
pub enum GladiatorError {
    #[error("A fighter cannot battle itself")]
    SelfBattle,

    #[error("Fighter not found: {0}")]
    FighterNotFound(String),

    #[error("Invalid fighter: {0}")]
    InvalidFighter(String),

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GladiatorError>;
