use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CounterError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("line {line}: {msg}")]
    Command { line: usize, msg: String },
    #[error("counter still busy after {0} ms")]
    Timeout(u64),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing renderer")]
    MissingRenderer,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
