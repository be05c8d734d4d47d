//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, sheet, and data-table errors, and provides semantic
//! variants for argument validation and compositing failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sheet reader error: {0}")]
    Sheet(#[from] crate::io::SheetError),

    #[error("data table error: {0}")]
    Data(#[from] crate::io::DataError),

    #[error("unknown head sheet: {name}")]
    UnknownHead { name: String },

    #[error("unknown body sheet: {name}")]
    UnknownBody { name: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Compositing error: {0}")]
    Compositing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
