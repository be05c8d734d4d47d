use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid offset parameter: {offset}. Must be two comma-separated integers, e.g. \"0,-2\"")]
    InvalidOffset { offset: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sheet reader error: {0}")]
    Sheet(#[from] fesprite::SheetError),

    #[error("data table error: {0}")]
    Data(#[from] fesprite::DataError),
}
