//! Centralized error handling for Aesop
//! One sum type covers every failure the core can surface; subsystems
//! return `crate::error::Result` and attach positions where they apply.

use std::path::PathBuf;
use thiserror::Error;

use crate::message::Level;

#[derive(Debug, Error)]
pub enum Error {
    /// Stdin is not a TTY; raw-mode editing is impossible
    #[error("stdin is not a terminal")]
    NotATerminal,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An edit position fell off a UTF-8 scalar boundary or out of range
    #[error("byte position {pos} is not on a character boundary")]
    InvalidBoundary { pos: usize },

    #[error("{}: file is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("{}", crate::constants::errors::MSG_NO_FILE_NAME)]
    NoFilepath,

    /// Quit refused because the buffer has unsaved changes
    #[error("{}", crate::constants::errors::MSG_UNSAVED_CHANGES)]
    Modified,

    #[error("{}", crate::constants::history::ALREADY_OLDEST)]
    AtRoot,

    #[error("{}", crate::constants::history::ALREADY_NEWEST)]
    NoRedo,

    #[error("allocation failed")]
    AllocationFailed,
}

impl Error {
    /// Message-queue level used when the error is surfaced interactively
    pub fn level(&self) -> Level {
        match self {
            Error::AtRoot | Error::NoRedo => Level::Info,
            Error::Modified | Error::NoFilepath => Level::Warning,
            _ => Level::Error,
        }
    }

    /// Errors that must abort the process rather than be reported in-editor
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::NotATerminal | Error::AllocationFailed)
    }
}

/// Result alias for Aesop operations
pub type Result<T> = std::result::Result<T, Error>;
