//! Error taxonomy shared by the bitmap pipeline, the heap guard and buttons

use std::io;
use thiserror::Error;

/// Numeric error codes as reported by the device firmware
///
/// `None` has no `Error` counterpart; a successful call is `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    None = 0,
    OutOfMemory = 1,
    NotInitialized = 2,
    CantOpenFile = 3,
    UnrecognizedFileFormat = 4,
    UnexpectedColorMaskFormat = 5,
    UnexpectedColorSpaceType = 6,
    NoBitMaskInfo = 7,
    Io = 8,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("not enough memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    #[error("bitmap is not initialized")]
    NotInitialized,

    #[error("could not open file {path}: {source}")]
    CantOpenFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unrecognized file format")]
    UnrecognizedFileFormat,

    #[error("unexpected color mask format, pixel data must be BGRA")]
    UnexpectedColorMaskFormat,

    #[error("unexpected color space type, expected sRGB")]
    UnexpectedColorSpaceType,

    #[error("file does not contain bit mask information")]
    NoBitMaskInfo,

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Error::NotInitialized => ErrorKind::NotInitialized,
            Error::CantOpenFile { .. } => ErrorKind::CantOpenFile,
            Error::UnrecognizedFileFormat => ErrorKind::UnrecognizedFileFormat,
            Error::UnexpectedColorMaskFormat => ErrorKind::UnexpectedColorMaskFormat,
            Error::UnexpectedColorSpaceType => ErrorKind::UnexpectedColorSpaceType,
            Error::NoBitMaskInfo => ErrorKind::NoBitMaskInfo,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Numeric code for serial-style logging
    pub fn code(&self) -> u8 {
        self.kind() as u8
    }
}

pub type Result<T> = std::result::Result<T, Error>;
