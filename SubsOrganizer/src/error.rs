//! Error types for `SubsOrganizer`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `SubsOrganizer` operations.
///
/// Run-level failures (unreadable artifact, bad column address, missing
/// converter binary) are returned as `Err`. Per-file and per-row failures are
/// recorded in a [`RunReport`](crate::report::RunReport) instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Corpus Errors ====================
    /// The reference-locale counterpart of a target file does not exist.
    #[error("reference file not found: {path}")]
    MissingReferenceFile {
        /// The expected reference path.
        path: PathBuf,
    },

    /// A structured message file could not be parsed.
    #[error("malformed message file {path}: {message}")]
    MalformedSourceFile {
        /// The offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The document has no `TextContents` container under its root.
    #[error("missing TextContents container")]
    MissingContainer,

    // ==================== Write-back Errors ====================
    /// The structured file addressed by a workbook row does not exist.
    #[error("message file not found: {path}")]
    MissingTargetFileOnWriteback {
        /// The reconstructed path.
        path: PathBuf,
    },

    /// The column reference has no usable letter part.
    #[error("unresolvable column address: {0:?}")]
    UnresolvableColumnAddress(String),

    /// The workbook could not be opened or read.
    #[error("cannot read workbook {path}: {message}")]
    ArtifactUnreadable {
        /// The workbook path.
        path: PathBuf,
        /// The underlying reader error.
        message: String,
    },

    // ==================== Workbook Errors ====================
    /// Building or serializing the XLSX workbook failed.
    #[error("workbook error: {0}")]
    Workbook(String),

    // ==================== Configuration Errors ====================
    /// The lookup configuration could not be loaded.
    #[error("invalid lookup configuration {path}: {message}")]
    Config {
        /// The configuration path.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    // ==================== External Converter Errors ====================
    /// The converter exited unsuccessfully for a chunk of files.
    #[error("converter failed ({status}) for {files} file(s)")]
    ExternalConverterFailure {
        /// Exit status description.
        status: String,
        /// Number of files in the failed invocation.
        files: usize,
    },

    /// The converter binary could not be started.
    #[error("converter binary not found: {path}")]
    ExternalConverterMissing {
        /// The converter path that was tried.
        path: PathBuf,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Workbook(err.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Workbook(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

/// A specialized Result type for `SubsOrganizer` operations.
pub type Result<T> = std::result::Result<T, Error>;
