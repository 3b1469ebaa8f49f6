use std::path::PathBuf;

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Outbound HTTP failure, after the retry budget is spent
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    /// Ground-truth table could not be read
    #[error("ground truth error: {0}")]
    GroundTruth(#[from] GroundTruthError),
    /// Catalog API error
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// File system error
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A report could not be serialized
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outbound HTTP errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    /// Network-level failure on the final attempt
    #[error("request to {endpoint} failed after {attempts} attempt(s): {source}")]
    Transport {
        endpoint: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    /// Non-200 status on the final attempt
    #[error("request to {endpoint} returned status {status} after {attempts} attempt(s)")]
    Status {
        endpoint: String,
        status: u16,
        attempts: u32,
    },
    /// The response body could not be read
    #[error("failed to read response body from {endpoint}: {source}")]
    Body {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body is not the expected JSON
    #[error("failed to decode JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    /// Number of attempts made before the error surfaced, when known
    pub fn attempts(&self) -> Option<u32> {
        match self {
            HttpError::Transport { attempts, .. } | HttpError::Status { attempts, .. } => {
                Some(*attempts)
            }
            _ => None,
        }
    }
}

/// Two-phase resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The initiate response carried no session token
    #[error("upload failed: {reason}")]
    Upload { reason: String },
    /// The upload envelope could not be parsed
    #[error("malformed upload envelope: {reason}")]
    Parse { reason: String },
    /// The result page has no recognizable label
    #[error("no match found in result page")]
    NoMatch,
    /// The resolver pattern failed to compile
    #[error("invalid result pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// File name parsing errors
#[derive(Debug, Error)]
pub enum FileNameError {
    #[error("file name '{file_name}' does not match name_number.jpg")]
    Mismatch { file_name: String },
    #[error("path {path} has no usable file name")]
    NoFileName { path: PathBuf },
    #[error("invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Ground-truth table errors
#[derive(Debug, Error)]
pub enum GroundTruthError {
    #[error("failed to read ground truth table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
}

/// Catalog API errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The readiness check never reported a truthy status
    #[error("catalog API not ready after {attempts} check(s)")]
    NotReady { attempts: u32 },
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// File system errors
#[derive(Debug, Error)]
pub enum FileError {
    #[error("directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value of the wrong type
    #[error("environment variable {var_name}: '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("failed to read config file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Convenience constructors ==========

impl AppError {
    /// File read failure
    pub fn file_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// File write failure
    pub fn file_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// Missing directory
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        AppError::File(FileError::DirectoryNotFound { path: path.into() })
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
