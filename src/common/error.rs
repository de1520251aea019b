use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanyError {
    #[error("Unsupported file format '{extension}'. Use CSV or Excel (.xlsx, .xls)")]
    UnsupportedFormat { extension: String },

    #[error("Failed to decode {format} file: {message}")]
    Decode { format: String, message: String },

    #[error("Company not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompanyError {
    pub fn decode(format: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CompanyError::Decode {
            format: format.into(),
            message: err.to_string(),
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompanyError::UnsupportedFormat { .. } => "unsupported_format",
            CompanyError::Decode { .. } => "decode",
            CompanyError::NotFound(_) => "not_found",
            CompanyError::Io(_) => "io",
            CompanyError::Toml(_) => "toml",
            CompanyError::Config(_) => "config",
            CompanyError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, CompanyError>;
