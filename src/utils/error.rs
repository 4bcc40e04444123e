use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Plist parse failure: {message}")]
    ParseFailure { message: String },

    #[error("No image frames found in plist")]
    EmptyContent,

    #[error("All {skipped} frames failed validation")]
    AllFramesInvalid { skipped: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Parse,
    Content,
    Output,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AtlasError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputNotFound { .. } => ErrorCategory::Input,
            Self::ParseFailure { .. } => ErrorCategory::Parse,
            Self::EmptyContent | Self::AllFramesInvalid { .. } => ErrorCategory::Content,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Content => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Parse | ErrorCategory::Config => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InputNotFound { path } => format!("Cannot find plist file: {}", path),
            Self::ParseFailure { .. } => {
                "The plist file is not well-formed and could not be decoded".to_string()
            }
            Self::EmptyContent => "The plist file defines no image frames".to_string(),
            Self::AllFramesInvalid { skipped } => format!(
                "None of the {} frames in the plist had usable geometry",
                skipped
            ),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(e) => format!("Could not render JSON output: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "Check the path passed on the command line",
            Self::ParseFailure { .. } => {
                "Re-export the atlas from the packer, or retry with --parse-mode tolerant"
            }
            Self::EmptyContent => {
                "Make sure the plist has a 'frames' dict with image-named keys (e.g. hero.png)"
            }
            Self::AllFramesInvalid { .. } => {
                "Check that frames carry textureRect, spriteSourceSize and spriteOffset strings"
            }
            Self::IoError(_) => "Check write permissions of the output directory",
            Self::SerializationError(_) => "Report this as a bug with the input plist attached",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the command-line flags or the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
