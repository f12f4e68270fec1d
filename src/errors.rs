// Application errors - wraps module errors and sorts them into user-facing categories

use serde::Serialize;

use crate::chat::ChatError;
use crate::config::ConfigError;
use crate::library::LibraryError;
use crate::llm::{LlmError, ModelConfigError};
use crate::profiles::{ParameterValidationError, ProfileError};
use crate::shortcuts::TriggerTableError;

/// How an error is presented: bad input, bad settings, local IO, or remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Validation,
    Io,
    Network,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Shortcut(#[from] TriggerTableError),
    #[error(transparent)]
    ModelConfig(#[from] ModelConfigError),
    #[error(transparent)]
    Validation(#[from] ParameterValidationError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Shortcut(_) | AppError::ModelConfig(_) => ErrorCategory::Input,
            AppError::Validation(_) => ErrorCategory::Validation,
            AppError::Profile(ProfileError::Validation(_)) => ErrorCategory::Validation,
            AppError::Profile(_) => ErrorCategory::Input,
            AppError::Library(e) => match e {
                LibraryError::InvalidToolParameters(_) => ErrorCategory::Validation,
                LibraryError::Io(_) | LibraryError::NotAFile(_) => ErrorCategory::Io,
                _ => ErrorCategory::Input,
            },
            AppError::Config(_) => ErrorCategory::Io,
            AppError::Chat(e) => match e {
                ChatError::ImageRead(_) | ChatError::FileRead(_) => ErrorCategory::Io,
                _ => ErrorCategory::Input,
            },
            AppError::Llm(e) => llm_category(e),
        }
    }
}

pub fn llm_category(error: &LlmError) -> ErrorCategory {
    match error {
        LlmError::MissingApiKey => ErrorCategory::Input,
        LlmError::Validation(_) => ErrorCategory::Validation,
        LlmError::Network(_) | LlmError::Status { .. } | LlmError::MalformedResponse(_) => {
            ErrorCategory::Network
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod tests;
