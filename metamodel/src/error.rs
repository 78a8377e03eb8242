//! Error types of the metamodel crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::Identifier;
use crate::validation::ValidationFailures;

/// Whether a caller can carry on after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recoverability {
    /// The message can be shown to the user and the interaction continues.
    Recoverable,
    /// The interaction must be aborted.
    Fatal,
}

/// Where to find the translation of an error message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationContext {
    /// Translation context (usually the originating type or member).
    pub context: String,
    /// Untranslated message key.
    pub key: String,
}

/// Error raised by a domain object while one of its methods was invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvocationError {
    recoverability: Recoverability,
    message: String,
    translation: Option<TranslationContext>,
}

impl InvocationError {
    /// A user-presentable error; supporting methods that raise it veto the
    /// interaction with its message.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            recoverability: Recoverability::Recoverable,
            message: message.into(),
            translation: None,
        }
    }

    /// An error that aborts the interaction.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            recoverability: Recoverability::Fatal,
            message: message.into(),
            translation: None,
        }
    }

    /// Attaches translation metadata.
    #[must_use]
    pub fn with_translation(mut self, context: impl Into<String>, key: impl Into<String>) -> Self {
        self.translation = Some(TranslationContext {
            context: context.into(),
            key: key.into(),
        });
        self
    }

    /// Recoverable or fatal.
    #[must_use]
    pub fn recoverability(&self) -> Recoverability {
        self.recoverability
    }

    /// Returns true for recoverable errors.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.recoverability == Recoverability::Recoverable
    }

    /// The (untranslated) message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Translation metadata, if attached.
    #[must_use]
    pub fn translation(&self) -> Option<&TranslationContext> {
        self.translation.as_ref()
    }
}

/// Errors surfaced by the metamodel API.
#[derive(Debug, Error)]
pub enum MetaModelError {
    /// No specification for a logical type name.
    #[error("unknown logical type: {0}")]
    UnknownType(String),

    /// No member with the given identifier.
    #[error("unknown member: {0}")]
    UnknownMember(Identifier),

    /// The metamodel failed validation and the environment does not tolerate it.
    #[error("metamodel validation failed with {} failure(s)", .0.len())]
    Validation(ValidationFailures),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A descriptor document could not be parsed.
    #[error("invalid descriptor: {0}")]
    Descriptor(String),

    /// A domain object method failed fatally.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// Reading a configuration or descriptor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The metamodel could not be written as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetaModelError {
    /// Returns true if the caller may report the error and carry on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            MetaModelError::UnknownType(_) | MetaModelError::UnknownMember(_) => true,
            MetaModelError::Invocation(e) => e.is_recoverable(),
            MetaModelError::Validation(_)
            | MetaModelError::Config(_)
            | MetaModelError::Descriptor(_)
            | MetaModelError::Io(_)
            | MetaModelError::Json(_) => false,
        }
    }
}

/// Result alias for metamodel operations.
pub type Result<T> = std::result::Result<T, MetaModelError>;
