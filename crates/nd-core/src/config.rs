use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::is_netdsl_whitespace;

/// Prefix marking the rest of a line as a comment.
pub const DEFAULT_COMMENT_PREFIX: &str = "//";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("comment prefix must not be empty")]
    EmptyCommentPrefix,
    #[error("comment prefix {prefix:?} contains whitespace and could never match a token")]
    WhitespaceInCommentPrefix { prefix: String },
}

/// Parser options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    /// A leading token starting with this prefix (ASCII case-insensitive)
    /// discards the rest of its line.
    pub comment_prefix: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }
}

impl ParseConfig {
    #[must_use]
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comment_prefix.is_empty() {
            return Err(ConfigError::EmptyCommentPrefix);
        }
        if self.comment_prefix.chars().any(is_netdsl_whitespace) {
            return Err(ConfigError::WhitespaceInCommentPrefix {
                prefix: self.comment_prefix.clone(),
            });
        }
        Ok(())
    }
}
