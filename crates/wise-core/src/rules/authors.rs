//! Authors rule: constrains the author of the targeted content.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::VoteOrder;
use crate::rules::ValidationContext;

/// Matching mode for [`AuthorsRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorsMode {
    /// The content's author must be on the configured list.
    Allow,
    /// The content's author must not be on the configured list.
    Deny,
}

impl AuthorsMode {
    /// Wire representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl std::fmt::Display for AuthorsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constrains the author of the content a vote order targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorsRule {
    /// Whether the list is an allow list or a deny list.
    pub mode: AuthorsMode,
    /// The configured author accounts.
    pub authors: Vec<String>,
}

impl AuthorsRule {
    /// Build an authors rule.
    #[must_use]
    pub fn new(mode: AuthorsMode, authors: Vec<String>) -> Self {
        Self { mode, authors }
    }

    /// Validate the targeted content's author against this rule.
    pub async fn validate(
        &self,
        _order: &VoteOrder,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        let content = context.content().await?;
        let listed = self.authors.contains(&content.author);

        match self.mode {
            AuthorsMode::Allow => {
                if listed {
                    Ok(())
                } else {
                    Err(Error::Validation(format!(
                        "author \"{}\" of the content is not on the allow list",
                        content.author
                    )))
                }
            }
            AuthorsMode::Deny => {
                if listed {
                    Err(Error::Validation(format!(
                        "author \"{}\" of the content is on the deny list",
                        content.author
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// One-line human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        match self.mode {
            AuthorsMode::Allow => format!("allow only authors: {}", self.authors.join(", ")),
            AuthorsMode::Deny => format!("deny authors: {}", self.authors.join(", ")),
        }
    }
}
