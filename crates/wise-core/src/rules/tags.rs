//! Tags rule: constrains the tag list of the targeted content.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::VoteOrder;
use crate::rules::ValidationContext;

/// Matching mode for [`TagsRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagsMode {
    /// Every content tag must be on the configured list.
    Allow,
    /// No content tag may be on the configured list.
    Deny,
    /// Every configured tag must be present on the content.
    Require,
    /// At least one configured tag must be present on the content.
    Any,
}

impl TagsMode {
    /// Wire representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Require => "require",
            Self::Any => "any",
        }
    }
}

impl std::fmt::Display for TagsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constrains the tags of the content a vote order targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsRule {
    /// How the configured tags are matched against the content's tags.
    pub mode: TagsMode,
    /// The configured tag list.
    pub tags: Vec<String>,
}

impl TagsRule {
    /// Build a tags rule.
    #[must_use]
    pub fn new(mode: TagsMode, tags: Vec<String>) -> Self {
        Self { mode, tags }
    }

    /// Validate the targeted content's tags against this rule.
    pub async fn validate(
        &self,
        _order: &VoteOrder,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        let content = context.content().await?;

        match self.mode {
            TagsMode::Allow => {
                for tag in &content.tags {
                    if !self.tags.contains(tag) {
                        return Err(Error::Validation(format!(
                            "tag \"{}\" is not on the allowed tags list [{}]",
                            tag,
                            self.tags.join(", ")
                        )));
                    }
                }
                Ok(())
            }
            TagsMode::Deny => {
                for tag in &content.tags {
                    if self.tags.contains(tag) {
                        return Err(Error::Validation(format!(
                            "tag \"{}\" is on the denied tags list [{}]",
                            tag,
                            self.tags.join(", ")
                        )));
                    }
                }
                Ok(())
            }
            TagsMode::Require => {
                for tag in &self.tags {
                    if !content.tags.contains(tag) {
                        return Err(Error::Validation(format!(
                            "the content tags [{}] do not include required tag \"{}\"",
                            content.tags.join(", "),
                            tag
                        )));
                    }
                }
                Ok(())
            }
            TagsMode::Any => {
                if self.tags.iter().any(|tag| content.tags.contains(tag)) {
                    Ok(())
                } else {
                    Err(Error::Validation(format!(
                        "none of the content tags [{}] is on the \"any\" tags list [{}]",
                        content.tags.join(", "),
                        self.tags.join(", ")
                    )))
                }
            }
        }
    }

    /// One-line human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        let tags = self.tags.join(", ");
        match self.mode {
            TagsMode::Allow => format!("allow only tags: {tags}"),
            TagsMode::Deny => format!("deny tags: {tags}"),
            TagsMode::Require => format!("require all of tags: {tags}"),
            TagsMode::Any => format!("require at least one of tags: {tags}"),
        }
    }
}
