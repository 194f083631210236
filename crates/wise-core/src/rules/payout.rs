//! Payout rule: constrains the current total payout of the targeted
//! content.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::VoteOrder;
use crate::rules::ValidationContext;

/// Decimal amount followed by a currency suffix, e.g. `"73.054 SBD"`.
static PAYOUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\.?[0-9]*) [A-Z]+$").expect("PAYOUT_RE is a compile-time constant")
});

/// Compare mode for [`PayoutRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMode {
    /// Payout must be strictly greater than the threshold.
    MoreThan,
    /// Payout must be strictly less than the threshold.
    LessThan,
    /// Payout must equal the threshold exactly.
    Equal,
}

impl PayoutMode {
    /// Wire representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoreThan => "more_than",
            Self::LessThan => "less_than",
            Self::Equal => "equal",
        }
    }
}

impl std::fmt::Display for PayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constrains the total payout of the content a vote order targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRule {
    /// How the payout is compared against the threshold.
    pub mode: PayoutMode,
    /// The threshold value, in the payout currency.
    pub value: f64,
}

/// Parse a payout string into its numeric value.
///
/// Accepts a decimal number followed by a single space and an uppercase
/// currency suffix; anything else is a parse failure.
pub fn parse_payout(raw: &str) -> Result<f64> {
    let caps = PAYOUT_RE
        .captures(raw)
        .ok_or_else(|| Error::Validation(format!("cannot parse payout (\"{raw}\")")))?;
    caps[1]
        .parse::<f64>()
        .map_err(|_| Error::Validation(format!("cannot parse payout (\"{raw}\")")))
}

impl PayoutRule {
    /// Build a payout rule.
    #[must_use]
    pub fn new(mode: PayoutMode, value: f64) -> Self {
        Self { mode, value }
    }

    /// Reject structurally defective thresholds before any comparison.
    pub(crate) fn validate_config(&self) -> Result<()> {
        if !self.value.is_finite() {
            return Err(Error::Validation(
                "payout rule: threshold is not a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate the targeted content's payout against this rule.
    pub async fn validate(
        &self,
        _order: &VoteOrder,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        self.validate_config()?;
        let content = context.content().await?;
        let payout = parse_payout(&content.total_payout)?;

        // Exact comparison in equal mode: payout amounts carry at most
        // three decimals on the wire.
        match self.mode {
            PayoutMode::Equal => {
                if payout != self.value {
                    return Err(Error::Validation(format!(
                        "payout rule: payout ({payout}) does not equal {}",
                        self.value
                    )));
                }
            }
            PayoutMode::MoreThan => {
                if payout <= self.value {
                    return Err(Error::Validation(format!(
                        "payout rule: payout ({payout}) is not more than {}",
                        self.value
                    )));
                }
            }
            PayoutMode::LessThan => {
                if payout >= self.value {
                    return Err(Error::Validation(format!(
                        "payout rule: payout ({payout}) is not less than {}",
                        self.value
                    )));
                }
            }
        }
        Ok(())
    }

    /// One-line human-readable description.
    #[must_use]
    pub fn description(&self) -> String {
        let comparison = match self.mode {
            PayoutMode::MoreThan => "is more than",
            PayoutMode::LessThan => "is less than",
            PayoutMode::Equal => "equals",
        };
        format!("payout of the content {comparison} {}", self.value)
    }
}
