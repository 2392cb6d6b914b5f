//! Threshold verdicts over classification results.
//!
//! A comment-spam model returns one category per label in label order. The
//! caller picks the category to watch (by position or by label) and flags the
//! message when that score is strictly above a threshold.

use serde::{Deserialize, Serialize};

use crate::category::{self, Category};

/// Default flagging threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Position of the spam class in a two-label (ham, spam) model.
pub const DEFAULT_SPAM_INDEX: usize = 1;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),
}

/// Which category a [`VerdictRule`] reads its score from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Position in the engine's result sequence.
    Index(usize),
    /// Category label.
    Label(String),
}

/// Outcome of applying a [`VerdictRule`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Flagged { score: f32 },
    Accepted { score: f32 },
}

impl Verdict {
    pub fn score(&self) -> f32 {
        match self {
            Self::Flagged { score } | Self::Accepted { score } => *score,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictRule {
    target: Target,
    threshold: f32,
}

impl Default for VerdictRule {
    fn default() -> Self {
        Self {
            target: Target::Index(DEFAULT_SPAM_INDEX),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl VerdictRule {
    pub fn new(target: Target, threshold: f32) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoreError::InvalidThreshold(threshold));
        }
        Ok(Self { target, threshold })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Apply the rule. Returns `None` when the target category is absent.
    pub fn judge(&self, categories: &[Category]) -> Option<Verdict> {
        let watched = match &self.target {
            Target::Index(i) => categories.get(*i),
            Target::Label(label) => category::find(categories, label),
        }?;

        let score = watched.score;
        if score > self.threshold {
            Some(Verdict::Flagged { score })
        } else {
            Some(Verdict::Accepted { score })
        }
    }
}
