//! Human-readable and JSON rendering of classification results.

use serde::Serialize;
use textclass_core::{Category, Verdict};

const BAR_WIDTH: usize = 20;

/// One classified input, as emitted by `classify --json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub text: &'a str,
    pub categories: &'a [Category],
    pub verdict: Option<Verdict>,
    /// RFC 3339 timestamp.
    pub classified_at: String,
}

impl<'a> Report<'a> {
    pub fn new(text: &'a str, categories: &'a [Category], verdict: Option<Verdict>) -> Self {
        Self {
            text,
            categories,
            verdict,
            classified_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Render categories as an aligned table in engine order.
pub fn render_categories(categories: &[Category]) -> String {
    let width = categories
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for c in categories {
        let filled = (c.score.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
        out.push_str(&format!(
            "  {:<width$}  {:.4}  {}\n",
            c.label,
            c.score,
            "#".repeat(filled)
        ));
    }
    out
}

pub fn verdict_message(verdict: Option<Verdict>) -> String {
    match verdict {
        Some(Verdict::Flagged { score }) => format!(
            "Your message was detected as spam with a score of {score} and not sent!"
        ),
        Some(Verdict::Accepted { score }) => format!("Message sent! \nSpam score was:{score}"),
        None => "No verdict: the watched category is not in the model output".to_string(),
    }
}
