//! Keyword-counting engine used by the unit tests.
//!
//! Model file format: one `label: keyword keyword ...` line per label. The
//! score for a label is its share of keyword hits in the text; with no hits
//! every label gets an equal share.

use std::cell::Cell;
use std::path::Path;

use textclass_core::Category;

use crate::context::AssetContext;
use crate::engine::Engine;

thread_local! {
    static CLOSED: Cell<usize> = const { Cell::new(0) };
}

/// Number of engines closed on the current thread.
pub(crate) fn closed_count() -> usize {
    CLOSED.with(Cell::get)
}

#[derive(Debug)]
pub(crate) struct KeywordEngine {
    labels: Vec<(String, Vec<String>)>,
}

impl Engine for KeywordEngine {
    fn create_from_resource(context: &AssetContext, name: &str) -> anyhow::Result<Self> {
        let path = context
            .resolve(name)
            .ok_or_else(|| anyhow::anyhow!("bad resource name {name:?}"))?;
        let text = std::fs::read_to_string(&path)?;

        let mut labels = Vec::new();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (label, words) = line
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("line {}: missing ':'", n + 1))?;
            let words = words.split_whitespace().map(str::to_lowercase).collect();
            labels.push((label.trim().to_string(), words));
        }
        anyhow::ensure!(!labels.is_empty(), "no labels in {}", path.display());

        Ok(Self { labels })
    }

    fn classify(&mut self, text: &str) -> anyhow::Result<Vec<Category>> {
        anyhow::ensure!(!text.contains('\0'), "NUL byte in input");

        let tokens: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let hits: Vec<usize> = self
            .labels
            .iter()
            .map(|(_, words)| tokens.iter().filter(|t| words.contains(t)).count())
            .collect();
        let total: usize = hits.iter().sum();

        Ok(self
            .labels
            .iter()
            .zip(&hits)
            .map(|((label, _), &h)| {
                let score = if total == 0 {
                    1.0 / self.labels.len() as f32
                } else {
                    h as f32 / total as f32
                };
                Category::new(label.clone(), score)
            })
            .collect())
    }

    fn close(self) {
        CLOSED.with(|c| c.set(c.get() + 1));
    }
}

/// Write a two-label spam model into `dir` under `name`.
pub(crate) fn write_spam_model(dir: &Path, name: &str) {
    std::fs::write(
        dir.join(name),
        "ham: hello thanks meeting lunch\nspam: free winner prize click\n",
    )
    .unwrap();
}
