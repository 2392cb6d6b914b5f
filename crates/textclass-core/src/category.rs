//! Category results produced by a text classification engine.

use serde::{Deserialize, Serialize};

/// A single label/confidence pair for one classified text.
///
/// The engine decides both the label vocabulary and the meaning of the score;
/// nothing in this crate validates or rescales them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub score: f32,
}

impl Category {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Look up the category with the given label.
pub fn find<'a>(categories: &'a [Category], label: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.label == label)
}

/// Highest-scoring category. The first one wins on ties; NaN scores never win.
pub fn top(categories: &[Category]) -> Option<&Category> {
    let mut best: Option<&Category> = None;
    for c in categories {
        if c.score.is_nan() {
            continue;
        }
        if best.is_none_or(|b| c.score > b.score) {
            best = Some(c);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spam_result() -> Vec<Category> {
        vec![Category::new("ham", 0.12), Category::new("spam", 0.88)]
    }

    #[test]
    fn find_by_label() {
        let cats = spam_result();
        assert_eq!(find(&cats, "spam").map(|c| c.score), Some(0.88));
        assert!(find(&cats, "eggs").is_none());
    }

    #[test]
    fn top_picks_highest() {
        let cats = spam_result();
        assert_eq!(top(&cats).unwrap().label, "spam");
    }

    #[test]
    fn top_first_wins_on_tie() {
        let cats = vec![Category::new("a", 0.5), Category::new("b", 0.5)];
        assert_eq!(top(&cats).unwrap().label, "a");
    }

    #[test]
    fn top_skips_nan() {
        let cats = vec![Category::new("a", f32::NAN), Category::new("b", 0.1)];
        assert_eq!(top(&cats).unwrap().label, "b");
        assert!(top(&[]).is_none());
    }

    #[test]
    fn serializes_as_label_and_score() {
        let json = serde_json::to_value(Category::new("spam", 0.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "label": "spam", "score": 0.5 }));
    }
}
