//! HTML page rendering.
//!
//! The page is a minijinja template registered under a `.html` name, which
//! turns on HTML auto-escaping for every interpolated value. Guess text is
//! player input and must never reach the markup unescaped.

use minijinja::Environment;
use serde::Serialize;

use crate::game::{ScoreDisplay, present};
use crate::session::GuessRecord;

const PAGE_TEMPLATE: &str = "page.html";

/// Everything the game page shows for one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageView<'a> {
    /// The guess as typed, if any.
    pub guess: Option<&'a str>,
    /// Score of the current guess when it was accepted.
    pub score: Option<f64>,
    /// Inline error message.
    pub error: Option<&'a str>,
    /// Reveal the category hint.
    pub hint: bool,
    pub category: &'a str,
    /// Session history, already in display order.
    pub history: &'a [GuessRecord],
}

#[derive(Serialize)]
struct PageContext<'a> {
    guess: Option<&'a str>,
    error: Option<&'a str>,
    category: Option<&'a str>,
    result: Option<ResultContext>,
    history: Vec<HistoryEntry<'a>>,
}

#[derive(Serialize)]
struct ResultContext {
    score: String,
    message: String,
    band: &'static str,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    guess: &'a str,
    score: String,
    width: String,
    band: &'static str,
}

/// Renders the game page.
#[derive(Debug)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/page.html"))?;
        Ok(Self { env })
    }

    /// Render the full HTML document for `view`.
    pub fn render(&self, view: &PageView<'_>) -> Result<String, minijinja::Error> {
        let result = match (view.error, view.guess, view.score) {
            (None, Some(guess), Some(score)) => {
                let display = present(score);
                Some(ResultContext {
                    score: format_score(score),
                    message: display.band.message(guess),
                    band: display.band.css_class(),
                })
            }
            _ => None,
        };

        let history = view
            .history
            .iter()
            .map(|record| {
                let ScoreDisplay {
                    width_percent,
                    band,
                } = present(record.score);
                HistoryEntry {
                    guess: &record.guess,
                    score: format_score(record.score),
                    width: format!("{width_percent:.1}"),
                    band: band.css_class(),
                }
            })
            .collect();

        let ctx = PageContext {
            guess: view.guess,
            error: view.error,
            category: (view.hint && !view.category.is_empty()).then_some(view.category),
            result,
            history,
        };

        self.env.get_template(PAGE_TEMPLATE)?.render(ctx)
    }
}

fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PageRenderer {
        PageRenderer::new().unwrap()
    }

    #[test]
    fn test_exact_match_page() {
        let history = vec![GuessRecord::new("chien", 1.0), GuessRecord::new("chat", 0.7)];
        let html = renderer()
            .render(&PageView {
                guess: Some("chien"),
                score: Some(1.0),
                category: "animaux",
                history: &history,
                ..PageView::default()
            })
            .unwrap();

        assert!(html.contains("Well played! The word was chien."));
        assert!(html.contains("Similarity score: 1.0000"));
        assert!(html.contains("width: 100.0%"));
        assert!(!html.contains("animaux"));

        let chien = html.find("chien - Score").unwrap();
        let chat = html.find("chat - Score").unwrap();
        assert!(chien < chat);
    }

    #[test]
    fn test_error_replaces_result() {
        let html = renderer()
            .render(&PageView {
                guess: Some("chat"),
                score: Some(0.3),
                error: Some("similarity service returned status 500"),
                ..PageView::default()
            })
            .unwrap();

        assert!(html.contains("Error: similarity service returned status 500"));
        assert!(!html.contains("Similarity score:"));
        assert!(html.contains("No guesses yet."));
    }

    #[test]
    fn test_hint_reveals_category() {
        let html = renderer()
            .render(&PageView {
                hint: true,
                category: "animaux",
                ..PageView::default()
            })
            .unwrap();

        assert!(html.contains("<strong>animaux</strong>"));
        // Auto-escaping also covers `/`.
        assert!(html.contains("<h2>Guess: N&#x2f;A</h2>"));
    }

    #[test]
    fn test_guess_is_escaped() {
        let payload = "<script>alert(1)</script>";
        let history = vec![GuessRecord::new(payload, 0.1)];
        let html = renderer()
            .render(&PageView {
                guess: Some(payload),
                score: Some(0.1),
                history: &history,
                ..PageView::default()
            })
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
