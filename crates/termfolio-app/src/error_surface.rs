//! What the host shows when the session fails.
//!
//! The intentional crash gets its own view. Every other error falls
//! through to a generic one.

use termfolio_types::error::{IntentionalCrash, TermfolioError};

/// Which view to render for an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorView {
    IntentionalCrash { phrase: String },
    Generic { message: String },
}

impl ErrorView {
    pub fn is_intentional_crash(&self) -> bool {
        matches!(self, Self::IntentionalCrash { .. })
    }
}

/// Pick the view for an error bubbling out of the session loop.
pub fn classify(err: &anyhow::Error) -> ErrorView {
    let crash = err
        .downcast_ref::<TermfolioError>()
        .and_then(|e| match e {
            TermfolioError::Crash(crash) => Some(crash),
            _ => None,
        })
        .or_else(|| err.downcast_ref::<IntentionalCrash>());
    match crash {
        Some(crash) => ErrorView::IntentionalCrash {
            phrase: crash.phrase.clone(),
        },
        None => ErrorView::Generic {
            message: format!("{err:#}"),
        },
    }
}

/// Lines of text for a view.
pub fn render(view: &ErrorView) -> Vec<String> {
    match view {
        ErrorView::IntentionalCrash { phrase } => vec![
            String::new(),
            "*** KERNEL PANIC ***".to_string(),
            format!("`{phrase}` removed everything, including this website."),
            "Nothing was actually deleted. Reload the page to reboot.".to_string(),
        ],
        ErrorView::Generic { message } => vec![
            String::new(),
            "Something went wrong.".to_string(),
            format!("error: {message}"),
        ],
    }
}
