// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Motivational quote source backed by a JSON file in the data directory.

use crate::error::AppError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One quote entry from `quotes.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: u32,
    pub text: String,
    pub category: String,
}

/// A randomly selected quote plus selection metadata.
#[derive(Debug, Clone)]
pub struct QuotePick {
    pub quote: Quote,
    pub total: usize,
    pub index: usize,
}

/// Quote service. Loaded once at startup; an absent source file is
/// tolerated at load time and surfaces as NotFound at call time.
#[derive(Debug, Clone, Default)]
pub struct QuoteService {
    quotes: Option<Vec<Quote>>,
}

impl QuoteService {
    /// Load quotes from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, QuoteError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| QuoteError::Io(e.to_string()))?;
        Self::load_from_json(&raw)
    }

    /// Load quotes from a JSON array string.
    pub fn load_from_json(raw: &str) -> Result<Self, QuoteError> {
        let quotes: Vec<Quote> =
            serde_json::from_str(raw).map_err(|e| QuoteError::Parse(e.to_string()))?;

        tracing::info!(count = quotes.len(), "Loaded quotes");
        Ok(Self {
            quotes: Some(quotes),
        })
    }

    /// Pick a uniformly random quote. The returned index is always in
    /// `[0, total)`.
    pub fn pick(&self) -> Result<QuotePick, AppError> {
        let quotes = self
            .quotes
            .as_ref()
            .ok_or_else(|| AppError::NotFound("quotes.json not loaded".to_string()))?;

        if quotes.is_empty() {
            return Err(AppError::Unprocessable(
                "quotes file contains no entries".to_string(),
            ));
        }

        let index = rand::thread_rng().gen_range(0..quotes.len());
        Ok(QuotePick {
            quote: quotes[index].clone(),
            total: quotes.len(),
            index,
        })
    }
}

/// Errors from loading the quote file.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Failed to read quotes file: {0}")]
    Io(String),

    #[error("Failed to parse quotes file: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quote_always_selected() {
        let svc = QuoteService::load_from_json(
            r#"[{"id": 1, "text": "Per aspera ad astra.", "category": "motivation"}]"#,
        )
        .unwrap();

        for _ in 0..20 {
            let pick = svc.pick().unwrap();
            assert_eq!(pick.index, 0);
            assert_eq!(pick.total, 1);
            assert_eq!(pick.quote.id, 1);
        }
    }

    #[test]
    fn test_index_within_bounds() {
        let svc = QuoteService::load_from_json(
            r#"[
                {"id": 1, "text": "a", "category": "c"},
                {"id": 2, "text": "b", "category": "c"},
                {"id": 3, "text": "c", "category": "c"}
            ]"#,
        )
        .unwrap();

        for _ in 0..100 {
            let pick = svc.pick().unwrap();
            assert!(pick.index < pick.total);
            assert_eq!(pick.total, 3);
        }
    }

    #[test]
    fn test_empty_file_is_unprocessable() {
        let svc = QuoteService::load_from_json("[]").unwrap();
        assert!(matches!(svc.pick(), Err(AppError::Unprocessable(_))));
    }

    #[test]
    fn test_unloaded_service_is_not_found() {
        let svc = QuoteService::default();
        assert!(matches!(svc.pick(), Err(AppError::NotFound(_))));
    }
}
