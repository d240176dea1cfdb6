// ============================================================
// Layer 3 - Extractor Configuration
// ============================================================
// Describes the factored corpus and which feature templates the
// feature extractor should fire. Stored as JSON:
//
//   {
//     "factors": ["surface", "pos", "lemma"],
//     "window_size": 2,
//     "features": { "bag_of_words": true, "scores": false }
//   }
//
// Only "factors" is required. The number of factors is the
// per-token factor count every corpus token must carry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::error::ExtractionError;

/// Feature templates, each switched on or off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// The whole source phrase as one feature
    pub source_indicator: bool,
    /// Each factor of each token inside the source span
    pub source_internal:  bool,
    /// Tokens in a window left and right of the span
    pub source_external:  bool,
    /// Every token of the sentence, position-free
    pub bag_of_words:     bool,
    /// Span labels, parent label and span bucket
    pub syntax:           bool,
    /// The whole target phrase as one feature
    pub target_indicator: bool,
    /// Each word of the target phrase
    pub target_internal:  bool,
    /// Phrase-table scores as real-valued features
    pub scores:           bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            source_indicator: true,
            source_internal:  true,
            source_external:  true,
            bag_of_words:     false,
            syntax:           true,
            target_indicator: true,
            target_internal:  true,
            scores:           true,
        }
    }
}

fn default_window_size() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Factor names, in the order they appear inside a token
    pub factors: Vec<String>,

    /// Context window on each side of the source span
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl ExtractorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("Cannot parse extractor config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Number of `|`-separated factors per corpus token.
    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    fn validate(&self) -> Result<(), ExtractionError> {
        if self.factors.is_empty() {
            return Err(ExtractionError::InvalidConfig("at least one factor is required".into()));
        }
        if self.factors.iter().any(|f| f.trim().is_empty()) {
            return Err(ExtractionError::InvalidConfig("factor names must not be empty".into()));
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = ExtractorConfig::from_json(r#"{"factors": ["surface", "pos"]}"#).unwrap();
        assert_eq!(cfg.factor_count(), 2);
        assert_eq!(cfg.window_size, 2);
        assert_eq!(cfg.features, FeatureFlags::default());
    }

    #[test]
    fn test_partial_feature_flags() {
        let json = r#"{"factors": ["w"], "window_size": 3, "features": {"bag_of_words": true, "scores": false}}"#;
        let cfg  = ExtractorConfig::from_json(json).unwrap();
        assert!(cfg.features.bag_of_words);
        assert!(!cfg.features.scores);
        // untouched flags keep their defaults
        assert!(cfg.features.syntax);
        assert_eq!(cfg.window_size, 3);
    }

    #[test]
    fn test_empty_factor_list_is_rejected() {
        let err = ExtractorConfig::from_json(r#"{"factors": []}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractionError>(),
            Some(ExtractionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_factors_is_a_parse_error() {
        assert!(ExtractorConfig::from_json(r#"{"window_size": 1}"#).is_err());
    }
}
