// ============================================================
// Layer 6 - Extractor Configuration Loader
// ============================================================
// Reads the JSON extractor configuration from disk. The format
// and its defaults live with the ExtractorConfig domain type.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::extractor_config::ExtractorConfig;

/// Load and validate the config file at `path`.
pub fn load_extractor_config(path: impl AsRef<Path>) -> Result<ExtractorConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read extractor config '{}'", path.display()))?;
    let cfg = ExtractorConfig::from_json(&json)
        .with_context(|| format!("Invalid extractor config '{}'", path.display()))?;

    tracing::debug!(
        "Loaded extractor config: {} factors, window {}",
        cfg.factors.len(),
        cfg.window_size
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ExtractionError;

    #[test]
    fn test_load_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("extractor.json");
        fs::write(&path, r#"{"factors": ["surface", "pos"], "window_size": 1}"#).unwrap();

        let cfg = load_extractor_config(&path).unwrap();
        assert_eq!(cfg.factor_count(), 2);
        assert_eq!(cfg.window_size, 1);
    }

    #[test]
    fn test_invalid_file_names_the_path() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("extractor.json");
        fs::write(&path, r#"{"factors": [""]}"#).unwrap();

        let err = load_extractor_config(&path).unwrap_err();
        assert!(err.to_string().contains("extractor.json"));
        assert!(matches!(
            err.downcast_ref::<ExtractionError>(),
            Some(ExtractionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_extractor_config("/nonexistent/extractor.json").is_err());
    }
}
