use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::DEFAULT_DEGREE;
use crate::source::ExtractOptions;

/// Application configuration.
///
/// Every field is optional; missing fields fall back to defaults.
///
/// Example YAML:
/// ```yaml
/// table: /data/scoring-tables-2022.json
/// degree: 15
/// document:
///   page_lines: 53
///   max_points: 1400
///   convert_time_strings: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Serialized points table (default: ~/.config/athletics-points/table.json)
    #[serde(default)]
    pub table: Option<PathBuf>,

    /// Polynomial degree of the fitted models (default: 15)
    #[serde(default)]
    pub degree: Option<usize>,

    /// How to read the scoring document on import
    #[serde(default)]
    pub document: Option<DocumentConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    #[serde(default)]
    pub page_lines: Option<usize>,

    #[serde(default)]
    pub max_points: Option<i64>,

    #[serde(default)]
    pub convert_time_strings: Option<bool>,
}

impl Config {
    pub fn degree(&self) -> usize {
        self.degree.unwrap_or(DEFAULT_DEGREE)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let defaults = ExtractOptions::default();
        let Some(document) = &self.document else {
            return defaults;
        };
        ExtractOptions {
            page_lines: document.page_lines.unwrap_or(defaults.page_lines),
            max_points: document.max_points.unwrap_or(defaults.max_points),
            convert_time_strings: document
                .convert_time_strings
                .unwrap_or(defaults.convert_time_strings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.degree(), DEFAULT_DEGREE);
        assert_eq!(config.extract_options(), ExtractOptions::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
table: /tmp/table.json
degree: 12
document:
  page_lines: 50
  max_points: 1300
  convert_time_strings: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.table, Some(PathBuf::from("/tmp/table.json")));
        assert_eq!(config.degree(), 12);

        let options = config.extract_options();
        assert_eq!(options.page_lines, 50);
        assert_eq!(options.max_points, 1300);
        assert!(!options.convert_time_strings);
    }

    #[test]
    fn test_partial_document_config() {
        let yaml = r#"
document:
  page_lines: 60
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let options = config.extract_options();
        assert_eq!(options.page_lines, 60);
        assert_eq!(options.max_points, 1400);
        assert!(options.convert_time_strings);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "degre: 10\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            table: Some(PathBuf::from("table.json")),
            degree: Some(10),
            document: Some(DocumentConfig {
                page_lines: Some(53),
                max_points: None,
                convert_time_strings: Some(true),
            }),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
