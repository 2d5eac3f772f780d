use crate::checklist::{Checklist, SymptomDescriptor};
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    /// Replaces the built-in SLEDAI table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<SymptomDescriptor>>,
}

impl Config {
    /// Configured checklist, or the built-in table
    pub fn checklist(&self) -> Checklist {
        match &self.checklist {
            Some(items) => Checklist::new(items.clone()),
            None => Checklist::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackendKind;

    #[test]
    fn test_empty_document_is_default() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.checklist().len(), 24);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
store:
  backend: document
  path: /tmp/sledai/results.json
checklist:
  - title: Seizure
    description: Recent onset
    score: 8
  - title: Fever
    score: 1
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.store.backend, BackendKind::Document);

        let checklist = config.checklist();
        assert_eq!(checklist.len(), 2);
        assert_eq!(checklist.weights(), vec![8, 1]);
        assert_eq!(checklist.get(1).map(|d| d.description.as_str()), Some(""));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_score_rejected() {
        let yaml = "checklist:\n  - title: Fever\n    score: -1\n";
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
