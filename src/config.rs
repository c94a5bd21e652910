use std::{fs::File, io::BufReader};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub debug: bool,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: String,
    #[serde(default)]
    pub url: String,
}

impl Config {
    pub fn read(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open config file {}: {}", path, e))?;
        let reader = BufReader::new(file);
        let config: Config = serde_yaml::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path, e))?;
        Ok(config)
    }

    pub fn empty() -> Self {
        Self {
            debug: false,
            store: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = "debug: true\nstore:\n  backend: redis\n  url: redis://127.0.0.1/\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.debug);
        let store = config.store.unwrap();
        assert_eq!(store.backend, "redis");
        assert_eq!(store.url, "redis://127.0.0.1/");
    }

    #[test]
    fn test_empty_config_has_no_store() {
        let config = Config::empty();
        assert!(!config.debug);
        assert!(config.store.is_none());
    }
}
