use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;
pub const DEFAULT_DELETE_CLOSE_DELAY_MS: u64 = 2222;
pub const DEFAULT_ONBOARDING_STORE_PATH: &str = "alert-editor-state.json";
pub const DEFAULT_ONBOARDING_KEY: &str = "zscm-ct-visited";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub toast_duration_ms: u64,
    /// Pause between the delete toast and closing the detail page
    pub delete_close_delay_ms: u64,
    pub onboarding_store_path: String,
    pub onboarding_key: String,
    pub guide_url: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            delete_close_delay_ms: DEFAULT_DELETE_CLOSE_DELAY_MS,
            onboarding_store_path: DEFAULT_ONBOARDING_STORE_PATH.to_string(),
            onboarding_key: DEFAULT_ONBOARDING_KEY.to_string(),
            guide_url: None,
        }
    }
}

impl EditorConfig {
    /// Create configuration from a properties map
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let parse_ms = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match props.get(key) {
                Some(value) => value.trim().parse().map_err(|_| {
                    ConfigError::Message(format!("{} must be a number of milliseconds", key))
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            toast_duration_ms: parse_ms("toast_duration_ms", DEFAULT_TOAST_DURATION_MS)?,
            delete_close_delay_ms: parse_ms(
                "delete_close_delay_ms",
                DEFAULT_DELETE_CLOSE_DELAY_MS,
            )?,
            onboarding_store_path: props
                .get("onboarding_store_path")
                .cloned()
                .unwrap_or_else(|| DEFAULT_ONBOARDING_STORE_PATH.to_string()),
            onboarding_key: props
                .get("onboarding_key")
                .cloned()
                .unwrap_or_else(|| DEFAULT_ONBOARDING_KEY.to_string()),
            guide_url: props.get("guide_url").filter(|url| !url.is_empty()).cloned(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("toast_duration_ms", DEFAULT_TOAST_DURATION_MS)?
            .set_default("delete_close_delay_ms", DEFAULT_DELETE_CLOSE_DELAY_MS)?
            .set_default("onboarding_store_path", DEFAULT_ONBOARDING_STORE_PATH)?
            .set_default("onboarding_key", DEFAULT_ONBOARDING_KEY)?;

        // Try to load from config file if it exists
        if let Ok(config_path) = env::var("ALERT_EDITOR_CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("ALERT_EDITOR")
                .separator("__")
                .try_parsing(true),
        );

        let editor_config: EditorConfig = builder.build()?.try_deserialize()?;
        editor_config.validate().map_err(ConfigError::Message)?;

        Ok(editor_config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.toast_duration_ms == 0 {
            return Err("Toast duration must be greater than 0".to_string());
        }

        if self.delete_close_delay_ms > 60_000 {
            return Err("Delete close delay should not exceed 60 seconds".to_string());
        }

        if self.onboarding_key.trim().is_empty() {
            return Err("Onboarding key is required".to_string());
        }

        if self.onboarding_store_path.trim().is_empty() {
            return Err("Onboarding store path is required".to_string());
        }

        if let Some(url) = &self.guide_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(format!("Invalid guide url: {}", url));
            }
        }

        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn delete_close_delay(&self) -> Duration {
        Duration::from_millis(self.delete_close_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.toast_duration(), Duration::from_millis(3000));
        assert_eq!(config.delete_close_delay(), Duration::from_millis(2222));
        assert_eq!(config.onboarding_key, "zscm-ct-visited");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_properties() {
        let props = HashMap::from([
            ("toast_duration_ms".to_string(), "5000".to_string()),
            ("guide_url".to_string(), "https://guide.example.com/alerts".to_string()),
        ]);

        let config = EditorConfig::from_properties(&props).unwrap();
        assert_eq!(config.toast_duration_ms, 5000);
        assert_eq!(config.delete_close_delay_ms, 2222);
        assert_eq!(
            config.guide_url.as_deref(),
            Some("https://guide.example.com/alerts")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_properties_rejects_bad_numbers() {
        let props = HashMap::from([("delete_close_delay_ms".to_string(), "soon".to_string())]);
        assert!(EditorConfig::from_properties(&props).is_err());
    }

    #[test]
    fn test_validate() {
        let config = EditorConfig {
            toast_duration_ms: 0,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EditorConfig {
            guide_url: Some("guide.example.com".to_string()),
            ..EditorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err("Invalid guide url: guide.example.com".to_string())
        );
    }
}
