use eyre::{Context, Result};
use scanlog::capture::CaptureSettings;
use scanlog::classify::{AllowListDecider, ClassifierSettings, Decider, StaticDecider};
use scanlog::pipeline::{DEFAULT_MANUAL_PRODUCT_NAME, PipelineSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub capture: CaptureConfig,
    pub classifier: ClassifierConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub settle_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { settle_delay_ms: 500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierPolicy {
    #[default]
    AcceptAll,
    RejectAll,
    AllowList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub timeout_ms: u64,
    pub policy: ClassifierPolicy,
    pub allow_list: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            policy: ClassifierPolicy::AcceptAll,
            allow_list: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn decider(&self) -> Arc<dyn Decider> {
        match self.policy {
            ClassifierPolicy::AcceptAll => Arc::new(StaticDecider::accept_all()),
            ClassifierPolicy::RejectAll => Arc::new(StaticDecider::reject_all()),
            ClassifierPolicy::AllowList => Arc::new(AllowListDecider::new(self.allow_list.iter().cloned())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub recent_limit: usize,
    pub manual_product_name: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            manual_product_name: Some(DEFAULT_MANUAL_PRODUCT_NAME.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            capture: CaptureConfig::default(),
            classifier: ClassifierConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Library-side settings for a pipeline built from this config
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            capture: CaptureSettings {
                settle_delay: Duration::from_millis(self.capture.settle_delay_ms),
            },
            classifier: ClassifierSettings {
                timeout: Duration::from_millis(self.classifier.timeout_ms),
            },
            manual_product_name: self.log.manual_product_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanlog::domain::{ScanKind, ScanStatus};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.capture.settle_delay_ms, 500);
        assert_eq!(config.classifier.timeout_ms, 5000);
        assert_eq!(config.classifier.policy, ClassifierPolicy::AcceptAll);
        assert_eq!(config.log.recent_limit, 5);
        assert_eq!(config.log.manual_product_name.as_deref(), Some("Manually Added"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "capture:\n  settle_delay_ms: 250\nclassifier:\n  policy: allow-list\n  allow_list: [QR123]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.capture.settle_delay_ms, 250);
        assert_eq!(config.classifier.policy, ClassifierPolicy::AllowList);
        assert_eq!(config.classifier.allow_list, vec!["QR123".to_string()]);
        assert_eq!(config.classifier.timeout_ms, 5000);
        assert_eq!(config.log.recent_limit, 5);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug\nlog:\n  recent_limit: 3").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log.recent_limit, 3);
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let path = PathBuf::from("/nonexistent/scanlog.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "classifier:\n  policy: coin-flip").unwrap();
        let path = file.path().to_path_buf();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_pipeline_settings() {
        let mut config = Config::default();
        config.capture.settle_delay_ms = 750;
        config.classifier.timeout_ms = 100;
        config.log.manual_product_name = None;

        let settings = config.pipeline_settings();
        assert_eq!(settings.capture.settle_delay, Duration::from_millis(750));
        assert_eq!(settings.classifier.timeout, Duration::from_millis(100));
        assert!(settings.manual_product_name.is_none());
    }

    #[tokio::test]
    async fn test_decider_policies() {
        let mut config = ClassifierConfig::default();
        let status = config.decider().decide("X", ScanKind::Qr).await.unwrap();
        assert_eq!(status, ScanStatus::Valid);

        config.policy = ClassifierPolicy::RejectAll;
        let status = config.decider().decide("X", ScanKind::Qr).await.unwrap();
        assert_eq!(status, ScanStatus::Invalid);

        config.policy = ClassifierPolicy::AllowList;
        config.allow_list = vec!["QR123".to_string()];
        let decider = config.decider();
        assert_eq!(decider.decide("QR123", ScanKind::Qr).await.unwrap(), ScanStatus::Valid);
        assert_eq!(decider.decide("QR999", ScanKind::Qr).await.unwrap(), ScanStatus::Invalid);
    }
}
