use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_ARTIFACT_URL: &str =
    "https://github.com/xpf-proxy/sni-proxy/releases/latest/download/sni-proxy-server";
const DEFAULT_CONFIG_URL: &str =
    "https://github.com/xpf-proxy/sni-proxy/releases/latest/download/config.json";

/// Deployment parameters. Defaults encode the production layout; tests
/// redirect the directories into a tempdir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub service_name: String,
    pub install_dir: PathBuf,
    pub executable_name: String,
    pub config_name: String,
    pub artifact_url: String,
    pub config_url: String,
    pub artifact_sha256: Option<String>,
    pub config_sha256: Option<String>,
    pub unit_dir: PathBuf,
    pub helper_dir: PathBuf,
    pub ctl_path: PathBuf,
    pub with_helper: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            service_name: "xpf".to_string(),
            install_dir: PathBuf::from("/etc/xpf"),
            executable_name: "sni-proxy-server".to_string(),
            config_name: "config.json".to_string(),
            artifact_url: DEFAULT_ARTIFACT_URL.to_string(),
            config_url: DEFAULT_CONFIG_URL.to_string(),
            artifact_sha256: None,
            config_sha256: None,
            unit_dir: PathBuf::from("/etc/systemd/system"),
            helper_dir: PathBuf::from("/usr/local/bin"),
            ctl_path: PathBuf::from("/usr/local/bin/xpfctl"),
            with_helper: true,
        }
    }
}

impl DeployConfig {
    /// Load a TOML override file. A missing file falls back to the built-in
    /// defaults; a file that exists but does not parse is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                warn!("No deploy config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
        };
        toml::from_str(&content)
            .with_context(|| format!("failed to parse deploy config {}", path.display()))
    }

    pub fn executable_path(&self) -> PathBuf {
        self.install_dir.join(&self.executable_name)
    }

    pub fn config_path(&self) -> PathBuf {
        self.install_dir.join(&self.config_name)
    }

    pub fn unit_path(&self) -> PathBuf {
        self.unit_dir.join(format!("{}.service", self.service_name))
    }

    pub fn helper_path(&self) -> PathBuf {
        self.helper_dir.join(&self.service_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_paths_are_children_of_install_dir() {
        let config = DeployConfig::default();
        assert!(config.executable_path().starts_with(&config.install_dir));
        assert!(config.config_path().starts_with(&config.install_dir));
        assert_eq!(config.unit_path(), PathBuf::from("/etc/systemd/system/xpf.service"));
        assert_eq!(config.helper_path(), PathBuf::from("/usr/local/bin/xpf"));
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = DeployConfig::load(temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.service_name, "xpf");
    }

    #[test]
    fn load_overrides_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deploy.toml");
        std::fs::write(
            &path,
            "service_name = \"xpf-stage\"\ninstall_dir = \"/opt/xpf\"\nwith_helper = false\n",
        )
        .unwrap();

        let config = DeployConfig::load(&path).unwrap();
        assert_eq!(config.service_name, "xpf-stage");
        assert_eq!(config.install_dir, PathBuf::from("/opt/xpf"));
        assert!(!config.with_helper);
        // Unset fields keep defaults.
        assert_eq!(config.executable_name, "sni-proxy-server");
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deploy.toml");
        std::fs::write(&path, "service_name = [not toml").unwrap();
        assert!(DeployConfig::load(&path).is_err());
    }
}
