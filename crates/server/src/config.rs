use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

pub const CONFIG_PATH_ENV: &str = "COLLEGEJUMP_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "collegejump.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// 首次安装密钥；未设置且库中无用户时启动时生成。
    pub setup_key: Option<String>,
    /// 事故编号的报告渠道。
    pub repository_issues: String,
    pub secure_cookies: bool,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            setup_key: None,
            repository_issues: default_repository_issues(),
            secure_cookies: false,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// 读取 `COLLEGEJUMP_CONFIG` 指定（或默认路径）的配置文件，再叠加 `DATABASE_URL`。
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let mut config = match explicit.as_deref() {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        Ok(config)
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://collegejump.db?mode=rwc".to_string()
}

fn default_repository_issues() -> String {
    "https://github.com/collegejump/collegejump/issues".to_string()
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn test_parse_config() {
        let raw = r#"
bind_addr = "0.0.0.0:9000"
database_url = "postgres://cj:cj@localhost/collegejump"
setup_key = "first-run"
secure_cookies = true
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database_url, "postgres://cj:cj@localhost/collegejump");
        assert_eq!(config.setup_key.as_deref(), Some("first-run"));
        assert!(config.secure_cookies);
        assert_eq!(config.max_upload_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ServerConfig::from_str("").expect("empty config should parse");

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(config.database_url.starts_with("sqlite://"));
        assert!(config.setup_key.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(ServerConfig::from_str("secure_cookies = \"yes\"").is_err());
    }
}
