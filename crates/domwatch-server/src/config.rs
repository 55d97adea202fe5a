use anyhow::{anyhow, Result};
use config::{Config, Environment, File};
use domwatch_core::check::DEFAULT_BATCH_SIZE;
use domwatch_core::{CheckOptions, ProbeConfig};
use domwatch_notify::providers::DEFAULT_TELEGRAM_API_BASE;
use serde::Deserialize;
use std::net::SocketAddr;

/// 兼容旧部署的令牌环境变量
pub const LEGACY_TOKEN_ENV: &str = "API_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub probe: ProbeConfig,
    pub check: CheckConfig,
    pub notify: NotifyConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    /// 启动时创建缺失的表
    pub auto_migrate: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckConfig {
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotifyConfig {
    pub telegram_api_base: String,
    /// 告警时间使用的时区
    pub utc_offset_hours: i32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://domwatch.db?mode=rwc".to_string(),
            auto_migrate: true,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            utc_offset_hours: 8,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "127.0.0.1:9090".to_string(),
        }
    }
}

impl AppConfig {
    /// 读取配置文件（可不存在），再叠加 `DOMWATCH__` 前缀的环境变量
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("DOMWATCH").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;
        app_config.apply_legacy_token(std::env::var(LEGACY_TOKEN_ENV).ok());
        app_config.validate()?;
        Ok(app_config)
    }

    /// 未配置 `auth.api_token` 时使用旧的 `API_TOKEN`
    pub fn apply_legacy_token(&mut self, legacy: Option<String>) {
        let configured = self
            .auth
            .api_token
            .as_deref()
            .map_or(false, |t| !t.is_empty());
        if !configured {
            self.auth.api_token = legacy.filter(|t| !t.is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.check.batch_size == 0 {
            return Err(anyhow!("check.batch_size must be greater than 0"));
        }
        if self.probe.attempts == 0 {
            return Err(anyhow!("probe.attempts must be greater than 0"));
        }
        if self.probe.timeout_secs == 0 {
            return Err(anyhow!("probe.timeout_secs must be greater than 0"));
        }
        if !(-23..=23).contains(&self.notify.utc_offset_hours) {
            return Err(anyhow!(
                "notify.utc_offset_hours ({}) must be within -23..=23",
                self.notify.utc_offset_hours
            ));
        }
        self.listen_addr()?;
        if self.metrics.enabled {
            self.metrics_addr()?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| anyhow!("invalid server address: {}", e))
    }

    pub fn metrics_addr(&self) -> Result<SocketAddr> {
        self.metrics
            .listen
            .parse()
            .map_err(|e| anyhow!("invalid metrics.listen: {}", e))
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            batch_size: self.check.batch_size,
            utc_offset_hours: self.notify.utc_offset_hours,
            telegram_api_base: self.notify.telegram_api_base.clone(),
        }
    }
}
