//! HTTP 连通性探测
//!
//! 先走 HTTPS，全部失败后再走 HTTP；每种协议最多尝试 `attempts` 次，
//! 每次请求受 `timeout_secs` 限制。最终响应为 2xx 即视为在线。

use crate::error::{DomwatchError, Result};
use crate::metrics;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// 单次请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 每种协议的尝试次数
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_attempts() -> u32 {
    2
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            attempts: default_attempts(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    async fn is_online(&self, host: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub const ORDER: [Scheme; 2] = [Scheme::Https, Scheme::Http];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// 去掉数据库中可能带上的协议前缀和末尾斜杠
pub fn normalize_host(raw: &str) -> &str {
    let host = raw.trim();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    host.trim_end_matches('/')
}

pub struct HttpProber {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl HttpProber {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| DomwatchError::Config(format!("invalid probe user_agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    async fn try_scheme(&self, scheme: Scheme, host: &str) -> bool {
        let url = format!("{}://{}", scheme.as_str(), host);

        for attempt in 1..=self.config.attempts {
            debug!(%url, attempt, "Probing {} via {}", host, scheme);

            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Domain {} is online via {}", host, scheme);
                    return true;
                }
                Ok(response) => {
                    warn!(
                        status = response.status().as_u16(),
                        attempt,
                        "Domain {} returned non-success status via {}",
                        host,
                        scheme
                    );
                }
                Err(e) => {
                    let reason = if e.is_timeout() { "timeout" } else { "request error" };
                    warn!(error = %e, attempt, reason, "Probing {} via {} failed", host, scheme);
                }
            }
        }

        info!("All {} checks failed for {}", scheme, host);
        false
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn is_online(&self, host: &str) -> bool {
        let host = normalize_host(host);

        for (index, scheme) in Scheme::ORDER.iter().enumerate() {
            if index > 0 {
                info!("Falling back to {} for {}", scheme, host);
            }
            if self.try_scheme(*scheme, host).await {
                metrics::record_probe(true);
                return true;
            }
        }

        metrics::record_probe(false);
        false
    }
}
