use crate::message::NotifyMessage;
use crate::notifier::{NotifyError, Notifier, NotifyResult};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

// ============================================================================
// Telegram 通知
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Bot API 根地址，测试时可替换为本地服务
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    DEFAULT_TELEGRAM_API_BASE.to_string()
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: default_telegram_api_base(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    fn build_message(&self, message: &NotifyMessage) -> serde_json::Value {
        serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": message.content,
            "parse_mode": "Markdown",
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &NotifyMessage) -> Result<NotifyResult> {
        if !self.is_enabled() {
            return Err(NotifyError::NotConfigured { channel: "Telegram" }.into());
        }

        debug!(
            chat_id = %self.config.chat_id,
            message_length = message.content.len(),
            "Sending Telegram request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&self.build_message(message))
            .send()
            .await?;

        let status = response.status();
        let details = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(%status, body = %details, "Telegram API returned error");
            return Err(NotifyError::Rejected {
                channel: "Telegram",
                status,
                details,
            }
            .into());
        }

        debug!(body = %details, "Telegram API response");
        Ok(NotifyResult::success())
    }

    fn name(&self) -> &str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }
}

// ============================================================================
// 微信推送（表单 webhook）
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeChatConfig {
    pub api_url: String,
    pub token: String,
}

pub struct WeChatNotifier {
    config: WeChatConfig,
    client: reqwest::Client,
}

impl WeChatNotifier {
    pub fn new(config: WeChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn build_form<'a>(&'a self, message: &'a NotifyMessage) -> [(&'static str, &'a str); 3] {
        [
            ("title", message.title.as_str()),
            ("content", message.content.as_str()),
            ("token", self.config.token.as_str()),
        ]
    }
}

#[async_trait]
impl Notifier for WeChatNotifier {
    /// 推送失败只记录日志，不中断广播
    async fn send(&self, message: &NotifyMessage) -> Result<NotifyResult> {
        if !self.is_enabled() {
            info!("WeChat API URL or token not configured, skipping");
            return Ok(NotifyResult::failure("WeChat is not configured"));
        }

        debug!(
            url = %self.config.api_url,
            title = %message.title,
            text_length = message.content.len(),
            "Sending WeChat message"
        );

        let response = match self
            .client
            .post(&self.config.api_url)
            .form(&self.build_form(message))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Failed to send WeChat message");
                return Ok(NotifyResult::failure(format!("WeChat request failed: {}", e)));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            debug!(body = %body, "WeChat API response");
            Ok(NotifyResult::success())
        } else {
            error!(%status, body = %body, "WeChat API returned error");
            Ok(NotifyResult::failure(format!("WeChat failed: {}", status)))
        }
    }

    fn name(&self) -> &str {
        "wechat"
    }

    fn is_enabled(&self) -> bool {
        !self.config.api_url.is_empty() && !self.config.token.is_empty()
    }
}
