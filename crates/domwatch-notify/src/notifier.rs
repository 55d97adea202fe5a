use crate::message::NotifyMessage;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// 通知结果
#[derive(Debug, Clone)]
pub struct NotifyResult {
    pub success: bool,
    pub message: String,
}

impl NotifyResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: "Notification sent successfully".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 通知渠道返回的硬错误，会中断本次广播
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("{channel} is not configured")]
    NotConfigured { channel: &'static str },

    #[error("Failed to send {channel} message: {status}, Details: {details}")]
    Rejected {
        channel: &'static str,
        status: reqwest::StatusCode,
        details: String,
    },
}

/// 通知器 trait
///
/// `Err` 表示应当中断后续渠道的失败；可容忍的失败以
/// `NotifyResult::failure` 返回。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 发送通知
    async fn send(&self, message: &NotifyMessage) -> Result<NotifyResult>;

    /// 通知器名称
    fn name(&self) -> &str;

    /// 是否启用
    fn is_enabled(&self) -> bool {
        true
    }
}
