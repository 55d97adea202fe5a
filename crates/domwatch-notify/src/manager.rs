use crate::message::{NotifyChannel, NotifyLevel, NotifyMessage};
use crate::notifier::Notifier;
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{error, info};

/// 通知管理器
pub struct NotifyManager {
    /// 通知器列表，按渠道顺序广播
    notifiers: BTreeMap<NotifyChannel, Box<dyn Notifier>>,

    /// 最小通知级别
    min_level: NotifyLevel,
}

impl NotifyManager {
    pub fn new(min_level: NotifyLevel) -> Self {
        Self {
            notifiers: BTreeMap::new(),
            min_level,
        }
    }

    /// 注册通知器，同一渠道重复注册时覆盖
    pub fn register(&mut self, channel: NotifyChannel, notifier: Box<dyn Notifier>) {
        info!("Registered notifier: {}", notifier.name());
        self.notifiers.insert(channel, notifier);
    }

    /// 已启用的渠道
    pub fn enabled_channels(&self) -> Vec<NotifyChannel> {
        self.notifiers
            .iter()
            .filter(|(_, notifier)| notifier.is_enabled())
            .map(|(channel, _)| *channel)
            .collect()
    }

    /// 发送通知到指定渠道
    pub async fn send(&self, channel: NotifyChannel, message: &NotifyMessage) -> Result<bool> {
        if !self.should_notify(&message.level) {
            return Ok(false);
        }

        match self.notifiers.get(&channel) {
            Some(notifier) if notifier.is_enabled() => {
                let result = notifier.send(message).await?;
                if result.success {
                    info!("Notification sent via {}: {}", notifier.name(), message.title);
                } else {
                    error!("Notification failed via {}: {}", notifier.name(), result.message);
                }
                Ok(result.success)
            }
            _ => Ok(false),
        }
    }

    /// 按渠道顺序发送到所有已启用的渠道
    ///
    /// 任一渠道返回 `Err` 时立即停止，后续渠道不再发送。
    /// 返回成功投递的渠道。
    pub async fn broadcast(&self, message: &NotifyMessage) -> Result<Vec<NotifyChannel>> {
        let mut delivered = Vec::new();

        for channel in self.enabled_channels() {
            if self.send(channel, message).await? {
                delivered.push(channel);
            }
        }

        Ok(delivered)
    }

    /// 检查是否应该发送通知
    fn should_notify(&self, level: &NotifyLevel) -> bool {
        *level >= self.min_level
    }
}

impl Default for NotifyManager {
    fn default() -> Self {
        Self::new(NotifyLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NotifyResult;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, _message: &NotifyMessage) -> Result<NotifyResult> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                anyhow::bail!("{} down", self.name);
            }
            Ok(NotifyResult::success())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn manager_with(fail_telegram: bool) -> (NotifyManager, Arc<Mutex<Vec<&'static str>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = NotifyManager::default();
        // 故意先注册 WeChat，广播顺序仍以渠道为准
        manager.register(
            NotifyChannel::WeChat,
            Box::new(Recording {
                name: "wechat",
                log: log.clone(),
                fail: false,
            }),
        );
        manager.register(
            NotifyChannel::Telegram,
            Box::new(Recording {
                name: "telegram",
                log: log.clone(),
                fail: fail_telegram,
            }),
        );
        (manager, log)
    }

    #[test]
    fn test_should_notify() {
        let manager = NotifyManager::new(NotifyLevel::Warning);

        let message = NotifyMessage::warning("Test Warning", "This is a test warning message");
        assert!(manager.should_notify(&message.level));

        let info_message = NotifyMessage::info("Test Info", "This is a test info message");
        assert!(!manager.should_notify(&info_message.level));
    }

    #[tokio::test]
    async fn test_broadcast_in_channel_order() {
        let (manager, log) = manager_with(false);

        let delivered = manager
            .broadcast(&NotifyMessage::warning("t", "c"))
            .await
            .unwrap();

        assert_eq!(delivered, vec![NotifyChannel::Telegram, NotifyChannel::WeChat]);
        assert_eq!(*log.lock().unwrap(), vec!["telegram", "wechat"]);
    }

    #[tokio::test]
    async fn test_broadcast_stops_on_error() {
        let (manager, log) = manager_with(true);

        let result = manager.broadcast(&NotifyMessage::warning("t", "c")).await;

        assert!(result.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["telegram"]);
    }

    #[tokio::test]
    async fn test_broadcast_without_notifiers() {
        let manager = NotifyManager::default();
        let delivered = manager
            .broadcast(&NotifyMessage::warning("t", "c"))
            .await
            .unwrap();
        assert!(delivered.is_empty());
    }
}
