//! 批量检查：读取告警配置 → 查询开启提醒的域名 → 分批探测并回写状态 →
//! 归类（离线 / 即将到期）→ 发送告警。

use crate::alert::{self, ExpiringDomain};
use crate::entity::{AlertConfig, DomainRecord};
use crate::error::DomwatchError;
use crate::expiry;
use crate::metrics;
use crate::probe::Prober;
use crate::status::DomainStatus;
use crate::store::DomainStore;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use domwatch_notify::providers::DEFAULT_TELEGRAM_API_BASE;
use domwatch_notify::{
    NotifyChannel, NotifyManager, NotifyMessage, TelegramConfig, TelegramNotifier, WeChatConfig,
    WeChatNotifier,
};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 20;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("未找到告警配置")]
    ConfigMissing,

    #[error(transparent)]
    Store(#[from] DomwatchError),
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// 每批并发探测的域名数
    pub batch_size: usize,
    /// 告警时间所用的时区（小时）；到期天数按 UTC 日期计算
    pub utc_offset_hours: i32,
    pub telegram_api_base: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            utc_offset_hours: 8,
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
        }
    }
}

impl CheckOptions {
    /// 超出范围的偏移退回 UTC
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours.saturating_mul(3600))
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub total_domains: usize,
    /// 到期提醒已成功派发的域名
    pub notified_domains: Vec<ExpiringDomain>,
    pub offline_domains: Vec<String>,
}

/// 单个域名的检查结果
#[derive(Debug)]
struct DomainOutcome {
    domain: String,
    offline_alert: bool,
    expiring: Option<ExpiringDomain>,
}

pub struct Checker {
    store: Arc<dyn DomainStore>,
    prober: Arc<dyn Prober>,
    options: CheckOptions,
}

impl Checker {
    pub fn new(store: Arc<dyn DomainStore>, prober: Arc<dyn Prober>, options: CheckOptions) -> Self {
        Self {
            store,
            prober,
            options,
        }
    }

    pub fn prober(&self) -> &Arc<dyn Prober> {
        &self.prober
    }

    pub async fn run(&self, names: &[String]) -> Result<CheckReport, CheckError> {
        metrics::record_check();

        let config = self
            .store
            .alert_config()
            .await?
            .ok_or(CheckError::ConfigMissing)?;
        info!(
            days = config.days,
            has_token = config.telegram().is_some(),
            has_wechat = config.wechat().is_some(),
            "Loaded alert config"
        );

        let domains = self.store.notifiable_domains(names).await?;
        info!("Found {} domains with notifications enabled", domains.len());

        let today = expiry::today_in(Utc.fix());
        let batch_size = self.options.batch_size.max(1);

        let mut offline = Vec::new();
        let mut expiring = Vec::new();

        for (index, batch) in domains.chunks(batch_size).enumerate() {
            let start = index * batch_size;
            info!(
                "Processing domains {} to {}",
                start + 1,
                start + batch.len()
            );

            let outcomes = join_all(
                batch
                    .iter()
                    .map(|domain| self.check_domain(domain, &config, today)),
            )
            .await;

            for outcome in outcomes {
                let outcome = outcome?;
                if outcome.offline_alert {
                    offline.push(outcome.domain);
                }
                if let Some(item) = outcome.expiring {
                    expiring.push(item);
                }
            }
        }

        let notifier = self.notify_manager(&config);
        let now = Utc::now().with_timezone(&self.options.utc_offset());

        if !offline.is_empty() {
            let message = alert::offline_alert(&offline, now);
            self.dispatch(&notifier, &message, "offline", offline.len()).await;
        }

        let mut notified_domains = Vec::new();
        if !expiring.is_empty() {
            let message = alert::expiry_alert(&expiring, config.days, now);
            if self.dispatch(&notifier, &message, "expiry", expiring.len()).await {
                notified_domains = expiring;
            }
        }

        Ok(CheckReport {
            total_domains: domains.len(),
            notified_domains,
            offline_domains: offline,
        })
    }

    async fn check_domain(
        &self,
        domain: &DomainRecord,
        config: &AlertConfig,
        today: NaiveDate,
    ) -> Result<DomainOutcome, DomwatchError> {
        let remaining = expiry::remaining_days(&domain.expiry_date, today);
        match remaining {
            Some(days) => info!(
                "Checking {}: expires {}, {} days remaining",
                domain.domain, domain.expiry_date, days
            ),
            None => warn!(
                "Checking {}: unparseable expiry date {:?}",
                domain.domain, domain.expiry_date
            ),
        }

        let status = DomainStatus::from_online(self.prober.is_online(&domain.domain).await);

        // 状态写入失败会中止整个检查，不再发送告警
        if let Err(e) = self.store.update_status(&domain.domain, status).await {
            metrics::record_status_write_failure();
            error!("Failed to update status of {}: {}", domain.domain, e);
            return Err(e);
        }

        let expiring = remaining
            .filter(|days| *days <= i64::from(config.days) && domain.expiry_alerts_enabled())
            .map(|days| ExpiringDomain {
                domain: domain.domain.clone(),
                remaining_days: days,
                expiry_date: domain.expiry_date.clone(),
            });

        Ok(DomainOutcome {
            domain: domain.domain.clone(),
            offline_alert: !status.is_online() && domain.offline_alerts_enabled(),
            expiring,
        })
    }

    /// 根据告警配置组装通知渠道
    pub fn notify_manager(&self, config: &AlertConfig) -> NotifyManager {
        let mut manager = NotifyManager::default();

        if let Some((token, chat_id)) = config.telegram() {
            manager.register(
                NotifyChannel::Telegram,
                Box::new(TelegramNotifier::new(
                    TelegramConfig::new(token, chat_id)
                        .with_api_base(self.options.telegram_api_base.clone()),
                )),
            );
        }
        if let Some((api_url, token)) = config.wechat() {
            manager.register(
                NotifyChannel::WeChat,
                Box::new(WeChatNotifier::new(WeChatConfig {
                    api_url: api_url.to_string(),
                    token: token.to_string(),
                })),
            );
        }

        manager
    }

    /// 发送失败只记录日志；返回是否未出现中断性错误
    async fn dispatch(
        &self,
        manager: &NotifyManager,
        message: &NotifyMessage,
        kind: &'static str,
        count: usize,
    ) -> bool {
        match manager.broadcast(message).await {
            Ok(delivered) => {
                for channel in delivered {
                    info!(
                        "Sent {} alert for {} domains via {}",
                        kind,
                        count,
                        channel.as_str()
                    );
                }
                metrics::record_notification(kind, true);
                true
            }
            Err(e) => {
                error!("Failed to send {} alert: {}", kind, e);
                metrics::record_notification(kind, false);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryStore {
        config: Option<AlertConfig>,
        domains: Vec<DomainRecord>,
        writes: Mutex<Vec<(String, DomainStatus)>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl DomainStore for MemoryStore {
        async fn alert_config(&self) -> Result<Option<AlertConfig>> {
            Ok(self.config.clone())
        }

        async fn notifiable_domains(&self, names: &[String]) -> Result<Vec<DomainRecord>> {
            Ok(self
                .domains
                .iter()
                .filter(|d| names.contains(&d.domain))
                .filter(|d| d.tgsend == 1 || d.st_tgsend == 1)
                .cloned()
                .collect())
        }

        async fn update_status(&self, domain: &str, status: DomainStatus) -> Result<()> {
            if self.fail_writes {
                return Err(DomwatchError::Internal("disk full".to_string()));
            }
            self.writes.lock().unwrap().push((domain.to_string(), status));
            Ok(())
        }
    }

    struct StaticProber(HashMap<String, bool>);

    #[async_trait]
    impl Prober for StaticProber {
        async fn is_online(&self, host: &str) -> bool {
            self.0.get(host).copied().unwrap_or(false)
        }
    }

    fn config() -> AlertConfig {
        AlertConfig {
            id: 1,
            tg_token: None,
            tg_userid: None,
            wx_api: None,
            wx_token: None,
            days: 30,
        }
    }

    fn record(id: i32, domain: &str, expiry: &str, tgsend: i32, st_tgsend: i32) -> DomainRecord {
        DomainRecord {
            id,
            domain: domain.to_string(),
            registrar: None,
            status: None,
            expiry_date: expiry.to_string(),
            tgsend,
            st_tgsend,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn checker(store: MemoryStore, online: &[(&str, bool)], batch_size: usize) -> (Checker, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let prober = StaticProber(online.iter().map(|(h, o)| (h.to_string(), *o)).collect());
        let options = CheckOptions {
            batch_size,
            ..CheckOptions::default()
        };
        (
            Checker::new(store.clone(), Arc::new(prober), options),
            store,
        )
    }

    fn days_from_today(days: i64) -> String {
        let today = expiry::today_in(Utc.fix());
        (today + chrono::Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[tokio::test]
    async fn test_missing_config() {
        let (checker, _) = checker(
            MemoryStore {
                config: None,
                domains: vec![],
                writes: Mutex::new(vec![]),
                fail_writes: false,
            },
            &[],
            20,
        );

        let err = checker.run(&names(&["a.com"])).await.unwrap_err();
        assert!(matches!(err, CheckError::ConfigMissing));
    }

    #[tokio::test]
    async fn test_classification_respects_switches() {
        let soon = days_from_today(5);
        let later = days_from_today(90);
        let (checker, store) = checker(
            MemoryStore {
                config: Some(config()),
                domains: vec![
                    record(1, "down-watched.com", &later, 0, 1),
                    record(2, "down-unwatched.com", &soon, 0, 0),
                    record(3, "expiring.com", &soon, 1, 0),
                    record(4, "expiring-off.com", &soon, 0, 1),
                    record(5, "healthy.com", &later, 1, 1),
                ],
                writes: Mutex::new(vec![]),
                fail_writes: false,
            },
            &[
                ("expiring.com", true),
                ("expiring-off.com", true),
                ("healthy.com", true),
            ],
            2,
        );

        let report = checker
            .run(&names(&[
                "down-watched.com",
                "down-unwatched.com",
                "expiring.com",
                "expiring-off.com",
                "healthy.com",
            ]))
            .await
            .unwrap();

        // down-unwatched.com 两个开关都关闭，不会被查出
        assert_eq!(report.total_domains, 4);
        assert_eq!(report.offline_domains, vec!["down-watched.com".to_string()]);
        assert_eq!(report.notified_domains.len(), 1);
        assert_eq!(report.notified_domains[0].domain, "expiring.com");
        assert_eq!(report.notified_domains[0].remaining_days, 5);

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 4);
        assert!(writes.contains(&("down-watched.com".to_string(), DomainStatus::Offline)));
        assert!(writes.contains(&("healthy.com".to_string(), DomainStatus::Online)));
    }

    #[tokio::test]
    async fn test_status_write_failure_fails_check() {
        let (checker, _) = checker(
            MemoryStore {
                config: Some(config()),
                domains: vec![record(1, "a.com", &days_from_today(1), 1, 1)],
                writes: Mutex::new(vec![]),
                fail_writes: true,
            },
            &[],
            20,
        );

        let err = checker.run(&names(&["a.com"])).await.unwrap_err();
        assert!(matches!(err, CheckError::Store(DomwatchError::Internal(_))));
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_remaining_days_ignore_report_offset() {
        // +14 与 -12 相差 26 小时，任一时刻至少有一个与 UTC 不在同一天
        for offset in [14, -12] {
            let store = MemoryStore {
                config: Some(config()),
                domains: vec![record(1, "a.com", &days_from_today(1), 1, 0)],
                writes: Mutex::new(vec![]),
                fail_writes: false,
            };
            let checker = Checker::new(
                Arc::new(store),
                Arc::new(StaticProber(HashMap::new())),
                CheckOptions {
                    utc_offset_hours: offset,
                    ..CheckOptions::default()
                },
            );

            let report = checker.run(&names(&["a.com"])).await.unwrap();
            assert_eq!(report.notified_domains.len(), 1);
            assert_eq!(report.notified_domains[0].remaining_days, 1);
        }
    }

    #[tokio::test]
    async fn test_unparseable_expiry_is_not_expiring() {
        let (checker, _) = checker(
            MemoryStore {
                config: Some(config()),
                domains: vec![record(1, "a.com", "unknown", 1, 0)],
                writes: Mutex::new(vec![]),
                fail_writes: false,
            },
            &[("a.com", true)],
            20,
        );

        let report = checker.run(&names(&["a.com"])).await.unwrap();
        assert_eq!(report.total_domains, 1);
        assert!(report.notified_domains.is_empty());
    }

    #[test]
    fn test_utc_offset_fallback() {
        let options = CheckOptions {
            utc_offset_hours: 99,
            ..CheckOptions::default()
        };
        assert_eq!(options.utc_offset().local_minus_utc(), 0);
        assert_eq!(CheckOptions::default().utc_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_notify_manager_from_config() {
        let (checker, _) = checker(
            MemoryStore {
                config: None,
                domains: vec![],
                writes: Mutex::new(vec![]),
                fail_writes: false,
            },
            &[],
            20,
        );

        let mut cfg = config();
        assert!(checker.notify_manager(&cfg).enabled_channels().is_empty());

        cfg.tg_token = Some("token".to_string());
        cfg.tg_userid = Some("  ".to_string());
        cfg.wx_api = Some("https://push.example.com".to_string());
        cfg.wx_token = Some("wx".to_string());
        assert_eq!(
            checker.notify_manager(&cfg).enabled_channels(),
            vec![NotifyChannel::WeChat]
        );
    }
}
