use chrono::{DateTime, FixedOffset, Utc};
use domwatch_notify::NotifyMessage;
use serde::{Deserialize, Serialize};

const HEADER: &str = "*🔔 Domains-Support 通知*";

pub const OFFLINE_TITLE: &str = "域名服务离线告警";
pub const EXPIRING_TITLE: &str = "域名即将过期提醒";

/// 即将到期的域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringDomain {
    pub domain: String,
    #[serde(rename = "remainingDays")]
    pub remaining_days: i64,
    pub expiry_date: String,
}

fn format_time(now: DateTime<FixedOffset>) -> String {
    now.format("%Y/%-m/%-d %H:%M:%S").to_string()
}

fn render(title: &str, intro: &str, details: &str, now: DateTime<FixedOffset>) -> String {
    format!(
        "{HEADER}\n\n⚠️ *{title}*\n\n{intro}\n{details}\n\n⏰ 时间：{}",
        format_time(now)
    )
}

/// 离线告警
pub fn offline_alert(domains: &[String], now: DateTime<FixedOffset>) -> NotifyMessage {
    let details = domains
        .iter()
        .map(|d| format!("`{}`", d))
        .collect::<Vec<_>>()
        .join("\n");

    let content = render(OFFLINE_TITLE, "以下域名无法访问，请立即检查：", &details, now);

    NotifyMessage::warning(OFFLINE_TITLE, content)
        .with_timestamp(now.with_timezone(&Utc))
        .with_metadata(serde_json::json!({ "domains": domains }))
}

/// 到期提醒
pub fn expiry_alert(
    domains: &[ExpiringDomain],
    window_days: i32,
    now: DateTime<FixedOffset>,
) -> NotifyMessage {
    let details = domains
        .iter()
        .map(|d| {
            format!(
                "`{}` (还剩 {} 天, {})",
                d.domain, d.remaining_days, d.expiry_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let intro = format!("以下域名即将在 {} 天内过期，请及时续费：", window_days);
    let content = render(EXPIRING_TITLE, &intro, &details, now);

    NotifyMessage::warning(EXPIRING_TITLE, content)
        .with_timestamp(now.with_timezone(&Utc))
        .with_metadata(serde_json::json!({ "domains": domains }))
}
