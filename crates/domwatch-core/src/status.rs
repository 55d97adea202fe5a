use serde::{Deserialize, Serialize};
use std::fmt;

/// 域名连通状态，序列化为 `domains.status` 中使用的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStatus {
    #[serde(rename = "在线")]
    Online,
    #[serde(rename = "离线")]
    Offline,
}

impl DomainStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            DomainStatus::Online
        } else {
            DomainStatus::Offline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DomainStatus::Online => "在线",
            DomainStatus::Offline => "离线",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, DomainStatus::Online)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
