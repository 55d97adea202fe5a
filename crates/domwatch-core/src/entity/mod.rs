pub mod alertcfg;
pub mod domains;

/// `alertcfg` 表中的告警配置
pub type AlertConfig = alertcfg::Model;

/// `domains` 表中的一行
pub type DomainRecord = domains::Model;
