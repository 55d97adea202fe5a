use metrics::{counter, describe_counter};

/// 描述所有指标
pub fn describe_metrics() {
    describe_counter!("domwatch_checks_total", "Total number of batch checks executed");
    describe_counter!(
        "domwatch_probes_total",
        "Total number of reachability probes by result"
    );
    describe_counter!(
        "domwatch_status_write_failures_total",
        "Total number of failed status write-backs"
    );
    describe_counter!(
        "domwatch_notifications_total",
        "Total number of alert dispatches by kind and result"
    );
}

/// 记录一次批量检查
pub fn record_check() {
    counter!("domwatch_checks_total", 1);
}

/// 记录探测结果
pub fn record_probe(online: bool) {
    let result = if online { "online" } else { "offline" };
    counter!("domwatch_probes_total", 1, "result" => result);
}

/// 记录状态回写失败
pub fn record_status_write_failure() {
    counter!("domwatch_status_write_failures_total", 1);
}

/// 记录告警发送
pub fn record_notification(kind: &'static str, success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("domwatch_notifications_total", 1, "kind" => kind, "result" => result);
}
