use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// 初始化 Prometheus metrics exporter
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_metrics();

    tracing::info!("Metrics exporter started on http://{}/metrics", addr);
    Ok(())
}

/// 描述所有指标
fn describe_metrics() {
    domwatch_core::metrics::describe_metrics();
    describe_counter!(
        "domwatch_http_requests_total",
        "Total number of HTTP requests by route"
    );
}

/// 记录 HTTP 请求
pub fn record_http_request(route: &'static str) {
    counter!("domwatch_http_requests_total", 1, "route" => route);
}
