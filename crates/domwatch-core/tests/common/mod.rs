#![allow(dead_code)]

use axum::Router;
use chrono::Offset;
use domwatch_core::entity::{alertcfg, domains};
use domwatch_core::store::ensure_schema;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::net::SocketAddr;

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    ensure_schema(&db).await.expect("Failed to create tables");
    db
}

pub async fn insert_config(
    db: &DatabaseConnection,
    days: i32,
    telegram: Option<(&str, &str)>,
    wechat: Option<(&str, &str)>,
) {
    alertcfg::ActiveModel {
        tg_token: Set(telegram.map(|(t, _)| t.to_string())),
        tg_userid: Set(telegram.map(|(_, u)| u.to_string())),
        wx_api: Set(wechat.map(|(a, _)| a.to_string())),
        wx_token: Set(wechat.map(|(_, t)| t.to_string())),
        days: Set(days),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert alert config");
}

pub async fn insert_domain(
    db: &DatabaseConnection,
    domain: &str,
    expiry_date: &str,
    tgsend: i32,
    st_tgsend: i32,
) {
    domains::ActiveModel {
        domain: Set(domain.to_string()),
        registrar: Set(None),
        status: Set(None),
        expiry_date: Set(expiry_date.to_string()),
        tgsend: Set(tgsend),
        st_tgsend: Set(st_tgsend),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert domain");
}

/// 在随机端口上启动一个 axum 服务
pub async fn spawn(app: Router) -> SocketAddr {
    let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

pub fn days_from_today(days: i64) -> String {
    let today = domwatch_core::expiry::today_in(chrono::Utc.fix());
    (today + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
