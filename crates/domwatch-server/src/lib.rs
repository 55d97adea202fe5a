pub mod api;
pub mod auth;
pub mod config;
pub mod metrics;
pub mod response;

use domwatch_core::Checker;
use std::sync::Arc;

pub use api::create_router;
pub use config::AppConfig;

pub struct AppState {
    pub checker: Arc<Checker>,
    /// 批量检查接口的访问令牌
    pub api_token: Option<String>,
}
