use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

pub const MSG_DONE: &str = "检查完成";
pub const MSG_BAD_DOMAINS: &str = "请求参数错误, 需要提供一个包含域名的数组";
pub const MSG_BAD_DOMAIN: &str = "请求参数错误, 需要提供域名";
pub const MSG_UNAUTHORIZED: &str = "未授权访问";

/// 统一响应体：`{ status, message, data }`，`status` 与 HTTP 状态码一致
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    #[serde(skip)]
    code: StatusCode,
    status: u16,
    message: String,
    data: Value,
}

impl ApiResponse {
    pub fn new(code: StatusCode, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            status: code.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn ok<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::new(StatusCode::OK, MSG_DONE, data),
            Err(e) => Self::internal(format!("序列化失败: {}", e)),
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self::new(code, message, Value::Null)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::error(StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}
