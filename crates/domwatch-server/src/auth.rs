use axum::http::{header, HeaderMap};

/// 请求携带的令牌：查询参数 `token` 优先，其次 `Authorization: Bearer`
pub fn request_token<'a>(query_token: Option<&'a str>, headers: &'a HeaderMap) -> Option<&'a str> {
    query_token.filter(|t| !t.is_empty()).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
            .filter(|t| !t.is_empty())
    })
}

/// 未配置令牌时一律拒绝
pub fn is_authorized(expected: Option<&str>, query_token: Option<&str>, headers: &HeaderMap) -> bool {
    let expected = match expected.filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => {
            tracing::warn!("auth.api_token is not configured; rejecting check request");
            return false;
        }
    };

    request_token(query_token, headers) == Some(expected)
}
