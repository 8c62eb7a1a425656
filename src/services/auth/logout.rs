use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::cache::SessionCache;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
/// 清除客户端 refresh_token cookie，并让本次 access token 的会话缓存失效
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    // 该接口在会话中间件之后，Authorization 头一定带着 Bearer token
    if let Some(token) = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        && let Some(cache) = request.app_data::<web::Data<SessionCache>>()
    {
        cache.remove(token).await;
    }

    // 创建空的 refresh_token cookie（max_age=0 会让浏览器删除该 cookie）
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}
