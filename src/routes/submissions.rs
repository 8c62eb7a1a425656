use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireSession, require_session::create_error_response};
use crate::models::submissions::requests::SubmissionListQuery;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn create_submission(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireSession::extract_user_id(&req) else {
        return Ok(create_error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized access, please login",
        ));
    };
    SUBMISSION_SERVICE
        .create_submission(&req, user_id, payload)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireSession::extract_user_id(&req) else {
        return Ok(create_error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized access, please login",
        ));
    };
    SUBMISSION_SERVICE
        .list_submissions(&req, user_id, query.into_inner())
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireSession::extract_user_id(&req) else {
        return Ok(create_error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized access, please login",
        ));
    };
    SUBMISSION_SERVICE
        .get_submission(&req, user_id, submission_id.into_inner())
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireSession)
            .route("", web::post().to(create_submission))
            .route("", web::get().to(list_submissions))
            .route("/{submission_id}", web::get().to(get_submission)),
    );
}
