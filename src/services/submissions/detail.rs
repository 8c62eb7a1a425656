use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_detail(
    service: &SubmissionService,
    request: &HttpRequest,
    user_id: i64,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_submission_by_id(submission_id).await {
        // 只允许看自己的提交，别人的提交当不存在处理
        Ok(Some(submission)) if submission.user_id == user_id => Ok(HttpResponse::Ok().json(
            ApiResponse::success(submission, "Submission retrieved successfully"),
        )),
        Ok(_) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to query submission: {e}"),
            )),
        ),
    }
}
