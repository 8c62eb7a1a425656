use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WorkerService, authenticate_submission};
use crate::models::workers::requests::WorkerResultsRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 评测机回传结果，原样落库，重复回传后写覆盖先写
pub async fn handle_post_results(
    service: &WorkerService,
    request: &HttpRequest,
    body: WorkerResultsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match authenticate_submission(&storage, &body.submission_key, &body.token).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to query submission: {e}"),
                )),
            );
        }
    }

    match storage.post_results(&body.submission_key, body.results).await {
        Ok(submission) => {
            tracing::info!("提交 {} 的评测结果已入库", submission.submission_key);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Submission results accepted",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to store results: {e}"),
            )),
        ),
    }
}
