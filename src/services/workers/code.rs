use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WorkerService, authenticate_submission};
use crate::models::workers::requests::WorkerCodeQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::archive::submission_archive_path;

/// 评测机按提交键 + 令牌取回代码归档
pub async fn handle_get_code(
    service: &WorkerService,
    request: &HttpRequest,
    query: WorkerCodeQuery,
) -> ActixResult<HttpResponse> {
    let (Some(submission_key), Some(token)) = (query.submission_key, query.token) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "submission_key and token are required",
        )));
    };

    let storage = service.get_storage(request);
    let submission = match authenticate_submission(&storage, &submission_key, &token).await {
        Ok(Some(submission)) => submission,
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
    };

    let archive = submission_archive_path(&submission.submission_key);
    match tokio::fs::read(&archive).await {
        Ok(bytes) => {
            let filename = format!("{}.zip", submission.submission_key);
            Ok(HttpResponse::Ok()
                .content_type("application/zip")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    ContentDisposition {
                        disposition: DispositionType::Attachment,
                        parameters: vec![DispositionParam::Filename(filename)],
                    },
                ))
                .body(bytes))
        }
        Err(e) => {
            // 记录落库了但归档丢了，对外仍按不存在处理
            tracing::error!(
                "提交 {} 的归档读取失败: {}",
                submission.submission_key,
                e
            );
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )))
        }
    }
}
