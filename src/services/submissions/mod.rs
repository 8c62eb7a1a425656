pub mod create;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::AutograderError;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::queue::WorkerQueue;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_queue(&self, request: &HttpRequest) -> Arc<dyn WorkerQueue> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn WorkerQueue>>>()
            .expect("Worker queue not found in app data")
            .get_ref()
            .clone()
    }

    // 创建提交（multipart 上传 + 归档 + 投递评测）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        user_id: i64,
        payload: actix_multipart::Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create(self, request, user_id, payload).await
    }

    // 列出当前用户的提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        user_id: i64,
        query: SubmissionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list(self, request, user_id, query).await
    }

    // 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        user_id: i64,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::handle_detail(self, request, user_id, submission_id).await
    }
}

/// 把存储层的领域错误翻译成 HTTP 响应
pub(crate) fn domain_error_response(err: &AutograderError) -> HttpResponse {
    match err {
        // NotFound 既可能是作业布置也可能是项目，统一用通用 404 码
        AutograderError::NotFound(_) => HttpResponse::NotFound().json(
            ApiResponse::<()>::error_empty(ErrorCode::NotFound, err.message()),
        ),
        AutograderError::Authorization(_) => HttpResponse::Forbidden().json(
            ApiResponse::<()>::error_empty(ErrorCode::UnitPermissionDenied, err.message()),
        ),
        AutograderError::Validation(_) => HttpResponse::BadRequest().json(
            ApiResponse::<()>::error_empty(ErrorCode::SubmissionLimitReached, err.message()),
        ),
        _ => HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
            ErrorCode::InternalServerError,
            err.message(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn response_code(resp: HttpResponse) -> i32 {
        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        parsed["code"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn test_domain_error_not_found_uses_generic_code() {
        // 缺作业布置和缺项目都走 NotFound，业务码必须是通用 404
        for message in ["作业布置 42 不存在", "项目 7 不存在"] {
            let resp = domain_error_response(&AutograderError::not_found(message));
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            assert_eq!(response_code(resp).await, ErrorCode::NotFound as i32);
        }
    }

    #[tokio::test]
    async fn test_domain_error_authorization_and_validation() {
        let resp = domain_error_response(&AutograderError::authorization("未注册"));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response_code(resp).await,
            ErrorCode::UnitPermissionDenied as i32
        );

        let resp = domain_error_response(&AutograderError::validation("超过提交上限"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_code(resp).await,
            ErrorCode::SubmissionLimitReached as i32
        );
    }
}
