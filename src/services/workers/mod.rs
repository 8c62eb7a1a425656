pub mod code;
pub mod results;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::entities::Submission;
use crate::models::workers::requests::{WorkerCodeQuery, WorkerResultsRequest};
use crate::storage::Storage;
use crate::utils::password::verify_password;

/// 评测机回调服务
///
/// 不走会话认证：评测机凭提交键 + 一次性令牌访问，令牌校验失败一律按
/// 不存在处理，避免向外泄露提交键是否有效。
pub struct WorkerService {
    storage: Option<Arc<dyn Storage>>,
}

impl WorkerService {
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

    // 评测机取回提交代码
    pub async fn get_code(
        &self,
        request: &HttpRequest,
        query: WorkerCodeQuery,
    ) -> ActixResult<HttpResponse> {
        code::handle_get_code(self, request, query).await
    }

    // 评测机回传评测结果
    pub async fn post_results(
        &self,
        request: &HttpRequest,
        body: WorkerResultsRequest,
    ) -> ActixResult<HttpResponse> {
        results::handle_post_results(self, request, body).await
    }
}

/// 按提交键查找并校验令牌，不匹配时返回 None
pub(crate) async fn authenticate_submission(
    storage: &Arc<dyn Storage>,
    submission_key: &str,
    token: &str,
) -> crate::errors::Result<Option<Submission>> {
    match storage.get_submission_by_key(submission_key).await? {
        Some(submission) if verify_password(token, &submission.token_hash) => Ok(Some(submission)),
        _ => Ok(None),
    }
}
