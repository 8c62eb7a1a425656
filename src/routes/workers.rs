use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::workers::requests::{WorkerCodeQuery, WorkerResultsRequest};
use crate::services::WorkerService;

// 懒加载的全局 WorkerService 实例
static WORKER_SERVICE: Lazy<WorkerService> = Lazy::new(WorkerService::new_lazy);

pub async fn get_code(
    req: HttpRequest,
    query: web::Query<WorkerCodeQuery>,
) -> ActixResult<HttpResponse> {
    WORKER_SERVICE.get_code(&req, query.into_inner()).await
}

pub async fn post_results(
    req: HttpRequest,
    body: web::Json<WorkerResultsRequest>,
) -> ActixResult<HttpResponse> {
    WORKER_SERVICE.post_results(&req, body.into_inner()).await
}

// 配置路由
//
// 评测机凭提交键 + 一次性令牌访问，不走会话中间件。
pub fn configure_worker_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/worker")
            .route("/code", web::get().to(get_code))
            .route("/results", web::post().to(post_results)),
    );
}
