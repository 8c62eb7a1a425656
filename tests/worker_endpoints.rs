//! 评测机回调接口测试
//!
//! GET /api/v1/worker/code 与 POST /api/v1/worker/results 的
//! 参数缺失 / 未知提交 / 令牌错误 / 正常流程矩阵。

use std::sync::Arc;

use actix_web::{App, test, web};
use migration::{Migrator, MigratorTrait};
use once_cell::sync::Lazy;
use sea_orm::Database;
use tempfile::TempDir;

use autograder::config::AppConfig;
use autograder::models::assignments::entities::UNLIMITED_SUBMISSIONS;
use autograder::models::submissions::entities::NewSubmission;
use autograder::models::users::requests::CreateUserRequest;
use autograder::routes::configure_worker_routes;
use autograder::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use autograder::utils::archive::submission_archive_path;
use autograder::utils::password::hash_password;

const FAKE_ARCHIVE: &[u8] = b"PK\x03\x04fake-zip-bytes";

// 归档目录指向临时目录，必须在配置初始化之前设好环境变量
static SUBMISSIONS_TMP: Lazy<TempDir> = Lazy::new(|| {
    let dir = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var("SUBMISSIONS_DIR", dir.path());
    }
    AppConfig::init(Some("config.example.yaml")).ok();
    dir
});

async fn test_storage() -> Arc<dyn Storage> {
    Lazy::force(&SUBMISSIONS_TMP);
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db))
}

/// 建出一条有归档文件的提交
async fn seed_submission(storage: &Arc<dyn Storage>) -> NewSubmission {
    let teacher = storage
        .create_user(CreateUserRequest {
            username: "teacher".to_string(),
            password: hash_password("hunter2-secret").unwrap(),
        })
        .await
        .unwrap();
    let unit = storage.create_unit("Intro to CS", teacher.id).await.unwrap();
    let project = storage
        .create_project("week1", "python3", "aaaa-bbbb-cccc", teacher.id)
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(unit.id, project.id, teacher.id, None, UNLIMITED_SUBMISSIONS)
        .await
        .unwrap();
    let new_submission = storage
        .create_submission(assignment.id, teacher.id)
        .await
        .unwrap();

    std::fs::write(
        submission_archive_path(&new_submission.submission.submission_key),
        FAKE_ARCHIVE,
    )
    .unwrap();

    new_submission
}

macro_rules! worker_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .configure(configure_worker_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_get_code_missing_params() {
    let storage = test_storage().await;
    let app = worker_app!(storage);

    for uri in [
        "/api/v1/worker/code",
        "/api/v1/worker/code?submission_key=abc",
        "/api/v1/worker/code?token=xyz",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "expected 400 for {uri}");
    }
}

#[actix_web::test]
async fn test_get_code_unknown_submission() {
    let storage = test_storage().await;
    let app = worker_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/worker/code?submission_key=no-such-key&token=whatever")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_get_code_wrong_token() {
    let storage = test_storage().await;
    let new_submission = seed_submission(&storage).await;
    let app = worker_app!(storage);

    let uri = format!(
        "/api/v1/worker/code?submission_key={}&token=definitely-wrong",
        new_submission.submission.submission_key
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_get_code_returns_archive() {
    let storage = test_storage().await;
    let new_submission = seed_submission(&storage).await;
    let app = worker_app!(storage);

    let uri = format!(
        "/api/v1/worker/code?submission_key={}&token={}",
        new_submission.submission.submission_key, new_submission.token
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/zip"
    );

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], FAKE_ARCHIVE);
}

#[actix_web::test]
async fn test_post_results_missing_fields() {
    let storage = test_storage().await;
    let new_submission = seed_submission(&storage).await;
    let app = worker_app!(storage);

    // 每个必填字段缺一次
    for body in [
        serde_json::json!({
            "token": new_submission.token,
            "results": {"score": 0},
        }),
        serde_json::json!({
            "submission_key": new_submission.submission.submission_key,
            "results": {"score": 0},
        }),
        serde_json::json!({
            "submission_key": new_submission.submission.submission_key,
            "token": new_submission.token,
        }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/worker/results")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "expected 400 for body {body}");
    }
}

#[actix_web::test]
async fn test_post_results_non_json_body() {
    let storage = test_storage().await;
    let app = worker_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/worker/results")
        .insert_header(("content-type", "application/json"))
        .set_payload("this is not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_post_results_wrong_token() {
    let storage = test_storage().await;
    let new_submission = seed_submission(&storage).await;
    let app = worker_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/worker/results")
        .set_json(serde_json::json!({
            "submission_key": new_submission.submission.submission_key,
            "token": "definitely-wrong",
            "results": {"score": 0},
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_post_results_accepted_and_stored() {
    let storage = test_storage().await;
    let new_submission = seed_submission(&storage).await;
    let key = new_submission.submission.submission_key.clone();
    let app = worker_app!(storage);

    let results = serde_json::json!({"score": 95, "passed": 19, "failed": 1});
    let req = test::TestRequest::post()
        .uri("/api/v1/worker/results")
        .set_json(serde_json::json!({
            "submission_key": key,
            "token": new_submission.token,
            "results": results,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let stored = storage.get_submission_by_key(&key).await.unwrap().unwrap();
    assert_eq!(stored.results, Some(results));
    assert!(stored.results_at.is_some());
}
