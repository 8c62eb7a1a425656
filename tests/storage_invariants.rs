//! 存储层领域约束测试
//!
//! 覆盖：创建者自动成为教师、教师才能布置作业、注册才能提交、
//! 提交上限、一次性令牌、评测结果回写。

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use autograder::config::AppConfig;
use autograder::errors::AutograderError;
use autograder::models::assignments::entities::UNLIMITED_SUBMISSIONS;
use autograder::models::registrations::entities::RegistrationRole;
use autograder::models::users::entities::User;
use autograder::models::users::requests::CreateUserRequest;
use autograder::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use autograder::utils::password::{hash_password, verify_password};

async fn test_storage() -> Arc<dyn Storage> {
    AppConfig::init(Some("config.example.yaml")).ok();
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db))
}

async fn add_user(storage: &Arc<dyn Storage>, username: &str) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            password: hash_password("hunter2-secret").unwrap(),
        })
        .await
        .unwrap()
}

/// 建好 用户(教师)/单元/项目/作业布置，返回 (教师, 单元ID, 作业ID)
async fn seed_assignment(
    storage: &Arc<dyn Storage>,
    max_submissions: i32,
) -> (User, i64, i64) {
    let teacher = add_user(storage, "teacher").await;
    let unit = storage.create_unit("Intro to CS", teacher.id).await.unwrap();
    let project = storage
        .create_project("week1", "python3", "11111111-2222-3333-4444-555555555555", teacher.id)
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(unit.id, project.id, teacher.id, None, max_submissions)
        .await
        .unwrap();
    (teacher, unit.id, assignment.id)
}

#[tokio::test]
async fn test_password_round_trip() {
    AppConfig::init(Some("config.example.yaml")).ok();
    let hash = hash_password("s3cret-password").unwrap();
    assert_ne!(hash, "s3cret-password");
    assert!(verify_password("s3cret-password", &hash));
    assert!(!verify_password("wrong-password", &hash));
}

#[tokio::test]
async fn test_unit_creator_becomes_teacher() {
    let storage = test_storage().await;
    let creator = add_user(&storage, "alice").await;
    let unit = storage.create_unit("Databases", creator.id).await.unwrap();

    let registration = storage
        .get_registration(unit.id, creator.id)
        .await
        .unwrap()
        .expect("creator should be registered in the new unit");
    assert!(registration.is_teacher());
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let storage = test_storage().await;
    let teacher = add_user(&storage, "teacher").await;
    let student = add_user(&storage, "student").await;
    let unit = storage.create_unit("Networks", teacher.id).await.unwrap();

    storage
        .register_user(unit.id, student.id, RegistrationRole::Student)
        .await
        .unwrap();
    let second = storage
        .register_user(unit.id, student.id, RegistrationRole::Student)
        .await;
    assert!(second.is_err());
}

#[tokio::test]
async fn test_only_teachers_assign() {
    let storage = test_storage().await;
    let teacher = add_user(&storage, "teacher").await;
    let student = add_user(&storage, "student").await;
    let outsider = add_user(&storage, "outsider").await;
    let unit = storage.create_unit("Compilers", teacher.id).await.unwrap();
    let project = storage
        .create_project("parser", "python3", "aaaa-bbbb", teacher.id)
        .await
        .unwrap();

    storage
        .register_user(unit.id, student.id, RegistrationRole::Student)
        .await
        .unwrap();

    // 学生注册不授予布置权限
    let err = storage
        .create_assignment(unit.id, project.id, student.id, None, UNLIMITED_SUBMISSIONS)
        .await
        .unwrap_err();
    assert!(matches!(err, AutograderError::Authorization(_)));

    // 完全没注册的用户同样被拒
    let err = storage
        .create_assignment(unit.id, project.id, outsider.id, None, UNLIMITED_SUBMISSIONS)
        .await
        .unwrap_err();
    assert!(matches!(err, AutograderError::Authorization(_)));

    // 教师可以布置，默认截止时间在一年后附近
    let assignment = storage
        .create_assignment(unit.id, project.id, teacher.id, None, UNLIMITED_SUBMISSIONS)
        .await
        .unwrap();
    let days = (assignment.due_date - chrono::Utc::now()).num_days();
    assert!((360..=365).contains(&days), "unexpected due date: {days} days out");
}

#[tokio::test]
async fn test_unregistered_submitter_rejected() {
    let storage = test_storage().await;
    let (_, _, assignment_id) = seed_assignment(&storage, UNLIMITED_SUBMISSIONS).await;
    let outsider = add_user(&storage, "outsider").await;

    let err = storage
        .create_submission(assignment_id, outsider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AutograderError::Authorization(_)));
}

#[tokio::test]
async fn test_unknown_assignment_rejected() {
    let storage = test_storage().await;
    let user = add_user(&storage, "alice").await;

    let err = storage.create_submission(9999, user.id).await.unwrap_err();
    assert!(matches!(err, AutograderError::NotFound(_)));
}

#[tokio::test]
async fn test_submission_cap_enforced() {
    let storage = test_storage().await;
    let (_, unit_id, assignment_id) = seed_assignment(&storage, 1).await;
    let student = add_user(&storage, "student").await;
    storage
        .register_user(unit_id, student.id, RegistrationRole::Student)
        .await
        .unwrap();

    storage
        .create_submission(assignment_id, student.id)
        .await
        .unwrap();
    let err = storage
        .create_submission(assignment_id, student.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AutograderError::Validation(_)));
}

#[tokio::test]
async fn test_unlimited_submissions() {
    let storage = test_storage().await;
    let (teacher, _, assignment_id) = seed_assignment(&storage, UNLIMITED_SUBMISSIONS).await;

    // 教师自己也注册在单元内，可以反复提交
    for _ in 0..3 {
        storage
            .create_submission(assignment_id, teacher.id)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_token_validates_only_own_submission() {
    let storage = test_storage().await;
    let (teacher, _, assignment_id) = seed_assignment(&storage, UNLIMITED_SUBMISSIONS).await;

    let first = storage
        .create_submission(assignment_id, teacher.id)
        .await
        .unwrap();
    let second = storage
        .create_submission(assignment_id, teacher.id)
        .await
        .unwrap();

    assert_ne!(first.submission.submission_key, second.submission.submission_key);
    assert_eq!(first.token.len(), 64);

    // 明文令牌不落库，只存哈希
    assert!(verify_password(&first.token, &first.submission.token_hash));
    assert!(!verify_password(&first.token, &second.submission.token_hash));
    assert!(!verify_password(&second.token, &first.submission.token_hash));
}

#[tokio::test]
async fn test_results_round_trip_and_overwrite() {
    let storage = test_storage().await;
    let (teacher, _, assignment_id) = seed_assignment(&storage, UNLIMITED_SUBMISSIONS).await;
    let new_submission = storage
        .create_submission(assignment_id, teacher.id)
        .await
        .unwrap();
    let key = new_submission.submission.submission_key.clone();

    assert!(!new_submission.submission.has_results());

    let results = serde_json::json!({"score": 87, "tests": [{"name": "t1", "pass": true}]});
    let updated = storage.post_results(&key, results.clone()).await.unwrap();
    assert_eq!(updated.results, Some(results));
    assert!(updated.results_at.is_some());

    // 重复回写以最后一次为准
    let rewritten = serde_json::json!({"score": 93});
    let updated = storage.post_results(&key, rewritten.clone()).await.unwrap();
    assert_eq!(updated.results, Some(rewritten.clone()));

    let fetched = storage.get_submission_by_key(&key).await.unwrap().unwrap();
    assert_eq!(fetched.results, Some(rewritten));
}
