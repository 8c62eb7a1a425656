use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{SubmissionService, domain_error_response};
use crate::config::AppConfig;
use crate::errors::AutograderError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::archive::{ensure_dir, submission_archive_path};
use crate::utils::validate_magic_bytes;

/// 提交评测的完整握手：
/// 1. 收 multipart（assignment_id + .zip 文件，魔术字节 + 大小校验）
/// 2. 建提交记录（注册与上限约束在存储层强制）
/// 3. 归档挪到 {submissions_dir}/{submission_key}.zip
/// 4. 投递评测任务，载荷 {submission_key, token}
pub async fn handle_create(
    service: &SubmissionService,
    req: &HttpRequest,
    user_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let holding_dir = &config.submissions.holding_dir;
    let max_size = config.submissions.max_archive_size;

    if let Err(e) = ensure_dir(holding_dir) {
        tracing::error!("{}", e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::SubmissionUploadFailed,
                "创建暂存目录失败",
            )),
        );
    }

    let mut assignment_id: Option<i64> = None;
    let mut held_path: Option<PathBuf> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "assignment_id" => {
                let mut raw = Vec::new();
                while let Some(chunk) = field.next().await {
                    raw.extend_from_slice(&chunk?);
                }
                match String::from_utf8(raw)
                    .ok()
                    .and_then(|s| s.trim().parse::<i64>().ok())
                {
                    Some(id) => assignment_id = Some(id),
                    None => {
                        cleanup(&held_path);
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::BadRequest,
                            "assignment_id must be an integer",
                        )));
                    }
                }
            }
            "file" => {
                if held_path.is_some() {
                    cleanup(&held_path);
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::BadRequest,
                        "Only one file can be uploaded at a time",
                    )));
                }

                let original_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                if !original_name.to_lowercase().ends_with(".zip") {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileTypeNotAllowed,
                        "Only .zip archives are accepted",
                    )));
                }

                let file_path = Path::new(holding_dir).join(format!("{}.zip", Uuid::new_v4()));
                let mut f = match File::create(&file_path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("{}", AutograderError::file_operation(format!("{e}")));
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::SubmissionUploadFailed,
                                "暂存文件创建失败",
                            ),
                        ));
                    }
                };

                let mut total_size: usize = 0;
                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let data = chunk?;

                    // 第一个 chunk 时验证魔术字节
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&data, ".zip") {
                            let _ = fs::remove_file(&file_path);
                            return Ok(HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::FileTypeNotAllowed,
                                    "文件内容不是 zip 归档",
                                ),
                            ));
                        }
                    }

                    total_size += data.len();
                    // 校验大小
                    if total_size > max_size {
                        let _ = fs::remove_file(&file_path);
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::FileSizeExceeded,
                            "Archive size exceeds the limit",
                        )));
                    }
                    f.write_all(&data)?;
                }

                held_path = Some(file_path);
            }
            _ => {
                // 忽略未知字段，但要把流读完
                while let Some(chunk) = field.next().await {
                    let _ = chunk?;
                }
            }
        }
    }

    let Some(assignment_id) = assignment_id else {
        cleanup(&held_path);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "assignment_id is required",
        )));
    };
    let Some(held) = held_path else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No file found in upload payload",
        )));
    };

    let storage = service.get_storage(req);

    // 建提交记录，拿到提交键和一次性令牌
    let new_submission = match storage.create_submission(assignment_id, user_id).await {
        Ok(ns) => ns,
        Err(e) => {
            let _ = fs::remove_file(&held);
            return Ok(domain_error_response(&e));
        }
    };

    // 归档入库
    let dest = submission_archive_path(&new_submission.submission.submission_key);
    if let Some(parent) = dest.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        tracing::error!("{}", AutograderError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::SubmissionUploadFailed,
                "创建归档目录失败",
            )),
        );
    }
    if fs::rename(&held, &dest).is_err() {
        // 跨设备时退回拷贝
        if let Err(e) = fs::copy(&held, &dest).and_then(|_| fs::remove_file(&held)) {
            tracing::error!("{}", AutograderError::file_operation(format!("{e}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                    ErrorCode::SubmissionUploadFailed,
                    "归档写入失败",
                )),
            );
        }
    }

    // 找到项目，投递评测任务
    let project = match lookup_project(service, req, assignment_id).await {
        Ok(p) => p,
        Err(e) => return Ok(domain_error_response(&e)),
    };

    let queue = service.get_queue(req);
    if let Err(e) = queue
        .enqueue(
            &project.project_key,
            &new_submission.submission.submission_key,
            &new_submission.token,
        )
        .await
    {
        tracing::error!("Failed to enqueue grading task: {}", e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::QueueDeliveryFailed,
                format!("Submission stored but grading dispatch failed: {}", e.message()),
            )),
        );
    }

    tracing::info!(
        "Submission {} accepted for assignment {}",
        new_submission.submission.submission_key,
        assignment_id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        new_submission.submission,
        "Submission accepted",
    )))
}

fn cleanup(held: &Option<PathBuf>) {
    if let Some(path) = held {
        let _ = fs::remove_file(path);
    }
}

async fn lookup_project(
    service: &SubmissionService,
    req: &HttpRequest,
    assignment_id: i64,
) -> crate::errors::Result<crate::models::projects::entities::Project> {
    let storage = service.get_storage(req);
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| {
            AutograderError::not_found(format!("作业布置 {assignment_id} 不存在"))
        })?;
    storage
        .get_project_by_id(assignment.project_id)
        .await?
        .ok_or_else(|| {
            AutograderError::not_found(format!("项目 {} 不存在", assignment.project_id))
        })
}
