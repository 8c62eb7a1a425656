//! 业务模型定义
//!
//! requests/responses 对应 HTTP 接口出入参，entities 是业务实体。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod projects;
pub mod registrations;
pub mod submissions;
pub mod units;
pub mod users;
pub mod workers;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间，注入 app_data 供状态接口计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，写入 ApiResponse.code 字段
///
/// 200/4xx/5xx 与 HTTP 习惯保持一致，更细的业务错误用千位分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 200,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    InternalServerError = 500,

    // 认证相关 (1xxx)
    AuthFailed = 1001,
    TokenInvalid = 1002,

    // 用户相关 (2xxx)
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserPasswordInvalid = 2004,

    // 单元与注册相关 (3xxx)
    UnitNotFound = 3001,
    RegistrationNotFound = 3002,
    AlreadyRegistered = 3003,
    UnitPermissionDenied = 3004,

    // 项目与作业布置相关 (4xxx)
    ProjectNotFound = 4001,
    ProjectAlreadyExists = 4002,
    AssignmentNotFound = 4003,

    // 提交相关 (5xxx)
    SubmissionNotFound = 5001,
    SubmissionLimitReached = 5002,
    SubmissionUploadFailed = 5003,
    FileTypeNotAllowed = 5004,
    FileSizeExceeded = 5005,

    // 评测队列相关 (6xxx)
    QueueDeliveryFailed = 6001,
}
