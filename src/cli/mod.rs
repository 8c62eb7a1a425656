//! 命令行入口
//!
//! serve 之外的子命令都是一次性的管理操作：建库、开户、建单元、
//! 注册、布置作业、注册评测项目、代提交。领域约束全部由存储层
//! 强制，CLI 只做参数解析和出错打印。

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::errors::{AutograderError, Result};
use crate::models::AppStartTime;
use crate::models::assignments::entities::UNLIMITED_SUBMISSIONS;
use crate::models::registrations::entities::RegistrationRole;
use crate::models::users::entities::User;
use crate::models::users::requests::CreateUserRequest;
use crate::queue::create_queue;
use crate::storage::{Storage, create_storage};
use crate::utils::archive::{package_submission, submission_archive_path};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_project_name, validate_username};

#[derive(Parser, Debug)]
#[command(name = "autograder")]
#[command(version)]
#[command(about = "Assignment submission and autograding coordinator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 配置文件路径 (YAML)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 Web 服务器
    Serve,

    /// 数据库管理
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// 用户管理
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// 单元与作业布置管理
    Unit {
        #[command(subcommand)]
        command: UnitCommands,
    },

    /// 评测项目管理
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// 代用户提交代码（目录、单文件或现成的 .zip）
    Submit {
        /// 提交者用户名
        username: String,
        /// 项目名
        project: String,
        /// 代码路径
        path: PathBuf,
        /// 密码（不指定时交互式询问）
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// 建表并跑迁移
    Setup,
    /// 清空重建（危险操作，数据全部丢失）
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// 添加用户
    Add {
        username: String,
        /// 密码（不指定时交互式询问）
        #[arg(long)]
        password: Option<String>,
    },
    /// 列出用户
    List,
}

#[derive(Subcommand, Debug)]
pub enum UnitCommands {
    /// 创建单元，创建者自动注册为教师
    Add {
        description: String,
        /// 创建者用户名
        #[arg(long)]
        creator: String,
    },
    /// 把用户注册进单元
    Register {
        unit_id: i64,
        username: String,
        /// 注册为教师（默认学生）
        #[arg(long)]
        teacher: bool,
    },
    /// 在单元里布置一个评测项目，布置者必须是单元教师
    Assign {
        unit_id: i64,
        /// 项目名
        project: String,
        /// 布置者用户名
        #[arg(long)]
        assigner: String,
        /// 截止时间 (RFC 3339，默认一年后)
        #[arg(long)]
        due: Option<String>,
        /// 提交次数上限（-1 不限）
        #[arg(long, default_value_t = UNLIMITED_SUBMISSIONS)]
        max_submissions: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// 注册评测项目：先把评测机代码包注册到队列后端，再落库
    Add {
        /// 项目名
        name: String,
        /// 评测机代码包（目录或 .zip）
        bundle: PathBuf,
        /// 评测机入口命令
        executable: String,
        /// 评测机运行时 (如 python3)
        runtime: String,
        /// 创建者用户名
        #[arg(long)]
        creator: String,
    },
    /// 列出项目
    List,
}

/// 交互式读取密码
///
/// 走标准输入，不关回显，提示里明确告知输入可见。
fn prompt_password(prompt: &str) -> Result<String> {
    print!("{prompt} (input will be visible): ");
    std::io::stdout().flush()?;
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn resolve_password(password: Option<String>, prompt: &str) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt_password(prompt),
    }
}

async fn lookup_user(storage: &Arc<dyn Storage>, username: &str) -> Result<User> {
    storage
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| AutograderError::not_found(format!("用户 {username} 不存在")))
}

/// 命令分发
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve => {
            let app_start_time = AppStartTime {
                start_datetime: chrono::Utc::now(),
            };
            crate::runtime::serve::run_server(app_start_time).await?;
        }

        Commands::Db { command } => match command {
            DbCommands::Setup => {
                create_storage().await?;
                println!("Database setup complete");
            }
            DbCommands::Reset => {
                let storage =
                    crate::storage::sea_orm_storage::SeaOrmStorage::new_async().await?;
                storage.reset_database().await?;
                println!("Database reset complete");
            }
        },

        Commands::User { command } => match command {
            UserCommands::Add { username, password } => {
                validate_username(&username).map_err(AutograderError::validation)?;
                let password = resolve_password(password, "Password")?;
                let storage = create_storage().await?;
                let user = storage
                    .create_user(CreateUserRequest {
                        username,
                        password: hash_password(&password)?,
                    })
                    .await?;
                println!("Added user {} (ID: {})", user.username, user.id);
            }
            UserCommands::List => {
                let storage = create_storage().await?;
                let page = storage
                    .list_users_with_pagination(Default::default())
                    .await?;
                if page.items.is_empty() {
                    println!("No users found.");
                } else {
                    println!("{:<8} {:<32} ACTIVE", "ID", "USERNAME");
                    for user in &page.items {
                        println!("{:<8} {:<32} {}", user.id, user.username, user.is_active);
                    }
                    println!();
                    println!(
                        "Showing {} of {} users",
                        page.items.len(),
                        page.pagination.total
                    );
                }
            }
        },

        Commands::Unit { command } => match command {
            UnitCommands::Add {
                description,
                creator,
            } => {
                let storage = create_storage().await?;
                let creator = lookup_user(&storage, &creator).await?;
                let unit = storage.create_unit(&description, creator.id).await?;
                println!(
                    "Added unit {} (creator {} registered as teacher)",
                    unit.id, creator.username
                );
            }
            UnitCommands::Register {
                unit_id,
                username,
                teacher,
            } => {
                let storage = create_storage().await?;
                let user = lookup_user(&storage, &username).await?;
                let role = if teacher {
                    RegistrationRole::Teacher
                } else {
                    RegistrationRole::Student
                };
                let registration = storage.register_user(unit_id, user.id, role).await?;
                println!(
                    "Registered {} in unit {} as {}",
                    user.username, unit_id, registration.role
                );
            }
            UnitCommands::Assign {
                unit_id,
                project,
                assigner,
                due,
                max_submissions,
            } => {
                let storage = create_storage().await?;
                let assigner = lookup_user(&storage, &assigner).await?;
                let project = storage
                    .get_project_by_name(&project)
                    .await?
                    .ok_or_else(|| {
                        AutograderError::not_found(format!("项目 {project} 不存在"))
                    })?;
                let due_date = match due {
                    Some(raw) => Some(
                        DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc),
                    ),
                    None => None,
                };
                let assignment = storage
                    .create_assignment(
                        unit_id,
                        project.id,
                        assigner.id,
                        due_date,
                        max_submissions,
                    )
                    .await?;
                println!(
                    "Assigned project {} to unit {} (assignment ID: {}, due {})",
                    project.name, unit_id, assignment.id, assignment.due_date
                );
            }
        },

        Commands::Project { command } => match command {
            ProjectCommands::Add {
                name,
                bundle,
                executable,
                runtime,
                creator,
            } => {
                validate_project_name(&name).map_err(AutograderError::validation)?;
                let storage = create_storage().await?;
                let creator = lookup_user(&storage, &creator).await?;

                // 代码包先打成 zip，目录/单文件/现成 zip 都支持
                let project_key = Uuid::new_v4().to_string();
                let staged = std::env::temp_dir().join(format!("{project_key}.zip"));
                package_submission(&bundle, &staged)?;

                // 先注册评测机再落库，注册失败时不留半个项目
                let queue = create_queue()?;
                let register_result = queue
                    .register_worker(&staged, &project_key, &executable, &runtime)
                    .await;
                let _ = std::fs::remove_file(&staged);
                register_result?;

                let created = storage
                    .create_project(&name, &runtime, &project_key, creator.id)
                    .await?;
                println!("Added project {} (ID: {})", created.name, created.id);
            }
            ProjectCommands::List => {
                let storage = create_storage().await?;
                let projects = storage.list_projects().await?;
                if projects.is_empty() {
                    println!("No projects found.");
                } else {
                    println!("{:<8} {:<32} RUNTIME", "ID", "NAME");
                    for project in &projects {
                        println!("{:<8} {:<32} {}", project.id, project.name, project.runtime);
                    }
                }
            }
        },

        Commands::Submit {
            username,
            project,
            path,
            password,
        } => {
            let storage = create_storage().await?;
            let user = lookup_user(&storage, &username).await?;

            let password = resolve_password(password, "Password")?;
            if !verify_password(&password, &user.password_hash) {
                return Err(AutograderError::authentication(format!(
                    "用户 {username} 密码错误"
                )));
            }

            let project = storage
                .get_project_by_name(&project)
                .await?
                .ok_or_else(|| AutograderError::not_found(format!("项目 {project} 不存在")))?;

            // 在用户已注册的单元里找这个项目的作业布置
            let registrations = storage.list_registrations_for_user(user.id).await?;
            let assignments = storage.list_assignments_for_project(project.id).await?;
            let candidates: Vec<_> = assignments
                .into_iter()
                .filter(|a| registrations.iter().any(|r| r.unit_id == a.unit_id))
                .collect();

            let assignment = match candidates.as_slice() {
                [] => {
                    return Err(AutograderError::not_found(format!(
                        "项目 {} 没有布置到用户 {} 注册的任何单元",
                        project.name, user.username
                    )));
                }
                [one] => one.clone(),
                many => {
                    return Err(AutograderError::validation(format!(
                        "项目 {} 在用户注册的单元里有 {} 个作业布置，无法确定目标",
                        project.name,
                        many.len()
                    )));
                }
            };

            let new_submission = storage.create_submission(assignment.id, user.id).await?;
            let submission_key = &new_submission.submission.submission_key;

            let dest = submission_archive_path(submission_key);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            package_submission(&path, &dest)?;

            let queue = create_queue()?;
            queue
                .enqueue(&project.project_key, submission_key, &new_submission.token)
                .await?;

            println!("Submission accepted: {submission_key}");
        }
    }

    Ok(())
}
