//! Autograder - 作业提交与自动评测协调服务
//!
//! 基于 Actix Web 构建的作业提交、评测分发与成绩回收后端。
//!
//! # 架构
//! - `cache`: 会话缓存（Moka）
//! - `cli`: 命令行入口
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 会话认证中间件
//! - `models`: 数据模型定义
//! - `queue`: 评测队列适配层（本地文件 / 托管服务）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod cli;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod queue;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
