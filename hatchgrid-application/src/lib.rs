//! 应用层：命令 / 查询 / 通知的进程内分发
//!
//! - 消息契约：[`command::Command`]、[`command::CommandWithResult`]、[`query::Query`]、
//!   [`notification::Notification`]，以及查询结果的 [`response::Response`] 标记；
//! - 在组合根通过 [`registry::RegistryBuilder`] 显式注册处理器与管道行为；
//! - [`InProcessMediator`] 解析处理器、按注册顺序执行行为链，并响应上下文取消。
//!
pub mod behaviors;
pub mod command;
pub mod command_handler;
pub mod context;
pub mod error;
pub mod in_process_mediator;
pub mod mediator;
pub mod notification;
pub mod notification_handler;
pub mod pipeline;
pub mod publish;
pub mod query;
pub mod query_handler;
pub mod registry;
pub mod response;

pub use in_process_mediator::InProcessMediator;
pub use registry::{Registry, RegistryBuilder};
