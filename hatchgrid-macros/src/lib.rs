//! 应用层消息标记宏
//!
//! 为结构体或枚举合并必要的派生，并实现 `hatchgrid_application` 中对应的消息 trait。
//! 稳定名称默认取类型名，可通过 `name = "..."` 覆写。
//!
use proc_macro::TokenStream;

mod message;
mod utils;

use message::Kind;

/// 命令宏
/// - 合并派生：`Debug`, `Clone`
/// - 默认实现 `Command`；`#[command(output = T)]` 时改为实现 `CommandWithResult<Output = T>`
/// - 参数：`name = "..."`、`output = Type`
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    message::expand(Kind::Command, attr, item)
}

/// 查询宏
/// - 合并派生：`Debug`, `Clone`
/// - 实现 `Query<Response = T>`
/// - 参数：`response = Type`（缺省为 `()`）、`name = "..."`
#[proc_macro_attribute]
pub fn query(attr: TokenStream, item: TokenStream) -> TokenStream {
    message::expand(Kind::Query, attr, item)
}

/// 通知宏：合并派生 `Debug`, `Clone` 并实现 `Notification`
#[proc_macro_attribute]
pub fn notification(attr: TokenStream, item: TokenStream) -> TokenStream {
    message::expand(Kind::Notification, attr, item)
}

/// 查询响应宏：合并派生 `Debug`, `Clone`, `serde::Serialize` 并实现 `Response`
#[proc_macro_attribute]
pub fn response(attr: TokenStream, item: TokenStream) -> TokenStream {
    message::expand(Kind::Response, attr, item)
}
