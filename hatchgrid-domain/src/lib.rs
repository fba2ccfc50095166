//! hatchgrid 共享内核（hatchgrid-domain）
//!
//! 提供应用层与表现层共用、与存储和传输实现解耦的基础构件：
//! - 统一错误（`error`）
//! - 过滤条件树及其内存求值（`criteria`）
//! - 表现层模型（`presentation`）：非法请求错误分类、分页响应与游标、排序与过滤参数解析
//!
//! 典型用法：
//! 1. 控制器使用 `SortParser` / `RhsFilterParser` 将请求参数解析为 `Sort` / `Criteria`；
//! 2. 查询处理器依据 `PaginationConfig` 确定页大小，并由仓储返回 `CursorPageResponse`；
//! 3. 通过 `CursorPageResponse::map` 将领域对象转换为响应对象。
//!
pub mod criteria;
pub mod error;
pub mod presentation;
