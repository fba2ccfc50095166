//! 表现层公共模型
//!
//! 控制器（外部协作方）解析请求与渲染响应时依赖的与框架无关的部分：
//! - [`error`]：非法请求错误分类；
//! - [`pagination`]：游标/偏移分页响应；
//! - [`sort`]、[`filter`]：排序与 RHS 过滤参数解析。
//!
pub mod error;
pub mod filter;
pub mod pagination;
pub mod sort;

pub use error::{InvalidRequestError, InvalidRequestKind};
