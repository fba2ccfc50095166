use hatchgrid_domain::presentation::pagination::{CursorPageResponse, OffsetPageResponse};
use serde::Serialize;

/// 查询响应（Response）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层；
/// - 应保持只读特性与简洁结构，适配不同用例的返回需求。
pub trait Response: Serialize + Send + Sync + 'static {}

impl<T> Response for CursorPageResponse<T> where T: Serialize + Send + Sync + 'static {}

impl<T> Response for OffsetPageResponse<T> where T: Serialize + Send + Sync + 'static {}

impl<T: Response> Response for Vec<T> {}

impl<T: Response> Response for Option<T> {}

impl Response for () {}
impl Response for bool {}
impl Response for u64 {}
impl Response for i64 {}
impl Response for String {}
