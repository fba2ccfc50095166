//! 分页响应模型
//!
//! - [`CursorPageResponse`]：基于不透明游标的分页；
//! - [`OffsetPageResponse`]：基于页码/偏移的分页；
//! - [`Cursor`] 与 [`TimestampCursor`]：游标的编码与解析；
//! - [`PaginationConfig`]：页大小的默认值与上限。
//!
//! 本模块只做纯数据变换，不进行任何 I/O。
mod config;
mod cursor;
mod cursor_page;
mod offset_page;

pub use config::PaginationConfig;
pub use cursor::{Cursor, TimestampCursor};
pub use cursor_page::CursorPageResponse;
pub use offset_page::OffsetPageResponse;

/// 分页响应的公共能力：暴露当前页的数据切片（保持插入顺序）
pub trait PageResponse<T> {
    fn data(&self) -> &[T];

    fn into_data(self) -> Vec<T>;

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}
