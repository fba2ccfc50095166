use super::PageResponse;
use serde::{Deserialize, Serialize};

/// 偏移分页响应
///
/// - `total`：符合条件的数据总数；
/// - `page`：当前页序号（从 0 开始）；
/// - `size`：页大小。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPageResponse<T> {
    data: Vec<T>,
    total: u64,
    page: u64,
    size: u64,
}

impl<T> OffsetPageResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u64, size: u64) -> Self {
        Self {
            data,
            total,
            page,
            size,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// 总页数；`size == 0` 时为 0
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// 变换数据集合，分页元数据保持不变
    pub fn map<U, F>(self, f: F) -> OffsetPageResponse<U>
    where
        F: FnOnce(Vec<T>) -> Vec<U>,
    {
        OffsetPageResponse {
            data: f(self.data),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }

    pub fn map_items<U, F>(self, f: F) -> OffsetPageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        self.map(|data| data.into_iter().map(f).collect())
    }
}

impl<T> PageResponse<T> for OffsetPageResponse<T> {
    fn data(&self) -> &[T] {
        &self.data
    }

    fn into_data(self) -> Vec<T> {
        self.data
    }
}
