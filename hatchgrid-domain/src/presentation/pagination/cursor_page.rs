use super::PageResponse;
use serde::{Deserialize, Serialize};

/// 游标分页响应
///
/// 不变式：某一方向的游标为 `None` 当且仅当该方向不存在相邻页；
/// 游标对调用方是不透明的字符串。空数据页是合法的，与游标是否存在无关。
///
/// 序列化字段：`data`、`prevPageCursor`、`nextPageCursor`（可为 `null`）。
///
/// # 示例
///
/// ```
/// use hatchgrid_domain::presentation::pagination::CursorPageResponse;
///
/// let page = CursorPageResponse::new(vec![1, 2], None, Some("c2".to_string()));
/// let page = page.map_items(|n| n * 10);
/// assert_eq!(page.data(), &[10, 20]);
/// assert_eq!(page.next_page_cursor(), Some("c2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPageResponse<T> {
    data: Vec<T>,
    prev_page_cursor: Option<String>,
    next_page_cursor: Option<String>,
}

impl<T> CursorPageResponse<T> {
    pub fn new(
        data: Vec<T>,
        prev_page_cursor: Option<String>,
        next_page_cursor: Option<String>,
    ) -> Self {
        Self {
            data,
            prev_page_cursor,
            next_page_cursor,
        }
    }

    /// 由"多取一条"的查询窗口构建页面
    ///
    /// - `window`：从请求游标之后按顺序取出的至多 `size + 1` 条数据；
    /// - 若窗口超过 `size`，截断到 `size` 条，`next` 为最后一条保留数据的游标；
    /// - `prev` 为本次请求所使用的游标（首页为 `None`）。
    pub fn from_window<F>(
        mut window: Vec<T>,
        size: usize,
        request_cursor: Option<String>,
        cursor_of: F,
    ) -> Self
    where
        F: Fn(&T) -> String,
    {
        let has_more = window.len() > size;
        window.truncate(size);

        let next_page_cursor = if has_more {
            window.last().map(&cursor_of)
        } else {
            None
        };

        Self::new(window, request_cursor, next_page_cursor)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn prev_page_cursor(&self) -> Option<&str> {
        self.prev_page_cursor.as_deref()
    }

    pub fn next_page_cursor(&self) -> Option<&str> {
        self.next_page_cursor.as_deref()
    }

    pub fn has_prev(&self) -> bool {
        self.prev_page_cursor.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_page_cursor.is_some()
    }

    /// 变换数据集合，游标保持不变
    ///
    /// 满足函子律：`map(id) == id`，`map(f).map(g) == map(|x| g(f(x)))`。
    pub fn map<U, F>(self, f: F) -> CursorPageResponse<U>
    where
        F: FnOnce(Vec<T>) -> Vec<U>,
    {
        CursorPageResponse {
            data: f(self.data),
            prev_page_cursor: self.prev_page_cursor,
            next_page_cursor: self.next_page_cursor,
        }
    }

    /// 逐元素变换
    pub fn map_items<U, F>(self, f: F) -> CursorPageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        self.map(|data| data.into_iter().map(f).collect())
    }

    pub fn into_parts(self) -> (Vec<T>, Option<String>, Option<String>) {
        (self.data, self.prev_page_cursor, self.next_page_cursor)
    }
}

impl<T> PageResponse<T> for CursorPageResponse<T> {
    fn data(&self) -> &[T] {
        &self.data
    }

    fn into_data(self) -> Vec<T> {
        self.data
    }
}
