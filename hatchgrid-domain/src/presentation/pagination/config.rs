use crate::presentation::InvalidRequestError;
use bon::Builder;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// 分页配置
///
/// 可由宿主应用从自身配置源反序列化（缺省字段取默认值），或通过 builder 构造：
///
/// ```
/// use hatchgrid_domain::presentation::pagination::PaginationConfig;
///
/// let cfg = PaginationConfig::builder().max_size(50).build();
/// assert_eq!(cfg.default_size, 20);
/// assert_eq!(cfg.resolve_size(None).unwrap(), 20);
/// assert!(cfg.resolve_size(Some(51)).is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// 未指定页大小时使用的默认值
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub default_size: usize,
    /// 允许的最大页大小
    #[builder(default = MAX_PAGE_SIZE)]
    pub max_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// 解析请求中的页大小：缺省取默认值，`0` 或超过上限视为非法请求
    pub fn resolve_size(&self, requested: Option<usize>) -> Result<usize, InvalidRequestError> {
        match requested {
            None => Ok(self.default_size),
            Some(0) => Err(InvalidRequestError::general("page size must be positive")),
            Some(size) if size > self.max_size => Err(InvalidRequestError::general(format!(
                "page size {size} exceeds maximum {}",
                self.max_size
            ))),
            Some(size) => Ok(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::InvalidRequestKind;

    #[test]
    fn defaults_to_twenty() {
        let cfg = PaginationConfig::default();
        assert_eq!(cfg.resolve_size(None).unwrap(), 20);
        assert_eq!(cfg.resolve_size(Some(7)).unwrap(), 7);
        assert_eq!(cfg.resolve_size(Some(100)).unwrap(), 100);
    }

    #[test]
    fn rejects_zero_and_oversized_pages() {
        let cfg = PaginationConfig::default();
        for size in [0, 101] {
            let err = cfg.resolve_size(Some(size)).unwrap_err();
            assert_eq!(err.kind(), InvalidRequestKind::General);
        }
    }

    #[test]
    fn builder_and_serde_share_defaults() {
        assert_eq!(PaginationConfig::builder().build(), PaginationConfig::default());

        let cfg: PaginationConfig = serde_json::from_str(r#"{ "max_size": 10 }"#).unwrap();
        assert_eq!(cfg.default_size, 20);
        assert_eq!(cfg.max_size, 10);
    }
}
