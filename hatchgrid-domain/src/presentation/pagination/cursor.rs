use crate::error::DomainError;
use crate::presentation::InvalidRequestError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 分页游标
///
/// 对调用方不透明：编码后的字符串没有任何可依赖的内部结构。
pub trait Cursor: Sized {
    /// 编码为不透明令牌
    fn encode(&self) -> String;

    /// 解析令牌；格式错误时返回 `General` 类别的请求错误
    fn decode(token: &str) -> Result<Self, InvalidRequestError>;
}

/// 基于（时间戳, id）的游标，适用于按创建时间排序的数据集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampCursor {
    timestamp: DateTime<Utc>,
    id: String,
}

impl TimestampCursor {
    pub fn new(timestamp: DateTime<Utc>, id: impl Into<String>) -> Self {
        Self {
            timestamp,
            id: id.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 位于所有数据之前的起始游标
    pub fn start() -> Self {
        Self::new(DateTime::<Utc>::default(), "")
    }
}

impl Cursor for TimestampCursor {
    fn encode(&self) -> String {
        // 结构体仅含字符串与时间戳，序列化不会失败
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(token: &str) -> Result<Self, InvalidRequestError> {
        let invalid = |e: DomainError| InvalidRequestError::general("invalid cursor").with_cause(e);

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| invalid(e.into()))?;
        serde_json::from_slice(&bytes).map_err(|e| invalid(e.into()))
    }
}
