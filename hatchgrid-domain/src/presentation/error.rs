//! 表现层请求错误
//!
//! 由请求解析协作方（排序、过滤、分页参数）抛出，在边界处被捕获一次并映射为客户端错误。
//! 通过 [`InvalidRequestKind`] 区分具体类别，边界无需检查错误文本。
//!
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 请求错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidRequestKind {
    /// 通用的非法请求（分页参数、游标等）
    General,
    /// 无法识别或格式错误的排序字段/方向
    Sort,
    /// 格式错误的过滤表达式
    Filter,
}

/// 非法请求错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InvalidRequestError {
    #[error("invalid request: {message}")]
    General {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
    #[error("invalid sort: {message}")]
    Sort {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
    #[error("invalid filter: {message}")]
    Filter {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
}

impl InvalidRequestError {
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
            cause: None,
        }
    }

    pub fn sort(message: impl Into<String>) -> Self {
        Self::Sort {
            message: message.into(),
            cause: None,
        }
    }

    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter {
            message: message.into(),
            cause: None,
        }
    }

    /// 附加底层原因
    pub fn with_cause(mut self, source: impl Into<BoxError>) -> Self {
        match &mut self {
            Self::General { cause, .. } | Self::Sort { cause, .. } | Self::Filter { cause, .. } => {
                *cause = Some(source.into());
            }
        }
        self
    }

    pub fn kind(&self) -> InvalidRequestKind {
        match self {
            Self::General { .. } => InvalidRequestKind::General,
            Self::Sort { .. } => InvalidRequestKind::Sort,
            Self::Filter { .. } => InvalidRequestKind::Filter,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::General { message, .. }
            | Self::Sort { message, .. }
            | Self::Filter { message, .. } => message,
        }
    }
}
