//! 领域层统一错误定义
//!
//! 聚焦解析、查找与仓储等最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化/解析 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 仓储 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 查找 ---
    #[error("not found: {reason}")]
    NotFound { reason: String },
}

impl DomainError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    pub fn repository(reason: impl Into<String>) -> Self {
        Self::Repository {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// 允许在解析 RHS 过滤值、游标等场景直接使用 `?`

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseIntError> for DomainError {
    fn from(err: std::num::ParseIntError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseFloatError> for DomainError {
    fn from(err: std::num::ParseFloatError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::str::ParseBoolError> for DomainError {
    fn from(err: std::str::ParseBoolError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for DomainError {
    fn from(err: base64::DecodeError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
