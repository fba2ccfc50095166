use crate::pipeline::MessageKind;
use hatchgrid_domain::error::DomainError;
use hatchgrid_domain::presentation::InvalidRequestError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("authorization: {0}")]
    Authorization(String),

    #[error("business rule violated: code={code}, {message}")]
    Business { code: &'static str, message: String },

    #[error("infra: {0}")]
    Infra(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: {kind}={message}")]
    AlreadyRegistered {
        kind: MessageKind,
        message: &'static str,
    },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cancelled: {message}")]
    Cancelled { message: &'static str },

    #[error("notification {notification} failed in {count} handler(s)", count = .failures.len())]
    Publish {
        notification: &'static str,
        failures: Vec<AppError>,
    },
}

impl AppError {
    pub fn business(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Business {
            code,
            message: message.into(),
        }
    }

    /// 装配错误：处理器缺失、重复注册或类型还原失败，属于程序缺陷而非请求问题
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::HandlerNotFound(_)
                | AppError::AlreadyRegistered { .. }
                | AppError::TypeMismatch { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hatchgrid_domain::presentation::InvalidRequestKind;

    #[test]
    fn invalid_request_keeps_its_kind() {
        let err: AppError = InvalidRequestError::sort("unknown sort property 'x'").into();
        match &err {
            AppError::InvalidRequest(e) => assert_eq!(e.kind(), InvalidRequestKind::Sort),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("invalid sort"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn classification_helpers() {
        assert!(AppError::HandlerNotFound("Ping").is_configuration());
        assert!(
            AppError::AlreadyRegistered {
                kind: MessageKind::Query,
                message: "Ping"
            }
            .is_configuration()
        );
        assert!(AppError::Cancelled { message: "Ping" }.is_cancelled());
        assert!(!AppError::Validation("x".into()).is_cancelled());
    }

    #[test]
    fn publish_error_counts_failures() {
        let err = AppError::Publish {
            notification: "WorkspaceCreated",
            failures: vec![AppError::Infra("a".into()), AppError::Infra("b".into())],
        };
        assert_eq!(
            err.to_string(),
            "notification WorkspaceCreated failed in 2 handler(s)"
        );
    }

    #[test]
    fn already_registered_names_the_kind() {
        let err = AppError::AlreadyRegistered {
            kind: MessageKind::CommandWithResult,
            message: "CreateWorkspace",
        };
        assert_eq!(
            err.to_string(),
            "handler already registered: command_with_result=CreateWorkspace"
        );
    }
}
