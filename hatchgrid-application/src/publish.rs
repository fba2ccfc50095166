use crate::{context::AppContext, error::AppError, registry::NotificationFn};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// 通知投递策略
///
/// | 策略 | 执行方式 | 失败处理 |
/// |---|---|---|
/// | `StopOnError` | 顺序 | 首个失败即返回，后续处理器不再执行 |
/// | `ContinueOnError` | 顺序 | 全部执行，汇总为 `AppError::Publish` |
/// | `ParallelWhenAll` | 并发 | 全部执行，返回按注册顺序的首个错误 |
/// | `ParallelContinueOnError` | 并发 | 全部执行，汇总为 `AppError::Publish` |
///
/// 并发策略在调用方任务内交错执行各处理器的 future，不会派生新任务。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStrategy {
    #[default]
    StopOnError,
    ContinueOnError,
    ParallelWhenAll,
    ParallelContinueOnError,
}

impl PublishStrategy {
    pub(crate) async fn publish(
        self,
        ctx: &AppContext,
        name: &'static str,
        notification: &(dyn Any + Send + Sync),
        handlers: &[NotificationFn],
    ) -> Result<(), AppError> {
        match self {
            PublishStrategy::StopOnError => {
                for handler in handlers {
                    handler(ctx, notification).await?;
                }
                Ok(())
            }
            PublishStrategy::ContinueOnError => {
                let mut failures = Vec::new();
                for handler in handlers {
                    if let Err(e) = handler(ctx, notification).await {
                        tracing::warn!(name, error = %e, "notification handler failed");
                        failures.push(e);
                    }
                }
                aggregate(name, failures)
            }
            PublishStrategy::ParallelWhenAll => {
                let results = join_all(handlers.iter().map(|h| h(ctx, notification))).await;
                results.into_iter().collect()
            }
            PublishStrategy::ParallelContinueOnError => {
                let results = join_all(handlers.iter().map(|h| h(ctx, notification))).await;
                let failures: Vec<AppError> = results.into_iter().filter_map(Result::err).collect();
                for e in &failures {
                    tracing::warn!(name, error = %e, "notification handler failed");
                }
                aggregate(name, failures)
            }
        }
    }
}

fn aggregate(notification: &'static str, failures: Vec<AppError>) -> Result<(), AppError> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::Publish {
            notification,
            failures,
        })
    }
}
