use crate::{context::AppContext, error::AppError, notification::Notification};
use async_trait::async_trait;

/// 通知处理器：以引用接收通知，同一通知会依次（或并发）交给多个处理器
#[async_trait]
pub trait NotificationHandler<N>: Send + Sync
where
    N: Notification,
{
    async fn handle(&self, ctx: &AppContext, notification: &N) -> Result<(), AppError>;
}
