use crate::{
    command::{Command, CommandWithResult},
    context::AppContext,
    error::AppError,
    notification::Notification,
    publish::PublishStrategy,
    query::Query,
};
use async_trait::async_trait;

/// 中介者（Mediator）
///
/// - 根据消息的具体类型路由到对应的处理器，并让每次分发经过管道行为链；
/// - 框架可提供不同实现（如进程内、消息队列等）；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait Mediator: Send + Sync {
    /// 分发命令到唯一的处理器
    async fn send<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;

    /// 分发带返回值的命令
    async fn send_with_result<C: CommandWithResult>(
        &self,
        ctx: &AppContext,
        cmd: C,
    ) -> Result<C::Output, AppError>;

    /// 执行查询
    async fn ask<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Response, AppError>;

    /// 按默认策略发布通知
    async fn publish<N: Notification>(&self, ctx: &AppContext, notification: N)
    -> Result<(), AppError>;

    /// 按指定策略发布通知
    async fn publish_with<N: Notification>(
        &self,
        ctx: &AppContext,
        notification: N,
        strategy: PublishStrategy,
    ) -> Result<(), AppError>;
}
