use crate::{
    command::{Command, CommandWithResult},
    context::AppContext,
    error::AppError,
    mediator::Mediator,
    notification::Notification,
    pipeline::{MessageKind, Next, Reply, Request, Terminal, terminal},
    publish::PublishStrategy,
    query::Query,
    registry::Registry,
};
use async_trait::async_trait;
use std::any::TypeId;
use std::sync::Arc;

/// 进程内 Mediator 实现
/// - 通过 TypeId 在 [`Registry`] 中解析处理器
/// - 按注册顺序包裹管道行为，处理器在上下文的取消令牌下执行，并在调用端还原结果类型
#[derive(Clone)]
pub struct InProcessMediator {
    registry: Arc<Registry>,
}

impl InProcessMediator {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    async fn dispatch<'a>(
        &'a self,
        ctx: &'a AppContext,
        request: Request,
        terminal: Terminal<'a>,
    ) -> Result<Reply, AppError> {
        let name = request.name();
        let kind = request.kind();
        tracing::debug!(name, %kind, correlation_id = ctx.correlation_id(), "dispatching");

        if ctx.cancellation().is_cancelled() {
            tracing::debug!(name, %kind, "dispatch cancelled before start");
            return Err(AppError::Cancelled { message: name });
        }

        Next::new(self.registry.behaviors(), terminal)
            .run(ctx, request)
            .await
    }

    async fn dispatch_to_handler<'a, M>(
        &'a self,
        ctx: &'a AppContext,
        name: &'static str,
        kind: MessageKind,
        message: M,
    ) -> Result<Reply, AppError>
    where
        M: Send + Sync + 'static,
    {
        let call = self.registry.handler(kind, TypeId::of::<M>(), name)?;
        let request = Request::new(name, kind, message);
        self.dispatch(ctx, request, terminal(move |req| call(ctx, req)))
            .await
    }
}

#[async_trait]
impl Mediator for InProcessMediator {
    async fn send<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        self.dispatch_to_handler(ctx, C::NAME, MessageKind::Command, cmd)
            .await?
            .restore::<()>()
    }

    async fn send_with_result<C: CommandWithResult>(
        &self,
        ctx: &AppContext,
        cmd: C,
    ) -> Result<C::Output, AppError> {
        self.dispatch_to_handler(ctx, C::NAME, MessageKind::CommandWithResult, cmd)
            .await?
            .restore::<C::Output>()
    }

    async fn ask<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Response, AppError> {
        self.dispatch_to_handler(ctx, Q::NAME, MessageKind::Query, q)
            .await?
            .restore::<Q::Response>()
    }

    async fn publish<N: Notification>(
        &self,
        ctx: &AppContext,
        notification: N,
    ) -> Result<(), AppError> {
        let strategy = self.registry.publish_strategy();
        self.publish_with(ctx, notification, strategy).await
    }

    async fn publish_with<N: Notification>(
        &self,
        ctx: &AppContext,
        notification: N,
        strategy: PublishStrategy,
    ) -> Result<(), AppError> {
        let handlers = self.registry.notification_handlers(TypeId::of::<N>());
        if handlers.is_empty() {
            tracing::debug!(name = N::NAME, "no notification handlers registered");
        }

        let request = Request::new(N::NAME, MessageKind::Notification, notification);
        let publish = terminal(move |req| {
            Box::pin(async move {
                let body = req.into_body();
                strategy.publish(ctx, N::NAME, &*body, handlers).await?;
                Ok::<_, AppError>(Reply::unit())
            })
        });

        self.dispatch(ctx, request, publish).await?.restore::<()>()
    }
}
