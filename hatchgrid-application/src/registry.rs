//! 处理器注册表（Registry）
//!
//! 在组合根（composition root）处一次性装配：命令/查询处理器、通知处理器、
//! 管道行为及默认的通知投递策略。`build` 之后只读，可通过 `Arc<Registry>` 在线程间共享。
//!
use crate::{
    command::{Command, CommandWithResult},
    command_handler::{CommandHandler, CommandWithResultHandler},
    context::AppContext,
    error::AppError,
    notification::Notification,
    notification_handler::NotificationHandler,
    pipeline::{MessageKind, PipelineBehavior, Reply, Request},
    publish::PublishStrategy,
    query::Query,
    query_handler::QueryHandler,
};
use futures_util::future::BoxFuture;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

pub(crate) type HandlerFn = Arc<
    dyn for<'a> Fn(&'a AppContext, Request) -> BoxFuture<'a, Result<Reply, AppError>>
        + Send
        + Sync,
>;

pub(crate) type NotificationFn = Arc<
    dyn for<'a> Fn(&'a AppContext, &'a (dyn Any + Send + Sync)) -> BoxFuture<'a, Result<(), AppError>>
        + Send
        + Sync,
>;

fn erase<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(&'a AppContext, Request) -> BoxFuture<'a, Result<Reply, AppError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn erase_notification<F>(f: F) -> NotificationFn
where
    F: for<'a> Fn(&'a AppContext, &'a (dyn Any + Send + Sync)) -> BoxFuture<'a, Result<(), AppError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// 消息标识：用于启动期校验处理器是否齐全
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKey {
    kind: MessageKind,
    type_id: TypeId,
    name: &'static str,
}

impl MessageKey {
    pub fn command<C: Command>() -> Self {
        Self {
            kind: MessageKind::Command,
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn command_with_result<C: CommandWithResult>() -> Self {
        Self {
            kind: MessageKind::CommandWithResult,
            type_id: TypeId::of::<C>(),
            name: C::NAME,
        }
    }

    pub fn query<Q: Query>() -> Self {
        Self {
            kind: MessageKind::Query,
            type_id: TypeId::of::<Q>(),
            name: Q::NAME,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// 已装配的处理器与行为
pub struct Registry {
    handlers: HashMap<(MessageKind, TypeId), (&'static str, HandlerFn)>,
    notifications: HashMap<TypeId, Vec<NotificationFn>>,
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
    publish_strategy: PublishStrategy,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn handler(
        &self,
        kind: MessageKind,
        type_id: TypeId,
        name: &'static str,
    ) -> Result<HandlerFn, AppError> {
        match self.handlers.get(&(kind, type_id)) {
            Some((_, f)) => Ok(f.clone()),
            None => {
                tracing::warn!(name, %kind, "no handler registered");
                Err(AppError::HandlerNotFound(name))
            }
        }
    }

    pub(crate) fn notification_handlers(&self, type_id: TypeId) -> &[NotificationFn] {
        self.notifications
            .get(&type_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn behaviors(&self) -> &[Arc<dyn PipelineBehavior>] {
        &self.behaviors
    }

    /// 默认的通知投递策略
    pub fn publish_strategy(&self) -> PublishStrategy {
        self.publish_strategy
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.handlers.contains_key(&(key.kind, key.type_id))
    }

    /// 启动期校验：清单中的每条消息都必须有处理器
    pub fn ensure_registered(&self, keys: &[MessageKey]) -> Result<(), AppError> {
        match keys.iter().find(|key| !self.contains(key)) {
            Some(missing) => {
                tracing::warn!(name = missing.name, kind = %missing.kind, "handler inventory incomplete");
                Err(AppError::HandlerNotFound(missing.name))
            }
            None => Ok(()),
        }
    }

    /// 已注册的命令与查询（按名称排序）
    pub fn registered(&self) -> Vec<(MessageKind, &'static str)> {
        let mut out: Vec<_> = self
            .handlers
            .iter()
            .map(|((kind, _), (name, _))| (*kind, *name))
            .collect();
        out.sort_by(|a, b| a.1.cmp(b.1).then(a.0.as_str().cmp(b.0.as_str())));
        out
    }

    pub fn notification_handler_count<N: Notification>(&self) -> usize {
        self.notification_handlers(TypeId::of::<N>()).len()
    }
}

/// 注册表构建器
///
/// ```rust,ignore
/// let registry = Registry::builder()
///     .behavior(Arc::new(LoggingBehavior))
///     .command::<ArchiveWorkspace, _>(Arc::new(ArchiveWorkspaceHandler::new(repo.clone())))?
///     .query::<ListWorkspaces, _>(Arc::new(ListWorkspacesHandler::new(repo)))?
///     .build();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<(MessageKind, TypeId), (&'static str, HandlerFn)>,
    notifications: HashMap<TypeId, Vec<NotificationFn>>,
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
    publish_strategy: PublishStrategy,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        mut self,
        kind: MessageKind,
        type_id: TypeId,
        name: &'static str,
        f: HandlerFn,
    ) -> Result<Self, AppError> {
        match self.handlers.entry((kind, type_id)) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegistered {
                kind,
                message: name,
            }),
            Entry::Vacant(slot) => {
                tracing::debug!(name, %kind, "handler registered");
                slot.insert((name, f));
                Ok(self)
            }
        }
    }

    /// 注册命令处理器
    pub fn command<C, H>(self, handler: Arc<H>) -> Result<Self, AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f = erase(move |ctx, request| {
            let handler = handler.clone();

            Box::pin(async move {
                let cmd = request.into_message::<C>()?;
                handler.handle(ctx, cmd).await?;
                Ok::<_, AppError>(Reply::unit())
            })
        });

        self.insert(MessageKind::Command, TypeId::of::<C>(), C::NAME, f)
    }

    /// 注册带返回值的命令处理器
    pub fn command_with_result<C, H>(self, handler: Arc<H>) -> Result<Self, AppError>
    where
        C: CommandWithResult,
        H: CommandWithResultHandler<C> + 'static,
    {
        let f = erase(move |ctx, request| {
            let handler = handler.clone();

            Box::pin(async move {
                let cmd = request.into_message::<C>()?;
                let output = handler.handle(ctx, cmd).await?;
                Ok::<_, AppError>(Reply::new(output))
            })
        });

        self.insert(
            MessageKind::CommandWithResult,
            TypeId::of::<C>(),
            C::NAME,
            f,
        )
    }

    /// 注册查询处理器
    pub fn query<Q, H>(self, handler: Arc<H>) -> Result<Self, AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let f = erase(move |ctx, request| {
            let handler = handler.clone();

            Box::pin(async move {
                let q = request.into_message::<Q>()?;
                let response = handler.handle(ctx, q).await?;
                Ok::<_, AppError>(Reply::new(response))
            })
        });

        self.insert(MessageKind::Query, TypeId::of::<Q>(), Q::NAME, f)
    }

    /// 追加通知处理器；同一通知可注册多个，按注册顺序投递
    pub fn notification<N, H>(mut self, handler: Arc<H>) -> Result<Self, AppError>
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let f = erase_notification(move |ctx, message| {
            let handler = handler.clone();

            Box::pin(async move {
                let notification =
                    message
                        .downcast_ref::<N>()
                        .ok_or_else(|| AppError::TypeMismatch {
                            expected: type_name::<N>(),
                            found: N::NAME,
                        })?;
                handler.handle(ctx, notification).await
            })
        });

        let handlers = self.notifications.entry(TypeId::of::<N>()).or_default();
        handlers.push(f);
        tracing::debug!(
            name = N::NAME,
            handlers = handlers.len(),
            "notification handler registered"
        );
        Ok(self)
    }

    /// 追加管道行为；先注册者位于外层
    pub fn behavior(mut self, behavior: Arc<dyn PipelineBehavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn publish_strategy(mut self, strategy: PublishStrategy) -> Self {
        self.publish_strategy = strategy;
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
            notifications: self.notifications,
            behaviors: self.behaviors,
            publish_strategy: self.publish_strategy,
        }
    }
}
