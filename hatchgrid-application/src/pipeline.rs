//! 管道行为（Pipeline Behavior）
//!
//! 每一次分发都会经过注册顺序排列的行为链，最内层为目标处理器：
//!
//! ```text
//! B1.before -> B2.before -> ... -> handler -> ... -> B2.after -> B1.after
//! ```
//!
//! 行为以类型擦除的 [`Request`] 观察消息，以 [`Reply`] 观察结果；
//! [`Next`] 在调用 [`Next::run`] 时被消耗，因此一次分发中处理器至多执行一次。
//!
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// 消息类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    CommandWithResult,
    Query,
    Notification,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::CommandWithResult => "command_with_result",
            MessageKind::Query => "query",
            MessageKind::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 进行中的消息（类型擦除）
pub struct Request {
    name: &'static str,
    kind: MessageKind,
    type_id: TypeId,
    body: Box<dyn Any + Send + Sync>,
}

impl Request {
    pub(crate) fn new<M>(name: &'static str, kind: MessageKind, message: M) -> Self
    where
        M: Any + Send + Sync,
    {
        Self {
            name,
            kind,
            type_id: TypeId::of::<M>(),
            body: Box::new(message),
        }
    }

    /// 消息的稳定名称（`NAME`）
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 以具体类型借用消息；类型不符时返回 `None`
    pub fn message<T: Any>(&self) -> Option<&T> {
        self.body.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        &*self.body
    }

    pub(crate) fn into_message<T: Any>(self) -> Result<T, AppError> {
        let found = self.name;
        self.body
            .downcast::<T>()
            .map(|m| *m)
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<T>(),
                found,
            })
    }

    pub(crate) fn into_body(self) -> Box<dyn Any + Send + Sync> {
        self.body
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// 处理结果（类型擦除）
///
/// 短路的行为必须返回与消息输出类型一致的 `Reply`，否则调用方得到 `AppError::TypeMismatch`。
pub struct Reply {
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl Reply {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn unit() -> Self {
        Self::new(())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// 还原为具体类型；失败时原样返回
    pub fn downcast<T: Any>(self) -> Result<T, Reply> {
        let type_name = self.type_name;
        self.value
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|value| Reply { type_name, value })
    }

    pub(crate) fn restore<T: Any>(self) -> Result<T, AppError> {
        self.downcast::<T>().map_err(|reply| AppError::TypeMismatch {
            expected: type_name::<T>(),
            found: reply.type_name,
        })
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reply").field(&self.type_name).finish()
    }
}

pub(crate) type Terminal<'a> =
    Box<dyn FnOnce(Request) -> BoxFuture<'a, Result<Reply, AppError>> + Send + 'a>;

pub(crate) fn terminal<'a, F>(f: F) -> Terminal<'a>
where
    F: FnOnce(Request) -> BoxFuture<'a, Result<Reply, AppError>> + Send + 'a,
{
    Box::new(f)
}

/// 行为链的剩余部分
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn PipelineBehavior>],
    terminal: Terminal<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(behaviors: &'a [Arc<dyn PipelineBehavior>], terminal: Terminal<'a>) -> Self {
        Self {
            behaviors,
            terminal,
        }
    }

    /// 执行下一个行为；链尾执行目标处理器
    ///
    /// 处理器在上下文的取消令牌下执行：令牌触发时返回 `AppError::Cancelled`，
    /// 该错误沿失败路径逐层返回给外层行为。
    pub async fn run(self, ctx: &AppContext, request: Request) -> Result<Reply, AppError> {
        match self.behaviors.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    behaviors: rest,
                    terminal: self.terminal,
                };
                head.handle(ctx, request, next).await
            }
            None => {
                let name = request.name();
                tokio::select! {
                    biased;
                    _ = ctx.cancellation().cancelled() => {
                        tracing::debug!(name, "handler cancelled");
                        Err(AppError::Cancelled { message: name })
                    }
                    result = (self.terminal)(request) => result,
                }
            }
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.behaviors.len())
            .finish_non_exhaustive()
    }
}

/// 管道行为
///
/// - 在调用 `next.run` 之前检查或拒绝请求；
/// - 不调用 `next` 即短路，内层行为与处理器都不会执行；
/// - 在 `next.run` 之后观察或替换结果。
#[async_trait]
pub trait PipelineBehavior: Send + Sync {
    async fn handle(
        &self,
        ctx: &AppContext,
        request: Request,
        next: Next<'_>,
    ) -> Result<Reply, AppError>;
}
