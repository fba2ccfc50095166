use bon::Builder;
use tokio_util::sync::CancellationToken;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询/通知）所需的横切信息，例如：
/// - 关联追踪 `correlation_id` 与执行者 `actor_id`；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等；
/// - 取消令牌：令牌触发后，进行中的分发立即以 `AppError::Cancelled` 结束。
///
/// 典型用法：
/// ```rust
/// use hatchgrid_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123")
///     .actor_id("u-1")
///     .idempotency_key("idem-xyz")
///     .build();
///
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// assert!(!ctx.cancellation().is_cancelled());
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    #[builder(into)]
    correlation_id: Option<String>,
    #[builder(into)]
    actor_id: Option<String>,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    #[builder(into)]
    idempotency_key: Option<String>,
    #[builder(default)]
    cancellation: CancellationToken,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// 派生子上下文：共享追踪信息，取消令牌为当前令牌的子令牌
    ///
    /// 取消父上下文会级联取消子上下文，反之不然。
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            ..self.clone()
        }
    }
}
