use crate::{
    context::AppContext,
    error::AppError,
    pipeline::{Next, PipelineBehavior, Reply, Request},
};
use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type Validator = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), AppError> + Send + Sync>;

/// 校验行为
///
/// 按消息类型注册校验函数，依注册顺序执行；任一失败即短路，处理器不会被调用。
/// 没有校验函数的消息直接放行。
///
/// ```rust
/// use hatchgrid_application::behaviors::ValidationBehavior;
/// use hatchgrid_application::error::AppError;
///
/// struct RenameWorkspace {
///     name: String,
/// }
///
/// let validation = ValidationBehavior::new().with(|cmd: &RenameWorkspace| {
///     if cmd.name.trim().is_empty() {
///         return Err(AppError::Validation("name must not be blank".into()));
///     }
///     Ok(())
/// });
/// assert_eq!(validation.len(), 1);
/// ```
#[derive(Default, Clone)]
pub struct ValidationBehavior {
    validators: HashMap<TypeId, Vec<Validator>>,
}

impl ValidationBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M, F>(mut self, validate: F) -> Self
    where
        M: Any + Send + Sync,
        F: Fn(&M) -> Result<(), AppError> + Send + Sync + 'static,
    {
        let validator: Validator = Arc::new(move |message: &(dyn Any + Send + Sync)| {
            match message.downcast_ref::<M>() {
                Some(message) => validate(message),
                None => Ok(()),
            }
        });
        self.validators
            .entry(TypeId::of::<M>())
            .or_default()
            .push(validator);
        self
    }

    /// 已注册的校验函数总数
    pub fn len(&self) -> usize {
        self.validators.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[async_trait]
impl PipelineBehavior for ValidationBehavior {
    async fn handle(
        &self,
        ctx: &AppContext,
        request: Request,
        next: Next<'_>,
    ) -> Result<Reply, AppError> {
        if let Some(validators) = self.validators.get(&request.type_id()) {
            for validate in validators {
                if let Err(e) = validate(request.as_any()) {
                    tracing::debug!(name = request.name(), error = %e, "rejected by validation");
                    return Err(e);
                }
            }
        }

        next.run(ctx, request).await
    }
}
