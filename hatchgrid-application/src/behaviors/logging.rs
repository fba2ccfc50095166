use crate::{
    context::AppContext,
    error::AppError,
    pipeline::{Next, PipelineBehavior, Reply, Request},
};
use async_trait::async_trait;
use std::time::Instant;
use tracing::Instrument;

/// 日志行为：通常作为第一个注册的行为，以便包裹其余所有行为
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl PipelineBehavior for LoggingBehavior {
    async fn handle(
        &self,
        ctx: &AppContext,
        request: Request,
        next: Next<'_>,
    ) -> Result<Reply, AppError> {
        let span = tracing::info_span!(
            "dispatch",
            message = request.name(),
            kind = %request.kind(),
            correlation_id = ctx.correlation_id(),
        );
        let started = Instant::now();

        let result = next.run(ctx, request).instrument(span.clone()).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        span.in_scope(|| match &result {
            Ok(_) => tracing::debug!(elapsed_ms, "handled"),
            Err(e) if e.is_cancelled() => tracing::debug!(elapsed_ms, "cancelled"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "failed"),
        });

        result
    }
}
