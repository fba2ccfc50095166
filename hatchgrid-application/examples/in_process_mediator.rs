use async_trait::async_trait;
use hatchgrid_application::InProcessMediator;
use hatchgrid_application::behaviors::{LoggingBehavior, ValidationBehavior};
use hatchgrid_application::command_handler::CommandWithResultHandler;
use hatchgrid_application::context::AppContext;
use hatchgrid_application::error::AppError;
use hatchgrid_application::mediator::Mediator;
use hatchgrid_application::notification_handler::NotificationHandler;
use hatchgrid_application::query_handler::QueryHandler;
use hatchgrid_application::registry::{MessageKey, Registry};
use hatchgrid_domain::presentation::pagination::{CursorPageResponse, PaginationConfig};
use hatchgrid_macros::{command, notification, query, response};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[command(output = String)]
struct CreateWorkspace {
    name: String,
}

#[notification]
struct WorkspaceCreated {
    id: String,
}

#[response]
struct WorkspaceResponse {
    id: String,
    name: String,
}

#[query(response = CursorPageResponse<WorkspaceResponse>)]
struct ListWorkspaces {
    size: Option<usize>,
}

#[derive(Default)]
struct Workspaces {
    rows: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CommandWithResultHandler<CreateWorkspace> for Workspaces {
    async fn handle(&self, _ctx: &AppContext, cmd: CreateWorkspace) -> Result<String, AppError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| AppError::Infra(e.to_string()))?;
        let id = format!("w{}", rows.len() + 1);
        rows.push((id.clone(), cmd.name));
        Ok(id)
    }
}

#[async_trait]
impl QueryHandler<ListWorkspaces> for Workspaces {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: ListWorkspaces,
    ) -> Result<CursorPageResponse<WorkspaceResponse>, AppError> {
        let size = PaginationConfig::default().resolve_size(q.size)?;
        let rows = self
            .rows
            .lock()
            .map_err(|e| AppError::Infra(e.to_string()))?;
        let window: Vec<WorkspaceResponse> = rows
            .iter()
            .take(size + 1)
            .map(|(id, name)| WorkspaceResponse {
                id: id.clone(),
                name: name.clone(),
            })
            .collect();
        Ok(CursorPageResponse::from_window(window, size, None, |w| {
            format!("cursor@{}", w.id)
        }))
    }
}

struct Announcer;

#[async_trait]
impl NotificationHandler<WorkspaceCreated> for Announcer {
    async fn handle(&self, _ctx: &AppContext, n: &WorkspaceCreated) -> Result<(), AppError> {
        tracing::info!(id = %n.id, "workspace created");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let workspaces = Arc::new(Workspaces::default());
    let validation = ValidationBehavior::new().with(|cmd: &CreateWorkspace| {
        if cmd.name.trim().is_empty() {
            return Err(AppError::Validation("workspace name must not be blank".into()));
        }
        Ok(())
    });

    let registry = Registry::builder()
        .behavior(Arc::new(LoggingBehavior))
        .behavior(Arc::new(validation))
        .command_with_result::<CreateWorkspace, _>(workspaces.clone())?
        .query::<ListWorkspaces, _>(workspaces)?
        .notification::<WorkspaceCreated, _>(Arc::new(Announcer))?
        .build();
    registry.ensure_registered(&[
        MessageKey::command_with_result::<CreateWorkspace>(),
        MessageKey::query::<ListWorkspaces>(),
    ])?;

    let mediator = InProcessMediator::new(Arc::new(registry));
    let ctx = AppContext::builder()
        .correlation_id("cor-1")
        .actor_id("u-1")
        .build();

    for name in ["Acme", "Globex", "Initech"] {
        let id = mediator
            .send_with_result(&ctx, CreateWorkspace { name: name.into() })
            .await?;
        mediator.publish(&ctx, WorkspaceCreated { id }).await?;
    }

    // 空白名称 -> 被校验行为拒绝，处理器不会执行
    if let Err(AppError::Validation(reason)) = mediator
        .send_with_result(&ctx, CreateWorkspace { name: " ".into() })
        .await
    {
        eprintln!("rejected as expected: {reason}");
    }

    let page = mediator.ask(&ctx, ListWorkspaces { size: Some(2) }).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}
