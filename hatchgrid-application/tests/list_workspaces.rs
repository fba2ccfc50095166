use async_trait::async_trait;
use hatchgrid_application::behaviors::LoggingBehavior;
use hatchgrid_application::context::AppContext;
use hatchgrid_application::error::AppError;
use hatchgrid_application::mediator::Mediator;
use hatchgrid_application::query_handler::QueryHandler;
use hatchgrid_application::registry::MessageKey;
use hatchgrid_application::{InProcessMediator, RegistryBuilder};
use hatchgrid_domain::error::DomainError;
use hatchgrid_domain::presentation::InvalidRequestError;
use hatchgrid_domain::presentation::InvalidRequestKind;
use hatchgrid_domain::presentation::pagination::{CursorPageResponse, PaginationConfig};
use hatchgrid_macros::{query, response};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Workspace {
    id: String,
    name: String,
    owner_id: String,
}

#[async_trait]
trait WorkspaceRepository: Send + Sync {
    async fn list_after(
        &self,
        owner_id: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Workspace>, AppError>;
}

/// 按 id 升序保存的内存仓储
struct InMemoryWorkspaceRepository {
    rows: Vec<Workspace>,
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn list_after(
        &self,
        owner_id: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Workspace>, AppError> {
        Ok(self
            .rows
            .iter()
            .filter(|w| w.owner_id == owner_id)
            .filter(|w| after.is_none_or(|a| w.id.as_str() > a))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[response]
#[derive(PartialEq)]
struct WorkspaceResponse {
    id: String,
    name: String,
}

#[query(response = CursorPageResponse<WorkspaceResponse>)]
struct ListWorkspaces {
    size: Option<usize>,
    cursor: Option<String>,
}

struct ListWorkspacesHandler {
    repo: Arc<dyn WorkspaceRepository>,
    pagination: PaginationConfig,
}

fn decode_cursor(token: &str) -> Result<&str, InvalidRequestError> {
    token
        .strip_prefix("cursor@")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| InvalidRequestError::general("invalid cursor"))
}

#[async_trait]
impl QueryHandler<ListWorkspaces> for ListWorkspacesHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: ListWorkspaces,
    ) -> Result<CursorPageResponse<WorkspaceResponse>, AppError> {
        let owner_id = ctx
            .actor_id()
            .ok_or_else(|| AppError::Authorization("anonymous caller".into()))?;
        let size = self.pagination.resolve_size(q.size)?;
        let after = q.cursor.as_deref().map(decode_cursor).transpose()?;

        let window = self.repo.list_after(owner_id, after, size + 1).await?;

        Ok(
            CursorPageResponse::from_window(window, size, q.cursor.clone(), |w| {
                format!("cursor@{}", w.id)
            })
            .map_items(|w| WorkspaceResponse {
                id: w.id,
                name: w.name,
            }),
        )
    }
}

fn workspace(id: &str, owner_id: &str) -> Workspace {
    Workspace {
        id: id.to_string(),
        name: format!("Workspace {id}"),
        owner_id: owner_id.to_string(),
    }
}

/// 总是失败的仓储
struct UnavailableWorkspaceRepository;

#[async_trait]
impl WorkspaceRepository for UnavailableWorkspaceRepository {
    async fn list_after(
        &self,
        _owner_id: &str,
        _after: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<Workspace>, AppError> {
        Err(DomainError::repository("workspace store unavailable").into())
    }
}

fn mediator(rows: Vec<Workspace>) -> InProcessMediator {
    mediator_with(Arc::new(InMemoryWorkspaceRepository { rows }))
}

fn mediator_with(repo: Arc<dyn WorkspaceRepository>) -> InProcessMediator {
    let handler = ListWorkspacesHandler {
        repo,
        pagination: PaginationConfig::default(),
    };
    let registry = RegistryBuilder::new()
        .behavior(Arc::new(LoggingBehavior))
        .query::<ListWorkspaces, _>(Arc::new(handler))
        .unwrap()
        .build();
    registry
        .ensure_registered(&[MessageKey::query::<ListWorkspaces>()])
        .unwrap();
    InProcessMediator::new(Arc::new(registry))
}

fn owner_ctx() -> AppContext {
    AppContext::builder()
        .actor_id("u-1")
        .correlation_id("cor-list")
        .build()
}

type Summary = (Vec<String>, Option<String>, Option<String>);

fn summary(page: CursorPageResponse<WorkspaceResponse>) -> Summary {
    let (data, prev, next) = page.into_parts();
    (data.into_iter().map(|w| w.id).collect(), prev, next)
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn pages_through_five_workspaces_two_at_a_time() {
    let rows = vec![
        workspace("w1", "u-1"),
        workspace("w2", "u-1"),
        workspace("w3", "u-1"),
        workspace("w9", "u-2"),
        workspace("w4", "u-1"),
        workspace("w5", "u-1"),
    ];
    let mediator = mediator(rows);
    let ctx = owner_ctx();

    let first = mediator
        .ask(&ctx, ListWorkspaces { size: Some(2), cursor: None })
        .await
        .unwrap();
    assert_eq!(
        summary(first),
        (ids(&["w1", "w2"]), None, Some("cursor@w2".to_string()))
    );

    let second = mediator
        .ask(
            &ctx,
            ListWorkspaces {
                size: Some(2),
                cursor: Some("cursor@w2".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        summary(second),
        (
            ids(&["w3", "w4"]),
            Some("cursor@w2".to_string()),
            Some("cursor@w4".to_string())
        )
    );

    let third = mediator
        .ask(
            &ctx,
            ListWorkspaces {
                size: Some(2),
                cursor: Some("cursor@w4".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        summary(third),
        (ids(&["w5"]), Some("cursor@w4".to_string()), None)
    );
}

#[tokio::test]
async fn first_page_serializes_with_camel_case_cursors() {
    let mediator = mediator(vec![workspace("w1", "u-1"), workspace("w2", "u-1")]);

    let page = mediator
        .ask(&owner_ctx(), ListWorkspaces { size: Some(1), cursor: None })
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        serde_json::json!({
            "data": [{ "id": "w1", "name": "Workspace w1" }],
            "prevPageCursor": null,
            "nextPageCursor": "cursor@w1",
        })
    );
}

#[tokio::test]
async fn empty_repository_yields_an_empty_page() {
    let mediator = mediator(Vec::new());

    let page = mediator
        .ask(&owner_ctx(), ListWorkspaces { size: None, cursor: None })
        .await
        .unwrap();

    assert!(page.data().is_empty());
    assert!(!page.has_prev());
    assert!(!page.has_next());
}

#[tokio::test]
async fn invalid_requests_keep_their_kind() {
    let mediator = mediator(vec![workspace("w1", "u-1")]);
    let ctx = owner_ctx();

    for q in [
        ListWorkspaces { size: Some(0), cursor: None },
        ListWorkspaces { size: Some(500), cursor: None },
        ListWorkspaces {
            size: None,
            cursor: Some("garbage".into()),
        },
    ] {
        match mediator.ask(&ctx, q.clone()).await {
            Err(AppError::InvalidRequest(e)) => {
                assert_eq!(e.kind(), InvalidRequestKind::General, "{q:?}")
            }
            other => panic!("expected an invalid request for {q:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn anonymous_callers_are_rejected() {
    let mediator = mediator(vec![workspace("w1", "u-1")]);

    let err = mediator
        .ask(&AppContext::default(), ListWorkspaces { size: None, cursor: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
}

#[tokio::test]
async fn exactly_full_last_page_has_no_next_cursor() {
    let rows = vec![
        workspace("w1", "u-1"),
        workspace("w2", "u-1"),
        workspace("w3", "u-1"),
        workspace("w4", "u-1"),
    ];
    let mediator = mediator(rows);
    let ctx = owner_ctx();

    let first = mediator
        .ask(&ctx, ListWorkspaces { size: Some(2), cursor: None })
        .await
        .unwrap();
    assert_eq!(first.next_page_cursor(), Some("cursor@w2"));

    let second = mediator
        .ask(
            &ctx,
            ListWorkspaces {
                size: Some(2),
                cursor: Some("cursor@w2".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&second).unwrap(),
        serde_json::json!({
            "data": [
                { "id": "w3", "name": "Workspace w3" },
                { "id": "w4", "name": "Workspace w4" },
            ],
            "prevPageCursor": "cursor@w2",
            "nextPageCursor": null,
        })
    );
}

#[tokio::test]
async fn repository_failures_surface_as_domain_errors() {
    let mediator = mediator_with(Arc::new(UnavailableWorkspaceRepository));

    let err = mediator
        .ask(&owner_ctx(), ListWorkspaces { size: None, cursor: None })
        .await
        .unwrap_err();

    match err {
        AppError::Domain(DomainError::Repository { reason }) => {
            assert_eq!(reason, "workspace store unavailable")
        }
        other => panic!("expected a repository error, got {other:?}"),
    }
}
