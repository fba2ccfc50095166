use hatchgrid_application::query::Query;
use hatchgrid_domain::presentation::pagination::CursorPageResponse;
use hatchgrid_macros::{query, response};

#[response]
struct WorkspaceResponse {
    id: String,
    name: String,
}

#[query(response = CursorPageResponse<WorkspaceResponse>)]
struct ListWorkspaces {
    size: Option<usize>,
    cursor: Option<String>,
}

#[query(response = Option<WorkspaceResponse>, name = "workspace.find")]
struct FindWorkspace {
    id: String,
}

#[query]
struct Ping;

fn assert_query<Q: Query>() -> &'static str {
    Q::NAME
}

fn main() {
    assert_eq!(assert_query::<ListWorkspaces>(), "ListWorkspaces");
    assert_eq!(assert_query::<FindWorkspace>(), "workspace.find");
    assert_eq!(assert_query::<Ping>(), "Ping");

    let _ = ListWorkspaces { size: Some(2), cursor: None }.clone();
    let _ = FindWorkspace { id: "w1".into() };

    let page: <ListWorkspaces as Query>::Response = CursorPageResponse::new(
        vec![WorkspaceResponse { id: "w1".into(), name: "Acme".into() }],
        None,
        None,
    );
    let _ = format!("{:?}", page.data());
}
