use hatchgrid_application::notification::Notification;
use hatchgrid_application::response::Response;
use hatchgrid_macros::{notification, response};

#[notification]
struct WorkspaceCreated {
    id: String,
}

#[notification(name = "member.invited")]
enum MemberEvent {
    Invited { email: String },
}

#[response]
#[derive(serde::Serialize, PartialEq)]
struct Count {
    total: u64,
}

fn assert_response<R: Response>() {}

fn main() {
    assert_eq!(WorkspaceCreated::NAME, "WorkspaceCreated");
    assert_eq!(<MemberEvent as Notification>::NAME, "member.invited");

    let _ = WorkspaceCreated { id: "w1".into() }.clone();
    let _ = format!("{:?}", MemberEvent::Invited { email: "a@b.c".into() });

    assert_response::<Count>();
    let count = Count { total: 3 };
    assert!(count.clone() == count);
}
