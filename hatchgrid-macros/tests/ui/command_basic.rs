use hatchgrid_application::command::{Command, CommandWithResult};
use hatchgrid_macros::command;

#[command]
struct ArchiveWorkspace {
    id: String,
}

#[command(output = String, name = "workspace.create")]
#[derive(PartialEq)]
struct CreateWorkspace {
    name: String,
}

#[command]
#[derive(Clone, Debug)]
enum ToggleMember {
    Enable { member: String },
    Disable { member: String },
}

fn assert_command<C: Command>() {}
fn assert_command_with_result<C: CommandWithResult<Output = String>>() {}

fn main() {
    assert_command::<ArchiveWorkspace>();
    assert_command::<ToggleMember>();
    assert_command_with_result::<CreateWorkspace>();

    assert_eq!(ArchiveWorkspace::NAME, "ArchiveWorkspace");
    assert_eq!(<CreateWorkspace as CommandWithResult>::NAME, "workspace.create");

    // Debug/Clone 由宏补齐，已有的派生不会重复
    let cmd = ArchiveWorkspace { id: "w1".into() };
    let _ = format!("{:?}", cmd.clone());
    let create = CreateWorkspace { name: "Acme".into() };
    assert!(create.clone() == create);
    let _ = format!("{:?}", ToggleMember::Enable { member: "m1".into() });
    let _ = ToggleMember::Disable { member: "m2".into() };
}
