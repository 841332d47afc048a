use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use termlaunch::config_file::{PROJECTS_FILE, Settings};
use termlaunch::open_store;
use termlaunch::projects::command::TerminalCommand;
use termlaunch::replay::{LineSink, OutputLine, ProcessHost, launch_plan, replay};
use termlaunch::store::{ProjectStore, StoreError};

fn settings_in(dir: &Path) -> Settings {
    Settings {
        projects_location: Some(dir.to_path_buf()),
    }
}

fn write_projects(dir: &Path, content: &str) {
    std::fs::write(dir.join(PROJECTS_FILE), content).unwrap();
}

#[test]
fn test_end_to_end_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&settings_in(dir.path())).unwrap();
    assert_eq!(store.len(), 0);

    store.add_to_project_list("demo", "/repo");
    store.add_group("demo", "build").unwrap();
    store
        .add_commands("demo", "build", vec![TerminalCommand::new("compile", "make")])
        .unwrap();
    store.save().unwrap();

    store.reload().unwrap();
    let project = store.exists_with_root_path("/repo").unwrap();
    assert_eq!(
        project.groups.get("build"),
        Some(&vec![TerminalCommand::new("compile", "make")])
    );

    let fresh = open_store(&settings_in(dir.path())).unwrap();
    assert_eq!(fresh.projects(), store.projects());
}

#[test]
fn test_reload_picks_up_external_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&settings_in(dir.path())).unwrap();
    store.add_to_project_list("demo", "/repo");
    store.save().unwrap();

    write_projects(
        dir.path(),
        r#"[
            {"name": "demo", "root_path": "/repo", "groups": {}},
            {"name": "added", "root_path": "/elsewhere", "groups": {"g": []}}
        ]"#,
    );
    store.reload().unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.exists("added"));
}

#[test]
fn test_reload_after_file_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&settings_in(dir.path())).unwrap();
    store.add_to_project_list("demo", "/repo");
    store.save().unwrap();

    std::fs::remove_file(dir.path().join(PROJECTS_FILE)).unwrap();
    store.reload().unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_projects(dir.path(), "{not json");

    let mut store = ProjectStore::new(dir.path().join(PROJECTS_FILE));
    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    let message = err.to_string();
    assert!(message.contains(PROJECTS_FILE), "got: {message}");
    assert!(store.is_empty());
}

#[test]
fn test_loads_file_written_by_hand() {
    let dir = tempfile::tempdir().unwrap();
    write_projects(
        dir.path(),
        "[\n\t{\n\t\t\"name\": \"web\",\n\t\t\"root_path\": \"/srv/web\",\n\t\t\"groups\": {\n\t\t\t\"dev\": [\n\t\t\t\t{\"name\": \"serve\", \"script\": \"npm start\"},\n\t\t\t\t{\"name\": \"css\", \"script\": \"npm run css\"}\n\t\t\t],\n\t\t\t\"db\": [{\"name\": \"pg\", \"script\": \"docker compose up db\"}]\n\t\t}\n\t}\n]",
    );
    let store = open_store(&settings_in(dir.path())).unwrap();
    let project = store.exists_with_root_path("/srv/web").unwrap();
    assert_eq!(project.groups.names().collect::<Vec<_>>(), vec!["dev", "db"]);
    assert_eq!(project.command_count(), 3);

    let names: Vec<&str> = launch_plan(project)
        .iter()
        .map(|step| step.command.name.as_str())
        .collect();
    assert_eq!(names, vec!["serve", "css", "pg"]);
}

#[test]
fn test_missing_groups_key_defaults_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_projects(dir.path(), r#"[{"name": "bare", "root_path": "/bare"}]"#);
    let store = open_store(&settings_in(dir.path())).unwrap();
    assert!(store.project("bare").unwrap().groups.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_host_runs_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ProjectStore::new(dir.path().join(PROJECTS_FILE));
    store.add_to_project_list("demo", dir.path().to_string_lossy());
    store
        .add_commands(
            "demo",
            "files",
            vec![
                TerminalCommand::new("first", "echo one > first.txt"),
                TerminalCommand::new("second", "echo two > second.txt"),
            ],
        )
        .unwrap();
    store
        .add_commands("demo", "broken", vec![TerminalCommand::new("fail", "exit 3")])
        .unwrap();

    let project = store.project("demo").unwrap();
    let mut host = ProcessHost::new(dir.path());
    assert_eq!(replay(project, &mut host).await.unwrap(), 3);
    assert_eq!(host.wait().await.unwrap(), 1);

    assert_eq!(
        std::fs::read_to_string(dir.path().join("first.txt")).unwrap(),
        "one\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("second.txt")).unwrap(),
        "two\n"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_host_survives_invalid_utf8_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ProjectStore::new(dir.path().join(PROJECTS_FILE));
    store.add_to_project_list("demo", dir.path().to_string_lossy());
    store
        .add_commands(
            "demo",
            "binary",
            vec![TerminalCommand::new(
                "bytes",
                r"printf '\377\n'; sleep 0.3; echo after; echo done > marker.txt",
            )],
        )
        .unwrap();

    let lines = Arc::new(Mutex::new(Vec::new()));
    let captured = lines.clone();
    let sink: LineSink = Arc::new(move |line: OutputLine| captured.lock().push(line.text));

    let project = store.project("demo").unwrap();
    let mut host = ProcessHost::with_sink(dir.path(), sink);
    replay(project, &mut host).await.unwrap();
    assert_eq!(host.wait().await.unwrap(), 0);

    assert!(dir.path().join("marker.txt").exists());
    assert_eq!(*lines.lock(), vec!["\u{FFFD}".to_string(), "after".to_string()]);
}
