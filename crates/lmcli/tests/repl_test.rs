use std::fs;
use std::path::Path;

use lmcli::commands::Registry;
use lmcli::repl::{self, Flow};
use lmcli::{Session, SessionBuilder};
use lmcli_client::{Client, ClientConfigBuilder};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> Value {
    json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
        }],
    })
}

async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(content)),
        )
        .mount(server)
        .await;
}

fn session_for(server: &MockServer, working_dir: &Path) -> Session {
    let config = ClientConfigBuilder::new()
        .with_base_url(format!("{}/v1", server.uri()))
        .build();
    SessionBuilder::with_client(Client::new(config))
        .with_working_dir(working_dir)
        .build()
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|req| req.url.path() == "/v1/chat/completions")
        .map(|req| req.body_json::<Value>().unwrap())
        .collect()
}

fn message(body: &Value, index: usize) -> (&str, &str) {
    let message = &body["messages"][index];
    (
        message["role"].as_str().unwrap(),
        message["content"].as_str().unwrap(),
    )
}

#[tokio::test]
async fn test_chat_continues_conversation() {
    let server = MockServer::start().await;
    mount_completion(&server, "Sure.").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    let flow = repl::handle_line(&mut session, &registry, "hello there").await;
    assert_eq!(flow, Flow::Continue);
    repl::handle_line(&mut session, &registry, "  and again  ").await;

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(message(&bodies[0], 0), ("user", "hello there"));
    assert_eq!(bodies[1]["messages"].as_array().unwrap().len(), 3);
    assert_eq!(message(&bodies[1], 1), ("assistant", "Sure."));
    assert_eq!(message(&bodies[1], 2), ("user", "and again"));
    assert_eq!(session.client().transcript().len(), 4);
}

#[tokio::test]
async fn test_reset_clears_conversation() {
    let server = MockServer::start().await;
    mount_completion(&server, "Hi!").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "hello").await;
    assert_eq!(session.client().transcript().len(), 2);

    let flow = repl::handle_line(&mut session, &registry, "reset").await;
    assert_eq!(flow, Flow::Continue);
    assert!(session.client().transcript().is_empty());
}

#[tokio::test]
async fn test_meta_commands() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    for line in ["", "   ", "help", "H", "list", "dir"] {
        let flow = repl::handle_line(&mut session, &registry, line).await;
        assert_eq!(flow, Flow::Continue, "{line:?}");
    }
    for line in ["quit", "EXIT", " q "] {
        let flow = repl::handle_line(&mut session, &registry, line).await;
        assert_eq!(flow, Flow::Quit, "{line:?}");
    }
    assert!(request_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_command_starts_new_conversation() {
    let server = MockServer::start().await;
    mount_completion(&server, "Looks fine.").await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lib.rs"), "pub fn answer() -> u32 { 42 }\n")
        .unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "hello").await;
    repl::handle_line(&mut session, &registry, "analyze lib.rs").await;

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    let messages = bodies[1]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    let (role, content) = message(&bodies[1], 0);
    assert_eq!(role, "system");
    assert!(content.contains("code analysis expert"));
    let (role, content) = message(&bodies[1], 1);
    assert_eq!(role, "user");
    assert!(content.contains("Code (lib.rs):"));
    assert!(content.contains("pub fn answer() -> u32 { 42 }"));
}

#[tokio::test]
async fn test_dispatch_by_first_word() {
    let server = MockServer::start().await;
    mount_completion(&server, "Noted.").await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lib.rs"), "fn f() {}\n").unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "explainer of things").await;
    repl::handle_line(&mut session, &registry, "ANALYZE lib.rs").await;

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(message(&bodies[0], 0), ("user", "explainer of things"));
    let (role, content) = message(&bodies[1], 0);
    assert_eq!(role, "system");
    assert!(content.contains("code analysis expert"));
}

#[tokio::test]
async fn test_analyze_missing_file() {
    let server = MockServer::start().await;
    mount_completion(&server, "unused").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    let flow =
        repl::handle_line(&mut session, &registry, "analyze missing.rs").await;
    assert_eq!(flow, Flow::Continue);
    let flow = repl::handle_line(&mut session, &registry, "analyze").await;
    assert_eq!(flow, Flow::Continue);
    assert!(request_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_modify_writes_backup() {
    let server = MockServer::start().await;
    mount_completion(&server, "```ts\nconst a = 1;\n```").await;
    let dir: TempDir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.ts");
    fs::write(&file, "let a = 1;\n").unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "modify main.ts use const")
        .await;

    assert_eq!(
        fs::read_to_string(dir.path().join("main.ts.backup")).unwrap(),
        "let a = 1;\n"
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), "const a = 1;\n");

    let bodies = request_bodies(&server).await;
    let (_, content) = message(&bodies[0], 1);
    assert!(content.contains("\"use const\""));
    assert!(content.contains("let a = 1;"));
}

#[tokio::test]
async fn test_modify_missing_file() {
    let server = MockServer::start().await;
    mount_completion(&server, "unused").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "modify main.ts use const")
        .await;

    assert!(!dir.path().join("main.ts.backup").exists());
    assert!(request_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_generate_to_file() {
    let server = MockServer::start().await;
    mount_completion(&server, "Here:\n```rust\nfn main() {}\n```\n").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    let line = "generate a hello world program -l rust -o hello.rs";
    repl::handle_line(&mut session, &registry, line).await;

    assert_eq!(
        fs::read_to_string(dir.path().join("hello.rs")).unwrap(),
        "fn main() {}\n"
    );
    let bodies = request_bodies(&server).await;
    let (_, content) = message(&bodies[0], 0);
    assert!(content.contains("expert rust programmer"));
    let (_, content) = message(&bodies[0], 1);
    assert!(content.starts_with("Write rust code for: a hello world program"));
}

#[tokio::test]
async fn test_generate_rejects_unknown_option() {
    let server = MockServer::start().await;
    mount_completion(&server, "unused").await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    let flow =
        repl::handle_line(&mut session, &registry, "generate --bogus").await;
    assert_eq!(flow, Flow::Continue);
    assert!(request_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_explain_sends_tree() {
    let server = MockServer::start().await;
    mount_completion(&server, "A Rust library.").await;
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("project/src")).unwrap();
    fs::write(dir.path().join("project/Cargo.toml"), "").unwrap();
    fs::write(dir.path().join("project/src/lib.rs"), "").unwrap();
    fs::create_dir_all(dir.path().join("empty")).unwrap();
    let mut session = session_for(&server, dir.path());
    let registry = Registry::builtin();

    repl::handle_line(&mut session, &registry, "explain empty").await;
    assert!(request_bodies(&server).await.is_empty());

    repl::handle_line(&mut session, &registry, "explain project").await;
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let (_, content) = message(&bodies[0], 1);
    assert!(content.contains("```\nCargo.toml\nsrc/\n  lib.rs\n\n```"));
}

#[tokio::test]
async fn test_run_without_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, dir.path());

    repl::run(&mut session, &Registry::builtin()).await.unwrap();
    assert!(request_bodies(&server).await.is_empty());
}
