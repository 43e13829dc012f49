mod support;

use chat_desk_client::{
    cmd::{COMMANDS, command_info, process_command},
    types::{EditorMode, LogLevel},
};
use common::types::SessionStatus;
use support::{FakeBackend, desk, drain, product, session};

#[test]
fn every_command_has_usage() {
    for info in COMMANDS {
        assert!(info.usage.starts_with(info.name), "{}", info.name);
        assert!(!info.desc.is_empty());
    }
    assert!(command_info("pick").is_some());
    assert!(command_info("nope").is_none());
}

#[tokio::test(start_paused = true)]
async fn open_and_close_commands() {
    let backend = FakeBackend::new();
    backend.add_session(session("7", SessionStatus::Pending));
    let (desk, _log_rx) = desk(backend);

    process_command(&desk, "open 7").await;
    assert_eq!(desk.state.lock().await.open_session_id(), Some("7"));

    process_command(&desk, "close").await;
    assert!(desk.state.lock().await.detail.is_none());
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let (desk, mut log_rx) = desk(FakeBackend::new());

    process_command(&desk, "frobnicate now").await;
    assert_eq!(
        drain(&mut log_rx),
        vec![(LogLevel::ERROR, "Unknown command: frobnicate".to_string())]
    );
}

#[tokio::test]
async fn help_flag_describes_the_command() {
    let (desk, mut log_rx) = desk(FakeBackend::new());

    process_command(&desk, "pick -h").await;
    assert_eq!(
        drain(&mut log_rx),
        vec![(
            LogLevel::INFO,
            "pick: Send the n-th product of the search results (pick <n>)".to_string()
        )]
    );
}

#[tokio::test]
async fn missing_arguments_show_usage() {
    let (desk, mut log_rx) = desk(FakeBackend::new());

    process_command(&desk, "open").await;
    process_command(&desk, "pick 0").await;
    assert_eq!(
        drain(&mut log_rx),
        vec![
            (LogLevel::ERROR, "Usage: open <session_id>".to_string()),
            (LogLevel::ERROR, "Usage: pick <n>".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn search_then_pick_sends_the_numbered_product() {
    let backend = FakeBackend::new();
    backend.add_session(session("7", SessionStatus::Active));
    backend.with(|s| {
        s.products = vec![product("1", "Red Widget"), product("2", "Blue Widget")];
    });
    let (desk, _log_rx) = desk(backend.clone());

    process_command(&desk, "open 7").await;
    process_command(&desk, "search widget").await;
    assert_eq!(desk.state.lock().await.mode, EditorMode::SEARCH);

    process_command(&desk, "pick 2").await;
    assert_eq!(
        backend.with(|s| s.product_links.clone()),
        vec![("7".to_string(), "2".to_string())]
    );
    assert!(!desk.state.lock().await.products.visible);
}

#[tokio::test(start_paused = true)]
async fn status_command_updates_the_session() {
    let backend = FakeBackend::new();
    backend.add_session(session("7", SessionStatus::Pending));
    let (desk, _log_rx) = desk(backend.clone());

    process_command(&desk, "open 7").await;
    process_command(&desk, "status active").await;

    assert_eq!(
        backend.with(|s| s.statuses.clone()),
        vec![("7".to_string(), SessionStatus::Active)]
    );
}
