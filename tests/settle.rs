#![cfg(feature = "async")]

mod common;
use std::time::Instant;

use common::create_workspace_with_config;
use varflow::{AnalysisStatus, Config, MacroId};

#[tokio::test]
async fn test_settle_waits_for_debounce() {
    let config = Config {
        debounce_ms: 20,
        ..Config::default()
    };
    let mut ws = create_workspace_with_config(config, &[("A", "{{setvar::x::1}}"), ("B", "{{getvar::x}}")]);

    ws.edit_content("A", "{{setvar::x::2}}", Instant::now()).unwrap();
    assert_eq!(ws.status(), AnalysisStatus::Pending);

    assert!(ws.settle().await);
    assert_eq!(ws.status(), AnalysisStatus::Idle);
    assert_eq!(ws.report().snapshot(&MacroId::new("B", 0)), Some("2"));
}

#[tokio::test]
async fn test_settle_without_pending_edit() {
    let mut ws = create_workspace_with_config(Config::default(), &[("A", "")]);
    assert!(!ws.settle().await);
}
