//! Scan capture through the services container

use std::time::Duration;

use bibliodesk::{
    config::ScannerConfig,
    models::{Key, ScanDisplay},
    scanner::ScanInput,
    AppConfig, AppState,
};

#[test]
fn test_gap_clears_partial_burst() {
    let state = AppState::new(AppConfig::default());
    let mut session = state.services.scanner.session();

    for (key, t) in [("A", 0), ("B", 50), ("C", 90), ("D", 260)] {
        assert!(session.on_key_event(&Key::from_name(key), t).is_none());
    }
    assert_eq!(session.buffer(), "D");
}

#[test]
fn test_single_emission_per_scan() {
    let state = AppState::new(AppConfig::default());
    let mut session = state.services.scanner.session();

    let scans: Vec<_> = [("1", 10), ("2", 40), ("3", 70), ("Enter", 95), ("Enter", 110)]
        .into_iter()
        .filter_map(|(key, t)| session.on_key_event(&Key::from_name(key), t))
        .collect();

    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].barcode, "123");
    assert_eq!(session.buffer(), "");
}

#[test]
fn test_configured_gap() {
    let config = AppConfig {
        scanner: ScannerConfig {
            inter_key_gap_ms: 30,
            ..ScannerConfig::default()
        },
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    let mut session = state.services.scanner.session();

    session.on_key_event(&Key::Char('1'), 0);
    session.on_key_event(&Key::Char('2'), 50);
    assert_eq!(session.buffer(), "2");
}

#[tokio::test(start_paused = true)]
async fn test_dialog_flow() {
    let state = AppState::new(AppConfig::default());
    let mut dialog = state.services.scanner.open_dialog();

    // someone typing in the search box while the dialog is open
    for key in ["h", "i"] {
        dialog.press(key).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    dialog.press("Enter").await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(dialog.display(), ScanDisplay::Waiting);

    // the scanner burst
    for key in ["R", "0", "0", "7", "Enter"] {
        dialog.press(key).await;
        tokio::time::sleep(Duration::from_millis(15)).await;
    }
    assert_eq!(dialog.display(), ScanDisplay::Scanned("R007".into()));
    assert_eq!(dialog.next_scan().await.as_deref(), Some("R007"));

    dialog.send(ScanInput::Close).await;
    assert!(dialog.shutdown().await.is_empty());
}
