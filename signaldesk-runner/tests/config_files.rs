//! Config and history files on disk.

use std::io::Write;

use signaldesk_runner::{
    load_history, save_history, AppConfig, ConfigError, DataSource, Session, SourceKind,
};

#[test]
fn config_written_then_read_is_identical() {
    let mut config = AppConfig::default();
    config.source.seed = 7;
    config.plan.target_pct = 0.08;
    config.display.currency = "GBP".into();
    config.search.exchange_marker = "BSE".into();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signaldesk.toml");
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = AppConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn invalid_file_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[plan\ntarget_pct = ").unwrap();
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn mock_session_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let config = AppConfig::default();
    assert_eq!(config.source.kind, SourceKind::Mock);

    let providers = DataSource::from_config(&config).unwrap().into_providers();
    let mut session = Session::start(providers.clone(), config.clone());
    session.request_plan("TCS.NS", None).unwrap();
    session.request_plan("INFY.NS", None).unwrap();
    save_history(&path, session.history()).unwrap();

    let restored = Session::start(providers, config).with_history(load_history(&path));
    let symbols: Vec<_> = restored.history().iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["INFY.NS", "TCS.NS"]);
    assert_eq!(
        restored.history().latest().unwrap().company_name.as_deref(),
        Some("Infosys Limited")
    );
}
