use nova_config::{init_tracing, LoggingConfig};
use tempfile::tempdir;

#[test]
fn init_tracing_writes_to_the_configured_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nova.log");
    let config = LoggingConfig {
        level: "info".to_owned(),
        stderr: false,
        file: Some(path.clone()),
        ..LoggingConfig::default()
    };

    init_tracing(&config);
    // Later calls keep the first subscriber.
    init_tracing(&LoggingConfig::default());

    tracing::info!(target: "nova.config", "file sink smoke test");

    let text = std::fs::read_to_string(&path).expect("log file should exist");
    assert!(text.contains("file sink smoke test"), "{text}");
}
