use std::{env, fs};

use infracat_server::config::loader::load_config;

#[test]
fn environment_overrides_file() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("infracat.toml");
    fs::write(
        &path,
        r#"
[refresh]
interval_secs = 30

[connector]
page_size = 10
"#,
    )
    .unwrap();

    // SAFETY: this test binary runs a single test, nothing reads the
    // environment concurrently.
    unsafe {
        env::set_var("INFRACAT__REFRESH__INTERVAL_SECS", "5");
        env::set_var("INFRACAT__CONNECTOR__PLATFORM_TYPE", "Apache Kafka Server");
    }

    let cfg = load_config(Some(path.to_str().unwrap())).expect("load config");
    assert_eq!(cfg.refresh.interval_secs, 5);
    assert_eq!(cfg.connector.page_size, 10);
    assert_eq!(
        cfg.connector.platform_type.as_deref(),
        Some("Apache Kafka Server")
    );

    unsafe {
        env::remove_var("INFRACAT__REFRESH__INTERVAL_SECS");
        env::remove_var("INFRACAT__CONNECTOR__PLATFORM_TYPE");
    }
}
