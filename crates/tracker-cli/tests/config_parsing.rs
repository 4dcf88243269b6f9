use std::{env, fs};

use tracker_cli::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("tracker.toml");

    let toml_content = r#"
[search]
default_page_size = 20
max_page_size = 200

[logging]
level = "debug"

[auth]
properties_file = "/opt/dhis2/dhis.conf"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.search.default_page_size, 20);
    assert_eq!(cfg.search.max_page_size, 200);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(
        cfg.auth.properties_file.as_deref(),
        Some("/opt/dhis2/dhis.conf")
    );

    // 2) Env override wins over file
    unsafe {
        env::set_var("TRACKER__SEARCH__MAX_PAGE_SIZE", "500");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.search.max_page_size, 500);
    unsafe {
        env::remove_var("TRACKER__SEARCH__MAX_PAGE_SIZE");
    }

    // 3) Missing sections take defaults
    let partial_path = dir.path().join("partial.toml");
    fs::write(&partial_path, "[logging]\nlevel = \"warn\"\n").expect("write partial toml");
    let partial = load_config(partial_path.to_str()).expect("should parse partial config");
    assert_eq!(partial.search.default_page_size, 50);
    assert_eq!(partial.search.max_page_size, 1000);

    // 4) default above max is rejected
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[search]
default_page_size = 100
max_page_size = 10
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("default_page_size must be <="));

    // 5) Explicit path that does not exist
    let missing = dir.path().join("missing.toml");
    let err = load_config(missing.to_str()).expect_err("expected missing file error");
    assert!(err.contains("not found"));
}
