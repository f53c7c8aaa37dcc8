use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = PosterConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.placeholder, "/img/no-img.jpg");
    assert_eq!(cfg.default_font, DEFAULT_FONT);
    assert_eq!(cfg.cache_dir(), PathBuf::from(".").join("cache"));
    assert_eq!(cfg.http_timeout(), Duration::from_secs(10));
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: PosterConfig =
        serde_json::from_str(r#"{ "storage_root": "/srv/store", "http_timeout_ms": 2500 }"#)
            .unwrap();
    assert_eq!(cfg.storage_root, PathBuf::from("/srv/store"));
    assert_eq!(cfg.fonts_dir, PathBuf::from("fonts"));
    assert_eq!(cfg.cache_dir(), PathBuf::from("/srv/store/cache"));
    assert_eq!(cfg.http_timeout(), Duration::from_millis(2500));
}

#[test]
fn zero_timeout_is_rejected() {
    let cfg = PosterConfig {
        http_timeout_ms: 0,
        ..PosterConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("config error:"));
}

#[test]
fn from_path_reports_file_name_on_bad_json() {
    let dir = std::env::temp_dir().join(format!("poster_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = PosterConfig::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("bad.json"));

    std::fs::remove_dir_all(&dir).ok();
}
