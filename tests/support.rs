use std::time::Duration;

use specplot::config::DEFAULT_SERVER_URL;
use specplot::data::export::{file_name_from_disposition, ExportBlob};
use specplot::data::form::FieldValue;
use specplot::remote::server_message;
use specplot::{RemoteClient, SpecError, SpecPlotConfig, Theme};

#[test]
fn config_defaults() {
    let cfg = SpecPlotConfig::default();
    assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
    assert_eq!(cfg.delete_timeout(), Duration::from_secs(3));
    assert_eq!(cfg.label_max_len, 20);
    assert_eq!(cfg.theme, Theme::Light);
    assert!(cfg.session_token.is_none());
}

#[test]
fn config_survives_a_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut cfg = SpecPlotConfig {
        server_url: "http://spectra.lab:8080".into(),
        theme: Theme::Dark,
        delete_confirm_ms: 5000,
        ..Default::default()
    };
    cfg.initial_form
        .insert("normalize".into(), FieldValue::Bool(true));
    cfg.initial_form
        .insert("lam".into(), FieldValue::Text("1000".into()));
    cfg.save_to_path(&path).unwrap();

    let loaded = SpecPlotConfig::load_from_path(&path).unwrap();
    assert_eq!(loaded.server_url, "http://spectra.lab:8080");
    assert_eq!(loaded.theme, Theme::Dark);
    assert_eq!(loaded.delete_timeout(), Duration::from_secs(5));
    assert_eq!(loaded.initial_form, cfg.initial_form);
}

#[test]
fn partial_config_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "theme: dark\nlabel_max_len: 12\n").unwrap();

    let cfg = SpecPlotConfig::load_from_path(&path).unwrap();
    assert_eq!(cfg.theme, Theme::Dark);
    assert_eq!(cfg.label_max_len, 12);
    assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
}

#[test]
fn unreadable_config_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = SpecPlotConfig::load_from_path(&dir.path().join("absent.yaml"));
    assert!(matches!(missing, Err(SpecError::Config(_))));

    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "theme: [not, a, theme\n").unwrap();
    assert!(matches!(
        SpecPlotConfig::load_from_path(&path),
        Err(SpecError::Config(_))
    ));
}

#[test]
fn overrides_ignore_blank_values() {
    let mut cfg = SpecPlotConfig::default();
    cfg.apply_overrides(Some("  ".into()), Some(String::new()));
    assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
    assert!(cfg.session_token.is_none());

    cfg.apply_overrides(Some(" http://remote:5000 ".into()), Some("abc123\n".into()));
    assert_eq!(cfg.server_url, "http://remote:5000");
    assert_eq!(cfg.session_token.as_deref(), Some("abc123"));
}

#[test]
fn debug_output_hides_the_token() {
    let cfg = SpecPlotConfig {
        session_token: Some("secret-token".into()),
        ..Default::default()
    };
    assert!(!format!("{cfg:?}").contains("secret-token"));
}

#[test]
fn export_blob_writes_its_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let blob = ExportBlob {
        file_name: "mean_spectrum.csv".into(),
        bytes: b"frequency,mean\n1,2\n".to_vec(),
    };
    let path = dir.path().join(&blob.file_name);
    blob.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), blob.bytes);
}

#[test]
fn disposition_header_names_the_file() {
    assert_eq!(
        file_name_from_disposition(r#"attachment; filename="processed_spectra.csv""#),
        Some("processed_spectra.csv".to_string())
    );
    assert_eq!(
        file_name_from_disposition("attachment;filename=mean.csv"),
        Some("mean.csv".to_string())
    );
    assert_eq!(file_name_from_disposition("inline"), None);
    assert_eq!(file_name_from_disposition(r#"attachment; filename="""#), None);
}

#[test]
fn server_errors_prefer_the_json_message() {
    assert_eq!(server_message(r#"{"error": "No files uploaded"}"#), "No files uploaded");
    assert_eq!(server_message("  Bad Gateway \n"), "Bad Gateway");
    assert_eq!(server_message(r#"{"detail": "x"}"#), r#"{"detail": "x"}"#);
}

#[test]
fn remote_urls_join_cleanly() {
    let remote = RemoteClient::new("http://127.0.0.1:5000/", None).unwrap();
    assert_eq!(remote.base_url(), "http://127.0.0.1:5000");
    assert_eq!(remote.url("/process"), "http://127.0.0.1:5000/process");
    assert_eq!(remote.url("presets/3"), "http://127.0.0.1:5000/presets/3");
}

#[tokio::test]
async fn empty_upload_never_reaches_the_network() {
    let remote = RemoteClient::new("http://127.0.0.1:9", None).unwrap();
    let err = remote.upload(Vec::new()).await.unwrap_err();
    assert!(matches!(err, SpecError::Validation(_)));
}
