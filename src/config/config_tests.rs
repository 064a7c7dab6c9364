use super::*;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_empty_toml_produces_defaults() {
    let cfg: OrdoConfig = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(cfg, OrdoConfig::default());
    assert_eq!(cfg.sequencing.gap, 1000);
    assert_eq!(cfg.sequencing.max_attempts, 2);
    assert!(!cfg.maintenance.enabled);
    assert_eq!(cfg.maintenance.title, "Page Under Maintenance");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let cfg: OrdoConfig = toml::from_str("[sequencing]\ngap = 10\n").unwrap();
    assert_eq!(cfg.sequencing.gap, 10);
    assert_eq!(cfg.sequencing.max_attempts, 2);
    assert_eq!(cfg.auth, AuthConfig::default());
}

#[test]
fn test_sequencing_builds_engine_and_policy() {
    let cfg = SequencingConfig {
        gap: 1,
        max_attempts: 0,
    };
    assert_eq!(cfg.sequencer().gap(), crate::sequencer::MIN_GAP);
    assert_eq!(cfg.retry_policy().max_attempts(), 1);
}

#[test]
fn test_session_ttl_parses_humantime() {
    let auth = AuthConfig {
        session_ttl: "90m".to_string(),
        ..AuthConfig::default()
    };
    assert_eq!(auth.session_ttl().unwrap(), Duration::from_secs(90 * 60));
    assert_eq!(
        AuthConfig::default().session_ttl().unwrap(),
        Duration::from_secs(24 * 60 * 60)
    );
}

#[test]
fn test_invalid_session_ttl() {
    let auth = AuthConfig {
        session_ttl: "forever".to_string(),
        ..AuthConfig::default()
    };
    let err = auth.session_ttl().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDuration { ref value, .. } if value == "forever"));
}

#[test]
fn test_maintenance_set_and_reset() {
    let mut maintenance = MaintenanceConfig::default();
    maintenance.set(MaintenanceField::Title, "  Back soon ");
    assert_eq!(maintenance.title, "Back soon");
    maintenance.set(MaintenanceField::Title, "   ");
    assert_eq!(maintenance.title, MaintenanceConfig::default().title);
    maintenance.set(MaintenanceField::CompanyName, "Ordo Legal");
    assert_eq!(maintenance.company_name, "Ordo Legal");
}

#[tokio::test]
async fn test_load_missing_file_returns_defaults() {
    let dir = tempdir().unwrap();
    let cfg = load_config(dir.path()).await.unwrap();
    assert_eq!(cfg, OrdoConfig::default());
}

#[tokio::test]
async fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let mut cfg = OrdoConfig::default();
    cfg.maintenance.enabled = true;
    cfg.auth.password_sha256 = Some("ab".repeat(32));
    save_config(dir.path(), &cfg).await.unwrap();

    assert!(config_path(dir.path()).exists());
    let loaded = load_config(dir.path()).await.unwrap();
    assert_eq!(loaded, cfg);
}

#[tokio::test]
async fn test_load_rejects_bad_ttl() {
    let dir = tempdir().unwrap();
    std::fs::write(
        config_path(dir.path()),
        "[auth]\nsession_ttl = \"soon\"\n",
    )
    .unwrap();
    assert!(matches!(
        load_config(dir.path()).await,
        Err(ConfigError::InvalidDuration { .. })
    ));
}

#[tokio::test]
async fn test_load_rejects_malformed_toml() {
    let dir = tempdir().unwrap();
    std::fs::write(config_path(dir.path()), "[sequencing\n").unwrap();
    assert!(matches!(
        load_config(dir.path()).await,
        Err(ConfigError::TomlError(_))
    ));
}
