//! Tests for variant profiles and environment layering.

use litpack_config::{BuildVariant, CompressAlgorithm, ConfigDiscovery};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

const CONFIG: &str = r#"
output_dir = "dist"
external = ["lit"]

[lit]
verbose = false

[compress]
algorithms = ["gzip", "brotli"]

[profiles.production.compress]
algorithms = ["brotli"]
brotli_quality = 10

[profiles.production.size_report]
max_bytes = 200000

[profiles.library]
output_dir = "lib"
"#;

#[test]
fn production_profile_overrides_stage_options() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("litpack.toml"), CONFIG).expect("write config");

    let config = ConfigDiscovery::new(dir.path())
        .without_env()
        .load_for_variant(BuildVariant::Production)
        .expect("load with profile");

    assert_eq!(config.compress.algorithms, vec![CompressAlgorithm::Brotli]);
    assert_eq!(config.compress.brotli_quality, 10);
    assert_eq!(config.compress.gzip_level, 9);
    assert_eq!(config.size_report.max_bytes, Some(200_000));
    assert!(!config.lit.verbose);
    assert_eq!(config.output_dir, PathBuf::from("dist"));
}

#[test]
fn library_profile_overrides_top_level_fields() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("litpack.toml"), CONFIG).expect("write config");

    let config = ConfigDiscovery::new(dir.path())
        .without_env()
        .load_for_variant(BuildVariant::Library)
        .expect("load with profile");

    assert_eq!(config.output_dir, PathBuf::from("lib"));
    assert_eq!(config.external, vec!["lit".to_string()]);
    assert_eq!(config.compress.algorithms.len(), 2);
}

#[test]
fn variant_without_profile_keeps_base() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("litpack.toml"), CONFIG).expect("write config");

    let config = ConfigDiscovery::new(dir.path())
        .without_env()
        .load_for_variant(BuildVariant::Serve)
        .expect("load");

    assert_eq!(config.compress.algorithms.len(), 2);
    assert_eq!(config.size_report.max_bytes, None);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");

    let config = ConfigDiscovery::new(dir.path())
        .without_env()
        .load_for_variant(BuildVariant::Default)
        .expect("defaults");

    assert_eq!(config.output_dir, PathBuf::from("dist"));
    assert!(config.html.is_none());
}

#[test]
fn environment_overrides_file_values() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("litpack.toml"), CONFIG).expect("write config");

    // SAFETY: env mutation is serialized by `test_lock`.
    unsafe {
        std::env::set_var("LITPACK_OUTPUT_DIR", "public");
        std::env::set_var("LITPACK_COMPRESS__GZIP_LEVEL", "3");
    }

    let result = ConfigDiscovery::new(dir.path()).load();

    unsafe {
        std::env::remove_var("LITPACK_OUTPUT_DIR");
        std::env::remove_var("LITPACK_COMPRESS__GZIP_LEVEL");
    }

    let config = result.expect("load");
    assert_eq!(config.output_dir, PathBuf::from("public"));
    assert_eq!(config.compress.gzip_level, 3);
    assert_eq!(config.external, vec!["lit".to_string()]);
}
