use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;
use workspace_hub::config::ConfigLoader;

const KEYS: &[&str] = &[
    "HUB_ENVIRONMENT",
    "HUB_DEBUG",
    "HUB_API_BIND_ADDR",
    "HUB_LOG_LEVEL",
    "HUB_LOG_FORMAT",
    "HUB_DATABASE_URL",
    "HUB_DB_MAX_CONNECTIONS",
    "HUB_SUPABASE_URL",
    "HUB_SUPABASE_KEY",
    "HUB_CORS_ALLOWED_ORIGINS",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.environment, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.effective_log_level(), "info");
    assert_eq!(cfg.log_format, "json");
    assert_eq!(cfg.db_max_connections, 10);
    assert!(cfg.cors_allowed_origins.is_empty());
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "HUB_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(&temp_dir, ".env.test", "HUB_API_BIND_ADDR=192.168.0.10:5000\n");
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "HUB_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // The environment is chosen by .env.local before environment-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "HUB_ENVIRONMENT=test\nHUB_API_BIND_ADDR=127.0.0.1:4000\nHUB_LOG_FORMAT=pretty\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.environment, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.log_format, "pretty");
    clear_env();
}

#[test]
fn keys_without_prefix_are_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "API_BIND_ADDR=127.0.0.1:1111\nOTHER_DB_MAX_CONNECTIONS=99\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.db_max_connections, 10);
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "HUB_API_BIND_ADDR=127.0.0.1:3000\nHUB_CORS_ALLOWED_ORIGINS=http://a.test\n",
    );

    unsafe {
        env::set_var("HUB_API_BIND_ADDR", "0.0.0.0:9090");
        env::set_var(
            "HUB_CORS_ALLOWED_ORIGINS",
            "http://localhost:3000, https://app.example.com",
        );
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(
        cfg.cors_allowed_origins,
        vec!["http://localhost:3000", "https://app.example.com"]
    );

    clear_env();
}

#[test]
fn debug_flag_raises_default_log_level() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HUB_DEBUG", "yes");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert!(cfg.debug);
    assert_eq!(cfg.effective_log_level(), "debug");
    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HUB_API_BIND_ADDR", "not-an-addr");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn supabase_url_requires_key() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HUB_SUPABASE_URL", "https://project.supabase.co");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("missing key should fail");
    assert!(format!("{}", err).contains("Supabase key is missing"));

    unsafe {
        env::set_var("HUB_SUPABASE_KEY", "service-role-secret");
    }
    let cfg = loader.load().expect("url with key loads");
    let redacted = cfg.redacted_json().expect("config serializes");
    assert!(redacted.contains("[REDACTED]"));
    assert!(!redacted.contains("service-role-secret"));

    clear_env();
}

#[test]
fn debug_is_rejected_in_production() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("HUB_ENVIRONMENT", "production");
        env::set_var("HUB_DEBUG", "true");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("debug in production should fail");
    assert!(format!("{}", err).contains("production"));

    clear_env();
}
