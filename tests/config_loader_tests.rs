use activities::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const KEYS: &[&str] = &[
    "ACTIVITIES_PROFILE",
    "ACTIVITIES_API_BIND_ADDR",
    "ACTIVITIES_LOG_LEVEL",
    "ACTIVITIES_LOG_FORMAT",
    "ACTIVITIES_DATABASE_URL",
    "ACTIVITIES_DB_MAX_CONNECTIONS",
    "ACTIVITIES_DB_ACQUIRE_TIMEOUT_MS",
    "ACTIVITIES_STATIC_DIR",
    "ACTIVITIES_SEED_ON_STARTUP",
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

fn empty_loader() -> (TempDir, ConfigLoader) {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    (temp_dir, loader)
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let (_dir, loader) = empty_loader();
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.log_format, "json");
    assert_eq!(cfg.database_url, "sqlite://data.db?mode=rwc");
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.db_acquire_timeout_ms, 5000);
    assert_eq!(cfg.static_dir, PathBuf::from("static"));
    assert!(cfg.seed_on_startup);
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "ACTIVITIES_API_BIND_ADDR=127.0.0.1:3000\nACTIVITIES_LOG_LEVEL=warn\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test",
        "ACTIVITIES_API_BIND_ADDR=192.168.0.10:5000\nACTIVITIES_SEED_ON_STARTUP=false\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "ACTIVITIES_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "ACTIVITIES_PROFILE=test\nACTIVITIES_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.log_level, "warn");
    assert!(!cfg.seed_on_startup);
    clear_env();
}

#[test]
fn unprefixed_keys_are_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "API_BIND_ADDR=127.0.0.1:3000\nOTHER_APP_LOG_LEVEL=trace\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
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
        "ACTIVITIES_API_BIND_ADDR=127.0.0.1:3000\nACTIVITIES_DATABASE_URL=sqlite://from-file.db\n",
    );

    unsafe {
        env::set_var("ACTIVITIES_API_BIND_ADDR", "0.0.0.0:9090");
        env::set_var("ACTIVITIES_STATIC_DIR", "/srv/activities/static");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.database_url, "sqlite://from-file.db");
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/activities/static"));

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("ACTIVITIES_API_BIND_ADDR", "not-an-addr");
    }
    let (_dir, loader) = empty_loader();
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn non_sqlite_database_url_is_rejected() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("ACTIVITIES_DATABASE_URL", "postgres://localhost/activities");
    }
    let (_dir, loader) = empty_loader();
    let err = loader.load().expect_err("postgres url should fail");
    assert!(matches!(err, ConfigError::UnsupportedDatabaseUrl { .. }));

    clear_env();
}

#[test]
fn malformed_numbers_and_flags_name_the_key() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("ACTIVITIES_DB_MAX_CONNECTIONS", "lots");
    }
    let (_dir, loader) = empty_loader();
    match loader.load() {
        Err(ConfigError::InvalidNumber { key, value }) => {
            assert_eq!(key, "ACTIVITIES_DB_MAX_CONNECTIONS");
            assert_eq!(value, "lots");
        }
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
    clear_env();

    unsafe {
        env::set_var("ACTIVITIES_SEED_ON_STARTUP", "sometimes");
    }
    let (_dir, loader) = empty_loader();
    let err = loader.load().expect_err("bad bool should fail");
    assert!(matches!(err, ConfigError::InvalidBool { ref key, .. } if key == "ACTIVITIES_SEED_ON_STARTUP"));

    clear_env();
}

#[test]
fn out_of_range_pool_size_is_rejected() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("ACTIVITIES_DB_MAX_CONNECTIONS", "0");
    }
    let (_dir, loader) = empty_loader();
    let err = loader.load().expect_err("zero connections should fail");
    assert!(matches!(
        err,
        ConfigError::InvalidDbMaxConnections { value: 0 }
    ));

    clear_env();
}
