//! End-to-end resolution of declarative configuration files.

use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use jest_mongodb_config::{
    CONFIG_FILE_ENV_VAR, ConfigLocator, ConfigResolver, DEFAULT_CONFIG_FILE_NAME, LoadError,
    OptionsShape,
};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::json;
use serial_test::serial;
use test_helpers::env as test_env;
use test_helpers::fixture::ProjectDir;

fn resolver_for(file_name: &str) -> ConfigResolver {
    ConfigResolver::builder()
        .locator(ConfigLocator::new().without_env_override().file_name(file_name))
        .build()
}

#[rstest]
fn json_file_drives_every_setting() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write(
        "jest-mongodb-config.json",
        r#"{
            "mongodbMemoryServerOptions": {"replSet": {"count": 3, "storageEngine": "wiredTiger"}},
            "mongoURLEnvName": "DATABASE_URL",
            "useSharedDBForAllJestWorkers": false
        }"#,
    )?;
    let resolver = resolver_for("jest-mongodb-config.json");
    let dir = Some(project.std_path());

    let options = resolver.mongodb_memory_options(dir);
    ensure!(options.shape() == OptionsShape::ReplicaSet);
    ensure!(options.as_value()["replSet"]["count"] == json!(3));
    ensure!(resolver.mongo_url_env_name(dir) == "DATABASE_URL");
    ensure!(!resolver.should_use_shared_db_for_all_jest_workers(dir));
    Ok(())
}

#[rstest]
fn toml_default_table_is_unwrapped() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write(
        "jest-mongodb-config.toml",
        r#"
[default]
mongoURLEnvName = "TOML_URL"

[default.mongodbMemoryServerOptions.instance]
dbName = "jest"
"#,
    )?;
    let resolver = resolver_for("jest-mongodb-config.toml");
    let settings = resolver.settings(Some(project.std_path()));

    ensure!(settings.mongo_url_env_name == "TOML_URL");
    ensure!(settings.use_shared_db_for_all_jest_workers);
    ensure!(
        settings.mongodb_memory_server_options.as_value()
            == &json!({"instance": {"dbName": "jest"}})
    );
    Ok(())
}

#[rstest]
fn missing_file_yields_defaults_quietly() -> Result<()> {
    let project = ProjectDir::new()?;
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let resolver = ConfigResolver::builder()
        .locator(ConfigLocator::new().without_env_override())
        .on_failure(move |failure| sink.lock().push(failure.is_missing_file()))
        .build();
    let dir = Some(project.std_path());

    ensure!(resolver.resolve(dir).is_none());
    ensure!(resolver.mongo_url_env_name(dir) == "MONGO_URL");
    ensure!(resolver.should_use_shared_db_for_all_jest_workers(dir));
    ensure!(
        resolver.mongodb_memory_options(dir).as_value()
            == &json!({"binary": {"checkMD5": false}, "instance": {}})
    );
    // Both strategies saw a missing file; no child process ran.
    ensure!(*reports.lock() == vec![true, true]);
    Ok(())
}

#[rstest]
fn malformed_file_is_reported_then_defaulted() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write("jest-mongodb-config.json", "{\"mongoURLEnvName\": ")?;
    let errors: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&errors);
    let resolver = ConfigResolver::builder()
        .locator(
            ConfigLocator::new()
                .without_env_override()
                .file_name("jest-mongodb-config.json"),
        )
        .on_failure(move |failure| {
            if matches!(failure.error, LoadError::Parse { .. }) {
                sink.lock().push(failure.loader.to_owned());
            }
        })
        .build();

    ensure!(resolver.mongo_url_env_name(Some(project.std_path())) == "MONGO_URL");
    ensure!(*errors.lock() == vec![String::from("synchronous")]);
    Ok(())
}

#[rstest]
fn edits_after_first_resolution_are_not_seen() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write("jest-mongodb-config.json", r#"{"mongoURLEnvName": "FIRST"}"#)?;
    let resolver = resolver_for("jest-mongodb-config.json");
    let dir = Some(project.std_path());

    ensure!(resolver.mongo_url_env_name(dir) == "FIRST");
    project.write("jest-mongodb-config.json", r#"{"mongoURLEnvName": "SECOND"}"#)?;
    ensure!(resolver.mongo_url_env_name(dir) == "FIRST");

    let fresh = resolver_for("jest-mongodb-config.json");
    ensure!(fresh.mongo_url_env_name(dir) == "SECOND");
    Ok(())
}

#[rstest]
#[serial]
fn env_override_selects_another_file() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write(DEFAULT_CONFIG_FILE_NAME, "module.exports = {};\n")?;
    project.write("fixtures/mongo.json", r#"{"mongoURLEnvName": "FIXTURE_URL"}"#)?;
    let _env =
        test_env::scope_with(|lock| vec![lock.set_var(CONFIG_FILE_ENV_VAR, "fixtures/mongo.json")]);

    let resolver = ConfigResolver::new();
    let name = resolver.mongo_url_env_name(Some(project.std_path()));
    ensure!(name == "FIXTURE_URL", "unexpected env name {name}");
    Ok(())
}

#[rstest]
#[serial]
fn free_functions_use_the_working_directory() -> Result<()> {
    let project = ProjectDir::new()?;
    project.write(
        "settings.json",
        r#"{"mongodbMemoryServerOptions": {"binary": {"version": "7.0.14"}}, "useSharedDBForAllJestWorkers": false}"#,
    )?;
    let _env = test_env::scope_with(|lock| vec![lock.set_var(CONFIG_FILE_ENV_VAR, "settings.json")]);
    let _cwd = test_helpers::cwd::set_dir(project.std_path()).context("enter project")?;

    let options = jest_mongodb_config::mongodb_memory_options(None);
    ensure!(options.shape() == OptionsShape::SingleInstance);
    ensure!(options.as_value() == &json!({"binary": {"version": "7.0.14"}}));
    ensure!(jest_mongodb_config::mongo_url_env_name(None) == "MONGO_URL");
    ensure!(!jest_mongodb_config::should_use_shared_db_for_all_jest_workers(None));

    let cache = jest_mongodb_config::default_resolver().cache();
    let key = std::env::current_dir().context("read cwd")?;
    ensure!(cache.contains(&key));
    Ok(())
}
