//! Unit tests for the resolution pipeline, using scripted strategies.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::{LoadError, LoadResult, OptionsShape, is_mongo_memory_repl_set_options};

#[derive(Debug, Clone)]
enum Outcome {
    Config(Configuration),
    Nothing,
    Missing,
    Broken,
}

#[derive(Debug, Clone)]
struct ScriptedLoader {
    name: &'static str,
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedLoader {
    fn new(name: &'static str, outcome: Outcome) -> Self {
        Self {
            name,
            outcome,
            calls: Arc::default(),
            seen: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConfigLoader for ScriptedLoader {
    fn name(&self) -> &'static str {
        self.name
    }

    fn load(&self, path: &Path) -> LoadResult<Option<Configuration>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(path.to_path_buf());
        match &self.outcome {
            Outcome::Config(config) => Ok(Some(config.clone())),
            Outcome::Nothing => Ok(None),
            Outcome::Missing => Err(LoadError::NotFound {
                path: path.to_path_buf(),
            }),
            Outcome::Broken => Err(LoadError::parse(path, "unexpected token")),
        }
    }
}

fn resolver(primary: &ScriptedLoader, fallback: &ScriptedLoader) -> ConfigResolver {
    ConfigResolver::builder()
        .locator(ConfigLocator::new().without_env_override())
        .primary(primary.clone())
        .fallback(fallback.clone())
        .build()
}

fn custom_config() -> Configuration {
    Configuration {
        mongodb_memory_server_options: Some(MemoryServerOptions::new(
            json!({"replSet": {"count": 1}}),
        )),
        mongo_url_env_name: Some(String::from("CUSTOM_URL")),
        use_shared_db_for_all_jest_workers: Some(false),
    }
}

const DIR: &str = "/srv/project";

#[rstest]
fn resolves_each_directory_once() {
    let primary = ScriptedLoader::new("primary", Outcome::Config(custom_config()));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    let first = resolver.resolve(Some(Path::new(DIR))).expect("first resolution");
    let second = resolver.resolve(Some(Path::new(DIR))).expect("second resolution");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
}

#[rstest]
fn loads_the_located_path() {
    let primary = ScriptedLoader::new("primary", Outcome::Missing);
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    assert!(resolver.resolve(Some(Path::new(DIR))).is_none());

    let expected = PathBuf::from(DIR).join("jest-mongodb-config.js");
    assert_eq!(*primary.seen.lock(), vec![expected.clone()]);
    assert_eq!(*fallback.seen.lock(), vec![expected]);
}

#[rstest]
fn nothing_from_primary_skips_fallback() {
    let primary = ScriptedLoader::new("primary", Outcome::Nothing);
    let fallback = ScriptedLoader::new("fallback", Outcome::Config(custom_config()));
    let resolver = resolver(&primary, &fallback);

    assert!(resolver.resolve(Some(Path::new(DIR))).is_none());
    assert!(resolver.resolve(Some(Path::new(DIR))).is_none());
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
    assert_eq!(
        resolver.cache().get(Path::new(DIR)),
        Some(ResolvedEntry::Nothing)
    );
}

#[rstest]
fn primary_failure_falls_back_once() {
    let primary = ScriptedLoader::new("primary", Outcome::Broken);
    let fallback = ScriptedLoader::new("fallback", Outcome::Config(custom_config()));
    let resolver = resolver(&primary, &fallback);

    assert_eq!(resolver.mongo_url_env_name(Some(Path::new(DIR))), "CUSTOM_URL");
    assert!(!resolver.should_use_shared_db_for_all_jest_workers(Some(Path::new(DIR))));
    let options = resolver.mongodb_memory_options(Some(Path::new(DIR)));
    assert!(is_mongo_memory_repl_set_options(Some(&options)));

    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[rstest]
fn failed_resolution_is_cached_as_nothing() {
    let primary = ScriptedLoader::new("primary", Outcome::Broken);
    let fallback = ScriptedLoader::new("fallback", Outcome::Broken);
    let resolver = resolver(&primary, &fallback);

    assert!(resolver.resolve(Some(Path::new(DIR))).is_none());
    assert!(resolver.resolve(Some(Path::new(DIR))).is_none());
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
    assert!(resolver.cache().contains(Path::new(DIR)));
}

#[rstest]
#[case(Outcome::Missing, Outcome::Missing)]
#[case(Outcome::Broken, Outcome::Broken)]
#[case(Outcome::Nothing, Outcome::Missing)]
#[case(Outcome::Missing, Outcome::Nothing)]
#[case(Outcome::Config(Configuration::default()), Outcome::Missing)]
fn absent_values_fall_back_to_defaults(#[case] first: Outcome, #[case] second: Outcome) {
    let primary = ScriptedLoader::new("primary", first);
    let fallback = ScriptedLoader::new("fallback", second);
    let resolver = resolver(&primary, &fallback);
    let dir = Some(Path::new(DIR));

    let options = resolver.mongodb_memory_options(dir);
    assert_eq!(
        options.as_value(),
        &json!({"binary": {"checkMD5": false}, "instance": {}})
    );
    assert_eq!(options.shape(), OptionsShape::SingleInstance);
    assert_eq!(resolver.mongo_url_env_name(dir), DEFAULT_MONGO_URL_ENV_NAME);
    assert!(resolver.should_use_shared_db_for_all_jest_workers(dir));
}

#[rstest]
fn explicit_false_shared_flag_is_kept() {
    let config = Configuration {
        use_shared_db_for_all_jest_workers: Some(false),
        ..Configuration::default()
    };
    let primary = ScriptedLoader::new("primary", Outcome::Config(config));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    assert!(!resolver.should_use_shared_db_for_all_jest_workers(Some(Path::new(DIR))));
}

#[rstest]
fn empty_env_name_uses_default() {
    let config = Configuration {
        mongo_url_env_name: Some(String::new()),
        ..Configuration::default()
    };
    let primary = ScriptedLoader::new("primary", Outcome::Config(config));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    assert_eq!(resolver.mongo_url_env_name(Some(Path::new(DIR))), "MONGO_URL");
}

#[rstest]
#[case(json!(false))]
#[case(json!(0))]
#[case(json!(""))]
fn falsy_options_use_default(#[case] raw: serde_json::Value) {
    let config = Configuration {
        mongodb_memory_server_options: Some(MemoryServerOptions::new(raw)),
        ..Configuration::default()
    };
    let primary = ScriptedLoader::new("primary", Outcome::Config(config));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    assert_eq!(
        resolver.mongodb_memory_options(Some(Path::new(DIR))),
        MemoryServerOptions::default()
    );
}

#[rstest]
fn options_are_returned_verbatim() {
    let raw = json!({"binary": {"version": "7.0.14", "checkMD5": true}, "instance": {"port": 27018}});
    let config = Configuration {
        mongodb_memory_server_options: Some(MemoryServerOptions::new(raw.clone())),
        ..Configuration::default()
    };
    let primary = ScriptedLoader::new("primary", Outcome::Config(config));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    let options = resolver.mongodb_memory_options(Some(Path::new(DIR)));
    assert_eq!(options.into_value(), raw);
}

#[rstest]
fn settings_bundle_all_three_values() {
    let primary = ScriptedLoader::new("primary", Outcome::Config(custom_config()));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let resolver = resolver(&primary, &fallback);

    let settings = resolver.settings(Some(Path::new(DIR)));
    assert_eq!(settings.mongo_url_env_name, "CUSTOM_URL");
    assert!(!settings.use_shared_db_for_all_jest_workers);
    assert_eq!(
        settings.mongodb_memory_server_options.shape(),
        OptionsShape::ReplicaSet
    );
    assert_eq!(primary.calls(), 1);
}

#[rstest]
fn failure_hook_sees_each_strategy() {
    let primary = ScriptedLoader::new("primary", Outcome::Broken);
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let reports: Arc<Mutex<Vec<(&'static str, bool)>>> = Arc::default();
    let sink = Arc::clone(&reports);
    let resolver = ConfigResolver::builder()
        .locator(ConfigLocator::new().without_env_override())
        .primary(primary)
        .fallback(fallback)
        .on_failure(move |failure| {
            sink.lock().push((failure.loader, failure.is_missing_file()));
        })
        .build();

    assert_eq!(resolver.mongo_url_env_name(Some(Path::new(DIR))), "MONGO_URL");
    assert_eq!(
        *reports.lock(),
        vec![("primary", false), ("fallback", true)]
    );

    // Cached: no further reports.
    assert_eq!(resolver.mongo_url_env_name(Some(Path::new(DIR))), "MONGO_URL");
    assert_eq!(reports.lock().len(), 2);
}

#[rstest]
fn injected_cache_is_shared() {
    let cache = Arc::new(ConfigCache::new());
    let primary = ScriptedLoader::new("primary", Outcome::Config(custom_config()));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);
    let build = || {
        ConfigResolver::builder()
            .locator(ConfigLocator::new().without_env_override())
            .primary(primary.clone())
            .fallback(fallback.clone())
            .cache(Arc::clone(&cache))
            .build()
    };

    let first = build();
    let second = build();
    let a = first.resolve(Some(Path::new(DIR))).expect("first resolution");
    let b = second.resolve(Some(Path::new(DIR))).expect("second resolution");

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(primary.calls(), 1);
    assert_eq!(cache.len(), 1);
}

#[rstest]
fn separate_resolvers_do_not_share_state() {
    let primary = ScriptedLoader::new("primary", Outcome::Config(custom_config()));
    let fallback = ScriptedLoader::new("fallback", Outcome::Missing);

    let first = resolver(&primary, &fallback);
    let second = resolver(&primary, &fallback);
    assert!(first.resolve(Some(Path::new(DIR))).is_some());
    assert!(second.resolve(Some(Path::new(DIR))).is_some());

    assert_eq!(primary.calls(), 2);
    assert!(second.cache().contains(Path::new(DIR)));
}
