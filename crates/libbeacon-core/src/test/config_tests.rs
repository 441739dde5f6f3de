use crate::BeaconConfig;
use crate::ConfigError;
use std::path::PathBuf;

#[test]
fn empty_toml_yields_defaults() {
    let config = BeaconConfig::from_toml_str("").unwrap();
    assert_eq!(config, BeaconConfig::default());
    assert_eq!(config.guards, vec!["api".to_string()]);
    assert!(config.transactional_mutations);
    assert!(!config.schema.cache.enable);
    assert_eq!(config.schema.path, PathBuf::from("graphql/schema.graphql"));
}

#[test]
fn partial_tables_keep_remaining_defaults() {
    let config = BeaconConfig::from_toml_str(r#"
transactional_mutations = false

[schema.cache]
enable = true

[pagination]
max_count = 50

[namespaces]
field_resolvers = ["app::resolvers", "app"]
"#).unwrap();

    assert!(!config.transactional_mutations);
    assert!(config.schema.cache.enable);
    assert_eq!(config.schema.cache.path, PathBuf::from("cache/beacon-schema.bin"));
    assert_eq!(config.pagination.max_count, Some(50));
    assert_eq!(config.pagination.default_count, None);
    assert_eq!(
        config.namespaces.field_resolvers,
        vec!["app::resolvers".to_string(), "app".to_string()],
    );
    assert_eq!(config.security.max_query_depth, None);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = BeaconConfig::from_toml_str("guards = [");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_a_read_error() {
    let path = crate::test::temp_dir("config-missing").join("beacon.toml");
    let result = BeaconConfig::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn reads_from_file() {
    let path = crate::test::temp_dir("config-file").join("beacon.toml");
    std::fs::write(&path, "[security]\nmax_query_complexity = 300\n").unwrap();
    let config = BeaconConfig::from_file(&path).unwrap();
    assert_eq!(config.security.max_query_complexity, Some(300));
}
