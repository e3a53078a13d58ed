//! Integration tests for configuration loading

use item_validation::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_yaml(
        r#"
server:
  host: 0.0.0.0
  port: 9090
validation:
  strategy: imperative
  binding_failure: short_circuit
"#,
    );

    let config = AppConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.validation.strategy, ValidationStrategy::Imperative);
    assert_eq!(
        config.validation.binding_failure,
        BindingFailurePolicy::ShortCircuit
    );
    assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9090");
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_yaml("{}\n");

    let config = AppConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_missing_file() {
    let err = AppConfig::from_yaml_file("/nonexistent/item-service.yaml").unwrap_err();

    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_invalid_yaml_names_the_file() {
    let file = write_yaml("server: [unclosed\n");

    let err = AppConfig::from_yaml_file(file.path()).unwrap_err();

    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_message_overrides_from_file() {
    let messages = write_yaml("required.item.itemName: \"Give the item a name\"\n");
    let mut config = AppConfig::default();
    config.messages.path = Some(messages.path().to_path_buf());

    let state = ServerBuilder::from_config(&config)
        .unwrap()
        .with_repository(InMemoryItemRepository::new())
        .build_state()
        .unwrap();

    let item = Item::new("", 1000, 10);
    let outcome = state.save_pipeline.evaluate(&item, vec![]);
    let rendered = state.catalog.render(&outcome.errors);
    assert_eq!(rendered.field_errors["itemName"], vec!["Give the item a name"]);
}
