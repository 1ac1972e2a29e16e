// Mapping Config Tests

use std::path::Path;

use jsx_migrate::{
    CapturingLogger, ComponentRule, ConfigError, FileContext, MappingConfig, Migrator, PropTarget,
};

const CONFIG: &str = r#"{
  "sourcePackage": "@acme/legacy",
  "targetPackage": "@acme/ui",
  "defaultProps": {
    "mappings": { "width": "UNSAFE_width" },
    "removals": ["legacy"]
  },
  "components": {
    "Box": "View",
    "Button": {
      "props": {
        "mappings": {
          "variant": {
            "enum": { "source": ["primary", "tertiary"], "target": ["primary", "ghost-secondary"] },
            "values": { "tertiary": "ghost-secondary" },
            "unsafe": "UNSAFE_variant"
          },
          "size": {
            "enum": { "source": ["small", "large"], "target": ["SMALL", "LARGE"], "transform": "uppercase" },
            "to": "scale"
          }
        },
        "additions": { "isQuiet": true, "tabIndex": 0 }
      },
      "todoComments": "Check the focus ring.",
      "migrationNotes": ["Button sizes changed."]
    }
  }
}"#;

fn migrate(config: &str, source: &str) -> String {
    let table = MappingConfig::from_json(config).unwrap().into_table().unwrap();
    let logger = CapturingLogger::new();
    let ctx = FileContext::new(Path::new("src/App.tsx"), &logger);
    Migrator::new(&table).migrate_source(source, &ctx).unwrap().code
}

#[test]
fn should_build_table_in_declared_order() {
    let table = MappingConfig::from_json(CONFIG).unwrap().into_table().unwrap();
    assert_eq!(table.source_package, "@acme/legacy");
    assert_eq!(table.component_names().collect::<Vec<_>>(), vec!["Box", "Button"]);
    assert!(matches!(table.rule("Box"), Some(ComponentRule::Alias(to)) if to == "View"));
    assert!(matches!(
        table.default_props.mappings.get("width"),
        Some(PropTarget::Rename(to)) if to == "UNSAFE_width"
    ));
    assert_eq!(table.default_props.removals, vec!["legacy".to_string()]);

    let Some(ComponentRule::Static(button)) = table.rule("Button") else {
        panic!("expected a static rule for Button");
    };
    let props = button.props.as_ref().unwrap();
    assert!(matches!(props.mappings.get("variant"), Some(PropTarget::Mapper(_))));
    assert_eq!(props.additions.len(), 2);
    assert_eq!(button.migration_notes, vec!["Button sizes changed.".to_string()]);
}

#[test]
fn should_migrate_with_configured_rules() {
    let out = migrate(
        CONFIG,
        "import { Button } from \"@acme/legacy\";\n\nconst a = <Button variant=\"tertiary\" size=\"large\" legacy />;\n",
    );
    assert_eq!(
        out,
        "import { Button } from \"@acme/ui\";\n\nconst a = /* TODO: (jsx-migrate) Check the focus ring. */ <Button variant=\"ghost-secondary\" scale=\"LARGE\" isQuiet tabIndex={0} />;\n"
    );
}

#[test]
fn should_fall_back_to_configured_unsafe_name() {
    let out = migrate(
        CONFIG,
        "import { Button } from \"@acme/legacy\";\n\nconst a = <Button variant=\"danger\" isQuiet />;\n",
    );
    assert_eq!(
        out,
        "import { Button } from \"@acme/ui\";\n\nconst a = /* TODO: (jsx-migrate) Check the focus ring. */ <Button UNSAFE_variant=\"danger\" isQuiet tabIndex={0} />;\n"
    );
}

#[test]
fn should_reject_invalid_identifiers() {
    let config = r#"{ "sourcePackage": "a", "targetPackage": "b", "components": { "Box": "not valid" } }"#;
    let err = MappingConfig::from_json(config).unwrap().into_table().unwrap_err();
    assert_eq!(err, ConfigError::InvalidIdentifier("not valid".into()));
}

#[test]
fn should_accept_dashed_attribute_names() {
    let config = r#"{
      "sourcePackage": "a",
      "targetPackage": "b",
      "defaultProps": { "mappings": { "aria-label": "aria-description" } }
    }"#;
    assert!(MappingConfig::from_json(config).unwrap().into_table().is_ok());
}

#[test]
fn should_reject_empty_packages() {
    let config = r#"{ "sourcePackage": " ", "targetPackage": "b" }"#;
    let err = MappingConfig::from_json(config).unwrap().into_table().unwrap_err();
    assert_eq!(err, ConfigError::EmptyPackage("sourcePackage"));
}

#[test]
fn should_reject_unsupported_additions() {
    let config = r#"{
      "sourcePackage": "a",
      "targetPackage": "b",
      "components": { "Box": { "props": { "additions": { "style": { "gap": 1 } } } } }
    }"#;
    let err = MappingConfig::from_json(config).unwrap().into_table().unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedValue { context, .. } if context == "Box.additions.style"));
}

#[test]
fn should_report_malformed_json() {
    assert!(MappingConfig::from_json("{ \"sourcePackage\": ").is_err());
    assert!(MappingConfig::from_json("{ \"targetPackage\": \"b\" }").is_err());
}

#[test]
fn should_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    std::fs::write(&path, CONFIG).unwrap();
    let config = MappingConfig::load(&path).unwrap();
    assert_eq!(config.components.len(), 2);

    let missing = MappingConfig::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(missing.to_string().contains("failed to read mapping config"));
}
