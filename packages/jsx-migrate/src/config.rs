//! JSON mapping configuration
//!
//! A declarative way to build a [`MappingTable`]. Candidate rules need code
//! and are only available through the Rust API.
//!
//! ```json
//! {
//!   "sourcePackage": "@acme/legacy",
//!   "targetPackage": "@acme/ui",
//!   "defaultProps": { "mappings": { "width": "UNSAFE_width" } },
//!   "components": {
//!     "Box": "View",
//!     "Button": {
//!       "props": {
//!         "mappings": {
//!           "variant": {
//!             "enum": { "source": ["primary", "tertiary"], "target": ["primary", "ghost-secondary"] },
//!             "values": { "tertiary": "ghost-secondary" }
//!           }
//!         },
//!         "additions": { "isQuiet": true },
//!         "removals": ["legacy"]
//!       },
//!       "todoComments": "Check the new focus ring.",
//!       "migrationNotes": ["Button sizes changed."]
//!     }
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use indexmap::IndexMap;
use jsx_tree::{AttrValue, Scalar};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::rules::{
    Addition, ComponentMeta, ComponentRule, MappingTable, PropName, PropTarget, PropUpdate,
    PropsMeta, TodoComments,
};
use crate::transform::{EnumTable, KeyTransform, ValueMapping};

static COMPONENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"));

/// Attribute names may contain dashes (`aria-label`) and one namespace colon.
static PROP_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:[-:][A-Za-z0-9_$]+)*$").expect("valid regex")
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    pub source_package: String,
    pub target_package: String,
    #[serde(default)]
    pub default_props: PropsConfig,
    #[serde(default)]
    pub components: IndexMap<String, ComponentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentConfig {
    Alias(String),
    Rule(ComponentRuleConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRuleConfig {
    pub to: Option<String>,
    pub props: Option<PropsConfig>,
    pub todo_comments: Option<TodoConfig>,
    #[serde(default)]
    pub migration_notes: Vec<String>,
    #[serde(default)]
    pub skip_import: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TodoConfig {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropsConfig {
    #[serde(default)]
    pub mappings: IndexMap<String, PropConfig>,
    /// `true` adds a bare attribute; strings, numbers and `false` add a value.
    #[serde(default)]
    pub additions: IndexMap<String, Value>,
    #[serde(default)]
    pub removals: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropConfig {
    Rename(String),
    Values(ValueMappingConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueMappingConfig {
    pub to: Option<String>,
    #[serde(rename = "unsafe")]
    pub unsafe_name: Option<String>,
    /// Literal replacements keyed by the source value.
    #[serde(default)]
    pub values: IndexMap<String, Value>,
    #[serde(rename = "enum")]
    pub enum_table: Option<EnumConfig>,
    /// Overrides the default global passthrough keywords.
    pub globals: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumConfig {
    pub source: Vec<String>,
    pub target: Vec<String>,
    #[serde(default)]
    pub transform: KeyTransform,
}

impl MappingConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read mapping config {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid mapping config {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: MappingConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn into_table(self) -> Result<MappingTable, ConfigError> {
        if self.source_package.trim().is_empty() {
            return Err(ConfigError::EmptyPackage("sourcePackage"));
        }
        if self.target_package.trim().is_empty() {
            return Err(ConfigError::EmptyPackage("targetPackage"));
        }

        let mut table = MappingTable::new(self.source_package, self.target_package)
            .with_default_props(self.default_props.into_props("defaultProps")?);

        for (name, component) in self.components {
            check(&COMPONENT_NAME, &name)?;
            let rule = match component {
                ComponentConfig::Alias(to) => {
                    check(&COMPONENT_NAME, &to)?;
                    ComponentRule::Alias(to)
                }
                ComponentConfig::Rule(rule) => ComponentRule::Static(rule.into_meta(&name)?),
            };
            table = table.component(name, rule);
        }
        Ok(table)
    }
}

impl ComponentRuleConfig {
    fn into_meta(self, component: &str) -> Result<ComponentMeta, ConfigError> {
        if let Some(to) = &self.to {
            check(&COMPONENT_NAME, to)?;
        }
        let props = self
            .props
            .map(|props| props.into_props(component))
            .transpose()?;
        Ok(ComponentMeta {
            to: self.to,
            props,
            todo_comments: self.todo_comments.map(|todo| match todo {
                TodoConfig::One(text) => TodoComments::Text(text),
                TodoConfig::Many(list) => TodoComments::List(list),
            }),
            migration_notes: self.migration_notes,
            skip_import: self.skip_import,
        })
    }
}

impl PropsConfig {
    fn into_props(self, owner: &str) -> Result<PropsMeta, ConfigError> {
        let mut props = PropsMeta::new();
        for (name, mapping) in self.mappings {
            check(&PROP_NAME, &name)?;
            let target = match mapping {
                PropConfig::Rename(to) => {
                    check(&PROP_NAME, &to)?;
                    PropTarget::Rename(to)
                }
                PropConfig::Values(values) => {
                    values.into_mapping(&format!("{}.{}", owner, name))?.into_target()
                }
            };
            props = props.mapping(name, target);
        }
        for (name, value) in self.additions {
            check(&PROP_NAME, &name)?;
            let addition = match value {
                Value::Bool(true) => Addition::Flag,
                Value::String(s) => Addition::Value(AttrValue::Str(s)),
                other => Addition::Value(AttrValue::scalar(scalar_from_json(
                    &other,
                    &format!("{}.additions.{}", owner, name),
                )?)),
            };
            props = props.add(name, addition);
        }
        for name in self.removals {
            check(&PROP_NAME, &name)?;
            props = props.remove(name);
        }
        Ok(props)
    }
}

impl ValueMappingConfig {
    fn into_mapping(self, context: &str) -> Result<ValueMapping, ConfigError> {
        for name in self.to.iter().chain(self.unsafe_name.iter()) {
            check(&PROP_NAME, name)?;
        }
        let mut mapping = ValueMapping {
            target_name: self.to,
            unsafe_name: self.unsafe_name,
            enum_table: self
                .enum_table
                .map(|e| EnumTable::new(e.source, e.target, e.transform)),
            ..ValueMapping::default()
        };
        if let Some(globals) = self.globals {
            mapping.global_values = globals;
        }

        if !self.values.is_empty() {
            let replacements: IndexMap<String, Scalar> = self
                .values
                .iter()
                .map(|(key, value)| {
                    scalar_from_json(value, &format!("{}.values.{}", context, key))
                        .map(|scalar| (key.clone(), scalar))
                })
                .collect::<Result<_, _>>()?;
            let replacements = Arc::new(replacements);
            let target_name = mapping.target_name.clone();
            mapping = mapping.custom(move |scalar, ctx| {
                let replacement = replacements.get(&scalar.as_key())?;
                let name = target_name.as_deref().unwrap_or(ctx.prop_name);
                let value = match replacement {
                    Scalar::Str(s) => AttrValue::Str(s.clone()),
                    other => AttrValue::scalar(other.clone()),
                };
                Some(
                    PropUpdate::rename(PropName::named(name))
                        .with_value(value)
                        .into(),
                )
            });
        }
        Ok(mapping)
    }
}

fn scalar_from_json(value: &Value, context: &str) -> Result<Scalar, ConfigError> {
    match value {
        Value::String(s) => Ok(Scalar::Str(s.clone())),
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Scalar::Number).ok_or_else(|| unsupported(value, context)),
        _ => Err(unsupported(value, context)),
    }
}

fn unsupported(value: &Value, context: &str) -> ConfigError {
    ConfigError::UnsupportedValue {
        context: context.to_string(),
        value: value.to_string(),
    }
}

fn check(pattern: &Regex, name: &str) -> Result<(), ConfigError> {
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier(name.to_string()))
    }
}
