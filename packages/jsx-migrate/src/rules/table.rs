//! Mapping table.

use indexmap::IndexMap;

use super::component::ComponentRule;
use super::props::PropsMeta;

/// Everything needed to migrate one source package to one target package.
///
/// Read-only while files are processed; component order is processing order.
#[derive(Debug, Clone)]
pub struct MappingTable {
    pub source_package: String,
    pub target_package: String,
    /// Property rules applied to every component, overridden per component.
    pub default_props: PropsMeta,
    pub components: IndexMap<String, ComponentRule>,
}

impl MappingTable {
    pub fn new(source_package: impl Into<String>, target_package: impl Into<String>) -> Self {
        Self {
            source_package: source_package.into(),
            target_package: target_package.into(),
            default_props: PropsMeta::default(),
            components: IndexMap::new(),
        }
    }

    pub fn with_default_props(mut self, props: PropsMeta) -> Self {
        self.default_props = props;
        self
    }

    pub fn component(mut self, name: impl Into<String>, rule: impl Into<ComponentRule>) -> Self {
        self.components.insert(name.into(), rule.into());
        self
    }

    pub fn rule(&self, name: &str) -> Option<&ComponentRule> {
        self.components.get(name)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}
