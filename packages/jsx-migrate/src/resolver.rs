//! Mapping resolver
//!
//! Looks up the rule of a component for one occurrence and merges the
//! table-wide default property rules with the component's own.

use std::borrow::Cow;

use crate::rules::{ComponentMeta, ComponentRule, MappingTable, Occurrence, PropsMeta, RuleContext};

pub struct MappingResolver<'t> {
    table: &'t MappingTable,
}

impl<'t> MappingResolver<'t> {
    pub fn new(table: &'t MappingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t MappingTable {
        self.table
    }

    /// Rule that applies to `occurrence`, or `None` when the occurrence
    /// must be left untouched (unknown component or every candidate declined).
    pub fn resolve_target(
        &self,
        component: &str,
        occurrence: &Occurrence<'_>,
        ctx: &RuleContext<'_>,
    ) -> Option<Cow<'t, ComponentMeta>> {
        match self.table.rule(component)? {
            ComponentRule::Alias(to) => Some(Cow::Owned(ComponentMeta::to(to.clone()))),
            ComponentRule::Static(meta) => Some(Cow::Borrowed(meta)),
            ComponentRule::Candidates(candidates) => candidates
                .iter()
                .find_map(|candidate| candidate(occurrence, ctx))
                .map(Cow::Owned),
        }
    }

    /// Rule of a component that does not depend on any occurrence. Candidate
    /// rules need an element to decide and yield `None`.
    pub fn resolve_static(&self, component: &str) -> Option<Cow<'t, ComponentMeta>> {
        match self.table.rule(component)? {
            ComponentRule::Alias(to) => Some(Cow::Owned(ComponentMeta::to(to.clone()))),
            ComponentRule::Static(meta) => Some(Cow::Borrowed(meta)),
            ComponentRule::Candidates(_) => None,
        }
    }

    /// Default property rules overlaid with the resolved component's rules.
    ///
    /// On a name collision the component wins, including across kinds: a
    /// component mapping cancels a default removal of the same attribute and
    /// the other way round.
    pub fn resolve_props(&self, meta: &ComponentMeta) -> PropsMeta {
        let mut merged = self.table.default_props.clone();
        let Some(own) = &meta.props else {
            return merged;
        };

        for (name, target) in &own.mappings {
            merged.removals.retain(|r| r != name);
            merged.mappings.insert(name.clone(), target.clone());
        }
        for (name, addition) in &own.additions {
            merged.additions.insert(name.clone(), addition.clone());
        }
        for name in &own.removals {
            merged.mappings.shift_remove(name);
            if !merged.removals.contains(name) {
                merged.removals.push(name.clone());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use jsx_tree::Document;

    use super::*;
    use crate::rules::{candidate, PropTarget};

    fn ctx(path: &Path) -> RuleContext<'_> {
        RuleContext {
            file_path: path,
            source_package: "@acme/legacy",
            target_package: "@acme/ui",
            repo: None,
        }
    }

    #[test]
    fn component_props_override_defaults() {
        let table = MappingTable::new("@acme/legacy", "@acme/ui")
            .with_default_props(
                PropsMeta::new()
                    .rename("width", "UNSAFE_width")
                    .rename("color", "UNSAFE_color")
                    .remove("margin")
                    .remove("padding"),
            )
            .component(
                "Div",
                ComponentMeta::new().with_props(
                    PropsMeta::new()
                        .rename("width", "w")
                        .mapping("margin", PropTarget::rename("m"))
                        .remove("color")
                        .remove("padding"),
                ),
            );
        let resolver = MappingResolver::new(&table);
        let Some(ComponentRule::Static(meta)) = table.rule("Div") else {
            panic!("expected a static rule");
        };
        let props = resolver.resolve_props(meta);

        assert!(matches!(props.mappings.get("width"), Some(PropTarget::Rename(to)) if to == "w"));
        assert!(matches!(props.mappings.get("margin"), Some(PropTarget::Rename(to)) if to == "m"));
        assert!(props.mappings.get("color").is_none());
        assert_eq!(props.removals, vec!["padding".to_string(), "color".to_string()]);
    }

    #[test]
    fn alias_and_candidates() {
        let table = MappingTable::new("@acme/legacy", "@acme/ui")
            .component("Box", ComponentRule::alias("View"))
            .component(
                "Text",
                ComponentRule::candidates([
                    candidate(|occ, _| occ.has_attribute("x").then(|| ComponentMeta::to("Heading"))),
                    candidate(|occ, _| occ.has_attribute("y").then(|| ComponentMeta::to("Label"))),
                ]),
            );
        let doc = Document::parse(
            "const a = <><Box /><Text x y /><Text y /><Text /></>;",
            "a.tsx",
        )
        .unwrap();
        let path = Path::new("a.tsx");
        let resolver = MappingResolver::new(&table);
        let resolve = |name: &str, index: usize| {
            let occ = Occurrence::new(&doc, doc.elements_named(name)[index]);
            resolver
                .resolve_target(name, &occ, &ctx(path))
                .and_then(|meta| meta.to.clone())
        };

        assert_eq!(resolve("Box", 0).as_deref(), Some("View"));
        assert_eq!(resolve("Text", 0).as_deref(), Some("Heading"));
        assert_eq!(resolve("Text", 1).as_deref(), Some("Label"));
        assert_eq!(resolve("Text", 2), None);

        let occ = Occurrence::new(&doc, doc.elements_named("Box")[0]);
        assert!(resolver.resolve_target("Span", &occ, &ctx(path)).is_none());
    }
}
