//! Fixtures shared by unit tests.

use std::sync::Arc;

use crate::catalog::{EntryId, PrefabCatalog, PrefabTemplate, SpriteNode, TemplateNode};

pub(crate) fn template(name: &str) -> Arc<PrefabTemplate> {
    Arc::new(PrefabTemplate::new(
        name,
        TemplateNode::new(name).with_sprite(SpriteNode::colored([1.0; 4], [16.0, 16.0])),
    ))
}

/// One group "Rocks" with three templates.
pub(crate) fn rocks() -> (PrefabCatalog, Vec<EntryId>) {
    let mut catalog = PrefabCatalog::new();
    let group = catalog.add_group("Rocks");
    let ids = ["small", "medium", "large"]
        .iter()
        .filter_map(|n| catalog.push_entry(group, Some(template(n))))
        .collect();
    (catalog, ids)
}
