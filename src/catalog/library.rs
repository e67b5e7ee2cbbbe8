use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{PrefabCatalog, PrefabTemplate};
use crate::error::{PlacerError, PlacerResult};

/// On-disk catalog: groups listing template files relative to the catalog file.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CatalogFile {
    #[serde(default)]
    pub groups: Vec<GroupFile>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GroupFile {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<String>,
}

pub fn load_template(path: &Path) -> PlacerResult<PrefabTemplate> {
    let content = fs::read_to_string(path).map_err(|source| PlacerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| PlacerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a catalog file. A template that fails to load becomes an empty entry so the
/// group keeps its shape; the failure is logged.
pub fn load_catalog(path: &Path) -> PlacerResult<PrefabCatalog> {
    let content = fs::read_to_string(path).map_err(|source| PlacerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = ron::from_str(&content).map_err(|source| PlacerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let catalog = build_catalog(&file, &base);

    info!(
        "Loaded prefab catalog {:?}: {} groups, {} prefabs",
        path,
        catalog.groups().len(),
        catalog.flattened_count()
    );
    Ok(catalog)
}

fn build_catalog(file: &CatalogFile, base: &Path) -> PrefabCatalog {
    let mut catalog = PrefabCatalog::new();
    for group in &file.groups {
        let index = catalog.add_group(group.name.clone());
        for relative in &group.templates {
            let template_path: PathBuf = base.join(relative);
            let template = match load_template(&template_path) {
                Ok(t) => {
                    if !t.renders_anything() {
                        warn!("Prefab '{}' has no sprite and will be invisible", t.name);
                    }
                    Some(Arc::new(t))
                }
                Err(e) => {
                    warn!("Prefab '{}' in group '{}' left empty: {}", relative, group.name, e);
                    None
                }
            };
            catalog.push_entry(index, template);
        }
    }
    catalog
}
