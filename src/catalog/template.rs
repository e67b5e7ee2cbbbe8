use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Sorting layer and order of a sprite or sorting group.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortingNode {
    #[serde(default)]
    pub layer: u32,
    #[serde(default)]
    pub order: i32,
}

/// Sprite attached to a template node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpriteNode {
    /// sRGBA tint; also the sprite color when no image is set
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Custom size in world units
    #[serde(default)]
    pub size: Option<[f32; 2]>,
    /// Image path relative to the asset root
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sorting: SortingNode,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// One node of a template hierarchy, in the parent's local space.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TemplateNode {
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_degrees: f32,
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub sprite: Option<SpriteNode>,
    #[serde(default)]
    pub sorting_group: Option<SortingNode>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: [0.0; 3],
            rotation_degrees: 0.0,
            scale: default_scale(),
            sprite: None,
            sorting_group: None,
            children: Vec::new(),
        }
    }

    pub fn with_sprite(mut self, sprite: SpriteNode) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale.to_array();
        self
    }

    pub fn local_transform(&self) -> Transform {
        Transform {
            translation: Vec3::from_array(self.translation),
            rotation: Quat::from_rotation_z(self.rotation_degrees.to_radians()),
            scale: Vec3::from_array(self.scale),
        }
    }

    /// A node renders (or groups rendering) when it has a sprite or a sorting group.
    pub fn has_renderables(&self) -> bool {
        self.sprite.is_some() || self.sorting_group.is_some()
    }
}

/// A placeable 2D prefab: a named hierarchy of sprite nodes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrefabTemplate {
    pub name: String,
    pub root: TemplateNode,
}

impl PrefabTemplate {
    pub fn new(name: impl Into<String>, root: TemplateNode) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// The authored local scale of the root node.
    pub fn base_scale(&self) -> Vec3 {
        Vec3::from_array(self.root.scale)
    }

    /// Whether any node in the hierarchy draws something.
    pub fn renders_anything(&self) -> bool {
        fn any(node: &TemplateNode) -> bool {
            node.has_renderables() || node.children.iter().any(any)
        }
        any(&self.root)
    }

    /// First sprite color found depth-first, used for list thumbnails.
    pub fn swatch_color(&self) -> Option<[f32; 4]> {
        fn find(node: &TemplateNode) -> Option<[f32; 4]> {
            node.sprite
                .as_ref()
                .map(|s| s.color)
                .or_else(|| node.children.iter().find_map(find))
        }
        find(&self.root)
    }
}

impl SpriteNode {
    pub fn colored(color: [f32; 4], size: [f32; 2]) -> Self {
        Self {
            color,
            size: Some(size),
            image: None,
            sorting: SortingNode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_template() {
        let src = r#"(
            name: "Rock",
            root: (
                name: "rock",
                scale: (2.0, 2.0, 1.0),
                children: [
                    (name: "body", sprite: Some((color: (0.5, 0.5, 0.5, 1.0), size: Some((32.0, 24.0))))),
                ],
            ),
        )"#;
        let template: PrefabTemplate = ron::from_str(src).unwrap();
        assert_eq!(template.base_scale(), Vec3::new(2.0, 2.0, 1.0));
        assert!(!template.root.has_renderables());
        assert!(template.root.children[0].has_renderables());
        assert!(template.renders_anything());
        assert!(!PrefabTemplate::new("marker", TemplateNode::new("marker")).renders_anything());
        assert_eq!(template.swatch_color(), Some([0.5, 0.5, 0.5, 1.0]));
        assert_eq!(template.root.children[0].scale, [1.0, 1.0, 1.0]);
    }
}
