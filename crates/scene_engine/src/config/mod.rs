//! Configuration system
//!
//! Serde-backed descriptors for scenes plus a small `Config` trait that
//! loads and saves them as TOML or RON, keyed off the file extension.
//! Descriptors cover what a data file can sensibly express (names,
//! transforms, render flags); geometry attachment and bone resolution stay
//! programmatic.

use std::ffi::OsStr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::scene::{RenderableNode, RenderStyle, SceneGraph};

/// Configuration trait
///
/// Blanket file IO for any serde-capable, defaultable config type.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(OsStr::to_str) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

fn zero_vec3() -> Vec3 {
    Vec3::zeros()
}

fn unit_vec3() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

fn default_receive_shadows() -> bool {
    true
}

/// Data-file description of one scene node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Node name; must be unique if the node will serve as a bone target
    pub name: String,

    /// Local position
    #[serde(default = "zero_vec3")]
    pub position: Vec3,

    /// Local rotation as XYZ Euler angles in radians
    #[serde(default = "zero_vec3")]
    pub rotation_euler: Vec3,

    /// Local scale factors
    #[serde(default = "unit_vec3")]
    pub scale: Vec3,

    /// Render style
    #[serde(default)]
    pub style: RenderStyle,

    /// Whether the node casts shadows
    #[serde(default)]
    pub cast_shadows: bool,

    /// Whether the node receives shadows
    #[serde(default = "default_receive_shadows")]
    pub receive_shadows: bool,
}

/// Data-file description of a whole scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// The nodes to create, in insertion order
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
}

impl Config for SceneDescriptor {}

impl SceneDescriptor {
    /// Build a scene graph from this description
    ///
    /// Every node starts geometry-less with its world matrix equal to its
    /// local matrix; callers attach geometry and run their hierarchy
    /// traversal afterwards.
    pub fn build(&self) -> SceneGraph {
        let mut graph = SceneGraph::new();
        for descriptor in &self.nodes {
            let mut node = RenderableNode::new(descriptor.name.clone());

            let rotation = Quat::from_euler_angles(
                descriptor.rotation_euler.x,
                descriptor.rotation_euler.y,
                descriptor.rotation_euler.z,
            );
            *node.transform_mut().local_mut() = Transform {
                position: descriptor.position,
                rotation,
                scale: descriptor.scale,
            };
            node.transform_mut().refresh_world(None);

            node.set_style(descriptor.style);
            node.set_cast_shadows(descriptor.cast_shadows);
            node.set_receive_shadows(descriptor.receive_shadows);
            graph.insert(node);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;

    fn sample_descriptor() -> SceneDescriptor {
        SceneDescriptor {
            nodes: vec![
                NodeDescriptor {
                    name: "hip".to_string(),
                    position: Vec3::new(0.0, 1.0, 0.0),
                    rotation_euler: Vec3::zeros(),
                    scale: Vec3::new(1.0, 1.0, 1.0),
                    style: RenderStyle::Normal,
                    cast_shadows: true,
                    receive_shadows: false,
                },
                NodeDescriptor {
                    name: "knee".to_string(),
                    position: Vec3::new(0.0, 0.5, 0.0),
                    rotation_euler: Vec3::zeros(),
                    scale: Vec3::new(1.0, 1.0, 1.0),
                    style: RenderStyle::Wireframe,
                    cast_shadows: false,
                    receive_shadows: true,
                },
            ],
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let descriptor = sample_descriptor();
        let text = toml::to_string_pretty(&descriptor).unwrap();
        let parsed: SceneDescriptor = toml::from_str(&text).unwrap();

        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.nodes[0].name, "hip");
        assert!(parsed.nodes[0].cast_shadows);
        assert_eq!(parsed.nodes[1].style, RenderStyle::Wireframe);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let parsed: SceneDescriptor = toml::from_str(
            r#"
            [[nodes]]
            name = "root"
            "#,
        )
        .unwrap();

        let node = &parsed.nodes[0];
        assert_eq!(node.position, Vec3::zeros());
        assert_eq!(node.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(node.style, RenderStyle::Normal);
        assert!(!node.cast_shadows);
        assert!(node.receive_shadows);
    }

    #[test]
    fn test_file_round_trip_both_formats() {
        let descriptor = sample_descriptor();

        for file_name in ["scene_engine_config_test.toml", "scene_engine_config_test.ron"] {
            let path = std::env::temp_dir().join(file_name);
            descriptor.save_to_file(&path).unwrap();
            let loaded = SceneDescriptor::load_from_file(&path).unwrap();
            assert_eq!(loaded.nodes.len(), descriptor.nodes.len());
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let path = std::env::temp_dir().join("scene_engine_config_test.yaml");
        let result = sample_descriptor().save_to_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_build_creates_configured_nodes() {
        let graph = sample_descriptor().build();

        assert_eq!(graph.node_count(), 2);
        let hip = graph.find_node("hip").unwrap();
        let node = graph.get(hip).unwrap();
        assert!(node.casts_shadows());
        assert!(!node.receives_shadows());
        assert_eq!(
            *node.transform().world_matrix(),
            Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0))
        );
    }
}
