//! # Scene Engine
//!
//! A scene-graph rendering core: renderable nodes in a transform
//! hierarchy, skeletal (skinned) pose data, and bounding volumes for
//! culling and shadow decisions.
//!
//! ## Features
//!
//! - **Renderable nodes**: per-node render style, shadow flags, and cached
//!   world-space bounds with an explicit refresh policy
//! - **Instancing**: many nodes sharing one geometry resource, per-node
//!   state kept separate
//! - **Skinning**: matrix palettes posed from bone handles each dispatch
//! - **Arena-backed graph**: slotmap keys instead of weak references, so
//!   stale bone bindings are detectable errors
//! - **Scene descriptors**: TOML/RON data files for node layout
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//! use std::rc::Rc;
//!
//! // A triangle mesh shared by however many nodes want it.
//! let mesh = Rc::new(MeshGeometry::new(
//!     vec![
//!         Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
//!         Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
//!         Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
//!     ],
//!     vec![0, 1, 2],
//! ));
//!
//! let mut graph = SceneGraph::new();
//! let node = graph.insert(RenderableNode::with_geometry("triangle", mesh));
//!
//! let mut ctx = DispatchContext::new();
//! graph.dispatch(node, &mut ctx)?;
//! assert_eq!(ctx.commands().len(), 1);
//! # Ok::<(), scene_engine::SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod render;
pub mod scene;

pub use error::SceneError;

/// Common imports for crate users
pub mod prelude {
    pub use crate::config::{Config, ConfigError, NodeDescriptor, SceneDescriptor};
    pub use crate::error::SceneError;
    pub use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
    pub use crate::render::{DrawCommand, MeshGeometry, Vertex};
    pub use crate::scene::{
        Aabb, BoundingSphere, BoundingVolume, DispatchContext, Geometry, NodeKey, NodeTransform,
        RenderableNode, RenderStyle, SceneGraph, SkinBinding,
    };
}
