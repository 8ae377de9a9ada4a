//! Scene layer
//!
//! The renderable node, its node table, and the per-frame dispatch path.
//!
//! ## Frame flow
//!
//! ```text
//! hierarchy traversal (external)   writes world matrices
//!           ↓
//! SceneGraph::dispatch             poses skin palettes, hands off to geometry
//!           ↓
//! Geometry::draw                   records DrawCommands into the context
//!           ↓
//! renderer backend (external)      drains the commands
//! ```
//!
//! Everything here is single-threaded and synchronous: dispatch calls are
//! strictly sequential, which is what makes the shared per-geometry skin
//! palette safe to overwrite each call.

mod bounds;
mod dispatch;
mod geometry;
mod graph;
mod node;

pub use bounds::{Aabb, BoundingSphere, BoundingVolume};
pub use dispatch::DispatchContext;
pub use geometry::{Geometry, SkinBinding};
pub use graph::{NodeKey, SceneGraph};
pub use node::{NodeTransform, RenderableNode, RenderStyle};
