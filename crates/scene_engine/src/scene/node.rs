//! Renderable scene-graph node
//!
//! A node ties a shared geometry resource to a spot in the transform
//! hierarchy, carries per-node render state (style, shadow flags, bone
//! bindings), and caches world-space bounds under an explicit refresh
//! policy. Many nodes may reference one geometry; everything on the node
//! itself is per-instance.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{uniform_scale_of, Mat4, Point3, Transform};
use crate::scene::bounds::{Aabb, BoundingSphere, BoundingVolume};
use crate::scene::geometry::Geometry;
use crate::scene::graph::NodeKey;

/// How a node's geometry is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// Filled triangles
    #[default]
    Normal,
    /// Line rendering of the geometry's wireframe representation
    ///
    /// Only meaningful once the geometry's owner has generated wireframe
    /// data; the node does not validate that precondition when the style is
    /// set. The draw path rejects it instead.
    Wireframe,
}

/// Base transform-hierarchy state owned per node
///
/// Local TRS plus the cached world matrix. The world matrix is written by
/// whatever walks the hierarchy; the node only ever reads it. `Clone` is
/// the base-state clone hook: node cloning delegates this whole level to it
/// instead of copying fields piecemeal.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransform {
    name: String,
    local: Transform,
    world: Mat4,
}

impl NodeTransform {
    /// Create an identity transform with the given node name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::identity(),
            world: Mat4::identity(),
        }
    }

    /// Create a transform with explicit local TRS state
    pub fn with_local(name: impl Into<String>, local: Transform) -> Self {
        Self {
            name: name.into(),
            local,
            world: Mat4::identity(),
        }
    }

    /// Node name, used for bone resolution
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local TRS state
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Mutable local TRS state
    pub fn local_mut(&mut self) -> &mut Transform {
        &mut self.local
    }

    /// Local transform as a matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.local.to_matrix()
    }

    /// Cached world matrix, as last written by the hierarchy traversal
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// Overwrite the cached world matrix
    ///
    /// Called by the traversal that owns world-matrix computation.
    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    /// Recompute the world matrix from the local TRS and a parent world
    ///
    /// `None` makes this a root: world equals local.
    pub fn refresh_world(&mut self, parent: Option<&Mat4>) {
        let local = self.local_matrix();
        self.world = match parent {
            Some(parent) => parent * local,
            None => local,
        };
    }
}

/// A node that can be drawn by the renderer
///
/// Constructed with no geometry; geometry and flags are assigned through
/// setters any number of times. Dropping the node releases its geometry
/// reference without deallocating the shared resource.
pub struct RenderableNode {
    transform: NodeTransform,
    geometry: Option<Rc<dyn Geometry>>,
    style: RenderStyle,
    cast_shadows: bool,
    receive_shadows: bool,
    bones: Vec<NodeKey>,
    world_bounds: Aabb,
}

impl RenderableNode {
    /// Create a node with no geometry and default render state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            transform: NodeTransform::new(name),
            geometry: None,
            style: RenderStyle::default(),
            cast_shadows: false,
            receive_shadows: true,
            bones: Vec::new(),
            world_bounds: Aabb::default(),
        }
    }

    /// Create a node with geometry already attached
    pub fn with_geometry(name: impl Into<String>, geometry: Rc<dyn Geometry>) -> Self {
        let mut node = Self::new(name);
        node.geometry = Some(geometry);
        node
    }

    /// Base transform state
    pub fn transform(&self) -> &NodeTransform {
        &self.transform
    }

    /// Mutable base transform state
    pub fn transform_mut(&mut self) -> &mut NodeTransform {
        &mut self.transform
    }

    /// The attached geometry, shared with any other node referencing it
    pub fn geometry(&self) -> Option<&Rc<dyn Geometry>> {
        self.geometry.as_ref()
    }

    /// Attach or detach the geometry resource
    pub fn set_geometry(&mut self, geometry: Option<Rc<dyn Geometry>>) {
        self.geometry = geometry;
    }

    /// Current render style
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// Set the render style
    ///
    /// Wireframe is only meaningful if the geometry's owner generated
    /// wireframe data; that precondition is checked at draw time, not here.
    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    /// Whether this node casts shadows (default: false)
    pub fn casts_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Set whether this node casts shadows
    pub fn set_cast_shadows(&mut self, cast: bool) {
        self.cast_shadows = cast;
    }

    /// Whether this node receives shadows (default: true)
    pub fn receives_shadows(&self) -> bool {
        self.receive_shadows
    }

    /// Set whether this node receives shadows
    pub fn set_receive_shadows(&mut self, receive: bool) {
        self.receive_shadows = receive;
    }

    /// Bone handles, aligned 1:1 with the geometry's matrix palette
    ///
    /// Empty for non-skinned nodes. Populated only by an external
    /// resolution step (see
    /// [`SceneGraph::resolve_bones`](crate::scene::SceneGraph::resolve_bones));
    /// the node never produces bone handles itself.
    pub fn bones(&self) -> &[NodeKey] {
        &self.bones
    }

    /// Replace the bone handle list
    pub fn set_bones(&mut self, bones: Vec<NodeKey>) {
        self.bones = bones;
    }

    /// Drop all bone handles
    pub fn clear_bones(&mut self) {
        self.bones.clear();
    }

    /// Recompute the cached world-space bounds
    ///
    /// Pushes the geometry's local AABB through the current world matrix.
    /// Nothing invalidates the cache automatically: callers re-invoke this
    /// after any transform change they care about. A node without geometry
    /// keeps its previous bounds.
    pub fn sync_bounds(&mut self) {
        if let Some(geometry) = &self.geometry {
            self.world_bounds = geometry.local_aabb().transformed(self.transform.world_matrix());
        }
    }

    /// World-space bounds as of the last [`sync_bounds`](Self::sync_bounds)
    ///
    /// Returned without recomputation; stale if the world transform changed
    /// since the last sync.
    pub fn bounds(&self) -> &Aabb {
        &self.world_bounds
    }

    /// World-space bounding sphere derived from the geometry's local volume
    ///
    /// `None` if there is no geometry, the geometry has no volume, or the
    /// volume is not spherical. The center goes through the full world
    /// matrix; the radius is scaled by a single scale factor taken from the
    /// matrix's X basis column, which is exact only under uniform scale.
    pub fn world_volume(&self) -> Option<BoundingSphere> {
        let geometry = self.geometry.as_ref()?;
        match geometry.local_volume()? {
            BoundingVolume::Sphere(sphere) => {
                let world = self.transform.world_matrix();
                let center = world.transform_point(&Point3::from(sphere.center)).coords;
                let scale = uniform_scale_of(world);
                Some(BoundingSphere::new(center, sphere.radius * scale))
            }
            BoundingVolume::Box(_) => None,
        }
    }

    /// Produce an instance of this node
    ///
    /// Clone steps, in order: base transform state through the
    /// [`NodeTransform`] clone hook, then node-local render state. The
    /// geometry reference is shared, never duplicated. Bones start empty: a
    /// bone binding is meaningless until re-resolved against whatever
    /// skeleton the instance ends up in, which is the cloner's job.
    pub fn instantiate(&self) -> Self {
        Self {
            transform: self.transform.clone(),
            geometry: self.geometry.clone(),
            style: self.style,
            cast_shadows: self.cast_shadows,
            receive_shadows: self.receive_shadows,
            bones: Vec::new(),
            world_bounds: self.world_bounds,
        }
    }
}
