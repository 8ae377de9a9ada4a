//! Mesh-backed geometry resource
//!
//! CPU-side mesh data implementing the scene layer's [`Geometry`]
//! capability. One `MeshGeometry` is typically wrapped in an `Rc` and
//! shared by many nodes; per-node render state stays on the nodes.

use std::collections::BTreeSet;

use bytemuck::{Pod, Zeroable};

use crate::error::SceneError;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::commands::DrawCommand;
use crate::scene::{Aabb, BoundingSphere, BoundingVolume, DispatchContext, Geometry, RenderStyle, SkinBinding};

/// 3D vertex data
///
/// `#[repr(C)]` and the bytemuck derives keep the layout stable for GPU
/// buffer uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Triangle mesh resource
///
/// Owns vertex and index data, the optional wireframe representation, the
/// optional skin binding, and the local-space bounds derived from the
/// vertex positions at construction time.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    wireframe_indices: Option<Vec<u32>>,
    skin: Option<SkinBinding>,
    local_aabb: Aabb,
    local_volume: Option<BoundingVolume>,
}

impl MeshGeometry {
    /// Create a mesh from a triangle list
    ///
    /// The local AABB is fitted to the vertex positions; an empty vertex
    /// list yields a degenerate box at the origin.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let local_aabb = Aabb::from_points(
            vertices
                .iter()
                .map(|v| Vec3::new(v.position[0], v.position[1], v.position[2])),
        )
        .unwrap_or_default();

        Self {
            vertices,
            indices,
            wireframe_indices: None,
            skin: None,
            local_aabb,
            local_volume: None,
        }
    }

    /// Attach a skin binding
    pub fn with_skin(mut self, skin: SkinBinding) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Assign an explicit local bounding volume
    pub fn with_volume(mut self, volume: BoundingVolume) -> Self {
        self.local_volume = Some(volume);
        self
    }

    /// Assign the sphere enclosing the local AABB as the bounding volume
    pub fn with_enclosing_sphere(self) -> Self {
        let sphere = BoundingSphere::new(self.local_aabb.center(), self.local_aabb.extents().magnitude());
        self.with_volume(BoundingVolume::Sphere(sphere))
    }

    /// Generate the wireframe index list from the triangle list
    ///
    /// Emits one line per unique edge. Must be called by the mesh owner
    /// before any node draws this mesh in wireframe style. Indices past the
    /// last whole triangle are ignored.
    pub fn generate_wireframe(&mut self) {
        let mut edges = BTreeSet::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                edges.insert((a.min(b), a.max(b)));
            }
        }

        let mut lines = Vec::with_capacity(edges.len() * 2);
        for (a, b) in edges {
            lines.push(a);
            lines.push(b);
        }
        self.wireframe_indices = Some(lines);
    }

    /// Vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle index data
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Wireframe index data, if generated
    pub fn wireframe_indices(&self) -> Option<&[u32]> {
        self.wireframe_indices.as_deref()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangle indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

impl Geometry for MeshGeometry {
    fn skin(&self) -> Option<&SkinBinding> {
        self.skin.as_ref()
    }

    fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    fn local_volume(&self) -> Option<BoundingVolume> {
        self.local_volume
    }

    fn draw(
        &self,
        ctx: &mut DispatchContext,
        world: &Mat4,
        style: RenderStyle,
    ) -> Result<(), SceneError> {
        let index_count = match style {
            RenderStyle::Normal => self.indices.len(),
            RenderStyle::Wireframe => self
                .wireframe_indices
                .as_ref()
                .ok_or(SceneError::WireframeUnavailable)?
                .len(),
        };

        let command = DrawCommand {
            node: ctx.current_node(),
            world: *world,
            style,
            index_count: index_count as u32,
        };
        ctx.submit(command);
        Ok(())
    }
}
