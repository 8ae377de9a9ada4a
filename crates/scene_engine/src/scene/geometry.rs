//! Geometry capability interface
//!
//! The scene layer never owns mesh data; it talks to geometry resources
//! through the [`Geometry`] trait. A geometry is shared read-mostly across
//! nodes (instancing), so handles are `Rc<dyn Geometry>` and the one
//! per-dispatch mutable slot, the skin matrix palette, sits behind a
//! `RefCell` inside [`SkinBinding`].

use std::cell::{Ref, RefCell, RefMut};

use crate::error::SceneError;
use crate::foundation::math::Mat4;
use crate::scene::bounds::{Aabb, BoundingVolume};
use crate::scene::dispatch::DispatchContext;
use crate::scene::node::RenderStyle;

/// Skin data owned by a geometry resource
///
/// Holds the inverse bind pose (one matrix per bone, fixed at load time)
/// and the matrix palette the deformation step reads. The palette is
/// overwritten on every dispatch of every node sharing this geometry, so a
/// geometry shared across multiple skinned nodes with different poses is
/// unsupported. Correctness relies on strictly sequential dispatch.
#[derive(Debug, Clone)]
pub struct SkinBinding {
    inverse_bind_pose: Vec<Mat4>,
    palette: RefCell<Vec<Mat4>>,
}

impl SkinBinding {
    /// Create a binding from the inverse bind pose matrices
    ///
    /// The palette starts out as identity matrices, one per bone.
    pub fn new(inverse_bind_pose: Vec<Mat4>) -> Self {
        let palette = RefCell::new(vec![Mat4::identity(); inverse_bind_pose.len()]);
        Self {
            inverse_bind_pose,
            palette,
        }
    }

    /// Number of bones in the binding
    ///
    /// Also the length of the matrix palette; the two never diverge.
    pub fn bone_count(&self) -> usize {
        self.inverse_bind_pose.len()
    }

    /// Inverse bind pose matrices, one per bone
    pub fn inverse_bind_pose(&self) -> &[Mat4] {
        &self.inverse_bind_pose
    }

    /// The matrix palette as posed by the most recent dispatch
    ///
    /// The borrow must be released before the next dispatch of any node
    /// sharing this geometry.
    pub fn matrix_palette(&self) -> Ref<'_, [Mat4]> {
        Ref::map(self.palette.borrow(), Vec::as_slice)
    }

    /// Mutable palette access for the dispatch path
    pub(crate) fn palette_mut(&self) -> RefMut<'_, Vec<Mat4>> {
        self.palette.borrow_mut()
    }
}

/// Capability interface a renderable node requires from its geometry
///
/// Implemented by concrete mesh resources (see
/// [`MeshGeometry`](crate::render::MeshGeometry)); test code substitutes
/// its own implementations freely.
pub trait Geometry {
    /// Skin binding, if this geometry deforms against a skeleton
    fn skin(&self) -> Option<&SkinBinding> {
        None
    }

    /// Whether this geometry carries skin data
    fn is_skinned(&self) -> bool {
        self.skin().is_some()
    }

    /// Local-space axis-aligned bounds of the geometry
    fn local_aabb(&self) -> Aabb;

    /// Local-space bounding volume, if one was assigned
    fn local_volume(&self) -> Option<BoundingVolume> {
        None
    }

    /// Draw entry point, called once per dispatching node per frame
    ///
    /// `world` is the dispatching node's world transform and `style` its
    /// render style. The context identifies the dispatching node and
    /// collects the resulting draw commands.
    fn draw(
        &self,
        ctx: &mut DispatchContext,
        world: &Mat4,
        style: RenderStyle,
    ) -> Result<(), SceneError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_palette_starts_as_identity() {
        let binding = SkinBinding::new(vec![Mat4::identity(); 3]);

        assert_eq!(binding.bone_count(), 3);
        for matrix in binding.matrix_palette().iter() {
            assert_eq!(*matrix, Mat4::identity());
        }
    }

    #[test]
    fn test_palette_length_tracks_bind_pose() {
        let bind_pose = vec![
            Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0)),
            Mat4::new_translation(&Vec3::new(0.0, -2.0, 0.0)),
        ];
        let binding = SkinBinding::new(bind_pose);

        assert_eq!(binding.bone_count(), binding.matrix_palette().len());
        assert_eq!(binding.inverse_bind_pose().len(), 2);
    }
}
