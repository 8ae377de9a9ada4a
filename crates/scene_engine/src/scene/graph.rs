//! Scene node table and per-frame dispatch
//!
//! Nodes live in a slotmap arena and are addressed by [`NodeKey`]. Bone
//! bindings are keys into the same table, so resolving and revalidating
//! them after a clone is explicit and cheap: a dangling handle is a
//! detectable error, never undefined behavior.
//!
//! Dispatch is strictly sequential and single-threaded. The traversal that
//! computes world matrices runs first (writing them through
//! [`SceneGraph::set_world_matrix`] or the node transforms directly), then
//! each node is dispatched exactly once per frame.

use std::rc::Rc;

use log::{debug, trace};
use slotmap::SlotMap;

use crate::error::SceneError;
use crate::foundation::math::Mat4;
use crate::scene::dispatch::DispatchContext;
use crate::scene::geometry::{Geometry, SkinBinding};
use crate::scene::node::RenderableNode;

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct NodeKey;
}

/// Arena of renderable nodes
///
/// Owns every node in one scene. Keys stay valid until their node is
/// removed; a key held across a removal resolves to nothing rather than to
/// a recycled node.
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, RenderableNode>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its handle
    pub fn insert(&mut self, node: RenderableNode) -> NodeKey {
        debug!("inserting scene node '{}'", node.transform().name());
        self.nodes.insert(node)
    }

    /// Remove a node, returning it if the key was live
    ///
    /// Bone handles pointing at the removed node become stale and surface
    /// as [`SceneError::StaleBoneHandle`] at the next dispatch.
    pub fn remove(&mut self, key: NodeKey) -> Option<RenderableNode> {
        let node = self.nodes.remove(key);
        if let Some(node) = &node {
            debug!("removed scene node '{}'", node.transform().name());
        }
        node
    }

    /// Borrow a node
    pub fn get(&self, key: NodeKey) -> Option<&RenderableNode> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut RenderableNode> {
        self.nodes.get_mut(key)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes with their keys
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &RenderableNode)> {
        self.nodes.iter()
    }

    /// Find a node by name (linear scan)
    pub fn find_node(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.transform().name() == name)
            .map(|(key, _)| key)
    }

    /// Write a node's world matrix
    ///
    /// The seam where the external hierarchy traversal deposits the world
    /// transforms it computed.
    pub fn set_world_matrix(&mut self, key: NodeKey, world: Mat4) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::UnknownNode)?;
        node.transform_mut().set_world_matrix(world);
        Ok(())
    }

    /// Resolve joint names into bone handles for a skinned node
    ///
    /// Names must match, in palette order, the skeleton nodes already in
    /// this scene. If the node's geometry is skinned the count is checked
    /// against the palette length up front, so a bad binding fails here
    /// instead of at the first dispatch.
    pub fn resolve_bones(&mut self, key: NodeKey, joint_names: &[&str]) -> Result<(), SceneError> {
        let mut bones = Vec::with_capacity(joint_names.len());
        for name in joint_names {
            let joint = self
                .find_node(name)
                .ok_or_else(|| SceneError::UnknownBone((*name).to_string()))?;
            bones.push(joint);
        }

        let node = self.nodes.get(key).ok_or(SceneError::UnknownNode)?;
        if let Some(skin) = node.geometry().and_then(|geometry| geometry.skin()) {
            if bones.len() != skin.bone_count() {
                return Err(SceneError::BoneCountMismatch {
                    bones: bones.len(),
                    palette: skin.bone_count(),
                });
            }
        }
        trace!(
            "bound {} joints to node '{}'",
            bones.len(),
            node.transform().name()
        );

        // Key was just checked; the second lookup cannot fail.
        if let Some(node) = self.nodes.get_mut(key) {
            node.set_bones(bones);
        }
        Ok(())
    }

    /// Insert an instance of an existing node
    ///
    /// The instance shares the source's geometry and copies its render
    /// state; its bone list starts empty. Cloning a whole model must
    /// re-resolve bones against the cloned skeleton afterward via
    /// [`resolve_bones`](Self::resolve_bones).
    pub fn instantiate(&mut self, key: NodeKey) -> Result<NodeKey, SceneError> {
        let instance = self
            .nodes
            .get(key)
            .ok_or(SceneError::UnknownNode)?
            .instantiate();
        Ok(self.insert(instance))
    }

    /// Dispatch one node for the current frame
    ///
    /// No geometry is a successful no-op. For skinned geometry the matrix
    /// palette is posed first: `palette[i] = bone_world[i] * bind[i]`, the
    /// inverse bind pose always the right operand. Then control hands off
    /// to the geometry's draw entry point with the node's world transform
    /// and render style.
    ///
    /// `ctx.current_node()` names this node for the duration of the call,
    /// including the draw handoff, and is cleared again on every exit path.
    /// Dispatch is not reentrant and must stay on one thread.
    pub fn dispatch(&self, key: NodeKey, ctx: &mut DispatchContext) -> Result<(), SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::UnknownNode)?;
        let Some(geometry) = node.geometry() else {
            ctx.end_node();
            return Ok(());
        };

        ctx.begin_node(key);
        let result = self.dispatch_geometry(node, geometry, ctx);
        ctx.end_node();
        result
    }

    /// Dispatch every node in the scene once
    pub fn dispatch_all(&self, ctx: &mut DispatchContext) -> Result<(), SceneError> {
        for key in self.nodes.keys() {
            self.dispatch(key, ctx)?;
        }
        Ok(())
    }

    /// Re-sync the cached world bounds of every node
    pub fn sync_all_bounds(&mut self) {
        for node in self.nodes.values_mut() {
            node.sync_bounds();
        }
    }

    fn dispatch_geometry(
        &self,
        node: &RenderableNode,
        geometry: &Rc<dyn Geometry>,
        ctx: &mut DispatchContext,
    ) -> Result<(), SceneError> {
        if let Some(skin) = geometry.skin() {
            self.pose_palette(node, skin)?;
        }
        geometry.draw(ctx, node.transform().world_matrix(), node.style())
    }

    fn pose_palette(&self, node: &RenderableNode, skin: &SkinBinding) -> Result<(), SceneError> {
        let bones = node.bones();
        if bones.len() != skin.bone_count() {
            return Err(SceneError::BoneCountMismatch {
                bones: bones.len(),
                palette: skin.bone_count(),
            });
        }

        let mut palette = skin.palette_mut();
        for ((slot, bind), bone) in palette
            .iter_mut()
            .zip(skin.inverse_bind_pose())
            .zip(bones)
        {
            let joint = self.nodes.get(*bone).ok_or(SceneError::StaleBoneHandle)?;
            *slot = joint.transform().world_matrix() * bind;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::{MeshGeometry, Vertex};
    use crate::scene::node::RenderStyle;

    fn create_test_mesh() -> MeshGeometry {
        MeshGeometry::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
                Vertex::new([0.5, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    fn insert_joint(graph: &mut SceneGraph, name: &str, world: Mat4) -> NodeKey {
        let mut joint = RenderableNode::new(name);
        joint.transform_mut().set_world_matrix(world);
        graph.insert(joint)
    }

    #[test]
    fn test_dispatch_draws_once_with_world_and_style() {
        let mut graph = SceneGraph::new();
        let world = Mat4::new_translation(&Vec3::new(2.0, 0.0, -1.0));
        let mut node = RenderableNode::with_geometry("hull", Rc::new(create_test_mesh()));
        node.transform_mut().set_world_matrix(world);
        let key = graph.insert(node);

        let mut ctx = DispatchContext::new();
        graph.dispatch(key, &mut ctx).unwrap();

        assert_eq!(ctx.commands().len(), 1);
        let command = &ctx.commands()[0];
        assert_eq!(command.world, world);
        assert_eq!(command.style, RenderStyle::Normal);
        assert_eq!(command.node, Some(key));
        assert!(ctx.current_node().is_none());
    }

    #[test]
    fn test_dispatch_without_geometry_is_noop() {
        let mut graph = SceneGraph::new();
        let key = graph.insert(RenderableNode::new("empty"));

        let mut ctx = DispatchContext::new();
        graph.dispatch(key, &mut ctx).unwrap();

        assert!(ctx.commands().is_empty());
        assert!(ctx.current_node().is_none());
    }

    #[test]
    fn test_dispatch_removed_node_fails() {
        let mut graph = SceneGraph::new();
        let key = graph.insert(RenderableNode::new("gone"));
        graph.remove(key);

        let mut ctx = DispatchContext::new();
        let result = graph.dispatch(key, &mut ctx);
        assert!(matches!(result, Err(SceneError::UnknownNode)));
    }

    #[test]
    fn test_skinned_dispatch_poses_palette() {
        let mut graph = SceneGraph::new();
        let hip_world = Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0));
        let knee_world = Mat4::new_translation(&Vec3::new(0.0, 0.5, 0.25));
        insert_joint(&mut graph, "hip", hip_world);
        insert_joint(&mut graph, "knee", knee_world);

        let bind_pose = vec![
            Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0)),
            Mat4::new_translation(&Vec3::new(0.0, -0.5, -0.25)),
        ];
        let mesh: Rc<dyn Geometry> = Rc::new(create_test_mesh().with_skin(SkinBinding::new(bind_pose.clone())));
        let key = graph.insert(RenderableNode::with_geometry("leg", Rc::clone(&mesh)));
        graph.resolve_bones(key, &["hip", "knee"]).unwrap();

        let mut ctx = DispatchContext::new();
        graph.dispatch(key, &mut ctx).unwrap();

        let palette = mesh.skin().unwrap().matrix_palette();
        assert_eq!(palette[0], hip_world * bind_pose[0]);
        assert_eq!(palette[1], knee_world * bind_pose[1]);
        assert_eq!(ctx.commands().len(), 1);
    }

    #[test]
    fn test_bone_count_mismatch_fails_loudly() {
        let mut graph = SceneGraph::new();
        let joint = insert_joint(&mut graph, "hip", Mat4::identity());

        let mesh = create_test_mesh().with_skin(SkinBinding::new(vec![Mat4::identity(); 2]));
        let key = graph.insert(RenderableNode::with_geometry("leg", Rc::new(mesh)));
        // Bypass resolve_bones to simulate a binding gone wrong.
        graph.get_mut(key).unwrap().set_bones(vec![joint]);

        let mut ctx = DispatchContext::new();
        let result = graph.dispatch(key, &mut ctx);
        assert!(matches!(
            result,
            Err(SceneError::BoneCountMismatch {
                bones: 1,
                palette: 2
            })
        ));
        assert!(ctx.commands().is_empty());
        assert!(ctx.current_node().is_none());
    }

    #[test]
    fn test_stale_bone_handle_detected() {
        let mut graph = SceneGraph::new();
        let joint = insert_joint(&mut graph, "hip", Mat4::identity());

        let mesh = create_test_mesh().with_skin(SkinBinding::new(vec![Mat4::identity()]));
        let key = graph.insert(RenderableNode::with_geometry("leg", Rc::new(mesh)));
        graph.resolve_bones(key, &["hip"]).unwrap();
        graph.remove(joint);

        let mut ctx = DispatchContext::new();
        let result = graph.dispatch(key, &mut ctx);
        assert!(matches!(result, Err(SceneError::StaleBoneHandle)));
    }

    #[test]
    fn test_resolve_bones_rejects_unknown_names_and_bad_counts() {
        let mut graph = SceneGraph::new();
        insert_joint(&mut graph, "hip", Mat4::identity());

        let mesh = create_test_mesh().with_skin(SkinBinding::new(vec![Mat4::identity(); 2]));
        let key = graph.insert(RenderableNode::with_geometry("leg", Rc::new(mesh)));

        let unknown = graph.resolve_bones(key, &["hip", "tail"]);
        assert!(matches!(unknown, Err(SceneError::UnknownBone(name)) if name == "tail"));

        let short = graph.resolve_bones(key, &["hip"]);
        assert!(matches!(
            short,
            Err(SceneError::BoneCountMismatch {
                bones: 1,
                palette: 2
            })
        ));
    }

    #[test]
    fn test_instantiate_then_rebind_skeleton() {
        let mut graph = SceneGraph::new();
        insert_joint(&mut graph, "hip", Mat4::identity());

        let mesh = create_test_mesh().with_skin(SkinBinding::new(vec![Mat4::identity()]));
        let source = graph.insert(RenderableNode::with_geometry("leg", Rc::new(mesh)));
        graph.resolve_bones(source, &["hip"]).unwrap();

        let instance = graph.instantiate(source).unwrap();
        assert!(graph.get(instance).unwrap().bones().is_empty());

        // An unresolved instance cannot be skinned.
        let mut ctx = DispatchContext::new();
        let unbound = graph.dispatch(instance, &mut ctx);
        assert!(matches!(
            unbound,
            Err(SceneError::BoneCountMismatch {
                bones: 0,
                palette: 1
            })
        ));

        // Rebinding against the (here: shared) skeleton makes it whole.
        graph.resolve_bones(instance, &["hip"]).unwrap();
        graph.dispatch(instance, &mut ctx).unwrap();
        assert_eq!(ctx.commands().len(), 1);
    }

    #[test]
    fn test_dispatch_all_skips_bare_nodes() {
        let mut graph = SceneGraph::new();
        graph.insert(RenderableNode::new("group"));
        graph.insert(RenderableNode::with_geometry(
            "hull",
            Rc::new(create_test_mesh()),
        ));

        let mut ctx = DispatchContext::new();
        graph.dispatch_all(&mut ctx).unwrap();
        assert_eq!(ctx.commands().len(), 1);
    }

    #[test]
    fn test_find_node_by_name() {
        let mut graph = SceneGraph::new();
        let key = graph.insert(RenderableNode::new("pelvis"));

        assert_eq!(graph.find_node("pelvis"), Some(key));
        assert!(graph.find_node("skull").is_none());
    }

    #[test]
    fn test_set_world_matrix_unknown_key() {
        let mut graph = SceneGraph::new();
        let key = graph.insert(RenderableNode::new("gone"));
        graph.remove(key);

        let result = graph.set_world_matrix(key, Mat4::identity());
        assert!(matches!(result, Err(SceneError::UnknownNode)));
    }
}
