//! Marionette demo
//!
//! Builds a two-joint puppet skeleton, attaches a skinned quad to it,
//! animates the joints over a few frames, and prints the draw commands and
//! posed matrix palette each frame. Finishes with the bounds and
//! instancing flows.
//!
//! Pass a `.toml` or `.ron` scene file to replace the built-in skeleton
//! layout (see `scene.toml` next to this crate).

use std::rc::Rc;

use log::debug;
use scene_engine::prelude::*;

const JOINT_NAMES: [&str; 2] = ["hip", "knee"];

/// A quad strung between the two joints, with one bone per joint.
fn puppet_mesh() -> MeshGeometry {
    let vertices = vec![
        Vertex::new([-0.25, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        Vertex::new([0.25, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        Vertex::new([0.25, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([-0.25, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    // Inverse bind pose: the joints rest at y = 1.0 and y = 0.5.
    let bind_pose = vec![
        Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0)),
        Mat4::new_translation(&Vec3::new(0.0, -0.5, 0.0)),
    ];

    let mut mesh = MeshGeometry::new(vertices, indices)
        .with_skin(SkinBinding::new(bind_pose))
        .with_enclosing_sphere();
    mesh.generate_wireframe();
    mesh
}

/// Built-in fallback when no scene file is given on the command line.
fn default_scene() -> SceneDescriptor {
    let joint = |name: &str, y: f32| NodeDescriptor {
        name: name.to_string(),
        position: Vec3::new(0.0, y, 0.0),
        rotation_euler: Vec3::zeros(),
        scale: Vec3::new(1.0, 1.0, 1.0),
        style: RenderStyle::Normal,
        cast_shadows: false,
        receive_shadows: true,
    };
    SceneDescriptor {
        nodes: vec![joint("hip", 1.0), joint("knee", 0.5)],
    }
}

/// Swing the hip and let the knee follow, the way a hierarchy traversal
/// would: parent world first, child world composed from it.
fn animate(graph: &mut SceneGraph, angle: f32) -> Result<(), SceneError> {
    let hip = graph.find_node("hip").ok_or(SceneError::UnknownNode)?;
    let knee = graph.find_node("knee").ok_or(SceneError::UnknownNode)?;

    let swing = Quat::from_euler_angles(0.0, 0.0, angle);
    let hip_world = Transform::from_position_rotation(Vec3::new(0.0, 1.0, 0.0), swing).to_matrix();
    let knee_world = hip_world * Mat4::new_translation(&Vec3::new(0.0, -0.5, 0.0));

    graph.set_world_matrix(hip, hip_world)?;
    graph.set_world_matrix(knee, knee_world)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let descriptor = match std::env::args().nth(1) {
        Some(path) => SceneDescriptor::load_from_file(path)?,
        None => default_scene(),
    };
    let mut graph = descriptor.build();
    debug!("built scene with {} nodes", graph.node_count());

    let mesh: Rc<dyn Geometry> = Rc::new(puppet_mesh());
    let puppet = graph.insert(RenderableNode::with_geometry("puppet", Rc::clone(&mesh)));
    graph.resolve_bones(puppet, &JOINT_NAMES)?;

    let mut ctx = DispatchContext::new();
    for frame in 0..3 {
        let angle = frame as f32 * 0.25;
        animate(&mut graph, angle)?;

        ctx.clear();
        graph.dispatch_all(&mut ctx)?;

        println!("frame {frame} (swing {angle:.2} rad):");
        for command in ctx.commands() {
            println!(
                "  draw {:?} with {} indices, translation ({:.2}, {:.2}, {:.2})",
                command.style, command.index_count, command.world.m14, command.world.m24, command.world.m34
            );
        }
        if let Some(skin) = mesh.skin() {
            for (index, matrix) in skin.matrix_palette().iter().enumerate() {
                println!(
                    "  bone {index} offset ({:.2}, {:.2}, {:.2})",
                    matrix.m14, matrix.m24, matrix.m34
                );
            }
        }
    }

    // Bounds are refreshed only on request; do so now and report.
    graph.sync_all_bounds();
    let node = graph.get(puppet).ok_or(SceneError::UnknownNode)?;
    let bounds = node.bounds();
    println!(
        "puppet bounds: min ({:.2}, {:.2}, {:.2}) max ({:.2}, {:.2}, {:.2})",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );
    if let Some(volume) = node.world_volume() {
        println!(
            "puppet volume: radius {:.2} around ({:.2}, {:.2}, {:.2})",
            volume.radius, volume.center.x, volume.center.y, volume.center.z
        );
    }

    // Instancing: the copy shares the mesh but needs its own bone binding.
    let copy = graph.instantiate(puppet)?;
    graph.resolve_bones(copy, &JOINT_NAMES)?;
    ctx.clear();
    graph.dispatch_all(&mut ctx)?;
    println!(
        "after instancing: {} nodes, {} draw commands",
        graph.node_count(),
        ctx.commands().len()
    );

    Ok(())
}
