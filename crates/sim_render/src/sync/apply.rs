//! Per-message graph mutation
//!
//! Translates one arrived update message into mutations of a single target
//! scene. All functions are free functions over `&mut dyn Scene`; buffering
//! and scene selection live in the processors, so everything here is
//! deterministic and directly testable.

use crate::convert;
use crate::msgs::{
    GeometryMsg, GeometryTypeMsg, JointMsg, LightMsg, LightTypeMsg, LinkMsg, MaterialMsg, ModelMsg,
    PoseMsg, SensorMsg, VisualMsg,
};
use crate::scene::{
    CameraParams, Geometry, Light, LightKind, Material, MeshDescriptor, Node, NodeId, NodeKind,
    Scene,
};
use std::mem::discriminant;

/// Apply a light message under the scene root
///
/// Parent linkage is not yet carried by light messages, so lights always
/// resolve against the root visual.
pub(crate) fn process_light(scene: &mut dyn Scene, msg: &LightMsg) {
    let parent = scene.root_visual();
    process_light_under(scene, msg, parent);
}

/// Apply a light message under an explicit parent
pub(crate) fn process_light_under(scene: &mut dyn Scene, msg: &LightMsg, parent: NodeId) {
    match msg.kind {
        Some(LightTypeMsg::Point) => {
            let id = resolve_light(scene, &msg.name, Light::point(), parent);
            apply_light_common(scene, id, msg);
        }
        Some(LightTypeMsg::Spot) => {
            let id = resolve_light(scene, &msg.name, Light::spot(), parent);
            apply_spot_fields(scene, id, msg);
            apply_light_common(scene, id, msg);
        }
        Some(LightTypeMsg::Directional) => {
            let id = resolve_light(scene, &msg.name, Light::directional(), parent);
            apply_directional_fields(scene, id, msg);
            apply_light_common(scene, id, msg);
        }
        Some(LightTypeMsg::Unknown) => {
            log::error!("invalid light type for \"{}\"", msg.name);
        }
        // No type declared: update an existing light, never fabricate one.
        None => {
            if let Some(id) = scene.light_by_name(&msg.name) {
                apply_light_common(scene, id, msg);
            }
        }
    }
}

/// Find the named light, or create it from `template` under `parent`
///
/// An existing light whose variant differs from the requested one is
/// re-kinded in place; names stay unique within a scene.
fn resolve_light(scene: &mut dyn Scene, name: &str, template: Light, parent: NodeId) -> NodeId {
    if let Some(id) = scene.light_by_name(name) {
        let matches_kind = scene
            .node(id)
            .and_then(Node::light)
            .is_some_and(|light| discriminant(&light.kind) == discriminant(&template.kind));
        if !matches_kind {
            if let Some(light) = scene.node_mut(id).and_then(Node::light_mut) {
                light.kind = template.kind;
            }
        }
        id
    } else {
        scene.create_light(name, template, parent)
    }
}

fn apply_spot_fields(scene: &mut dyn Scene, id: NodeId, msg: &LightMsg) {
    let Some(light) = scene.node_mut(id).and_then(Node::light_mut) else {
        return;
    };
    if let LightKind::Spot {
        direction,
        inner_angle,
        outer_angle,
        falloff,
    } = &mut light.kind
    {
        if let Some(dir) = &msg.direction {
            *direction = convert::vector3(dir);
        }
        if let Some(inner) = msg.spot_inner_angle {
            *inner_angle = inner;
        }
        if let Some(outer) = msg.spot_outer_angle {
            *outer_angle = outer;
        }
        if let Some(exp) = msg.spot_falloff {
            *falloff = exp;
        }
    }
}

fn apply_directional_fields(scene: &mut dyn Scene, id: NodeId, msg: &LightMsg) {
    let Some(light) = scene.node_mut(id).and_then(Node::light_mut) else {
        return;
    };
    if let LightKind::Directional { direction } = &mut light.kind {
        if let Some(dir) = &msg.direction {
            *direction = convert::vector3(dir);
        }
    }
}

/// Apply the variant-independent light fields present in the message
fn apply_light_common(scene: &mut dyn Scene, id: NodeId, msg: &LightMsg) {
    let Some(node) = scene.node_mut(id) else {
        return;
    };

    if let Some(pose) = &msg.pose {
        node.pose = convert::pose(pose);
    }

    let Some(light) = node.light_mut() else {
        return;
    };
    if let Some(diffuse) = &msg.diffuse {
        light.diffuse = convert::color(diffuse);
    }
    if let Some(specular) = &msg.specular {
        light.specular = convert::color(specular);
    }
    if let Some(constant) = msg.attenuation_constant {
        light.attenuation_constant = constant;
    }
    if let Some(linear) = msg.attenuation_linear {
        light.attenuation_linear = linear;
    }
    if let Some(quadratic) = msg.attenuation_quadratic {
        light.attenuation_quadratic = quadratic;
    }
    if let Some(range) = msg.range {
        light.attenuation_range = range;
    }
    if let Some(cast) = msg.cast_shadows {
        light.cast_shadows = cast;
    }
}

/// Apply a model message under the scene root
pub(crate) fn process_model(scene: &mut dyn Scene, msg: &ModelMsg) {
    let parent = scene.root_visual();
    process_model_under(scene, msg, parent);
}

/// Apply a model message under an explicit parent
pub(crate) fn process_model_under(scene: &mut dyn Scene, msg: &ModelMsg, parent: NodeId) {
    let model = resolve_visual(scene, msg.id, &msg.name, parent);

    if let Some(pose) = &msg.pose {
        set_local_pose(scene, model, pose);
    }
    if let Some(scale) = &msg.scale {
        set_local_scale(scene, model, convert::vector3(scale));
    }

    for joint in &msg.joints {
        process_joint_under(scene, joint, model);
    }
    for link in &msg.links {
        process_link_under(scene, link, model);
    }
    // always skip first empty visual
    for visual in msg.visuals.iter().skip(1) {
        process_visual_under(scene, visual, model);
    }
}

/// Apply a joint message, resolving the parent from the message
pub(crate) fn process_joint(scene: &mut dyn Scene, msg: &JointMsg) {
    let parent = resolve_parent(scene, &msg.parent);
    process_joint_under(scene, msg, parent);
}

fn process_joint_under(scene: &mut dyn Scene, msg: &JointMsg, parent: NodeId) {
    let joint = resolve_visual(scene, msg.id, &msg.name, parent);

    if let Some(pose) = &msg.pose {
        set_local_pose(scene, joint, pose);
    }
    for sensor in &msg.sensors {
        process_sensor_under(scene, sensor, joint);
    }
}

fn process_link_under(scene: &mut dyn Scene, msg: &LinkMsg, parent: NodeId) {
    let link = resolve_visual(scene, msg.id, &msg.name, parent);

    if let Some(pose) = &msg.pose {
        set_local_pose(scene, link, pose);
    }
    // always skip first empty visual
    for visual in msg.visuals.iter().skip(1) {
        process_visual_under(scene, visual, link);
    }
    for sensor in &msg.sensors {
        process_sensor_under(scene, sensor, link);
    }
}

/// Apply a visual message, resolving the parent from the message
pub(crate) fn process_visual(scene: &mut dyn Scene, msg: &VisualMsg) {
    let parent = resolve_parent(scene, &msg.parent_name);
    process_visual_under(scene, msg, parent);
}

fn process_visual_under(scene: &mut dyn Scene, msg: &VisualMsg, parent: NodeId) {
    let visual = resolve_visual(scene, msg.id, &msg.name, parent);

    if let Some(pose) = &msg.pose {
        set_local_pose(scene, visual, pose);
    }
    if let Some(scale) = &msg.scale {
        set_local_scale(scene, visual, convert::vector3(scale));
    }
    if let Some(geometry) = &msg.geometry {
        process_geometry(scene, geometry, visual);
    }
    if let Some(material) = &msg.material {
        let material = build_material(material);
        if let Some(NodeKind::Visual {
            material: slot, ..
        }) = scene.node_mut(visual).map(|node| &mut node.kind)
        {
            *slot = Some(material);
        }
    }
}

/// Apply a sensor message, resolving the parent from the message
pub(crate) fn process_sensor(scene: &mut dyn Scene, msg: &SensorMsg) {
    let parent = resolve_parent(scene, &msg.parent);
    process_sensor_under(scene, msg, parent);
}

fn process_sensor_under(scene: &mut dyn Scene, msg: &SensorMsg, parent: NodeId) {
    // Only camera sensors are materialized; other kinds are accepted but
    // produce no graph change.
    if let Some(camera) = &msg.camera {
        if scene.sensor_by_name(&msg.name).is_none() {
            let mut params = CameraParams::default();
            if let Some(fov) = camera.horizontal_fov {
                params.horizontal_fov = fov;
            }
            if let Some(near) = camera.near_clip {
                params.near_clip = near;
            }
            if let Some(far) = camera.far_clip {
                params.far_clip = far;
            }
            scene.create_camera(msg.id, &msg.name, params, parent);
        }
    }
}

/// Find the named visual, or create it (honoring a wire id) under `parent`
fn resolve_visual(scene: &mut dyn Scene, id: Option<u32>, name: &str, parent: NodeId) -> NodeId {
    scene
        .visual_by_name(name)
        .unwrap_or_else(|| scene.create_visual(id, name, parent))
}

/// Replace the visual's attached geometry from a geometry message
///
/// Any previously attached geometries are removed first, so a visual holds
/// at most one current geometry set. Unit shapes encode their size through
/// the parent visual's local scale.
pub(crate) fn process_geometry(scene: &mut dyn Scene, msg: &GeometryMsg, visual: NodeId) {
    clear_geometries(scene, visual);

    match msg.kind {
        GeometryTypeMsg::Box => {
            if let Some(shape) = &msg.box_shape {
                set_local_scale(scene, visual, convert::vector3(&shape.size));
            }
            attach_geometry(scene, visual, Geometry::Box);
        }
        GeometryTypeMsg::Cylinder => {
            if let Some(shape) = &msg.cylinder {
                let scale = crate::foundation::math::Vec3::new(
                    shape.radius,
                    shape.radius,
                    shape.length,
                );
                set_local_scale(scene, visual, scale);
            }
            attach_geometry(scene, visual, Geometry::Cylinder);
        }
        GeometryTypeMsg::Sphere => {
            if let Some(shape) = &msg.sphere {
                let radius = shape.radius;
                set_local_scale(
                    scene,
                    visual,
                    crate::foundation::math::Vec3::new(radius, radius, radius),
                );
            }
            attach_geometry(scene, visual, Geometry::Sphere);
        }
        GeometryTypeMsg::Plane => {
            if let Some(shape) = &msg.plane {
                let scale =
                    crate::foundation::math::Vec3::new(shape.size.x, shape.size.y, 1.0);
                set_local_scale(scene, visual, scale);
            }
            attach_geometry(scene, visual, Geometry::Plane);
        }
        GeometryTypeMsg::Mesh => {
            if let Some(shape) = &msg.mesh {
                let descriptor = MeshDescriptor {
                    mesh_name: shape.filename.clone(),
                    submesh_name: shape.submesh.clone(),
                    center_submesh: shape.center_submesh.unwrap_or(false),
                };
                if let Some(scale) = &shape.scale {
                    set_local_scale(scene, visual, convert::vector3(scale));
                }
                attach_geometry(scene, visual, Geometry::Mesh(descriptor));
            } else {
                log::error!("mesh geometry message without a mesh payload");
            }
        }
        GeometryTypeMsg::Empty => {}
        GeometryTypeMsg::Cone
        | GeometryTypeMsg::Heightmap
        | GeometryTypeMsg::Image
        | GeometryTypeMsg::Polyline => {
            log::error!("unsupported geometry type: {:?}", msg.kind);
            log::warn!("using empty geometry instead");
        }
    }
}

fn clear_geometries(scene: &mut dyn Scene, visual: NodeId) {
    if let Some(NodeKind::Visual { geometries, .. }) =
        scene.node_mut(visual).map(|node| &mut node.kind)
    {
        geometries.clear();
    }
}

fn attach_geometry(scene: &mut dyn Scene, visual: NodeId, geometry: Geometry) {
    if let Some(NodeKind::Visual { geometries, .. }) =
        scene.node_mut(visual).map(|node| &mut node.kind)
    {
        geometries.push(geometry);
    }
}

/// Build a fresh material from a message; absent fields keep engine defaults
pub(crate) fn build_material(msg: &MaterialMsg) -> Material {
    let mut material = Material::default();

    if let Some(ambient) = &msg.ambient {
        material.ambient = convert::color(ambient);
    }
    if let Some(diffuse) = &msg.diffuse {
        material.diffuse = convert::color(diffuse);
    }
    if let Some(specular) = &msg.specular {
        material.specular = convert::color(specular);
    }
    if let Some(emissive) = &msg.emissive {
        material.emissive = convert::color(emissive);
    }
    if let Some(lighting) = msg.lighting {
        material.lighting = lighting;
    }
    if let Some(normal_map) = &msg.normal_map {
        material.normal_map = Some(normal_map.clone());
    }
    if msg.shader_type.is_some() {
        material.shader_type = convert::shader_type(msg.shader_type);
    }

    material
}

/// Apply a standalone pose message; a missing referent is a benign race
/// between creation and update ordering, not an error
pub(crate) fn process_pose(scene: &mut dyn Scene, msg: &PoseMsg) {
    if let Some(id) = scene.node_by_name(&msg.name) {
        set_local_pose(scene, id, msg);
    }
}

/// Destroy a node by exact name; idempotent
pub(crate) fn process_removal(scene: &mut dyn Scene, name: &str) {
    scene.destroy_node_by_name(name);
}

/// Resolve a parent by name, defaulting to the scene root
fn resolve_parent(scene: &mut dyn Scene, name: &str) -> NodeId {
    if name.is_empty() {
        return scene.root_visual();
    }
    match scene.visual_by_name(name) {
        Some(id) => id,
        None => {
            log::error!("invalid parent name: {}", name);
            log::warn!("using scene root node");
            scene.root_visual()
        }
    }
}

fn set_local_pose(scene: &mut dyn Scene, id: NodeId, pose: &PoseMsg) {
    if let Some(node) = scene.node_mut(id) {
        node.pose = convert::pose(pose);
    }
}

fn set_local_scale(scene: &mut dyn Scene, id: NodeId, scale: crate::foundation::math::Vec3) {
    if let Some(node) = scene.node_mut(id) {
        node.scale = scale;
    }
}
