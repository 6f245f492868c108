//! Wire message model
//!
//! Serde-backed mirrors of the simulator's update protocol. Sparse-update
//! semantics are expressed with `Option`: an absent field means "leave the
//! engine default alone", exactly like the optional fields of the source
//! protocol.
//!
//! The scene snapshot ([`SceneMsg`]) travels as an opaque RON blob inside a
//! [`ResponseMsg`]; everything else is delivered pre-decoded by the
//! transport collaborator.

use serde::{Deserialize, Serialize};

/// RGBA color as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMsg {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

/// 2D vector message
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector2Msg {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

/// 3D vector message
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3Msg {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

/// Quaternion message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuaternionMsg {
    /// Scalar component
    pub w: f64,
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Default for QuaternionMsg {
    fn default() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// Pose message: position plus orientation
///
/// Standalone pose messages target a node by `name`; poses embedded in an
/// entity message leave `name` empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseMsg {
    /// Target node name (empty for embedded poses)
    pub name: String,
    /// Position component
    pub position: Vector3Msg,
    /// Orientation component
    pub orientation: QuaternionMsg,
}

/// Simulation timestamp message
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeMsg {
    /// Whole seconds
    pub sec: i32,
    /// Nanoseconds past the second
    pub nsec: i32,
}

/// A timestamped batch of named poses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PosesStampedMsg {
    /// Simulation time the batch was captured at
    pub time: TimeMsg,
    /// Poses keyed by node name
    pub poses: Vec<PoseMsg>,
}

/// Light type declared by a light message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightTypeMsg {
    /// Omnidirectional light
    Point,
    /// Cone-shaped light
    Spot,
    /// Parallel-ray light
    Directional,
    /// Reserved/unrecognized wire value
    #[default]
    Unknown,
}

/// Light creation/update message
///
/// A message carrying a `kind` creates or re-types the named light; a
/// message without one only patches an already existing light.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightMsg {
    /// Light name, unique within a scene
    pub name: String,
    /// Declared light type, absent for update-only messages
    pub kind: Option<LightTypeMsg>,
    /// Local pose
    pub pose: Option<PoseMsg>,
    /// Diffuse color
    pub diffuse: Option<ColorMsg>,
    /// Specular color
    pub specular: Option<ColorMsg>,
    /// Constant attenuation factor
    pub attenuation_constant: Option<f64>,
    /// Linear attenuation factor
    pub attenuation_linear: Option<f64>,
    /// Quadratic attenuation factor
    pub attenuation_quadratic: Option<f64>,
    /// Attenuation range
    pub range: Option<f64>,
    /// Whether the light casts shadows
    pub cast_shadows: Option<bool>,
    /// Direction (spot and directional lights)
    pub direction: Option<Vector3Msg>,
    /// Spot light inner cone angle in radians
    pub spot_inner_angle: Option<f64>,
    /// Spot light outer cone angle in radians
    pub spot_outer_angle: Option<f64>,
    /// Spot light falloff exponent
    pub spot_falloff: Option<f64>,
}

/// Geometry type declared by a geometry message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryTypeMsg {
    /// Axis-aligned box
    Box,
    /// Cylinder along the local Z axis
    Cylinder,
    /// Sphere
    Sphere,
    /// Finite plane
    Plane,
    /// Cone along the local Z axis
    Cone,
    /// External mesh asset
    Mesh,
    /// Terrain heightmap
    Heightmap,
    /// Image-extruded geometry
    Image,
    /// Extruded polyline
    Polyline,
    /// No geometry
    #[default]
    Empty,
}

/// Box shape payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxGeomMsg {
    /// Full extents along each axis
    pub size: Vector3Msg,
}

/// Cylinder shape payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderGeomMsg {
    /// Cylinder radius
    pub radius: f64,
    /// Cylinder length along Z
    pub length: f64,
}

/// Sphere shape payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereGeomMsg {
    /// Sphere radius
    pub radius: f64,
}

/// Plane shape payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneGeomMsg {
    /// Plane normal
    pub normal: Option<Vector3Msg>,
    /// Plane extents in X and Y
    pub size: Vector2Msg,
}

/// Mesh shape payload referencing an external asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshGeomMsg {
    /// Mesh asset filename
    pub filename: String,
    /// Sub-mesh to select within the asset
    pub submesh: Option<String>,
    /// Whether to recenter the selected sub-mesh
    pub center_submesh: Option<bool>,
    /// Mesh scale
    pub scale: Option<Vector3Msg>,
}

/// Typed geometry message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryMsg {
    /// Declared geometry type
    pub kind: GeometryTypeMsg,
    /// Box payload
    pub box_shape: Option<BoxGeomMsg>,
    /// Cylinder payload
    pub cylinder: Option<CylinderGeomMsg>,
    /// Sphere payload
    pub sphere: Option<SphereGeomMsg>,
    /// Plane payload
    pub plane: Option<PlaneGeomMsg>,
    /// Mesh payload
    pub mesh: Option<MeshGeomMsg>,
}

/// Shader type declared by a material message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderTypeMsg {
    /// Per-vertex shading
    Vertex,
    /// Per-pixel shading
    Pixel,
    /// Object-space normal mapping
    NormalMapObjectSpace,
    /// Tangent-space normal mapping
    NormalMapTangentSpace,
}

/// Material message with sparse-update fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialMsg {
    /// Ambient color
    pub ambient: Option<ColorMsg>,
    /// Diffuse color
    pub diffuse: Option<ColorMsg>,
    /// Specular color
    pub specular: Option<ColorMsg>,
    /// Emissive color
    pub emissive: Option<ColorMsg>,
    /// Whether lighting affects the material
    pub lighting: Option<bool>,
    /// Normal map texture reference
    pub normal_map: Option<String>,
    /// Declared shader type
    pub shader_type: Option<ShaderTypeMsg>,
}

/// Camera sensor payload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSensorMsg {
    /// Horizontal field of view in radians
    pub horizontal_fov: Option<f64>,
    /// Near clip distance
    pub near_clip: Option<f64>,
    /// Far clip distance
    pub far_clip: Option<f64>,
}

/// Sensor message; only camera sensors are materialized into the graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorMsg {
    /// Wire-assigned numeric id
    pub id: Option<u32>,
    /// Sensor name
    pub name: String,
    /// Parent visual name (empty means scene root)
    pub parent: String,
    /// Camera payload, when the sensor is a camera
    pub camera: Option<CameraSensorMsg>,
}

/// Visual creation/update message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualMsg {
    /// Wire-assigned numeric id
    pub id: Option<u32>,
    /// Visual name
    pub name: String,
    /// Parent visual name (empty means scene root)
    pub parent_name: String,
    /// Local pose
    pub pose: Option<PoseMsg>,
    /// Local scale
    pub scale: Option<Vector3Msg>,
    /// Attached geometry
    pub geometry: Option<GeometryMsg>,
    /// Attached material
    pub material: Option<MaterialMsg>,
}

/// Joint creation/update message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JointMsg {
    /// Wire-assigned numeric id
    pub id: Option<u32>,
    /// Joint name
    pub name: String,
    /// Parent visual name (empty means scene root)
    pub parent: String,
    /// Local pose
    pub pose: Option<PoseMsg>,
    /// Sensors mounted on the joint
    pub sensors: Vec<SensorMsg>,
}

/// Link creation/update message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkMsg {
    /// Wire-assigned numeric id
    pub id: Option<u32>,
    /// Link name
    pub name: String,
    /// Local pose
    pub pose: Option<PoseMsg>,
    /// Visuals attached to the link; index 0 is a structurally empty
    /// placeholder in the source protocol and is never materialized
    pub visuals: Vec<VisualMsg>,
    /// Sensors mounted on the link
    pub sensors: Vec<SensorMsg>,
}

/// Model creation/update message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMsg {
    /// Wire-assigned numeric id
    pub id: Option<u32>,
    /// Model name
    pub name: String,
    /// Local pose
    pub pose: Option<PoseMsg>,
    /// Local scale
    pub scale: Option<Vector3Msg>,
    /// Joints contained in the model
    pub joints: Vec<JointMsg>,
    /// Links contained in the model
    pub links: Vec<LinkMsg>,
    /// Visuals attached to the model; index 0 is a structurally empty
    /// placeholder in the source protocol and is never materialized
    pub visuals: Vec<VisualMsg>,
}

/// Full scene snapshot delivered in response to a scene-info request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneMsg {
    /// Scene name, informational
    pub name: String,
    /// Ambient light color
    pub ambient: Option<ColorMsg>,
    /// Background color
    pub background: Option<ColorMsg>,
    /// All lights in the scene
    pub lights: Vec<LightMsg>,
    /// All models in the scene
    pub models: Vec<ModelMsg>,
}

/// Outbound request observed on the request stream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestMsg {
    /// Request id, unique per sender
    pub id: u64,
    /// Request label, e.g. `"scene_info"` or `"entity_delete"`
    pub request: String,
    /// Request payload (entity name for deletions)
    pub data: String,
}

/// Response paired with a previously observed request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMsg {
    /// Id of the request this answers
    pub id: u64,
    /// Label of the request this answers
    pub request: String,
    /// Result token, `"success"` on success
    pub response: String,
    /// Opaque serialized payload (RON scene snapshot for scene-info)
    pub serialized_data: Vec<u8>,
}
