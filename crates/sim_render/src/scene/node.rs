//! Node data model
//!
//! Pure data types for the scene graph: a node is a named, numerically
//! identified graph element with a local pose and scale, specialized by a
//! closed set of kinds (visual, light, camera).

use crate::foundation::math::{Color, Pose, Vec3};

/// Numeric node id, unique within one scene
///
/// Ids are either assigned by the wire protocol or generated by the scene.
pub type NodeId = u32;

/// Shader program class a material requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderType {
    /// Per-vertex shading
    Vertex,
    /// Per-pixel shading
    Pixel,
    /// Object-space normal mapping
    NormalMapObjectSpace,
    /// Tangent-space normal mapping
    NormalMapTangentSpace,
    /// Fallback for undeclared or unrecognized shader types
    #[default]
    Unknown,
}

/// Surface material owned by a single visual
///
/// Materials are not shared between visuals: every material message builds
/// a fresh instance, and fields absent from the message keep these engine
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Ambient reflectance
    pub ambient: Color,
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Emitted color
    pub emissive: Color,
    /// Whether lighting affects the surface
    pub lighting: bool,
    /// Normal map texture reference
    pub normal_map: Option<String>,
    /// Requested shader program class
    pub shader_type: ShaderType,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            diffuse: Color::WHITE,
            specular: Color::BLACK,
            emissive: Color::BLACK,
            lighting: true,
            normal_map: None,
            shader_type: ShaderType::Unknown,
        }
    }
}

/// Reference to an external mesh asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshDescriptor {
    /// Mesh asset name/filename for the backend's mesh loader
    pub mesh_name: String,
    /// Sub-mesh to select within the asset
    pub submesh_name: Option<String>,
    /// Whether to recenter the selected sub-mesh
    pub center_submesh: bool,
}

/// Typed shape attached to a visual
///
/// Unit shapes are sized through the owning visual's local scale; see the
/// geometry processing in [`crate::sync`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Unit box
    Box,
    /// Unit cone
    Cone,
    /// Unit cylinder
    Cylinder,
    /// Unit plane
    Plane,
    /// Unit sphere
    Sphere,
    /// External mesh asset
    Mesh(MeshDescriptor),
    /// No renderable shape
    Empty,
}

/// Light variant-specific state
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Omnidirectional light
    Point,
    /// Parallel-ray light
    Directional {
        /// Emission direction
        direction: Vec3,
    },
    /// Cone-shaped light
    Spot {
        /// Emission direction
        direction: Vec3,
        /// Inner cone angle in radians
        inner_angle: f64,
        /// Outer cone angle in radians
        outer_angle: f64,
        /// Falloff exponent between inner and outer cone
        falloff: f64,
    },
}

/// Light state common to all variants plus the variant itself
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Variant-specific state
    pub kind: LightKind,
    /// Diffuse color
    pub diffuse: Color,
    /// Specular color
    pub specular: Color,
    /// Constant attenuation factor
    pub attenuation_constant: f64,
    /// Linear attenuation factor
    pub attenuation_linear: f64,
    /// Quadratic attenuation factor
    pub attenuation_quadratic: f64,
    /// Attenuation range
    pub attenuation_range: f64,
    /// Whether the light casts shadows
    pub cast_shadows: bool,
}

impl Light {
    /// Point light with engine defaults
    pub fn point() -> Self {
        Self::with_kind(LightKind::Point)
    }

    /// Directional light with engine defaults, pointing down
    pub fn directional() -> Self {
        Self::with_kind(LightKind::Directional {
            direction: Vec3::new(0.0, 0.0, -1.0),
        })
    }

    /// Spot light with engine defaults, pointing down
    pub fn spot() -> Self {
        Self::with_kind(LightKind::Spot {
            direction: Vec3::new(0.0, 0.0, -1.0),
            inner_angle: 0.0,
            outer_angle: std::f64::consts::FRAC_PI_4,
            falloff: 1.0,
        })
    }

    fn with_kind(kind: LightKind) -> Self {
        Self {
            kind,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            attenuation_constant: 1.0,
            attenuation_linear: 0.0,
            attenuation_quadratic: 0.0,
            attenuation_range: 100.0,
            cast_shadows: false,
        }
    }
}

/// Camera projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Horizontal field of view in radians
    pub horizontal_fov: f64,
    /// Near clip distance
    pub near_clip: f64,
    /// Far clip distance
    pub far_clip: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            horizontal_fov: std::f64::consts::FRAC_PI_3,
            near_clip: 0.1,
            far_clip: 1000.0,
        }
    }
}

/// Kind-specific node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Hierarchical composition unit carrying geometry and a material
    Visual {
        /// Attached geometries; update processing keeps at most one current set
        geometries: Vec<Geometry>,
        /// Material owned by this visual
        material: Option<Material>,
    },
    /// Light source
    Light(Light),
    /// Camera sensor
    Camera(CameraParams),
}

impl NodeKind {
    /// An empty visual payload
    pub fn visual() -> Self {
        Self::Visual {
            geometries: Vec::new(),
            material: None,
        }
    }
}

/// Any element of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Numeric id, unique within the scene
    pub id: NodeId,
    /// Name, unique within the scene
    pub name: String,
    /// Local pose relative to the parent
    pub pose: Pose,
    /// Local scale; for unit shapes this encodes the shape size
    pub scale: Vec3,
    /// Parent visual, `None` only for the root
    pub parent: Option<NodeId>,
    /// Child nodes in creation order
    pub children: Vec<NodeId>,
    /// Kind-specific payload
    pub kind: NodeKind,
}

impl Node {
    /// Mutable access to the light payload, if this node is a light
    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// The light payload, if this node is a light
    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Whether this node is a visual
    pub fn is_visual(&self) -> bool {
        matches!(self.kind, NodeKind::Visual { .. })
    }
}
