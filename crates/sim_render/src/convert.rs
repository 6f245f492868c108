//! Message converter
//!
//! Stateless mappings from wire value types to internal value types. The
//! only non-trivial behavior is the unknown-default fallback for shader
//! type enumeration values.

use crate::foundation::math::{Color, Pose, Quat, Quaternion, Vec3};
use crate::msgs::{ColorMsg, PoseMsg, QuaternionMsg, ShaderTypeMsg, Vector3Msg};
use crate::scene::ShaderType;

/// Convert a wire color to an internal color
pub fn color(msg: &ColorMsg) -> Color {
    Color::new(msg.r, msg.g, msg.b, msg.a)
}

/// Convert a wire vector to an internal vector
pub fn vector3(msg: &Vector3Msg) -> Vec3 {
    Vec3::new(msg.x, msg.y, msg.z)
}

/// Convert a wire quaternion to an internal unit quaternion
pub fn quaternion(msg: &QuaternionMsg) -> Quat {
    Quat::from_quaternion(Quaternion::new(msg.w, msg.x, msg.y, msg.z))
}

/// Convert a wire pose to an internal pose
pub fn pose(msg: &PoseMsg) -> Pose {
    Pose::new(vector3(&msg.position), quaternion(&msg.orientation))
}

/// Convert a declared shader type, falling back to [`ShaderType::Unknown`]
/// when the message does not carry one
pub fn shader_type(msg: Option<ShaderTypeMsg>) -> ShaderType {
    match msg {
        Some(ShaderTypeMsg::Vertex) => ShaderType::Vertex,
        Some(ShaderTypeMsg::Pixel) => ShaderType::Pixel,
        Some(ShaderTypeMsg::NormalMapObjectSpace) => ShaderType::NormalMapObjectSpace,
        Some(ShaderTypeMsg::NormalMapTangentSpace) => ShaderType::NormalMapTangentSpace,
        None => ShaderType::Unknown,
    }
}
