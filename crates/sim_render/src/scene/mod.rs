//! Scene and node capability contract
//!
//! Defines the backend-agnostic scene graph surface the synchronization
//! core mutates. Backends (rasterizer, ray tracer) implement [`Scene`] and
//! mirror the graph into their native structures from the pre-render hook;
//! [`MemoryScene`] is the plain in-memory implementation used by tests and
//! as the authoritative graph for backends that prefer to diff it.
//!
//! Node variants are a closed enumeration ([`NodeKind`], [`LightKind`],
//! [`Geometry`]) dispatched by exhaustive match rather than downcasts, so
//! an unsupported kind is always an explicit, testable code path.

mod memory;
mod node;

pub use memory::MemoryScene;
pub use node::{
    CameraParams, Geometry, Light, LightKind, Material, MeshDescriptor, Node, NodeId, NodeKind,
    ShaderType,
};

use crate::foundation::math::Color;
use crate::foundation::time::SimTime;
use std::sync::{Arc, RwLock};

/// Shared handle to a scene instance
///
/// Scenes are owned by exactly one scene set at a time but observed by
/// backends and client code, so they live behind a shared lock.
pub type ScenePtr = Arc<RwLock<dyn Scene>>;

/// One renderable node graph instance with stable identity
///
/// All creation methods attach the new node under the given parent and
/// return its id. Lookup methods that take a name resolve against the
/// scene-wide name index; kind-filtered variants only match nodes of the
/// corresponding kind.
pub trait Scene: Send + Sync {
    /// Numeric scene id, stable across promotion
    fn id(&self) -> u32;

    /// Scene name, stable across promotion
    fn name(&self) -> &str;

    /// Root visual every top-level node hangs off
    fn root_visual(&self) -> NodeId;

    /// Set the ambient light color
    fn set_ambient_light(&mut self, color: Color);

    /// Current ambient light color
    fn ambient_light(&self) -> Color;

    /// Set the background color
    fn set_background_color(&mut self, color: Color);

    /// Current background color
    fn background_color(&self) -> Color;

    /// Create a visual under `parent`, honoring a wire-assigned id when given
    fn create_visual(&mut self, id: Option<NodeId>, name: &str, parent: NodeId) -> NodeId;

    /// Create a light under `parent`
    fn create_light(&mut self, name: &str, light: Light, parent: NodeId) -> NodeId;

    /// Create a camera under `parent`, honoring a wire-assigned id when given
    fn create_camera(
        &mut self,
        id: Option<NodeId>,
        name: &str,
        params: CameraParams,
        parent: NodeId,
    ) -> NodeId;

    /// Look up a node of any kind
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Mutable node access for pose/scale/geometry/material updates
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    /// Resolve any node by name
    fn node_by_name(&self, name: &str) -> Option<NodeId>;

    /// Resolve a visual by name
    fn visual_by_name(&self, name: &str) -> Option<NodeId>;

    /// Resolve a light by name
    fn light_by_name(&self, name: &str) -> Option<NodeId>;

    /// Resolve a sensor (camera) by name
    fn sensor_by_name(&self, name: &str) -> Option<NodeId>;

    /// Destroy a node and its subtree by exact name; no-op when absent
    fn destroy_node_by_name(&mut self, name: &str);

    /// Number of nodes in the graph, root included
    fn node_count(&self) -> usize;

    /// Drop every node except a fresh root and reset scene state
    fn clear(&mut self);

    /// Commit the simulation time of the last applied update batch
    fn set_sim_time(&mut self, time: SimTime);

    /// Simulation time of the last applied update batch
    fn sim_time(&self) -> SimTime;

    /// Per-tick hook invoked after a batch of updates has been applied
    fn pre_render(&mut self);
}
