//! # sim_render
//!
//! A render-engine-agnostic scene graph abstraction layer for a robotics
//! simulator. Client code constructs and mutates 3D scenes (visuals, lights,
//! cameras, geometry, materials) through one stable interface while the
//! actual rasterization is delegated to interchangeable backend engines.
//!
//! The heart of the crate is the scene synchronization machinery in
//! [`sync`]: it reconciles an asynchronously-delivered, partially-ordered
//! stream of network update messages (poses, model/link/joint/visual/sensor/
//! light additions, removals) into a consistent, renderable scene graph,
//! while supporting a non-disruptive full-scene replacement protocol (the
//! "current vs. new" scene swap) so that a scene reload never stalls
//! rendering.
//!
//! ## Architecture
//!
//! ```text
//! Transport callbacks (arbitrary threads)
//!      ↓ enqueue
//! SceneManager (coordinator, two lock domains)
//!      ↓ routes to
//! Current / New scene processors (per-tick flush)
//!      ↓ mutate
//! Scene graphs (behind the Scene trait, backend-agnostic)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, RwLock};
//! use sim_render::prelude::*;
//!
//! let transport = Arc::new(ChannelTransport::new());
//! let manager = SceneManager::new(transport.clone());
//!
//! // Register a scene; the manager requests a full snapshot for it.
//! let scene = Arc::new(RwLock::new(MemoryScene::new(1, "main")));
//! manager.add_scene(scene);
//! assert_eq!(manager.scene_count(), 1);
//!
//! // Per render tick, flush buffered updates into the scene graphs.
//! manager.update_scenes();
//! ```

// Core engine modules
pub mod foundation;
pub mod msgs;
pub mod convert;
pub mod scene;
pub mod transport;
pub mod sync;

mod config;

pub use config::{Config, ConfigError, SyncConfig};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::{Color, Pose, Quat, Vec3},
            time::SimTime,
        },
        scene::{
            CameraParams, Geometry, Light, LightKind, Material, MemoryScene, Node, NodeId,
            NodeKind, Scene, ScenePtr, ShaderType,
        },
        sync::SceneManager,
        transport::{ChannelTransport, RequestId, RequestSender},
        Config, SyncConfig,
    };
}
