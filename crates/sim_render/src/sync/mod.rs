//! Scene synchronization core
//!
//! Update messages arrive asynchronously from the simulation while the
//! render loop ticks at its own rate. Everything inbound is buffered, then
//! drained into the scene graphs at one well-defined point per tick
//! ([`SceneManager::update_scenes`]).
//!
//! Two scene sets exist at all times. The live set receives incremental
//! updates every tick; the replacement set collects scenes that still await
//! a full snapshot and is promoted into the live set once that snapshot has
//! been applied. [`manager`] coordinates the two, [`current`] and
//! [`new_scene`] hold the per-set flush logic, [`set`] the shared
//! scene-plus-buffers container, and [`apply`] the per-message graph
//! mutations.

mod apply;
mod current;
mod manager;
mod new_scene;
mod set;

pub use manager::SceneManager;
pub use new_scene::SnapshotError;
