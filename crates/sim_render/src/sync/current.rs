//! Current (live) scene processor
//!
//! Specializes buffering for the live scene set: pose messages are keyed by
//! node name with last-write-wins semantics, bounding per-tick work to one
//! pose update per distinct node no matter how many duplicates arrived.
//! Removals are applied only for names confirmed by a removal-response
//! round-trip.

use crate::foundation::time::SimTime;
use crate::msgs::{PoseMsg, PosesStampedMsg};
use crate::scene::Scene;
use crate::sync::apply;
use crate::sync::set::SceneSet;
use std::collections::HashMap;

/// Live scene set plus its flush logic
#[derive(Default)]
pub(crate) struct CurrentSceneProcessor {
    pub(crate) set: SceneSet,
}

/// Pose-domain buffers for the live set
#[derive(Default)]
pub(crate) struct CurrentPoseQueue {
    /// Latest pose per node name received this tick
    poses: HashMap<String, PoseMsg>,
    /// Removals confirmed by the round-trip protocol
    removals: Vec<String>,
    /// Timestamp of the most recent pose batch
    time: SimTime,
}

impl CurrentPoseQueue {
    /// Fold a pose batch into the per-name map, replacing older entries
    pub(crate) fn buffer_batch(&mut self, msg: &PosesStampedMsg) {
        self.time = SimTime::new(msg.time.sec, msg.time.nsec);
        for pose in &msg.poses {
            self.poses.insert(pose.name.clone(), pose.clone());
        }
    }

    pub(crate) fn buffer_removal(&mut self, name: String) {
        self.removals.push(name);
    }

    pub(crate) fn clear(&mut self) {
        self.poses.clear();
        self.removals.clear();
    }

    #[cfg(test)]
    pub(crate) fn pending_pose_count(&self) -> usize {
        self.poses.len()
    }
}

impl CurrentSceneProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Flush all buffered messages into every scene in the set
    ///
    /// Poses apply after structural creation so nodes created this tick
    /// still receive their pending pose updates.
    pub(crate) fn update_scenes(&mut self, poses: &mut CurrentPoseQueue) {
        for scene_ptr in self.set.iter_scenes() {
            let Ok(mut guard) = scene_ptr.write() else {
                continue;
            };
            let scene: &mut dyn Scene = &mut *guard;

            for msg in &self.set.lights {
                apply::process_light(scene, msg);
            }
            for msg in &self.set.models {
                apply::process_model(scene, msg);
            }
            for msg in &self.set.joints {
                apply::process_joint(scene, msg);
            }
            for msg in &self.set.visuals {
                apply::process_visual(scene, msg);
            }
            for msg in &self.set.sensors {
                apply::process_sensor(scene, msg);
            }
            for msg in poses.poses.values() {
                apply::process_pose(scene, msg);
            }
            for name in &poses.removals {
                apply::process_removal(scene, name);
            }

            scene.set_sim_time(poses.time);
            scene.pre_render();
        }

        self.set.clear_messages();
        poses.clear();
    }
}
