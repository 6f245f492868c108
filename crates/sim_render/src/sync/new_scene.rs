//! New (pending replacement) scene processor
//!
//! Assembles the replacement scene set while the live set keeps rendering.
//! Pose batches are kept as an ordered sequence rather than deduplicated:
//! this set represents a snapshot being assembled, not a live scene being
//! patched. Each flush first reconstructs every scene from the latest
//! complete snapshot, so the result is always a function of
//! (snapshot, buffered-messages-since-snapshot) and never of processing
//! history.

use crate::convert;
use crate::foundation::time::SimTime;
use crate::msgs::{PosesStampedMsg, SceneMsg};
use crate::scene::Scene;
use crate::sync::apply;
use crate::sync::set::SceneSet;
use thiserror::Error;

/// Scene snapshot decode failure
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The response payload was not a valid RON scene snapshot
    #[error("malformed scene snapshot: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

/// Replacement scene set plus its flush logic
#[derive(Default)]
pub(crate) struct NewSceneProcessor {
    pub(crate) set: SceneSet,
    snapshot: Option<SceneMsg>,
}

/// Pose-domain buffers for the replacement set
#[derive(Default)]
pub(crate) struct NewPoseQueue {
    /// Pose batches in arrival order, not deduplicated
    batches: Vec<PosesStampedMsg>,
    /// Removals confirmed by the round-trip protocol
    removals: Vec<String>,
}

impl NewPoseQueue {
    pub(crate) fn buffer_batch(&mut self, msg: PosesStampedMsg) {
        self.batches.push(msg);
    }

    pub(crate) fn buffer_removal(&mut self, name: String) {
        self.removals.push(name);
    }

    pub(crate) fn clear(&mut self) {
        self.batches.clear();
        self.removals.clear();
    }
}

impl NewSceneProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decode and store a scene snapshot from a scene-info response payload
    pub(crate) fn set_scene_data(&mut self, data: &[u8]) -> Result<(), SnapshotError> {
        self.snapshot = Some(ron::de::from_bytes(data)?);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Flush the snapshot and all buffered messages into every scene
    pub(crate) fn update_scenes(&mut self, poses: &mut NewPoseQueue) {
        let batch_time = poses
            .batches
            .last()
            .map(|batch| SimTime::new(batch.time.sec, batch.time.nsec))
            .unwrap_or_default();

        for scene_ptr in self.set.iter_scenes() {
            let Ok(mut guard) = scene_ptr.write() else {
                continue;
            };
            let scene: &mut dyn Scene = &mut *guard;

            if let Some(snapshot) = &self.snapshot {
                process_snapshot(scene, snapshot);
            }

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
            for batch in &poses.batches {
                for msg in &batch.poses {
                    apply::process_pose(scene, msg);
                }
            }
            for name in &poses.removals {
                apply::process_removal(scene, name);
            }

            scene.set_sim_time(batch_time);
            scene.pre_render();
        }

        self.set.clear_messages();
        self.snapshot = None;
        poses.clear();
    }

    /// Drop all scenes, pending messages, and the stored snapshot
    pub(crate) fn clear(&mut self) {
        self.set.clear();
        self.snapshot = None;
    }
}

/// Rebuild a scene from a full snapshot
///
/// Clears the graph, then applies ambient light, background color, and the
/// snapshot's light and model lists. Deterministic in the snapshot alone.
pub(crate) fn process_snapshot(scene: &mut dyn Scene, msg: &SceneMsg) {
    scene.clear();

    if let Some(ambient) = &msg.ambient {
        scene.set_ambient_light(convert::color(ambient));
    }
    if let Some(background) = &msg.background {
        scene.set_background_color(convert::color(background));
    }

    let root = scene.root_visual();
    for light in &msg.lights {
        apply::process_light_under(scene, light, root);
    }
    for model in &msg.models {
        apply::process_model_under(scene, model, root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::{ColorMsg, LightMsg, LightTypeMsg, ModelMsg, PoseMsg, TimeMsg, Vector3Msg};
    use crate::scene::{MemoryScene, ScenePtr};
    use std::sync::{Arc, RwLock};

    fn snapshot() -> SceneMsg {
        SceneMsg {
            name: "world".to_string(),
            ambient: Some(ColorMsg {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            }),
            background: Some(ColorMsg {
                r: 0.0,
                g: 0.0,
                b: 0.3,
                a: 1.0,
            }),
            lights: vec![LightMsg {
                name: "sun".to_string(),
                kind: Some(LightTypeMsg::Directional),
                ..LightMsg::default()
            }],
            models: vec![ModelMsg {
                name: "ground".to_string(),
                ..ModelMsg::default()
            }],
        }
    }

    #[test]
    fn test_snapshot_rebuild_is_idempotent() {
        let mut scene = MemoryScene::new(1, "pending");
        let msg = snapshot();

        process_snapshot(&mut scene, &msg);
        let first_count = scene.node_count();
        let first_ambient = scene.ambient_light();

        process_snapshot(&mut scene, &msg);
        assert_eq!(scene.node_count(), first_count);
        assert_eq!(scene.ambient_light(), first_ambient);
        assert!(scene.light_by_name("sun").is_some());
        assert!(scene.visual_by_name("ground").is_some());
    }

    #[test]
    fn test_snapshot_rebuild_replaces_previous_content() {
        let mut scene = MemoryScene::new(1, "pending");
        let root = scene.root_visual();
        scene.create_visual(None, "stale", root);

        process_snapshot(&mut scene, &snapshot());
        assert!(scene.visual_by_name("stale").is_none());
        assert!(scene.visual_by_name("ground").is_some());
    }

    #[test]
    fn test_pose_batches_apply_in_arrival_order() {
        let scene: ScenePtr = Arc::new(RwLock::new(MemoryScene::new(1, "pending")));
        let mut processor = NewSceneProcessor::new();
        processor.set.add_scene(scene.clone());

        let data = ron::to_string(&snapshot()).unwrap();
        processor.set_scene_data(data.as_bytes()).unwrap();

        let mut queue = NewPoseQueue::default();
        for (sec, x) in [(1, 10.0), (2, 20.0)] {
            queue.buffer_batch(PosesStampedMsg {
                time: TimeMsg { sec, nsec: 0 },
                poses: vec![PoseMsg {
                    name: "ground".to_string(),
                    position: Vector3Msg { x, y: 0.0, z: 0.0 },
                    ..PoseMsg::default()
                }],
            });
        }
        processor.update_scenes(&mut queue);

        let guard = scene.read().unwrap();
        let id = guard.visual_by_name("ground").unwrap();
        assert_eq!(guard.node(id).unwrap().pose.position.x, 20.0);
        assert_eq!(guard.sim_time(), SimTime::new(2, 0));
    }

    #[test]
    fn test_snapshot_consumed_by_flush() {
        let scene: ScenePtr = Arc::new(RwLock::new(MemoryScene::new(1, "pending")));
        let mut processor = NewSceneProcessor::new();
        processor.set.add_scene(scene);

        let data = ron::to_string(&snapshot()).unwrap();
        processor.set_scene_data(data.as_bytes()).unwrap();
        assert!(processor.has_snapshot());

        let mut queue = NewPoseQueue::default();
        processor.update_scenes(&mut queue);
        assert!(!processor.has_snapshot());
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let mut processor = NewSceneProcessor::new();
        let result = processor.set_scene_data(b"not ron at all (");
        assert!(result.is_err());
        assert!(!processor.has_snapshot());
    }
}
