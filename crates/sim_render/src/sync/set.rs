//! Scene set: an ordered scene collection plus its pending update batch
//!
//! Both the current and the new processor own one of these. Buffered
//! messages accumulate between render ticks and are drained by the owning
//! processor in a fixed order; buffering is skipped entirely while the set
//! holds no scenes.

use crate::msgs::{JointMsg, LightMsg, ModelMsg, SensorMsg, VisualMsg};
use crate::scene::ScenePtr;
use std::sync::Arc;

/// Ordered scenes plus per-kind pending message buffers
#[derive(Default)]
pub(crate) struct SceneSet {
    scenes: Vec<ScenePtr>,
    pub(crate) lights: Vec<LightMsg>,
    pub(crate) models: Vec<ModelMsg>,
    pub(crate) joints: Vec<JointMsg>,
    pub(crate) visuals: Vec<VisualMsg>,
    pub(crate) sensors: Vec<SensorMsg>,
}

impl SceneSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub(crate) fn has_scene_id(&self, id: u32) -> bool {
        self.scene_by_id(id).is_some()
    }

    pub(crate) fn has_scene_name(&self, name: &str) -> bool {
        self.scene_by_name(name).is_some()
    }

    pub(crate) fn has_scene(&self, scene: &ScenePtr) -> bool {
        self.scenes.iter().any(|held| Arc::ptr_eq(held, scene))
    }

    pub(crate) fn scene_by_id(&self, id: u32) -> Option<ScenePtr> {
        self.scenes
            .iter()
            .find(|held| held.read().is_ok_and(|scene| scene.id() == id))
            .cloned()
    }

    pub(crate) fn scene_by_name(&self, name: &str) -> Option<ScenePtr> {
        self.scenes
            .iter()
            .find(|held| held.read().is_ok_and(|scene| scene.name() == name))
            .cloned()
    }

    pub(crate) fn scene_at(&self, index: usize) -> Option<ScenePtr> {
        self.scenes.get(index).cloned()
    }

    /// Append a scene; adding a scene twice is a logged no-op
    pub(crate) fn add_scene(&mut self, scene: ScenePtr) {
        if self.has_scene(&scene) {
            log::error!("scene has already been added");
            return;
        }
        self.scenes.push(scene);
    }

    pub(crate) fn remove_scene_by_id(&mut self, id: u32) -> Option<ScenePtr> {
        let index = self
            .scenes
            .iter()
            .position(|held| held.read().is_ok_and(|scene| scene.id() == id))?;
        Some(self.scenes.remove(index))
    }

    pub(crate) fn remove_scene_by_name(&mut self, name: &str) -> Option<ScenePtr> {
        let index = self
            .scenes
            .iter()
            .position(|held| held.read().is_ok_and(|scene| scene.name() == name))?;
        Some(self.scenes.remove(index))
    }

    pub(crate) fn remove_scene(&mut self, scene: &ScenePtr) -> Option<ScenePtr> {
        let index = self.scenes.iter().position(|held| Arc::ptr_eq(held, scene))?;
        Some(self.scenes.remove(index))
    }

    pub(crate) fn remove_scene_at(&mut self, index: usize) -> Option<ScenePtr> {
        if index >= self.scenes.len() {
            log::error!("invalid scene index: {}", index);
            return None;
        }
        Some(self.scenes.remove(index))
    }

    /// Transfer all scenes out in order, leaving the set's scene list empty
    pub(crate) fn take_scenes(&mut self) -> Vec<ScenePtr> {
        std::mem::take(&mut self.scenes)
    }

    pub(crate) fn iter_scenes(&self) -> impl Iterator<Item = &ScenePtr> {
        self.scenes.iter()
    }

    pub(crate) fn buffer_light(&mut self, msg: LightMsg) {
        if !self.scenes.is_empty() {
            self.lights.push(msg);
        }
    }

    pub(crate) fn buffer_model(&mut self, msg: ModelMsg) {
        if !self.scenes.is_empty() {
            self.models.push(msg);
        }
    }

    pub(crate) fn buffer_joint(&mut self, msg: JointMsg) {
        if !self.scenes.is_empty() {
            self.joints.push(msg);
        }
    }

    pub(crate) fn buffer_visual(&mut self, msg: VisualMsg) {
        if !self.scenes.is_empty() {
            self.visuals.push(msg);
        }
    }

    pub(crate) fn buffer_sensor(&mut self, msg: SensorMsg) {
        if !self.scenes.is_empty() {
            self.sensors.push(msg);
        }
    }

    pub(crate) fn clear_messages(&mut self) {
        self.lights.clear();
        self.models.clear();
        self.joints.clear();
        self.visuals.clear();
        self.sensors.clear();
    }

    /// Drop all scenes and all pending messages
    pub(crate) fn clear(&mut self) {
        self.scenes.clear();
        self.clear_messages();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, ScenePtr};
    use std::sync::{Arc, RwLock};

    fn scene(id: u32, name: &str) -> ScenePtr {
        Arc::new(RwLock::new(MemoryScene::new(id, name)))
    }

    #[test]
    fn test_add_and_lookup() {
        let mut set = SceneSet::new();
        set.add_scene(scene(1, "alpha"));
        set.add_scene(scene(2, "beta"));

        assert_eq!(set.scene_count(), 2);
        assert!(set.has_scene_id(1));
        assert!(set.has_scene_name("beta"));
        assert!(!set.has_scene_id(3));
        assert!(set.scene_by_id(2).is_some());
        assert!(set.scene_at(1).is_some());
        assert!(set.scene_at(2).is_none());
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut set = SceneSet::new();
        let ptr = scene(1, "alpha");
        set.add_scene(ptr.clone());
        set.add_scene(ptr);
        assert_eq!(set.scene_count(), 1);
    }

    #[test]
    fn test_remove_variants() {
        let mut set = SceneSet::new();
        let a = scene(1, "alpha");
        set.add_scene(a.clone());
        set.add_scene(scene(2, "beta"));
        set.add_scene(scene(3, "gamma"));

        assert!(set.remove_scene_by_id(2).is_some());
        assert!(set.remove_scene(&a).is_some());
        assert_eq!(set.scene_count(), 1);
        assert!(set.remove_scene_by_name("gamma").is_some());
        assert!(set.remove_scene_by_name("gamma").is_none());
        assert!(set.remove_scene_at(0).is_none());
    }

    #[test]
    fn test_buffering_requires_a_scene() {
        let mut set = SceneSet::new();
        set.buffer_light(LightMsg::default());
        assert!(set.lights.is_empty());

        set.add_scene(scene(1, "alpha"));
        set.buffer_light(LightMsg::default());
        set.buffer_model(ModelMsg::default());
        assert_eq!(set.lights.len(), 1);
        assert_eq!(set.models.len(), 1);

        set.clear_messages();
        assert!(set.lights.is_empty());
        assert!(set.models.is_empty());
        assert_eq!(set.scene_count(), 1);
    }
}
