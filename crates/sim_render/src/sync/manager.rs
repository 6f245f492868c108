//! Scene manager: thread-safe coordination of the two scene sets
//!
//! Inbound transport callbacks and the render loop run on different
//! threads. State is split into two mutex domains so pose traffic, by far
//! the highest-rate stream, never contends with structural updates:
//!
//! * the general domain holds both scene sets, their structural message
//!   buffers, and the snapshot request state;
//! * the pose domain holds the pose queues and the removal round-trip
//!   records.
//!
//! Methods that need both domains always lock general before poses.
//!
//! Newly added scenes are parked in the replacement ("new") set until a
//! full snapshot response arrives; the next [`SceneManager::update_scenes`]
//! call then flushes and promotes them into the live set in one step, so a
//! render loop never observes a half-built scene.

use crate::config::SyncConfig;
use crate::msgs::{
    JointMsg, LightMsg, ModelMsg, PosesStampedMsg, RequestMsg, ResponseMsg, SensorMsg, VisualMsg,
};
use crate::scene::ScenePtr;
use crate::sync::current::{CurrentPoseQueue, CurrentSceneProcessor};
use crate::sync::new_scene::{NewPoseQueue, NewSceneProcessor};
use crate::transport::{RequestId, RequestSender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// General-domain state: scene sets and snapshot request tracking
#[derive(Default)]
struct GeneralState {
    current: CurrentSceneProcessor,
    new: NewSceneProcessor,
    /// Outstanding scene snapshot request, if any
    scene_request: Option<RequestId>,
    /// Set when a snapshot has landed and the new set awaits promotion
    promotion_needed: bool,
}

/// Pose-domain state: pose queues and removal round-trip records
#[derive(Default)]
struct PoseState {
    current: CurrentPoseQueue,
    new: NewPoseQueue,
    /// Names of entities whose deletion request is awaiting confirmation
    pending_removals: HashMap<RequestId, String>,
}

/// Reconciles asynchronous simulation updates into registered scenes
pub struct SceneManager {
    general: Mutex<GeneralState>,
    poses: Mutex<PoseState>,
    transport: Arc<dyn RequestSender>,
    config: SyncConfig,
}

impl SceneManager {
    /// Create a manager with the default protocol labels
    pub fn new(transport: Arc<dyn RequestSender>) -> Self {
        Self::with_config(transport, SyncConfig::default())
    }

    /// Create a manager with custom protocol labels
    pub fn with_config(transport: Arc<dyn RequestSender>, config: SyncConfig) -> Self {
        Self {
            general: Mutex::new(GeneralState::default()),
            poses: Mutex::new(PoseState::default()),
            transport,
            config,
        }
    }

    fn lock_general(&self) -> MutexGuard<'_, GeneralState> {
        self.general.lock().expect("general state lock poisoned")
    }

    fn lock_poses(&self) -> MutexGuard<'_, PoseState> {
        self.poses.lock().expect("pose state lock poisoned")
    }

    /// Number of scenes across both sets
    pub fn scene_count(&self) -> usize {
        let general = self.lock_general();
        general.current.set.scene_count() + general.new.set.scene_count()
    }

    /// True if either set holds a scene with this id
    pub fn has_scene_id(&self, id: u32) -> bool {
        let general = self.lock_general();
        general.current.set.has_scene_id(id) || general.new.set.has_scene_id(id)
    }

    /// True if either set holds a scene with this name
    pub fn has_scene_name(&self, name: &str) -> bool {
        let general = self.lock_general();
        general.current.set.has_scene_name(name) || general.new.set.has_scene_name(name)
    }

    /// True if either set holds exactly this scene
    pub fn has_scene(&self, scene: &ScenePtr) -> bool {
        let general = self.lock_general();
        general.current.set.has_scene(scene) || general.new.set.has_scene(scene)
    }

    /// Look up a scene by id, live set first
    pub fn scene_by_id(&self, id: u32) -> Option<ScenePtr> {
        let general = self.lock_general();
        general
            .current
            .set
            .scene_by_id(id)
            .or_else(|| general.new.set.scene_by_id(id))
    }

    /// Look up a scene by name, live set first
    pub fn scene_by_name(&self, name: &str) -> Option<ScenePtr> {
        let general = self.lock_general();
        general
            .current
            .set
            .scene_by_name(name)
            .or_else(|| general.new.set.scene_by_name(name))
    }

    /// Scene at `index` in the combined ordering, live scenes first
    pub fn scene_at(&self, index: usize) -> Option<ScenePtr> {
        let general = self.lock_general();
        let live = general.current.set.scene_count();
        if index < live {
            general.current.set.scene_at(index)
        } else {
            general.new.set.scene_at(index - live)
        }
    }

    /// Register a scene for synchronization
    ///
    /// The scene joins the replacement set and stays there until a full
    /// snapshot has been applied; a snapshot request is sent unless one is
    /// already in flight.
    pub fn add_scene(&self, scene: ScenePtr) {
        let mut general = self.lock_general();
        if general.current.set.has_scene(&scene) {
            log::error!("scene has already been added");
            return;
        }
        general.new.set.add_scene(scene);
        if general.scene_request.is_none() {
            let id = self
                .transport
                .send_request(&self.config.scene_request_label, "");
            general.scene_request = Some(id);
        }
    }

    /// Unregister a scene by id, searching the live set first
    pub fn remove_scene_by_id(&self, id: u32) -> Option<ScenePtr> {
        let mut general = self.lock_general();
        general
            .current
            .set
            .remove_scene_by_id(id)
            .or_else(|| general.new.set.remove_scene_by_id(id))
    }

    /// Unregister a scene by name, searching the live set first
    pub fn remove_scene_by_name(&self, name: &str) -> Option<ScenePtr> {
        let mut general = self.lock_general();
        general
            .current
            .set
            .remove_scene_by_name(name)
            .or_else(|| general.new.set.remove_scene_by_name(name))
    }

    /// Unregister exactly this scene
    pub fn remove_scene(&self, scene: &ScenePtr) -> Option<ScenePtr> {
        let mut general = self.lock_general();
        general
            .current
            .set
            .remove_scene(scene)
            .or_else(|| general.new.set.remove_scene(scene))
    }

    /// Unregister the scene at `index` in the combined ordering
    pub fn remove_scene_at(&self, index: usize) -> Option<ScenePtr> {
        let mut general = self.lock_general();
        let live = general.current.set.scene_count();
        if index < live {
            general.current.set.remove_scene_at(index)
        } else {
            general.new.set.remove_scene_at(index - live)
        }
    }

    /// Unregister every scene and drop all pending work
    pub fn remove_scenes(&self) {
        let mut general = self.lock_general();
        let mut poses = self.lock_poses();
        general.current.set.clear();
        general.new.clear();
        general.promotion_needed = false;
        poses.current.clear();
        poses.new.clear();
        poses.pending_removals.clear();
    }

    /// Flush buffered updates into the scenes; call once per render tick
    ///
    /// The live set is always flushed. If a snapshot has landed since the
    /// last tick, the replacement set is rebuilt and promoted into the live
    /// set in the same call.
    pub fn update_scenes(&self) {
        let mut general = self.lock_general();
        let mut poses = self.lock_poses();

        general.current.update_scenes(&mut poses.current);

        if general.promotion_needed {
            general.new.update_scenes(&mut poses.new);
            promote(&mut general);
            general.promotion_needed = false;
        }
    }

    /// Inbound request traffic observed on the wire
    ///
    /// Removal requests are recorded so that the matching response can be
    /// tied back to the entity name it concerns.
    pub fn on_request(&self, msg: &RequestMsg) {
        if msg.request == self.config.removal_request_label {
            let mut poses = self.lock_poses();
            poses.pending_removals.insert(msg.id, msg.data.clone());
        }
    }

    /// Inbound response traffic observed on the wire
    pub fn on_response(&self, msg: &ResponseMsg) {
        {
            let mut general = self.lock_general();
            if general.scene_request == Some(msg.id) {
                match general.new.set_scene_data(&msg.serialized_data) {
                    Ok(()) => {
                        general.scene_request = None;
                        general.promotion_needed = true;
                    }
                    Err(err) => {
                        log::error!("discarding scene snapshot: {}", err);
                        let id = self
                            .transport
                            .send_request(&self.config.scene_request_label, "");
                        general.scene_request = Some(id);
                    }
                }
                return;
            }
        }

        if msg.request == self.config.removal_request_label {
            let mut poses = self.lock_poses();
            let Some(name) = poses.pending_removals.remove(&msg.id) else {
                return;
            };
            if msg.response == self.config.success_response {
                poses.current.buffer_removal(name.clone());
                poses.new.buffer_removal(name);
            }
        }
    }

    /// The world itself changed: demote all live scenes and resynchronize
    ///
    /// Any promotion already earned is honored first so its scenes are not
    /// silently dropped; every scene then returns to the replacement set,
    /// cleared, and a fresh snapshot request goes out. All pending messages
    /// in both domains describe the invalidated world and are dropped.
    pub fn on_scene_update(&self) {
        let mut general = self.lock_general();
        let mut poses = self.lock_poses();

        if general.promotion_needed {
            general.new.update_scenes(&mut poses.new);
            general.promotion_needed = false;
        }
        promote(&mut general);

        for scene in general.current.set.take_scenes() {
            if let Ok(mut guard) = scene.write() {
                guard.clear();
            }
            general.new.set.add_scene(scene);
        }
        general.current.set.clear_messages();
        general.new.set.clear_messages();
        poses.current.clear();
        poses.new.clear();

        let id = self
            .transport
            .send_request(&self.config.scene_request_label, "");
        general.scene_request = Some(id);
    }

    /// Buffer a light update for both sets
    pub fn on_light_update(&self, msg: &LightMsg) {
        let mut general = self.lock_general();
        general.current.set.buffer_light(msg.clone());
        general.new.set.buffer_light(msg.clone());
    }

    /// Buffer a model update for both sets
    pub fn on_model_update(&self, msg: &ModelMsg) {
        let mut general = self.lock_general();
        general.current.set.buffer_model(msg.clone());
        general.new.set.buffer_model(msg.clone());
    }

    /// Buffer a joint update for both sets
    pub fn on_joint_update(&self, msg: &JointMsg) {
        let mut general = self.lock_general();
        general.current.set.buffer_joint(msg.clone());
        general.new.set.buffer_joint(msg.clone());
    }

    /// Buffer a visual update for both sets
    pub fn on_visual_update(&self, msg: &VisualMsg) {
        let mut general = self.lock_general();
        general.current.set.buffer_visual(msg.clone());
        general.new.set.buffer_visual(msg.clone());
    }

    /// Buffer a sensor update for both sets
    pub fn on_sensor_update(&self, msg: &SensorMsg) {
        let mut general = self.lock_general();
        general.current.set.buffer_sensor(msg.clone());
        general.new.set.buffer_sensor(msg.clone());
    }

    /// Buffer a stamped pose batch for both sets
    ///
    /// Touches only the pose lock, so pose traffic never waits on
    /// structural processing.
    pub fn on_pose_update(&self, msg: &PosesStampedMsg) {
        let mut poses = self.lock_poses();
        poses.current.buffer_batch(msg);
        poses.new.buffer_batch(msg.clone());
    }

    /// Id of the in-flight scene snapshot request, if any
    pub fn outstanding_request(&self) -> Option<RequestId> {
        self.lock_general().scene_request
    }

    /// True if a snapshot has landed and awaits the next flush
    pub fn pending_promotion(&self) -> bool {
        self.lock_general().promotion_needed
    }
}

/// Move every replacement scene into the live set
fn promote(general: &mut GeneralState) {
    for scene in general.new.set.take_scenes() {
        general.current.set.add_scene(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::{ColorMsg, LightTypeMsg, SceneMsg, TimeMsg, Vector3Msg};
    use crate::msgs::{PoseMsg, PosesStampedMsg};
    use crate::scene::MemoryScene;
    use crate::transport::ChannelTransport;
    use std::sync::RwLock;

    fn scene(id: u32, name: &str) -> ScenePtr {
        Arc::new(RwLock::new(MemoryScene::new(id, name)))
    }

    fn snapshot_bytes() -> Vec<u8> {
        let msg = SceneMsg {
            name: "world".to_string(),
            ambient: Some(ColorMsg {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            }),
            background: None,
            lights: vec![LightMsg {
                name: "sun".to_string(),
                kind: Some(LightTypeMsg::Directional),
                ..LightMsg::default()
            }],
            models: vec![ModelMsg {
                name: "ground".to_string(),
                ..ModelMsg::default()
            }],
        };
        ron::to_string(&msg).unwrap().into_bytes()
    }

    fn manager() -> (Arc<ChannelTransport>, SceneManager) {
        let transport = Arc::new(ChannelTransport::new());
        let manager = SceneManager::new(transport.clone());
        (transport, manager)
    }

    #[test]
    fn test_add_scene_requests_snapshot_once() {
        let (transport, manager) = manager();
        manager.add_scene(scene(1, "a"));
        manager.add_scene(scene(2, "b"));

        let sent = transport.sent_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].request, "scene_info");
        assert_eq!(manager.outstanding_request(), Some(sent[0].id));
        assert_eq!(manager.scene_count(), 2);
    }

    #[test]
    fn test_snapshot_response_promotes_on_next_flush() {
        let (transport, manager) = manager();
        let ptr = scene(1, "a");
        manager.add_scene(ptr.clone());
        let request_id = transport.last_request().unwrap().id;

        manager.on_response(&ResponseMsg {
            id: request_id,
            request: "scene_info".to_string(),
            response: String::new(),
            serialized_data: snapshot_bytes(),
        });
        assert!(manager.pending_promotion());
        assert_eq!(manager.outstanding_request(), None);

        manager.update_scenes();
        assert!(!manager.pending_promotion());

        let guard = ptr.read().unwrap();
        assert!(guard.light_by_name("sun").is_some());
        assert!(guard.visual_by_name("ground").is_some());
    }

    #[test]
    fn test_mismatched_response_id_is_ignored() {
        let (transport, manager) = manager();
        manager.add_scene(scene(1, "a"));
        let request_id = transport.last_request().unwrap().id;

        manager.on_response(&ResponseMsg {
            id: request_id + 99,
            request: "scene_info".to_string(),
            response: String::new(),
            serialized_data: snapshot_bytes(),
        });
        assert!(!manager.pending_promotion());
        assert_eq!(manager.outstanding_request(), Some(request_id));
    }

    #[test]
    fn test_malformed_snapshot_triggers_new_request() {
        let (transport, manager) = manager();
        manager.add_scene(scene(1, "a"));
        let first_id = transport.last_request().unwrap().id;

        manager.on_response(&ResponseMsg {
            id: first_id,
            request: "scene_info".to_string(),
            response: String::new(),
            serialized_data: b"garbage (".to_vec(),
        });
        assert!(!manager.pending_promotion());
        let second_id = manager.outstanding_request().unwrap();
        assert_ne!(second_id, first_id);
        assert_eq!(transport.sent_requests().len(), 2);
    }

    fn promoted_manager() -> (Arc<ChannelTransport>, SceneManager, ScenePtr) {
        let (transport, manager) = manager();
        let ptr = scene(1, "a");
        manager.add_scene(ptr.clone());
        let request_id = transport.last_request().unwrap().id;
        manager.on_response(&ResponseMsg {
            id: request_id,
            request: "scene_info".to_string(),
            response: String::new(),
            serialized_data: snapshot_bytes(),
        });
        manager.update_scenes();
        (transport, manager, ptr)
    }

    #[test]
    fn test_removal_round_trip() {
        let (_, manager, ptr) = promoted_manager();
        assert!(ptr.read().unwrap().visual_by_name("ground").is_some());

        manager.on_request(&RequestMsg {
            id: 77,
            request: "entity_delete".to_string(),
            data: "ground".to_string(),
        });
        manager.on_response(&ResponseMsg {
            id: 77,
            request: "entity_delete".to_string(),
            response: "success".to_string(),
            serialized_data: Vec::new(),
        });
        manager.update_scenes();
        assert!(ptr.read().unwrap().visual_by_name("ground").is_none());
    }

    #[test]
    fn test_failed_removal_keeps_entity() {
        let (_, manager, ptr) = promoted_manager();

        manager.on_request(&RequestMsg {
            id: 78,
            request: "entity_delete".to_string(),
            data: "ground".to_string(),
        });
        manager.on_response(&ResponseMsg {
            id: 78,
            request: "entity_delete".to_string(),
            response: "entity not found".to_string(),
            serialized_data: Vec::new(),
        });
        manager.update_scenes();
        assert!(ptr.read().unwrap().visual_by_name("ground").is_some());
    }

    #[test]
    fn test_scene_update_demotes_and_resynchronizes() {
        let (transport, manager, ptr) = promoted_manager();
        let before = transport.sent_requests().len();

        manager.on_scene_update();
        assert!(manager.outstanding_request().is_some());
        assert_eq!(transport.sent_requests().len(), before + 1);

        // Demoted scenes are emptied and wait for the next snapshot.
        assert!(ptr.read().unwrap().visual_by_name("ground").is_none());
        manager.update_scenes();
        assert!(ptr.read().unwrap().visual_by_name("ground").is_none());
        assert_eq!(manager.scene_count(), 1);
    }

    #[test]
    fn test_demotion_drops_pending_replacement_messages() {
        let (transport, manager) = manager();
        let ptr = scene(1, "a");
        manager.add_scene(ptr.clone());

        // Messages for the world that is about to be invalidated.
        manager.on_model_update(&ModelMsg {
            name: "stale".to_string(),
            ..ModelMsg::default()
        });
        manager.on_pose_update(&PosesStampedMsg {
            time: TimeMsg { sec: 1, nsec: 0 },
            poses: vec![PoseMsg {
                name: "stale".to_string(),
                ..PoseMsg::default()
            }],
        });

        manager.on_scene_update();

        let reload_id = transport.last_request().unwrap().id;
        let empty_world = SceneMsg {
            name: "world2".to_string(),
            ..SceneMsg::default()
        };
        manager.on_response(&ResponseMsg {
            id: reload_id,
            request: "scene_info".to_string(),
            response: String::new(),
            serialized_data: ron::to_string(&empty_world).unwrap().into_bytes(),
        });
        manager.update_scenes();

        assert!(ptr.read().unwrap().visual_by_name("stale").is_none());
    }

    #[test]
    fn test_demotion_keeps_live_scenes_first() {
        let (_, manager, live) = promoted_manager();
        let pending = scene(2, "pending");
        manager.add_scene(pending.clone());

        manager.on_scene_update();

        assert!(Arc::ptr_eq(&manager.scene_at(0).unwrap(), &live));
        assert!(Arc::ptr_eq(&manager.scene_at(1).unwrap(), &pending));
    }

    #[test]
    fn test_promoted_scene_cannot_be_added_twice() {
        let (_, manager, ptr) = promoted_manager();
        manager.add_scene(ptr);
        assert_eq!(manager.scene_count(), 1);
    }

    #[test]
    fn test_structural_updates_reach_live_scene() {
        let (_, manager, ptr) = promoted_manager();

        manager.on_model_update(&ModelMsg {
            name: "intruder".to_string(),
            ..ModelMsg::default()
        });
        manager.on_pose_update(&PosesStampedMsg {
            time: TimeMsg { sec: 9, nsec: 0 },
            poses: vec![PoseMsg {
                name: "intruder".to_string(),
                position: Vector3Msg {
                    x: 4.0,
                    y: 0.0,
                    z: 0.0,
                },
                ..PoseMsg::default()
            }],
        });
        manager.update_scenes();

        let guard = ptr.read().unwrap();
        let id = guard.visual_by_name("intruder").unwrap();
        assert_eq!(guard.node(id).unwrap().pose.position.x, 4.0);
    }

    #[test]
    fn test_remove_scenes_drops_everything() {
        let (_, manager, _) = promoted_manager();
        manager.on_model_update(&ModelMsg::default());
        manager.remove_scenes();
        assert_eq!(manager.scene_count(), 0);
        assert!(!manager.pending_promotion());
    }

    #[test]
    fn test_lookup_spans_both_sets() {
        let (_, manager) = manager();
        let live = scene(1, "live");
        manager.add_scene(live.clone());

        assert!(manager.has_scene_id(1));
        assert!(manager.has_scene(&live));
        manager.add_scene(scene(2, "pending"));
        assert!(manager.has_scene_name("pending"));
        assert!(manager.scene_by_name("pending").is_some());
        assert!(manager.scene_at(1).is_some());
        assert!(manager.scene_at(2).is_none());
        assert!(manager.remove_scene_by_id(2).is_some());
        assert_eq!(manager.scene_count(), 1);
    }
}
