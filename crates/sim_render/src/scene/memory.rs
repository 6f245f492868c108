//! In-memory reference scene
//!
//! Plain `HashMap`-backed implementation of the [`Scene`] contract. Tests
//! and headless tools use it directly; rendering backends can either wrap
//! it or implement [`Scene`] against their native graph.

use crate::foundation::math::{Color, Pose, Vec3};
use crate::foundation::time::SimTime;
use crate::scene::{CameraParams, Light, Node, NodeId, NodeKind, Scene};
use std::collections::HashMap;

/// HashMap-backed scene graph with a name index
pub struct MemoryScene {
    id: u32,
    name: String,
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
    ambient: Color,
    background: Color,
    sim_time: SimTime,
    /// Generated ids count down from the top so they never collide with
    /// wire-assigned ids, which grow from zero.
    next_generated: NodeId,
    pre_render_count: u64,
}

impl MemoryScene {
    /// Create an empty scene containing only its root visual
    pub fn new(id: u32, name: &str) -> Self {
        let mut scene = Self {
            id,
            name: name.to_string(),
            root: 0,
            nodes: HashMap::new(),
            names: HashMap::new(),
            ambient: Color::default(),
            background: Color::default(),
            sim_time: SimTime::default(),
            next_generated: NodeId::MAX,
            pre_render_count: 0,
        };
        scene.root = scene.install_root();
        scene
    }

    /// How many times the pre-render hook has fired
    pub fn pre_render_count(&self) -> u64 {
        self.pre_render_count
    }

    fn install_root(&mut self) -> NodeId {
        let id = self.generate_id();
        let name = format!("{}::root", self.name);
        let node = Node {
            id,
            name: name.clone(),
            pose: Pose::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
            children: Vec::new(),
            kind: NodeKind::visual(),
        };
        self.nodes.insert(id, node);
        self.names.insert(name, id);
        id
    }

    fn generate_id(&mut self) -> NodeId {
        while self.nodes.contains_key(&self.next_generated) {
            self.next_generated -= 1;
        }
        let id = self.next_generated;
        self.next_generated -= 1;
        id
    }

    fn resolve_id(&mut self, requested: Option<NodeId>) -> NodeId {
        match requested {
            Some(id) if !self.nodes.contains_key(&id) => id,
            Some(id) => {
                log::error!("node id {} already in use, generating a new one", id);
                self.generate_id()
            }
            None => self.generate_id(),
        }
    }

    fn insert_node(&mut self, id: NodeId, name: &str, kind: NodeKind, parent: NodeId) -> NodeId {
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            log::error!("invalid parent node id: {}", parent);
            log::warn!("attaching \"{}\" to the scene root", name);
            self.root
        };

        let node = Node {
            id,
            name: name.to_string(),
            pose: Pose::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: Some(parent),
            children: Vec::new(),
            kind,
        };

        self.nodes.insert(id, node);
        if self.names.insert(name.to_string(), id).is_some() {
            log::warn!("scene {}: duplicate node name \"{}\"", self.name, name);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        id
    }

    fn find_by_name(&self, name: &str, filter: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let id = *self.names.get(name)?;
        let node = self.nodes.get(&id)?;
        filter(node).then_some(id)
    }

    fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().copied());
            }
            ids.push(next);
        }
        ids
    }
}

impl Scene for MemoryScene {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn root_visual(&self) -> NodeId {
        self.root
    }

    fn set_ambient_light(&mut self, color: Color) {
        self.ambient = color;
    }

    fn ambient_light(&self) -> Color {
        self.ambient
    }

    fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    fn background_color(&self) -> Color {
        self.background
    }

    fn create_visual(&mut self, id: Option<NodeId>, name: &str, parent: NodeId) -> NodeId {
        let id = self.resolve_id(id);
        self.insert_node(id, name, NodeKind::visual(), parent)
    }

    fn create_light(&mut self, name: &str, light: Light, parent: NodeId) -> NodeId {
        let id = self.generate_id();
        self.insert_node(id, name, NodeKind::Light(light), parent)
    }

    fn create_camera(
        &mut self,
        id: Option<NodeId>,
        name: &str,
        params: CameraParams,
        parent: NodeId,
    ) -> NodeId {
        let id = self.resolve_id(id);
        self.insert_node(id, name, NodeKind::Camera(params), parent)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    fn visual_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_by_name(name, Node::is_visual)
    }

    fn light_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_by_name(name, |node| matches!(node.kind, NodeKind::Light(_)))
    }

    fn sensor_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_by_name(name, |node| matches!(node.kind, NodeKind::Camera(_)))
    }

    fn destroy_node_by_name(&mut self, name: &str) {
        let Some(id) = self.names.get(name).copied() else {
            return;
        };
        if id == self.root {
            log::warn!("scene {}: refusing to destroy the root visual", self.name);
            return;
        }

        let parent = self.nodes.get(&id).and_then(|node| node.parent);
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.retain(|child| *child != id);
        }

        for removed in self.collect_subtree(id) {
            if let Some(node) = self.nodes.remove(&removed) {
                if self.names.get(&node.name) == Some(&removed) {
                    self.names.remove(&node.name);
                }
            }
        }
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.names.clear();
        self.next_generated = NodeId::MAX;
        self.root = self.install_root();
        self.ambient = Color::default();
        self.background = Color::default();
        self.sim_time = SimTime::default();
    }

    fn set_sim_time(&mut self, time: SimTime) {
        self.sim_time = time;
    }

    fn sim_time(&self) -> SimTime {
        self.sim_time
    }

    fn pre_render(&mut self) {
        self.pre_render_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_has_only_root() {
        let scene = MemoryScene::new(1, "main");
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node(scene.root_visual()).is_some());
        assert_eq!(scene.node_by_name("main::root"), Some(scene.root_visual()));
    }

    #[test]
    fn test_create_visual_with_wire_id() {
        let mut scene = MemoryScene::new(1, "main");
        let root = scene.root_visual();
        let id = scene.create_visual(Some(42), "box", root);
        assert_eq!(id, 42);
        assert_eq!(scene.visual_by_name("box"), Some(42));
        assert_eq!(scene.node(root).unwrap().children, vec![42]);
    }

    #[test]
    fn test_kind_filtered_lookups() {
        let mut scene = MemoryScene::new(1, "main");
        let root = scene.root_visual();
        scene.create_visual(None, "body", root);
        scene.create_light("lamp", Light::point(), root);
        scene.create_camera(None, "eye", CameraParams::default(), root);

        assert!(scene.visual_by_name("body").is_some());
        assert!(scene.light_by_name("body").is_none());
        assert!(scene.light_by_name("lamp").is_some());
        assert!(scene.sensor_by_name("eye").is_some());
        assert!(scene.visual_by_name("eye").is_none());
        assert!(scene.node_by_name("lamp").is_some());
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut scene = MemoryScene::new(1, "main");
        let root = scene.root_visual();
        let model = scene.create_visual(None, "model", root);
        let link = scene.create_visual(None, "link", model);
        scene.create_visual(None, "visual", link);

        scene.destroy_node_by_name("model");
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node_by_name("link").is_none());
        assert!(scene.node_by_name("visual").is_none());
        assert!(scene.node(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_destroy_absent_name_is_noop() {
        let mut scene = MemoryScene::new(1, "main");
        scene.destroy_node_by_name("nothing");
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_clear_resets_graph_and_state() {
        let mut scene = MemoryScene::new(1, "main");
        let root = scene.root_visual();
        scene.create_visual(None, "model", root);
        scene.set_ambient_light(Color::WHITE);
        scene.set_sim_time(SimTime::new(3, 0));

        scene.clear();
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node_by_name("model").is_none());
        assert_eq!(scene.ambient_light(), Color::default());
        assert_eq!(scene.sim_time(), SimTime::default());
    }

    #[test]
    fn test_invalid_parent_falls_back_to_root() {
        let mut scene = MemoryScene::new(1, "main");
        let id = scene.create_visual(None, "stray", 9999);
        let root = scene.root_visual();
        assert_eq!(scene.node(id).unwrap().parent, Some(root));
    }
}
