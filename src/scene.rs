use crate::trigger::DoorId;
use bevy_ecs::prelude::Entity;
use glam::Vec2;

bitflags::bitflags! {
    /// Layer mask used by render-facing queries and ray casts to pick out
    /// the kinds of objects they care about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectMask: u32 {
        const LEVEL_GEOMETRY = 1 << 0;
        const SPRITE = 1 << 1;
        const RAY_COLLISION = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneNodeId(usize);

#[derive(Debug, Clone)]
pub enum SceneObject {
    Group,
    /// The merged sector geometry (walls, floors, ceilings) as one batch.
    SurfaceBatch,
    Sprite { texture_path: String },
    PawnProxy { pawn: Entity },
    DoorPanel { door: DoorId },
}

#[derive(Debug)]
pub struct SceneNode {
    pub mask: ObjectMask,
    pub object: SceneObject,
    pub position: Vec2,
    pub visible: bool,
    children: Vec<SceneNodeId>,
}

/// Minimal scene tree the simulation maintains for collaborators: what is
/// where, on which layers, and whether it is currently visible. Mesh and
/// material construction happen elsewhere.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = SceneNode {
            mask: ObjectMask::empty(),
            object: SceneObject::Group,
            position: Vec2::ZERO,
            visible: true,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> SceneNodeId {
        SceneNodeId(0)
    }

    pub fn add(
        &mut self,
        parent: SceneNodeId,
        mask: ObjectMask,
        object: SceneObject,
        position: Vec2,
    ) -> SceneNodeId {
        let id = SceneNodeId(self.nodes.len());
        self.nodes.push(SceneNode { mask, object, position, visible: true, children: Vec::new() });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: SceneNodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn set_position(&mut self, id: SceneNodeId, position: Vec2) {
        self.nodes[id.0].position = position;
    }

    /// Recursive mask query: every visible node, at any depth, whose mask
    /// intersects the requested one.
    pub fn get_children(&self, mask: ObjectMask) -> Vec<SceneNodeId> {
        let mut out = Vec::new();
        self.collect(SceneNodeId(0), mask, &mut out);
        out
    }

    fn collect(&self, id: SceneNodeId, mask: ObjectMask, out: &mut Vec<SceneNodeId>) {
        let node = &self.nodes[id.0];
        if !node.visible {
            return;
        }
        if node.mask.intersects(mask) {
            out.push(id);
        }
        for &child in &node.children {
            self.collect(child, mask, out);
        }
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
    }
}
