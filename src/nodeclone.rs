//! Entity remapping used while cloning a subtree of nodes.
//!
//! When a scene fragment is duplicated, every cloned node is registered here
//! against its original so that references between nodes can be pointed at
//! the copies afterwards. Sprites receive the context when cloned but never
//! attach themselves; the caller does that with the mapped entity.

use bevy_ecs::prelude::Entity;
use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone)]
pub struct NodeCloneContext {
    cloned_nodes: FxHashMap<Entity, Entity>,
}

impl NodeCloneContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `clone` is the copy of `original`.
    pub fn register_cloned_node(&mut self, original: Entity, clone: Entity) {
        self.cloned_nodes.insert(original, clone);
    }

    /// The copy of `original`, if it has been cloned in this context.
    pub fn find_cloned_node(&self, original: Entity) -> Option<Entity> {
        self.cloned_nodes.get(&original).copied()
    }

    pub fn len(&self) -> usize {
        self.cloned_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloned_nodes.is_empty()
    }
}
