//! Scene-node bookkeeping for sprites.
//!
//! A sprite's owning node is the entity its component lives on. The link is
//! filled in when the component is added, so sprites built outside the world
//! (loaders, clones) start detached.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::sprite::Sprite;

/// Point newly added sprites at the entity that owns them.
pub fn attach_sprite_nodes(mut query: Query<(Entity, &mut Sprite), Added<Sprite>>) {
    for (entity, mut sprite) in query.iter_mut() {
        if sprite.node() != Some(entity) {
            trace!("Attaching sprite '{}' to {:?}", sprite.id(), entity);
            sprite.set_node(Some(entity));
        }
    }
}
