use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::sprite::Sprite;
use crate::components::spritegroup::SpriteGroup;
use crate::resources::tilesheet::SharedTileSheet;

/// Draw every loose sprite and every sprite group.
///
/// Loose sprites are bucketed by tile sheet in order of first appearance and
/// each bucket is drawn inside one batch of its sheet. Groups then draw
/// themselves, one batch per group.
pub fn sprite_render_system(sprites: Query<&Sprite>, groups: Query<&SpriteGroup>) {
    let mut buckets: Vec<(SharedTileSheet, Vec<&Sprite>)> = Vec::new();
    for sprite in sprites.iter() {
        match buckets
            .iter_mut()
            .find(|(sheet, _)| Arc::ptr_eq(sheet, sprite.tile_sheet()))
        {
            Some((_, bucket)) => bucket.push(sprite),
            None => buckets.push((Arc::clone(sprite.tile_sheet()), vec![sprite])),
        }
    }

    for (sheet, bucket) in &buckets {
        trace!("Drawing {} sprites from '{}'", bucket.len(), sheet.id());
        sheet.start_batch();
        for sprite in bucket {
            sprite.draw(false);
        }
        sheet.finish_batch();
    }

    for group in groups.iter() {
        group.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::resources::spriteconfig::SpriteConfig;
    use crate::resources::tilesheet::TileSheet;

    fn tick(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(sprite_render_system);
        schedule.run(world);
    }

    fn sprite(id: &str, sheet: &SharedTileSheet) -> Sprite {
        let mut s = Sprite::create(id, Arc::clone(sheet), &SpriteConfig::new());
        s.set_default_tile(Rect::new(0.0, 0.0, 8.0, 8.0));
        s
    }

    #[test]
    fn test_one_batch_per_sheet() {
        let a = TileSheet::shared("a", "a.png");
        let b = TileSheet::shared("b", "b.png");
        let mut world = World::new();
        world.spawn(sprite("a1", &a));
        world.spawn(sprite("b1", &b));
        world.spawn(sprite("a2", &a));
        tick(&mut world);
        assert_eq!(a.flush_count(), 1);
        assert_eq!(a.last_flush_len(), 2);
        assert_eq!(b.flush_count(), 1);
        assert_eq!(b.last_flush_len(), 1);
        assert!(!a.is_batching());
    }

    #[test]
    fn test_groups_draw_their_own_batch() {
        let sheet = TileSheet::shared("a", "a.png");
        let mut group = SpriteGroup::new("g", Arc::clone(&sheet));
        group.push(sprite("g1", &sheet)).unwrap();
        group.push(sprite("g2", &sheet)).unwrap();
        let mut world = World::new();
        world.spawn(group);
        tick(&mut world);
        assert_eq!(sheet.flush_count(), 1);
        assert_eq!(sheet.last_flush_len(), 2);
    }
}
