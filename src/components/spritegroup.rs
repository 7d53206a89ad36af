//! Batch container for sprites sharing one tile sheet.
//!
//! A [`SpriteGroup`] draws all of its members inside a single batch of its
//! tile sheet, so the whole group costs one flush.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::components::sprite::Sprite;
use crate::error::{Result, SpriteError};
use crate::resources::tilesheet::SharedTileSheet;

#[derive(Component, Debug)]
pub struct SpriteGroup {
    id: String,
    tile_sheet: SharedTileSheet,
    sprites: Vec<Sprite>,
}

impl SpriteGroup {
    pub fn new(id: impl Into<String>, tile_sheet: SharedTileSheet) -> Self {
        SpriteGroup {
            id: id.into(),
            tile_sheet,
            sprites: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tile_sheet(&self) -> &SharedTileSheet {
        &self.tile_sheet
    }

    /// Add a sprite. Sprites drawing from another tile sheet are rejected.
    pub fn push(&mut self, sprite: Sprite) -> Result<()> {
        if !Arc::ptr_eq(sprite.tile_sheet(), &self.tile_sheet) {
            return Err(SpriteError::SheetMismatch {
                sprite: sprite.id().to_string(),
                sheet: self.tile_sheet.id().to_string(),
            });
        }
        self.sprites.push(sprite);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    /// Draw every member in one batch.
    pub fn draw(&self) {
        if self.sprites.is_empty() {
            return;
        }
        self.tile_sheet.start_batch();
        for sprite in &self.sprites {
            sprite.draw(false);
        }
        self.tile_sheet.finish_batch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::resources::spriteconfig::SpriteConfig;
    use crate::resources::tilesheet::TileSheet;
    use glam::Vec2;

    #[test]
    fn test_draw_is_one_batch() {
        let sheet = TileSheet::shared("tiles", "tiles.png");
        let config = SpriteConfig::new();
        let mut group = SpriteGroup::new("row", Arc::clone(&sheet));
        for i in 0..3 {
            let mut s = Sprite::create(format!("tile{}", i), Arc::clone(&sheet), &config);
            s.set_size(Vec2::new(16.0, 16.0));
            s.set_offset(Vec2::new(i as f32 * 16.0, 0.0));
            s.set_default_tile(Rect::new(0.0, 0.0, 16.0, 16.0));
            group.push(s).unwrap();
        }
        assert_eq!(group.len(), 3);
        group.draw();
        assert_eq!(sheet.flush_count(), 1);
        assert_eq!(sheet.last_flush_len(), 3);
    }

    #[test]
    fn test_empty_group_draws_nothing() {
        let sheet = TileSheet::shared("tiles", "tiles.png");
        let group = SpriteGroup::new("empty", Arc::clone(&sheet));
        assert!(group.is_empty());
        group.draw();
        assert_eq!(sheet.flush_count(), 0);
    }

    #[test]
    fn test_rejects_other_sheet() {
        let sheet = TileSheet::shared("tiles", "tiles.png");
        let other = TileSheet::shared("tiles", "tiles.png");
        let mut group = SpriteGroup::new("row", sheet);
        let s = Sprite::create("stray", other, &SpriteConfig::new());
        assert!(matches!(
            group.push(s),
            Err(SpriteError::SheetMismatch { .. })
        ));
        assert!(group.is_empty());
    }
}
