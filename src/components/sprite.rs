//! 2D sprite component.
//!
//! A [`Sprite`] is an animatable textured quad drawn from a shared
//! [`TileSheet`](crate::resources::tilesheet::TileSheet). It owns its geometry (untransformed size and offset from the
//! world origin), its tint and flip, and a frame selection that picks which
//! sub-rectangle of the sheet is drawn.
//!
//! # Frame selection
//!
//! Exactly one [`FrameSource`] is active:
//! - `DefaultTile` draws the sprite-local default tile.
//! - `Strip` draws frame `strip_frame` of strip `strip_index` of the sheet.
//! - `Specific` draws an explicit rectangle.
//!
//! The sheet can be edited while sprites reference it, so strip indices are
//! resolved on every draw. A miss falls back to the default tile.
//!
//! # Related
//!
//! - [`crate::components::spriteproperty`] – the animation property protocol
//! - [`crate::components::spriteloader`] – construction from properties
//! - [`crate::resources::tilesheet::TileSheet`] – frame lookup and batching

use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity};
use bitflags::bitflags;
use glam::{Vec2, Vec4};
use log::{debug, trace};

use crate::components::tint::Tint;
use crate::error::{Result, SpriteError};
use crate::geometry::Rect;
use crate::nodeclone::NodeCloneContext;
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::tilesheet::{Quad, SharedTileSheet};

bitflags! {
    /// Mirroring applied when a sprite is drawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flip: u8 {
        const HORIZONTAL = 1;
        const VERTICAL = 2;
    }
}

impl Flip {
    pub const NONE: Flip = Flip::empty();

    /// Parse names such as `"HORIZONTAL|VERTICAL"` or `"none"`.
    ///
    /// Tokens may be separated by `|`, `,` or whitespace and are
    /// case-insensitive.
    pub fn parse(text: &str) -> Option<Flip> {
        let mut flip = Flip::NONE;
        for token in text
            .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_ascii_uppercase();
            match token.as_str() {
                "NONE" => {}
                "HORZ" => flip |= Flip::HORIZONTAL,
                "VERT" => flip |= Flip::VERTICAL,
                name => flip |= Flip::from_name(name)?,
            }
        }
        Some(flip)
    }
}

impl Default for Flip {
    fn default() -> Self {
        Flip::NONE
    }
}

/// Which source rectangle a sprite draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameSource {
    DefaultTile,
    Strip,
    Specific(Rect),
}

#[derive(Component, Debug)]
pub struct Sprite {
    id: String,
    node: Option<Entity>,
    tile_sheet: SharedTileSheet,
    size: Vec2,
    offset: Vec2,
    tint: Tint,
    flip: Flip,
    default_tile: Rect,
    source: FrameSource,
    strip_index: i32,
    strip_frame: i32,
}

impl Sprite {
    /// Create a sprite drawing from `tile_sheet`.
    ///
    /// The offset starts at the configured default offset; everything else
    /// starts empty: zero size, white tint, no flip, default tile in use.
    pub fn create(id: impl Into<String>, tile_sheet: SharedTileSheet, config: &SpriteConfig) -> Self {
        Sprite {
            id: id.into(),
            node: None,
            tile_sheet,
            size: Vec2::ZERO,
            offset: config.default_offset(),
            tint: Tint::WHITE,
            flip: Flip::NONE,
            default_tile: Rect::ZERO,
            source: FrameSource::DefaultTile,
            strip_index: 0,
            strip_frame: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tile_sheet(&self) -> &SharedTileSheet {
        &self.tile_sheet
    }

    /// The node holding this sprite, if any.
    pub fn node(&self) -> Option<Entity> {
        self.node
    }

    /// Set by the container that owns the sprite.
    pub fn set_node(&mut self, node: Option<Entity>) {
        self.node = node;
    }

    // ---- geometry ----

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn set_size(&mut self, size: impl Into<Vec2>) {
        self.size = size.into();
    }

    pub fn set_width(&mut self, width: f32) {
        self.size.x = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.size.y = height;
    }

    /// Untransformed offset from the world origin (the window center).
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn offset_x(&self) -> f32 {
        self.offset.x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset.y
    }

    pub fn set_offset(&mut self, offset: impl Into<Vec2>) {
        self.offset = offset.into();
    }

    pub fn set_offset_x(&mut self, x: f32) {
        self.offset.x = x;
    }

    pub fn set_offset_y(&mut self, y: f32) {
        self.offset.y = y;
    }

    // ---- visuals ----

    pub fn tint(&self) -> Vec4 {
        self.tint.color
    }

    pub fn set_tint(&mut self, tint: Vec4) {
        self.tint = Tint::from(tint);
    }

    pub fn flip(&self) -> Flip {
        self.flip
    }

    pub fn set_flip(&mut self, flip: Flip) {
        self.flip = flip;
    }

    pub fn default_tile(&self) -> Rect {
        self.default_tile
    }

    pub fn set_default_tile(&mut self, tile: Rect) {
        self.default_tile = tile;
    }

    // ---- frame selection ----

    pub fn frame_source(&self) -> FrameSource {
        self.source
    }

    pub fn default_tile_in_use(&self) -> bool {
        self.source == FrameSource::DefaultTile
    }

    pub fn strip_index(&self) -> i32 {
        self.strip_index
    }

    pub fn strip_frame(&self) -> i32 {
        self.strip_frame
    }

    /// Draw the default tile.
    pub fn use_default_tile(&mut self) {
        self.source = FrameSource::DefaultTile;
    }

    /// Draw a frame of a sheet strip. Indices are not checked here; an
    /// invalid pair draws the default tile.
    pub fn select_strip_frame(&mut self, strip_index: i32, strip_frame: i32) {
        self.strip_index = strip_index;
        self.strip_frame = strip_frame;
        self.source = FrameSource::Strip;
    }

    /// Select a strip frame by strip id. Fails, leaving the selection
    /// untouched, when the sheet has no such frame.
    pub fn select_strip_frame_by_id(&mut self, strip_id: &str, strip_frame: usize) -> Result<()> {
        let strip = self
            .tile_sheet
            .strip_index(strip_id)
            .ok_or_else(|| SpriteError::StripNotFound(strip_id.to_string()))?;
        let out_of_range = || SpriteError::FrameOutOfRange {
            strip,
            frame: strip_frame,
        };
        if self.tile_sheet.strip_frame(strip, strip_frame).is_none() {
            return Err(out_of_range());
        }
        let strip_index = i32::try_from(strip).map_err(|_| out_of_range())?;
        let frame = i32::try_from(strip_frame).map_err(|_| out_of_range())?;
        self.select_strip_frame(strip_index, frame);
        Ok(())
    }

    /// Draw an explicit rectangle of the sheet.
    pub fn select_specific_frame(&mut self, frame: Rect) {
        self.source = FrameSource::Specific(frame);
    }

    fn resolve_frame(&self) -> Option<Rect> {
        match self.source {
            FrameSource::DefaultTile => Some(self.default_tile),
            FrameSource::Strip => {
                let strip = usize::try_from(self.strip_index).ok()?;
                let frame = usize::try_from(self.strip_frame).ok()?;
                self.tile_sheet.strip_frame(strip, frame)
            }
            FrameSource::Specific(rect) => (!rect.is_empty()).then_some(rect),
        }
    }

    /// True when the selected frame cannot be resolved and the default tile
    /// is drawn instead.
    pub fn frame_is_stale(&self) -> bool {
        self.resolve_frame().is_none()
    }

    /// The source rectangle that will be drawn.
    pub fn current_frame(&self) -> Rect {
        self.resolve_frame().unwrap_or_else(|| {
            debug!(
                "Sprite '{}': frame {:?} ({}, {}) not in tile sheet '{}', using default tile",
                self.id,
                self.source,
                self.strip_index,
                self.strip_frame,
                self.tile_sheet.id()
            );
            self.default_tile
        })
    }

    // ---- drawing ----

    /// The quad [`draw`](Self::draw) submits.
    ///
    /// Flipping negates the source width and/or height.
    pub fn quad(&self) -> Quad {
        let mut src = self.current_frame();
        if self.flip.contains(Flip::HORIZONTAL) {
            src.width = -src.width;
        }
        if self.flip.contains(Flip::VERTICAL) {
            src.height = -src.height;
        }
        Quad {
            src,
            dst: Rect::new(self.offset.x, self.offset.y, self.size.x, self.size.y),
            tint: self.tint.color,
        }
    }

    /// Submit the sprite to its tile sheet's batch.
    ///
    /// With `isolate_draw` the call opens and flushes its own batch. Without
    /// it the caller must bracket the draw with
    /// [`start_batch`](crate::resources::tilesheet::TileSheet::start_batch) and
    /// [`finish_batch`](crate::resources::tilesheet::TileSheet::finish_batch).
    pub fn draw(&self, isolate_draw: bool) {
        let quad = self.quad();
        if isolate_draw {
            self.tile_sheet.start_batch();
        }
        self.tile_sheet.submit(quad);
        if isolate_draw {
            self.tile_sheet.finish_batch();
        }
    }

    // ---- cloning ----

    /// Copy all sprite state into a new sprite sharing the same tile sheet.
    ///
    /// The clone has no node; the caller attaches it.
    pub fn clone_with(&self, context: &NodeCloneContext) -> Sprite {
        trace!(
            "Cloning sprite '{}' (node {:?} -> {:?})",
            self.id,
            self.node,
            self.node.and_then(|n| context.find_cloned_node(n))
        );
        Sprite {
            id: self.id.clone(),
            node: None,
            tile_sheet: Arc::clone(&self.tile_sheet),
            size: self.size,
            offset: self.offset,
            tint: self.tint,
            flip: self.flip,
            default_tile: self.default_tile,
            source: self.source,
            strip_index: self.strip_index,
            strip_frame: self.strip_frame,
        }
    }
}
