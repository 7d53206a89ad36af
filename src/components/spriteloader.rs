//! Sprite construction from property data.
//!
//! Both data-driven factories ([`Sprite::from_url`] and
//! [`Sprite::from_properties`]) end in the same loader, which reads:
//!
//! | key           | value                          | default                      |
//! |---------------|--------------------------------|------------------------------|
//! | `tileSheet`   | tile sheet id in the store     | required                     |
//! | `defaultTile` | x, y, w, h                     | zero rectangle               |
//! | `strip`       | strip id or strip index        | default tile in use          |
//! | `frame`       | frame index within `strip`     | 0                            |
//! | `size`        | w, h                           | size of the initial frame    |
//! | `width`       | w                              | from `size`                  |
//! | `height`      | h                              | from `size`                  |
//! | `offset`      | x, y                           | configured default offset    |
//! | `tint`        | r, g, b, a or `#RRGGBB[AA]`    | opaque white                 |
//! | `flip`        | `NONE`, `HORIZONTAL`, `VERTICAL` | none                       |

use glam::Vec2;
use log::debug;
use serde_json::Value;

use crate::components::sprite::{Flip, Sprite};
use crate::error::{Result, SpriteError};
use crate::properties::Properties;
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::tilesheet::SharedTileSheet;
use crate::resources::tilesheetstore::TileSheetStore;

/// Namespace a sprite definition must carry.
pub const SPRITE_NAMESPACE: &str = "sprite";

impl Sprite {
    /// Create a sprite from the properties namespace at `url`
    /// (`path.ext#ns/ns/.../ns`).
    pub fn from_url(url: &str, store: &TileSheetStore, config: &SpriteConfig) -> Result<Sprite> {
        let properties = Properties::load(url)?;
        Self::from_properties(&properties, store, config)
    }

    /// Create a sprite from an in-memory `sprite` namespace.
    pub fn from_properties(
        properties: &Properties,
        store: &TileSheetStore,
        config: &SpriteConfig,
    ) -> Result<Sprite> {
        check_namespace(properties)?;
        let sheet_id = properties
            .get_str("tileSheet")
            .ok_or(SpriteError::MissingProperty("tileSheet"))?;
        let sheet = store
            .get(sheet_id)
            .ok_or_else(|| SpriteError::TileSheetNotFound(sheet_id.to_string()))?;
        Self::from_properties_with_sheet(properties, sheet, config)
    }

    /// Create a sprite from a `sprite` namespace, drawing from `sheet`
    /// regardless of any `tileSheet` key.
    pub fn from_properties_with_sheet(
        properties: &Properties,
        sheet: SharedTileSheet,
        config: &SpriteConfig,
    ) -> Result<Sprite> {
        check_namespace(properties)?;
        let mut sprite = Sprite::create(properties.id(), sheet, config);
        load_sprite_properties(&mut sprite, properties)?;
        debug!(
            "Loaded sprite '{}' from tile sheet '{}'",
            sprite.id(),
            sprite.tile_sheet().id()
        );
        Ok(sprite)
    }
}

fn check_namespace(properties: &Properties) -> Result<()> {
    if properties.namespace() != SPRITE_NAMESPACE {
        return Err(SpriteError::WrongNamespace {
            expected: SPRITE_NAMESPACE,
            found: properties.namespace().to_string(),
        });
    }
    Ok(())
}

fn invalid(key: &str, value: impl ToString) -> SpriteError {
    SpriteError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn load_sprite_properties(sprite: &mut Sprite, properties: &Properties) -> Result<()> {
    if let Some(tile) = properties.get_rect("defaultTile")? {
        sprite.set_default_tile(tile);
    }

    // Strip selection is validated here; later staleness is tolerated at draw.
    let frame = properties.get_i64("frame")?.unwrap_or(0);
    let frame = usize::try_from(frame).map_err(|_| invalid("frame", frame))?;
    match properties.values.get("strip") {
        None => {}
        Some(Value::String(strip_id)) => sprite.select_strip_frame_by_id(strip_id, frame)?,
        Some(_) => {
            let index = properties.get_i64("strip")?.unwrap_or(0);
            let strip = usize::try_from(index).map_err(|_| invalid("strip", index))?;
            let sheet = sprite.tile_sheet().clone();
            if sheet.strip_frame(strip, frame).is_none() {
                return Err(match sheet.strip_frame_count(strip) {
                    Some(_) => SpriteError::FrameOutOfRange { strip, frame },
                    None => SpriteError::StripNotFound(strip.to_string()),
                });
            }
            let strip = i32::try_from(strip).map_err(|_| invalid("strip", strip))?;
            let frame = i32::try_from(frame).map_err(|_| invalid("frame", frame))?;
            sprite.select_strip_frame(strip, frame);
        }
    }

    let size = match properties.get_vec2("size")? {
        Some(size) => size,
        None => {
            let frame = sprite.current_frame();
            Vec2::new(frame.width.abs(), frame.height.abs())
        }
    };
    sprite.set_size(size);
    if let Some(width) = properties.get_f32("width")? {
        sprite.set_width(width);
    }
    if let Some(height) = properties.get_f32("height")? {
        sprite.set_height(height);
    }

    if let Some(offset) = properties.get_vec2("offset")? {
        sprite.set_offset(offset);
    }

    if let Some(tint) = properties.get_color("tint")? {
        sprite.set_tint(tint);
    }

    if let Some(text) = properties.get_str("flip") {
        let flip = Flip::parse(text).ok_or_else(|| invalid("flip", text))?;
        sprite.set_flip(flip);
    } else if properties.exists("flip") {
        return Err(invalid("flip", &properties.values["flip"]));
    }

    Ok(())
}
