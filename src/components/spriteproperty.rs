//! Animation properties of a [`Sprite`].
//!
//! Nine channels are addressable by a generic animation driver. Each has a
//! fixed numeric id, a name and a component count:
//!
//! | id | name                     | data        |
//! |----|--------------------------|-------------|
//! | 0  | `ANIMATE_SIZE`           | w, h        |
//! | 1  | `ANIMATE_SIZE_WIDTH`     | w           |
//! | 2  | `ANIMATE_SIZE_HEIGHT`    | h           |
//! | 3  | `ANIMATE_OFFSET`         | x, y        |
//! | 4  | `ANIMATE_OFFSET_X`       | x           |
//! | 5  | `ANIMATE_OFFSET_Y`       | y           |
//! | 6  | `ANIMATE_FRAME_INDEX`    | strip, frame|
//! | 7  | `ANIMATE_FRAME_SPECIFIC` | x, y, w, h  |
//! | 8  | `ANIMATE_TINT`           | r, g, b, a  |
//!
//! Writing a frame channel also selects that frame mode. Frame indices blend
//! as floats and are rounded to the nearest integer.

use glam::{Vec2, Vec4};

use crate::animation::{AnimationTarget, AnimationValue, PropertyId, blend};
use crate::components::sprite::Sprite;
use crate::error::{Result, SpriteError};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SpriteProperty {
    Size = 0,
    SizeWidth = 1,
    SizeHeight = 2,
    Offset = 3,
    OffsetX = 4,
    OffsetY = 5,
    FrameIndex = 6,
    FrameSpecific = 7,
    Tint = 8,
}

impl SpriteProperty {
    pub const ALL: [SpriteProperty; 9] = [
        SpriteProperty::Size,
        SpriteProperty::SizeWidth,
        SpriteProperty::SizeHeight,
        SpriteProperty::Offset,
        SpriteProperty::OffsetX,
        SpriteProperty::OffsetY,
        SpriteProperty::FrameIndex,
        SpriteProperty::FrameSpecific,
        SpriteProperty::Tint,
    ];

    pub fn id(self) -> PropertyId {
        self as PropertyId
    }

    pub fn name(self) -> &'static str {
        match self {
            SpriteProperty::Size => "ANIMATE_SIZE",
            SpriteProperty::SizeWidth => "ANIMATE_SIZE_WIDTH",
            SpriteProperty::SizeHeight => "ANIMATE_SIZE_HEIGHT",
            SpriteProperty::Offset => "ANIMATE_OFFSET",
            SpriteProperty::OffsetX => "ANIMATE_OFFSET_X",
            SpriteProperty::OffsetY => "ANIMATE_OFFSET_Y",
            SpriteProperty::FrameIndex => "ANIMATE_FRAME_INDEX",
            SpriteProperty::FrameSpecific => "ANIMATE_FRAME_SPECIFIC",
            SpriteProperty::Tint => "ANIMATE_TINT",
        }
    }

    pub fn from_name(name: &str) -> Option<SpriteProperty> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn component_count(self) -> usize {
        match self {
            SpriteProperty::SizeWidth
            | SpriteProperty::SizeHeight
            | SpriteProperty::OffsetX
            | SpriteProperty::OffsetY => 1,
            SpriteProperty::Size | SpriteProperty::Offset | SpriteProperty::FrameIndex => 2,
            SpriteProperty::FrameSpecific | SpriteProperty::Tint => 4,
        }
    }
}

impl TryFrom<PropertyId> for SpriteProperty {
    type Error = SpriteError;

    fn try_from(id: PropertyId) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == id)
            .ok_or(SpriteError::UnknownPropertyId(id))
    }
}

impl Sprite {
    /// Current value of a property; unused trailing slots are zero.
    fn property_components(&self, property: SpriteProperty) -> [f32; 4] {
        match property {
            SpriteProperty::Size => [self.width(), self.height(), 0.0, 0.0],
            SpriteProperty::SizeWidth => [self.width(), 0.0, 0.0, 0.0],
            SpriteProperty::SizeHeight => [self.height(), 0.0, 0.0, 0.0],
            SpriteProperty::Offset => [self.offset_x(), self.offset_y(), 0.0, 0.0],
            SpriteProperty::OffsetX => [self.offset_x(), 0.0, 0.0, 0.0],
            SpriteProperty::OffsetY => [self.offset_y(), 0.0, 0.0, 0.0],
            SpriteProperty::FrameIndex => [
                self.strip_index() as f32,
                self.strip_frame() as f32,
                0.0,
                0.0,
            ],
            SpriteProperty::FrameSpecific => self.current_frame().to_array(),
            SpriteProperty::Tint => self.tint().to_array(),
        }
    }
}

impl AnimationTarget for Sprite {
    fn property_id(&self, name: &str) -> Result<PropertyId> {
        SpriteProperty::from_name(name)
            .map(SpriteProperty::id)
            .ok_or_else(|| SpriteError::UnknownPropertyName(name.to_string()))
    }

    fn property_component_count(&self, id: PropertyId) -> Result<usize> {
        Ok(SpriteProperty::try_from(id)?.component_count())
    }

    fn property_value(&self, id: PropertyId, value: &mut AnimationValue) -> Result<()> {
        let property = SpriteProperty::try_from(id)?;
        let count = property.component_count();
        let current = self.property_components(property);
        value.resize(count);
        for (i, c) in current.iter().take(count).enumerate() {
            value.set(i, *c);
        }
        Ok(())
    }

    fn set_property_value(
        &mut self,
        id: PropertyId,
        value: &AnimationValue,
        blend_weight: f32,
    ) -> Result<()> {
        let property = SpriteProperty::try_from(id)?;
        let count = property.component_count();
        if value.len() < count {
            return Err(SpriteError::ComponentCount {
                property: property.name().to_string(),
                expected: count,
                actual: value.len(),
            });
        }

        let current = self.property_components(property);
        let mut v = current;
        for (i, c) in v.iter_mut().take(count).enumerate() {
            *c = blend(*c, value.get(i), blend_weight);
        }
        // Frame writes switch the frame source; writing back what is
        // already reported must not.
        if v == current {
            return Ok(());
        }

        match property {
            SpriteProperty::Size => self.set_size(Vec2::new(v[0], v[1])),
            SpriteProperty::SizeWidth => self.set_width(v[0]),
            SpriteProperty::SizeHeight => self.set_height(v[0]),
            SpriteProperty::Offset => self.set_offset(Vec2::new(v[0], v[1])),
            SpriteProperty::OffsetX => self.set_offset_x(v[0]),
            SpriteProperty::OffsetY => self.set_offset_y(v[0]),
            SpriteProperty::FrameIndex => {
                self.select_strip_frame(v[0].round() as i32, v[1].round() as i32)
            }
            SpriteProperty::FrameSpecific => self.select_specific_frame(Rect::from(v)),
            SpriteProperty::Tint => self.set_tint(Vec4::from(v)),
        }
        Ok(())
    }
}
