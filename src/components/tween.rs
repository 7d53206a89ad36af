//! Tween components for animated property interpolation.
//!
//! A [`TweenProperty`] animates one property of an
//! [`AnimationTarget`](crate::animation::AnimationTarget) between two values.
//! It addresses the property by numeric id only, so the same tween drives
//! sprites or any other target. [`PropertyTweens`] holds every tween of an
//! entity; their results are blended in order with each tween's
//! `blend_weight`.
//!
//! See [`crate::systems::tween`] for the update systems.

use bevy_ecs::prelude::Component;

use crate::animation::{AnimationTarget, AnimationValue, PropertyId};
use crate::error::{Result, SpriteError};

/// Determines how a tween behaves when it reaches the end.
#[derive(Copy, Clone, Debug)]
pub enum LoopMode {
    /// Play once and stop.
    Once,
    /// Restart from the beginning when finished.
    Loop,
    /// Reverse direction when reaching either end.
    PingPong,
}

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

/// Animates one property between two values.
#[derive(Clone, Debug)]
pub struct TweenProperty {
    /// Property id on the target.
    pub property: PropertyId,
    /// Starting value.
    pub from: AnimationValue,
    /// Ending value.
    pub to: AnimationValue,
    /// Duration in seconds.
    pub duration: f32,
    /// Easing function to use.
    pub easing: Easing,
    /// Behavior when the tween ends.
    pub loop_mode: LoopMode,
    /// Whether the tween is currently playing.
    pub playing: bool,
    /// Current time within the tween.
    pub time: f32,
    /// Direction of playback (true = forward).
    pub forward: bool,
    /// Weight the interpolated value is blended into the target with.
    pub blend_weight: f32,
}

impl TweenProperty {
    pub fn new(
        property: PropertyId,
        from: impl Into<AnimationValue>,
        to: impl Into<AnimationValue>,
        duration: f32,
    ) -> Self {
        TweenProperty {
            property,
            from: from.into(),
            to: to.into(),
            duration,
            easing: Easing::Linear,
            loop_mode: LoopMode::Once,
            playing: true,
            time: 0.0,
            forward: true,
            blend_weight: 1.0,
        }
    }

    /// Resolve `name` on `target` once and check both values carry enough
    /// components for it.
    pub fn for_target(
        target: &impl AnimationTarget,
        name: &str,
        from: impl Into<AnimationValue>,
        to: impl Into<AnimationValue>,
        duration: f32,
    ) -> Result<Self> {
        let property = target.property_id(name)?;
        let expected = target.property_component_count(property)?;
        let tween = Self::new(property, from, to, duration);
        let actual = tween.from.len().min(tween.to.len());
        if actual < expected {
            return Err(SpriteError::ComponentCount {
                property: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(tween)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }
    pub fn with_backwards(mut self) -> Self {
        self.time = self.duration;
        self.forward = false;
        self
    }
    pub fn with_blend_weight(mut self, blend_weight: f32) -> Self {
        self.blend_weight = blend_weight;
        self
    }
}

/// All property tweens running on an entity, applied in order.
#[derive(Component, Clone, Debug, Default)]
pub struct PropertyTweens {
    pub tweens: Vec<TweenProperty>,
}

impl PropertyTweens {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, tween: TweenProperty) -> Self {
        self.tweens.push(tween);
        self
    }
    pub fn push(&mut self, tween: TweenProperty) {
        self.tweens.push(tween);
    }
    /// True when no tween is still playing.
    pub fn finished(&self) -> bool {
        self.tweens.iter().all(|t| !t.playing)
    }
}
