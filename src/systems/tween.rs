//! Tween animation systems.
//!
//! [`tween_sprite_properties`] advances every [`PropertyTweens`] attached to a
//! [`Sprite`] and writes the eased values through the
//! [`AnimationTarget`] contract. The driver never touches sprite fields
//! directly; [`apply_tweens`] works for any target.
//!
//! Each tween specifies start/end values, duration, easing function, loop
//! mode and blend weight. The systems read delta time from
//! [`WorldTime`](crate::resources::worldtime::WorldTime).

use bevy_ecs::prelude::*;
use log::warn;

use crate::animation::AnimationTarget;
use crate::components::sprite::Sprite;
use crate::components::tween::{Easing, LoopMode, PropertyTweens};
use crate::resources::worldtime::WorldTime;

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Advance tween time and handle looping/completion.
pub(crate) fn advance(
    time: &mut f32,
    duration: f32,
    forward: &mut bool,
    playing: &mut bool,
    mode: LoopMode,
    dt: f32,
) {
    let dir = if *forward { 1.0 } else { -1.0 };
    *time += dt * dir;

    let finished_forward = *forward && *time >= duration;
    let finished_backward = !*forward && *time <= 0.0;

    if finished_forward || finished_backward {
        match mode {
            LoopMode::Once => {
                *playing = false;
                *time = time.clamp(0.0, duration);
            }
            LoopMode::Loop => {
                *time = if finished_forward { 0.0 } else { duration };
            }
            LoopMode::PingPong => {
                *forward = !*forward;
                *time = time.clamp(0.0, duration);
            }
        }
    }
}

/// Advance every playing tween by `dt` and blend its value into `target`.
///
/// A tween the target rejects is stopped and logged.
pub fn apply_tweens(target: &mut impl AnimationTarget, tweens: &mut PropertyTweens, dt: f32) {
    for tw in tweens.tweens.iter_mut().filter(|tw| tw.playing) {
        let duration = tw.duration;
        let loop_mode = tw.loop_mode;
        let mut t = tw.time;
        let mut forward = tw.forward;
        let mut playing = tw.playing;
        advance(&mut t, duration, &mut forward, &mut playing, loop_mode, dt);
        tw.time = t;
        tw.forward = forward;
        tw.playing = playing;

        let progress = if duration > 0.0 { tw.time / duration } else { 1.0 };
        let value = tw.from.lerp(&tw.to, ease(tw.easing, progress));
        if let Err(e) = target.set_property_value(tw.property, &value, tw.blend_weight) {
            warn!("Stopping tween on property {}: {}", tw.property, e);
            tw.playing = false;
        }
    }
}

/// Animate sprite properties based on [`PropertyTweens`] components.
pub fn tween_sprite_properties(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Sprite, &mut PropertyTweens)>,
) {
    let dt = world_time.delta.max(0.0);
    for (mut sprite, mut tweens) in query.iter_mut() {
        apply_tweens(sprite.as_mut(), tweens.as_mut(), dt);
    }
}
