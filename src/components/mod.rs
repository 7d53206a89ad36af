//! ECS components for sprite entities.
//!
//! Submodules overview:
//! - [`sprite`] – 2D sprite drawing from a shared tile sheet
//! - [`spriteloader`] – sprite construction from property files
//! - [`spriteproperty`] – animatable sprite properties and the target impl
//! - [`spritegroup`] – sprites batched together on one tile sheet
//! - [`tint`] – RGBA color multiplier
//! - [`tween`] – animated interpolation of any animatable property

pub mod sprite;
pub mod spritegroup;
pub mod spriteloader;
pub mod spriteproperty;
pub mod tint;
pub mod tween;
