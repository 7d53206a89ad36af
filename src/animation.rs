//! Property-driven animation contract.
//!
//! Any object that can be animated by a generic driver implements
//! [`AnimationTarget`]. The driver resolves a property name to a numeric id
//! once, then reads and writes float components through that id every tick.
//! The target decides how many components a property has and how a new value
//! is blended into its current state.
//!
//! # Related
//!
//! - [`crate::components::sprite::Sprite`] – the sprite implementation
//! - [`crate::components::tween::PropertyTweens`] – a driver built on this trait

use smallvec::SmallVec;

use crate::error::Result;

/// Numeric property id as handed out by [`AnimationTarget::property_id`].
pub type PropertyId = i32;

/// A small vector of float components carried between a driver and a target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationValue {
    components: SmallVec<[f32; 4]>,
}

impl AnimationValue {
    /// Create a value with `count` zeroed components.
    pub fn with_components(count: usize) -> Self {
        let mut components = SmallVec::new();
        components.resize(count, 0.0);
        Self { components }
    }

    pub fn from_slice(values: &[f32]) -> Self {
        Self {
            components: SmallVec::from_slice(values),
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Resize to `count` components, zero-filling new ones.
    pub fn resize(&mut self, count: usize) {
        self.components.resize(count, 0.0);
    }

    pub fn get(&self, index: usize) -> f32 {
        self.components.get(index).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(c) = self.components.get_mut(index) {
            *c = value;
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.components
    }

    /// Component-wise linear interpolation from `self` to `other`.
    ///
    /// The result has as many components as the shorter of the two.
    pub fn lerp(&self, other: &AnimationValue, t: f32) -> AnimationValue {
        AnimationValue {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| blend(*a, *b, t))
                .collect(),
        }
    }
}

impl<const N: usize> From<[f32; N]> for AnimationValue {
    fn from(values: [f32; N]) -> Self {
        Self::from_slice(&values)
    }
}

/// Blend `incoming` into `current` by `weight`.
///
/// `0.0` keeps the current value, `1.0` replaces it. Weights outside that
/// range extrapolate.
pub fn blend(current: f32, incoming: f32, weight: f32) -> f32 {
    current + (incoming - current) * weight
}

/// Something a generic animation driver can animate by property id.
pub trait AnimationTarget {
    /// Resolve a property name to its numeric id.
    fn property_id(&self, name: &str) -> Result<PropertyId>;

    /// Number of float components the property carries.
    fn property_component_count(&self, id: PropertyId) -> Result<usize>;

    /// Copy the current value of the property into `value`, resizing it to
    /// the property's component count.
    fn property_value(&self, id: PropertyId, value: &mut AnimationValue) -> Result<()>;

    /// Blend `value` into the property with `blend_weight`.
    ///
    /// On error no state is modified.
    fn set_property_value(
        &mut self,
        id: PropertyId,
        value: &AnimationValue,
        blend_weight: f32,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_blend_endpoints() {
        assert!(approx_eq(blend(2.0, 10.0, 0.0), 2.0));
        assert!(approx_eq(blend(2.0, 10.0, 1.0), 10.0));
        assert!(approx_eq(blend(2.0, 10.0, 0.5), 6.0));
    }

    #[test]
    fn test_blend_extrapolates() {
        assert!(approx_eq(blend(0.0, 10.0, 1.5), 15.0));
        assert!(approx_eq(blend(0.0, 10.0, -0.5), -5.0));
    }

    #[test]
    fn test_with_components_is_zeroed() {
        let v = AnimationValue::with_components(3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_get_set_out_of_range_is_ignored() {
        let mut v = AnimationValue::from([1.0, 2.0]);
        v.set(5, 9.0);
        assert_eq!(v.as_slice(), &[1.0, 2.0]);
        assert!(approx_eq(v.get(5), 0.0));
    }

    #[test]
    fn test_resize_keeps_prefix() {
        let mut v = AnimationValue::from([1.0, 2.0, 3.0, 4.0]);
        v.resize(2);
        assert_eq!(v.as_slice(), &[1.0, 2.0]);
        v.resize(3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_lerp_componentwise() {
        let a = AnimationValue::from([0.0, 100.0]);
        let b = AnimationValue::from([100.0, 0.0]);
        let r = a.lerp(&b, 0.25);
        assert!(approx_eq(r.get(0), 25.0));
        assert!(approx_eq(r.get(1), 75.0));
    }
}
