#![forbid(unsafe_code)]

//! Per-card visual transform.
//!
//! A [`CardTransform`] is the full set of animatable properties the stack
//! controller computes for each card from the scroll position: translation,
//! depth, scale, alpha, visibility, and the normalized stack progress `p`
//! that dimming is derived from.

/// The animatable property bundle for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    /// Horizontal translation in px.
    pub translation_x: f32,
    /// Vertical translation in px.
    pub translation_y: f32,
    /// Depth translation in px (shadow/elevation hint).
    pub translation_z: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Normalized position in the stack scroll, `[0, 1]`; drives dim.
    pub progress: f32,
    /// Whether the card is inside the visible window at all.
    pub visible: bool,
}

impl Default for CardTransform {
    fn default() -> Self {
        Self {
            translation_x: 0.0,
            translation_y: 0.0,
            translation_z: 0.0,
            scale: 1.0,
            alpha: 1.0,
            progress: 0.0,
            visible: false,
        }
    }
}

impl CardTransform {
    /// Linear blend between two transforms at `t` in `[0, 1]`.
    /// Visibility snaps to the target's value.
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            translation_x: mix(from.translation_x, to.translation_x),
            translation_y: mix(from.translation_y, to.translation_y),
            translation_z: mix(from.translation_z, to.translation_z),
            scale: mix(from.scale, to.scale),
            alpha: mix(from.alpha, to.alpha),
            progress: mix(from.progress, to.progress),
            visible: to.visible,
        }
    }

    /// Whether the geometric properties (not progress/visibility) differ
    /// enough from `other` to warrant an animation pass.
    pub fn differs_from(&self, other: &Self) -> bool {
        const EPS: f32 = 1e-3;
        (self.translation_x - other.translation_x).abs() > EPS
            || (self.translation_y - other.translation_y).abs() > EPS
            || (self.translation_z - other.translation_z).abs() > EPS
            || (self.scale - other.scale).abs() > EPS
            || (self.alpha - other.alpha).abs() > EPS
    }
}
