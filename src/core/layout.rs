//! Wheel geometry and winner resolution.
//!
//! The pointer is fixed at the 0° reference ("east") while the wheel face
//! rotates clockwise by `rotation` degrees. Slice `i` spans
//! `[i * w, (i + 1) * w)` on the unrotated face, `w = 360 / n`.
//!
//! Everything here is a pure function of the item count and an angle, so the
//! engine, the renderer and the tests all agree on which slice is where.

/// Full turn in degrees
pub const FULL_TURN: f64 = 360.0;

/// Derived wheel layout for `item_count` slices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelLayout {
    item_count: usize,
}

/// Label size tier for a wheel with many slices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelScale {
    Large,
    Medium,
    Small,
}

impl WheelLayout {
    pub fn new(item_count: usize) -> Self {
        Self { item_count }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Angular width of one slice. An empty wheel is treated as one slice
    /// so the width never divides by zero.
    pub fn slice_width(&self) -> f64 {
        FULL_TURN / self.item_count.max(1) as f64
    }

    /// `(start, end)` angles of slice `index` on the unrotated face
    pub fn slice_bounds(&self, index: usize) -> (f64, f64) {
        let w = self.slice_width();
        (index as f64 * w, (index + 1) as f64 * w)
    }

    /// Angle through the middle of slice `index`, where its label sits
    pub fn label_angle(&self, index: usize) -> f64 {
        let (start, end) = self.slice_bounds(index);
        (start + end) / 2.0
    }

    pub fn label_scale(&self) -> LabelScale {
        match self.item_count {
            n if n > 15 => LabelScale::Small,
            n if n > 8 => LabelScale::Medium,
            _ => LabelScale::Large,
        }
    }

    /// Index of the slice under the pointer after rotating by `rotation`.
    ///
    /// `None` for an empty wheel.
    pub fn resolve_winner(&self, rotation: f64) -> Option<usize> {
        resolve_winner_index(self.item_count, rotation)
    }
}

/// Fold any angle into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let angle = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if angle >= FULL_TURN { 0.0 } else { angle }
}

/// Slice index under a fixed pointer at 0° after the face turned `rotation`.
///
/// The face point under the pointer sits at `(360 - normalized) mod 360` on
/// the unrotated face. The floor is clamped so rounding at an exact upper
/// boundary can never produce `item_count`.
pub fn resolve_winner_index(item_count: usize, rotation: f64) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let normalized = normalize_angle(rotation);
    let winning_angle = (FULL_TURN - normalized) % FULL_TURN;
    let width = FULL_TURN / item_count as f64;
    let index = (winning_angle / width).floor();
    let index = if index.is_finite() && index > 0.0 { index as usize } else { 0 };
    Some(index.min(item_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_width_and_bounds() {
        let layout = WheelLayout::new(6);
        assert_eq!(layout.slice_width(), 60.0);
        assert_eq!(layout.slice_bounds(0), (0.0, 60.0));
        assert_eq!(layout.slice_bounds(5), (300.0, 360.0));
        assert_eq!(layout.label_angle(1), 90.0);

        assert_eq!(WheelLayout::new(0).slice_width(), 360.0);
        assert_eq!(WheelLayout::new(1).slice_bounds(0), (0.0, 360.0));
    }

    #[test]
    fn test_resolve_winner_reference_case() {
        // 733° -> 13° normalized -> 347° under pointer -> slice 5 of 6
        assert_eq!(resolve_winner_index(6, 733.0), Some(5));
    }

    #[test]
    fn test_resolve_winner_exact_boundaries() {
        assert_eq!(resolve_winner_index(6, 0.0), Some(0));
        assert_eq!(resolve_winner_index(6, 720.0), Some(0));
        // face turned by exactly one slice: pointer sits on the start of the last slice
        assert_eq!(resolve_winner_index(6, 60.0), Some(5));
        assert_eq!(resolve_winner_index(2, 180.0), Some(1));
        assert_eq!(resolve_winner_index(2, 179.0), Some(1));
        assert_eq!(resolve_winner_index(2, 181.0), Some(0));
    }

    #[test]
    fn test_resolve_winner_is_deterministic() {
        let layout = WheelLayout::new(7);
        let first = layout.resolve_winner(12345.678);
        for _ in 0..10 {
            assert_eq!(layout.resolve_winner(12345.678), first);
        }
    }

    #[test]
    fn test_resolve_winner_always_in_range() {
        for n in 1..40 {
            let mut r = -1000.0;
            while r < 2000.0 {
                let idx = resolve_winner_index(n, r).unwrap();
                assert!(idx < n, "n={} r={} idx={}", n, r, idx);
                r += 0.37;
            }
        }
        assert_eq!(resolve_winner_index(0, 10.0), None);
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(733.0), 13.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        let tiny = normalize_angle(-1e-14);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_label_scale_tiers() {
        assert_eq!(WheelLayout::new(6).label_scale(), LabelScale::Large);
        assert_eq!(WheelLayout::new(8).label_scale(), LabelScale::Large);
        assert_eq!(WheelLayout::new(9).label_scale(), LabelScale::Medium);
        assert_eq!(WheelLayout::new(16).label_scale(), LabelScale::Small);
    }
}
