//! Integer lattice coordinates and the Euclidean metric over them.

use core::fmt;

/// A cell of an `x × y` integer lattice.
///
/// # Examples
/// ```
/// use misgen_core::LatticePoint;
///
/// let point = LatticePoint::new(2, 1);
/// assert_eq!(point.x(), 2);
/// assert_eq!(point.y(), 1);
/// assert_eq!(point.to_string(), "(2, 1)");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LatticePoint {
    x: u32,
    y: u32,
}

impl LatticePoint {
    /// Creates a point at column `x` and row `y`.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Returns the column coordinate.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Returns the row coordinate.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Maps a row-major grid index onto a lattice of width `width`.
    ///
    /// Index `k` lands on `(k mod width, k div width)`, which is the order a
    /// `height × width` mesh is flattened in.
    pub(crate) fn from_grid_index(index: u64, width: u32) -> Self {
        let width = u64::from(width);
        // Both quotient and remainder are bounded by the lattice dimensions.
        let x = u32::try_from(index % width).unwrap_or(u32::MAX);
        let y = u32::try_from(index / width).unwrap_or(u32::MAX);
        Self { x, y }
    }

    /// Returns the coordinates as floating point values.
    #[must_use]
    pub fn as_f64(&self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Computes the Euclidean distance between two lattice points.
///
/// # Examples
///
/// ```
/// use misgen_core::{LatticePoint, lattice_distance};
///
/// let distance = lattice_distance(LatticePoint::new(0, 0), LatticePoint::new(3, 4));
/// assert!((distance - 5.0).abs() < 1e-12);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "Euclidean distance")]
pub fn lattice_distance(left: LatticePoint, right: LatticePoint) -> f64 {
    let dx = f64::from(left.x) - f64::from(right.x);
    let dy = f64::from(left.y) - f64::from(right.y);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0, 3, LatticePoint::new(0, 0))]
    #[case(2, 3, LatticePoint::new(2, 0))]
    #[case(3, 3, LatticePoint::new(0, 1))]
    #[case(8, 3, LatticePoint::new(2, 2))]
    #[case(5, 1, LatticePoint::new(0, 5))]
    fn from_grid_index_is_row_major(
        #[case] index: u64,
        #[case] width: u32,
        #[case] expected: LatticePoint,
    ) {
        assert_eq!(LatticePoint::from_grid_index(index, width), expected);
    }

    #[rstest]
    #[case(LatticePoint::new(1, 1), LatticePoint::new(1, 1), 0.0)]
    #[case(LatticePoint::new(1, 1), LatticePoint::new(2, 1), 1.0)]
    #[case(LatticePoint::new(1, 1), LatticePoint::new(0, 0), core::f64::consts::SQRT_2)]
    #[case(LatticePoint::new(0, 0), LatticePoint::new(2, 0), 2.0)]
    fn lattice_distance_is_euclidean(
        #[case] left: LatticePoint,
        #[case] right: LatticePoint,
        #[case] expected: f64,
    ) {
        assert!((lattice_distance(left, right) - expected).abs() < 1e-12);
        assert!((lattice_distance(right, left) - expected).abs() < 1e-12);
    }
}
