//! King-lattice sampler.
//!
//! Keeps a uniformly random subset of the cells of an `x × y` lattice and
//! joins every pair of kept cells that lie within [`KING_ADJACENCY_THRESHOLD`]
//! of each other, i.e. cells that are a king's move apart.

use core::fmt;
use std::collections::HashMap;

use rand::{Rng, seq::index};
use tracing::{debug, instrument};

use crate::{
    Result,
    error::{InstanceError, SamplerError, check_probability},
    instance::{Instance, VertexId},
    lattice::LatticePoint,
    sampler::{GraphSampler, Sample},
};

/// Distance below which two lattice points are adjacent.
///
/// Horizontal and vertical neighbours sit at distance 1, diagonal neighbours
/// at `√2`; the epsilon absorbs rounding in the diagonal case.
pub const KING_ADJACENCY_THRESHOLD: f64 = core::f64::consts::SQRT_2 + 1e-10;

/// Offsets that reach every king neighbour exactly once per unordered pair.
const FORWARD_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

/// Samples unit-disk graphs on a partially occupied king lattice.
///
/// # Examples
/// ```
/// use misgen_core::{GraphSampler, KingGraphSampler, seeded_rng};
///
/// let sampler = KingGraphSampler::new(3, 3, 1.0)?;
/// let sample = sampler.generate(&mut seeded_rng(42))?;
/// assert_eq!(sample.positions().map(<[_]>::len), Some(9));
/// assert_eq!(sample.instance().edge_count(), 20);
/// # Ok::<(), misgen_core::SamplerError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KingGraphSampler {
    x: u32,
    y: u32,
    probability: f64,
}

impl KingGraphSampler {
    /// Configures a sampler over an `x × y` lattice keeping each cell with
    /// density `probability`.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidProbability`] when `probability` is not
    /// a finite value in `[0, 1]` and [`SamplerError::LatticeTooLarge`] when
    /// the lattice cannot be indexed on this platform.
    pub fn new(x: u32, y: u32, probability: f64) -> Result<Self> {
        let probability = check_probability(probability)?;
        usize::try_from(u64::from(x) * u64::from(y))
            .map_err(|_| SamplerError::LatticeTooLarge { x, y })?;
        Ok(Self { x, y, probability })
    }

    /// Returns the lattice width.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Returns the lattice height.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the occupation density.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns the number of lattice cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        // Checked on construction.
        usize::try_from(u64::from(self.x) * u64::from(self.y)).unwrap_or(usize::MAX)
    }

    /// Returns `⌊x·y·p⌋`, the number of points every sample keeps.
    ///
    /// # Examples
    /// ```
    /// use misgen_core::KingGraphSampler;
    ///
    /// assert_eq!(KingGraphSampler::new(5, 3, 0.5)?.point_count(), 7);
    /// # Ok::<(), misgen_core::SamplerError>(())
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_arithmetic,
        reason = "the kept fraction of cells is a floored floating-point product"
    )]
    pub fn point_count(&self) -> usize {
        let cells = self.cell_count();
        // Truncation toward zero is the floor for non-negative products.
        let kept = (cells as f64 * self.probability) as usize;
        kept.min(cells)
    }

    fn sample_points<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<LatticePoint> {
        if self.x == 0 {
            return Vec::new();
        }
        index::sample(rng, self.cell_count(), self.point_count())
            .into_iter()
            .map(|cell| LatticePoint::from_grid_index(cell as u64, self.x))
            .collect()
    }
}

impl fmt::Display for KingGraphSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "king_{}_{}_{:?}", self.x, self.y, self.probability)
    }
}

impl GraphSampler for KingGraphSampler {
    #[instrument(
        level = "debug",
        skip_all,
        fields(x = self.x, y = self.y, probability = self.probability),
    )]
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sample> {
        let points = self.sample_points(rng);
        let edges = king_edges(&points)?;
        let instance = Instance::from_edges(points.len(), edges)?;
        debug!(
            points = points.len(),
            edges = instance.edge_count(),
            "sampled king graph"
        );
        Ok(Sample::new(Some(points), instance))
    }
}

/// Connects every pair of points that are a king's move apart.
///
/// Vertex `i` is `points[i]`. Each pair is reported once as `(lower, higher)`
/// and the list is sorted.
fn king_edges(points: &[LatticePoint]) -> Result<Vec<(VertexId, VertexId)>> {
    let occupied: HashMap<LatticePoint, VertexId> = points
        .iter()
        .enumerate()
        .map(|(vertex, point)| to_vertex_id(vertex).map(|id| (*point, id)))
        .collect::<Result<_>>()?;

    let mut edges = Vec::new();
    for (vertex, point) in points.iter().enumerate() {
        let vertex = to_vertex_id(vertex)?;
        for (dx, dy) in FORWARD_OFFSETS {
            let neighbour = point
                .x()
                .checked_add_signed(dx)
                .zip(point.y().checked_add_signed(dy))
                .map(|(x, y)| LatticePoint::new(x, y));
            let Some(other) = neighbour.and_then(|cell| occupied.get(&cell)) else {
                continue;
            };
            edges.push((vertex.min(*other), vertex.max(*other)));
        }
    }
    edges.sort_unstable();
    Ok(edges)
}

fn to_vertex_id(vertex: usize) -> Result<VertexId> {
    VertexId::try_from(vertex).map_err(|_| {
        SamplerError::from(InstanceError::TooManyElements {
            count: vertex.saturating_add(1),
        })
    })
}
