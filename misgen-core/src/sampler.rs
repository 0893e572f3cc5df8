//! Shared sampling surface for the graph generators.

use core::fmt;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{Result, instance::Instance, lattice::LatticePoint};

/// A sampled graph together with the lattice cells its vertices occupy.
///
/// Vertex `i` of [`Sample::instance`] sits at `positions[i]` when positions
/// are present. Samplers without a spatial embedding return `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    positions: Option<Vec<LatticePoint>>,
    instance: Instance,
}

impl Sample {
    pub(crate) fn new(positions: Option<Vec<LatticePoint>>, instance: Instance) -> Self {
        Self {
            positions,
            instance,
        }
    }

    /// Returns the lattice position of every vertex, if the sampler embeds them.
    #[must_use]
    pub fn positions(&self) -> Option<&[LatticePoint]> {
        self.positions.as_deref()
    }

    /// Returns the sampled instance.
    #[must_use]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Splits the sample into its positions and instance.
    #[must_use]
    pub fn into_parts(self) -> (Option<Vec<LatticePoint>>, Instance) {
        (self.positions, self.instance)
    }
}

/// A random graph model that can produce [`Sample`]s.
///
/// The display form names the model and its parameters, e.g. `king_3_3_1.0`.
///
/// # Examples
/// ```
/// use misgen_core::{GraphSampler, KingGraphSampler, seeded_rng};
///
/// fn vertex_total(sampler: &impl GraphSampler, seeds: &[u64]) -> usize {
///     seeds
///         .iter()
///         .map(|&seed| {
///             sampler
///                 .generate(&mut seeded_rng(seed))
///                 .map(|sample| sample.instance().vertex_count())
///                 .unwrap_or(0)
///         })
///         .sum()
/// }
///
/// let sampler = KingGraphSampler::new(4, 4, 0.5)?;
/// assert_eq!(sampler.name(), "king_4_4_0.5");
/// assert_eq!(vertex_total(&sampler, &[1, 2, 3]), 24);
/// # Ok::<(), misgen_core::SamplerError>(())
/// ```
pub trait GraphSampler: fmt::Display {
    /// Draws one graph using `rng` as the only source of randomness.
    ///
    /// # Errors
    /// Returns [`crate::SamplerError`] when the sampled graph cannot be
    /// represented as an [`Instance`].
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sample>;

    /// Returns the model name with its parameters.
    fn name(&self) -> String {
        self.to_string()
    }
}

/// Builds the deterministic generator used for reproducible sampling.
///
/// # Examples
/// ```
/// use misgen_core::seeded_rng;
/// use rand::Rng;
///
/// let a: u64 = seeded_rng(7).r#gen();
/// let b: u64 = seeded_rng(7).r#gen();
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
