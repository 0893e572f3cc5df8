//! Erdos-Renyi sampler.

use core::fmt;

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    Result,
    error::{SamplerError, check_probability},
    instance::{Instance, VertexId},
    sampler::{GraphSampler, Sample},
};

/// Samples `G(n, p)` graphs with `n` drawn uniformly from `[min_n, max_n]`.
///
/// The model has no spatial embedding, so samples carry no positions.
///
/// # Examples
/// ```
/// use misgen_core::{ErdosRenyiSampler, GraphSampler, seeded_rng};
///
/// let sampler = ErdosRenyiSampler::new(5, 5, 1.0)?;
/// let sample = sampler.generate(&mut seeded_rng(1))?;
/// assert!(sample.positions().is_none());
/// assert_eq!(sample.instance().edge_count(), 10);
/// assert_eq!(sampler.to_string(), "ER_5_5_1.0");
/// # Ok::<(), misgen_core::SamplerError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErdosRenyiSampler {
    min_n: u32,
    max_n: u32,
    probability: f64,
}

impl ErdosRenyiSampler {
    /// Configures a sampler over the inclusive vertex range `[min_n, max_n]`
    /// with independent edge probability `probability`.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidVertexRange`] when `min_n > max_n` and
    /// [`SamplerError::InvalidProbability`] when `probability` is not a finite
    /// value in `[0, 1]`.
    pub fn new(min_n: u32, max_n: u32, probability: f64) -> Result<Self> {
        if min_n > max_n {
            return Err(SamplerError::InvalidVertexRange { min_n, max_n });
        }
        let probability = check_probability(probability)?;
        Ok(Self {
            min_n,
            max_n,
            probability,
        })
    }

    /// Returns the smallest vertex count.
    #[must_use]
    pub const fn min_n(&self) -> u32 {
        self.min_n
    }

    /// Returns the largest vertex count.
    #[must_use]
    pub const fn max_n(&self) -> u32 {
        self.max_n
    }

    /// Returns the edge probability.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl fmt::Display for ErdosRenyiSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ER_{}_{}_{:?}", self.min_n, self.max_n, self.probability)
    }
}

impl GraphSampler for ErdosRenyiSampler {
    #[instrument(
        level = "debug",
        skip_all,
        fields(min_n = self.min_n, max_n = self.max_n, probability = self.probability),
    )]
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sample> {
        let vertex_count: VertexId = rng.gen_range(self.min_n..=self.max_n);
        let mut edges = Vec::new();
        for u in 0..vertex_count {
            for v in (u + 1)..vertex_count {
                if rng.gen_bool(self.probability) {
                    edges.push((u, v));
                }
            }
        }

        let instance = Instance::from_edges(vertex_count as usize, edges)?;
        debug!(
            vertices = vertex_count,
            edges = instance.edge_count(),
            "sampled erdos-renyi graph"
        );
        Ok(Sample::new(None, instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::sampler::seeded_rng;

    #[test]
    fn new_rejects_empty_range() {
        let err = ErdosRenyiSampler::new(6, 2, 0.5).expect_err("range is empty");
        assert!(matches!(
            err,
            SamplerError::InvalidVertexRange { min_n: 6, max_n: 2 }
        ));
    }

    #[test]
    fn new_rejects_invalid_probability() {
        let err = ErdosRenyiSampler::new(1, 2, 2.0).expect_err("probability is invalid");
        assert!(matches!(err, SamplerError::InvalidProbability { .. }));
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, 21)]
    fn extreme_probabilities_give_empty_or_complete_graphs(
        #[case] probability: f64,
        #[case] expected_edges: usize,
    ) {
        let sampler = ErdosRenyiSampler::new(7, 7, probability).expect("parameters are valid");
        let sample = sampler
            .generate(&mut seeded_rng(5))
            .expect("sampling must succeed");
        assert_eq!(sample.instance().vertex_count(), 7);
        assert_eq!(sample.instance().edge_count(), expected_edges);
    }

    #[rstest]
    #[case(0)]
    #[case(17)]
    #[case(123_456)]
    fn vertex_count_stays_in_range(#[case] seed: u64) {
        let sampler = ErdosRenyiSampler::new(3, 9, 0.4).expect("parameters are valid");
        let sample = sampler
            .generate(&mut seeded_rng(seed))
            .expect("sampling must succeed");
        let count = sample.instance().vertex_count();
        assert!((3..=9).contains(&count), "vertex count {count} out of range");
    }

    #[test]
    fn zero_vertices_are_allowed() {
        let sampler = ErdosRenyiSampler::new(0, 0, 0.5).expect("parameters are valid");
        let sample = sampler
            .generate(&mut seeded_rng(0))
            .expect("sampling must succeed");
        assert_eq!(sample.instance().vertex_count(), 0);
    }
}
