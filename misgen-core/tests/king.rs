//! Property tests for the king-lattice sampler.

use std::collections::HashSet;

use misgen_core::{
    GraphSampler, KING_ADJACENCY_THRESHOLD, KingGraphSampler, LatticePoint, Sample, VertexId,
    lattice_distance, seeded_rng,
};
use proptest::prelude::*;
use rstest::rstest;

fn sample(x: u32, y: u32, probability: f64, seed: u64) -> Sample {
    KingGraphSampler::new(x, y, probability)
        .expect("parameters are valid")
        .generate(&mut seeded_rng(seed))
        .expect("sampling must succeed")
}

fn vertex(index: usize) -> VertexId {
    VertexId::try_from(index).expect("index fits a vertex id")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sampled_point_count_is_floor_of_density(
        x in 0_u32..12,
        y in 0_u32..12,
        probability in 0.0_f64..=1.0,
        seed in any::<u64>(),
    ) {
        let sample = sample(x, y, probability, seed);
        let expected = (f64::from(x * y) * probability).floor() as usize;
        let positions = sample.positions().expect("king samples carry positions");
        prop_assert_eq!(positions.len(), expected);
        prop_assert_eq!(sample.instance().vertex_count(), expected);
    }

    #[test]
    fn sampled_points_are_distinct_and_in_bounds(
        x in 1_u32..12,
        y in 1_u32..12,
        probability in 0.0_f64..=1.0,
        seed in any::<u64>(),
    ) {
        let sample = sample(x, y, probability, seed);
        let positions = sample.positions().expect("king samples carry positions");
        let distinct: HashSet<LatticePoint> = positions.iter().copied().collect();
        prop_assert_eq!(distinct.len(), positions.len());
        for point in positions {
            prop_assert!(point.x() < x && point.y() < y, "{} outside {}x{}", point, x, y);
        }
    }

    #[test]
    fn adjacency_matches_distance_threshold(
        x in 1_u32..9,
        y in 1_u32..9,
        probability in 0.0_f64..=1.0,
        seed in any::<u64>(),
    ) {
        let sample = sample(x, y, probability, seed);
        let positions = sample.positions().expect("king samples carry positions");
        let instance = sample.instance();
        for (i, a) in positions.iter().enumerate() {
            prop_assert!(!instance.contains_edge(vertex(i), vertex(i)));
            for (j, b) in positions.iter().enumerate().skip(i + 1) {
                let near = lattice_distance(*a, *b) < KING_ADJACENCY_THRESHOLD;
                prop_assert_eq!(instance.contains_edge(vertex(i), vertex(j)), near);
                prop_assert_eq!(instance.contains_edge(vertex(j), vertex(i)), near);
            }
        }
        for edge in instance.edges() {
            prop_assert!(edge.u() < edge.v());
        }
    }

    #[test]
    fn fixed_seed_is_deterministic(
        x in 1_u32..10,
        y in 1_u32..10,
        probability in 0.0_f64..=1.0,
        seed in any::<u64>(),
    ) {
        prop_assert_eq!(sample(x, y, probability, seed), sample(x, y, probability, seed));
    }
}

#[rstest]
#[case::corner(LatticePoint::new(0, 0), 3)]
#[case::edge(LatticePoint::new(1, 0), 5)]
#[case::centre(LatticePoint::new(1, 1), 8)]
#[case::opposite_corner(LatticePoint::new(2, 2), 3)]
fn full_three_by_three_degrees(#[case] point: LatticePoint, #[case] expected: usize) {
    let sample = sample(3, 3, 1.0, 2024);
    let positions = sample.positions().expect("king samples carry positions");
    let index = positions
        .iter()
        .position(|candidate| *candidate == point)
        .expect("full lattice covers every cell");
    assert_eq!(sample.instance().degree(vertex(index)), Some(expected));
}

#[test]
fn full_lattice_edge_count_matches_king_graph() {
    // (x-1)y + x(y-1) orthogonal plus 2(x-1)(y-1) diagonal edges.
    let sample = sample(6, 4, 1.0, 1);
    assert_eq!(sample.instance().edge_count(), 5 * 4 + 6 * 3 + 2 * 5 * 3);
}
