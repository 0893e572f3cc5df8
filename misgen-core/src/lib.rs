//! Misgen core library.
//!
//! Samples random graph instances for Maximum Independent Set solvers.
//!
//! # Samplers
//!
//! - [`KingGraphSampler`] keeps `⌊x·y·p⌋` points of an `x × y` lattice and
//!   joins every pair of points that are horizontal, vertical or diagonal
//!   neighbours.
//! - [`ErdosRenyiSampler`] draws a vertex count from an inclusive range and
//!   includes every vertex pair independently with probability `p`.
//!
//! Both hand back a [`Sample`] whose [`Instance`] is the solver-facing
//! vertex and edge table. Randomness is injected, so a seeded generator from
//! [`seeded_rng`] reproduces the same instance.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod erdos_renyi;
mod error;
mod instance;
mod king;
mod lattice;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod render;
mod sampler;

pub use crate::{
    erdos_renyi::ErdosRenyiSampler,
    error::{InstanceError, InstanceErrorCode, Result, SamplerError, SamplerErrorCode},
    instance::{
        Edge, EdgeId, Instance, InstanceStats, MAX_READ_VERTICES, Neighbour, Vertex, VertexId,
    },
    king::{KING_ADJACENCY_THRESHOLD, KingGraphSampler},
    lattice::{LatticePoint, lattice_distance},
    sampler::{GraphSampler, Sample, seeded_rng},
};
