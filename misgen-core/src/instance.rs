//! Solver-facing representation of a sampled graph.
//!
//! An [`Instance`] stores a vertex table and an edge table. Every vertex keeps
//! the list of its neighbours together with the identifier of the connecting
//! edge so solvers can walk incident edges without a lookup. Instances are
//! persisted as a plain edge list: a header line whose first token is the
//! vertex count, followed by one `u v` pair per edge.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use tracing::{debug, instrument};

use crate::error::InstanceError;

/// Identifier of a vertex within an [`Instance`].
pub type VertexId = u32;

/// Identifier of an edge within an [`Instance`].
pub type EdgeId = u32;

/// Largest vertex count [`Instance::read_from`] accepts from a file header.
pub const MAX_READ_VERTICES: usize = 1 << 24;

/// An adjacent vertex and the edge that reaches it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Neighbour {
    vertex: VertexId,
    edge: EdgeId,
}

impl Neighbour {
    /// Returns the adjacent vertex.
    #[must_use]
    pub const fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Returns the connecting edge.
    #[must_use]
    pub const fn edge(&self) -> EdgeId {
        self.edge
    }
}

/// A vertex and its incident edges, in edge insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vertex {
    id: VertexId,
    neighbours: Vec<Neighbour>,
}

impl Vertex {
    /// Returns the vertex identifier.
    #[must_use]
    pub const fn id(&self) -> VertexId {
        self.id
    }

    /// Returns the neighbours of the vertex.
    #[must_use]
    pub fn neighbours(&self) -> &[Neighbour] {
        &self.neighbours
    }

    /// Returns the number of incident edges.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }
}

/// An undirected edge stored with `u < v`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    id: EdgeId,
    u: VertexId,
    v: VertexId,
}

impl Edge {
    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the lower endpoint.
    #[must_use]
    pub const fn u(&self) -> VertexId {
        self.u
    }

    /// Returns the higher endpoint.
    #[must_use]
    pub const fn v(&self) -> VertexId {
        self.v
    }

    /// Returns both endpoints as a `(u, v)` pair.
    #[must_use]
    pub const fn endpoints(&self) -> (VertexId, VertexId) {
        (self.u, self.v)
    }
}

/// Degree summary of an [`Instance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// Smallest vertex degree, or zero for an empty instance.
    pub min_degree: usize,
    /// Largest vertex degree, or zero for an empty instance.
    pub max_degree: usize,
    /// Mean vertex degree, or zero for an empty instance.
    pub mean_degree: f64,
}

/// An undirected, loop-free graph ready to hand to an MIS solver.
///
/// # Examples
/// ```
/// use misgen_core::Instance;
///
/// let instance = Instance::from_edges(3, [(0, 1), (1, 2), (2, 1), (2, 2)])?;
/// assert_eq!(instance.vertex_count(), 3);
/// assert_eq!(instance.edge_count(), 2);
/// assert_eq!(instance.degree(1), Some(2));
/// assert!(instance.contains_edge(2, 1));
///
/// let mut buffer = Vec::new();
/// instance.write_to(&mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "3 2\n0 1\n1 2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Instance {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Instance {
    /// Builds an instance over `vertex_count` vertices from an edge list.
    ///
    /// Self loops are dropped and repeated edges, in either orientation, are
    /// kept once. Edge identifiers follow the order of first appearance.
    ///
    /// # Errors
    /// Returns [`InstanceError::VertexOutOfRange`] when an endpoint is not
    /// below `vertex_count` and [`InstanceError::TooManyElements`] when the
    /// vertex or edge count cannot be addressed by a `u32` identifier.
    /// Returns [`InstanceError::AllocationFailed`] when the vertex table
    /// cannot be allocated.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self, InstanceError>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let last_id = VertexId::try_from(vertex_count)
            .map_err(|_| InstanceError::TooManyElements {
                count: vertex_count,
            })?;
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(vertex_count)
            .map_err(|_| InstanceError::AllocationFailed {
                vertices: vertex_count,
            })?;
        vertices.extend((0..last_id).map(|id| Vertex {
            id,
            neighbours: Vec::new(),
        }));
        let mut instance = Self {
            vertices,
            edges: Vec::new(),
        };

        let mut seen = HashSet::new();
        for (a, b) in edges {
            instance.check_vertex(a)?;
            instance.check_vertex(b)?;
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                instance.add_edge(key.0, key.1)?;
            }
        }

        debug!(
            vertices = instance.vertex_count(),
            edges = instance.edge_count(),
            "built instance"
        );
        Ok(instance)
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), InstanceError> {
        if (vertex as usize) < self.vertices.len() {
            Ok(())
        } else {
            Err(InstanceError::VertexOutOfRange {
                vertex: u64::from(vertex),
                vertex_count: self.vertices.len(),
            })
        }
    }

    fn add_edge(&mut self, u: VertexId, v: VertexId) -> Result<(), InstanceError> {
        let id = EdgeId::try_from(self.edges.len()).map_err(|_| {
            InstanceError::TooManyElements {
                count: self.edges.len().saturating_add(1),
            }
        })?;
        self.edges.push(Edge { id, u, v });
        if let Some(vertex) = self.vertices.get_mut(u as usize) {
            vertex.neighbours.push(Neighbour { vertex: v, edge: id });
        }
        if let Some(vertex) = self.vertices.get_mut(v as usize) {
            vertex.neighbours.push(Neighbour { vertex: u, edge: id });
        }
        Ok(())
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex with identifier `id`.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id as usize)
    }

    /// Returns the edge with identifier `id`.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize)
    }

    /// Returns every vertex in identifier order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns every edge in identifier order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the neighbours of `id`, or `None` when the vertex does not exist.
    #[must_use]
    pub fn neighbours(&self, id: VertexId) -> Option<&[Neighbour]> {
        self.vertex(id).map(Vertex::neighbours)
    }

    /// Returns the degree of `id`, or `None` when the vertex does not exist.
    #[must_use]
    pub fn degree(&self, id: VertexId) -> Option<usize> {
        self.vertex(id).map(Vertex::degree)
    }

    /// Reports whether `u` and `v` are joined by an edge.
    #[must_use]
    pub fn contains_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.neighbours(u)
            .is_some_and(|neighbours| neighbours.iter().any(|n| n.vertex == v))
    }

    /// Summarises vertex degrees.
    ///
    /// # Examples
    /// ```
    /// use misgen_core::Instance;
    ///
    /// let stats = Instance::from_edges(4, [(0, 1), (0, 2), (0, 3)])?.stats();
    /// assert_eq!(stats.min_degree, 1);
    /// assert_eq!(stats.max_degree, 3);
    /// assert!((stats.mean_degree - 1.5).abs() < 1e-12);
    /// # Ok::<(), misgen_core::InstanceError>(())
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "mean degree is reported as a float"
    )]
    pub fn stats(&self) -> InstanceStats {
        let degrees = self.vertices.iter().map(Vertex::degree);
        let min_degree = degrees.clone().min().unwrap_or(0);
        let max_degree = degrees.max().unwrap_or(0);
        let mean_degree = if self.vertices.is_empty() {
            0.0
        } else {
            // Every edge contributes to two degrees.
            (2 * self.edges.len()) as f64 / self.vertices.len() as f64
        };
        InstanceStats {
            vertices: self.vertices.len(),
            edges: self.edges.len(),
            min_degree,
            max_degree,
            mean_degree,
        }
    }

    /// Writes the instance as a vertex-count header followed by one edge per line.
    ///
    /// # Errors
    /// Returns [`InstanceError::Io`] when the writer fails.
    pub fn write_to(&self, mut writer: impl Write) -> Result<(), InstanceError> {
        writeln!(writer, "{} {}", self.vertices.len(), self.edges.len())?;
        for edge in &self.edges {
            writeln!(writer, "{} {}", edge.u, edge.v)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads an instance written by [`Instance::write_to`].
    ///
    /// Only the first token of the header is interpreted, and blank lines are
    /// skipped. Headers declaring more than [`MAX_READ_VERTICES`] vertices are
    /// rejected before any storage is allocated.
    ///
    /// # Errors
    /// Returns [`InstanceError::MissingHeader`] for input without a header,
    /// [`InstanceError::MalformedLine`] when a line does not parse,
    /// [`InstanceError::VertexOutOfRange`] when an edge references an unknown
    /// vertex, [`InstanceError::VertexCountTooLarge`] when the header exceeds
    /// [`MAX_READ_VERTICES`] and [`InstanceError::Io`] when the reader fails.
    ///
    /// # Examples
    /// ```
    /// use misgen_core::Instance;
    ///
    /// let instance = Instance::read_from("4\n0 1\n\n2 3\n".as_bytes())?;
    /// assert_eq!(instance.vertex_count(), 4);
    /// assert_eq!(instance.edge_count(), 2);
    /// # Ok::<(), misgen_core::InstanceError>(())
    /// ```
    #[instrument(level = "debug", skip(reader))]
    pub fn read_from(reader: impl BufRead) -> Result<Self, InstanceError> {
        let mut vertex_count = None;
        let mut edges = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };

            let Some(count) = vertex_count else {
                let parsed = first
                    .parse::<usize>()
                    .map_err(|_| malformed(number, &line))?;
                if parsed > MAX_READ_VERTICES {
                    return Err(InstanceError::VertexCountTooLarge {
                        declared: parsed,
                        max: MAX_READ_VERTICES,
                    });
                }
                vertex_count = Some(parsed);
                continue;
            };

            let (Some(second), None) = (tokens.next(), tokens.next()) else {
                return Err(malformed(number, &line));
            };
            let u = parse_vertex(first, count).map_err(|err| err.or_malformed(number, &line))?;
            let v = parse_vertex(second, count).map_err(|err| err.or_malformed(number, &line))?;
            edges.push((u, v));
        }

        let vertex_count = vertex_count.ok_or(InstanceError::MissingHeader)?;
        Self::from_edges(vertex_count, edges)
    }
}

fn malformed(line: usize, content: &str) -> InstanceError {
    InstanceError::MalformedLine {
        line,
        content: content.to_owned(),
    }
}

enum VertexParseError {
    NotANumber,
    OutOfRange(InstanceError),
}

impl VertexParseError {
    fn or_malformed(self, line: usize, content: &str) -> InstanceError {
        match self {
            Self::NotANumber => malformed(line, content),
            Self::OutOfRange(err) => err,
        }
    }
}

fn parse_vertex(token: &str, vertex_count: usize) -> Result<VertexId, VertexParseError> {
    let raw = token
        .parse::<u64>()
        .map_err(|_| VertexParseError::NotANumber)?;
    let out_of_range = || {
        VertexParseError::OutOfRange(InstanceError::VertexOutOfRange {
            vertex: raw,
            vertex_count,
        })
    };
    let vertex = VertexId::try_from(raw).map_err(|_| out_of_range())?;
    if (vertex as usize) < vertex_count {
        Ok(vertex)
    } else {
        Err(out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::error::InstanceErrorCode;

    #[fixture]
    fn path() -> Instance {
        Instance::from_edges(4, [(0, 1), (1, 2), (2, 3)]).expect("path must build")
    }

    #[rstest]
    fn neighbours_record_connecting_edges(path: Instance) {
        let neighbours = path.neighbours(1).expect("vertex 1 exists");
        let pairs: Vec<(VertexId, EdgeId)> =
            neighbours.iter().map(|n| (n.vertex(), n.edge())).collect();
        assert_eq!(pairs, vec![(0, 0), (2, 1)]);
        assert_eq!(path.vertex(1).map(Vertex::id), Some(1));
    }

    #[rstest]
    fn edges_are_normalised(path: Instance) {
        let reversed = Instance::from_edges(4, [(1, 0), (2, 1), (3, 2)]).expect("must build");
        assert_eq!(reversed, path);
        assert_eq!(path.edge(2).map(Edge::endpoints), Some((2, 3)));
    }

    #[rstest]
    fn missing_elements_yield_none(path: Instance) {
        assert!(path.vertex(4).is_none());
        assert!(path.edge(3).is_none());
        assert!(path.degree(9).is_none());
        assert!(!path.contains_edge(9, 0));
        assert!(!path.contains_edge(0, 2));
    }

    #[test]
    fn from_edges_rejects_unknown_vertices() {
        let err = Instance::from_edges(2, [(0, 2)]).expect_err("vertex 2 is out of range");
        assert!(matches!(
            err,
            InstanceError::VertexOutOfRange {
                vertex: 2,
                vertex_count: 2
            }
        ));
    }

    #[test]
    fn stats_of_empty_instance_are_zero() {
        let stats = Instance::default().stats();
        assert_eq!(stats.vertices, 0);
        assert_eq!(stats.max_degree, 0);
        assert_eq!(stats.mean_degree, 0.0);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank_lines("\n  \n")]
    fn read_from_requires_header(#[case] input: &str) {
        let err = Instance::read_from(input.as_bytes()).expect_err("header is required");
        assert!(matches!(err, InstanceError::MissingHeader));
    }

    #[rstest]
    #[case::bad_header("four\n", 1)]
    #[case::short_edge("3\n0\n", 2)]
    #[case::long_edge("3\n0 1 2\n", 2)]
    #[case::bad_vertex("3\n0 1\nx 1\n", 3)]
    #[case::negative_vertex("3\n-1 1\n", 2)]
    fn read_from_reports_malformed_lines(#[case] input: &str, #[case] expected_line: usize) {
        let err = Instance::read_from(input.as_bytes()).expect_err("input is malformed");
        match err {
            InstanceError::MalformedLine { line, .. } => assert_eq!(line, expected_line),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_from_rejects_out_of_range_vertices() {
        let err = Instance::read_from("2\n0 5\n".as_bytes()).expect_err("vertex 5 is unknown");
        assert!(matches!(
            err,
            InstanceError::VertexOutOfRange {
                vertex: 5,
                vertex_count: 2
            }
        ));
    }

    #[rstest]
    #[case::beyond_limit(MAX_READ_VERTICES + 1)]
    #[case::beyond_identifiers(4_000_000_000)]
    #[case::huge(usize::MAX)]
    fn read_from_rejects_oversized_headers(#[case] declared: usize) {
        let input = format!("{declared}\n0 1\n");
        let err = Instance::read_from(input.as_bytes()).expect_err("header is too large");
        assert_eq!(err.code(), InstanceErrorCode::VertexCountTooLarge);
        assert!(matches!(
            err,
            InstanceError::VertexCountTooLarge { declared: got, max: MAX_READ_VERTICES }
                if got == declared
        ));
    }

    #[test]
    fn read_from_ignores_extra_header_tokens() {
        let instance = Instance::read_from("3 1 trailing\n0 2\n".as_bytes()).expect("must parse");
        assert_eq!(instance.vertex_count(), 3);
        assert!(instance.contains_edge(0, 2));
    }
}
