//! Rendering of sampled graphs with `plotters`.
//!
//! Edges are drawn first, then vertices on top. Node area and edge width
//! shrink with `1/√n` so large instances stay legible. Vertical coordinates
//! grow upwards, and both axes share one scale.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{Instance, LatticePoint, Sample};

/// Default vertex colour, `#6437FF`.
pub const DEFAULT_NODE_COLOR: RGBColor = RGBColor(0x64, 0x37, 0xFF);

/// Node area, in square points, of a single-vertex graph.
const NODE_AREA: f64 = 1225.0;
/// Edge width, in points, of a single-vertex graph.
const EDGE_WIDTH: f64 = 10.0;
/// Canvas side the point sizes are calibrated against.
const REFERENCE_SIDE: f64 = 480.0;
const PIXELS_PER_POINT: f64 = 100.0 / 72.0;

/// Errors raised while rendering a graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RenderError {
    /// The layout does not place every vertex exactly once.
    #[error("layout has {positions} positions but the graph has {vertices} vertices")]
    LayoutMismatch {
        /// Number of vertices in the graph.
        vertices: usize,
        /// Number of positions in the layout.
        positions: usize,
    },
    /// Per-vertex colours do not match the vertex count.
    #[error("{colors} colours were supplied for {vertices} vertices")]
    ColorCountMismatch {
        /// Number of vertices in the graph.
        vertices: usize,
        /// Number of colours supplied.
        colors: usize,
    },
    /// A colour string was not of the form `#RRGGBB`.
    #[error("invalid colour `{value}`; expected `#RRGGBB`")]
    InvalidColor {
        /// The rejected colour string.
        value: String,
    },
    /// The drawing backend failed.
    #[error("drawing backend failed: {message}")]
    Backend {
        /// Backend error description.
        message: String,
    },
}

fn backend_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Backend {
        message: err.to_string(),
    }
}

/// Parses a `#RRGGBB` colour string.
///
/// # Errors
/// Returns [`RenderError::InvalidColor`] for anything else.
///
/// # Examples
/// ```
/// use misgen_core::render::{DEFAULT_NODE_COLOR, parse_hex_color};
///
/// assert_eq!(parse_hex_color("#6437FF")?, DEFAULT_NODE_COLOR);
/// assert!(parse_hex_color("6437FF").is_err());
/// # Ok::<(), misgen_core::render::RenderError>(())
/// ```
pub fn parse_hex_color(value: &str) -> Result<RGBColor, RenderError> {
    let invalid = || RenderError::InvalidColor {
        value: value.to_owned(),
    };
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .ok_or_else(invalid)
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Vertex colouring for a rendered graph.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeColors {
    /// Every vertex uses the same colour.
    Uniform(RGBColor),
    /// Vertex `i` uses colour `i`.
    PerVertex(Vec<RGBColor>),
}

impl Default for NodeColors {
    fn default() -> Self {
        Self::Uniform(DEFAULT_NODE_COLOR)
    }
}

impl NodeColors {
    fn check(&self, vertices: usize) -> Result<(), RenderError> {
        match self {
            Self::PerVertex(colors) if colors.len() != vertices => {
                Err(RenderError::ColorCountMismatch {
                    vertices,
                    colors: colors.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn color(&self, vertex: usize) -> RGBColor {
        match self {
            Self::Uniform(color) => *color,
            Self::PerVertex(colors) => colors.get(vertex).copied().unwrap_or(DEFAULT_NODE_COLOR),
        }
    }
}

/// Planar coordinates for every vertex of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    positions: Vec<(f64, f64)>,
}

impl Layout {
    /// Places vertex `i` at lattice point `i`.
    #[must_use]
    pub fn from_points(points: &[LatticePoint]) -> Self {
        Self {
            positions: points.iter().map(LatticePoint::as_f64).collect(),
        }
    }

    /// Places `vertices` vertices evenly on the unit circle, starting at angle zero.
    ///
    /// # Examples
    /// ```
    /// use misgen_core::render::Layout;
    ///
    /// let layout = Layout::circular(4);
    /// let (x, y) = layout.positions()[1];
    /// assert!(x.abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "vertices are spaced by angle on the unit circle"
    )]
    pub fn circular(vertices: usize) -> Self {
        let step = std::f64::consts::TAU / vertices.max(1) as f64;
        Self {
            positions: (0..vertices)
                .map(|index| {
                    let angle = step * index as f64;
                    (angle.cos(), angle.sin())
                })
                .collect(),
        }
    }

    /// Uses the sample's lattice positions, or a circular layout when it has none.
    #[must_use]
    pub fn for_sample(sample: &Sample) -> Self {
        sample.positions().map_or_else(
            || Self::circular(sample.instance().vertex_count()),
            Self::from_points,
        )
    }

    /// Returns the vertex coordinates.
    #[must_use]
    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    /// Returns the number of placed vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns whether the layout places no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Canvas settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Side length of the square canvas in pixels.
    pub size: u32,
    /// Canvas background.
    pub background: RGBColor,
    /// Edge colour.
    pub edge_color: RGBColor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 800,
            background: WHITE,
            edge_color: BLACK,
        }
    }
}

/// Pixel sizes derived from the vertex count and canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Scale {
    node_radius: u32,
    edge_width: u32,
}

impl Scale {
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_arithmetic,
        reason = "marker sizes shrink with the square root of the vertex count"
    )]
    fn new(vertices: usize, size: u32) -> Self {
        let shrink = (vertices.max(1) as f64).sqrt();
        let pixels_per_point = PIXELS_PER_POINT * f64::from(size) / REFERENCE_SIDE;
        let diameter = (NODE_AREA / shrink).sqrt() * pixels_per_point;
        let width = EDGE_WIDTH / shrink * pixels_per_point;
        Self {
            node_radius: ((diameter / 2.0).round() as u32).max(1),
            edge_width: (width.round() as u32).max(1),
        }
    }
}

/// Maps layout coordinates onto the canvas with equal aspect.
struct Projection {
    min: (f64, f64),
    scale: f64,
    offset: (f64, f64),
    size: f64,
}

impl Projection {
    #[expect(clippy::float_arithmetic, reason = "canvas geometry")]
    fn new(positions: &[(f64, f64)], size: u32, margin: u32) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in positions {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if positions.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let size = f64::from(size);
        let drawable = (size - 2.0 * f64::from(margin)).max(1.0);
        let span = (max_x - min_x).max(max_y - min_y);
        let scale = if span > 0.0 { drawable / span } else { 0.0 };
        // Centre the shorter axis, and a degenerate layout on the canvas.
        let offset = (
            (size - (max_x - min_x) * scale) / 2.0,
            (size - (max_y - min_y) * scale) / 2.0,
        );
        Self {
            min: (min_x, min_y),
            scale,
            offset,
            size,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::float_arithmetic,
        reason = "projected coordinates are rounded to canvas pixels"
    )]
    fn project(&self, (x, y): (f64, f64)) -> (i32, i32) {
        let px = self.offset.0 + (x - self.min.0) * self.scale;
        let py = self.size - (self.offset.1 + (y - self.min.1) * self.scale);
        (px.round() as i32, py.round() as i32)
    }
}

fn draw_graph<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    instance: &Instance,
    layout: &Layout,
    colors: &NodeColors,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    root.fill(&options.background).map_err(backend_error)?;
    let vertices = instance.vertex_count();
    if vertices == 0 {
        return Ok(());
    }

    let scale = Scale::new(vertices, options.size);
    let projection = Projection::new(layout.positions(), options.size, scale.node_radius * 2);
    let pixels: Vec<(i32, i32)> = layout
        .positions()
        .iter()
        .map(|&position| projection.project(position))
        .collect();

    let edge_style = options.edge_color.stroke_width(scale.edge_width);
    for edge in instance.edges() {
        let (Some(&from), Some(&to)) = (pixels.get(edge.u() as usize), pixels.get(edge.v() as usize))
        else {
            continue;
        };
        root.draw(&PathElement::new(vec![from, to], edge_style))
            .map_err(backend_error)?;
    }

    for (vertex, &pixel) in pixels.iter().enumerate() {
        let fill = colors.color(vertex).filled();
        root.draw(&Circle::new(pixel, scale.node_radius, fill))
            .map_err(backend_error)?;
    }
    Ok(())
}

fn check_inputs(
    instance: &Instance,
    layout: &Layout,
    colors: &NodeColors,
) -> Result<(), RenderError> {
    let vertices = instance.vertex_count();
    if layout.len() != vertices {
        return Err(RenderError::LayoutMismatch {
            vertices,
            positions: layout.len(),
        });
    }
    colors.check(vertices)
}

/// Renders `instance` to an image file.
///
/// A `.svg` extension selects the SVG backend; anything else is encoded as
/// a bitmap according to its extension.
///
/// # Errors
/// Returns [`RenderError::LayoutMismatch`] or
/// [`RenderError::ColorCountMismatch`] when the inputs disagree with the
/// vertex count and [`RenderError::Backend`] when drawing or encoding fails.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn render_to_file(
    instance: &Instance,
    layout: &Layout,
    colors: &NodeColors,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    check_inputs(instance, layout, colors)?;
    let dimensions = (options.size, options.size);
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, dimensions).into_drawing_area();
        draw_graph(&root, instance, layout, colors, options)?;
        root.present().map_err(backend_error)?;
    } else {
        let root = BitMapBackend::new(path, dimensions).into_drawing_area();
        draw_graph(&root, instance, layout, colors, options)?;
        root.present().map_err(backend_error)?;
    }

    debug!(vertices = instance.vertex_count(), "rendered graph");
    Ok(())
}

/// Renders `instance` to an in-memory SVG document.
///
/// # Errors
/// Returns the same errors as [`render_to_file`].
///
/// # Examples
/// ```
/// use misgen_core::Instance;
/// use misgen_core::render::{Layout, NodeColors, RenderOptions, render_to_svg};
///
/// let instance = Instance::from_edges(3, [(0, 1), (1, 2)])?;
/// let svg = render_to_svg(
///     &instance,
///     &Layout::circular(3),
///     &NodeColors::default(),
///     &RenderOptions::default(),
/// )?;
/// assert_eq!(svg.matches("<circle").count(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_to_svg(
    instance: &Instance,
    layout: &Layout,
    colors: &NodeColors,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    check_inputs(instance, layout, colors)?;
    let mut document = String::new();
    {
        let root = SVGBackend::with_string(&mut document, (options.size, options.size))
            .into_drawing_area();
        draw_graph(&root, instance, layout, colors, options)?;
        root.present().map_err(backend_error)?;
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{GraphSampler, KingGraphSampler, seeded_rng};

    #[rstest]
    #[case("#000000", RGBColor(0, 0, 0))]
    #[case("#ffFF10", RGBColor(255, 255, 16))]
    fn parse_hex_color_accepts_rgb(#[case] raw: &str, #[case] expected: RGBColor) {
        assert_eq!(parse_hex_color(raw).expect("colour must parse"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("#12345")]
    #[case("#1234567")]
    #[case("#gg0000")]
    #[case("#ééé")]
    fn parse_hex_color_rejects_malformed(#[case] raw: &str) {
        let err = parse_hex_color(raw).expect_err("colour must be rejected");
        assert!(matches!(err, RenderError::InvalidColor { .. }));
    }

    #[rstest]
    #[case(1, 800, 41, 23)]
    #[case(100, 800, 13, 2)]
    #[case(10_000, 480, 2, 1)]
    fn scale_shrinks_with_vertex_count(
        #[case] vertices: usize,
        #[case] size: u32,
        #[case] radius: u32,
        #[case] width: u32,
    ) {
        let scale = Scale::new(vertices, size);
        assert_eq!(scale.node_radius, radius);
        assert_eq!(scale.edge_width, width);
    }

    #[test]
    fn projection_flips_y_and_keeps_aspect() {
        let positions = [(0.0, 0.0), (2.0, 1.0)];
        let projection = Projection::new(&positions, 100, 10);
        assert_eq!(projection.project((0.0, 0.0)), (10, 70));
        assert_eq!(projection.project((2.0, 1.0)), (90, 30));
    }

    #[test]
    fn single_vertex_is_centred() {
        let projection = Projection::new(&[(3.0, 4.0)], 100, 10);
        assert_eq!(projection.project((3.0, 4.0)), (50, 50));
    }

    #[test]
    fn svg_contains_every_vertex_and_edge() {
        let sampler = KingGraphSampler::new(3, 3, 1.0).expect("parameters are valid");
        let sample = sampler
            .generate(&mut seeded_rng(9))
            .expect("sampling must succeed");
        let svg = render_to_svg(
            sample.instance(),
            &Layout::for_sample(&sample),
            &NodeColors::default(),
            &RenderOptions::default(),
        )
        .expect("rendering must succeed");
        assert_eq!(svg.matches("<circle").count(), 9);
        assert_eq!(svg.matches("<polyline").count(), 20);
    }

    #[test]
    fn empty_graph_renders_blank_canvas() {
        let svg = render_to_svg(
            &Instance::default(),
            &Layout::circular(0),
            &NodeColors::default(),
            &RenderOptions::default(),
        )
        .expect("rendering must succeed");
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn colour_count_must_match_vertices() {
        let instance = Instance::from_edges(2, [(0, 1)]).expect("instance must build");
        let err = render_to_svg(
            &instance,
            &Layout::circular(2),
            &NodeColors::PerVertex(vec![BLACK]),
            &RenderOptions::default(),
        )
        .expect_err("colour count is wrong");
        assert!(matches!(
            err,
            RenderError::ColorCountMismatch {
                vertices: 2,
                colors: 1
            }
        ));
    }

    #[test]
    fn layout_must_match_vertices() {
        let instance = Instance::from_edges(2, []).expect("instance must build");
        let err = render_to_svg(
            &instance,
            &Layout::circular(3),
            &NodeColors::default(),
            &RenderOptions::default(),
        )
        .expect_err("layout is wrong");
        assert!(matches!(
            err,
            RenderError::LayoutMismatch {
                vertices: 2,
                positions: 3
            }
        ));
    }
}
