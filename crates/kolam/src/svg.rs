//! SVG export and import.
//!
//! Three entry points:
//!
//! - [`export`] writes a pattern (or a prefix of its construction steps)
//!   as an SVG document carrying the pattern's metadata.
//! - [`parse_svg`] reads such a document back with quick-xml and svgtypes.
//!   Coordinates are written with Rust's shortest round-trip formatting, so
//!   the parsed paths are bit-for-bit the exported ones.
//! - [`import_svg`] accepts any SVG through usvg (CSS, shapes, transforms
//!   resolved) and wraps its paths as freehand geometry for analysis.
//!
//! [`load_svg`] picks between the two readers by looking for the metadata.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};
use tracing::{debug, warn};
use usvg::tiny_skia_path::PathSegment;

use crate::error::SvgError;
use crate::geometry::{BoundingBox, Path, Point, Segment};
use crate::grid::make_grid;
use crate::patterns::{Pattern, Style};
use crate::sequence::sequence;

const ATTR_ID: &str = "data-kolam-id";
const ATTR_STYLE: &str = "data-kolam-style";
const ATTR_ROWS: &str = "data-grid-rows";
const ATTR_COLS: &str = "data-grid-cols";
const ATTR_SPACING: &str = "data-grid-spacing";

/// Stroke colour pairs. Paths alternate between the two colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    #[default]
    NeonPurple,
    NeonBlue,
    NeonOrange,
    NeonGreen,
}

impl Palette {
    pub fn all() -> &'static [Palette] {
        &[Palette::NeonPurple, Palette::NeonBlue, Palette::NeonOrange, Palette::NeonGreen]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Palette::NeonPurple => "neon-purple",
            Palette::NeonBlue => "neon-blue",
            Palette::NeonOrange => "neon-orange",
            Palette::NeonGreen => "neon-green",
        }
    }

    pub fn from_name(name: &str) -> Option<Palette> {
        Palette::all().iter().copied().find(|p| p.name() == name.to_lowercase())
    }

    pub fn colors(&self) -> [&'static str; 2] {
        match self {
            Palette::NeonPurple => ["#8B5CF6", "#EC4899"],
            Palette::NeonBlue => ["#06B6D4", "#3B82F6"],
            Palette::NeonOrange => ["#F97316", "#EC4899"],
            Palette::NeonGreen => ["#10B981", "#06B6D4"],
        }
    }
}

impl std::fmt::Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Presentation settings. None of these affect the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub palette: Palette,
    pub stroke_width: f64,
    /// Margin around the pattern's bounding box, in pattern units.
    pub padding: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { palette: Palette::default(), stroke_width: 2.0, padding: 10.0 }
    }
}

/// Serialize `pattern` as SVG.
///
/// With `step_prefix = Some(n)` only the segments of the first `n`
/// construction steps are written (all of them if `n` exceeds the step
/// count). The viewBox always frames the whole pattern so successive
/// prefixes line up as animation frames.
pub fn export(pattern: &Pattern, step_prefix: Option<usize>, options: &ExportOptions) -> String {
    let included = included_segments(pattern, step_prefix);

    let frame = view_box(pattern, options);
    let grid = pattern.grid();

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" {ATTR_ID}="{}" {ATTR_STYLE}="{}" {ATTR_ROWS}="{}" {ATTR_COLS}="{}" {ATTR_SPACING}="{}">
"#,
        frame.min.x,
        frame.min.y,
        frame.width(),
        frame.height(),
        quick_xml::escape::escape(pattern.id()),
        pattern.style(),
        grid.rows(),
        grid.cols(),
        grid.spacing(),
    ));

    let colors = options.palette.colors();
    let mut written = 0usize;
    for (p, path) in pattern.paths().iter().enumerate() {
        let color = colors[p % colors.len()];
        for (start, end) in runs(&included[p]) {
            let whole = start == 0 && end == path.len();
            let d = path_data(&path.segments()[start..end], whole && path.is_closed());
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
                d, color, options.stroke_width
            ));
            written += 1;
        }
    }

    svg.push_str("</svg>\n");
    debug!(id = pattern.id(), ?step_prefix, elements = written, "exported SVG");
    svg
}

/// Per path, which segments the export includes.
fn included_segments(pattern: &Pattern, step_prefix: Option<usize>) -> Vec<Vec<bool>> {
    let Some(n) = step_prefix else {
        return pattern.paths().iter().map(|path| vec![true; path.len()]).collect();
    };
    let mut included: Vec<Vec<bool>> = pattern.paths().iter().map(|path| vec![false; path.len()]).collect();
    for step in sequence(pattern).iter().take(n) {
        for at in &step.segment_refs {
            included[at.path][at.segment] = true;
        }
    }
    included
}

/// Maximal runs of `true` as half-open ranges.
fn runs(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &on) in mask.iter().enumerate() {
        match (on, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, mask.len()));
    }
    runs
}

/// `d` attribute for a contiguous run of segments.
fn path_data(segments: &[Segment], close: bool) -> String {
    let Some(first) = segments.first() else {
        return String::new();
    };
    let start = first.from();
    let mut d = format!("M {} {}", start.x, start.y);
    for segment in segments {
        match *segment {
            Segment::Line { to, .. } => d.push_str(&format!(" L {} {}", to.x, to.y)),
            Segment::QuadraticBezier { control, to, .. } => {
                d.push_str(&format!(" Q {} {} {} {}", control.x, control.y, to.x, to.y))
            }
            Segment::CubicBezier { c1, c2, to, .. } => d.push_str(&format!(
                " C {} {} {} {} {} {}",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            )),
        }
    }
    if close {
        d.push_str(" Z");
    }
    d
}

/// Read a document written by [`export`].
///
/// # Errors
/// - [`SvgError::BadAttribute`] if the root lacks the kolam metadata or a
///   value does not parse
/// - [`SvgError::PathData`] for malformed `d` attributes
/// - [`SvgError::Geometry`] for an invalid grid
pub fn parse_svg(svg_content: &str) -> Result<Pattern, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut header: Option<Header> = None;
    let mut paths = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.name().as_ref() {
                b"svg" if header.is_none() => header = Some(Header::read(e)?),
                b"path" => {
                    if let Some(d) = attribute(e, "d")? {
                        read_path_data(&d, &mut paths)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let header = header.ok_or(SvgError::BadAttribute { name: ATTR_ID, value: String::new() })?;
    let grid = make_grid(header.rows, header.cols, header.spacing)?;
    debug!(id = %header.id, paths = paths.len(), "parsed kolam SVG");
    Ok(Pattern::new(header.id, grid, paths, header.style)?)
}

/// Metadata stored on the root element.
struct Header {
    id: String,
    style: Style,
    rows: usize,
    cols: usize,
    spacing: f64,
}

impl Header {
    fn read(e: &BytesStart) -> Result<Self, SvgError> {
        let required = |name: &'static str| -> Result<String, SvgError> {
            attribute(e, name)?.ok_or(SvgError::BadAttribute { name, value: String::new() })
        };
        let style_name = required(ATTR_STYLE)?;
        let style = Style::from_name(&style_name)
            .ok_or(SvgError::BadAttribute { name: ATTR_STYLE, value: style_name })?;

        Ok(Self {
            id: required(ATTR_ID)?,
            style,
            rows: parse_value(ATTR_ROWS, required(ATTR_ROWS)?)?,
            cols: parse_value(ATTR_COLS, required(ATTR_COLS)?)?,
            spacing: parse_value(ATTR_SPACING, required(ATTR_SPACING)?)?,
        })
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, SvgError> {
    value.trim().parse().map_err(|_| SvgError::BadAttribute { name, value })
}

/// Unescaped value of attribute `name`, if present.
fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>, SvgError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Append the subpaths of one `d` attribute to `paths`.
///
/// Each `M` starts a new path; `Z` closes the current one.
fn read_path_data(d: &str, paths: &mut Vec<Path>) -> Result<(), SvgError> {
    let mut builder = SubpathBuilder::default();
    for segment in SimplifyingPathParser::from(d) {
        match segment? {
            SimplePathSegment::MoveTo { x, y } => builder.move_to(Point::new(x, y), paths),
            SimplePathSegment::LineTo { x, y } => {
                let from = builder.cursor;
                builder.push(Segment::line(from, Point::new(x, y)))?;
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let from = builder.cursor;
                builder.push(Segment::quadratic(from, Point::new(x1, y1), Point::new(x, y)))?;
            }
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                let from = builder.cursor;
                builder.push(Segment::cubic(from, Point::new(x1, y1), Point::new(x2, y2), Point::new(x, y)))?;
            }
            SimplePathSegment::ClosePath => builder.close(paths)?,
        }
    }
    builder.finish(paths);
    Ok(())
}

/// Tracks the pen while turning path commands into [`Path`]s.
#[derive(Default)]
struct SubpathBuilder {
    current: Path,
    cursor: Point,
    start: Point,
}

impl SubpathBuilder {
    fn move_to(&mut self, to: Point, paths: &mut Vec<Path>) {
        self.finish(paths);
        self.cursor = to;
        self.start = to;
    }

    fn push(&mut self, segment: Segment) -> Result<(), SvgError> {
        self.cursor = segment.to();
        self.current.push(segment)?;
        Ok(())
    }

    fn close(&mut self, paths: &mut Vec<Path>) -> Result<(), SvgError> {
        let path = std::mem::take(&mut self.current);
        if !path.is_empty() {
            paths.push(path.close_path()?);
        }
        self.cursor = self.start;
        Ok(())
    }

    fn finish(&mut self, paths: &mut Vec<Path>) {
        let path = std::mem::take(&mut self.current);
        if !path.is_empty() {
            paths.push(path);
        }
    }
}

/// Import arbitrary SVG as freehand geometry.
///
/// The result has style [`Style::Kambi`] and a 1x1 grid whose spacing is
/// the larger side of the bounding box, so no lattice repeat is looked for.
///
/// # Errors
/// - [`SvgError::Usvg`] if usvg rejects the document
/// - [`SvgError::NoPaths`] if it contains no drawable paths
pub fn import_svg(svg_content: &str) -> Result<Pattern, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)?;

    let mut paths = Vec::new();
    // Root is a Group in usvg 0.45.
    collect_from_group(tree.root(), &mut paths)?;

    let Some(bounds) = paths.iter().filter_map(Path::bounding_box).reduce(|a, b| a.union(&b)) else {
        return Err(SvgError::NoPaths);
    };
    let side = bounds.width().max(bounds.height());
    let spacing = if side > 0.0 { side } else { 1.0 };
    let grid = make_grid(1, 1, spacing)?;

    warn!(paths = paths.len(), "SVG has no kolam metadata; importing as freehand geometry");
    Ok(Pattern::new("imported", grid, paths, Style::Kambi)?)
}

fn collect_from_group(group: &usvg::Group, paths: &mut Vec<Path>) -> Result<(), SvgError> {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => collect_from_group(group, paths)?,
            usvg::Node::Path(path) => collect_path(path, paths)?,
            // Text and images carry no stroke geometry.
            _ => {}
        }
    }
    Ok(())
}

/// Convert one usvg path, with its transform applied, into our paths.
fn collect_path(path: &usvg::Path, paths: &mut Vec<Path>) -> Result<(), SvgError> {
    let Some(data) = path.data().clone().transform(path.abs_transform()) else {
        return Ok(());
    };
    let at = |p: usvg::tiny_skia_path::Point| Point::new(f64::from(p.x), f64::from(p.y));

    let mut builder = SubpathBuilder::default();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => builder.move_to(at(p), paths),
            PathSegment::LineTo(p) => {
                let from = builder.cursor;
                builder.push(Segment::line(from, at(p)))?;
            }
            PathSegment::QuadTo(c, p) => {
                let from = builder.cursor;
                builder.push(Segment::quadratic(from, at(c), at(p)))?;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let from = builder.cursor;
                builder.push(Segment::cubic(from, at(c1), at(c2), at(p)))?;
            }
            PathSegment::Close => builder.close(paths)?,
        }
    }
    builder.finish(paths);
    Ok(())
}

/// Read either format: kolam metadata on the root selects [`parse_svg`],
/// anything else goes through [`import_svg`].
pub fn load_svg(svg_content: &str) -> Result<Pattern, SvgError> {
    if has_kolam_metadata(svg_content)? {
        parse_svg(svg_content)
    } else {
        import_svg(svg_content)
    }
}

/// True if the root `<svg>` element carries a kolam id.
fn has_kolam_metadata(svg_content: &str) -> Result<bool, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"svg" => {
                return Ok(attribute(e, ATTR_ID)?.is_some());
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
    }
}

/// Frame used by [`export`], exposed for callers laying out several exports.
pub fn view_box(pattern: &Pattern, options: &ExportOptions) -> BoundingBox {
    pattern
        .bounding_box()
        .unwrap_or_else(|| pattern.grid().extent())
        .expanded(options.padding.max(0.0))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{GenerateParams, generate};

    fn pattern(style: Style) -> Pattern {
        generate(&GenerateParams { style, grid: make_grid(3, 3, 20.0).unwrap(), iterations: 2, seed: 11 })
            .unwrap()
    }

    #[test]
    fn export_carries_metadata() {
        let p = pattern(Style::Pulli);
        let svg = export(&p, None, &ExportOptions::default());
        assert!(svg.contains(r#"data-kolam-id="pulli-3x3-20-i2-s11""#));
        assert!(svg.contains(r#"data-kolam-style="pulli""#));
        assert!(svg.contains(r#"data-grid-rows="3""#));
        assert!(svg.contains(r#"data-grid-spacing="20""#));
        assert!(svg.contains("viewBox="));
        assert_eq!(svg.matches("<path ").count(), p.paths().len());
    }

    #[test]
    fn every_style_round_trips_exactly() {
        for style in Style::all() {
            let p = pattern(*style);
            let back = parse_svg(&export(&p, None, &ExportOptions::default())).unwrap();
            assert_eq!(back, p, "{style} did not round-trip");
        }
    }

    #[test]
    fn awkward_coordinates_round_trip() {
        let a = Point::new(0.1 + 0.2, -1.0 / 3.0);
        let b = Point::new(1e-7, 123456.789);
        let c = Point::new(-0.0, 2.5e-3);
        let path = Path::from_segments([Segment::cubic(a, b, c, a)], true).unwrap();
        let p = Pattern::new("odd & <ends>", make_grid(1, 1, 7.25).unwrap(), vec![path], Style::Kambi).unwrap();
        let back = parse_svg(&export(&p, None, &ExportOptions::default())).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn step_prefix_writes_partial_strokes() {
        let p = pattern(Style::Sikku);
        assert!(p.segment_count() > 3);
        let svg = export(&p, Some(3), &ExportOptions::default());
        let back = parse_svg(&svg).unwrap();
        assert_eq!(back.paths().len(), 1);
        assert_eq!(back.paths()[0].len(), 3);
        assert!(!back.paths()[0].is_closed());
        assert!(!svg.contains(" Z"));

        let all = export(&p, Some(usize::MAX), &ExportOptions::default());
        assert_eq!(all, export(&p, None, &ExportOptions::default()));
    }

    #[test]
    fn empty_prefix_keeps_the_frame() {
        let p = pattern(Style::Padi);
        let svg = export(&p, Some(0), &ExportOptions::default());
        assert_eq!(svg.matches("<path ").count(), 0);
        let full = export(&p, None, &ExportOptions::default());
        let view = |s: &str| s.split("viewBox=").nth(1).map(|v| v.split('"').nth(1).map(String::from));
        assert_eq!(view(&svg), view(&full));
    }

    #[test]
    fn colors_alternate() {
        let p = pattern(Style::Pulli);
        let options = ExportOptions { palette: Palette::NeonGreen, stroke_width: 3.0, padding: 0.0 };
        let svg = export(&p, None, &options);
        let strokes: Vec<&str> = svg
            .lines()
            .filter(|l| l.contains("<path "))
            .filter_map(|l| l.split("stroke=\"").nth(1)?.split('"').next())
            .collect();
        assert_eq!(&strokes[..2], &["#10B981", "#06B6D4"]);
        assert!(svg.contains(r#"stroke-width="3""#));
    }

    #[test]
    fn palette_names() {
        for palette in Palette::all() {
            assert_eq!(Palette::from_name(palette.name()), Some(*palette));
        }
        assert_eq!(Palette::from_name("Neon-Blue"), Some(Palette::NeonBlue));
        assert_eq!(Palette::from_name("sepia"), None);
        assert_eq!(Palette::default(), Palette::NeonPurple);
    }

    #[test]
    fn missing_metadata_is_reported() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" data-kolam-id="x"><path d="M 0 0 L 1 1"/></svg>"#;
        assert!(matches!(
            parse_svg(svg),
            Err(SvgError::BadAttribute { name: "data-kolam-style", .. })
        ));
    }

    #[test]
    fn bad_grid_is_reported() {
        let svg = r#"<svg data-kolam-id="x" data-kolam-style="padi" data-grid-rows="0" data-grid-cols="3" data-grid-spacing="20"></svg>"#;
        assert!(matches!(parse_svg(svg), Err(SvgError::Geometry(_))));
        let svg = r#"<svg data-kolam-id="x" data-kolam-style="padi" data-grid-rows="two" data-grid-cols="3" data-grid-spacing="20"></svg>"#;
        assert!(matches!(parse_svg(svg), Err(SvgError::BadAttribute { name: "data-grid-rows", .. })));
    }

    #[test]
    fn relative_commands_are_resolved() {
        let svg = r#"<svg data-kolam-id="r" data-kolam-style="kambi" data-grid-rows="1" data-grid-cols="1" data-grid-spacing="10">
            <path d="m 1 1 l 4 0 l 0 4 z"/>
        </svg>"#;
        let p = parse_svg(svg).unwrap();
        assert_eq!(p.paths().len(), 1);
        let path = &p.paths()[0];
        assert!(path.is_closed());
        assert_eq!(path.len(), 3);
        assert_eq!(path.end(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn import_resolves_shapes() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <g transform="translate(10 0)">
                    <rect x="10" y="10" width="80" height="40"/>
                </g>
                <circle cx="50" cy="50" r="20"/>
            </svg>
        "#;
        let p = import_svg(svg).unwrap();
        assert_eq!(p.style(), Style::Kambi);
        assert_eq!(p.paths().len(), 2);
        assert!(p.paths().iter().all(Path::is_closed));
        let rect = p.paths()[0].bounding_box().unwrap();
        assert!((rect.min.x - 20.0).abs() < 1e-4);
        assert_eq!(p.grid().rows(), 1);
        assert!((p.grid().spacing() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn import_without_paths_fails() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"></svg>"#;
        assert!(matches!(import_svg(svg), Err(SvgError::NoPaths)));
    }

    #[test]
    fn load_picks_the_reader() {
        let p = pattern(Style::Kambi);
        let exported = export(&p, None, &ExportOptions::default());
        assert_eq!(load_svg(&exported).unwrap(), p);

        let plain = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><path d="M 1 1 L 9 9" stroke="black"/></svg>"#;
        let imported = load_svg(plain).unwrap();
        assert_eq!(imported.id(), "imported");
    }
}
