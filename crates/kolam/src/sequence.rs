//! Construction steps for progressive drawing.
//!
//! A step sequence is a pure function of the pattern: every segment lands
//! in exactly one step, steps are numbered from 0 without gaps, and the
//! order follows the pattern's own path and segment order. For Sikku that
//! order is the Euler circuit fixed at generation time, so replaying the
//! steps redraws the single stroke from its start.

use serde::{Deserialize, Serialize};

use crate::error::CoverageError;
use crate::geometry::{Segment, short};
use crate::patterns::{Pattern, SegmentRef, Style};

/// How segments are grouped into steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// One step per path.
    #[default]
    PerPath,
    /// One step per segment.
    PerSegment,
    /// Up to `n` consecutive segments of the same path per step.
    Chunked(usize),
}

impl SequencePolicy {
    /// Per-segment for Sikku (follow the stroke), per-path otherwise.
    pub fn for_style(style: Style) -> Self {
        match style {
            Style::Sikku => SequencePolicy::PerSegment,
            Style::Pulli | Style::Kambi | Style::Padi => SequencePolicy::PerPath,
        }
    }
}

/// One replayable drawing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionStep {
    pub index: usize,
    pub segment_refs: Vec<SegmentRef>,
    pub description: String,
}

/// Steps for `pattern` under its style's default policy.
pub fn sequence(pattern: &Pattern) -> Vec<ConstructionStep> {
    sequence_with(pattern, SequencePolicy::for_style(pattern.style()))
}

/// Steps for `pattern` under an explicit policy.
pub fn sequence_with(pattern: &Pattern, policy: SequencePolicy) -> Vec<ConstructionStep> {
    let chunk = match policy {
        SequencePolicy::PerPath => usize::MAX,
        SequencePolicy::PerSegment => 1,
        SequencePolicy::Chunked(n) => n.max(1),
    };

    let mut steps = Vec::new();
    for (p, path) in pattern.paths().iter().enumerate() {
        let segments = path.segments();
        let mut start = 0;
        while start < segments.len() {
            let end = start.saturating_add(chunk).min(segments.len());
            let description = describe(policy, p, start, end, segments, path.is_closed());
            steps.push(ConstructionStep {
                index: steps.len(),
                segment_refs: (start..end).map(|s| SegmentRef { path: p, segment: s }).collect(),
                description,
            });
            start = end;
        }
    }

    debug_assert!(check_coverage(pattern, &steps).is_ok());
    steps
}

fn describe(
    policy: SequencePolicy,
    path: usize,
    start: usize,
    end: usize,
    segments: &[Segment],
    closed: bool,
) -> String {
    let at = |s: &Segment| {
        let p = s.to();
        format!("({}, {})", short(p.x), short(p.y))
    };
    match policy {
        SequencePolicy::PerPath => {
            let n = segments.len();
            let noun = if n == 1 { "segment" } else { "segments" };
            let shape = if closed { "closed path" } else { "path" };
            format!("Draw {shape} {} ({n} {noun})", path + 1)
        }
        SequencePolicy::PerSegment => {
            let seg = &segments[start];
            let from = seg.from();
            if start == 0 {
                format!(
                    "Start path {} at ({}, {}) with a {} to {}",
                    path + 1,
                    short(from.x),
                    short(from.y),
                    seg.kind_name(),
                    at(seg)
                )
            } else if closed && end == segments.len() {
                format!("Close the stroke at {}", at(seg))
            } else {
                format!("Continue the stroke to {}", at(seg))
            }
        }
        SequencePolicy::Chunked(_) => format!(
            "Draw segments {}-{} of path {}, ending at {}",
            start + 1,
            end,
            path + 1,
            at(&segments[end - 1])
        ),
    }
}

/// Verify that `steps` cover every segment of `pattern` exactly once and
/// are numbered `0, 1, 2, ...`.
pub fn check_coverage(pattern: &Pattern, steps: &[ConstructionStep]) -> Result<(), CoverageError> {
    let offsets: Vec<usize> = pattern
        .paths()
        .iter()
        .scan(0, |acc, path| {
            let start = *acc;
            *acc += path.len();
            Some(start)
        })
        .collect();
    let mut seen = vec![false; pattern.segment_count()];

    for (position, step) in steps.iter().enumerate() {
        if step.index != position {
            return Err(CoverageError::Misnumbered { position, found: step.index });
        }
        for &at in &step.segment_refs {
            if pattern.segment(at).is_none() {
                return Err(CoverageError::Unknown(at));
            }
            let flat = offsets[at.path] + at.segment;
            if std::mem::replace(&mut seen[flat], true) {
                return Err(CoverageError::Duplicate(at));
            }
        }
    }

    match pattern.segments().find(|(at, _)| !seen[offsets[at.path] + at.segment]) {
        Some((at, _)) => Err(CoverageError::Missing(at)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::make_grid;
    use crate::patterns::{GenerateParams, generate};

    fn pattern(style: Style) -> Pattern {
        generate(&GenerateParams { style, grid: make_grid(3, 3, 20.0).unwrap(), iterations: 2, seed: 9 })
            .unwrap()
    }

    #[test]
    fn pulli_one_step_per_path() {
        let p = pattern(Style::Pulli);
        let steps = sequence(&p);
        assert_eq!(steps.len(), p.paths().len());
        assert_eq!(steps[0].description, "Draw closed path 1 (4 segments)");
        check_coverage(&p, &steps).unwrap();
    }

    #[test]
    fn sikku_follows_the_stroke() {
        let p = pattern(Style::Sikku);
        let steps = sequence(&p);
        assert_eq!(steps.len(), p.segment_count());
        assert!(steps[0].description.starts_with("Start path 1 at"));
        assert!(steps[1].description.starts_with("Continue the stroke to"));
        assert!(steps.last().unwrap().description.starts_with("Close the stroke at"));
        // Consecutive steps join end to start.
        for w in steps.windows(2) {
            let a = p.segment(w[0].segment_refs[0]).unwrap();
            let b = p.segment(w[1].segment_refs[0]).unwrap();
            assert_eq!(a.to(), b.from());
        }
    }

    #[test]
    fn chunks_stay_within_a_path() {
        let p = pattern(Style::Padi);
        let steps = sequence_with(&p, SequencePolicy::Chunked(3));
        for step in &steps {
            assert!(step.segment_refs.len() <= 3);
            assert!(step.segment_refs.iter().all(|r| r.path == step.segment_refs[0].path));
        }
        check_coverage(&p, &steps).unwrap();
    }

    #[test]
    fn zero_chunk_acts_as_one() {
        let p = pattern(Style::Kambi);
        let steps = sequence_with(&p, SequencePolicy::Chunked(0));
        assert_eq!(steps.len(), p.segment_count());
    }

    #[test]
    fn coverage_errors() {
        let p = pattern(Style::Pulli);
        let mut steps = sequence(&p);

        let mut dup = steps.clone();
        let first = dup[0].segment_refs[0];
        dup[1].segment_refs.push(first);
        assert_eq!(check_coverage(&p, &dup), Err(CoverageError::Duplicate(first)));

        let removed = steps[2].segment_refs.pop().unwrap();
        assert_eq!(check_coverage(&p, &steps), Err(CoverageError::Missing(removed)));

        let mut renumbered = sequence(&p);
        renumbered[1].index = 5;
        assert_eq!(
            check_coverage(&p, &renumbered),
            Err(CoverageError::Misnumbered { position: 1, found: 5 })
        );

        let mut unknown = sequence(&p);
        let bogus = SegmentRef { path: 999, segment: 0 };
        unknown[0].segment_refs.push(bogus);
        assert_eq!(check_coverage(&p, &unknown), Err(CoverageError::Unknown(bogus)));
    }
}
