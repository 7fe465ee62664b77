//! Built-in gallery of featured patterns.
//!
//! Presets are plain parameter sets; the geometry is generated on demand
//! so the gallery can never drift from the generators.

use serde::Serialize;

use crate::error::GeometryError;
use crate::grid::make_grid;
use crate::patterns::{GenerateParams, Style};

/// A named, documented parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub style: Style,
    pub rows: usize,
    pub cols: usize,
    pub spacing: f64,
    pub iterations: u32,
    pub seed: u64,
}

impl Preset {
    /// Generation parameters for this preset.
    pub fn params(&self) -> Result<GenerateParams, GeometryError> {
        Ok(GenerateParams {
            style: self.style,
            grid: make_grid(self.rows, self.cols, self.spacing)?,
            iterations: self.iterations,
            seed: self.seed,
        })
    }
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "lotus-sikku",
        title: "Lotus Sikku",
        description: "A single unbroken stroke weaving around nine dots of a 7x7 grid",
        style: Style::Sikku,
        rows: 7,
        cols: 7,
        spacing: 20.0,
        iterations: 9,
        seed: 42,
    },
    Preset {
        name: "pongal-pulli",
        title: "Pongal Pulli",
        description: "Double rings on every dot, tied together by cell diamonds",
        style: Style::Pulli,
        rows: 5,
        cols: 5,
        spacing: 20.0,
        iterations: 2,
        seed: 7,
    },
    Preset {
        name: "temple-steps",
        title: "Temple Steps",
        description: "Five concentric layers, each 1.3 times the last",
        style: Style::Padi,
        rows: 7,
        cols: 7,
        spacing: 20.0,
        iterations: 5,
        seed: 3,
    },
    Preset {
        name: "mango-leaves",
        title: "Mango Leaves",
        description: "Freehand leaf motifs scattered over a 5x5 grid",
        style: Style::Kambi,
        rows: 5,
        cols: 5,
        spacing: 20.0,
        iterations: 6,
        seed: 21,
    },
    Preset {
        name: "starter-sikku",
        title: "Starter Sikku",
        description: "A small four-dot stroke for first-time practice",
        style: Style::Sikku,
        rows: 3,
        cols: 3,
        spacing: 20.0,
        iterations: 4,
        seed: 1,
    },
    Preset {
        name: "festival-padi",
        title: "Festival Padi",
        description: "Six nested layers on a wide 9x9 grid",
        style: Style::Padi,
        rows: 9,
        cols: 9,
        spacing: 20.0,
        iterations: 6,
        seed: 8,
    },
];

/// Every preset, in gallery order.
pub fn all() -> &'static [Preset] {
    PRESETS
}

/// The first three presets, shown on the landing page.
pub fn featured() -> &'static [Preset] {
    &PRESETS[..3]
}

/// Look a preset up by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Presets of one style, in gallery order.
pub fn by_style(style: Style) -> impl Iterator<Item = &'static Preset> {
    PRESETS.iter().filter(move |p| p.style == style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::generate;
    use std::collections::HashSet;

    #[test]
    fn every_preset_generates() {
        for preset in all() {
            let params = preset.params().unwrap();
            let pattern = generate(&params).unwrap_or_else(|e| panic!("{}: {e}", preset.name));
            assert!(pattern.segment_count() > 0);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = all().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn lookup() {
        assert_eq!(find("Temple-Steps").map(|p| p.style), Some(Style::Padi));
        assert!(find("nope").is_none());
        assert_eq!(featured().len(), 3);
        assert_eq!(by_style(Style::Sikku).count(), 2);
    }
}
