use kolam::euler::{is_single_stroke, odd_degree_count};
use kolam::patterns::LAYER_GROWTH;
use kolam::{
    ExportOptions, GenerateParams, Path, Pattern, Point, Segment, SequencePolicy, Style, Transform, analyze,
    check_coverage, export, generate, make_grid, parse_svg, sequence, sequence_with,
};
use proptest::prelude::*;

/// Parameters every generator accepts: Sikku never asks for more dots than
/// the grid has, Padi never grows a layer past the grid extent.
fn valid_params() -> impl Strategy<Value = GenerateParams> {
    (
        prop::sample::select(Style::all().to_vec()),
        1usize..8,
        1usize..8,
        prop::sample::select(vec![10.0, 15.5, 20.0, 32.0]),
        any::<u32>(),
        any::<u64>(),
    )
        .prop_map(|(style, rows, cols, spacing, raw_iterations, seed)| {
            let iterations = match style {
                Style::Sikku => 1 + raw_iterations % (rows * cols) as u32,
                Style::Padi => 1 + raw_iterations % padi_layers(rows.min(cols)),
                Style::Pulli | Style::Kambi => 1 + raw_iterations % 3,
            };
            GenerateParams { style, grid: make_grid(rows, cols, spacing).unwrap(), iterations, seed }
        })
}

/// Most layers that fit a grid whose shorter side has `dots` dots.
fn padi_layers(dots: usize) -> u32 {
    let mut layers = 1;
    while LAYER_GROWTH.powi(layers as i32) <= dots as f64 {
        layers += 1;
    }
    layers
}

fn petals(center: Point, radius: f64) -> Pattern {
    let petal = Segment::quadratic(
        Point::new(center.x - radius, center.y),
        Point::new(center.x, center.y - radius),
        Point::new(center.x + radius, center.y),
    );
    let paths = (0..4)
        .map(|i| {
            let turn = Transform::rotation(center, 90.0 * i as f64);
            Path::from_segments([petal.transformed(&turn)], false).unwrap()
        })
        .collect();
    Pattern::new("petals", make_grid(1, 1, 4.0 * radius).unwrap(), paths, Style::Kambi).unwrap()
}

proptest! {
    #[test]
    fn dot_at_is_exact(rows in 1usize..40, cols in 1usize..40, spacing in 0.5f64..100.0, r in 0usize..40, c in 0usize..40) {
        let grid = make_grid(rows, cols, spacing).unwrap();
        match grid.dot_at(r, c) {
            Ok(p) => {
                prop_assert!(r < rows && c < cols);
                prop_assert_eq!(p, Point::new(c as f64 * spacing, r as f64 * spacing));
            }
            Err(_) => prop_assert!(r >= rows || c >= cols),
        }
    }

    #[test]
    fn generation_is_deterministic(params in valid_params()) {
        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn sikku_is_one_stroke(rows in 1usize..8, cols in 1usize..8, raw in any::<u32>(), seed in any::<u64>()) {
        let iterations = 1 + raw % (rows * cols) as u32;
        let params = GenerateParams { style: Style::Sikku, grid: make_grid(rows, cols, 20.0).unwrap(), iterations, seed };
        let pattern = generate(&params).unwrap();
        prop_assert_eq!(pattern.paths().len(), 1);
        prop_assert!(odd_degree_count(pattern.paths()) <= 2);
        prop_assert!(is_single_stroke(pattern.paths()));
    }

    #[test]
    fn steps_cover_every_segment_once(params in valid_params(), chunk in 0usize..6) {
        let pattern = generate(&params).unwrap();
        check_coverage(&pattern, &sequence(&pattern)).unwrap();
        for policy in [SequencePolicy::PerPath, SequencePolicy::PerSegment, SequencePolicy::Chunked(chunk)] {
            let steps = sequence_with(&pattern, policy);
            prop_assert!(check_coverage(&pattern, &steps).is_ok(), "{:?}", policy);
        }
    }

    #[test]
    fn export_parses_back_exactly(params in valid_params()) {
        let pattern = generate(&params).unwrap();
        let svg = export(&pattern, None, &ExportOptions::default());
        prop_assert_eq!(parse_svg(&svg).unwrap(), pattern);
    }

    #[test]
    fn step_prefixes_grow(params in valid_params(), n in 0usize..12) {
        let pattern = generate(&params).unwrap();
        let total = sequence(&pattern).len();
        let prefix = parse_svg(&export(&pattern, Some(n), &ExportOptions::default())).unwrap();
        let expected: usize = sequence(&pattern).iter().take(n).map(|s| s.segment_refs.len()).sum();
        prop_assert_eq!(prefix.segment_count(), expected);
        if n >= total {
            prop_assert_eq!(prefix, pattern);
        }
    }

    #[test]
    fn petals_anywhere_have_order_four(cx in -200.0f64..200.0, cy in -200.0f64..200.0, radius in 5.0f64..60.0) {
        let analysis = analyze(&petals(Point::new(cx, cy), radius)).unwrap();
        prop_assert_eq!(analysis.report.rotational_order, 4);
        prop_assert_eq!(analysis.report.group_name(), "D4");
    }

    #[test]
    fn asymmetric_fixture_has_order_one(scale in 1.0f64..8.0, dx in -100.0f64..100.0, dy in -100.0f64..100.0) {
        let place = Transform::scale(Point::new(0.0, 0.0), scale).then(&Transform::translation(dx, dy));
        let line = Segment::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).transformed(&place);
        let curve = Segment::quadratic(Point::new(20.0, 5.0), Point::new(25.0, 15.0), Point::new(40.0, 0.0))
            .transformed(&place);
        let paths = vec![
            Path::from_segments([line], false).unwrap(),
            Path::from_segments([curve], false).unwrap(),
        ];
        let pattern = Pattern::new("asymmetric", make_grid(1, 1, 40.0 * scale).unwrap(), paths, Style::Kambi).unwrap();
        let analysis = analyze(&pattern).unwrap();
        prop_assert_eq!(analysis.report.rotational_order, 1);
        prop_assert!(analysis.report.reflection_axes.is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn analysis_is_idempotent(params in valid_params()) {
        let pattern = generate(&params).unwrap();
        let first = analyze(&pattern);
        let second = analyze(&pattern);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a, b);
        }
    }
}
