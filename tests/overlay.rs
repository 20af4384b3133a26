mod common;

use common::{ds, store_with, two_spectra};
use specplot::data::overlay::{
    is_aggregate_name, truncate_label, MEAN_MINUS_SIGMA_NAME, MEAN_NAME, MEAN_PLUS_SIGMA_NAME,
};
use specplot::data::processing::BoxplotStats;
use specplot::data::trace_look::{TraceLook, TraceMode};
use specplot::{compose_overlay, DisplayOptions, ProcessingResult, SpecError, TraceRole};

fn processed_two() -> ProcessingResult {
    ProcessingResult {
        frequencies: vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]],
        amplitudes: vec![vec![1.0, 2.0, 1.0], vec![3.0, 2.0, 3.0]],
        peaks: Some(vec![vec![1], vec![]]),
        mean: Some(vec![2.0, 2.0, 2.0]),
        std: Some(vec![1.0, 1.0, 1.0]),
        ..Default::default()
    }
}

fn names(traces: &[specplot::OverlayTrace]) -> Vec<&str> {
    traces.iter().map(|t| t.name.as_str()).collect()
}

fn box_stats(median: f64) -> BoxplotStats {
    BoxplotStats {
        q1: median - 1.0,
        median,
        q3: median + 1.0,
        lower_bound: median - 2.0,
        upper_bound: median + 2.0,
        outliers: vec![],
    }
}

#[test]
fn raw_spectra_one_trace_per_dataset() {
    let store = store_with(two_spectra());
    let traces = compose_overlay(&store, None, &DisplayOptions::default()).unwrap();

    assert_eq!(names(&traces), vec!["A", "B"]);
    for (i, tr) in traces.iter().enumerate() {
        assert_eq!(tr.role(), TraceRole::Spectrum);
        assert_eq!(tr.dataset_index(), Some(i));
        assert_eq!(tr.base_opacity, tr.look.opacity);
        assert_eq!(tr.base_width, tr.look.width);
    }
    assert_ne!(traces[0].look.color, traces[1].look.color);
    assert_eq!(traces[1].y, vec![3.0, 2.0, 3.0]);
}

#[test]
fn empty_store_composes_nothing() {
    let store = store_with(vec![]);
    let traces = compose_overlay(&store, None, &DisplayOptions::default()).unwrap();
    assert!(traces.is_empty());
}

#[test]
fn processed_overlay_adds_peaks_and_mean_band() {
    let store = store_with(two_spectra());
    let result = processed_two();
    let traces = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap();

    assert_eq!(
        names(&traces),
        vec![
            "A",
            "Peaks A",
            "B",
            MEAN_NAME,
            MEAN_PLUS_SIGMA_NAME,
            MEAN_MINUS_SIGMA_NAME
        ]
    );

    let peaks = &traces[1];
    assert_eq!(peaks.role(), TraceRole::Peaks);
    assert_eq!(peaks.dataset_index(), Some(0));
    assert_eq!(peaks.look.mode, TraceMode::Markers);
    assert_eq!(peaks.x, vec![2.0]);
    assert_eq!(peaks.y, vec![2.0]);
    assert_eq!(peaks.point_labels, vec!["2.00".to_string()]);

    let upper = &traces[4];
    let lower = &traces[5];
    assert_eq!(upper.y, vec![3.0, 3.0, 3.0]);
    assert_eq!(lower.y, vec![1.0, 1.0, 1.0]);
    for tr in &traces[3..] {
        assert!(tr.role().is_aggregate());
        assert_eq!(tr.dataset_index(), None);
        assert_eq!(tr.x, vec![1.0, 2.0, 3.0]);
    }
}

#[test]
fn composition_is_deterministic() {
    let store = store_with(two_spectra());
    let result = processed_two();
    let opts = DisplayOptions::default();
    let first = compose_overlay(&store, Some(&result), &opts).unwrap();
    let second = compose_overlay(&store, Some(&result), &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn aggregate_only_suppresses_per_dataset_traces() {
    let store = store_with(two_spectra());
    let result = processed_two();
    let opts = DisplayOptions {
        show_only_aggregate: true,
        ..Default::default()
    };
    let traces = compose_overlay(&store, Some(&result), &opts).unwrap();
    assert_eq!(
        names(&traces),
        vec![MEAN_NAME, MEAN_PLUS_SIGMA_NAME, MEAN_MINUS_SIGMA_NAME]
    );
}

#[test]
fn aggregates_hidden_when_switched_off() {
    let store = store_with(two_spectra());
    let result = processed_two();
    let opts = DisplayOptions {
        show_aggregate: false,
        ..Default::default()
    };
    let traces = compose_overlay(&store, Some(&result), &opts).unwrap();
    assert!(traces.iter().all(|t| !t.role().is_aggregate()));
}

#[test]
fn mismatched_axes_reject_mean_overlay() {
    let store = store_with(vec![
        ds("A", &[1.0, 2.0, 3.0], &[1.0, 2.0, 1.0]),
        ds("B", &[1.0, 2.0, 4.0], &[3.0, 2.0, 3.0]),
    ]);
    let result = ProcessingResult {
        frequencies: vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 4.0]],
        amplitudes: vec![vec![1.0, 2.0, 1.0], vec![3.0, 2.0, 3.0]],
        mean: Some(vec![2.0, 2.0, 2.0]),
        std: Some(vec![1.0, 1.0, 1.0]),
        ..Default::default()
    };
    let err = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap_err();
    assert!(matches!(err, SpecError::InconsistentAxis { dataset: 1, .. }));
}

#[test]
fn mismatched_axes_are_fine_without_aggregates() {
    let store = store_with(vec![
        ds("A", &[1.0, 2.0, 3.0], &[1.0, 2.0, 1.0]),
        ds("B", &[10.0, 20.0], &[3.0, 2.0]),
    ]);
    let traces = compose_overlay(&store, None, &DisplayOptions::default()).unwrap();
    assert_eq!(traces.len(), 2);
}

#[test]
fn mean_length_must_match_axis() {
    let store = store_with(two_spectra());
    let result = ProcessingResult {
        mean: Some(vec![2.0, 2.0]),
        std: Some(vec![1.0, 1.0]),
        ..processed_two()
    };
    let err = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap_err();
    assert!(matches!(err, SpecError::InconsistentAxis { dataset: 0, .. }));
}

#[test]
fn peak_index_outside_dataset_is_rejected() {
    let store = store_with(two_spectra());
    let result = ProcessingResult {
        peaks: Some(vec![vec![7]]),
        ..processed_two()
    };
    let err = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap_err();
    assert!(matches!(err, SpecError::Validation(_)));
}

#[test]
fn distribution_positions_split_first_axis() {
    let axis = [0.0, 10.0, 20.0, 30.0];
    let store = store_with(vec![
        ds("A", &axis, &[1.0, 2.0, 3.0, 4.0]),
        ds("B", &axis, &[5.0, 6.0, 7.0, 8.0]),
    ]);
    let result = ProcessingResult {
        frequencies: vec![axis.to_vec(), axis.to_vec()],
        amplitudes: vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]],
        distribution: Some(vec![box_stats(2.5), box_stats(6.5)]),
        ..Default::default()
    };
    let traces = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap();
    let dist = traces.last().unwrap();

    assert_eq!(dist.role(), TraceRole::Distribution);
    assert_eq!(dist.look.mode, TraceMode::Distribution);
    assert_eq!(dist.x, vec![10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0]);
    assert_eq!(dist.y, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    assert_eq!(dist.boxes.len(), 2);
    assert_eq!(dist.boxes[0].position, 10.0);
    assert_eq!(dist.boxes[1].position, 20.0);
    assert_eq!(dist.boxes[1].stats.median, 6.5);
    assert!((dist.boxes[0].half_width - 3.0).abs() < 1e-9);
}

#[test]
fn moving_average_is_dashed_and_clipped_to_axis() {
    let store = store_with(two_spectra());
    let result = ProcessingResult {
        peaks: None,
        mean: None,
        std: None,
        moving_averages: Some(vec![vec![1.5, 1.5, 1.5, 1.5]]),
        ..processed_two()
    };
    let traces = compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap();

    assert_eq!(names(&traces), vec!["A", "MA A", "B"]);
    let ma = &traces[1];
    assert_eq!(ma.role(), TraceRole::MovingAverage);
    assert_eq!(ma.dataset_index(), Some(0));
    assert_eq!(ma.x.len(), 3);
    assert_eq!(ma.y.len(), 3);
    assert_ne!(ma.look.style, traces[0].look.style);
}

#[test]
fn long_and_missing_labels_get_display_names() {
    let store = store_with(vec![
        ds("averyveryverylongfilename.txt", &[1.0], &[1.0]),
        ds("", &[1.0], &[2.0]),
    ]);
    let traces = compose_overlay(&store, None, &DisplayOptions::default()).unwrap();

    assert_eq!(traces[0].name, "averyveryverylong...");
    assert_eq!(traces[0].name.chars().count(), 20);
    assert_eq!(traces[1].name, "File 2");
}

#[test]
fn truncation_respects_character_boundaries() {
    assert_eq!(truncate_label("short", 20), "short");
    assert_eq!(truncate_label("spectrum_µ_αβγ_long", 10), "spectru...");
    assert_eq!(truncate_label("exactly-ten", 11), "exactly-ten");
}

#[test]
fn aggregate_names_are_reserved() {
    assert!(is_aggregate_name(MEAN_NAME));
    assert!(is_aggregate_name("Distribution"));
    assert!(!is_aggregate_name("A"));
}

#[test]
fn display_color_fades_with_opacity() {
    let look = TraceLook::new(0);
    assert_eq!(look.display_color(1.0), look.color);
    assert_eq!(look.display_color(4.0), look.color);
    assert_eq!(look.display_color(0.0).a(), 0);
    assert!(look.display_color(0.3).a() < look.color.a());
}
