mod common;

use std::time::{Duration, Instant};

use common::{store_with, two_spectra, ChartCall, RecordingChart};
use specplot::chart::{AppliedStyle, ChartAdapter, ChartLayout, StyleDelta};
use specplot::data::overlay::{LABEL_MAX_LEN, MEAN_NAME};
use specplot::interaction::{highlight_updates, resolve_by_name, DELETE_CONFIRM_TIMEOUT};
use specplot::{
    compose_overlay, ClickTarget, DisplayOptions, HighlightState, InteractionController,
    OverlayTrace, ProcessingResult,
};

fn processed_traces() -> Vec<OverlayTrace> {
    let store = store_with(two_spectra());
    let result = ProcessingResult {
        frequencies: vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]],
        amplitudes: vec![vec![1.0, 2.0, 1.0], vec![3.0, 2.0, 3.0]],
        peaks: Some(vec![vec![1], vec![1]]),
        mean: Some(vec![2.0, 2.0, 2.0]),
        std: Some(vec![1.0, 1.0, 1.0]),
        ..Default::default()
    };
    // A, Peaks A, B, Peaks B, Mean, Mean + 1σ, Mean - 1σ
    compose_overlay(&store, Some(&result), &DisplayOptions::default()).unwrap()
}

fn rendered(traces: &[OverlayTrace]) -> RecordingChart {
    let mut chart = RecordingChart::default();
    chart.render(traces, &ChartLayout::default());
    chart
}

fn labels() -> Vec<String> {
    vec!["A".into(), "B".into()]
}

fn click_on(
    ctl: &mut InteractionController,
    traces: &[OverlayTrace],
    target: ClickTarget,
    now: Instant,
    chart: &mut RecordingChart,
) -> Option<usize> {
    ctl.click(&target, traces, &labels(), LABEL_MAX_LEN, [10.0, 20.0], now, chart)
}

#[test]
fn hover_emphasises_owner_and_dims_the_rest() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();

    ctl.pointer_enter(0, &traces, &mut chart);

    assert_eq!(ctl.state(), HighlightState::Highlighted(0));
    // spectrum A: full opacity, base width + 2
    assert_eq!(chart.styles[0], AppliedStyle { opacity: 1.0, width: 3.0 });
    // peaks A: markers keep their width
    assert_eq!(chart.styles[1], AppliedStyle { opacity: 1.0, width: 1.0 });
    // spectrum B: dimmed, width floored at 1
    assert_eq!(chart.styles[2], AppliedStyle { opacity: 0.25, width: 1.0 });
    assert_eq!(chart.styles[3].opacity, 0.25);
}

#[test]
fn hover_leaves_aggregates_alone() {
    let traces = processed_traces();
    let updates = highlight_updates(&traces, 1);
    let touched: Vec<usize> = updates.iter().map(|(i, _)| *i).collect();
    assert_eq!(touched, vec![0, 1, 2, 3]);

    let mut chart = rendered(&traces);
    let before: Vec<AppliedStyle> = chart.styles[4..].to_vec();
    InteractionController::default().pointer_enter(1, &traces, &mut chart);
    assert_eq!(chart.styles[4..].to_vec(), before);
}

#[test]
fn dimmed_width_uses_base_width() {
    let traces = processed_traces();
    let mean = traces.iter().find(|t| t.name == MEAN_NAME).unwrap();
    assert_eq!(mean.base_width, 3.0);

    let mut wide = traces[2].clone();
    wide.base_width = 4.0;
    wide.look.width = 4.0;
    let updates = highlight_updates(&[traces[0].clone(), wide], 0);
    assert_eq!(updates[1].1, StyleDelta::opacity(0.25).with_width(3.0));
}

#[test]
fn repeated_hover_cycles_restore_exactly() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let original = chart.styles.clone();
    let mut ctl = InteractionController::default();

    for cycle in 0..5 {
        ctl.pointer_enter(cycle % 2, &traces, &mut chart);
        ctl.pointer_leave(&traces, &mut chart);
        assert_eq!(chart.styles, original);
        assert_eq!(ctl.state(), HighlightState::Idle);
    }
}

#[test]
fn switching_hover_target_does_not_compound() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();

    ctl.pointer_enter(0, &traces, &mut chart);
    ctl.pointer_enter(1, &traces, &mut chart);
    ctl.pointer_enter(0, &traces, &mut chart);
    assert_eq!(chart.styles[0], AppliedStyle { opacity: 1.0, width: 3.0 });
    assert_eq!(chart.styles[2], AppliedStyle { opacity: 0.25, width: 1.0 });
}

#[test]
fn hover_on_same_dataset_is_a_no_op() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();

    ctl.pointer_enter(1, &traces, &mut chart);
    let calls = chart.calls.len();
    ctl.pointer_enter(1, &traces, &mut chart);
    assert_eq!(chart.calls.len(), calls);
}

#[test]
fn leave_without_highlight_sends_nothing() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    ctl.pointer_leave(&traces, &mut chart);
    assert_eq!(chart.calls.len(), 1);
}

#[test]
fn click_on_spectrum_opens_delete_prompt() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    let now = Instant::now();

    let target = ClickTarget {
        trace_index: Some(2),
        name: "B".into(),
    };
    assert_eq!(click_on(&mut ctl, &traces, target, now, &mut chart), Some(1));
    assert_eq!(
        ctl.state(),
        HighlightState::PendingDelete {
            dataset: 1,
            anchor: [10.0, 20.0]
        }
    );
    assert_eq!(ctl.pending_deadline(), Some(now + DELETE_CONFIRM_TIMEOUT));
}

#[test]
fn click_while_highlighted_restores_styles_first() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let original = chart.styles.clone();
    let mut ctl = InteractionController::default();

    ctl.pointer_enter(0, &traces, &mut chart);
    let target = ClickTarget {
        trace_index: Some(0),
        name: "A".into(),
    };
    click_on(&mut ctl, &traces, target, Instant::now(), &mut chart);
    assert_eq!(chart.styles, original);
}

#[test]
fn clicks_on_non_spectrum_traces_are_ignored() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    let now = Instant::now();

    let mean = ClickTarget {
        trace_index: Some(4),
        name: MEAN_NAME.into(),
    };
    assert_eq!(click_on(&mut ctl, &traces, mean, now, &mut chart), None);

    let mean_by_name = ClickTarget {
        trace_index: None,
        name: MEAN_NAME.into(),
    };
    assert_eq!(click_on(&mut ctl, &traces, mean_by_name, now, &mut chart), None);

    let peaks = ClickTarget {
        trace_index: Some(1),
        name: "Peaks A".into(),
    };
    assert_eq!(click_on(&mut ctl, &traces, peaks, now, &mut chart), None);

    assert_eq!(ctl.state(), HighlightState::Idle);
    assert_eq!(chart.calls, vec![chart.calls[0].clone()]);
}

#[test]
fn click_falls_back_to_label_lookup() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();

    let target = ClickTarget {
        trace_index: None,
        name: "B".into(),
    };
    assert_eq!(
        click_on(&mut ctl, &traces, target, Instant::now(), &mut chart),
        Some(1)
    );
}

#[test]
fn label_lookup_prefers_first_of_colliding_names() {
    let labels = vec![
        "sample_batch_2024_run_a.csv".to_string(),
        "sample_batch_2024_run_b.csv".to_string(),
    ];
    assert_eq!(resolve_by_name("sample_batch_2024...", &labels, 20), Some(0));
    assert_eq!(resolve_by_name("File 3", &labels, 20), None);
}

#[test]
fn pending_delete_expires_after_timeout() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    let now = Instant::now();

    let target = ClickTarget {
        trace_index: Some(0),
        name: "A".into(),
    };
    click_on(&mut ctl, &traces, target, now, &mut chart);

    assert!(!ctl.tick(now + Duration::from_secs(2)));
    assert!(matches!(ctl.state(), HighlightState::PendingDelete { .. }));
    assert!(ctl.tick(now + Duration::from_secs(3)));
    assert_eq!(ctl.state(), HighlightState::Idle);
    assert!(!ctl.tick(now + Duration::from_secs(4)));
}

#[test]
fn new_click_replaces_the_old_timer() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_secs(2);

    let a = ClickTarget {
        trace_index: Some(0),
        name: "A".into(),
    };
    let b = ClickTarget {
        trace_index: Some(2),
        name: "B".into(),
    };
    click_on(&mut ctl, &traces, a, t0, &mut chart);
    click_on(&mut ctl, &traces, b, t1, &mut chart);

    // first deadline passes, second one still running
    assert!(!ctl.tick(t0 + Duration::from_secs(3)));
    assert!(matches!(
        ctl.state(),
        HighlightState::PendingDelete { dataset: 1, .. }
    ));
    assert!(ctl.tick(t1 + Duration::from_secs(3)));
}

#[test]
fn hover_cancels_pending_delete() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();
    let now = Instant::now();

    let target = ClickTarget {
        trace_index: Some(0),
        name: "A".into(),
    };
    click_on(&mut ctl, &traces, target, now, &mut chart);
    ctl.pointer_enter(1, &traces, &mut chart);

    assert_eq!(ctl.pending_deadline(), None);
    assert_eq!(ctl.state(), HighlightState::Highlighted(1));
    assert!(!ctl.tick(now + Duration::from_secs(10)));
    assert_eq!(ctl.state(), HighlightState::Highlighted(1));
}

#[test]
fn confirm_returns_the_dataset_once() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::default();

    let target = ClickTarget {
        trace_index: Some(2),
        name: "B".into(),
    };
    click_on(&mut ctl, &traces, target, Instant::now(), &mut chart);
    assert_eq!(ctl.confirm_delete(), Some(1));
    assert_eq!(ctl.confirm_delete(), None);
    assert_eq!(ctl.state(), HighlightState::Idle);
}

#[test]
fn cancel_and_custom_timeout() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    let mut ctl = InteractionController::new(Duration::from_millis(500));
    let now = Instant::now();

    let target = ClickTarget {
        trace_index: Some(0),
        name: "A".into(),
    };
    click_on(&mut ctl, &traces, target.clone(), now, &mut chart);
    assert_eq!(ctl.pending_deadline(), Some(now + Duration::from_millis(500)));
    ctl.cancel_delete();
    assert_eq!(ctl.state(), HighlightState::Idle);
    assert_eq!(ctl.confirm_delete(), None);

    click_on(&mut ctl, &traces, target, now, &mut chart);
    assert!(ctl.tick(now + Duration::from_millis(500)));
}

#[test]
fn restyles_are_addressed_by_trace_position() {
    let traces = processed_traces();
    let mut chart = rendered(&traces);
    InteractionController::default().pointer_enter(0, &traces, &mut chart);

    let Some(ChartCall::Restyle(updates)) = chart.last() else {
        panic!("expected a restyle, got {:?}", chart.last());
    };
    assert!(updates.iter().all(|(i, _)| *i < traces.len()));
}
