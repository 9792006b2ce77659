use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::*;
use crate::engine::mock::{Call, MockEngine};
use crate::engine::{EngineEvent, LaneId};
use crate::library::{SilentInterval, Track};

const AB: [(&str, u64); 2] = [("a.flac", 30_000), ("b.flac", 40_000)];
const ABC: [(&str, u64); 3] = [("a.flac", 30_000), ("b.flac", 40_000), ("c.flac", 20_000)];

fn scheduler(library: &[(&str, u64)], crossfade_secs: f32) -> CrossfadeScheduler<MockEngine> {
    let settings = SchedulerSettings {
        crossfade: Duration::from_secs_f32(crossfade_secs),
        ..SchedulerSettings::default()
    };
    CrossfadeScheduler::new(
        MockEngine::with_library(library),
        MockEngine::with_library(library),
        settings,
    )
}

fn tracks(library: &[(&str, u64)]) -> Vec<Track> {
    library
        .iter()
        .map(|(p, d)| Track::from_path(p).with_duration(Duration::from_millis(*d)))
        .collect()
}

fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

/// Report `position` on the active lane and run one tick.
fn tick_at(s: &mut CrossfadeScheduler<MockEngine>, t0: Instant, position: u64) {
    let lane = s.active_lane();
    s.engine_mut(lane).position = position;
    s.tick(at(t0, position));
}

fn loaded(s: &CrossfadeScheduler<MockEngine>, lane: LaneId) -> Option<PathBuf> {
    s.engine(lane).loaded.clone()
}

fn iv(a: u64, b: u64) -> SilentInterval {
    SilentInterval::new(a, b).unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// Queue AB with a 4 s crossfade and run until the fade into b has started.
fn fading_ab(library: &[(&str, u64)]) -> (CrossfadeScheduler<MockEngine>, Instant) {
    let mut s = scheduler(library, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(library), 0);
    tick_at(&mut s, t0, 26_000);
    assert_eq!(s.state(), TransitionState::Fading);
    (s, t0)
}

#[test]
fn set_queue_loads_first_track_on_lane_a() {
    let mut s = scheduler(&AB, 4.0);
    let epoch = s.set_queue(tracks(&AB), 0);

    assert_eq!(epoch, 1);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.current_index(), Some(0));
    assert_eq!(s.active_lane(), LaneId::A);
    assert_eq!(loaded(&s, LaneId::A), Some(PathBuf::from("a.flac")));
    assert!(s.engine(LaneId::A).playing);
    assert_eq!(s.lane_volume(LaneId::A), 1.0);
    assert_eq!(s.lane_volume(LaneId::B), 0.0);
    assert_eq!(s.engine(LaneId::B).loads(), 0);
    assert_eq!(
        s.take_events(),
        vec![SchedulerEvent::TrackStarted {
            index: 0,
            lane: LaneId::A
        }]
    );
}

#[test]
fn empty_queue_is_idle() {
    let mut s = scheduler(&AB, 4.0);
    s.set_queue(Vec::new(), 3);
    assert_eq!(s.state(), TransitionState::Idle);
    assert_eq!(s.current_index(), None);
    assert!(!s.next());
    assert!(!s.previous());
}

#[test]
fn start_index_is_clamped() {
    let mut s = scheduler(&AB, 4.0);
    s.set_queue(tracks(&AB), 9);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(loaded(&s, LaneId::A), Some(PathBuf::from("b.flac")));
}

#[test]
fn crossfade_from_a_to_b_swaps_lanes_at_thirty_seconds() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&AB), 0);
    s.take_events();

    tick_at(&mut s, t0, 25_800);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.engine(LaneId::B).loads(), 0);

    tick_at(&mut s, t0, 26_000);
    assert_eq!(s.state(), TransitionState::Fading);
    assert_eq!(loaded(&s, LaneId::B), Some(PathBuf::from("b.flac")));
    assert_eq!(s.engine(LaneId::B).count(&Call::Play), 1);
    assert_eq!(s.lane_volume(LaneId::A), 1.0);
    assert_eq!(s.lane_volume(LaneId::B), 0.0);
    assert_eq!(
        s.take_events(),
        vec![SchedulerEvent::CrossfadeStarted {
            from: 0,
            to: 1,
            duration: Duration::from_secs(4)
        }]
    );

    tick_at(&mut s, t0, 28_000);
    assert!(approx(s.lane_volume(LaneId::A), 0.5));
    assert!(approx(s.lane_volume(LaneId::B), 0.5));
    assert_eq!(s.current_index(), Some(0));

    tick_at(&mut s, t0, 30_000);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(loaded(&s, LaneId::A), None);
    assert_eq!(s.lane_volume(LaneId::B), 1.0);
    assert_eq!(s.lane_volume(LaneId::A), 0.0);
    assert!(!s.fade_in_flight());
    assert!(s.take_events().contains(&SchedulerEvent::TransitionFinished {
        index: 1,
        lane: LaneId::B
    }));
}

#[test]
fn repeated_ticks_while_fading_do_not_reschedule() {
    let (mut s, t0) = fading_ab(&AB);

    for pos in (26_200..28_000).step_by(200) {
        tick_at(&mut s, t0, pos);
    }
    tick_at(&mut s, t0, 28_000);

    assert_eq!(s.engine(LaneId::B).loads(), 1);
    assert_eq!(s.engine(LaneId::B).count(&Call::Play), 1);
    // A restarted ramp would be behind the original schedule.
    assert!(approx(s.lane_volume(LaneId::B), 0.5));
    assert_eq!(s.state(), TransitionState::Fading);
}

#[test]
fn fade_starts_within_one_poll_of_the_window() {
    const POLL: u64 = 200;
    for duration in [5_000u64, 9_000, 30_000] {
        for crossfade in [1_000u64, 4_000, 4_100, 12_000] {
            let library = [("a.flac", duration), ("b.flac", 60_000)];
            let mut s = scheduler(&library, crossfade as f32 / 1000.0);
            let t0 = Instant::now();
            s.set_queue(tracks(&library), 0);

            let mut fired_at = None;
            for pos in (0..duration).step_by(POLL as usize) {
                tick_at(&mut s, t0, pos);
                if s.state() == TransitionState::Fading {
                    fired_at = Some(pos);
                    break;
                }
            }
            let pos = fired_at.expect("crossfade never started");
            let remaining = duration - pos;
            assert!(remaining <= crossfade, "{duration}/{crossfade}: fired early at {pos}");
            if duration > crossfade {
                assert!(
                    remaining + POLL > crossfade,
                    "{duration}/{crossfade}: fired late at {pos}"
                );
            }
        }
    }
}

#[test]
fn zero_crossfade_switches_instantly_on_end_of_media() {
    let library = [("a.flac", 5_000), ("b.flac", 5_000)];
    let mut s = scheduler(&library, 0.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&library), 0);

    tick_at(&mut s, t0, 4_999);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.engine(LaneId::B).loads(), 0);

    s.engine_mut(LaneId::A).pending.push(EngineEvent::EndOfMedia);
    s.tick(at(t0, 5_000));

    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(s.lane_volume(LaneId::B), 1.0);
    assert_eq!(s.lane_volume(LaneId::A), 0.0);
    assert!(s.engine(LaneId::B).playing);
    assert!(!s.fade_in_flight());
}

#[test]
fn silence_is_skipped_once_per_entry() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    let mut queue = tracks(&AB);
    queue[0] = queue[0].clone().with_silences(vec![iv(1000, 2000)]);
    s.set_queue(queue, 0);

    s.on_position(LaneId::A, 1_500, at(t0, 1_500));
    // A report from before the seek took effect.
    s.on_position(LaneId::A, 1_700, at(t0, 1_700));
    assert_eq!(s.engine(LaneId::A).seeks(), vec![2_050]);

    s.on_position(LaneId::A, 2_100, at(t0, 2_100));
    s.on_position(LaneId::A, 1_200, at(t0, 2_300));
    assert_eq!(s.engine(LaneId::A).seeks(), vec![2_050, 2_050]);

    let skipped: Vec<_> = s
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, SchedulerEvent::SilenceSkipped { .. }))
        .collect();
    assert_eq!(skipped.len(), 2);
    assert_eq!(
        skipped[0],
        SchedulerEvent::SilenceSkipped {
            index: 0,
            lane: LaneId::A,
            from_ms: 1_500,
            to_ms: 2_050
        }
    );
}

#[test]
fn single_track_with_silence_never_crossfades() {
    let library = [("a.flac", 10_000)];
    let mut s = scheduler(&library, 5.0);
    let t0 = Instant::now();
    let queue = vec![tracks(&library)[0].clone().with_silences(vec![iv(3000, 4000)])];
    s.set_queue(queue, 0);

    tick_at(&mut s, t0, 3_500);
    assert_eq!(s.engine(LaneId::A).seeks(), vec![4_050]);

    for pos in [6_000, 8_000, 9_800] {
        tick_at(&mut s, t0, pos);
        assert_eq!(s.state(), TransitionState::Playing);
    }
    assert_eq!(s.engine(LaneId::B).loads(), 0);

    s.engine_mut(LaneId::A).pending.push(EngineEvent::EndOfMedia);
    s.tick(at(t0, 10_000));
    assert_eq!(s.current_index(), Some(0));
    assert_eq!(s.state(), TransitionState::Idle);
    assert_eq!(loaded(&s, LaneId::B), None);
    assert!(s.take_events().contains(&SchedulerEvent::QueueEnded));
}

#[test]
fn skipping_on_the_incoming_lane_keeps_the_fade() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    let mut queue = tracks(&AB);
    queue[1] = queue[1].clone().with_silences(vec![iv(500, 1500)]);
    s.set_queue(queue, 0);
    tick_at(&mut s, t0, 26_000);

    s.engine_mut(LaneId::B).position = 1_000;
    tick_at(&mut s, t0, 27_000);

    assert_eq!(s.engine(LaneId::B).seeks(), vec![1_550]);
    assert_eq!(s.state(), TransitionState::Fading);
    assert!(s.fade_in_flight());
    assert!(approx(s.lane_volume(LaneId::B), 0.25));
}

#[test]
fn skip_into_the_window_starts_the_fade_on_the_same_tick() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    let mut queue = tracks(&AB);
    queue[0] = queue[0].clone().with_silences(vec![iv(25_000, 29_000)]);
    s.set_queue(queue, 0);

    tick_at(&mut s, t0, 25_500);
    assert_eq!(s.engine(LaneId::A).seeks(), vec![29_050]);
    assert_eq!(s.state(), TransitionState::Fading);
}

#[test]
fn gap_killer_off_leaves_silences_alone() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    let mut queue = tracks(&AB);
    queue[0] = queue[0].clone().with_silences(vec![iv(1000, 2000)]);
    s.set_queue(queue, 0);
    s.enable_gap_killer(false);

    tick_at(&mut s, t0, 1_500);
    assert!(s.engine(LaneId::A).seeks().is_empty());

    s.enable_gap_killer(true);
    tick_at(&mut s, t0, 1_600);
    assert_eq!(s.engine(LaneId::A).seeks(), vec![2_050]);
}

#[test]
fn set_queue_mid_fade_resets_everything() {
    let (mut s, t0) = fading_ab(&AB);
    let epoch = s.set_queue(tracks(&ABC), 2);

    assert_eq!(epoch, 2);
    assert!(!s.fade_in_flight());
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.active_lane(), LaneId::A);
    assert_eq!(s.lane_volume(LaneId::A), 1.0);
    assert_eq!(s.lane_volume(LaneId::B), 0.0);
    assert_eq!(loaded(&s, LaneId::A), Some(PathBuf::from("c.flac")));
    assert_eq!(loaded(&s, LaneId::B), None);

    // Where the old fade would have landed nothing changes.
    tick_at(&mut s, t0, 1_000);
    s.tick(at(t0, 30_000));
    assert_eq!(s.current_index(), Some(2));
    assert_eq!(s.active_lane(), LaneId::A);
}

#[test]
fn stale_fade_completions_are_dropped() {
    let (mut s, _t0) = fading_ab(&AB);

    let old = FadeTag {
        epoch: 0,
        from_index: 0,
        role: FadeRole::In,
    };
    s.on_fade_complete(LaneId::B, old);
    assert_eq!(s.state(), TransitionState::Fading);

    let wrong_track = FadeTag {
        epoch: s.epoch(),
        from_index: 5,
        role: FadeRole::In,
    };
    s.on_fade_complete(LaneId::B, wrong_track);
    assert_eq!(s.state(), TransitionState::Fading);

    let wrong_lane = FadeTag {
        epoch: s.epoch(),
        from_index: 0,
        role: FadeRole::In,
    };
    s.on_fade_complete(LaneId::A, wrong_lane);
    assert_eq!(s.state(), TransitionState::Fading);

    s.on_fade_complete(LaneId::B, wrong_lane);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.current_index(), Some(1));
}

#[test]
fn next_at_last_track_is_a_no_op() {
    let mut s = scheduler(&AB, 4.0);
    s.set_queue(tracks(&AB), 1);
    let calls_a = s.engine(LaneId::A).calls.len();
    let calls_b = s.engine(LaneId::B).calls.len();

    assert!(!s.next());
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.engine(LaneId::A).calls.len(), calls_a);
    assert_eq!(s.engine(LaneId::B).calls.len(), calls_b);
}

#[test]
fn previous_at_first_track_is_a_no_op() {
    let mut s = scheduler(&AB, 4.0);
    s.set_queue(tracks(&AB), 0);
    let calls_a = s.engine(LaneId::A).calls.len();
    let calls_b = s.engine(LaneId::B).calls.len();

    assert!(!s.previous());
    assert_eq!(s.current_index(), Some(0));
    assert_eq!(s.engine(LaneId::A).calls.len(), calls_a);
    assert_eq!(s.engine(LaneId::B).calls.len(), calls_b);
}

#[test]
fn next_and_previous_swap_lanes_without_ramps() {
    let mut s = scheduler(&ABC, 4.0);
    s.set_queue(tracks(&ABC), 0);

    assert!(s.next());
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(loaded(&s, LaneId::B), Some(PathBuf::from("b.flac")));
    assert_eq!(loaded(&s, LaneId::A), None);
    assert_eq!(s.lane_volume(LaneId::B), 1.0);
    assert_eq!(s.lane_volume(LaneId::A), 0.0);
    assert!(!s.fade_in_flight());

    assert!(s.previous());
    assert_eq!(s.current_index(), Some(0));
    assert_eq!(s.active_lane(), LaneId::A);
    assert_eq!(loaded(&s, LaneId::A), Some(PathBuf::from("a.flac")));
}

#[test]
fn next_mid_fade_cancels_the_fade() {
    let (mut s, t0) = fading_ab(&ABC);

    assert!(s.next());
    assert!(!s.fade_in_flight());
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(loaded(&s, LaneId::A), None);
    assert_eq!(s.lane_volume(LaneId::B), 1.0);

    s.tick(at(t0, 30_000));
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.active_lane(), LaneId::B);
}

#[test]
fn next_unpauses() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&AB), 0);
    s.pause(t0);
    assert!(s.is_paused());

    s.next();
    assert!(!s.is_paused());
    assert!(s.engine(LaneId::B).playing);
}

#[test]
fn engine_error_on_active_lane_advances() {
    let mut s = scheduler(&ABC, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&ABC), 0);
    s.take_events();

    s.engine_mut(LaneId::A)
        .pending
        .push(EngineEvent::Error("decoder died".to_string()));
    s.tick(at(t0, 1_000));

    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.state(), TransitionState::Playing);
    let events = s.take_events();
    assert!(events.contains(&SchedulerEvent::TrackFailed {
        index: 0,
        reason: "decoder died".to_string()
    }));
    // The failed source is not loaded again.
    assert_eq!(s.engine(LaneId::A).loads(), 1);
}

#[test]
fn unloadable_track_is_skipped() {
    let mut s = scheduler(&ABC, 4.0);
    s.engine_mut(LaneId::A).break_source("b.flac");
    s.set_queue(tracks(&ABC), 1);

    assert_eq!(s.current_index(), Some(2));
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(loaded(&s, LaneId::A), Some(PathBuf::from("c.flac")));
    assert!(matches!(
        s.take_events().first(),
        Some(SchedulerEvent::TrackFailed { index: 1, .. })
    ));
}

#[test]
fn queue_of_broken_tracks_ends_idle() {
    let mut s = scheduler(&AB, 4.0);
    s.engine_mut(LaneId::A).break_source("a.flac");
    s.engine_mut(LaneId::A).break_source("b.flac");
    s.set_queue(tracks(&AB), 0);

    assert_eq!(s.state(), TransitionState::Idle);
    assert_eq!(s.take_events().last(), Some(&SchedulerEvent::QueueEnded));
}

#[test]
fn failed_preload_is_not_retried() {
    let mut s = scheduler(&ABC, 4.0);
    let t0 = Instant::now();
    s.engine_mut(LaneId::B).break_source("b.flac");
    s.set_queue(tracks(&ABC), 0);

    tick_at(&mut s, t0, 26_000);
    assert_eq!(s.state(), TransitionState::Playing);
    tick_at(&mut s, t0, 26_200);
    tick_at(&mut s, t0, 27_000);
    assert_eq!(s.engine(LaneId::B).loads(), 1);

    s.engine_mut(LaneId::A).pending.push(EngineEvent::EndOfMedia);
    s.tick(at(t0, 30_000));
    assert_eq!(s.current_index(), Some(2));
    assert_eq!(loaded(&s, LaneId::B), Some(PathBuf::from("c.flac")));
    assert_eq!(s.engine(LaneId::B).loads(), 2);
}

#[test]
fn error_on_incoming_lane_aborts_the_fade() {
    let (mut s, t0) = fading_ab(&ABC);
    s.engine_mut(LaneId::B)
        .pending
        .push(EngineEvent::Error("truncated".to_string()));
    s.tick(at(t0, 27_000));

    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.current_index(), Some(0));
    assert_eq!(s.active_lane(), LaneId::A);
    assert_eq!(s.lane_volume(LaneId::A), 1.0);
    assert_eq!(loaded(&s, LaneId::B), None);
    assert!(!s.fade_in_flight());

    tick_at(&mut s, t0, 27_200);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.engine(LaneId::B).loads(), 1);
}

#[test]
fn end_of_media_on_outgoing_lane_finishes_the_fade_early() {
    let (mut s, t0) = fading_ab(&AB);
    s.engine_mut(LaneId::A).pending.push(EngineEvent::EndOfMedia);
    s.tick(at(t0, 27_000));

    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(s.lane_volume(LaneId::B), 1.0);
    assert!(!s.fade_in_flight());
}

#[test]
fn end_of_media_on_incoming_lane_moves_past_it() {
    let (mut s, t0) = fading_ab(&ABC);
    s.engine_mut(LaneId::B).pending.push(EngineEvent::EndOfMedia);
    s.tick(at(t0, 27_000));

    assert_eq!(s.current_index(), Some(2));
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(loaded(&s, s.active_lane()), Some(PathBuf::from("c.flac")));
}

#[test]
fn pause_freezes_the_fade() {
    let (mut s, t0) = fading_ab(&AB);
    tick_at(&mut s, t0, 27_000);
    assert!(approx(s.lane_volume(LaneId::B), 0.25));

    s.pause(at(t0, 27_000));
    assert!(!s.engine(LaneId::A).playing);
    assert!(!s.engine(LaneId::B).playing);
    s.tick(at(t0, 40_000));
    assert!(approx(s.lane_volume(LaneId::B), 0.25));
    assert_eq!(s.state(), TransitionState::Fading);

    s.play(at(t0, 41_000));
    assert!(s.engine(LaneId::A).playing);
    assert!(s.engine(LaneId::B).playing);
    s.tick(at(t0, 42_000));
    assert!(approx(s.lane_volume(LaneId::B), 0.5));

    s.tick(at(t0, 44_000));
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(s.state(), TransitionState::Playing);
}

#[test]
fn toggle_after_stop_restarts_the_current_track() {
    let mut s = scheduler(&ABC, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&ABC), 1);
    s.stop();
    assert_eq!(s.state(), TransitionState::Idle);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(loaded(&s, LaneId::A), None);

    s.toggle(t0);
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(loaded(&s, s.active_lane()), Some(PathBuf::from("b.flac")));

    s.toggle(t0);
    assert!(s.is_paused());
    s.toggle(t0);
    assert!(!s.is_paused());
}

#[test]
fn fade_out_ramps_down_then_stops() {
    let mut s = scheduler(&AB, 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&AB), 0);

    s.fade_out(Duration::from_millis(500), at(t0, 1_000));
    s.tick(at(t0, 1_250));
    assert!(approx(s.lane_volume(LaneId::A), 0.5));
    assert_eq!(s.state(), TransitionState::Playing);

    s.tick(at(t0, 1_500));
    assert_eq!(s.state(), TransitionState::Idle);
    assert_eq!(loaded(&s, LaneId::A), None);
}

#[test]
fn zero_length_fade_out_stops_immediately() {
    let mut s = scheduler(&AB, 4.0);
    s.set_queue(tracks(&AB), 0);
    s.fade_out(Duration::ZERO, Instant::now());
    assert_eq!(s.state(), TransitionState::Idle);
}

#[test]
fn fade_out_during_a_crossfade_keeps_the_louder_lane() {
    let (mut s, t0) = fading_ab(&AB);
    tick_at(&mut s, t0, 29_000);

    s.fade_out(Duration::from_millis(500), at(t0, 29_000));
    assert_eq!(s.active_lane(), LaneId::B);
    assert_eq!(s.current_index(), Some(1));
    assert_eq!(loaded(&s, LaneId::A), None);

    s.tick(at(t0, 29_500));
    assert_eq!(s.state(), TransitionState::Idle);
}

#[test]
fn crossfade_seconds_are_clamped() {
    let mut s = scheduler(&AB, 4.0);
    assert_eq!(s.set_crossfade_seconds(30.0), Duration::from_secs(12));
    assert_eq!(s.set_crossfade_seconds(-2.0), Duration::ZERO);
    assert_eq!(s.set_crossfade_seconds(f32::NAN), Duration::ZERO);
    assert_eq!(s.set_crossfade_seconds(2.5), Duration::from_millis(2500));
}

#[test]
fn silence_params_are_clamped() {
    let mut s = scheduler(&AB, 4.0);
    let p = s.set_silence_params(-200.0, 10);
    assert_eq!(p.threshold_db, -90.0);
    assert_eq!(p.min_silence_ms, 50);
    assert_eq!(s.settings().silence, p);
}

#[test]
fn track_duration_stands_in_for_unknown_engine_duration() {
    // Engines know nothing about these sources.
    let mut s = scheduler(&[], 4.0);
    let t0 = Instant::now();
    s.set_queue(tracks(&AB), 0);
    assert_eq!(s.duration_ms(), 30_000);

    tick_at(&mut s, t0, 26_000);
    assert_eq!(s.state(), TransitionState::Fading);
}

#[test]
fn unknown_duration_never_triggers_a_fade() {
    let mut s = scheduler(&[], 4.0);
    let t0 = Instant::now();
    let queue = vec![Track::from_path("a.flac"), Track::from_path("b.flac")];
    s.set_queue(queue, 0);

    for pos in [0, 1_000, 100_000] {
        tick_at(&mut s, t0, pos);
    }
    assert_eq!(s.state(), TransitionState::Playing);
    assert_eq!(s.engine(LaneId::B).loads(), 0);
}

#[test]
fn silences_from_a_replaced_queue_are_dropped() {
    let mut s = scheduler(&AB, 4.0);
    let first = s.set_queue(tracks(&AB), 0);
    let second = s.set_queue(tracks(&AB), 0);

    assert!(!s.apply_silences(first, 0, vec![iv(1000, 2000)]));
    assert!(s.queue().get(0).unwrap().silences().is_empty());

    assert!(s.apply_silences(second, 0, vec![iv(3000, 4000), iv(1000, 2000)]));
    assert_eq!(
        s.queue().get(0).unwrap().silences(),
        &[iv(1000, 2000), iv(3000, 4000)]
    );
    assert!(!s.apply_silences(second, 7, Vec::new()));
}

#[test]
fn settings_follow_the_config_file() {
    let mut config = crate::config::Settings::default();
    config.audio.crossfade_seconds = 99.0;
    config.gap_killer.enabled = false;
    config.gap_killer.min_silence_ms = 5;

    let settings = SchedulerSettings::from(&config);
    assert_eq!(settings.crossfade, Duration::from_secs(12));
    assert!(!settings.gap_killer);
    assert_eq!(settings.silence.min_silence_ms, 50);
    assert_eq!(settings.skip_epsilon_ms, 50);
}

#[test]
fn state_names() {
    assert_eq!(TransitionState::Fading.to_string(), "fading");
    assert_eq!(TransitionState::default(), TransitionState::Idle);
}
