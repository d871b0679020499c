//! Integration tests for the LampService → fade → outputs/publish pipeline.
//!
//! These run on the host (x86_64) and drive the service through gestures,
//! the knob and the control loop tick, with every port mocked.

use super::mock_hw::{DisplayCall, Rig};

use trilamp::app::commands::AppCommand;
use trilamp::app::events::AppEvent;
use trilamp::config::LampConfig;
use trilamp::lamp::LampId;

fn brightness(lamp: usize, value: &str) -> (String, String) {
    (format!("trilamp/{lamp}/brightness"), value.to_string())
}

/// Switch lamp `idx` on at `level` through the remote command path.
fn remote_on(rig: &mut Rig, idx: usize, level: u8) {
    let lamp = LampId::from_index(idx).expect("valid index");
    rig.command(AppCommand::Remote { lamp, level });
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_subscribes_and_draws_initial_screen() {
    let rig = Rig::new();

    assert_eq!(rig.net.subscriptions, ["trilamp/#"]);
    assert_eq!(rig.display.probes, 1);
    assert_eq!(rig.display.calls[0], DisplayCall::Clock);
    assert!(matches!(rig.display.calls[1], DisplayCall::Channels(_)));
    assert_eq!(rig.sink.events, [AppEvent::Started { display: true }]);
    assert_eq!(rig.hw.position, 128, "knob seeded from lamp A");
    assert!(rig.net.published.is_empty());
}

#[test]
fn absent_display_is_never_called_again() {
    let mut rig = Rig::without_display();

    rig.command(AppCommand::Click);
    rig.command(AppCommand::DoubleClick);
    rig.command(AppCommand::LongPress);
    rig.hw.turn_to(10);
    rig.tick(0);
    rig.tick(10_000);

    assert_eq!(rig.display.probes, 1);
    assert!(rig.display.calls.is_empty(), "got {:?}", rig.display.calls);
    assert_eq!(rig.sink.events[0], AppEvent::Started { display: false });
}

// ── Single click ──────────────────────────────────────────────

#[test]
fn click_fades_selected_lamp_on_then_off() {
    let mut rig = Rig::new();

    rig.command(AppCommand::Click);
    let ch = *rig.app.channels().get(LampId::A);
    assert!(ch.is_on());
    assert_eq!(rig.hw.levels, [128, 0, 0]);
    let ramp_up = rig.hw.writes_to(LampId::A);
    assert_eq!(ramp_up.len(), 128, "unit steps 1..=128");
    assert!(ramp_up.windows(2).all(|w| w[1] == w[0] + 1));

    rig.command(AppCommand::Click);
    assert!(!rig.app.channels().lamps_in_use());
    assert_eq!(rig.hw.levels, [0, 0, 0]);
    assert_eq!(rig.app.channels().get(LampId::A).value(), 128, "value kept while off");

    assert_eq!(rig.take_published(), [brightness(0, "128"), brightness(0, "0")]);
}

#[test]
fn fade_blocks_for_steps_times_step_delay() {
    let mut rig = Rig::new();
    let step_us = rig.app.config().fade_step_delay_us;

    rig.command(AppCommand::Click);

    assert_eq!(rig.hw.delayed_ns, 128 * u64::from(step_us) * 1_000);
}

#[test]
fn first_activation_fires_only_on_none_to_some() {
    let mut rig = Rig::new();

    rig.command(AppCommand::Click); // A on: first activation
    remote_on(&mut rig, 2, 90); // C on: already in use
    rig.command(AppCommand::Click); // A off, C still on
    rig.command(AppCommand::Click); // A on again, still in use

    assert_eq!(rig.sink.count(&AppEvent::FirstActivation), 1);
    let firsts = rig
        .display
        .calls
        .iter()
        .filter(|c| **c == DisplayCall::FirstActivation)
        .count();
    assert_eq!(firsts, 1);
}

// ── Double click ──────────────────────────────────────────────

#[test]
fn double_click_round_robins_and_reseeds_knob() {
    let mut rig = Rig::new();
    remote_on(&mut rig, 1, 200);
    rig.take_published();
    let levels = rig.hw.levels;

    rig.command(AppCommand::DoubleClick);
    assert_eq!(rig.app.selected(), LampId::B);
    assert_eq!(rig.hw.position, 200, "knob now tracks lamp B");

    rig.command(AppCommand::DoubleClick);
    assert_eq!(rig.app.selected(), LampId::C);
    assert_eq!(rig.hw.position, 128);

    rig.command(AppCommand::DoubleClick);
    assert_eq!(rig.app.selected(), LampId::A, "three advances return to start");

    assert_eq!(rig.hw.levels, levels, "selection never changes brightness");
    assert!(rig.take_published().is_empty());
    assert_eq!(rig.sink.count(&AppEvent::SelectionChanged(LampId::B)), 1);
}

// ── Long press (group toggle) ─────────────────────────────────

#[test]
fn long_press_snapshot_then_restore() {
    let mut rig = Rig::new();
    remote_on(&mut rig, 0, 50);
    remote_on(&mut rig, 2, 90);
    rig.command(AppCommand::DoubleClick); // select B to prove the reset
    rig.take_published();

    rig.command(AppCommand::LongPress);

    let channels = rig.app.channels();
    assert!(!channels.lamps_in_use());
    for lamp in LampId::ALL {
        assert!(!channels.get(lamp).is_on());
    }
    let defaults = LampId::ALL.map(|l| channels.get(l).is_on_default());
    assert_eq!(defaults, [true, false, true]);
    assert_eq!(rig.app.selected(), LampId::A);
    assert_eq!(rig.hw.levels, [0, 0, 0]);
    assert_eq!(rig.take_published(), [brightness(0, "0"), brightness(2, "0")]);

    rig.command(AppCommand::LongPress);

    let channels = rig.app.channels();
    assert!(channels.get(LampId::A).is_on());
    assert_eq!(channels.get(LampId::A).value(), 50);
    assert!(!channels.get(LampId::B).is_on());
    assert!(channels.get(LampId::C).is_on());
    assert_eq!(channels.get(LampId::C).value(), 90);
    assert_eq!(rig.app.selected(), LampId::A);
    assert_eq!(rig.hw.levels, [50, 0, 90]);
    assert_eq!(rig.hw.position, 50, "knob follows lamp A after the reset");
    assert_eq!(rig.take_published(), [brightness(0, "50"), brightness(2, "90")]);

    assert!(
        rig.sink
            .events
            .contains(&AppEvent::GroupOff { defaults: [true, false, true] })
    );
    assert!(rig.sink.events.contains(&AppEvent::GroupRestored { restored: 2 }));
}

#[test]
fn long_press_before_any_group_off_restores_nothing() {
    let mut rig = Rig::new();

    rig.command(AppCommand::LongPress);

    assert!(!rig.app.channels().lamps_in_use());
    assert!(rig.take_published().is_empty());
    assert!(rig.sink.events.contains(&AppEvent::GroupRestored { restored: 0 }));
}

// ── Knob ──────────────────────────────────────────────────────

#[test]
fn knob_adjusts_live_and_publishes_once_after_quiet() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Click);
    rig.take_published();
    let writes_before = rig.hw.writes.len();

    rig.hw.turn_to(180);
    rig.tick(1_000);

    assert_eq!(rig.app.channels().get(LampId::A).value(), 180);
    assert_eq!(rig.hw.levels[0], 180);
    assert_eq!(rig.hw.writes.len(), writes_before + 1, "live edit bypasses the fade");
    assert!(rig.display.calls.contains(&DisplayCall::ProgressBar(180)));
    assert!(rig.app.afterglow_pending());

    rig.tick(2_499);
    assert!(rig.take_published().is_empty());

    rig.tick(2_500);
    assert_eq!(rig.take_published(), [brightness(0, "180")]);
    rig.tick(5_000);
    assert!(rig.take_published().is_empty());
}

#[test]
fn continuous_rotation_coalesces_into_one_publish() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Click);
    rig.take_published();
    let quiet = rig.app.config().afterglow_quiet_ms;

    let mut now = 10_000;
    for step in 0..40 {
        rig.hw.turn_to(130 + step);
        rig.tick(now);
        now += quiet / 3;
    }
    assert!(rig.take_published().is_empty(), "nothing while the knob moves");

    let last_move = now - quiet / 3;
    for t in (last_move..last_move + 3 * quiet).step_by(10) {
        rig.tick(t);
    }
    assert_eq!(rig.take_published(), [brightness(0, "169")]);
}

#[test]
fn afterglow_settles_the_lamp_the_knob_moved() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Click);
    rig.hw.turn_to(180);
    rig.tick(1_000);

    // Selection moves on before the quiet period ends.
    rig.command(AppCommand::DoubleClick);
    assert_eq!(rig.take_published(), [brightness(0, "128")]);

    rig.tick(2_500);
    assert_eq!(rig.take_published(), [brightness(0, "180")]);
}

#[test]
fn knob_on_another_lamp_settles_the_first_immediately() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Click);
    rig.hw.turn_to(180);
    rig.tick(1_000);
    rig.command(AppCommand::DoubleClick);
    rig.command(AppCommand::Click);
    assert_eq!(
        rig.take_published(),
        [brightness(0, "128"), brightness(1, "128")]
    );

    rig.hw.turn_to(60);
    rig.tick(1_200);
    assert_eq!(rig.take_published(), [brightness(0, "180")]);
    assert!(rig.app.afterglow_pending());

    rig.tick(2_699);
    assert!(rig.take_published().is_empty());
    rig.tick(2_700);
    assert_eq!(rig.take_published(), [brightness(1, "60")]);
}

#[test]
fn knob_clamps_and_writes_back() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Click);

    rig.hw.turn_to(400);
    rig.tick(0);
    assert_eq!(rig.app.channels().get(LampId::A).value(), 255);
    assert_eq!(rig.hw.position, 255);

    rig.hw.turn_to(-12);
    rig.tick(10);
    assert_eq!(rig.app.channels().get(LampId::A).value(), 2);
    assert_eq!(rig.hw.position, 2);
    assert_eq!(rig.hw.levels[0], 2);
}

#[test]
fn knob_ignored_while_off_and_reseeded_on_switch_on() {
    let mut rig = Rig::new();

    rig.hw.turn_to(30);
    rig.tick(0);
    assert_eq!(rig.app.channels().get(LampId::A).value(), 128);
    assert!(!rig.app.afterglow_pending());

    rig.command(AppCommand::Click);
    assert_eq!(rig.hw.position, 128, "stale knob position discarded");
    let writes = rig.hw.writes.len();

    rig.tick(10);
    assert_eq!(rig.hw.writes.len(), writes, "no spurious jump after switch-on");
    assert_eq!(rig.app.channels().get(LampId::A).value(), 128);
}

// ── Invariants ────────────────────────────────────────────────

#[test]
fn outputs_dark_whenever_lamp_off() {
    let mut rig = Rig::new();
    let script = [
        AppCommand::Click,
        AppCommand::Remote { lamp: LampId::B, level: 1 },
        AppCommand::DoubleClick,
        AppCommand::Remote { lamp: LampId::C, level: 255 },
        AppCommand::LongPress,
        AppCommand::Remote { lamp: LampId::A, level: 77 },
        AppCommand::LongPress,
        AppCommand::Click,
    ];

    for cmd in script {
        rig.command(cmd);
        let channels = rig.app.channels();
        for (lamp, ch) in channels.iter() {
            assert_eq!(rig.hw.levels[lamp.index()], ch.output_level(), "after {cmd:?}");
            assert!((2..=255).contains(&ch.value()));
        }
        assert_eq!(
            channels.lamps_in_use(),
            channels.iter().any(|(_, ch)| ch.is_on())
        );
    }
}

#[test]
fn custom_topic_root_flows_through() {
    let config = LampConfig::from_json(r#"{"topic_root":"porch","brightness_subtopic":"level"}"#)
        .expect("valid override");
    let mut rig = Rig::with(config, true);

    rig.command(AppCommand::Click);

    assert_eq!(rig.net.subscriptions, ["porch/#"]);
    assert_eq!(
        rig.take_published(),
        [("porch/0/level".to_string(), "128".to_string())]
    );
}
