//! Screen-level tests: drive the meter into a capture buffer, replay the
//! bytes through a virtual terminal and check what a user would see.

mod support;

use crossterm::style::{Color, Stylize};
use progmeter_core::{ItemState, MeterConfig, OutputMode, ProgMeter, Reporter, TickerStart};
use regex::Regex;
use std::thread;
use std::time::Duration;
use support::{Capture, VirtualTerminal, has_cursor_control, strip_ansi};

fn interactive(tick: Duration) -> (ProgMeter<Capture>, Capture) {
    let capture = Capture::default();
    let config = MeterConfig::default()
        .with_mode(OutputMode::Interactive)
        .with_tick_interval(tick);
    (ProgMeter::with_writer(config, capture.clone()), capture)
}

fn quiet_ticker() -> (ProgMeter<Capture>, Capture) {
    interactive(Duration::from_secs(3600))
}

fn minimal() -> (ProgMeter<Capture>, Capture) {
    let capture = Capture::default();
    let meter = ProgMeter::with_writer(MeterConfig::minimal(true), capture.clone());
    (meter, capture)
}

/// Parse the trailing duration appended by `finish`.
fn trailing_duration(info: &str) -> Option<Duration> {
    let last = info.rsplit(' ').next()?;
    if let Some(ms) = last.strip_suffix("ms") {
        return ms.parse().ok().map(Duration::from_millis);
    }
    let secs: f64 = last.strip_suffix('s')?.parse().ok()?;
    Some(Duration::from_secs_f64(secs))
}

#[test]
fn test_rows_are_found_after_later_registrations() {
    let (meter, capture) = quiet_ticker();
    for key in ["a", "b", "c", "d"] {
        meter.add_entry(key, &format!("name-{key}"), "");
    }

    meter.set_state("b", "x");
    meter.finish("a");
    meter.error("c", "boom");

    let screen = VirtualTerminal::replay(&capture.text());
    let lines = screen.lines();
    assert!(lines[0].starts_with("[done] name-a"), "{lines:?}");
    assert!(lines[1].starts_with("[x   ] name-b"), "{lines:?}");
    assert!(lines[2].starts_with("[err ] name-c"), "{lines:?}");
    assert!(lines[2].ends_with(" boom"), "{lines:?}");
    assert!(lines[3].starts_with("[get ] name-d"), "{lines:?}");
    assert_eq!(screen.cursor_row(), 4);
}

#[test]
fn test_state_field_overwrite_keeps_name_and_info() {
    let (meter, capture) = quiet_ticker();
    meter.add_entry("k", "QmTarget", "some-info");
    meter.add_entry("other", "QmOther", "");
    meter.working("k", "dl");

    let lines = VirtualTerminal::replay(&capture.text()).lines();
    assert_eq!(lines[0], format!("[dl  ] {:<40}some-info", "QmTarget"));
}

#[test]
fn test_wide_label_rewrites_whole_row_without_leftovers() {
    let (meter, capture) = quiet_ticker();
    meter.add_entry("k", "QmTarget", "");
    meter.add_entry("other", "QmOther", "");

    meter.working("k", "fetching");
    let lines = VirtualTerminal::replay(&capture.text()).lines();
    assert!(lines[0].starts_with("[fetching] QmTarget"), "{lines:?}");

    meter.set_state("k", ItemState::Working("io".into()));
    let lines = VirtualTerminal::replay(&capture.text()).lines();
    assert!(lines[0].starts_with("[io  ] QmTarget"), "{lines:?}");
    assert!(!lines[0].contains("ing]"), "{lines:?}");
}

#[test]
fn test_multiline_text_keeps_rows_addressable() {
    let (meter, capture) = quiet_ticker();
    meter.add_entry("a", "name-a", "");
    meter.add_entry("b", "multi\nline", "");
    meter.add_entry("c", "name-c", "first\r\nsecond");
    meter.finish("a");
    meter.error("c", "dial tcp: refused\ncaused by: timeout");

    let screen = VirtualTerminal::replay(&capture.text());
    let lines = screen.lines();
    assert!(lines[0].starts_with("[done] name-a"), "{lines:?}");
    assert!(lines[1].starts_with("[get ] multi line"), "{lines:?}");
    assert!(lines[2].starts_with("[err ] name-c"), "{lines:?}");
    assert!(
        lines[2].ends_with("first  second dial tcp: refused caused by: timeout"),
        "{lines:?}"
    );
    assert!(lines[3].starts_with("[0/0] "), "{lines:?}");
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert_eq!(screen.cursor_row(), 3);
}

#[test]
fn test_multiline_text_is_one_line_per_update_in_minimal_mode() {
    let (meter, capture) = minimal();
    meter.add_entry("k", "multi\nline", "");
    meter.working("k", "d\nl");
    meter.error("k", "refused\ncaused by: timeout");

    let out = capture.text();
    assert_eq!(out.lines().count(), 3, "{out:?}");
    assert!(out.lines().nth(1).unwrap().starts_with("[d l ] multi line"));
}

#[test]
fn test_initial_label_keeps_pending_color() {
    let (meter, capture) = quiet_ticker();
    meter.add_entry_with_state("queued", "k", "QmA", "");

    assert_eq!(
        meter.item("k").map(|i| i.state),
        Some(ItemState::Pending("queued".into()))
    );
    let colored = format!("[{}]", "queued".with(Color::Yellow));
    assert!(capture.text().contains(&colored), "{:?}", capture.text());

    // Later plain labels stay uncolored
    meter.set_state("k", "sync");
    assert_eq!(meter.item("k").map(|i| i.state), Some(ItemState::from("sync")));
}

#[test]
fn test_duplicate_keys_update_newest_row() {
    let (meter, capture) = quiet_ticker();
    meter.add_entry("dup", "older", "");
    meter.add_entry("dup", "newer", "");
    meter.finish("dup");

    let lines = VirtualTerminal::replay(&capture.text()).lines();
    assert!(lines[0].starts_with("[get ] older"), "{lines:?}");
    assert!(lines[1].starts_with("[done] newer"), "{lines:?}");
}

#[test]
fn test_concurrent_callers_never_garble_rows() {
    // A fast ticker races every row update for the bottom line
    let (meter, capture) = interactive(Duration::from_millis(1));
    meter.add_todos(100);

    thread::scope(|s| {
        for i in 0..100 {
            let meter = &meter;
            s.spawn(move || {
                let key = format!("key-{i:03}");
                meter.add_entry(&key, &format!("item-{i:03}"), "");
                meter.working(&key, "dl");
                meter.finish(&key);
            });
        }
    });
    meter.stop();

    assert_eq!(meter.summary().done, 100);

    let screen = VirtualTerminal::replay(&capture.text());
    let lines = screen.lines();
    assert_eq!(screen.cursor_row(), 100);

    let row = Regex::new(r"^\[done\] (item-\d{3}) +\d+(\.\d+)?m?s$").unwrap();
    let mut names: Vec<String> = lines[..100]
        .iter()
        .map(|line| {
            let caps = row
                .captures(line)
                .unwrap_or_else(|| panic!("garbled row: {line:?}"));
            caps[1].to_string()
        })
        .collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 100);

    let summary = Regex::new(r"^\[\d+/100\] \d+s$").unwrap();
    if let Some(bottom) = lines.get(100).filter(|l| !l.is_empty()) {
        assert!(summary.is_match(bottom), "bad summary line: {bottom:?}");
    }
}

#[test]
fn test_finish_appends_elapsed_duration() {
    let (meter, _capture) = minimal();
    meter.add_entry("k", "slow", "QmInfo");
    thread::sleep(Duration::from_millis(25));
    meter.finish("k");

    let item = meter.item("k").unwrap();
    assert!(item.info.starts_with("QmInfo "), "{}", item.info);
    let took = trailing_duration(&item.info).expect("duration suffix");
    assert!(took >= Duration::from_millis(24), "{took:?}");
    assert!(took <= item.start.elapsed() + Duration::from_millis(1));
}

#[test]
fn test_finish_counts_even_without_row() {
    let (meter, capture) = minimal();
    meter.add_todos(2);
    meter.finish("never-registered");
    meter.add_entry("k", "real", "");
    meter.finish("k");

    let summary = meter.summary();
    assert_eq!((summary.done, summary.total), (2, 2));
    assert_eq!(meter.len(), 1);
    assert_eq!(capture.text().lines().count(), 2);
}

#[test]
fn test_error_is_not_counted() {
    let (meter, _capture) = minimal();
    meter.add_todos(1);
    meter.add_entry("k", "flaky", "");
    meter.error("k", "connection reset");

    assert_eq!(meter.summary().done, 0);
    assert_eq!(meter.item("k").unwrap().info, " connection reset");
}

#[test]
fn test_unknown_keys_change_nothing() {
    let (meter, capture) = minimal();
    meter.add_todos(3);
    meter.add_entry("k", "known", "");
    let before = (meter.len(), meter.summary().done, capture.text());

    meter.set_state("missing", "x");
    meter.working("missing", "dl");
    meter.error("missing", "boom");

    let after = (meter.len(), meter.summary().done, capture.text());
    assert_eq!(before, after);
}

#[test]
fn test_counter_summary() {
    let (meter, _capture) = minimal();
    meter.add_todos(5);
    for _ in 0..3 {
        meter.mark_done();
    }
    assert!(meter.summary().to_string().starts_with("[3/5] "));
}

#[test]
fn test_ticker_redraws_summary_line() {
    let capture = Capture::default();
    let config = MeterConfig::default()
        .with_tick_interval(Duration::from_millis(5))
        .with_ticker_start(TickerStart::Eager);
    let meter = ProgMeter::with_writer(config, capture.clone());

    meter.add_todos(5);
    for _ in 0..3 {
        meter.mark_done();
    }
    thread::sleep(Duration::from_millis(60));
    meter.stop();

    let lines = VirtualTerminal::replay(&capture.text()).lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].starts_with("[3/5] "), "{lines:?}");
}

#[test]
fn test_minimal_mode_appends_plain_lines() {
    let (meter, capture) = minimal();
    let mut expected_lines = 0;
    let mut check = |capture: &Capture| {
        expected_lines += 1;
        assert_eq!(capture.text().lines().count(), expected_lines);
    };

    meter.add_entry("k", "QmA", "");
    check(&capture);
    meter.working("k", "dl");
    check(&capture);
    meter.set_state("k", "sync");
    check(&capture);
    meter.error("k", "boom");
    check(&capture);
    meter.add_entry("j", "QmB", "");
    check(&capture);
    meter.finish("j");
    check(&capture);

    let out = capture.text();
    assert!(!has_cursor_control(&out));
    assert!(!out.contains('\x1b'), "color leaked into minimal output");
    assert_eq!(strip_ansi(&out), out);
    assert!(out.ends_with('\n'));

    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[3].starts_with("[err ] QmA"));
    assert!(lines[3].ends_with(" boom"));
    assert!(lines[5].starts_with("[done] QmB"));
}

#[test]
fn test_minimal_mode_never_ticks() {
    let capture = Capture::default();
    let config = MeterConfig::minimal(true)
        .with_tick_interval(Duration::from_millis(1))
        .with_ticker_start(TickerStart::Eager);
    let meter = ProgMeter::with_writer(config, capture.clone());
    meter.add_todos(1);
    thread::sleep(Duration::from_millis(20));
    assert!(capture.text().is_empty());
}

#[test]
fn test_stop_halts_summary_output() {
    let (meter, capture) = interactive(Duration::from_millis(5));
    meter.add_todos(1);
    meter.add_entry("k", "QmA", "");
    thread::sleep(Duration::from_millis(30));

    meter.stop();
    let written = capture.len();
    thread::sleep(Duration::from_millis(40));
    assert_eq!(capture.len(), written);
}

#[test]
fn test_dropping_meter_stops_ticker() {
    let (meter, capture) = interactive(Duration::from_millis(5));
    meter.add_entry("k", "QmA", "");
    drop(meter);

    let written = capture.len();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(capture.len(), written);
}

#[test]
fn test_absent_meter_accepts_every_call() {
    let meter: Option<ProgMeter<Capture>> = None;
    meter.add_todos(1);
    meter.add_entry("k", "QmA", "");
    meter.working("k", "dl");
    meter.set_state("k", ItemState::from("x"));
    meter.finish("k");
    meter.error("k", "boom");
    meter.mark_done();
    meter.stop();
}
