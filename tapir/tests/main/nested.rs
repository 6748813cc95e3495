use chrono::Duration;
use std::sync::Arc;
use tapir::{Event, Mode, PartRecord, Session, TestRecord};

fn passing(suite: &str, name: &str, millis: i64) -> TestRecord {
    let mut rec = TestRecord::new(suite, name);
    rec.add_part(PartRecord::passed("ok"));
    rec.ended = rec.started + Duration::milliseconds(millis);
    rec
}

fn failing(suite: &str, name: &str, file: &str, line: u32, message: &str) -> TestRecord {
    let mut rec = TestRecord::new(suite, name);
    rec.add_part(PartRecord::failed_at(Some(file), Some(line), message));
    rec
}

fn skipped(suite: &str, name: &str) -> TestRecord {
    let mut rec = TestRecord::new(suite, name);
    rec.set_should_run(false);
    rec
}

#[test]
fn two_suites_end_to_end() {
    let mut session = Session::new(Mode::Nested);
    let mut out = String::new();

    out.push_str(&session.begin().unwrap());
    out.push_str(&session.record(&passing("Math", "Add", 1)).unwrap());
    out.push_str(
        &session
            .record(&failing("Math", "Sub", "mathtest.cc", 10, "expected 2 got 3"))
            .unwrap(),
    );
    out.push_str(&session.record(&skipped("Str", "Concat")).unwrap());
    out.push_str(&session.end().unwrap());

    let expected = "\
TAP version 13
# nesting
    # Subtest: Math
    ok 1 Add # time=0.001s
    not ok 2 Sub
    # Diagnostic
      ---
      error:
        stack: mathtest.cc:10
        message: \"expected 2 got 3\"
      ...
    1..2
not ok 1 Math
    # Subtest: Str
    ok 1 Concat # SKIP
    1..1
ok 2 Str
1..2
";
    assert_eq!(out, expected);
}

#[test]
fn events_drive_the_same_transcript() {
    let mut session = Session::new(Mode::Nested);
    let events = [
        Event::Started,
        Event::TestFinished(Arc::new(passing("Suite", "One", 2))),
        Event::Ended,
    ];

    let out: String = events
        .iter()
        .map(|e| session.handle(e).unwrap())
        .collect();

    let expected = "\
TAP version 13
# nesting
    # Subtest: Suite
    ok 1 One # time=0.002s
    1..1
ok 1 Suite
1..1
";
    assert_eq!(out, expected);
}

#[test]
fn suite_plan_matches_test_count_per_suite() {
    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();
    session.record(&passing("A", "a1", 1)).unwrap();
    session.record(&skipped("A", "a2")).unwrap();
    session
        .record(&failing("A", "a3", "a.rs", 1, "boom"))
        .unwrap();
    let transition = session.record(&passing("B", "b1", 1)).unwrap();
    let tail = session.end().unwrap();

    // the suite plan flushed at the transition covers all three A tests
    assert!(transition.starts_with("    1..3\n"));
    assert!(transition.contains("not ok 1 A\n"));
    assert!(tail.starts_with("    1..1\n"));
    assert!(tail.contains("ok 2 B\n"));
    assert!(tail.ends_with("1..2\n"));
}

#[test]
fn numbering_restarts_for_each_suite() {
    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();
    session.record(&passing("A", "a1", 1)).unwrap();
    session.record(&passing("A", "a2", 1)).unwrap();
    let b1 = session.record(&passing("B", "b1", 1)).unwrap();

    assert!(b1.contains("    ok 1 b1"));
}

#[test]
fn suite_of_skips_and_passes_is_ok() {
    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();
    session.record(&skipped("Quiet", "s1")).unwrap();
    session.record(&skipped("Quiet", "s2")).unwrap();
    session.record(&passing("Quiet", "p1", 1)).unwrap();
    let tail = session.end().unwrap();

    assert!(tail.contains("ok 1 Quiet\n"));
    assert!(!tail.contains("not ok"));
}

#[test]
fn skip_directive_is_emitted_regardless_of_status() {
    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();

    // filtered out, but the framework still reported a failed part
    let mut rec = TestRecord::new("S", "odd");
    rec.add_part(PartRecord::failed_at(Some("s.rs"), Some(3), "late failure"));
    rec.set_should_run(false);

    let line = session.record(&rec).unwrap();
    assert!(line.contains("not ok 1 odd # SKIP"));

    // skipped failures don't fail the suite
    let tail = session.end().unwrap();
    assert!(tail.contains("ok 1 S\n"));
}

#[test]
fn every_failed_part_gets_an_error_entry() {
    let mut rec = TestRecord::new("Multi", "Parts");
    rec.add_part(PartRecord::failed_at(Some("m.rs"), Some(4), "first"));
    rec.add_part(PartRecord::passed("fine"));
    rec.add_part(PartRecord::failed_at(Some("m.rs"), Some(9), "second"));

    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();
    let out = session.record(&rec).unwrap();

    assert_eq!(out.matches("error:").count(), 2);
    assert!(out.contains("stack: m.rs:4"));
    assert!(out.contains("stack: m.rs:9"));
    assert!(!out.contains("fine"));
}

#[test]
fn missing_location_renders_a_placeholder() {
    let mut rec = TestRecord::new("Lost", "NoFile");
    rec.add_part(PartRecord::failed_at(None::<&str>, None, "  indented message"));

    let mut session = Session::new(Mode::Nested);
    session.begin().unwrap();
    let out = session.record(&rec).unwrap();

    assert!(out.contains("stack: (unknown):(unknown)"));
    // leading indentation is stripped before escaping
    assert!(out.contains("message: \"indented message\""));
}

#[test]
fn empty_run_emits_an_empty_plan() {
    let mut session = Session::new(Mode::Nested);
    let head = session.begin().unwrap();
    let tail = session.end().unwrap();

    assert_eq!(head, "TAP version 13\n# nesting\n");
    assert_eq!(tail, "1..0\n");
}
