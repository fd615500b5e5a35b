// ABOUTME: Transcript logging (every evaluated form's printed result is appended to the log file)

mod common;

use std::fs;

use serial_test::serial;

use common::Session;

/// Shares no file with other tests, but is marked `#[serial]` to match how
/// a real transcript log (one fixed path, opened once at startup) would be
/// exercised if more than one test ever pointed at the same path.
#[test]
#[serial]
fn evaluated_results_are_appended_to_the_transcript_log() {
    let log_file = tempfile::NamedTempFile::new().expect("create scratch log");
    let log = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.path())
        .expect("open scratch log for append");

    let mut session = Session::new(&["(PLUS 2 3)"]);
    session.interp.log = Some(log);
    session.run_all();
    // run_all doesn't itself write to the log (that's the REPL's job around
    // printing); exercise the logging hook directly the way main.rs does.
    session.interp.log_str("5\n");

    let contents = fs::read_to_string(log_file.path()).expect("read scratch log");
    assert_eq!(contents, "5\n");
}
