// ABOUTME: @FILE directive support, exercised against a real file on disk

mod common;

use std::io::Write as _;

use govol_lisp::builtins;
use govol_lisp::eval::Evaluator;
use govol_lisp::interpreter::Interpreter;
use govol_lisp::printer;
use govol_lisp::reader::{CharSource, Reader, TerminalLineSource};

#[test]
fn at_file_switches_input_then_falls_back_to_the_terminal_on_its_eof() {
    let mut included = tempfile::NamedTempFile::new().expect("create scratch file");
    writeln!(included, "(SETQ X 42)").unwrap();
    included.flush().unwrap();
    let path = included.path().display().to_string();

    let mut interp = Interpreter::new(64, 64, 256);
    builtins::install(&mut interp).unwrap();

    let mut queued = vec![format!("@{path}"), "X".to_string()];
    queued.reverse();
    let term = TerminalLineSource { read_line: move |_prompt: char| queued.pop() };
    let mut reader = Reader::new(CharSource::new(term));

    let mut results = Vec::new();
    while let Some(expr) = reader.sread_opt(&mut interp).unwrap() {
        let mut ev = Evaluator::new(&mut interp, &mut reader);
        let value = ev.seval(expr).unwrap();
        results.push(printer::swrite_string(&interp, value));
    }

    assert_eq!(results, vec!["42", "42"]);
}
