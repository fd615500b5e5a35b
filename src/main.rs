// ABOUTME: CLI entry point — argument parsing, REPL loop, and the top-level error unwinder

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor};
use rustyline_derive::Helper;

use govol_lisp::builtins;
use govol_lisp::config;
use govol_lisp::eval::Evaluator;
use govol_lisp::interpreter::Interpreter;
use govol_lisp::printer;
use govol_lisp::reader::{CharSource, Reader, TerminalLineSource};

/// Satisfies `rustyline::Helper` (via `rustyline-derive`) with no-op
/// completion/hinting/highlighting; the dynamic `*`/`>`/`@` prompt is
/// rendered by the caller per read, not by this helper — rustyline has no
/// hook for "prompt changes mid-expression".
#[derive(Helper)]
struct PromptHelper;

impl Completer for PromptHelper {
    type Candidate = String;
}

impl Hinter for PromptHelper {
    type Hint = String;
}

impl Validator for PromptHelper {}

impl Highlighter for PromptHelper {}

#[derive(Parser, Debug)]
#[command(name = "govol-lisp")]
#[command(version = config::VERSION)]
#[command(about = "A shallow-binding Lisp interpreter with tagged-pointer storage and mark-sweep GC")]
struct CliArgs {
    /// Script file to batch-evaluate (omit to start the REPL).
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Skip loading the bundled `lispinit` prelude.
    #[arg(long = "no-prelude")]
    no_prelude: bool,

    /// Transcript log path (defaults to `lisp.log`).
    #[arg(long = "log", value_name = "PATH")]
    log: Option<PathBuf>,

    /// Start with evaluator tracing enabled.
    #[arg(long = "trace")]
    trace: bool,

    #[arg(long = "atom-capacity", default_value_t = config::DEFAULT_ATOM_CAPACITY)]
    atom_capacity: usize,

    #[arg(long = "number-capacity", default_value_t = config::DEFAULT_NUMBER_CAPACITY)]
    number_capacity: usize,

    #[arg(long = "list-capacity", default_value_t = config::DEFAULT_LIST_CAPACITY)]
    list_capacity: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut interp = Interpreter::new(args.atom_capacity, args.number_capacity, args.list_capacity);
    interp.trace = args.trace;
    let log_path = args.log.unwrap_or_else(|| PathBuf::from(config::DEFAULT_LOG_FILE));
    interp.log = Some(OpenOptions::new().create(true).append(true).open(&log_path)?);
    builtins::install(&mut interp)?;

    if let Some(script_path) = args.script {
        return run_script(interp, &script_path, args.no_prelude);
    }
    run_repl(interp, args.no_prelude)
}

/// Batch mode: no terminal fallback, no prompts. The base stream is an
/// always-empty "terminal" so end-of-file in the script ends the run.
fn run_script(
    mut interp: Interpreter,
    path: &PathBuf,
    no_prelude: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let silent = TerminalLineSource { read_line: |_: char| -> Option<String> { None } };
    let mut reader = Reader::new(CharSource::new(silent));
    if !no_prelude {
        reader.source.include_str(config::PRELUDE_SOURCE);
        drain_quietly(&mut interp, &mut reader);
    }
    reader.source.include_file(&path.display().to_string())?;

    loop {
        match reader.sread_opt(&mut interp) {
            Ok(None) => break,
            Ok(Some(expr)) => {
                let mut ev = Evaluator::new(&mut interp, &mut reader);
                match ev.seval(expr) {
                    Ok(_) => {}
                    Err(e) if e.is_silent() => interp.unwind_to_repl(),
                    Err(e) => {
                        interp.unwind_to_repl();
                        return Err(format!("::{}", e.message()).into());
                    }
                }
            }
            Err(e) => {
                interp.unwind_to_repl();
                return Err(format!("::{}", e.message()).into());
            }
        }
    }
    Ok(())
}

/// Evaluate every form from `reader` (the embedded prelude), discarding
/// output and printing nothing for errors — the prelude is trusted input.
fn drain_quietly(interp: &mut Interpreter, reader: &mut Reader) {
    loop {
        match reader.sread_opt(interp) {
            Ok(None) => return,
            Ok(Some(expr)) => {
                let mut ev = Evaluator::new(interp, reader);
                if ev.seval(expr).is_err() {
                    interp.unwind_to_repl();
                }
            }
            Err(_) => {
                interp.unwind_to_repl();
                return;
            }
        }
    }
}

fn run_repl(mut interp: Interpreter, no_prelude: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let rl: Rc<RefCell<Editor<PromptHelper, rustyline::history::DefaultHistory>>> =
        Rc::new(RefCell::new(Editor::with_config(config)?));
    rl.borrow_mut().set_helper(Some(PromptHelper));

    let history_file = ".govol_lisp_history";
    let _ = rl.borrow_mut().load_history(history_file);

    let editor_for_terminal = Rc::clone(&rl);
    let terminal = TerminalLineSource {
        read_line: move |prompt: char| -> Option<String> {
            match editor_for_terminal.borrow_mut().readline(&format!("{prompt} ")) {
                Ok(line) => Some(line),
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
                Err(_) => None,
            }
        },
    };
    let mut reader = Reader::new(CharSource::new(terminal));

    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    if !no_prelude {
        reader.source.include_str(config::PRELUDE_SOURCE);
    }

    loop {
        println!();
        match reader.sread_opt(&mut interp) {
            Ok(None) => break,
            Ok(Some(expr)) => {
                let mut ev = Evaluator::new(&mut interp, &mut reader);
                match ev.seval(expr) {
                    Ok(value) => {
                        let text = printer::swrite_string(&interp, value);
                        println!("{text}");
                        interp.log_str(&format!("{text}\n"));
                    }
                    Err(e) if e.is_silent() => interp.unwind_to_repl(),
                    Err(e) => {
                        let msg = format!("::{}", e.message());
                        println!("{msg}");
                        interp.log_str(&format!("{msg}\n"));
                        interp.unwind_to_repl();
                    }
                }
            }
            Err(e) => {
                let msg = format!("::{}", e.message());
                println!("{msg}");
                interp.log_str(&format!("{msg}\n"));
                interp.unwind_to_repl();
            }
        }
    }

    println!();
    let _ = rl.borrow_mut().save_history(history_file);
    Ok(())
}
