// ABOUTME: Configuration and constants for the Lisp interpreter

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Lisp interpreter";
pub const WELCOME_SUBTITLE: &str = "shallow-binding, tagged-pointer storage, mark-sweep GC";

/// Default atom table capacity.
pub const DEFAULT_ATOM_CAPACITY: usize = 1000;
/// Default number table capacity.
pub const DEFAULT_NUMBER_CAPACITY: usize = 1000;
/// Default list area capacity (cons cells).
pub const DEFAULT_LIST_CAPACITY: usize = 6000;

/// Transcript log file written next to the working directory.
pub const DEFAULT_LOG_FILE: &str = "lisp.log";

/// Bootstrap prelude, embedded at compile time and `@`-included at startup.
pub const PRELUDE_NAME: &str = "lispinit";
pub const PRELUDE_SOURCE: &str = include_str!("../lispinit");

pub const HELP_TEXT: &str = r#"
Type any expression at the prompt to evaluate it.
!TRACE and !NOTRACE toggle evaluator tracing.
@filename includes a file as though it were typed at the prompt.
End of input exits the REPL.
"#;
