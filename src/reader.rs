// ABOUTME: Character source stack, tokenizer, and the SREAD recursive-descent expression reader

use std::fs::File;
use std::io::{BufRead, BufReader};

use nom::branch::alt;
use nom::character::complete::{char, digit1, one_of};
use nom::combinator::{opt, recognize};
use nom::{IResult, Parser};

use crate::error::LispError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Something the character source can pull lines from: the terminal (via a
/// caller-supplied line editor) or an included file.
pub trait LineSource {
    fn next_line(&mut self) -> std::io::Result<Option<String>>;
    fn is_terminal(&self) -> bool {
        false
    }
}

pub struct FileLineSource {
    lines: std::io::Lines<BufReader<File>>,
}

impl FileLineSource {
    pub fn open(path: &str) -> Result<Self, LispError> {
        let file = File::open(path).map_err(|e| LispError::Io(format!("{path}: {e}")))?;
        Ok(FileLineSource { lines: BufReader::new(file).lines() })
    }
}

impl LineSource for FileLineSource {
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self.lines.next() {
            Some(line) => line.map(Some),
            None => Ok(None),
        }
    }
}

/// An in-memory line source, used to feed the embedded prelude through the
/// same `@`-include path a real file would take, without touching disk.
struct StringLineSource {
    lines: std::vec::IntoIter<String>,
}

impl StringLineSource {
    fn new(content: &str) -> Self {
        let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
        StringLineSource { lines: lines.into_iter() }
    }
}

impl LineSource for StringLineSource {
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.next())
    }
}

/// A terminal line source backed by a caller-supplied prompt-and-read
/// callback, so the reader stays decoupled from any particular line editor.
pub struct TerminalLineSource<F: FnMut(char) -> Option<String>> {
    pub read_line: F,
}

impl<F: FnMut(char) -> Option<String>> TerminalLineSource<F> {
    fn next_with_prompt(&mut self, prompt: char) -> std::io::Result<Option<String>> {
        Ok((self.read_line)(prompt))
    }
}

struct StreamFrame {
    source: Box<dyn LineSourceWithPrompt>,
}

/// Internal adapter so both file and terminal sources can be stored behind
/// one trait object while the terminal variant still needs the prompt char.
trait LineSourceWithPrompt {
    fn next_line(&mut self, prompt: char) -> std::io::Result<Option<String>>;
    fn is_terminal(&self) -> bool;
}

impl LineSourceWithPrompt for FileLineSource {
    fn next_line(&mut self, _prompt: char) -> std::io::Result<Option<String>> {
        LineSource::next_line(self)
    }
    fn is_terminal(&self) -> bool {
        false
    }
}

impl LineSourceWithPrompt for StringLineSource {
    fn next_line(&mut self, _prompt: char) -> std::io::Result<Option<String>> {
        LineSource::next_line(self)
    }
    fn is_terminal(&self) -> bool {
        false
    }
}

struct TerminalAdapter<F: FnMut(char) -> Option<String>>(TerminalLineSource<F>);

impl<F: FnMut(char) -> Option<String>> LineSourceWithPrompt for TerminalAdapter<F> {
    fn next_line(&mut self, prompt: char) -> std::io::Result<Option<String>> {
        self.0.next_with_prompt(prompt)
    }
    fn is_terminal(&self) -> bool {
        true
    }
}

/// One-line lookahead buffer over a stack of input streams, with comment-line
/// discarding, TAB→space normalisation, and trailing-space padding.
pub struct CharSource {
    stack: Vec<StreamFrame>,
    buffer: Vec<char>,
    pos: usize,
    pub prompt: char,
}

impl CharSource {
    pub fn new<F: FnMut(char) -> Option<String> + 'static>(terminal: TerminalLineSource<F>) -> Self {
        CharSource {
            stack: vec![StreamFrame { source: Box::new(TerminalAdapter(terminal)) }],
            buffer: Vec::new(),
            pos: 0,
            prompt: '*',
        }
    }

    pub fn include_file(&mut self, path: &str) -> Result<(), LispError> {
        let source = FileLineSource::open(path)?;
        self.stack.push(StreamFrame { source: Box::new(source) });
        self.prompt = '@';
        Ok(())
    }

    /// Push an in-memory source, as if `@name` had been typed — used to load
    /// the bundled prelude without depending on a file existing on disk.
    pub fn include_str(&mut self, content: &str) {
        self.stack.push(StreamFrame { source: Box::new(StringLineSource::new(content)) });
        self.prompt = '@';
    }

    fn is_terminal_top(&self) -> bool {
        self.stack.last().map(|f| f.source.is_terminal()).unwrap_or(false)
    }

    fn refill(&mut self) -> Result<bool, LispError> {
        loop {
            let top_is_terminal = self.is_terminal_top();
            let prompt = self.prompt;
            let frame = match self.stack.last_mut() {
                Some(f) => f,
                None => return Ok(false),
            };
            let line = frame
                .source
                .next_line(if top_is_terminal { prompt } else { '\0' })
                .map_err(|e| LispError::Io(e.to_string()))?;
            match line {
                Some(line) => {
                    if line.starts_with('/') {
                        continue;
                    }
                    let mut normalized: Vec<char> =
                        line.chars().map(|c| if c == '\t' { ' ' } else { c }).collect();
                    normalized.push(' ');
                    self.buffer = normalized;
                    self.pos = 0;
                    return Ok(true);
                }
                None => {
                    if self.stack.len() > 1 {
                        self.stack.pop();
                        self.prompt = '*';
                        continue;
                    }
                    return Ok(false);
                }
            }
        }
    }

    fn ensure_buffered(&mut self) -> Result<bool, LispError> {
        if self.pos < self.buffer.len() {
            return Ok(true);
        }
        self.refill()
    }

    pub fn peek(&mut self) -> Result<Option<char>, LispError> {
        if !self.ensure_buffered()? {
            return Ok(None);
        }
        Ok(Some(self.buffer[self.pos]))
    }

    pub fn consume(&mut self) -> Result<Option<char>, LispError> {
        let c = self.peek()?;
        if c.is_some() {
            self.pos += 1;
        }
        Ok(c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Quote,
    Dot,
    Close,
    Datum(Value),
    /// The bottom-most stream (the terminal, or a batch source standing in
    /// for it) has nothing left. Mirrors the original's `topInsave == NULL`
    /// check at end-of-stream: a clean exit, not a syntax error.
    Eof,
}

pub struct Reader {
    pub source: CharSource,
    pushback: Option<Token>,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '\''
}

fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((
            recognize((digit1, opt((char('.'), opt(digit1))))),
            recognize((char('.'), digit1)),
        )),
    ))
    .parse(input)
}

fn parse_number_text(text: &str) -> Option<f64> {
    match number_literal(text) {
        Ok((rest, matched)) if rest.is_empty() => matched.parse::<f64>().ok(),
        _ => None,
    }
}

impl Reader {
    pub fn new(source: CharSource) -> Self {
        Reader { source, pushback: None }
    }

    pub fn push_back(&mut self, token: Token) {
        self.pushback = Some(token);
    }

    fn skip_blanks(&mut self) -> Result<(), LispError> {
        loop {
            match self.source.peek()? {
                Some(c) if c.is_whitespace() => {
                    self.source.consume()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_raw_token(&mut self) -> Result<String, LispError> {
        let mut text = String::new();
        loop {
            match self.source.peek()? {
                Some(c) if !is_delimiter(c) => {
                    text.push(c);
                    self.source.consume()?;
                }
                _ => break,
            }
        }
        Ok(text)
    }

    /// Read the next token, transparently following `@file` directives.
    pub fn next_token(&mut self, interp: &mut Interpreter) -> Result<Token, LispError> {
        if let Some(token) = self.pushback.take() {
            return Ok(token);
        }
        loop {
            self.skip_blanks()?;
            let c = match self.source.peek()? {
                Some(c) => c,
                None => return Ok(Token::Eof),
            };
            if c == '(' {
                self.source.consume()?;
                self.skip_blanks()?;
                if self.source.peek()? == Some(')') {
                    self.source.consume()?;
                    return Ok(Token::Datum(interp.nil()));
                }
                return Ok(Token::Open);
            }
            if c == ')' {
                self.source.consume()?;
                return Ok(Token::Close);
            }
            if c == '\'' {
                self.source.consume()?;
                return Ok(Token::Quote);
            }
            if c == '@' {
                self.source.consume()?;
                let name = self.read_raw_token()?;
                self.source.include_file(&name)?;
                continue;
            }
            let text = self.read_raw_token()?;
            if text.is_empty() {
                return Err(LispError::Syntax(format!("unexpected character '{c}'")));
            }
            if text == "." {
                return Ok(Token::Dot);
            }
            if let Some(n) = parse_number_text(&text) {
                return Ok(Token::Datum(interp.numatom(n)?));
            }
            return Ok(Token::Datum(interp.ordatom(&text)?));
        }
    }

    /// §4.2: build one S-expression from tokens. `Ok(None)` signals clean
    /// end-of-input at the bottom-most stream (mirrors the original's
    /// `topInsave == NULL` exit, not a syntax error).
    pub fn sread_opt(&mut self, interp: &mut Interpreter) -> Result<Option<Value>, LispError> {
        self.sread_with_prompt_opt(interp, '*')
    }

    /// Same as `sread_opt`, but with a caller-chosen initial prompt character
    /// (the READ builtin prompts with `!` rather than the REPL's `*`).
    pub fn sread_with_prompt_opt(
        &mut self,
        interp: &mut Interpreter,
        prompt: char,
    ) -> Result<Option<Value>, LispError> {
        self.source.prompt = prompt;
        let token = self.next_token(interp)?;
        if token == Token::Eof {
            return Ok(None);
        }
        self.push_back(token);
        self.sread_expr(interp).map(Some)
    }

    /// Convenience for call sites that already know more input is coming
    /// (tests, and the READ builtin once it has decided to read).
    pub fn sread(&mut self, interp: &mut Interpreter) -> Result<Value, LispError> {
        self.sread_opt(interp)?.ok_or_else(|| LispError::Syntax("end of input".to_string()))
    }

    pub fn sread_with_prompt(&mut self, interp: &mut Interpreter, prompt: char) -> Result<Value, LispError> {
        self.sread_with_prompt_opt(interp, prompt)?
            .ok_or_else(|| LispError::Syntax("end of input".to_string()))
    }

    fn sread_expr(&mut self, interp: &mut Interpreter) -> Result<Value, LispError> {
        let token = self.next_token(interp)?;
        match token {
            Token::Datum(v) => Ok(v),
            Token::Quote => {
                let inner = self.sread_expr(interp)?;
                let quote_sym = interp.ordatom("QUOTE")?;
                let tail = interp.cons(inner, interp.nil())?;
                interp.cons(quote_sym, tail)
            }
            Token::Open => {
                self.source.prompt = '>';
                self.sread_list(interp)
            }
            Token::Dot | Token::Close => Err(LispError::Syntax("unexpected token".to_string())),
            Token::Eof => Err(LispError::Syntax("unexpected end of input".to_string())),
        }
    }

    fn sread_list(&mut self, interp: &mut Interpreter) -> Result<Value, LispError> {
        let head = interp.cons(interp.nil(), interp.nil())?;
        interp.sreadlist.push(head);

        let result = (|| -> Result<Value, LispError> {
            let first = self.sread_expr(interp)?;
            if let Value::Pair(idx) = head {
                interp.lists.set_car(idx, first);
            }
            let mut tail = head;
            loop {
                let token = self.next_token(interp)?;
                match token {
                    Token::Close => {
                        if let Value::Pair(idx) = tail {
                            interp.lists.set_cdr(idx, interp.nil());
                        }
                        break;
                    }
                    Token::Dot => {
                        let dotted = self.sread_expr(interp)?;
                        match self.next_token(interp)? {
                            Token::Close => {}
                            _ => return Err(LispError::Syntax("expected ')' after dotted tail".to_string())),
                        }
                        if let Value::Pair(idx) = tail {
                            interp.lists.set_cdr(idx, dotted);
                        }
                        break;
                    }
                    other => {
                        self.push_back(other);
                        let elem = self.sread_expr(interp)?;
                        let new_cell = interp.cons(elem, interp.nil())?;
                        if let Value::Pair(idx) = tail {
                            interp.lists.set_cdr(idx, new_cell);
                        }
                        tail = new_cell;
                    }
                }
            }
            Ok(head)
        })();

        interp.sreadlist.pop();
        result
    }
}
