use std::fmt;

/// Which stage produced a [`ScriptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Runtime,
}

/// An error raised while lexing, parsing or running a demo script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl ScriptError {
    pub(crate) fn parse(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { kind: ErrorKind::Parse, message: msg.into(), line, col }
    }

    pub(crate) fn runtime(msg: impl Into<String>, pos: Pos) -> Self {
        Self { kind: ErrorKind::Runtime, message: msg.into(), line: pos.line, col: pos.col }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.kind {
            ErrorKind::Parse => "parse",
            ErrorKind::Runtime => "runtime",
        };
        write!(f, "{} error at {}:{}: {}", stage, self.line, self.col, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// A 1-based source position attached to tokens and AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}
