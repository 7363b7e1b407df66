use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use thiserror::Error;

/// Location of a token or node in the source text.
///
/// `line` and `column` are 1-based character counts, `offset` is the byte
/// offset used to place diagnostic labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    pub fn start() -> Self {
        Self::new(1, 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    NonFatal,
}

/// Which pipeline stage raised an error; only used to title diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Runtime,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("expected {expected} but got {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("undefined variable {0}")]
    UndefinedVariable(String),

    #[error("not a function")]
    NotAFunction,

    #[error("extraneous argument in call")]
    ExtraneousArgument,

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("{builtin}: expected {expected} but got {found}")]
    WrongKind {
        builtin: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{builtin}: index {index} out of range for length {len}")]
    IndexOutOfRange {
        builtin: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{builtin}: {message}")]
    Builtin {
        builtin: &'static str,
        message: String,
    },

    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("stack overflow")]
    StackOverflow,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    pub fn stage(&self) -> Stage {
        match self {
            ErrorKind::UnexpectedCharacter(_) | ErrorKind::UnterminatedString => Stage::Lex,
            ErrorKind::UnexpectedToken { .. } => Stage::Parse,
            _ => Stage::Runtime,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ZyError {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub position: Option<Position>,
    pub help: Option<String>,
}

impl ZyError {
    pub fn fatal(kind: ErrorKind) -> Self {
        Self {
            kind,
            severity: Severity::Fatal,
            position: None,
            help: None,
        }
    }

    pub fn non_fatal(kind: ErrorKind) -> Self {
        Self {
            kind,
            severity: Severity::NonFatal,
            position: None,
            help: None,
        }
    }

    pub fn lex_error(position: Position, kind: ErrorKind) -> Self {
        Self::fatal(kind).at(position)
    }

    pub fn parse_error(position: Position, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::fatal(ErrorKind::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
        })
        .at(position)
    }

    pub fn runtime_error(position: Position, kind: ErrorKind) -> Self {
        Self::fatal(kind).at(position)
    }

    pub fn wrong_kind(builtin: &'static str, expected: &'static str, found: &'static str) -> Self {
        Self::fatal(ErrorKind::WrongKind {
            builtin,
            expected,
            found,
        })
    }

    pub fn builtin(builtin: &'static str, message: impl Into<String>) -> Self {
        Self::fatal(ErrorKind::Builtin {
            builtin,
            message: message.into(),
        })
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches `position` only if the error has none yet, so the innermost
    /// location wins while the error unwinds.
    pub fn or_at(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    /// Errors that must terminate the whole process, even in an interactive
    /// session that recovers from every other failure.
    pub fn ends_process(&self) -> bool {
        matches!(self.kind, ErrorKind::StackOverflow)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let (report_kind, color, severity) = match self.severity {
            Severity::Fatal => (ReportKind::Error, Color::Red, "fatal error"),
            Severity::NonFatal => (ReportKind::Warning, Color::Yellow, "error"),
        };

        let stage = match self.kind.stage() {
            Stage::Lex => "lexical",
            Stage::Parse => "parse",
            Stage::Runtime => "runtime",
        };

        // Labels are placed by character index. End-of-input errors, and
        // positions left over from an earlier REPL line, are clamped onto the
        // last character.
        let position = self.position.unwrap_or_else(Position::start);
        let chars = source.chars().count();
        let start = source
            .get(..position.offset)
            .map_or(chars, |prefix| prefix.chars().count())
            .min(chars.saturating_sub(1));
        let end = (start + 1).min(chars);

        let title = format!("{} {}: {}", severity, position, self.kind);
        let mut report_builder = Report::build(report_kind, filename, start)
            .with_message(title.fg(color))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(format!("{} error here", stage))
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder = report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(error) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            tracing::warn!(%error, "failed to write diagnostic");
        }
    }
}

pub type Result<T> = std::result::Result<T, ZyError>;
