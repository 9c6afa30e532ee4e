//! Categorised template failures.
//!
//! gtmpl reports failures as free text. [`classify_parse`] and
//! [`classify_exec`] sort that text into the kinds below so callers get a
//! stable category and a remediation hint.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure categories detected while parsing, before anything is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `{{if}}`, `{{range}}` or `{{with}}` block reached end of input.
    UnexpectedEof,
    /// `{{` without a matching `}}`.
    UnclosedAction,
    UnterminatedString,
    /// Stray `{{end}}`/`{{else}}`, misplaced keyword or operand.
    UnexpectedToken,
    UnknownFunction,
    /// An action with nothing to evaluate, e.g. `{{ }}` or `{{if}}`.
    EmptyPipeline,
}

/// Failure categories raised mid-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    FieldNotFound,
    WrongArity,
    /// Field access on a missing (nil) value.
    NilDereference,
    NotIterable,
    InvalidArgument,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template parse error in '{name}'{}: {detail}{}", at_line(.line), hint_suffix(.hint))]
    Parse {
        kind: ParseErrorKind,
        name: String,
        /// 1-based; 0 when the engine did not report a position.
        line: usize,
        detail: String,
        hint: Option<String>,
    },

    #[error("template execute error in '{name}'{}: {detail}{}", at_line(.line), hint_suffix(.hint))]
    Execute {
        kind: ExecErrorKind,
        name: String,
        line: usize,
        detail: String,
        hint: Option<String>,
    },
}

fn at_line(line: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {line}")
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!("\nHint: {h}"),
        None => String::new(),
    }
}

impl TemplateError {
    pub fn hint(&self) -> Option<&str> {
        match self {
            TemplateError::Parse { hint, .. } | TemplateError::Execute { hint, .. } => {
                hint.as_deref()
            }
        }
    }

    pub fn line(&self) -> usize {
        match self {
            TemplateError::Parse { line, .. } | TemplateError::Execute { line, .. } => *line,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, TemplateError::Parse { .. })
    }
}

static LINE_RE: OnceLock<Regex> = OnceLock::new();

/// Line number from a Go-style `name:LINE:` location, if the text has one.
fn line_of(detail: &str) -> usize {
    LINE_RE
        .get_or_init(|| Regex::new(r":(\d+):").expect("valid line pattern"))
        .captures(detail)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

pub(crate) fn parse_kind(detail: &str) -> ParseErrorKind {
    let d = detail.to_lowercase();
    if d.contains("unclosed action") {
        ParseErrorKind::UnclosedAction
    } else if d.contains("unterminated") {
        ParseErrorKind::UnterminatedString
    } else if d.contains("eof") {
        ParseErrorKind::UnexpectedEof
    } else if d.contains("not defined") || d.contains("function") {
        ParseErrorKind::UnknownFunction
    } else if d.contains("missing value") || d.contains("empty") {
        ParseErrorKind::EmptyPipeline
    } else {
        ParseErrorKind::UnexpectedToken
    }
}

pub(crate) fn exec_kind(detail: &str) -> ExecErrorKind {
    let d = detail.to_lowercase();
    if d.contains("wrong number of args") || d.contains("arguments") {
        ExecErrorKind::WrongArity
    } else if d.contains("nil") {
        ExecErrorKind::NilDereference
    } else if d.contains("range") || d.contains("iterate") {
        ExecErrorKind::NotIterable
    } else if d.contains("field") {
        ExecErrorKind::FieldNotFound
    } else {
        ExecErrorKind::InvalidArgument
    }
}

/// Wrap a gtmpl parse failure. `functions` is the function set the template
/// was parsed against.
pub(crate) fn classify_parse(name: &str, detail: String, functions: &[&str]) -> TemplateError {
    let kind = parse_kind(&detail);
    TemplateError::Parse {
        kind,
        name: name.to_string(),
        line: line_of(&detail),
        hint: parse_hint(kind, functions),
        detail,
    }
}

pub(crate) fn classify_exec(name: &str, detail: String, variables: &[&str]) -> TemplateError {
    let kind = exec_kind(&detail);
    TemplateError::Execute {
        kind,
        name: name.to_string(),
        line: line_of(&detail),
        hint: exec_hint(kind, variables),
        detail,
    }
}

/// Remediation hint for a parse failure. `functions` is the function set the
/// template was parsed against.
pub(crate) fn parse_hint(kind: ParseErrorKind, functions: &[&str]) -> Option<String> {
    let hint = match kind {
        ParseErrorKind::UnexpectedEof => {
            "check for an unclosed {{if}}, {{range}} or {{with}}: every block needs a matching {{end}}"
                .to_string()
        }
        ParseErrorKind::UnclosedAction => "every '{{' needs a matching '}}'".to_string(),
        ParseErrorKind::UnterminatedString => {
            "close string literals with a matching \" or `".to_string()
        }
        ParseErrorKind::UnexpectedToken => {
            "check for a stray {{end}} or {{else}}, or arguments given to a non-function".to_string()
        }
        ParseErrorKind::UnknownFunction => {
            format!("available functions: {}", functions.join(", "))
        }
        ParseErrorKind::EmptyPipeline => {
            "an action needs a field, literal or function call, e.g. {{.Arguments}}".to_string()
        }
    };
    Some(hint)
}

pub(crate) fn exec_hint(kind: ExecErrorKind, variables: &[&str]) -> Option<String> {
    match kind {
        ExecErrorKind::FieldNotFound => {
            Some(format!("available variables: {}", variables.join(", ")))
        }
        ExecErrorKind::NilDereference => {
            Some("guard optional values with {{if .Field}} ... {{end}}".to_string())
        }
        ExecErrorKind::NotIterable => Some("{{range}} works on lists and maps".to_string()),
        ExecErrorKind::WrongArity | ExecErrorKind::InvalidArgument => None,
    }
}
