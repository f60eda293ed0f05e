//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – they quote the expression and
//! point at the offending byte with a caret, in the style of chibicc.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// The tokenizer met a character it does not understand.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Lex {
    expr_line: String,
    marker: String,
    message: String,
    loc: usize,
  },
  /// The token stream does not form a valid expression.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Parse {
    expr_line: String,
    marker: String,
    message: String,
    loc: usize,
  },
}

impl CompileError {
  /// Lexical error anchored at a byte offset in the source.
  pub fn lex(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = render_location(expr, loc);
    Self::Lex {
      expr_line,
      marker,
      message: message.into(),
      loc,
    }
  }

  /// Grammar error anchored at a byte offset in the source.
  pub fn parse(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = render_location(expr, loc);
    Self::Parse {
      expr_line,
      marker,
      message: message.into(),
      loc,
    }
  }

  pub fn loc(&self) -> usize {
    match self {
      Self::Lex { loc, .. } | Self::Parse { loc, .. } => *loc,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Lex { message, .. } | Self::Parse { message, .. } => message,
    }
  }

  pub fn is_lex(&self) -> bool {
    matches!(self, Self::Lex { .. })
  }

  pub fn is_parse(&self) -> bool {
    matches!(self, Self::Parse { .. })
  }
}

fn render_location(expr: &str, loc: usize) -> (String, String) {
  let expr_line = format!("'{expr}'");
  let safe_loc = loc.min(expr.len());
  let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
  let marker = format!("{}^", " ".repeat(char_offset));
  (expr_line, marker)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn caret_points_at_offending_byte() {
    let err = CompileError::lex("1+@2", 2, "invalid token: '@'");
    assert_eq!(err.to_string(), "'1+@2'\n   ^ invalid token: '@'");
    assert_eq!(err.loc(), 2);
    assert!(err.is_lex());
  }

  #[test]
  fn location_past_end_is_clamped() {
    let err = CompileError::parse("1+", 10, "expected a number");
    assert_eq!(err.to_string(), "'1+'\n   ^ expected a number");
    assert!(err.is_parse());
    assert_eq!(err.message(), "expected a number");
  }
}
