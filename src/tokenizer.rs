//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond recognising the four operators, parentheses and decimal literals.

use std::fmt;

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end. Only `Num` carries a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Num(i64),
  Plus,
  Minus,
  Star,
  Slash,
  LParen,
  RParen,
  Eof,
}

impl TokenKind {
  fn from_punct(c: u8) -> Option<Self> {
    let kind = match c {
      b'+' => Self::Plus,
      b'-' => Self::Minus,
      b'*' => Self::Star,
      b'/' => Self::Slash,
      b'(' => Self::LParen,
      b')' => Self::RParen,
      _ => return None,
    };
    Some(kind)
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Num(value) => write!(f, "{value}"),
      Self::Plus => f.write_str("+"),
      Self::Minus => f.write_str("-"),
      Self::Star => f.write_str("*"),
      Self::Slash => f.write_str("/"),
      Self::LParen => f.write_str("("),
      Self::RParen => f.write_str(")"),
      Self::Eof => f.write_str("EOF"),
    }
  }
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }

  /// Numeric payload, present only for `Num` tokens.
  pub fn value(&self) -> Option<i64> {
    match self.kind {
      TokenKind::Num(value) => Some(value),
      _ => None,
    }
  }
}

/// Lex the input into a flat vector of tokens terminated by a single `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      i += 1;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let text = &input[start..i];
      let value = text
        .parse::<i64>()
        .map_err(|err| CompileError::lex(input, start, format!("invalid number: {err}")))?;
      tokens.push(Token::new(TokenKind::Num(value), start, i - start));
      continue;
    }

    if let Some(kind) = TokenKind::from_punct(c) {
      tokens.push(Token::new(kind, i, 1));
      i += 1;
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0));
  log::debug!("tokenized {} bytes into {} tokens", input.len(), tokens.len());
  Ok(tokens)
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: Option<&Token>, source: &str) -> String {
  match token {
    Some(t) => match t.kind {
      TokenKind::Eof => "EOF".to_string(),
      _ => token_text(t, source).to_string(),
    },
    None => "EOF".to_string(),
  }
}
