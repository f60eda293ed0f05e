//! Recursive-descent parser producing an expression tree.
//!
//! Each precedence level is one helper that parses an operand at the next
//! tighter level and then folds operators of its own level into the running
//! result, which makes every operator left-associative:
//!
//! ```text
//! expr    = mul ("+" mul | "-" mul)*
//! mul     = primary ("*" primary | "/" primary)*
//! primary = num | "(" expr ")"
//! ```

use std::fmt;

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token};

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl BinaryOp {
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Sub => "-",
      Self::Mul => "*",
      Self::Div => "/",
    }
  }

  /// Apply the operator with checked, truncating integer arithmetic.
  pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
    match self {
      Self::Add => lhs.checked_add(rhs),
      Self::Sub => lhs.checked_sub(rhs),
      Self::Mul => lhs.checked_mul(rhs),
      Self::Div => lhs.checked_div(rhs),
    }
  }
}

impl fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Expression tree produced by the parser. Operator nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<Node>,
    rhs: Box<Node>,
  },
}

impl Node {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  /// Evaluate the tree directly. `None` on division by zero or overflow.
  pub fn evaluate(&self) -> Option<i64> {
    match self {
      Self::Num { value } => Some(*value),
      Self::Binary { op, lhs, rhs } => op.apply(lhs.evaluate()?, rhs.evaluate()?),
    }
  }

  /// Height of the tree; a lone literal has depth 1.
  pub fn depth(&self) -> usize {
    match self {
      Self::Num { .. } => 1,
      Self::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
    }
  }
}

/// Deepest tree (and deepest parenthesis nesting) the parser will build.
/// The later stages recurse over the tree, so this bounds their stack use.
pub const MAX_DEPTH: usize = 256;

/// Parse a single expression that must span the whole token stream.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Node> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::parse(source, 0, "expression is empty"));
  }

  let (node, depth) = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let token = stream.peek().ok_or_else(|| {
      CompileError::parse(
        source,
        source.len(),
        "unexpected end of input after expression",
      )
    })?;
    let got = describe_token(Some(token), source);
    return Err(CompileError::parse(
      source,
      token.loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  log::debug!("parsed expression tree of depth {depth}");
  Ok(node)
}

/// A parsed subtree together with its height.
type Parsed = (Node, usize);

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut lhs = parse_mul(stream)?;

  loop {
    let op = match stream.peek().map(|token| token.kind) {
      Some(TokenKind::Plus) => BinaryOp::Add,
      Some(TokenKind::Minus) => BinaryOp::Sub,
      _ => break,
    };

    let op_loc = stream.loc();
    stream.advance();
    let rhs = parse_mul(stream)?;
    lhs = fold(stream, op_loc, op, lhs, rhs)?;
  }

  Ok(lhs)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let mut lhs = parse_primary(stream)?;

  loop {
    let op = match stream.peek().map(|token| token.kind) {
      Some(TokenKind::Star) => BinaryOp::Mul,
      Some(TokenKind::Slash) => BinaryOp::Div,
      _ => break,
    };

    let op_loc = stream.loc();
    stream.advance();
    let rhs_loc = stream.loc();
    let rhs = parse_primary(stream)?;
    if op == BinaryOp::Div && rhs.0 == Node::number(0) {
      return Err(CompileError::parse(
        stream.source,
        rhs_loc,
        "division by zero",
      ));
    }
    lhs = fold(stream, op_loc, op, lhs, rhs)?;
  }

  Ok(lhs)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Parsed> {
  let open_loc = stream.loc();
  if stream.equal(TokenKind::LParen) {
    stream.nesting += 1;
    if stream.nesting > MAX_DEPTH {
      return Err(too_deep(stream.source, open_loc));
    }
    let parsed = parse_expr(stream)?;
    stream.skip(TokenKind::RParen)?;
    stream.nesting -= 1;
    return Ok(parsed);
  }

  let value = stream.get_number()?;
  Ok((Node::number(value), 1))
}

/// Combine two operands under `op`, refusing trees deeper than `MAX_DEPTH`.
fn fold(
  stream: &TokenStream,
  op_loc: usize,
  op: BinaryOp,
  (lhs, lhs_depth): Parsed,
  (rhs, rhs_depth): Parsed,
) -> CompileResult<Parsed> {
  let depth = 1 + lhs_depth.max(rhs_depth);
  if depth > MAX_DEPTH {
    return Err(too_deep(stream.source, op_loc));
  }
  Ok((Node::binary(op, lhs, rhs), depth))
}

fn too_deep(source: &str, loc: usize) -> CompileError {
  CompileError::parse(source, loc, "expression nested too deeply")
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
  /// Parentheses currently open.
  nesting: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
      nesting: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn advance(&mut self) {
    if self.pos < self.tokens.len() {
      self.pos += 1;
    }
  }

  /// Byte offset of the current token, or the end of input once exhausted.
  fn loc(&self) -> usize {
    self.peek().map_or(self.source.len(), |token| token.loc)
  }

  /// Consume the current token if it is of the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    if self.peek().is_some_and(|token| token.kind == kind) {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, kind: TokenKind) -> CompileResult<()> {
    if self.equal(kind) {
      Ok(())
    } else {
      let got = describe_token(self.peek(), self.source);
      Err(CompileError::parse(
        self.source,
        self.loc(),
        format!("expected \"{kind}\", but got \"{got}\""),
      ))
    }
  }

  /// Consume the current token as an integer literal.
  fn get_number(&mut self) -> CompileResult<i64> {
    if let Some(token) = self.peek()
      && let TokenKind::Num(value) = token.kind
    {
      self.pos += 1;
      return Ok(value);
    }

    let got = describe_token(self.peek(), self.source);
    Err(CompileError::parse(
      self.source,
      self.loc(),
      format!("expected a number or \"(\", but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof) | None)
  }
}
