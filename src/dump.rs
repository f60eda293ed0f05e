//! Human-readable renderings of the intermediate stages, used by `--dump`.

use crate::parser::Node;
use crate::tokenizer::{Token, TokenKind, token_text};

/// One line per token: index, kind, source text and, for numbers, the value.
pub fn format_tokens(tokens: &[Token], source: &str) -> String {
  let mut out = String::new();
  for (i, token) in tokens.iter().enumerate() {
    let line = match token.kind {
      TokenKind::Num(value) => format!(
        "[{i}] NUM({:?}) val={value} @{}\n",
        token_text(token, source),
        token.loc
      ),
      TokenKind::Eof => format!("[{i}] EOF @{}\n", token.loc),
      kind => format!("[{i}] PUNCT({:?}) @{}\n", kind.to_string(), token.loc),
    };
    out.push_str(&line);
  }
  out
}

/// Draw the tree with box-drawing connectors, operators in parentheses.
pub fn format_tree(node: &Node) -> String {
  let mut out = String::new();
  write_tree(node, "", true, &mut out);
  out
}

fn write_tree(node: &Node, prefix: &str, is_tail: bool, out: &mut String) {
  let (connector, extension) = if is_tail {
    ("└── ", "    ")
  } else {
    ("├── ", "│   ")
  };

  match node {
    Node::Num { value } => {
      out.push_str(&format!("{prefix}{connector}{value}\n"));
    }
    Node::Binary { op, lhs, rhs } => {
      out.push_str(&format!("{prefix}{connector}({op})\n"));
      let child_prefix = format!("{prefix}{extension}");
      write_tree(lhs, &child_prefix, false, out);
      write_tree(rhs, &child_prefix, true, out);
    }
  }
}
