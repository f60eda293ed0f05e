//! Code generation: lower the expression tree into x86-64 assembly.
//!
//! The emitter uses a simple stack machine: every node leaves exactly one
//! value on the stack. Operands are popped into `%rdi` (right) and `%rax`
//! (left), combined, and the result is pushed back, so after the walk the
//! expression's value is the only thing left for `main` to return.

use crate::parser::{BinaryOp, Node};

/// Assembly dialect understood by GNU as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Syntax {
  #[default]
  Intel,
  Att,
}

/// Emit a complete assembly file whose `main` returns the value of `node`.
pub fn generate(node: &Node, syntax: Syntax) -> String {
  let mut emitter = Emitter::new(syntax);

  match syntax {
    Syntax::Intel => emitter.line(".intel_syntax noprefix"),
    Syntax::Att => emitter.line(".att_syntax prefix"),
  }
  emitter.line(".globl main");
  emitter.line("main:");

  emitter.expr(node);

  emitter.pop("rax");
  emitter.insn("ret");
  emitter.line(".section .note.GNU-stack,\"\",@progbits");

  log::debug!("generated {} bytes of {:?} assembly", emitter.asm.len(), syntax);
  emitter.asm
}

struct Emitter {
  syntax: Syntax,
  asm: String,
}

impl Emitter {
  fn new(syntax: Syntax) -> Self {
    Self {
      syntax,
      asm: String::new(),
    }
  }

  /// Post-order walk: left operand, right operand, then the operator.
  fn expr(&mut self, node: &Node) {
    match node {
      Node::Num { value } => {
        self.mov_imm("rax", *value);
        self.push("rax");
      }
      Node::Binary { op, lhs, rhs } => {
        self.expr(lhs);
        self.expr(rhs);
        self.pop("rdi");
        self.pop("rax");
        match op {
          BinaryOp::Add => self.op2("add", "rax", "rdi"),
          BinaryOp::Sub => self.op2("sub", "rax", "rdi"),
          BinaryOp::Mul => self.op2("imul", "rax", "rdi"),
          BinaryOp::Div => {
            self.insn("cqo");
            self.op1("idiv", "rdi");
          }
        }
        self.push("rax");
      }
    }
  }

  fn line(&mut self, text: &str) {
    self.asm.push_str(text);
    self.asm.push('\n');
  }

  fn insn(&mut self, mnemonic: &str) {
    self.asm.push_str(&format!("  {mnemonic}\n"));
  }

  fn push(&mut self, reg: &str) {
    self.op1("push", reg);
  }

  fn pop(&mut self, reg: &str) {
    self.op1("pop", reg);
  }

  fn op1(&mut self, mnemonic: &str, reg: &str) {
    let text = match self.syntax {
      Syntax::Intel => format!("  {mnemonic} {reg}\n"),
      Syntax::Att => format!("  {mnemonic} %{reg}\n"),
    };
    self.asm.push_str(&text);
  }

  /// Two-operand instruction; `dst` is both an input and the destination.
  fn op2(&mut self, mnemonic: &str, dst: &str, src: &str) {
    let text = match self.syntax {
      Syntax::Intel => format!("  {mnemonic} {dst}, {src}\n"),
      Syntax::Att => format!("  {mnemonic} %{src}, %{dst}\n"),
    };
    self.asm.push_str(&text);
  }

  fn mov_imm(&mut self, reg: &str, value: i64) {
    let text = match self.syntax {
      Syntax::Intel => format!("  mov {reg}, {value}\n"),
      Syntax::Att => format!("  mov ${value}, %{reg}\n"),
    };
    self.asm.push_str(&text);
  }
}
