//! Test support: a tiny interpreter for the Intel-syntax assembly we emit.

use std::collections::HashMap;
use std::sync::Once;

static INIT: Once = Once::new();

/// Route the library's `log` records through the test harness.
pub fn init_logger() {
  INIT.call_once(|| {
    let _ = env_logger::builder().is_test(true).try_init();
  });
}

/// Result of running a program on the simulated stack machine.
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
  pub value: i64,
  /// Stack depth observed right before the final `ret`.
  pub leftover: usize,
}

/// Execute the body of `main`, returning `%rax` at `ret`.
///
/// Arithmetic wraps like the hardware does. Division by zero and reads of
/// registers that were never written are reported as errors.
pub fn run(asm: &str) -> Result<Outcome, String> {
  let mut regs: HashMap<&str, i64> = HashMap::new();
  let mut stack: Vec<i64> = Vec::new();

  for line in asm.lines() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('.') || line.ends_with(':') {
      continue;
    }

    let (mnemonic, operands) = line.split_once(' ').unwrap_or((line, ""));
    let operands: Vec<&str> = operands
      .split(',')
      .map(str::trim)
      .filter(|op| !op.is_empty())
      .collect();
    let reg = |regs: &HashMap<&str, i64>, name: &str| {
      regs
        .get(name)
        .copied()
        .ok_or_else(|| format!("{line}: read of uninitialised {name}"))
    };

    match (mnemonic, operands.as_slice()) {
      ("mov", [dst, imm]) => {
        let value = imm.parse::<i64>().map_err(|e| format!("{line}: {e}"))?;
        regs.insert(*dst, value);
      }
      ("push", [src]) => stack.push(reg(&regs, src)?),
      ("pop", [dst]) => {
        let value = stack.pop().ok_or_else(|| format!("{line}: stack underflow"))?;
        regs.insert(*dst, value);
      }
      ("add", [dst, src]) => {
        let value = reg(&regs, dst)?.wrapping_add(reg(&regs, src)?);
        regs.insert(*dst, value);
      }
      ("sub", [dst, src]) => {
        let value = reg(&regs, dst)?.wrapping_sub(reg(&regs, src)?);
        regs.insert(*dst, value);
      }
      ("imul", [dst, src]) => {
        let value = reg(&regs, dst)?.wrapping_mul(reg(&regs, src)?);
        regs.insert(*dst, value);
      }
      ("cqo", []) => {
        let sign = if reg(&regs, "rax")? < 0 { -1 } else { 0 };
        regs.insert("rdx", sign);
      }
      ("idiv", [src]) => {
        let divisor = reg(&regs, src)?;
        if divisor == 0 {
          return Err(format!("{line}: division by zero"));
        }
        let dividend = reg(&regs, "rax")?;
        regs.insert("rax", dividend.wrapping_div(divisor));
        regs.insert("rdx", dividend.wrapping_rem(divisor));
      }
      ("ret", []) => {
        return Ok(Outcome {
          value: reg(&regs, "rax")?,
          leftover: stack.len(),
        });
      }
      _ => return Err(format!("unsupported instruction: {line}")),
    }
  }

  Err("program fell off the end without ret".to_string())
}
