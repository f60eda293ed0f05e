use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use exprcc::{CompileError, Syntax, codegen, dump, parser, tokenizer};
use snafu::{ResultExt, Snafu};

#[derive(Parser)]
#[command(name = "exprcc")]
#[command(about = "Compile an arithmetic expression into x86-64 assembly", version)]
struct Cli {
  /// Expression to compile, e.g. "(2+3)*4"
  expr: String,

  /// Write assembly to this file instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Print tokens and the expression tree to stderr
  #[arg(short, long)]
  dump: bool,

  /// Assembly dialect
  #[arg(long, value_enum, default_value_t = Syntax::Intel)]
  syntax: Syntax,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

#[derive(Debug, Snafu)]
enum CliError {
  #[snafu(display("{source}"))]
  Compile { source: CompileError },

  #[snafu(display("failed to write {}: {source}", path.display()))]
  WriteOutput { path: PathBuf, source: io::Error },

  #[snafu(display("failed to write assembly to stdout: {source}"))]
  Stdout { source: io::Error },
}

fn run(cli: &Cli) -> Result<(), CliError> {
  let expr = cli.expr.as_str();
  let tokens = tokenizer::tokenize(expr).context(CompileSnafu)?;
  if cli.dump {
    eprintln!("=== Tokens ===");
    eprint!("{}", dump::format_tokens(&tokens, expr));
  }

  let tree = parser::parse(tokens, expr).context(CompileSnafu)?;
  if cli.dump {
    eprintln!("=== AST ===");
    eprint!("{}", dump::format_tree(&tree));
  }

  let asm = codegen::generate(&tree, cli.syntax);

  match &cli.output {
    Some(path) => {
      fs::write(path, &asm).context(WriteOutputSnafu { path: path.clone() })?;
      log::info!("wrote {} bytes to {}", asm.len(), path.display());
    }
    None => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(asm.as_bytes()).context(StdoutSnafu)?;
      stdout.flush().context(StdoutSnafu)?;
    }
  }
  Ok(())
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

  if let Err(err) = run(&cli) {
    eprintln!("{err}");
    process::exit(1);
  }
}
