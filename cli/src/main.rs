use std::env;
use std::io;
use std::io::Write;
use std::process;

use parseley::earley::parse_chart;
use parseley::{Error, Parser};

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [options]

Reads sentences from stdin and prints every derivation, one per parse.

Options:
  -h, --help    Print this message
  -t, --tokens  Print the token sequence before parsing
  -c, --chart   Print the parse chart (defaults to not printing)
  -e, --empty   Keep empty (zero-width) nodes in printed trees",
    prog_name
  )
}

struct Args {
  print_tokens: bool,
  print_chart: bool,
  show_empty: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    if v.is_empty() {
      return Err(Self::make_error_message("bad argument vector", "parseley"));
    }

    let mut iter = v.into_iter();
    let prog_name = iter.next().unwrap();

    let mut print_tokens = false;
    let mut print_chart = false;
    let mut show_empty = false;

    for o in iter {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-t" || o == "--tokens" {
        print_tokens = true;
      } else if o == "-c" || o == "--chart" {
        print_chart = true;
      } else if o == "-e" || o == "--empty" {
        show_empty = true;
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    Ok(Self {
      print_tokens,
      print_chart,
      show_empty,
    })
  }
}

fn parse(parser: &Parser, sentence: &str, opts: &Args) -> Result<(), Error> {
  if opts.print_tokens {
    for token in parser.tokenize(sentence) {
      println!("{}", token);
    }
    println!();
  }

  if opts.print_chart {
    let tokens = parser.tokenize(sentence);
    let chart = parse_chart(parser.grammar(), &tokens, parser.limits())?;
    println!("chart:\n{}", chart);
  }

  let trees = parser.parse(sentence)?;

  println!(
    "Parsed {} tree{}",
    trees.len(),
    if trees.len() == 1 { "" } else { "s" }
  );

  for tree in trees {
    if opts.show_empty {
      println!("{}\n", tree);
    } else {
      println!("{}\n", tree.without_empty_nodes());
    }
  }

  Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let parser = Parser::new()?;

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        match parse(&parser, input.trim(), &opts) {
          Ok(()) => {}
          // resource limits are recoverable; keep the repl alive
          Err(e @ Error::ResourceLimit { .. }) => eprintln!("{}", e),
          Err(e) => return Err(e.into()),
        }
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
