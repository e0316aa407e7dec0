use clap::Parser;
use product_stemcell_resource::catalog::{PivnetClient, PivnetConfig};
use product_stemcell_resource::core::error::{ResourceError, ResourceResult, print_error};
use product_stemcell_resource::{CheckCommand, CheckRequest};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Report product/stemcell version pairs newer than the last one seen
///
/// Reads a check request as JSON on stdin and writes the new version pairs as
/// JSON on stdout. Logs go to stderr.
#[derive(Parser)]
#[command(name = "check")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Read the request from a file instead of stdin
  #[arg(long, value_name = "FILE")]
  request: Option<PathBuf>,

  /// Override the catalog endpoint given in the request
  #[arg(long, value_name = "URL")]
  endpoint: Option<String>,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> ResourceResult<()> {
  let input = read_input(cli.request.as_deref())?;
  let mut request = CheckRequest::from_json(&input)?;

  if let Some(endpoint) = cli.endpoint {
    request.source.endpoint = endpoint;
  }

  init_tracing(request.source.verbose);
  tracing::info!("Product stemcell resource version: {}", VERSION);

  request.validate()?;

  let client = PivnetClient::connect(PivnetConfig::from_source(&request.source, VERSION))?;
  let response = CheckCommand::new(client).run(&request)?;

  let mut stdout = io::stdout().lock();
  serde_json::to_writer(&mut stdout, &response)?;
  writeln!(stdout)?;
  Ok(())
}

fn read_input(path: Option<&Path>) -> ResourceResult<String> {
  match path {
    Some(path) => {
      std::fs::read_to_string(path).map_err(|e| {
        ResourceError::with_help(
          format!("Failed to read request from {}: {}", path.display(), e),
          "Pass an existing file to --request, or pipe the request on stdin",
        )
      })
    }
    None => {
      let mut input = String::new();
      io::stdin().read_to_string(&mut input)?;
      Ok(input)
    }
  }
}

/// Log to stderr; stdout carries the response
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}

fn handle_error(err: ResourceError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
