mod checks;
mod commands;
mod core;
mod export;
#[cfg(feature = "openapi")]
mod openapi;
mod ui;
mod utils;

use clap::{Args, Parser, Subcommand};
use core::config::{CheckSelection, SkipFlags};
use core::context::DocsContext;
use core::error::{DocsError, ExitCode, ResultExt, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ui::{ColorMode, Painter};

/// Build, validate and export MkDocs documentation
#[derive(Parser)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Config file (default: docgate.toml, .docgate.toml or .config/docgate.toml)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// When to colour output
  #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
  color: ColorMode,

  /// More diagnostics on stderr (-v debug, -vv trace); RUST_LOG overrides
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the documentation validation suite
  Validate(ValidateArgs),

  /// Production build into the dist directory, with full validation
  Build {
    /// Do not run pre-commit hooks
    #[arg(long)]
    skip_pre_commit: bool,
    /// Do not run the validation suite after building
    #[arg(long)]
    skip_validation: bool,
  },

  /// Export the site's print page to a single PDF
  Pdf {
    /// Output PDF path (default: pdf.output from config)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Built site directory (default: paths.site_dir from config)
    #[arg(long, value_name = "DIR")]
    site_dir: Option<PathBuf>,
    /// Use the existing site instead of building it first
    #[arg(long)]
    no_build: bool,
  },
}

#[derive(Args)]
struct ValidateArgs {
  /// Skip markdown syntax validation
  #[arg(long)]
  skip_markdown: bool,
  /// Skip MkDocs build validation
  #[arg(long)]
  skip_mkdocs: bool,
  /// Skip link validation
  #[arg(long)]
  skip_links: bool,
  /// Skip language/style validation
  #[arg(long)]
  skip_style: bool,
  /// Skip OpenAPI validation
  #[arg(long)]
  skip_openapi: bool,
  /// Skip slow validations (links, style)
  #[arg(long)]
  fast: bool,
  /// Gate the exit status on critical checks only
  #[arg(long)]
  critical_only: bool,
  /// Write the results as JSON
  #[arg(long, value_name = "PATH")]
  report: Option<PathBuf>,
}

impl ValidateArgs {
  fn selection(&self) -> CheckSelection {
    CheckSelection::from_flags(SkipFlags {
      skip_markdown: self.skip_markdown,
      skip_mkdocs: self.skip_mkdocs,
      skip_links: self.skip_links,
      skip_style: self.skip_style,
      skip_openapi: self.skip_openapi,
      fast: self.fast,
    })
  }
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "warn,docgate=debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match std::env::current_dir().context("Failed to get current directory") {
    Ok(dir) => dir,
    Err(e) => handle_error(e),
  };

  // Config and colour are settled once; commands only see the context
  let painter = Painter::new(cli.color);
  let ctx = match DocsContext::build(&root, cli.config.as_deref(), painter) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Validate(args) => {
      let options = commands::ValidateOptions {
        selection: args.selection(),
        critical_only: args.critical_only,
        report: args.report,
      };
      match commands::run_validate(&ctx, &options) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(ExitCode::Failure.as_i32()),
        Err(err) => Err(err),
      }
    }
    Commands::Build {
      skip_pre_commit,
      skip_validation,
    } => commands::run_build(
      &ctx,
      commands::BuildOptions {
        skip_pre_commit,
        skip_validation,
      },
    )
    .map(|_| ()),
    Commands::Pdf {
      output,
      site_dir,
      no_build,
    } => commands::run_pdf(
      &ctx,
      &commands::PdfOptions {
        output,
        site_dir,
        no_build,
      },
    )
    .map(|_| ()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: DocsError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
