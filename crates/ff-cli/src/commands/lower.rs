use crate::{CliError, Result};
use clap::{Args, ValueEnum};
use ff_core::ast::Program;
use ff_core::pretty::{pretty, PrettyOptions};
use ff_core::LoweringOptions;
use ff_optimize::{lower_program, LoweringOutcome};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// Indented source-like listing
    #[default]
    Pretty,
    /// The lowered program as JSON
    Json,
    /// Pass statistics as JSON
    Stats,
}

#[derive(Debug, Args)]
pub struct LowerArgs {
    /// Program in JSON form; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prefix for generated loop variables
    #[arg(long)]
    pub loop_var_prefix: Option<String>,

    /// Do not declare generated loop variables
    #[arg(long)]
    pub no_declare_loop_vars: bool,

    /// First value of the loop-variable counter
    #[arg(long)]
    pub start_counter: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub emit: EmitFormat,

    /// Prefix pretty-printed statements with their source line
    #[arg(long)]
    pub show_lines: bool,
}

impl LowerArgs {
    /// Environment defaults with command-line overrides applied.
    pub fn lowering_options(&self) -> LoweringOptions {
        let mut options = LoweringOptions::from_env();
        if let Some(prefix) = &self.loop_var_prefix {
            options = options.with_prefix(prefix.clone());
        }
        if self.no_declare_loop_vars {
            options = options.without_loop_var_decls();
        }
        if let Some(start) = self.start_counter {
            options.start_counter = start;
        }
        options
    }
}

pub fn lower_command(args: LowerArgs) -> Result<()> {
    let source = read_input(&args)?;
    let rendered = lower_source(&source, &args)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}

/// Lower the JSON program in `source` and render it as `args.emit` asks.
pub fn lower_source(source: &str, args: &LowerArgs) -> Result<String> {
    let program = Program::from_json(source)
        .map_err(|err| CliError::InvalidInput(format!("not a program: {}", err)))?;
    let options = args.lowering_options();
    debug!(?options, "lowering");
    let outcome = lower_program(program, &options)?;
    render(&outcome, args)
}

fn render(outcome: &LoweringOutcome, args: &LowerArgs) -> Result<String> {
    match args.emit {
        EmitFormat::Pretty => {
            let mut opts = PrettyOptions::default();
            opts.show_lines = args.show_lines;
            Ok(pretty(&outcome.program, opts).to_string())
        }
        EmitFormat::Json => Ok(outcome.program.to_json()?),
        EmitFormat::Stats => serde_json::to_string_pretty(&outcome.stats)
            .map_err(|err| CliError::InvalidInput(err.to_string())),
    }
}

fn read_input(args: &LowerArgs) -> Result<String> {
    match &args.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path).map_err(|err| {
            CliError::Io(io::Error::new(
                err.kind(),
                format!("Failed to read file {}: {err}", path.display()),
            ))
        }),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
