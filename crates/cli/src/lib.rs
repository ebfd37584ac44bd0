//! Command-line front end of the openapi-fetch client generator.

use clap::Parser;
use console::style;
use fetchgen_core::generate_from_path;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

pub mod args;
pub mod config;
pub mod logging;

use args::GenerateArgs;
use config::{FileConfig, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "openapi-fetch-gen",
    version,
    about = "Generate a typed openapi-fetch client class from openapi-typescript declarations"
)]
pub struct Cli {
    #[command(flatten)]
    pub args: GenerateArgs,
}

/// Parse `args` (program name first) and run, returning the exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => run(&cli.args),
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

pub fn run(args: &GenerateArgs) -> i32 {
    let started = Instant::now();
    match generate(args) {
        Ok(output) => {
            println!(
                "🏁 {} [{}ms]: {}",
                style("Successfully generated client at").green(),
                started.elapsed().as_millis(),
                output.display()
            );
            0
        }
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red().bold().for_stderr());
            1
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<PathBuf, String> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args, file)?;
    debug!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        options = ?settings.options,
        "Resolved settings."
    );

    if !settings.input.is_file() {
        return Err(format!(
            "Input file not found: {}",
            settings.input.display()
        ));
    }

    let code = generate_from_path(&settings.input, &settings.options)
        .map_err(|err| err.to_string())?;

    if let Some(parent) = settings.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create output directory: {err}"))?;
    }
    fs::write(&settings.output, code)
        .map_err(|err| format!("Failed to write {}: {err}", settings.output.display()))?;

    Ok(settings.output)
}
