//! `forest-cli`: build a forest from the command line.
//!
//! ```text
//! forest-cli <length> <angle> <scale> <count> [--json] [--task] [--config <path>]
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use log::info;

use crate::config::{ForestConfig, load_config};
use crate::error::LibraryError;
use crate::evaluation::driver::{Collected, EvaluationDriver};
use crate::model::forest::Forest;
use crate::model::parameters::BranchParameters;

const USAGE: &str = "usage: forest-cli <length> <angle> <scale> <count> [--json] [--task] [--config <path>]";

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub params: BranchParameters,
    pub json: bool,
    pub task: bool,
    pub config_path: Option<PathBuf>,
}

impl CliOptions {
    /// Parse everything after the program name.
    pub fn parse(args: &[String]) -> Result<Self, LibraryError> {
        let mut positional = Vec::new();
        let mut json = false;
        let mut task = false;
        let mut config_path = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--task" => task = true,
                "--config" => {
                    let path = iter.next().ok_or_else(|| {
                        LibraryError::InvalidArgument("--config needs a path".to_string())
                    })?;
                    config_path = Some(PathBuf::from(path));
                }
                _ => positional.push(arg.as_str()),
            }
        }

        let [length, angle, scale, count] = positional[..] else {
            return Err(LibraryError::InvalidArgument(USAGE.to_string()));
        };

        Ok(Self {
            params: BranchParameters::new(
                parse_number(length, "length")?,
                parse_number(angle, "angle")?,
                parse_number(scale, "scale")?,
                count.parse().map_err(|_| {
                    LibraryError::InvalidArgument(format!("count must be an integer, got '{}'", count))
                })?,
            ),
            json,
            task,
            config_path,
        })
    }
}

fn parse_number(value: &str, name: &str) -> Result<f64, LibraryError> {
    value
        .parse()
        .map_err(|_| LibraryError::InvalidArgument(format!("{} must be a number, got '{}'", name, value)))
}

pub fn run(args: Vec<String>) -> Result<(), LibraryError> {
    let options = CliOptions::parse(args.get(1..).unwrap_or_default())?;
    let config = match &options.config_path {
        Some(path) => ForestConfig::load_from_path(path)?,
        None => load_config(),
    };

    let forest = if options.task {
        let driver = EvaluationDriver::new(config.driver_config());
        let handle = driver.submit(options.params)?;
        info!("Waiting for computation {}", handle.id());
        match driver.wait(handle) {
            Collected::Ready(forest) => Forest::clone(&forest),
            Collected::Cancelled | Collected::NotReady(_) => {
                return Err(LibraryError::Runtime("computation was cancelled".to_string()));
            }
        }
    } else {
        config.builder().build(&options.params)
    };

    let stdout = io::stdout();
    render(&forest, options.json, &mut stdout.lock())
}

pub fn render(forest: &Forest, json: bool, out: &mut impl Write) -> Result<(), LibraryError> {
    if json {
        let report = serde_json::json!({
            "count": forest.count(),
            "segments": forest.segments(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "count: {}", forest.count())?;
    for (index, line) in forest.segments().iter().enumerate() {
        writeln!(
            out,
            "{:>6}  ({:.6}, {:.6}, {:.6}) -> ({:.6}, {:.6}, {:.6})",
            index, line.from.x, line.from.y, line.from.z, line.to.x, line.to.y, line.to.z
        )?;
    }
    Ok(())
}
