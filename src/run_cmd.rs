//! `run` and `list` commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use crate::cli::RunArgs;
use crate::config::EnsoConfig;
use crate::convert;
use crate::figure::{self, Figure, FigureContext, FigureSummary};
use crate::{eof_cmd, gsat_cmd, precip_cmd, ssh_cmd, table_cmd};

/// Print every figure with its description and datasets.
pub fn list() {
    for f in Figure::ALL {
        println!("{:<4} {}  [{}]", f.id(), f.description(), f.datasets().join(", "));
    }
}

/// Load and parse a TOML configuration file.
pub fn load_config(path: &Path) -> Result<EnsoConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse TOML config: {}", path.display()))
}

/// Figures selected by a `run` argument.
fn select(figure: &str) -> Result<Vec<Figure>> {
    if figure.eq_ignore_ascii_case("all") {
        Ok(Figure::ALL.to_vec())
    } else {
        Ok(vec![figure.parse()?])
    }
}

/// Run the selected figures under `config`, returning their summaries.
///
/// A single figure fails hard. With `all`, figures whose datasets are not
/// configured are skipped with a warning, and the first failing figure
/// aborts the run.
pub fn run_figures(
    figures: &[Figure],
    config: &EnsoConfig,
    output_dir: &Path,
    reference_period: [i32; 2],
) -> Result<Vec<FigureSummary>> {
    let reference = convert::build_reference_period(reference_period)?;
    let ctx = FigureContext::new(config, output_dir.to_path_buf(), reference);

    let mut summaries = Vec::new();
    for &f in figures {
        if let Err(e) = figure::check_datasets(f, config) {
            if figures.len() == 1 {
                return Err(e);
            }
            warn!(figure = %f, "skipping: {e}");
            continue;
        }
        let _span = info_span!("figure", id = %f).entered();
        let summary = match f {
            Figure::F1a => eof_cmd::run(&ctx),
            Figure::F1b => gsat_cmd::run_f1b(&ctx),
            Figure::F1c => gsat_cmd::run_f1c(&ctx),
            Figure::F1d => precip_cmd::run(&ctx),
            Figure::F7a => ssh_cmd::run(&ctx),
            Figure::T1 => table_cmd::run(&ctx),
        }
        .with_context(|| format!("figure {f} failed"))?;
        let summary_path = ctx.write_summary(&summary)?;
        info!(figure = %f, summary = %summary_path.display(), "figure done");
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Entry point for `enso run`.
pub fn run(args: RunArgs) -> Result<()> {
    let figures = select(&args.figure)?;
    let config = load_config(&args.config)?;

    // CLI overrides take precedence over the file.
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let reference_period = match args.reference_period.as_deref() {
        Some(&[start, end]) => [start, end],
        Some(other) => bail!("--reference-period takes two years, got {other:?}"),
        None => config.reference_period,
    };

    let summaries = run_figures(&figures, &config, &output_dir, reference_period)?;
    if summaries.is_empty() {
        bail!("no figure could run with the configured datasets");
    }
    info!(
        figures = summaries.len(),
        output_dir = %output_dir.display(),
        "run complete"
    );
    Ok(())
}
