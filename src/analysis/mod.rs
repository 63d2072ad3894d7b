/*
Copyright 2022 Jakub Lewandowski

This file is part of Isopycnal Surface Analyzer (isopy).

Isopycnal Surface Analyzer (isopy) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Isopycnal Surface Analyzer (isopy) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Isopycnal Surface Analyzer (isopy). If not, see https://www.gnu.org/licenses/.
*/

//! Module containing the actual analysis code.
//!
//! The analysis reads the configuration and input profiles,
//! locates the isosurface in every column of the grid on the
//! thread pool, optionally averages the tracer above it, and
//! writes the results.

mod analyzer;
mod averager;
mod bisection;
mod column;
mod configuration;
mod interpolation;
mod loader;
mod locator;
mod profile;
mod writer;


use self::analyzer::IsopycnalSurfaceAnalyzer;
use self::column::{AverageField, ColumnValue, OutcomeSummary, SurfaceDepthField};
use self::configuration::Config;
use self::profile::{DepthAxis, ProfileGrid};
use crate::constants::CONFIG_FILE;
use crate::{errors::AnalysisError, ALLOCATOR};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use ndarray::Array2;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;

/// Main analysis function, responsible for all steps.
///
/// It reads the provided configuration and input data,
/// runs the analysis on the threadpool and writes the output.
pub fn main() -> Result<(), AnalysisError> {
    info!("Preparing the analysis core");

    let core = Core::new()?;

    writer::prepare_output_dir(&core.config.output.directory)?;

    let inputs = Inputs::load(&core.config)?;

    info!(
        "Analysing {} {} columns on {} levels",
        inputs.grid.shape()[1] * inputs.grid.shape()[2],
        core.config.isosurface.kind.surface_name(),
        inputs.axis.len()
    );

    let (surface, average) = core
        .threadpool
        .install(|| run_analysis(&core.config, &inputs))?;

    info!("Writing output");
    let out_path = writer::save_results(&core.config.output.directory, &surface, average.as_ref())?;
    info!("Results written to {}", out_path.display());

    Ok(())
}

/// Structure containing analysis prerequisites.
///
/// Before the analysis can start (and to run it safely),
/// configuration provided by the user must be
/// loaded and checked.
#[derive(Debug)]
pub struct Core {
    pub config: Config,
    pub threadpool: ThreadPool,
}

impl Core {
    pub fn new() -> Result<Self, AnalysisError> {
        debug!("Reading configuration from {}", CONFIG_FILE);
        let config = Config::new_from_file(Path::new(CONFIG_FILE))?;

        debug!("Setting memory limit");
        ALLOCATOR
            .set_limit(config.resources.memory.saturating_mul(1024 * 1024))
            .map_err(|_| AnalysisError::MemoryLimit)?;

        debug!("Setting up ThreadPool");
        let threadpool = ThreadPoolBuilder::new()
            .num_threads(config.resources.threads as usize)
            .stack_size(2 * 1024 * 1024)
            .build()?;

        Ok(Core { config, threadpool })
    }
}

/// Profile grids read from the input files.
#[derive(Debug)]
struct Inputs {
    grid: ProfileGrid,
    axis: DepthAxis,
    tracer: Option<ProfileGrid>,
}

impl Inputs {
    fn load(config: &Config) -> Result<Self, AnalysisError> {
        info!("Reading input profiles");

        let fill_value = config.input.fill_value;
        let (grid, axis) = loader::load_profiles(&config.input.profile_file, fill_value)?;

        let tracer = match &config.input.tracer_file {
            Some(path) => {
                let shape = (grid.shape()[1], grid.shape()[2]);
                Some(loader::load_profiles_on(path, fill_value, &axis, shape)?)
            }
            None => None,
        };

        Ok(Inputs { grid, axis, tracer })
    }
}

/// Locates the surface and averages the tracer if provided.
fn run_analysis(
    config: &Config,
    inputs: &Inputs,
) -> Result<(SurfaceDepthField, Option<AverageField>), AnalysisError> {
    let target = config.isosurface.to_target();

    let analyzer = IsopycnalSurfaceAnalyzer::new(&inputs.grid, &inputs.axis)?
        .with_progress(prepare_progress_bar());

    let surface = analyzer.surface_depth(&target)?;
    report_outcomes("Surface depth", &surface);

    let average = match &inputs.tracer {
        Some(tracer) => {
            let average = analyzer.average_above(tracer, &surface)?;
            report_outcomes("Tracer average", &average);
            Some(average)
        }
        None => None,
    };

    Ok((surface, average))
}

fn prepare_progress_bar() -> ProgressBar {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .progress_chars("#>-"),
    );

    progress
}

fn report_outcomes(name: &str, field: &Array2<ColumnValue>) {
    let summary = OutcomeSummary::of(field);

    info!(
        "{}: {} valid columns, {} missing",
        name,
        summary.valid,
        summary.missing()
    );

    if summary.missing() > 0 {
        debug!("{} missing columns by reason: {:?}", name, summary);
    }

    if summary.valid == 0 {
        warn!("{}: no column has a valid result, check the target value", name);
    }
}
