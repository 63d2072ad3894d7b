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

//! Module responsible for writing the analysis results.

use super::column::{AverageField, ColumnValue, SurfaceDepthField};
use crate::constants::OUTPUT_FILE;
use crate::{errors::OutputError, Float};
use log::debug;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One output line describing a single column.
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnRecord {
    row: usize,
    col: usize,
    surface_depth: Option<Float>,
    surface_status: &'static str,
    tracer_average: Option<Float>,
    average_status: Option<&'static str>,
}

/// Checks the output directory and creates it when needed.
///
/// Existing directory must be empty, so the results of
/// previous runs are never overwritten.
pub fn prepare_output_dir(out_path: &Path) -> Result<(), OutputError> {
    debug!("Checking and setting output directory");

    if out_path.is_dir() {
        if out_path.read_dir()?.next().is_none() {
            debug!("Output directory exists but is empty so continuing");
        } else {
            return Err(OutputError::FaultyDirectory(
                "Output directory exists and is not empty",
            ));
        }
    } else {
        debug!("Output directory does not exist so creating a new one");
        fs::create_dir_all(out_path)?;
    }

    Ok(())
}

/// Writes surface depths (and averages if computed) of all
/// columns to CSV file, returning the path of the file.
///
/// Missing values are written as empty fields with the reason
/// in the corresponding status field.
pub fn save_results(
    out_dir: &Path,
    surface: &SurfaceDepthField,
    average: Option<&AverageField>,
) -> Result<PathBuf, OutputError> {
    let out_path = out_dir.join(OUTPUT_FILE);
    debug!("Writing results to {}", out_path.display());

    let mut out_file = csv::Writer::from_path(&out_path)?;

    for ((row, col), &surface_depth) in surface.indexed_iter() {
        let average_value: Option<ColumnValue> = average.map(|a| a[[row, col]]);

        out_file.serialize(ColumnRecord {
            row,
            col,
            surface_depth: surface_depth.value(),
            surface_status: surface_depth.label(),
            tracer_average: average_value.and_then(ColumnValue::value),
            average_status: average_value.map(ColumnValue::label),
        })?;
    }

    out_file.flush()?;

    Ok(out_path)
}
