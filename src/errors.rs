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

use crate::Float;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error while reading config.yaml: {0}")]
    Config(#[from] ConfigError),

    #[error("Error while creating ThreadPool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Error while loading input profiles: {0}")]
    Input(#[from] InputError),

    #[error("Error while analysing profile grid: {0}")]
    Grid(#[from] GridError),

    #[error("Error while writing output: {0}")]
    Output(#[from] OutputError),

    #[error("Cannot set memory limit lower than already allocated memory")]
    MemoryLimit,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open config.yaml: {0}")]
    CantOpenFile(#[from] std::io::Error),

    #[error("Cannot deserialize config.yaml: {0}")]
    CantDeserialize(#[from] serde_yaml::Error),

    #[error("Configuration component is out of bounds {0}")]
    OutOfBounds(&'static str),
}

/// Fatal errors of malformed grid or axis.
///
/// Conditions local to a single column are never reported
/// with this type, see [`crate::analysis::column::MissingReason`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Shape mismatch of {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("Depth axis is empty")]
    EmptyAxis,

    #[error("Depth axis is not strictly monotonic at index {0}")]
    NonMonotonicAxis(usize),

    #[error("Depth axis value at index {0} is not finite")]
    NonFiniteAxis(usize),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot read profiles file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Profiles do not form a valid grid: {0}")]
    Grid(#[from] GridError),

    #[error("Not enough data in input: {0}")]
    DataNotSufficient(&'static str),

    #[error("Sample at row {0}, col {1}, depth {2} is provided more than once")]
    DuplicateSample(usize, usize, Float),

    #[error("Depth {0} is not present on the reference depth axis")]
    UnknownDepth(Float),

    #[error("Sample at row {0}, col {1} is outside the reference grid")]
    OutOfShape(usize, usize),

    #[error("Grid of {0} levels, {1} rows and {2} cols is too large to allocate")]
    GridTooLarge(usize, usize, usize),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot write output file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot access output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output directory is faulty: {0}")]
    FaultyDirectory(&'static str),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Searched value is out of array bounds")]
    OutOfBounds,

    #[error("Searched array is empty")]
    EmptyArray,
}
