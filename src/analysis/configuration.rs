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

//! Module responsible for parsing and checking the configuration file.
//!
//! To provide meaningful error messages. The configuration file uses
//! [YAML](https://en.wikipedia.org/wiki/YAML) and `serde` to enforce
//! strong typing and automatic type checking.
//!
//! The structures and their fields in this module directly correspond to
//! the fields inside `config.yaml` so you can check this documentation
//! for more details how to set the config file.

use super::profile::{CrossingDirection, IsosurfaceKind, IsosurfaceTarget};
use crate::constants::{DEFAULT_FILL_VALUE, DEFAULT_OUTPUT_DIR};
use crate::errors::ConfigError;
use crate::Float;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Fields describing the searched isosurface.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
pub struct Isosurface {
    /// Value of the field (density, temperature or salinity)
    /// defining the surface, in the units of input data.
    ///
    /// Must be finite.
    pub target: Float,

    /// Physical quantity of the analysed field.
    /// Determines the default crossing direction.
    pub kind: IsosurfaceKind,

    /// _(Optional)_ Direction in which the field crosses the target
    /// when going deeper: `less_than` or `greater_than`.
    ///
    /// Defaults to `greater_than` for density and salinity,
    /// and to `less_than` for temperature.
    #[serde(default)]
    pub direction: Option<CrossingDirection>,
}

impl Isosurface {
    /// Checks if isosurface settings follow limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if !self.target.is_finite() {
            return Err(ConfigError::OutOfBounds("Target value must be finite"));
        }

        Ok(())
    }

    pub fn to_target(&self) -> IsosurfaceTarget {
        match self.direction {
            Some(direction) => IsosurfaceTarget::new(self.target, direction),
            None => IsosurfaceTarget::for_kind(self.target, self.kind),
        }
    }
}

/// Fields with information about input profile files.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Input {
    /// CSV file with samples of the analysed field.
    ///
    /// The file must have a header `row,col,depth,value` and contain
    /// one sample per line. Distinct depths form the vertical axis,
    /// which must be strictly monotonic.
    pub profile_file: PathBuf,

    /// _(Optional)_ CSV file with samples of a tracer to average
    /// above the surface, in the same format and on the same
    /// grid as `profile_file`.
    #[serde(default)]
    pub tracer_file: Option<PathBuf>,

    /// _(Optional)_ Value marking absent samples in input files.
    ///
    /// Defaults to `999999`. Must be finite.
    #[serde(default = "Input::default_fill_value")]
    pub fill_value: Float,
}

impl Input {
    fn default_fill_value() -> Float {
        DEFAULT_FILL_VALUE
    }

    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if !self.fill_value.is_finite() {
            return Err(ConfigError::OutOfBounds("Fill value must be finite"));
        }

        Ok(())
    }
}

/// _(Optional)_ Fields with information about the output.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Output {
    /// _(Optional)_ Directory to which the output is written.
    /// It must be empty or not exist.
    ///
    /// Defaults to `./output/`.
    #[serde(default = "Output::default_directory")]
    pub directory: PathBuf,
}

impl Output {
    fn default_directory() -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_DIR)
    }
}

impl Default for Output {
    fn default() -> Self {
        Output {
            directory: Output::default_directory(),
        }
    }
}

/// _(Optional)_ Fields with information about
/// resources available for the analysis.
#[derive(Clone, PartialEq, PartialOrd, Debug, Deserialize)]
pub struct Resources {
    /// _(Optional)_ Thread count used for processing columns.
    /// The thread pool will use up to this number of workers.
    ///
    /// Cannot be less than `1`. Defaults to `1`.
    #[serde(default = "Resources::default_threads")]
    pub threads: u16,

    /// _(Optional)_ Heap memory limit in MB.
    /// Useful for enabling meaningful Out-of-memory error messages.
    ///
    /// Cannot be less than `128`. Defaults to whole addressable-space
    /// (`2^32` or `2^64` bytes).
    ///
    /// Grids are kept in memory as a whole, so large inputs
    /// can exhaust the system memory. With the limit set below the
    /// available memory the allocator aborts with OOM error message
    /// instead of the process being killed without information.
    #[serde(default = "Resources::default_memory")]
    pub memory: usize,
}

impl Resources {
    fn default_threads() -> u16 {
        1
    }

    fn default_memory() -> usize {
        usize::MAX / (1024 * 1024)
    }

    /// Checks if thread count and memory limit are
    /// above limits.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if self.threads < 1 {
            return Err(ConfigError::OutOfBounds(
                "Available threads cannot be less than 1",
            ));
        }

        if self.memory < 128 {
            return Err(ConfigError::OutOfBounds(
                "Available memory cannot be less than 128 MB",
            ));
        }

        Ok(())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            threads: Resources::default_threads(),
            memory: Resources::default_memory(),
        }
    }
}

/// Main config structure representing the fields in
/// configuration file.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Config {
    pub isosurface: Isosurface,

    pub input: Input,

    #[serde(default)]
    pub output: Output,

    #[serde(default)]
    pub resources: Resources,
}

impl Config {
    /// Config structure constructor, responsible for
    /// deserializing configuration and checking it.
    pub fn new_from_file(file_path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(file_path)?;
        Config::new_from_slice(data.as_slice())
    }

    fn new_from_slice(data: &[u8]) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_slice(data)?;

        config.isosurface.check_bounds()?;
        config.input.check_bounds()?;
        config.resources.check_bounds()?;

        Ok(config)
    }
}
