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

//! Module containing constants used by the analysis.

use crate::Float;

/// Fill value used by legacy observation files to mark
/// absent samples. Any sample equal to the configured fill
/// value is treated as missing when the input is loaded.
pub const DEFAULT_FILL_VALUE: Float = 999_999.0;

///Name of the configuration file read from working directory
pub const CONFIG_FILE: &str = "config.yaml";

///Default directory where the output is written
pub const DEFAULT_OUTPUT_DIR: &str = "./output/";

///Name of the output file with isosurface depth and averages
pub const OUTPUT_FILE: &str = "isosurface.csv";
