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

//! Module responsible for reading profile grids from input files.
//!
//! Input is a long-format CSV file with one sample per line:
//!
//! ```text
//! row,col,depth,value
//! 0,0,0.0,1024.1
//! 0,0,10.0,1025.3
//! ```
//!
//! Empty values and values equal to the fill value are
//! read as NaN, so they are never used as valid samples.

use super::profile::{DepthAxis, ProfileGrid};
use crate::{errors::InputError, Float};
use float_cmp::approx_eq;
use log::debug;
use ndarray::Array3;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::path::Path;

#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
struct ProfileRecord {
    row: usize,
    col: usize,
    depth: Float,
    value: Option<Float>,
}

/// Reads samples from the file and constructs the grid
/// together with the depth axis.
pub fn load_profiles(
    path: &Path,
    fill_value: Float,
) -> Result<(ProfileGrid, DepthAxis), InputError> {
    debug!("Reading profiles from {}", path.display());

    let records = read_records(path)?;
    let axis = list_levels(&records)?;

    let shape = horizontal_shape(&records, &axis)?;
    let grid = assemble_grid(&records, &axis, shape, fill_value)?;

    debug!(
        "Read {} samples into grid of shape {:?} on {} depth axis",
        records.len(),
        grid.shape(),
        if axis.is_ascending() { "ascending" } else { "descending" }
    );

    Ok((grid, axis))
}

/// Reads samples from the file onto an already known
/// depth axis and horizontal shape.
pub fn load_profiles_on(
    path: &Path,
    fill_value: Float,
    axis: &DepthAxis,
    shape: (usize, usize),
) -> Result<ProfileGrid, InputError> {
    debug!("Reading profiles from {} onto reference grid", path.display());

    let records = read_records(path)?;
    assemble_grid(&records, axis, shape, fill_value)
}

fn read_records(path: &Path) -> Result<Vec<ProfileRecord>, InputError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut records = vec![];

    for record in reader.deserialize() {
        let record: ProfileRecord = record?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(InputError::DataNotSufficient(
            "Profiles file does not contain any samples",
        ));
    }

    Ok(records)
}

/// Hashable key of a depth level.
/// Both zeros are the same level.
fn level_key(depth: Float) -> u64 {
    if depth == 0.0 {
        0.0_f64.to_bits()
    } else {
        depth.to_bits()
    }
}

/// Function to get the list of unique levels
/// in the samples, ordered from the shallowest.
fn list_levels(records: &[ProfileRecord]) -> Result<DepthAxis, InputError> {
    debug!("Getting levels list");

    let mut unique_keys: FxHashSet<u64> = FxHashSet::default();
    let mut unique_levels: Vec<Float> = vec![];

    for record in records {
        if unique_keys.insert(level_key(record.depth)) {
            unique_levels.push(record.depth);
        }
    }

    unique_levels.sort_by(|a, b| a.abs().total_cmp(&b.abs()));

    Ok(DepthAxis::new(unique_levels)?)
}

/// Smallest horizontal shape covering indices of all samples.
fn horizontal_shape(
    records: &[ProfileRecord],
    axis: &DepthAxis,
) -> Result<(usize, usize), InputError> {
    let max_row = records.iter().map(|r| r.row).max().unwrap_or(0);
    let max_col = records.iter().map(|r| r.col).max().unwrap_or(0);

    match (max_row.checked_add(1), max_col.checked_add(1)) {
        (Some(rows), Some(cols)) => Ok((rows, cols)),
        _ => Err(InputError::GridTooLarge(axis.len(), max_row, max_col)),
    }
}

/// Checks that the grid of given dimensions can be addressed,
/// ndarray panics on shapes with more than `isize::MAX` bytes.
fn check_grid_size(levels: usize, shape: (usize, usize)) -> Result<(), InputError> {
    let bytes = levels
        .checked_mul(shape.0)
        .and_then(|n| n.checked_mul(shape.1))
        .and_then(|n| n.checked_mul(std::mem::size_of::<Float>()));

    match bytes {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(InputError::GridTooLarge(levels, shape.0, shape.1)),
    }
}

/// Places the samples in 3D array, absent samples are NaN.
fn assemble_grid(
    records: &[ProfileRecord],
    axis: &DepthAxis,
    shape: (usize, usize),
    fill_value: Float,
) -> Result<ProfileGrid, InputError> {
    let level_index: FxHashMap<u64, usize> = axis
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &depth)| (level_key(depth), i))
        .collect();

    check_grid_size(axis.len(), shape)?;

    let grid_shape = (axis.len(), shape.0, shape.1);
    let mut grid = Array3::from_elem(grid_shape, Float::NAN);
    let mut filled = Array3::from_elem(grid_shape, false);

    for record in records {
        let level = *level_index
            .get(&level_key(record.depth))
            .ok_or(InputError::UnknownDepth(record.depth))?;

        if record.row >= shape.0 || record.col >= shape.1 {
            return Err(InputError::OutOfShape(record.row, record.col));
        }

        let index = [level, record.row, record.col];

        if filled[index] {
            return Err(InputError::DuplicateSample(
                record.row,
                record.col,
                record.depth,
            ));
        }

        filled[index] = true;
        grid[index] = match record.value {
            Some(v) if !approx_eq!(Float, v, fill_value) => v,
            _ => Float::NAN,
        };
    }

    let absent = filled.iter().filter(|&&f| !f).count();

    if absent > 0 {
        debug!("{} samples are absent from the grid and set as missing", absent);
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::{load_profiles, load_profiles_on};
    use crate::analysis::profile::DepthAxis;
    use crate::errors::{GridError, InputError};
    use std::{fs, path::PathBuf};

    fn write_input(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "isopy_loader_{}_{}.csv",
            std::process::id(),
            name
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn grid_from_long_format() {
        let path = write_input(
            "long_format",
            "row,col,depth,value
0,0,10.0,2.0
0,0,0.0,1.0
1,0,0.0,3.0
1,0,10.0,999999
0,1,0.0,
",
        );

        let (grid, axis) = load_profiles(&path, 999_999.0).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(axis.as_slice(), &[0.0, 10.0]);
        assert_eq!(grid.shape(), &[2, 2, 2]);
        assert_eq!(grid[[0, 0, 0]], 1.0);
        assert_eq!(grid[[1, 0, 0]], 2.0);
        assert_eq!(grid[[0, 1, 0]], 3.0);
        assert!(grid[[1, 1, 0]].is_nan());
        assert!(grid[[0, 0, 1]].is_nan());
        assert!(grid[[1, 1, 1]].is_nan());
    }

    #[test]
    fn negative_depths_are_ordered_from_surface() {
        let path = write_input(
            "negative",
            "row,col,depth,value
0,0,-20.0,3.0
0,0,-0.0,1.0
0,0,-10.0,2.0
",
        );

        let (grid, axis) = load_profiles(&path, 999_999.0).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(!axis.is_ascending());
        assert_eq!(axis.len(), 3);
        assert_eq!(grid[[2, 0, 0]], 3.0);
    }

    #[test]
    fn duplicate_sample() {
        let path = write_input(
            "duplicate",
            "row,col,depth,value
0,0,0.0,1.0
0,0,0.0,2.0
",
        );

        let result = load_profiles(&path, 999_999.0);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(InputError::DuplicateSample(0, 0, _))));
    }

    #[test]
    fn empty_file() {
        let path = write_input("empty", "row,col,depth,value\n");

        let result = load_profiles(&path, 999_999.0);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(InputError::DataNotSufficient(_))));
    }

    #[test]
    fn oversized_indices() {
        let path = write_input(
            "index_overflow",
            "row,col,depth,value
18446744073709551615,0,0.0,1.0
",
        );

        let result = load_profiles(&path, 999_999.0);
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(InputError::GridTooLarge(1, 18446744073709551615, 0))
        ));

        let path = write_input(
            "size_overflow",
            "row,col,depth,value
1000000000000000,1000000,0.0,1.0
",
        );

        let result = load_profiles(&path, 999_999.0);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(InputError::GridTooLarge(..))));
    }

    #[test]
    fn mixed_sign_depths_are_not_monotonic() {
        let path = write_input(
            "mixed",
            "row,col,depth,value
0,0,0.0,1.0
0,0,10.0,2.0
0,0,-20.0,3.0
",
        );

        let result = load_profiles(&path, 999_999.0);
        fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(InputError::Grid(GridError::NonMonotonicAxis(_)))
        ));
    }

    #[test]
    fn onto_reference_grid() {
        let axis = DepthAxis::new(vec![0.0, 10.0]).unwrap();

        let path = write_input(
            "reference",
            "row,col,depth,value
0,0,0.0,1.0
",
        );
        let grid = load_profiles_on(&path, 999_999.0, &axis, (2, 3)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(grid.shape(), &[2, 2, 3]);
        assert_eq!(grid[[0, 0, 0]], 1.0);

        let path = write_input(
            "unknown_depth",
            "row,col,depth,value
0,0,5.0,1.0
",
        );
        let result = load_profiles_on(&path, 999_999.0, &axis, (2, 3));
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(InputError::UnknownDepth(_))));

        let path = write_input(
            "out_of_shape",
            "row,col,depth,value
2,0,0.0,1.0
",
        );
        let result = load_profiles_on(&path, 999_999.0, &axis, (2, 3));
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(InputError::OutOfShape(2, 0))));
    }
}
