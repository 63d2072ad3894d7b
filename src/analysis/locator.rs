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

//! Module responsible for locating the depth of the isosurface
//! in every column of the profile grid.
//!
//! The profile is scanned from the shallowest level for the last
//! sample lying strictly on the shallow side of the surface. The
//! surface depth is then linearly interpolated between that sample
//! and its deeper neighbour.

use super::column::{ColumnValue, MissingReason, SurfaceDepthField};
use super::interpolation::interpolate_linear;
use super::profile::{DepthAxis, IsosurfaceTarget, ProfileGrid};
use crate::{errors::GridError, Float};
use log::debug;
use ndarray::{ArrayView1, Axis, Zip};

/// Computes the depth of the isosurface in each column of the grid.
///
/// Fails with [`GridError::ShapeMismatch`] before processing any column
/// if the axis does not match the depth dimension of the grid.
pub fn locate(
    grid: &ProfileGrid,
    axis: &DepthAxis,
    target: &IsosurfaceTarget,
) -> Result<SurfaceDepthField, GridError> {
    locate_with_progress(grid, axis, target, &|| {})
}

/// Same as [`locate`] but calls `on_column` after each processed column.
pub fn locate_with_progress(
    grid: &ProfileGrid,
    axis: &DepthAxis,
    target: &IsosurfaceTarget,
    on_column: &(dyn Fn() + Sync),
) -> Result<SurfaceDepthField, GridError> {
    axis.check_grid(grid, "profile grid")?;

    debug!(
        "Locating surface {:?} in grid of shape {:?}",
        target,
        grid.shape()
    );

    let surface = Zip::from(grid.lanes(Axis(0))).par_map_collect(|profile| {
        let depth = locate_in_profile(profile, axis, target);
        on_column();
        depth
    });

    Ok(surface)
}

/// Finds the surface depth in a single vertical profile.
fn locate_in_profile(
    profile: ArrayView1<Float>,
    axis: &DepthAxis,
    target: &IsosurfaceTarget,
) -> ColumnValue {
    let direction = target.direction;

    let last_above = (0..profile.len())
        .rev()
        .find(|&i| direction.is_above_surface(profile[i], target.value));

    let upper = match last_above {
        Some(i) if i + 1 < profile.len() => i,
        _ => return ColumnValue::Missing(MissingReason::NoCrossingFound),
    };
    let lower = upper + 1;

    if profile[lower].is_nan() {
        return ColumnValue::Missing(MissingReason::InvalidSample);
    }

    if !direction.is_ordered(profile[upper], profile[lower]) {
        return ColumnValue::Missing(MissingReason::AmbiguousCrossing);
    }

    let depth = interpolate_linear(
        target.value,
        (profile[upper], axis[upper]),
        (profile[lower], axis[lower]),
    );

    ColumnValue::valid(depth)
}
