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

//! Module responsible for computing thickness-weighted
//! vertical averages of a field above the isosurface.
//!
//! Each layer between two adjacent levels is represented by
//! the mean of its bounding samples and weighted by its absolute
//! thickness, so ascending and descending axes give the same result.

use super::bisection;
use super::column::{AverageField, ColumnValue, MissingReason, SurfaceDepthField};
use super::profile::{DepthAxis, ProfileGrid};
use crate::{errors::GridError, Float};
use log::debug;
use ndarray::{ArrayView1, Axis, Zip};

/// Averages `field` over all layers above the level nearest
/// to the surface depth in each column.
///
/// Columns with missing surface keep the reason of the surface.
pub fn average_above_surface(
    field: &ProfileGrid,
    surface: &SurfaceDepthField,
    axis: &DepthAxis,
) -> Result<AverageField, GridError> {
    average_above_surface_with_progress(field, surface, axis, &|| {})
}

/// Same as [`average_above_surface`] but calls `on_column`
/// after each processed column.
pub fn average_above_surface_with_progress(
    field: &ProfileGrid,
    surface: &SurfaceDepthField,
    axis: &DepthAxis,
    on_column: &(dyn Fn() + Sync),
) -> Result<AverageField, GridError> {
    axis.check_grid(field, "averaged field")?;

    let horizontal_shape = (field.shape()[1], field.shape()[2]);

    if horizontal_shape != surface.dim() {
        return Err(GridError::ShapeMismatch {
            what: "averaged field",
            expected: format!("{:?} columns", surface.dim()),
            found: format!("{:?} columns", horizontal_shape),
        });
    }

    debug!(
        "Averaging field of shape {:?} above surface",
        field.shape()
    );

    let average = Zip::from(field.lanes(Axis(0)))
        .and(surface)
        .par_map_collect(|profile, &surface_depth| {
            let average = average_profile(profile, surface_depth, axis);
            on_column();
            average
        });

    Ok(average)
}

fn average_profile(
    profile: ArrayView1<Float>,
    surface_depth: ColumnValue,
    axis: &DepthAxis,
) -> ColumnValue {
    let depth = match surface_depth {
        ColumnValue::Valid(depth) => depth,
        missing => return missing,
    };

    let surface_index = match bisection::find_nearest(axis.as_slice(), depth) {
        Ok(i) => i,
        Err(_) => return ColumnValue::Missing(MissingReason::InvalidSample),
    };

    if surface_index == 0 {
        return ColumnValue::Missing(MissingReason::SurfaceAtTop);
    }

    let mut weighted_sum = 0.0;
    let mut thickness_sum = 0.0;

    for k in 0..surface_index {
        let layer_value = 0.5 * (profile[k] + profile[k + 1]);
        let thickness = axis.thickness(k);

        weighted_sum += layer_value * thickness;
        thickness_sum += thickness;
    }

    ColumnValue::valid(weighted_sum / thickness_sum)
}

#[cfg(test)]
mod tests {
    use super::{average_above_surface, average_profile};
    use crate::analysis::column::{ColumnValue, MissingReason};
    use crate::analysis::profile::DepthAxis;
    use crate::errors::GridError;
    use float_cmp::approx_eq;
    use ndarray::{arr1, arr2, Array2, Array3};

    fn axis() -> DepthAxis {
        DepthAxis::new(vec![0.0, 10.0, 20.0, 30.0]).unwrap()
    }

    #[test]
    fn uniform_layers() {
        let profile = arr1(&[10.0, 12.0, 14.0, 16.0]);

        // layers (11, 13) with equal thickness
        let average = average_profile(profile.view(), ColumnValue::Valid(20.0), &axis());
        assert!(approx_eq!(f64, average.value().unwrap(), 12.0, ulps = 2));
    }

    #[test]
    fn uneven_layers_are_thickness_weighted() {
        let axis = DepthAxis::new(vec![0.0, 10.0, 40.0]).unwrap();
        let profile = arr1(&[10.0, 20.0, 30.0]);

        // layers 15 * 10 and 25 * 30
        let average = average_profile(profile.view(), ColumnValue::Valid(40.0), &axis);
        assert!(approx_eq!(f64, average.value().unwrap(), 22.5, ulps = 2));
    }

    #[test]
    fn surface_on_sample_uses_that_index() {
        let profile = arr1(&[10.0, 12.0, 14.0, 100.0]);

        // surface exactly at 10 m averages only the first layer
        let average = average_profile(profile.view(), ColumnValue::Valid(10.0), &axis());
        assert_eq!(average, ColumnValue::Valid(11.0));

        let average = average_profile(profile.view(), ColumnValue::Valid(20.0), &axis());
        assert_eq!(average, ColumnValue::Valid(12.0));
    }

    #[test]
    fn surface_rounds_to_nearest_level() {
        let profile = arr1(&[10.0, 12.0, 14.0, 100.0]);

        let shallower = average_profile(profile.view(), ColumnValue::Valid(14.0), &axis());
        assert_eq!(shallower, ColumnValue::Valid(11.0));

        let deeper = average_profile(profile.view(), ColumnValue::Valid(16.0), &axis());
        assert_eq!(deeper, ColumnValue::Valid(12.0));
    }

    #[test]
    fn surface_at_top() {
        let profile = arr1(&[10.0, 12.0, 14.0, 16.0]);

        for depth in [0.0, 4.9, -3.0] {
            let average = average_profile(profile.view(), ColumnValue::Valid(depth), &axis());
            assert_eq!(average, ColumnValue::Missing(MissingReason::SurfaceAtTop));
        }
    }

    #[test]
    fn missing_surface_keeps_reason() {
        let profile = arr1(&[10.0, 12.0, 14.0, 16.0]);

        for reason in [
            MissingReason::NoCrossingFound,
            MissingReason::AmbiguousCrossing,
            MissingReason::InvalidSample,
        ] {
            let average =
                average_profile(profile.view(), ColumnValue::Missing(reason), &axis());
            assert_eq!(average, ColumnValue::Missing(reason));
        }
    }

    #[test]
    fn nan_in_layers_is_invalid() {
        let profile = arr1(&[10.0, f64::NAN, 14.0, 16.0]);

        let average = average_profile(profile.view(), ColumnValue::Valid(20.0), &axis());
        assert_eq!(average, ColumnValue::Missing(MissingReason::InvalidSample));

        // NaN below the surface level is not averaged
        let profile = arr1(&[10.0, 12.0, 14.0, f64::NAN]);
        let average = average_profile(profile.view(), ColumnValue::Valid(20.0), &axis());
        assert_eq!(average, ColumnValue::Valid(12.0));
    }

    #[test]
    fn descending_axis_matches_ascending() {
        let ascending = axis();
        let descending = DepthAxis::new(vec![0.0, -10.0, -20.0, -30.0]).unwrap();
        let profile = arr1(&[3.0, 7.0, 2.0, 9.0]);

        let up = average_profile(profile.view(), ColumnValue::Valid(30.0), &ascending);
        let down = average_profile(profile.view(), ColumnValue::Valid(-30.0), &descending);

        assert_eq!(up, down);
        assert!(up.value().unwrap() > 0.0);
    }

    #[test]
    fn grid_average() {
        let mut field = Array3::zeros((4, 1, 2));
        field
            .slice_mut(ndarray::s![.., 0, 0])
            .assign(&arr1(&[10.0, 12.0, 14.0, 16.0]));
        field
            .slice_mut(ndarray::s![.., 0, 1])
            .assign(&arr1(&[1.0, 3.0, 5.0, 7.0]));

        let surface = arr2(&[[
            ColumnValue::Valid(30.0),
            ColumnValue::Missing(MissingReason::NoCrossingFound),
        ]]);

        let average = average_above_surface(&field, &surface, &axis()).unwrap();

        assert!(approx_eq!(f64, average[[0, 0]].value().unwrap(), 13.0, ulps = 2));
        assert_eq!(
            average[[0, 1]],
            ColumnValue::Missing(MissingReason::NoCrossingFound)
        );
    }

    #[test]
    fn shape_mismatch() {
        let surface = Array2::from_elem((2, 2), ColumnValue::Valid(15.0));

        let wrong_depth = Array3::zeros((3, 2, 2));
        assert!(matches!(
            average_above_surface(&wrong_depth, &surface, &axis()),
            Err(GridError::ShapeMismatch { .. })
        ));

        let wrong_columns = Array3::zeros((4, 3, 2));
        assert!(matches!(
            average_above_surface(&wrong_columns, &surface, &axis()),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
