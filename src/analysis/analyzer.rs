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

//! Module with the front-facing struct of the analysis,
//! combining surface location and vertical averaging
//! over one profile grid.

use super::averager::{average_above_surface, average_above_surface_with_progress};
use super::column::{AverageField, SurfaceDepthField};
use super::locator::{locate, locate_with_progress};
use super::profile::{DepthAxis, IsosurfaceTarget, ProfileGrid};
use crate::errors::GridError;
use indicatif::ProgressBar;

/// Analyzer of isosurfaces in a single profile grid.
///
/// Shape of the grid and axis is checked once on construction,
/// the analysis methods can then be called multiple times.
pub struct IsopycnalSurfaceAnalyzer<'a> {
    grid: &'a ProfileGrid,
    axis: &'a DepthAxis,
    progress: Option<ProgressBar>,
}

impl<'a> IsopycnalSurfaceAnalyzer<'a> {
    pub fn new(grid: &'a ProfileGrid, axis: &'a DepthAxis) -> Result<Self, GridError> {
        axis.check_grid(grid, "profile grid")?;

        Ok(IsopycnalSurfaceAnalyzer {
            grid,
            axis,
            progress: None,
        })
    }

    /// Reports each processed column to a progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Number of columns processed by a single pass.
    pub fn columns_count(&self) -> usize {
        self.grid.shape()[1] * self.grid.shape()[2]
    }

    pub fn surface_depth(&self, target: &IsosurfaceTarget) -> Result<SurfaceDepthField, GridError> {
        let progress = match &self.progress {
            Some(progress) => progress,
            None => return locate(self.grid, self.axis, target),
        };

        reset_progress(progress, "Locating surface", self.columns_count());
        let surface = locate_with_progress(self.grid, self.axis, target, &|| progress.inc(1))?;
        progress.finish_with_message("done");

        Ok(surface)
    }

    /// Averages `tracer` above previously located `surface`.
    ///
    /// Tracer must be defined on the same grid as the analysed field.
    pub fn average_above(
        &self,
        tracer: &ProfileGrid,
        surface: &SurfaceDepthField,
    ) -> Result<AverageField, GridError> {
        if tracer.shape() != self.grid.shape() {
            return Err(GridError::ShapeMismatch {
                what: "tracer grid",
                expected: format!("{:?}", self.grid.shape()),
                found: format!("{:?}", tracer.shape()),
            });
        }

        let progress = match &self.progress {
            Some(progress) => progress,
            None => return average_above_surface(tracer, surface, self.axis),
        };

        reset_progress(progress, "Averaging tracer", self.columns_count());
        let average =
            average_above_surface_with_progress(tracer, surface, self.axis, &|| progress.inc(1))?;
        progress.finish_with_message("done");

        Ok(average)
    }
}

fn reset_progress(progress: &ProgressBar, prefix: &'static str, length: usize) {
    progress.reset();
    progress.set_length(length as u64);
    progress.set_prefix(prefix);
}

#[cfg(test)]
mod tests {
    use super::IsopycnalSurfaceAnalyzer;
    use crate::analysis::column::{ColumnValue, MissingReason};
    use crate::analysis::profile::{DepthAxis, IsosurfaceKind, IsosurfaceTarget};
    use crate::errors::GridError;
    use float_cmp::approx_eq;
    use ndarray::{arr1, s, Array3};

    fn density_grid() -> Array3<f64> {
        let mut grid = Array3::zeros((4, 1, 2));
        grid.slice_mut(s![.., 0, 0])
            .assign(&arr1(&[1024.0, 1025.0, 1026.0, 1027.0]));
        grid.slice_mut(s![.., 0, 1])
            .assign(&arr1(&[1022.0, 1022.5, 1023.0, 1023.5]));
        grid
    }

    #[test]
    fn density_and_tracer() {
        let axis = DepthAxis::new(vec![0.0, 10.0, 20.0, 30.0]).unwrap();
        let grid = density_grid();

        let mut temperature = Array3::zeros((4, 1, 2));
        temperature
            .slice_mut(s![.., 0, 0])
            .assign(&arr1(&[20.0, 18.0, 10.0, 4.0]));

        let analyzer = IsopycnalSurfaceAnalyzer::new(&grid, &axis).unwrap();
        assert_eq!(analyzer.columns_count(), 2);

        let target = IsosurfaceTarget::for_kind(1026.0, IsosurfaceKind::Density);
        let surface = analyzer.surface_depth(&target).unwrap();

        assert!(approx_eq!(f64, surface[[0, 0]].value().unwrap(), 20.0, ulps = 2));
        assert_eq!(
            surface[[0, 1]],
            ColumnValue::Missing(MissingReason::NoCrossingFound)
        );

        let average = analyzer.average_above(&temperature, &surface).unwrap();

        // layers 19 and 14 of equal thickness
        assert!(approx_eq!(f64, average[[0, 0]].value().unwrap(), 16.5, ulps = 2));
        assert_eq!(
            average[[0, 1]],
            ColumnValue::Missing(MissingReason::NoCrossingFound)
        );
    }

    #[test]
    fn mismatched_inputs() {
        let axis = DepthAxis::new(vec![0.0, 10.0, 20.0]).unwrap();
        let grid = density_grid();

        assert!(matches!(
            IsopycnalSurfaceAnalyzer::new(&grid, &axis),
            Err(GridError::ShapeMismatch { .. })
        ));

        let axis = DepthAxis::new(vec![0.0, 10.0, 20.0, 30.0]).unwrap();
        let analyzer = IsopycnalSurfaceAnalyzer::new(&grid, &axis).unwrap();
        let target = IsosurfaceTarget::for_kind(1026.0, IsosurfaceKind::Density);
        let surface = analyzer.surface_depth(&target).unwrap();

        let tracer = Array3::zeros((4, 2, 2));
        assert!(matches!(
            analyzer.average_above(&tracer, &surface),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
