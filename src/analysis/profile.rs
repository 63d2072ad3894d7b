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

//! Module with types describing the analysed profile grid:
//! the vertical axis shared by all columns and the isosurface
//! that is searched for.

use crate::{errors::GridError, Float};
use ndarray::Array3;
use serde::Deserialize;

/// 3D field of samples indexed `(depth_index, row, col)`.
///
/// The length of the first axis must be equal to the length
/// of the [`DepthAxis`] it is analysed with.
pub type ProfileGrid = Array3<Float>;

/// Vertical coordinate shared by all columns of the grid.
///
/// Values must be finite and strictly monotonic, either increasing
/// (eg. depth in meters positive down) or decreasing (eg. z-coordinate
/// negative down). Regardless of the sign convention index `0`
/// is the shallowest level.
#[derive(Clone, PartialEq, Debug)]
pub struct DepthAxis {
    levels: Vec<Float>,
}

#[allow(clippy::len_without_is_empty)]
impl DepthAxis {
    /// Constructs the axis and checks if it is monotonic.
    pub fn new(levels: Vec<Float>) -> Result<Self, GridError> {
        if levels.is_empty() {
            return Err(GridError::EmptyAxis);
        }

        if let Some(i) = levels.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFiniteAxis(i));
        }

        if levels.len() > 1 {
            let ascending = levels[0] < levels[1];

            for (i, pair) in levels.windows(2).enumerate() {
                let ordered = if ascending {
                    pair[0] < pair[1]
                } else {
                    pair[0] > pair[1]
                };

                if !ordered {
                    return Err(GridError::NonMonotonicAxis(i + 1));
                }
            }
        }

        Ok(DepthAxis { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn as_slice(&self) -> &[Float] {
        &self.levels
    }

    pub fn is_ascending(&self) -> bool {
        self.levels.len() < 2 || self.levels[0] < self.levels[1]
    }

    /// Absolute thickness of the layer between
    /// levels `k` and `k + 1`.
    pub fn thickness(&self, k: usize) -> Float {
        (self.levels[k + 1] - self.levels[k]).abs()
    }

    /// Checks the axis against the depth dimension of a grid.
    pub fn check_grid(&self, grid: &ProfileGrid, what: &'static str) -> Result<(), GridError> {
        let depth_len = grid.shape()[0];

        if depth_len != self.len() {
            return Err(GridError::ShapeMismatch {
                what,
                expected: format!("{} depth levels", self.len()),
                found: format!("{} depth levels", depth_len),
            });
        }

        Ok(())
    }
}

impl std::ops::Index<usize> for DepthAxis {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        &self.levels[index]
    }
}

/// Direction in which the field crosses the target value
/// when moving from the shallowest level downwards.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Field drops below the target (eg. isotherm in a stratified ocean).
    LessThan,

    /// Field rises above the target (eg. isopycnal).
    GreaterThan,
}

impl CrossingDirection {
    /// Checks if the sample lies strictly on the shallow
    /// side of the surface. NaN is never on the shallow side.
    pub fn is_above_surface(self, sample: Float, target: Float) -> bool {
        match self {
            CrossingDirection::LessThan => sample > target,
            CrossingDirection::GreaterThan => sample < target,
        }
    }

    /// Checks if the pair of neighbours is ordered
    /// in the direction of the crossing.
    pub fn is_ordered(self, upper: Float, lower: Float) -> bool {
        match self {
            CrossingDirection::LessThan => upper > lower,
            CrossingDirection::GreaterThan => upper < lower,
        }
    }
}

/// Physical quantity of the analysed field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsosurfaceKind {
    Density,
    Temperature,
    Salinity,
}

impl IsosurfaceKind {
    /// Direction of the crossing in a stably stratified ocean.
    pub fn default_direction(self) -> CrossingDirection {
        match self {
            IsosurfaceKind::Density | IsosurfaceKind::Salinity => CrossingDirection::GreaterThan,
            IsosurfaceKind::Temperature => CrossingDirection::LessThan,
        }
    }

    pub fn surface_name(self) -> &'static str {
        match self {
            IsosurfaceKind::Density => "isopycnal",
            IsosurfaceKind::Temperature => "isotherm",
            IsosurfaceKind::Salinity => "isohaline",
        }
    }
}

/// Value defining the searched surface
/// together with the crossing direction.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct IsosurfaceTarget {
    pub value: Float,
    pub direction: CrossingDirection,
}

impl IsosurfaceTarget {
    pub fn new(value: Float, direction: CrossingDirection) -> Self {
        IsosurfaceTarget { value, direction }
    }

    pub fn for_kind(value: Float, kind: IsosurfaceKind) -> Self {
        IsosurfaceTarget::new(value, kind.default_direction())
    }
}
