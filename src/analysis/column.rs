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

//! Module with the typed per-column result of the analysis.
//!
//! Instead of filling columns without a valid result with NaN
//! or a numeric sentinel, every output cell is either a valid
//! value or a marker of why the value is missing.

use crate::Float;
use ndarray::Array2;

/// Reason why a column has no valid result.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum MissingReason {
    /// Profile never leaves the shallow side of the surface.
    NoCrossingFound,

    /// Samples bracketing the crossing are not ordered
    /// in the crossing direction.
    AmbiguousCrossing,

    /// NaN sample in the bracketing pair or averaged layers.
    InvalidSample,

    /// Surface is nearest to the shallowest level,
    /// so there is no layer above it to average.
    SurfaceAtTop,
}

impl MissingReason {
    pub fn label(self) -> &'static str {
        match self {
            MissingReason::NoCrossingFound => "no_crossing",
            MissingReason::AmbiguousCrossing => "ambiguous_crossing",
            MissingReason::InvalidSample => "invalid_sample",
            MissingReason::SurfaceAtTop => "surface_at_top",
        }
    }
}

/// Result of the computation for one column.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ColumnValue {
    Valid(Float),
    Missing(MissingReason),
}

impl ColumnValue {
    /// Wraps computed value, NaN is never considered valid.
    pub fn valid(value: Float) -> Self {
        if value.is_nan() {
            ColumnValue::Missing(MissingReason::InvalidSample)
        } else {
            ColumnValue::Valid(value)
        }
    }

    pub fn value(self) -> Option<Float> {
        match self {
            ColumnValue::Valid(v) => Some(v),
            ColumnValue::Missing(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnValue::Valid(_) => "valid",
            ColumnValue::Missing(reason) => reason.label(),
        }
    }
}

/// 2D field `(row, col)` of interpolated surface depths.
pub type SurfaceDepthField = Array2<ColumnValue>;

/// 2D field `(row, col)` of vertical averages above the surface.
pub type AverageField = Array2<ColumnValue>;

/// Count of columns per outcome, used for reporting.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct OutcomeSummary {
    pub valid: usize,
    pub no_crossing: usize,
    pub ambiguous_crossing: usize,
    pub invalid_sample: usize,
    pub surface_at_top: usize,
}

impl OutcomeSummary {
    pub fn of(field: &Array2<ColumnValue>) -> Self {
        let mut summary = OutcomeSummary::default();

        for value in field {
            match value {
                ColumnValue::Valid(_) => summary.valid += 1,
                ColumnValue::Missing(MissingReason::NoCrossingFound) => summary.no_crossing += 1,
                ColumnValue::Missing(MissingReason::AmbiguousCrossing) => {
                    summary.ambiguous_crossing += 1
                }
                ColumnValue::Missing(MissingReason::InvalidSample) => summary.invalid_sample += 1,
                ColumnValue::Missing(MissingReason::SurfaceAtTop) => summary.surface_at_top += 1,
            }
        }

        summary
    }

    pub fn missing(&self) -> usize {
        self.no_crossing + self.ambiguous_crossing + self.invalid_sample + self.surface_at_top
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnValue, MissingReason, OutcomeSummary};
    use ndarray::arr2;

    #[test]
    fn nan_is_not_valid() {
        assert_eq!(
            ColumnValue::valid(f64::NAN),
            ColumnValue::Missing(MissingReason::InvalidSample)
        );
        assert_eq!(ColumnValue::valid(12.5).value(), Some(12.5));
    }

    #[test]
    fn summary_counts() {
        let field = arr2(&[
            [
                ColumnValue::Valid(1.0),
                ColumnValue::Missing(MissingReason::NoCrossingFound),
            ],
            [
                ColumnValue::Missing(MissingReason::NoCrossingFound),
                ColumnValue::Missing(MissingReason::SurfaceAtTop),
            ],
        ]);

        let summary = OutcomeSummary::of(&field);

        assert_eq!(summary.valid, 1);
        assert_eq!(summary.no_crossing, 2);
        assert_eq!(summary.surface_at_top, 1);
        assert_eq!(summary.missing(), 3);
    }
}
