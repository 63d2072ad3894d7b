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

//! Module containing interpolation methods.

use crate::Float;

/// Linearly interpolates the coordinate at which the sampled
/// quantity reaches `value`, given two samples `(sample_0, coord_0)`
/// and `(sample_1, coord_1)`.
///
/// Samples must differ. The result is exact at both ends
/// of the interval.
pub fn interpolate_linear(
    value: Float,
    (sample_0, coord_0): (Float, Float),
    (sample_1, coord_1): (Float, Float),
) -> Float {
    let fraction = (value - sample_0) / (sample_1 - sample_0);

    coord_0 * (1.0 - fraction) + coord_1 * fraction
}

#[cfg(test)]
mod tests {
    use super::interpolate_linear;
    use float_cmp::approx_eq;

    #[test]
    fn midpoint() {
        let depth = interpolate_linear(20.0, (25.0, 10.0), (15.0, 20.0));
        assert!(approx_eq!(f64, depth, 15.0, ulps = 2));
    }

    #[test]
    fn exact_at_ends() {
        let (coord_0, coord_1) = (0.1, 0.3);

        assert_eq!(interpolate_linear(7.0, (7.0, coord_0), (3.0, coord_1)), coord_0);
        assert_eq!(interpolate_linear(3.0, (7.0, coord_0), (3.0, coord_1)), coord_1);
    }
}
