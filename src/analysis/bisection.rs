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

//! Module containg methods for conducting
//! binary search (bisection) of elements closests
//! to searched values on monotonic axes.

use crate::{errors::SearchError, Float};

/// Core bisection function, simply an implementation
/// of binary search algorithm adapted to searching values
/// in-between the set items.
///
/// Works for both ascending and descending arrays and returns
/// the first index at which the array reaches `x`. The level
/// before that index and the index itself are the two candidates
/// compared by [`find_nearest`].
fn binary_search<T: PartialOrd>(array: &[T], x: &T) -> Result<usize, SearchError> {
    let (first, last) = match (array.first(), array.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(SearchError::EmptyArray),
    };

    if x < first && x < last || x > first && x > last {
        return Err(SearchError::OutOfBounds);
    }

    let mut lo = 0;
    let mut hi = array.len() - 1;

    // if the array is sorted descendingly we use a function with reversed signs
    if first < last {
        while lo < hi {
            let mid = (lo + hi) / 2;

            if array[mid] >= *x {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
    } else {
        while lo < hi {
            let mid = (lo + hi) / 2;

            if array[mid] <= *x {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
    }

    Ok(lo)
}

/// Finds index of the closest item preceding
/// (or equal to) the searched value.
pub fn find_left_closest<T: PartialOrd>(array: &[T], x: &T) -> Result<usize, SearchError> {
    let found_index = binary_search(array, x)?;

    if array[found_index] == *x || found_index == 0 {
        Ok(found_index)
    } else {
        Ok(found_index - 1)
    }
}

/// Finds index of the closest item following
/// (or equal to) the searched value.
pub fn find_right_closest<T: PartialOrd>(array: &[T], x: &T) -> Result<usize, SearchError> {
    binary_search(array, x)
}

/// Finds index of the item nearest to the searched value.
///
/// Values outside the array are clamped to the nearer end,
/// equidistant neighbours resolve to the lower index.
pub fn find_nearest(array: &[Float], x: Float) -> Result<usize, SearchError> {
    if x.is_nan() {
        return Err(SearchError::OutOfBounds);
    }

    match (find_left_closest(array, &x), find_right_closest(array, &x)) {
        (Ok(left), Ok(right)) => {
            if (array[right] - x).abs() < (x - array[left]).abs() {
                Ok(right)
            } else {
                Ok(left)
            }
        }
        (Err(SearchError::OutOfBounds), _) => {
            let last = array.len() - 1;

            if (x - array[0]).abs() <= (x - array[last]).abs() {
                Ok(0)
            } else {
                Ok(last)
            }
        }
        (Err(err), _) | (_, Err(err)) => Err(err),
    }
}
