//! Slice descriptors and their resolution against a list length

use crate::constants::{SLICE_MAX, SLICE_MIN};
use crate::error::ListError;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A `start:stop:step` slice with optional components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSpec {
    /// First index (inclusive); defaults to the beginning for a positive step
    #[serde(default)]
    pub start: Option<i64>,

    /// End index (exclusive); defaults to the end for a positive step
    #[serde(default)]
    pub stop: Option<i64>,

    /// Stride; defaults to 1, zero is rejected
    #[serde(default)]
    pub step: Option<i64>,
}

/// A slice resolved against a concrete length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSlice {
    /// Clamped start index
    pub start: i64,
    /// Clamped stop index
    pub stop: i64,
    /// Non-zero step
    pub step: i64,
    /// Number of positions addressed
    pub len: usize,
}

impl SliceSpec {
    /// Create a slice from all three components
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// `start:stop` with the default step
    pub fn range(start: i64, stop: i64) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `::step` over the whole list
    pub fn stepped(step: i64) -> Self {
        Self::new(None, None, Some(step))
    }

    /// Resolve against a list of `length` elements
    ///
    /// Follows `slice.indices`: negative bounds count from the end, bounds
    /// are clamped into the list, and omitted bounds depend on the sign of
    /// the step.
    pub fn resolve(&self, length: usize) -> Result<ResolvedSlice, ListError> {
        let step = match self.step {
            None => 1,
            Some(0) => return Err(ListError::ZeroStep),
            // Keep -step representable
            Some(s) => s.max(-SLICE_MAX),
        };

        let start = self
            .start
            .unwrap_or(if step < 0 { SLICE_MAX } else { 0 });
        let stop = self
            .stop
            .unwrap_or(if step < 0 { SLICE_MIN } else { SLICE_MAX });

        let length = length as i64;
        let start = clamp_bound(start, length, step);
        let stop = clamp_bound(stop, length, step);

        let len = if step < 0 {
            if stop < start {
                (start - stop - 1) / (-step) + 1
            } else {
                0
            }
        } else if start < stop {
            (stop - start - 1) / step + 1
        } else {
            0
        };

        Ok(ResolvedSlice {
            start,
            stop,
            step,
            len: len as usize,
        })
    }
}

fn clamp_bound(bound: i64, length: i64, step: i64) -> i64 {
    if bound < 0 {
        let shifted = bound.saturating_add(length);
        if shifted < 0 {
            if step < 0 {
                -1
            } else {
                0
            }
        } else {
            shifted
        }
    } else if bound >= length {
        if step < 0 {
            length - 1
        } else {
            length
        }
    } else {
        bound
    }
}

impl ResolvedSlice {
    /// The addressed positions, in slice order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len as i64).map(move |i| (self.start + i * self.step) as usize)
    }

    /// Collect the addressed positions
    pub fn to_vec(&self) -> Vec<usize> {
        self.indices().collect()
    }

    /// True for a contiguous forward slice, which may change the list length
    pub fn is_simple(&self) -> bool {
        self.step == 1
    }
}
