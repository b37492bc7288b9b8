//! Limits and defaults shared by the list engine and the synchronized field

/// Maximum number of elements a list may hold (2^32 - 1)
///
/// Checked before growth that multiplies the length (repetition) or
/// appends a whole batch, so an oversized request fails before either view
/// changes.
pub const MAX_SEQUENCE_LEN: usize = u32::MAX as usize;

/// Index used by `pop` when the caller gives none (the last element)
pub const DEFAULT_POP_INDEX: i64 = -1;

/// Type name reported for the plain dynamic list in usage errors
pub const LIST_TYPE_NAME: &str = "list";

/// Sentinel used for an omitted slice bound, as `slice.indices` does
pub(crate) const SLICE_MAX: i64 = i64::MAX;

/// Lower sentinel for an omitted stop with a negative step
pub(crate) const SLICE_MIN: i64 = i64::MIN;

/// Check a requested length against [`MAX_SEQUENCE_LEN`]
pub(crate) fn check_len(len: Option<usize>) -> crate::Result<usize> {
    match len {
        Some(len) if len <= MAX_SEQUENCE_LEN => Ok(len),
        Some(len) => Err(crate::ListError::TooLarge {
            len,
            max: MAX_SEQUENCE_LEN,
        }),
        None => Err(crate::ListError::TooLarge {
            len: usize::MAX,
            max: MAX_SEQUENCE_LEN,
        }),
    }
}
