// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between the virtual (looped) index space and real data indices.
//!
//! The virtual space is `LOOP_FACTOR` copies of the real data laid end to end.
//! Hosts only ever see virtual indices; items are always looked up by the real
//! index `virtual % real_count`. Keeping the settled position inside the middle
//! copy leaves a full copy of headroom on either side of it.

/// Number of copies of the real data that make up the virtual index space.
///
/// A viewport with edge padding can show parts of several pages at once, so the
/// factor must be at least the number of pages visible per viewport plus two.
pub const LOOP_FACTOR: usize = 3;

/// Returns the number of pages exposed to the host.
///
/// This is `real_count * LOOP_FACTOR` when looping, `real_count` otherwise, and
/// always `0` for an empty data set.
#[must_use]
pub const fn virtual_count(real_count: usize, loop_enabled: bool) -> usize {
    if loop_enabled {
        real_count.saturating_mul(LOOP_FACTOR)
    } else {
        real_count
    }
}

/// Maps a virtual index to the index of the data item it shows.
///
/// Returns `None` when `real_count` is zero.
#[must_use]
pub const fn to_real(virtual_index: usize, real_count: usize) -> Option<usize> {
    if real_count == 0 {
        None
    } else {
        Some(virtual_index % real_count)
    }
}

/// Maps a data index to the virtual index a host should be positioned at to show it.
///
/// With looping enabled this is the copy in the middle band, so the user can
/// immediately swipe in either direction. Returns `None` if `real_index` is not a
/// valid data index, or if the middle-band index does not fit in `usize`.
#[must_use]
pub const fn to_virtual(real_index: usize, real_count: usize, loop_enabled: bool) -> Option<usize> {
    if real_index >= real_count {
        None
    } else if loop_enabled {
        real_index.checked_add(real_count)
    } else {
        Some(real_index)
    }
}

/// Returns `true` if `virtual_index` lies in the first or last band of the looped space.
///
/// Each band is `real_count` pages wide. For an empty data set the first band is
/// empty and the last band covers every index, mirroring the arithmetic the
/// callers guard against separately.
#[must_use]
pub const fn is_in_edge_band(virtual_index: usize, real_count: usize) -> bool {
    let count = virtual_count(real_count, true);
    virtual_index < real_count || virtual_index >= count.saturating_sub(real_count)
}

/// Returns the middle-band index equivalent to `virtual_index`, if it needs to move.
///
/// Indices already in the middle band, empty data sets, and data sets too large
/// for the middle-band index to fit in `usize` yield `None`.
///
/// ```rust
/// use understory_loop_pager::index::recenter;
///
/// // Five items: 15 virtual pages, middle band is 5..10.
/// assert_eq!(recenter(2, 5), Some(7));
/// assert_eq!(recenter(13, 5), Some(8));
/// assert_eq!(recenter(7, 5), None);
/// assert_eq!(recenter(0, 0), None);
/// ```
#[must_use]
pub const fn recenter(virtual_index: usize, real_count: usize) -> Option<usize> {
    if real_count == 0 || !is_in_edge_band(virtual_index, real_count) {
        return None;
    }
    (virtual_index % real_count).checked_add(real_count)
}
