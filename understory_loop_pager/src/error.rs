// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use thiserror::Error;

/// Errors surfaced by [`LoopPager`](crate::LoopPager) page creation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PagerError {
    /// The binder factory produced no binder, so the page cannot be built.
    #[error("binder factory returned no binder for virtual page {virtual_index}")]
    MissingBinder {
        /// Virtual index of the page that was being created.
        virtual_index: usize,
    },
}

/// Errors found while building a [`ControlPointTable`](crate::ControlPointTable).
///
/// Out-of-order points are not errors; they are dropped with a warning.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CurveError {
    /// A row had no track name.
    #[error("control point row has no track name")]
    MissingTrackName,
    /// A track ended up with no usable control points.
    #[error("track `{track}` has no control points")]
    EmptyTrack {
        /// Name of the offending track.
        track: String,
    },
    /// A row did not hold an input range and an output range, plus an optional clamp range.
    #[error("track `{track}` row has {len} values, expected 4 or 6")]
    RowLength {
        /// Name of the offending track.
        track: String,
        /// Number of values after the name.
        len: usize,
    },
    /// A row contained something that is not a number.
    #[error("track `{track}` has a non-numeric value `{value}`")]
    InvalidNumber {
        /// Name of the offending track.
        track: String,
        /// The value as written.
        value: String,
    },
}

/// Failure reported by an optional [`PagerHost`](crate::PagerHost) capability.
///
/// The pager logs these and carries on without the capability.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host does not implement the capability on this platform.
    #[error("not supported by this host")]
    Unsupported,
    /// The host tried and failed.
    #[error("host operation failed: {0}")]
    Failed(String),
}
