// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Piecewise-linear animation curves keyed by fractional page offset.
//!
//! A [`ControlPointTable`] holds named tracks of `(offset, value)` control
//! points. [`TransformCurve`] validates the table once and then answers
//! per-frame queries: given the signed offset of a page from the centered
//! position (`0.0` centered, `±1.0` one full page away), it linearly
//! interpolates between the surrounding control points and clamps to the end
//! values outside the track's domain.
//!
//! A track may be given as several point groups; they are concatenated and
//! treated as one polyline. Groups that share an offset produce zero-width
//! segments, which are allowed.
//!
//! ```rust
//! use understory_loop_pager::{ControlPointTable, TransformCurve};
//!
//! let table = ControlPointTable::new()
//!     .with_track("Rotation", &[(-1.0, -0.05), (0.0, 0.0)])
//!     .with_track("Rotation", &[(0.0, 0.0), (1.0, 0.05)]);
//! let curve = TransformCurve::new(table).unwrap();
//!
//! assert_eq!(curve.value_at("Rotation", 0.0), Some(0.0));
//! assert!((curve.value_at("Rotation", -0.5).unwrap() + 0.025).abs() < 1e-12);
//! assert_eq!(curve.value_at("Rotation", 3.0), Some(0.05));
//! assert_eq!(curve.value_at("Scale", 0.0), None);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::CurveError;

/// A single `(offset, value)` control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlPoint {
    /// Fractional page offset this point applies at.
    pub offset: f64,
    /// Parameter value at `offset`.
    pub value: f64,
}

impl ControlPoint {
    /// Creates a control point.
    #[must_use]
    pub const fn new(offset: f64, value: f64) -> Self {
        Self { offset, value }
    }
}

type Points = SmallVec<[ControlPoint; 8]>;

#[derive(Clone, Debug)]
struct Track {
    name: String,
    points: Points,
}

/// Unvalidated control point data for a [`TransformCurve`].
///
/// Tracks keep the order in which they were first named. Adding points to an
/// existing name appends them to that track.
#[derive(Clone, Debug, Default)]
pub struct ControlPointTable {
    tracks: Vec<Track>,
}

impl ControlPointTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group of `(offset, value)` points to the track `name`, builder style.
    #[must_use]
    pub fn with_track(mut self, name: &str, points: &[(f64, f64)]) -> Self {
        self.push_group(
            name,
            points
                .iter()
                .map(|&(offset, value)| ControlPoint::new(offset, value)),
        );
        self
    }

    /// Appends a group of points to the track `name`, creating the track if needed.
    pub fn push_group(&mut self, name: &str, points: impl IntoIterator<Item = ControlPoint>) {
        let track = match self.tracks.iter().position(|t| t.name == name) {
            Some(i) => &mut self.tracks[i],
            None => {
                self.tracks.push(Track {
                    name: name.to_string(),
                    points: Points::new(),
                });
                let last = self.tracks.len() - 1;
                &mut self.tracks[last]
            }
        };
        track.points.extend(points);
    }

    /// Parses textual rows of the form `[name, x0, x1, y0, y1]`.
    ///
    /// Each row is one segment of track `name`, running from input offset `x0`
    /// to `x1` while the output goes from `y0` to `y1`. A row may carry a
    /// trailing `[min, max]` input range; it must be numeric but does not
    /// change the segment. Rows may repeat a name to continue a track.
    ///
    /// ```rust
    /// use understory_loop_pager::{ControlPointTable, TransformCurve};
    ///
    /// let table = ControlPointTable::from_rows(&[
    ///     &["PivotX", "-1", "1", "0.5", "0.5", "-1", "1"][..],
    ///     &["Rotation", "-1", "0", "-0.05", "0"],
    /// ])
    /// .unwrap();
    /// assert_eq!(table.track_names().collect::<Vec<_>>(), ["PivotX", "Rotation"]);
    ///
    /// let curve = TransformCurve::new(table).unwrap();
    /// assert_eq!(curve.value_at("Rotation", -1.0), Some(-0.05));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`CurveError::MissingTrackName`] for an empty row or a blank name.
    /// - [`CurveError::RowLength`] for a row without exactly four or six numbers.
    /// - [`CurveError::InvalidNumber`] for a value that does not parse as `f64`.
    pub fn from_rows<R, S>(rows: &[R]) -> Result<Self, CurveError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for row in rows {
            let (name, values) = match row.as_ref().split_first() {
                Some((name, values)) if !name.as_ref().trim().is_empty() => {
                    (name.as_ref().trim(), values)
                }
                _ => return Err(CurveError::MissingTrackName),
            };

            let (segment, range) = match values.len() {
                4 | 6 => values.split_at(4),
                len => {
                    return Err(CurveError::RowLength {
                        track: name.to_string(),
                        len,
                    });
                }
            };
            let mut numbers = [0.0; 4];
            for (number, text) in numbers.iter_mut().zip(segment) {
                *number = parse_number(name, text.as_ref())?;
            }
            for text in range {
                parse_number(name, text.as_ref())?;
            }

            let [x0, x1, y0, y1] = numbers;
            table.push_group(name, [ControlPoint::new(x0, y0), ControlPoint::new(x1, y1)]);
        }
        Ok(table)
    }

    /// Names of the tracks in the table, in order.
    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.name.as_str())
    }

    /// Returns `true` if the table has no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn parse_number(track: &str, text: &str) -> Result<f64, CurveError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CurveError::InvalidNumber {
            track: track.to_string(),
            value: text.to_string(),
        })
}

/// Index of a track inside one [`TransformCurve`].
///
/// Resolve names once with [`TransformCurve::track_id`] and use the id for
/// per-frame queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(usize);

/// Validated, immutable set of interpolation tracks.
///
/// The default curve has no tracks; every lookup returns `None`.
#[derive(Clone, Debug, Default)]
pub struct TransformCurve {
    tracks: Vec<Track>,
}

impl TransformCurve {
    /// Validates `table` and builds the curve.
    ///
    /// Points with a non-finite coordinate, and points whose offset is lower
    /// than the one before them, are dropped with a warning. Equal offsets are
    /// kept.
    ///
    /// # Errors
    ///
    /// [`CurveError::EmptyTrack`] if a track is left without any points.
    pub fn new(table: ControlPointTable) -> Result<Self, CurveError> {
        let mut tracks = table.tracks;
        for track in &mut tracks {
            normalize(track);
            if track.points.is_empty() {
                return Err(CurveError::EmptyTrack {
                    track: track.name.clone(),
                });
            }
        }
        Ok(Self { tracks })
    }

    /// Looks up a track by name.
    #[must_use]
    pub fn track_id(&self, name: &str) -> Option<TrackId> {
        self.tracks.iter().position(|t| t.name == name).map(TrackId)
    }

    /// Interpolated value of track `name` at `offset`, or `None` for an unknown track.
    #[must_use]
    pub fn value_at(&self, name: &str, offset: f64) -> Option<f64> {
        self.value_at_track(self.track_id(name)?, offset)
    }

    /// Interpolated value of the track `id` at `offset`.
    ///
    /// Returns `None` if `id` does not belong to this curve.
    #[must_use]
    pub fn value_at_track(&self, id: TrackId, offset: f64) -> Option<f64> {
        self.tracks
            .get(id.0)
            .map(|track| interpolate(&track.points, offset))
    }

    /// Every track's name and value at `offset`, in table order.
    pub fn values_at(&self, offset: f64) -> impl Iterator<Item = (&str, f64)> {
        self.tracks
            .iter()
            .map(move |t| (t.name.as_str(), interpolate(&t.points, offset)))
    }

    /// Names of the tracks, in table order.
    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.name.as_str())
    }

    /// The validated control points of track `id`.
    #[must_use]
    pub fn points(&self, id: TrackId) -> Option<&[ControlPoint]> {
        self.tracks.get(id.0).map(|t| t.points.as_slice())
    }
}

fn normalize(track: &mut Track) {
    let mut previous: Option<f64> = None;
    track.points.retain(|point| {
        if !point.offset.is_finite() || !point.value.is_finite() {
            log::warn!(
                "track `{}`: dropping non-finite control point {point:?}",
                track.name
            );
            return false;
        }
        if previous.is_some_and(|prev| point.offset < prev) {
            log::warn!(
                "track `{}`: dropping out-of-order control point {point:?}",
                track.name
            );
            return false;
        }
        previous = Some(point.offset);
        true
    });
}

/// Piecewise-linear interpolation over points sorted by offset.
///
/// Clamps outside the domain. A NaN offset is treated as the centered page.
fn interpolate(points: &[ControlPoint], offset: f64) -> f64 {
    let x = if offset.is_nan() { 0.0 } else { offset };
    let Some((first, rest)) = points.split_first() else {
        return 0.0;
    };
    let last = rest.last().unwrap_or(first);
    if x <= first.offset {
        return first.value;
    }
    if x >= last.offset {
        return last.value;
    }

    // first.offset < x < last.offset, so 1 <= i < points.len().
    let i = points.partition_point(|p| p.offset <= x);
    let (p0, p1) = (points[i - 1], points[i]);
    let width = p1.offset - p0.offset;
    if width <= 0.0 {
        // Degenerate segment: use the nearer end.
        return if x - p0.offset <= p1.offset - x {
            p0.value
        } else {
            p1.value
        };
    }
    p0.value + (p1.value - p0.value) * (x - p0.offset) / width
}
