// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-page pivot/rotation transforms driven by a [`TransformCurve`].

use kurbo::{Affine, Point, Size};

use crate::{ControlPointTable, TrackId, TransformCurve};

/// Track name for the horizontal pivot, as a fraction of page width.
pub const PIVOT_X: &str = "PivotX";
/// Track name for the vertical pivot, as a fraction of page height.
pub const PIVOT_Y: &str = "PivotY";
/// Track name for the rotation, in degrees.
pub const ROTATION: &str = "Rotation";

/// Visual transform parameters for one page at one drag frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageTransform {
    /// Pivot x as a fraction of the page width.
    pub pivot_x: f64,
    /// Pivot y as a fraction of the page height.
    pub pivot_y: f64,
    /// Clockwise rotation about the pivot, in degrees.
    pub rotation: f64,
}

impl PageTransform {
    /// Centered pivot, no rotation.
    pub const IDENTITY: Self = Self {
        pivot_x: 0.5,
        pivot_y: 0.5,
        rotation: 0.0,
    };

    /// The pivot in page-local coordinates for a page of `size`.
    #[must_use]
    pub fn pivot(&self, size: Size) -> Point {
        Point::new(self.pivot_x * size.width, self.pivot_y * size.height)
    }

    /// Page-local affine transform for a page of `size`.
    #[must_use]
    pub fn to_affine(&self, size: Size) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.pivot(size))
    }
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Computes a [`PageTransform`] for each page from its fractional offset.
///
/// The [`PIVOT_X`], [`PIVOT_Y`] and [`ROTATION`] tracks are resolved once at
/// construction. A missing track leaves the matching [`PageTransform::IDENTITY`]
/// component in place.
///
/// ```rust
/// use kurbo::Size;
/// use understory_loop_pager::PageTransformer;
///
/// let transformer = PageTransformer::rotate_down();
///
/// // The centered page is upright, pivoting at its bottom center.
/// let centered = transformer.transform_page(0.0);
/// assert_eq!(centered.rotation, 0.0);
/// assert_eq!(centered.pivot(Size::new(200.0, 100.0)).y, 100.0);
///
/// // Neighbors lean away from the center.
/// assert!(transformer.transform_page(-0.5).rotation < 0.0);
/// assert!(transformer.transform_page(0.5).rotation > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct PageTransformer {
    curve: TransformCurve,
    pivot_x: Option<TrackId>,
    pivot_y: Option<TrackId>,
    rotation: Option<TrackId>,
}

impl PageTransformer {
    /// Creates a transformer reading the standard tracks of `curve`.
    #[must_use]
    pub fn new(curve: TransformCurve) -> Self {
        Self {
            pivot_x: curve.track_id(PIVOT_X),
            pivot_y: curve.track_id(PIVOT_Y),
            rotation: curve.track_id(ROTATION),
            curve,
        }
    }

    /// Pages pivot at their bottom center and tilt away from the centered page.
    #[must_use]
    pub fn rotate_down() -> Self {
        let table = ControlPointTable::new()
            .with_track(PIVOT_X, &[(-1.0, 0.5), (1.0, 0.5)])
            .with_track(PIVOT_Y, &[(-1.0, 1.0), (1.0, 1.0)])
            .with_track(ROTATION, &[(-1.0, -0.05), (0.0, 0.0)])
            .with_track(ROTATION, &[(0.0, 0.0), (0.0, 0.0)])
            .with_track(ROTATION, &[(0.0, 0.0), (1.0, 0.05)]);
        let curve = TransformCurve::new(table).unwrap_or_else(|err| {
            log::warn!("rotate-down preset rejected, pages stay untransformed: {err}");
            TransformCurve::default()
        });
        Self::new(curve)
    }

    /// The underlying curve, for querying any additional tracks.
    #[must_use]
    pub const fn curve(&self) -> &TransformCurve {
        &self.curve
    }

    /// Transform for a page at the signed fractional `offset` from center.
    #[must_use]
    pub fn transform_page(&self, offset: f64) -> PageTransform {
        let read = |track: Option<TrackId>, fallback: f64| {
            track
                .and_then(|id| self.curve.value_at_track(id, offset))
                .unwrap_or(fallback)
        };
        PageTransform {
            pivot_x: read(self.pivot_x, PageTransform::IDENTITY.pivot_x),
            pivot_y: read(self.pivot_y, PageTransform::IDENTITY.pivot_y),
            rotation: read(self.rotation, PageTransform::IDENTITY.rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::{PIVOT_Y, PageTransform, PageTransformer, ROTATION};
    use crate::{ControlPointTable, TransformCurve};

    #[test]
    fn rotate_down_matches_its_table() {
        let transformer = PageTransformer::rotate_down();

        let left = transformer.transform_page(-0.5);
        assert!((left.rotation + 0.025).abs() < 1e-12);
        assert_eq!(left.pivot_x, 0.5);
        assert_eq!(left.pivot_y, 1.0);

        assert_eq!(transformer.transform_page(0.0).rotation, 0.0);
        assert!((transformer.transform_page(0.5).rotation - 0.025).abs() < 1e-12);
        assert_eq!(transformer.transform_page(-3.0).rotation, -0.05);
    }

    #[test]
    fn missing_tracks_fall_back_to_identity() {
        let curve =
            TransformCurve::new(ControlPointTable::new().with_track(ROTATION, &[(0.0, 10.0)]))
                .unwrap();
        let transform = PageTransformer::new(curve).transform_page(0.4);
        assert_eq!(
            transform,
            PageTransform {
                rotation: 10.0,
                ..PageTransform::IDENTITY
            }
        );

        let curve =
            TransformCurve::new(ControlPointTable::new().with_track(PIVOT_Y, &[(0.0, 0.0)]))
                .unwrap();
        let transform = PageTransformer::new(curve).transform_page(0.0);
        assert_eq!(transform.pivot_x, 0.5);
        assert_eq!(transform.pivot_y, 0.0);
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn affine_rotates_about_scaled_pivot() {
        let transform = PageTransform {
            pivot_x: 0.5,
            pivot_y: 1.0,
            rotation: 90.0,
        };
        let size = Size::new(100.0, 50.0);
        let pivot = transform.pivot(size);
        assert_eq!(pivot, Point::new(50.0, 50.0));

        let affine = transform.to_affine(size);
        let moved = affine * pivot;
        assert!((moved - pivot).hypot() < 1e-9, "pivot stays fixed");

        let corner = affine * Point::new(100.0, 50.0);
        assert!((corner - Point::new(50.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn empty_curve_yields_identity() {
        let transformer = PageTransformer::new(TransformCurve::default());
        assert_eq!(transformer.transform_page(0.7), PageTransform::IDENTITY);
    }

    #[test]
    fn identity_transform_is_identity_affine() {
        let affine = PageTransform::default().to_affine(Size::new(30.0, 40.0));
        let p = affine * Point::new(7.0, 9.0);
        assert!((p - Point::new(7.0, 9.0)).hypot() < 1e-9);
    }
}
