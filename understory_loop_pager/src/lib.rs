// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_loop_pager --heading-base-level=0

//! Understory Loop Pager: a seamless infinite-loop paging core for carousels.
//!
//! Given an ordered data set of `N` items, this crate lets a host carousel
//! widget present them as if the sequence wrapped around in both directions,
//! without a huge virtual page count. The host sees `N * LOOP_FACTOR` virtual
//! pages; whenever it settles near either end, the pager silently moves it back
//! to the equivalent page in the middle copy.
//!
//! The core concepts are:
//!
//! - [`index`]: pure mapping between virtual and real indices, including the
//!   edge-band test and [`index::recenter`].
//! - [`LoopPager`]: the adapter the host talks to. It reports the page count,
//!   builds and destroys [`Page`]s, and runs the recentering transition in
//!   [`LoopPager::start_update`], emitting [`StartUpdate`] notifications.
//! - [`ItemBinder`] and [`BinderFactory`]: caller-supplied page content. One
//!   binder is created per page and lives inside it.
//! - [`PagerHost`]: what the pager needs from the host widget.
//! - [`TransformCurve`]: piecewise-linear control point tracks queried by
//!   fractional page offset, and [`PageTransformer`], which turns the
//!   `PivotX`/`PivotY`/`Rotation` tracks into a [`PageTransform`].
//!
//! This crate deliberately does **not** know about any particular UI toolkit.
//! Host frameworks are responsible for:
//!
//! - Owning the container and attaching the views of pages returned by
//!   [`LoopPager::create_page`].
//! - Calling [`LoopPager::start_update`] once per settle.
//! - Feeding each visible page's fractional offset to a [`PageTransformer`]
//!   every drag frame and applying the result.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_loop_pager::{ItemBinder, LoopPager};
//!
//! struct Label;
//!
//! impl ItemBinder<&'static str> for Label {
//!     type Context = ();
//!     type View = String;
//!
//!     fn create_view(&mut self, _cx: &mut ()) -> String {
//!         String::new()
//!     }
//!
//!     fn bind(&mut self, _cx: &mut (), _slot: usize, _item: &&'static str) {}
//! }
//!
//! let items = ["red", "green", "blue"];
//! let mut pager = LoopPager::new(|| Some(Label), &items);
//!
//! // Three items are presented as nine virtual pages.
//! assert_eq!(pager.page_count(), 9);
//!
//! // Virtual page 7 shows item 1.
//! let page = pager.create_page(&mut (), 7).unwrap().unwrap();
//! assert_eq!(page.real_index(), 1);
//!
//! // Start the host in the middle copy.
//! assert_eq!(pager.virtual_index_for(0), Some(3));
//! ```
//!
//! Log output goes through the [`log`] facade; install any logger in the host
//! application to see page lifecycle traces.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binder;
mod curve;
mod error;
mod host;
pub mod index;
mod pager;
mod transform;

pub use binder::{BinderFactory, ItemBinder};
pub use curve::{ControlPoint, ControlPointTable, TrackId, TransformCurve};
pub use error::{CurveError, HostError, PagerError};
pub use host::PagerHost;
pub use index::LOOP_FACTOR;
pub use pager::{
    ListenerId, LoopPager, Page, PageId, PagerPage, StartUpdate, UpdateState, is_same_page,
};
pub use transform::{PIVOT_X, PIVOT_Y, PageTransform, PageTransformer, ROTATION};
