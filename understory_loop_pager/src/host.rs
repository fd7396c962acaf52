// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host carousel widget, as seen from the pager.

use crate::{HostError, PageId};

/// The view-recycling container that displays the pager's pages.
///
/// The host owns page placement, scrolling and rendering. The pager only needs
/// to read and silently move the settled position and to ask the host to drop
/// pages it no longer needs.
pub trait PagerHost {
    /// Virtual index of the page the host is currently settled on.
    fn current_index(&self) -> usize;

    /// Moves the host to `index` without animating and without reporting a new
    /// settle back to the pager.
    fn set_current_index_silently(&mut self, index: usize);

    /// Detaches the page with the given id from the container.
    fn remove_page(&mut self, page: PageId);

    /// Makes the host treat its next layout pass as a first layout.
    ///
    /// Some hosts render a blank page when a page transform is active while the
    /// current index jumps. Hosts without that artifact keep the default, which
    /// does nothing. Errors are logged by the pager and otherwise ignored.
    fn force_relayout_on_next_frame(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}
