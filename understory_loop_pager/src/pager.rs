// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loop pager: page count, page lifecycle, and the settle-time recentering transition.
//!
//! ## Recentering
//!
//! Every time the host settles it calls [`LoopPager::start_update`]. If the
//! settled index lies in the first or last band of the virtual space, the pager
//! silently moves the host to the equivalent index in the middle band, so there
//! is always at least one full copy of the data on either side of the user.
//!
//! Settles outside the edge bands produce a [`StartUpdate`] notification, once
//! per distinct settled index. A recentering settle does not notify by itself;
//! the host reports the recentered index on its next settle. The one exception
//! is a single-item data set, where the host never settles anywhere new, so the
//! pager notifies directly with the recentered index.
//!
//! ```rust
//! use understory_loop_pager::{LoopPager, PageId, PagerHost};
//! # use understory_loop_pager::ItemBinder;
//! # struct Noop;
//! # impl ItemBinder<u32> for Noop {
//! #     type Context = ();
//! #     type View = ();
//! #     fn create_view(&mut self, _cx: &mut ()) {}
//! #     fn bind(&mut self, _cx: &mut (), _slot: usize, _item: &u32) {}
//! # }
//!
//! struct Host {
//!     current: usize,
//! }
//!
//! impl PagerHost for Host {
//!     fn current_index(&self) -> usize {
//!         self.current
//!     }
//!     fn set_current_index_silently(&mut self, index: usize) {
//!         self.current = index;
//!     }
//!     fn remove_page(&mut self, _page: PageId) {}
//! }
//!
//! let items: [u32; 5] = [10, 20, 30, 40, 50];
//! let mut pager = LoopPager::new(|| Some(Noop), &items);
//! assert_eq!(pager.page_count(), 15);
//!
//! // The host settles in the first band and gets moved to the middle band.
//! let mut host = Host { current: 2 };
//! assert_eq!(pager.start_update(&mut host), None);
//! assert_eq!(host.current, 7);
//!
//! // Its next settle is reported once.
//! let update = pager.start_update(&mut host).unwrap();
//! assert_eq!((update.position, update.count), (7, 1));
//! assert_eq!(pager.start_update(&mut host), None);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::index;
use crate::{BinderFactory, ItemBinder, PagerError, PagerHost};

/// Identity of a page handed out by a [`LoopPager`].
///
/// Ids are never reused within one pager, so two pages are the same page exactly
/// when their ids are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(u64);

impl PageId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A materialized page: the host view plus the binder that fills it.
pub struct Page<B, V> {
    id: PageId,
    virtual_index: usize,
    real_index: usize,
    view: V,
    binder: B,
}

impl<B, V> Page<B, V> {
    /// The page's identity token.
    #[must_use]
    pub const fn id(&self) -> PageId {
        self.id
    }

    /// Virtual index the page was created for.
    #[must_use]
    pub const fn virtual_index(&self) -> usize {
        self.virtual_index
    }

    /// Index of the data item currently bound into the page.
    #[must_use]
    pub const fn real_index(&self) -> usize {
        self.real_index
    }

    /// The host view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the host view, for attaching it to a container.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The binder that built this page.
    #[must_use]
    pub const fn binder(&self) -> &B {
        &self.binder
    }
}

impl<B, V> fmt::Debug for Page<B, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("virtual_index", &self.virtual_index)
            .field("real_index", &self.real_index)
            .finish_non_exhaustive()
    }
}

/// Returns `true` if `page` is the page identified by `candidate`.
///
/// Pages are their own identity tokens; contents are never compared.
#[must_use]
pub fn is_same_page<B, V>(page: &Page<B, V>, candidate: PageId) -> bool {
    page.id == candidate
}

/// The page type produced by a [`LoopPager`] over factory `F`.
pub type PagerPage<T, F> = Page<
    <F as BinderFactory<T>>::Binder,
    <<F as BinderFactory<T>>::Binder as ItemBinder<T>>::View,
>;

/// Notification that the host started an update at a newly settled position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StartUpdate {
    /// Virtual index the host settled on (after recentering, if any).
    pub position: usize,
    /// Number of notifications so far, including this one.
    pub count: u64,
}

/// Snapshot of the pager's settle bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateState {
    /// Last position a notification was emitted for, if any.
    pub last_position: Option<usize>,
    /// Number of notifications emitted so far.
    pub update_count: u64,
}

/// Handle for removing a listener registered with [`LoopPager::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<'a> = Box<dyn FnMut(StartUpdate) + 'a>;

/// Infinite-loop paging core over a borrowed, ordered data set.
///
/// The pager presents `items` to a host widget as a virtual space of
/// [`LOOP_FACTOR`](crate::LOOP_FACTOR) copies and keeps the host away from the
/// ends of that space by recentering on every settle. See the
/// [module documentation](self) for the recentering rules.
pub struct LoopPager<'a, T, F> {
    items: &'a [T],
    factory: F,
    loop_enabled: bool,
    state: UpdateState,
    next_page_id: u64,
    next_listener_id: u64,
    listeners: Vec<(ListenerId, Listener<'a>)>,
}

impl<'a, T, F> LoopPager<'a, T, F>
where
    F: BinderFactory<T>,
{
    /// Creates a looping pager over `items` that builds pages with `factory`.
    #[must_use]
    pub fn new(factory: F, items: &'a [T]) -> Self {
        Self {
            items,
            factory,
            loop_enabled: true,
            state: UpdateState::default(),
            next_page_id: 0,
            next_listener_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Sets whether the pager loops, builder style.
    #[must_use]
    pub fn with_loop_enabled(mut self, enabled: bool) -> Self {
        self.loop_enabled = enabled;
        self
    }

    /// Returns whether the pager loops.
    #[must_use]
    pub const fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Sets whether the pager loops.
    ///
    /// Takes effect on the next [`page_count`](Self::page_count) query. Returns
    /// `true` if the flag changed, in which case the host should drop its cached
    /// page count.
    pub fn set_loop_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.loop_enabled != enabled;
        self.loop_enabled = enabled;
        changed
    }

    /// The data set the pager presents.
    #[must_use]
    pub const fn items(&self) -> &'a [T] {
        self.items
    }

    /// Replaces the data set.
    ///
    /// Like toggling the loop flag, this takes effect on the next count query;
    /// pages already handed out keep their content until re-bound with
    /// [`rebind_page`](Self::rebind_page) or destroyed.
    pub fn set_items(&mut self, items: &'a [T]) {
        log::debug!(
            "set_items: real count {} -> {}",
            self.items.len(),
            items.len()
        );
        self.items = items;
    }

    /// Number of data items.
    #[must_use]
    pub const fn real_count(&self) -> usize {
        self.items.len()
    }

    /// Number of pages the host should lay out.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        index::virtual_count(self.real_count(), self.loop_enabled)
    }

    /// Virtual index the host should be moved to in order to show item `real_index`.
    #[must_use]
    pub const fn virtual_index_for(&self, real_index: usize) -> Option<usize> {
        index::to_virtual(real_index, self.real_count(), self.loop_enabled)
    }

    /// Current settle bookkeeping.
    #[must_use]
    pub const fn update_state(&self) -> UpdateState {
        self.state
    }

    /// Registers a callback for [`StartUpdate`] notifications.
    pub fn add_listener(&mut self, listener: impl FnMut(StartUpdate) + 'a) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a callback. Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Builds the page for `virtual_index`.
    ///
    /// Returns `Ok(None)` when the data set is empty; there is nothing to attach.
    /// Otherwise a fresh binder is created, its view is built, and the item at
    /// the mapped real index is bound into it. The host attaches the returned
    /// page itself.
    ///
    /// # Errors
    ///
    /// [`PagerError::MissingBinder`] if the factory produced no binder.
    pub fn create_page(
        &mut self,
        cx: &mut <F::Binder as ItemBinder<T>>::Context,
        virtual_index: usize,
    ) -> Result<Option<PagerPage<T, F>>, PagerError> {
        log::debug!("create_page: virtual index {virtual_index}");
        let Some(real_index) = index::to_real(virtual_index, self.real_count()) else {
            return Ok(None);
        };
        log::debug!("create_page: real index {real_index}");

        let mut binder = self
            .factory
            .create_binder()
            .ok_or(PagerError::MissingBinder { virtual_index })?;
        let view = binder.create_view(cx);
        binder.bind(cx, real_index, &self.items[real_index]);

        let id = PageId(self.next_page_id);
        self.next_page_id += 1;
        Ok(Some(Page {
            id,
            virtual_index,
            real_index,
            view,
            binder,
        }))
    }

    /// Re-binds `page` to the item its virtual index maps to in the current data set.
    ///
    /// Does nothing when the data set is empty.
    pub fn rebind_page(
        &self,
        cx: &mut <F::Binder as ItemBinder<T>>::Context,
        page: &mut PagerPage<T, F>,
    ) {
        let Some(real_index) = index::to_real(page.virtual_index, self.real_count()) else {
            return;
        };
        page.real_index = real_index;
        page.binder.bind(cx, real_index, &self.items[real_index]);
    }

    /// Removes `page` from the host and drops it along with its binder.
    pub fn destroy_page(
        &mut self,
        host: &mut impl PagerHost,
        virtual_index: usize,
        page: PagerPage<T, F>,
    ) {
        log::debug!(
            "destroy_page: virtual index {virtual_index}, page {:?}",
            page.id
        );
        host.remove_page(page.id);
    }

    /// Handles the host starting an update after settling.
    ///
    /// Recenters the host if it settled in an edge band, and otherwise emits one
    /// notification per distinct settled position. The emitted notification, if
    /// any, is returned after all listeners have seen it.
    pub fn start_update(&mut self, host: &mut impl PagerHost) -> Option<StartUpdate> {
        let position = host.current_index();
        let real_count = self.real_count();
        log::debug!("start_update: position {position}");
        if real_count == 0 {
            return None;
        }

        if self.loop_enabled && index::is_in_edge_band(position, real_count) {
            let centered = index::recenter(position, real_count)?;
            log::debug!("start_update: recentering {position} -> {centered}");

            if let Err(err) = host.force_relayout_on_next_frame() {
                log::warn!("start_update: skipping relayout before recentering: {err}");
            }
            host.set_current_index_silently(centered);

            // A single page never produces another settle, so report it here.
            if real_count == 1 && self.state.last_position != Some(position) {
                return Some(self.notify(centered));
            }
            None
        } else if self.state.last_position != Some(position) {
            Some(self.notify(position))
        } else {
            None
        }
    }

    fn notify(&mut self, position: usize) -> StartUpdate {
        self.state.last_position = Some(position);
        self.state.update_count += 1;
        let update = StartUpdate {
            position,
            count: self.state.update_count,
        };
        for (_, listener) in &mut self.listeners {
            listener(update);
        }
        update
    }
}

impl<T, F> fmt::Debug for LoopPager<'_, T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopPager")
            .field("real_count", &self.items.len())
            .field("loop_enabled", &self.loop_enabled)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::{LoopPager, PageId, StartUpdate, UpdateState, is_same_page};
    use crate::{HostError, ItemBinder, PagerError, PagerHost};

    /// Host that records everything the pager asks of it.
    #[derive(Debug, Default)]
    struct RecordingHost {
        current: usize,
        repositions: Vec<usize>,
        removed: Vec<PageId>,
        relayouts: usize,
        relayout_fails: bool,
    }

    impl RecordingHost {
        fn at(current: usize) -> Self {
            Self {
                current,
                ..Self::default()
            }
        }
    }

    impl PagerHost for RecordingHost {
        fn current_index(&self) -> usize {
            self.current
        }

        fn set_current_index_silently(&mut self, index: usize) {
            self.current = index;
            self.repositions.push(index);
        }

        fn remove_page(&mut self, page: PageId) {
            self.removed.push(page);
        }

        fn force_relayout_on_next_frame(&mut self) -> Result<(), HostError> {
            self.relayouts += 1;
            if self.relayout_fails {
                Err(HostError::Unsupported)
            } else {
                Ok(())
            }
        }
    }

    /// Context that logs binder calls in order.
    #[derive(Debug, Default)]
    struct Log(Vec<String>);

    #[derive(Debug)]
    struct TextBinder {
        bound: Option<(usize, &'static str)>,
    }

    impl ItemBinder<&'static str> for TextBinder {
        type Context = Log;
        type View = String;

        fn create_view(&mut self, cx: &mut Log) -> String {
            cx.0.push(String::from("create_view"));
            String::from("view")
        }

        fn bind(&mut self, cx: &mut Log, slot: usize, item: &&'static str) {
            cx.0.push(alloc::format!("bind {slot} {item}"));
            self.bound = Some((slot, *item));
        }
    }

    fn text_binder() -> Option<TextBinder> {
        Some(TextBinder { bound: None })
    }

    const FIVE: [&str; 5] = ["a", "b", "c", "d", "e"];

    #[test]
    fn page_count_follows_loop_flag() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        assert_eq!(pager.page_count(), 15);
        assert!(pager.set_loop_enabled(false));
        assert_eq!(pager.page_count(), 5);
        assert!(!pager.set_loop_enabled(false));
        let pager = LoopPager::new(text_binder, &FIVE[..1]).with_loop_enabled(true);
        assert_eq!(pager.page_count(), 3);
    }

    #[test]
    fn empty_data_is_inert() {
        let empty: [&'static str; 0] = [];
        let mut pager = LoopPager::new(text_binder, &empty);
        assert_eq!(pager.page_count(), 0);

        let mut log = Log::default();
        assert!(matches!(pager.create_page(&mut log, 0), Ok(None)));
        assert!(log.0.is_empty(), "no binder work for an empty data set");

        let mut host = RecordingHost::at(0);
        assert_eq!(pager.start_update(&mut host), None);
        assert!(host.repositions.is_empty());
        assert_eq!(host.relayouts, 0);
        assert_eq!(pager.update_state(), UpdateState::default());

        pager.set_loop_enabled(false);
        assert_eq!(pager.page_count(), 0);
        assert_eq!(pager.start_update(&mut host), None);
        assert!(host.repositions.is_empty());
        assert_eq!(pager.update_state(), UpdateState::default());

        let mut flat = LoopPager::new(text_binder, &empty).with_loop_enabled(false);
        let mut host = RecordingHost::at(3);
        assert_eq!(flat.start_update(&mut host), None);
        assert_eq!(flat.update_state(), UpdateState::default());
    }

    #[test]
    fn create_page_binds_mapped_item() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut log = Log::default();

        let page = pager.create_page(&mut log, 14).unwrap().unwrap();
        assert_eq!(page.virtual_index(), 14);
        assert_eq!(page.real_index(), 4);
        assert_eq!(page.view(), "view");
        assert_eq!(page.binder().bound, Some((4, "e")));
        assert_eq!(log.0, vec!["create_view", "bind 4 e"]);
    }

    #[test]
    fn every_page_gets_its_own_binder_and_id() {
        let created = RefCell::new(0_usize);
        let factory = || {
            *created.borrow_mut() += 1;
            text_binder()
        };
        let mut pager = LoopPager::new(factory, &FIVE);
        let mut log = Log::default();

        let a = pager.create_page(&mut log, 6).unwrap().unwrap();
        let b = pager.create_page(&mut log, 6).unwrap().unwrap();
        assert_eq!(*created.borrow(), 2);
        assert_ne!(a.id(), b.id());
        assert!(is_same_page(&a, a.id()));
        assert!(!is_same_page(&a, b.id()));
    }

    #[test]
    fn missing_binder_is_reported() {
        let mut pager = LoopPager::new(|| None::<TextBinder>, &FIVE);
        let mut log = Log::default();
        let err = pager.create_page(&mut log, 3).unwrap_err();
        assert_eq!(err, PagerError::MissingBinder { virtual_index: 3 });
        assert!(log.0.is_empty());
    }

    #[test]
    fn destroy_page_detaches_from_host() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut log = Log::default();
        let mut host = RecordingHost::at(5);

        let page = pager.create_page(&mut log, 5).unwrap().unwrap();
        let id = page.id();
        pager.destroy_page(&mut host, 5, page);
        assert_eq!(host.removed, vec![id]);
        assert!(host.repositions.is_empty());
    }

    #[test]
    fn rebind_page_follows_replaced_data() {
        let first = ["a", "b", "c"];
        let second = ["x", "y"];
        let empty: [&'static str; 0] = [];
        let mut pager = LoopPager::new(text_binder, &first);
        let mut log = Log::default();

        let mut page = pager.create_page(&mut log, 5).unwrap().unwrap();
        assert_eq!(page.real_index(), 2);

        pager.set_items(&second);
        assert_eq!(pager.page_count(), 6);
        pager.rebind_page(&mut log, &mut page);
        assert_eq!(page.real_index(), 1);
        assert_eq!(page.binder().bound, Some((1, "y")));

        pager.set_items(&empty);
        pager.rebind_page(&mut log, &mut page);
        assert_eq!(page.real_index(), 1);
    }

    #[test]
    fn edge_settle_recenters_without_notifying() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut host = RecordingHost::at(2);

        assert_eq!(pager.start_update(&mut host), None);
        assert_eq!(host.repositions, vec![7]);
        assert_eq!(host.relayouts, 1);
        assert_eq!(pager.update_state().update_count, 0);

        let mut host = RecordingHost::at(13);
        assert_eq!(pager.start_update(&mut host), None);
        assert_eq!(host.repositions, vec![8]);
    }

    #[test]
    fn recentered_settle_is_idempotent() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut host = RecordingHost::at(0);

        pager.start_update(&mut host);
        assert_eq!(host.current, 5);
        let first = pager.start_update(&mut host);
        let second = pager.start_update(&mut host);

        assert_eq!(first, Some(StartUpdate { position: 5, count: 1 }));
        assert_eq!(second, None);
        assert_eq!(host.repositions, vec![5], "only the edge settle repositions");
        assert_eq!(host.relayouts, 1);
    }

    #[test]
    fn repeated_settles_count_once() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut host = RecordingHost::at(7);

        for _ in 0..10 {
            pager.start_update(&mut host);
        }
        assert_eq!(
            pager.update_state(),
            UpdateState {
                last_position: Some(7),
                update_count: 1,
            }
        );

        host.current = 8;
        for _ in 0..3 {
            pager.start_update(&mut host);
        }
        assert_eq!(pager.update_state().update_count, 2);

        // Returning to an earlier position re-arms the counter.
        host.current = 7;
        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 7, count: 3 })
        );
    }

    #[test]
    fn single_item_notifies_on_each_distinct_settle() {
        let one = ["only"];
        let mut pager = LoopPager::new(text_binder, &one);
        assert_eq!(pager.page_count(), 3);
        let mut host = RecordingHost::at(0);

        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 1, count: 1 })
        );
        assert_eq!(host.current, 1);
        // Settling on the recentered page again is not a new position.
        assert_eq!(pager.start_update(&mut host), None);

        host.current = 2;
        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 1, count: 2 })
        );
        assert_eq!(pager.start_update(&mut host), None);

        host.current = 0;
        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 1, count: 3 })
        );
        assert_eq!(host.repositions, vec![1, 1, 1]);
    }

    #[test]
    fn non_looping_pager_never_recenters() {
        let mut pager = LoopPager::new(text_binder, &FIVE).with_loop_enabled(false);
        let mut host = RecordingHost::at(0);

        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 0, count: 1 })
        );
        host.current = 4;
        assert_eq!(
            pager.start_update(&mut host),
            Some(StartUpdate { position: 4, count: 2 })
        );
        assert!(host.repositions.is_empty());
        assert_eq!(host.relayouts, 0);
    }

    #[test]
    fn failed_relayout_still_recenters() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let mut host = RecordingHost {
            relayout_fails: true,
            ..RecordingHost::at(11)
        };

        assert_eq!(pager.start_update(&mut host), None);
        assert_eq!(host.relayouts, 1);
        assert_eq!(host.current, 6);
    }

    #[test]
    fn listeners_see_every_notification() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut pager = LoopPager::new(text_binder, &FIVE);
        let sink = Rc::clone(&seen);
        let id = pager.add_listener(move |update| sink.borrow_mut().push(update));
        let other = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&other);
        pager.add_listener(move |_| *counter.borrow_mut() += 1);

        let mut host = RecordingHost::at(6);
        pager.start_update(&mut host);
        host.current = 9;
        pager.start_update(&mut host);

        assert_eq!(
            *seen.borrow(),
            vec![
                StartUpdate { position: 6, count: 1 },
                StartUpdate { position: 9, count: 2 },
            ]
        );

        assert!(pager.remove_listener(id));
        assert!(!pager.remove_listener(id));
        host.current = 8;
        pager.start_update(&mut host);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(*other.borrow(), 3);
    }

    #[test]
    fn listeners_may_borrow_shorter_lived_state() {
        let items = ["a", "b", "c"];
        let last = Cell::new(None);
        let mut pager = LoopPager::new(text_binder, &items);
        pager.add_listener(|update| last.set(Some(update.position)));

        let mut host = RecordingHost::at(4);
        pager.start_update(&mut host);
        assert_eq!(last.get(), Some(4));
    }

    #[test]
    fn virtual_index_for_targets_middle_band() {
        let mut pager = LoopPager::new(text_binder, &FIVE);
        assert_eq!(pager.virtual_index_for(3), Some(8));
        assert_eq!(pager.virtual_index_for(5), None);
        pager.set_loop_enabled(false);
        assert_eq!(pager.virtual_index_for(3), Some(3));
    }
}
