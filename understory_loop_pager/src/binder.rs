// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-supplied page content.

/// Builds the view for one page and binds data items into it.
///
/// The pager creates one binder per materialized page and keeps it inside the
/// [`Page`](crate::Page) until the page is destroyed, so a binder may hold on
/// to whatever it needs to update its view later.
pub trait ItemBinder<T> {
    /// Host context passed through to view construction (for example a UI context).
    type Context: ?Sized;
    /// The host's view handle for a page.
    type View;

    /// Creates the (still unbound) view for this page.
    fn create_view(&mut self, cx: &mut Self::Context) -> Self::View;

    /// Shows `item`, the data item at real index `slot`, in this binder's view.
    ///
    /// May be called again on the same binder when its page is re-bound.
    fn bind(&mut self, cx: &mut Self::Context, slot: usize, item: &T);
}

/// Produces a fresh [`ItemBinder`] for every page the pager materializes.
///
/// Returning `None` is a programming error; the pager reports it as
/// [`PagerError::MissingBinder`](crate::PagerError::MissingBinder) instead of
/// building a page without content.
///
/// Any `FnMut() -> Option<B>` closure is a factory:
///
/// ```rust
/// use understory_loop_pager::{BinderFactory, ItemBinder};
///
/// struct Label(Option<usize>);
///
/// impl ItemBinder<&'static str> for Label {
///     type Context = ();
///     type View = ();
///     fn create_view(&mut self, _cx: &mut ()) {}
///     fn bind(&mut self, _cx: &mut (), slot: usize, _item: &&'static str) {
///         self.0 = Some(slot);
///     }
/// }
///
/// let mut factory = || Some(Label(None));
/// let binder = BinderFactory::<&'static str>::create_binder(&mut factory);
/// assert!(binder.is_some());
/// ```
pub trait BinderFactory<T> {
    /// The binder type this factory creates.
    type Binder: ItemBinder<T>;

    /// Creates a new binder, or `None` if the factory is misconfigured.
    fn create_binder(&mut self) -> Option<Self::Binder>;
}

impl<T, B, F> BinderFactory<T> for F
where
    B: ItemBinder<T>,
    F: FnMut() -> Option<B>,
{
    type Binder = B;

    fn create_binder(&mut self) -> Option<B> {
        self()
    }
}
