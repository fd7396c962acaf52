// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Infinite carousel: loop pager + a simulated host widget.
//!
//! This example shows how a host carousel drives `understory_loop_pager`:
//! - asking the pager for the page count and materializing a window of pages,
//! - reporting every settle with `start_update` so the pager can recenter,
//! - applying `PageTransformer` output to each visible page per drag frame.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example loop_carousel`

use std::collections::BTreeMap;

use kurbo::{Point, Size};
use understory_loop_pager::{
    ItemBinder, LoopPager, PageId, PageTransformer, PagerHost, PagerPage, StartUpdate,
};

/// Pages kept alive on each side of the current one, like a padded viewport.
const OFFSCREEN_PAGES: usize = 1;

/// Stand-in for the platform's resource loader.
#[derive(Debug, Default)]
struct Resources {
    loads: usize,
}

/// Binds an image name into a text "view".
#[derive(Debug)]
struct ImageBinder;

impl ItemBinder<&'static str> for ImageBinder {
    type Context = Resources;
    type View = String;

    fn create_view(&mut self, _cx: &mut Resources) -> String {
        String::from("<empty>")
    }

    fn bind(&mut self, cx: &mut Resources, slot: usize, item: &&'static str) {
        cx.loads += 1;
        log::debug!("binding {item} into slot {slot}");
    }
}

/// The simulated carousel container.
#[derive(Debug, Default)]
struct Carousel {
    current: usize,
    attached: Vec<PageId>,
}

impl PagerHost for Carousel {
    fn current_index(&self) -> usize {
        self.current
    }

    fn set_current_index_silently(&mut self, index: usize) {
        self.current = index;
    }

    fn remove_page(&mut self, page: PageId) {
        self.attached.retain(|id| *id != page);
    }
}

type Factory = fn() -> Option<ImageBinder>;
type DemoPage = PagerPage<&'static str, Factory>;

/// Creates pages around the current index and destroys those that left the window.
fn populate(
    pager: &mut LoopPager<'_, &'static str, Factory>,
    carousel: &mut Carousel,
    resources: &mut Resources,
    live: &mut BTreeMap<usize, DemoPage>,
) {
    let count = pager.page_count();
    let first = carousel.current.saturating_sub(OFFSCREEN_PAGES);
    let last = (carousel.current + OFFSCREEN_PAGES).min(count.saturating_sub(1));

    let stale: Vec<usize> = live
        .keys()
        .copied()
        .filter(|index| *index < first || *index > last)
        .collect();
    for index in stale {
        if let Some(page) = live.remove(&index) {
            pager.destroy_page(carousel, index, page);
        }
    }

    for index in first..=last {
        if live.contains_key(&index) {
            continue;
        }
        match pager.create_page(resources, index) {
            Ok(Some(page)) => {
                carousel.attached.push(page.id());
                live.insert(index, page);
            }
            Ok(None) => {}
            Err(err) => log::error!("could not create page {index}: {err}"),
        }
    }
}

fn settle(
    pager: &mut LoopPager<'_, &'static str, Factory>,
    carousel: &mut Carousel,
    resources: &mut Resources,
    live: &mut BTreeMap<usize, DemoPage>,
) {
    populate(pager, carousel, resources, live);
    let before = carousel.current;
    pager.start_update(carousel);
    if carousel.current != before {
        // A recenter moved us; the host lays out again and settles once more.
        populate(pager, carousel, resources, live);
        pager.start_update(carousel);
    }
}

fn main() {
    env_logger::init();

    let images: [&'static str; 5] = ["ic_test_0", "ic_test_1", "ic_test_2", "ic_test_3", "ic_test_4"];
    let factory: Factory = || Some(ImageBinder);
    let mut pager = LoopPager::new(factory, &images);
    pager.add_listener(|update: StartUpdate| {
        println!(
            "start update: position {} (update #{})",
            update.position, update.count
        );
    });

    let transformer = PageTransformer::rotate_down();
    let page_size = Size::new(300.0, 200.0);

    let mut resources = Resources::default();
    let mut carousel = Carousel::default();
    let mut live = BTreeMap::new();

    println!("{} items -> {} virtual pages", images.len(), pager.page_count());
    carousel.current = pager.virtual_index_for(0).unwrap_or(0);
    settle(&mut pager, &mut carousel, &mut resources, &mut live);

    // Swipe right past the end twice and then back left past the start.
    let swipes: [isize; 14] = [1, 1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1];
    for step in swipes {
        // Halfway through the drag, every live page gets its transform.
        for (index, page) in &live {
            let offset = *index as f64 - carousel.current as f64 - step as f64 * 0.5;
            let transform = transformer.transform_page(offset);
            let corner = transform.to_affine(page_size) * Point::ORIGIN;
            println!(
                "  page {index:>2} (item {}) offset {offset:+.1}: rotation {:+.3} deg, origin -> ({:.2}, {:.2})",
                page.real_index(),
                transform.rotation,
                corner.x,
                corner.y
            );
        }

        carousel.current = carousel.current.saturating_add_signed(step);
        settle(&mut pager, &mut carousel, &mut resources, &mut live);
        println!(
            "settled on virtual {} showing {}",
            carousel.current,
            images[carousel.current % images.len()]
        );
    }

    println!(
        "{} views attached, {} binds performed, {} notifications",
        carousel.attached.len(),
        resources.loads,
        pager.update_state().update_count
    );
}
