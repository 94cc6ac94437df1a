//! Pagination window
//!
//! Pure computation of the page indicators and first/previous/next/last
//! controls shown around the current page.

use std::ops::RangeInclusive;

/// Maximum number of page indicators shown at once
pub const WINDOW_SIZE: u32 = 10;

/// A pagination control the user can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First,
    Previous,
    Page(u32),
    Next,
    Last,
}

/// One rendered control with its resolved target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub control: PageControl,
    pub target: u32,
    pub active: bool,
    pub disabled: bool,
}

/// The window of page indicators for a `(page, total_pages)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    page: u32,
    total_pages: u32,
    start: u32,
    end: u32,
}

impl PaginationWindow {
    pub fn new(page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let page = page.clamp(1, total_pages);

        let start = page.saturating_sub(WINDOW_SIZE / 2).max(1);
        let end = total_pages.min(start + WINDOW_SIZE - 1);
        // Pull the window back when it hits the last page
        let start = start.min((end + 1).saturating_sub(WINDOW_SIZE).max(1));

        Self {
            page,
            total_pages,
            start,
            end,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Page numbers shown as indicators
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_on_first_page(&self) -> bool {
        self.page == 1
    }

    pub fn is_on_last_page(&self) -> bool {
        self.page == self.total_pages
    }

    /// Whether a control can be activated from the current page
    pub fn is_disabled(&self, control: PageControl) -> bool {
        match control {
            PageControl::First | PageControl::Previous => self.is_on_first_page(),
            PageControl::Next | PageControl::Last => self.is_on_last_page(),
            PageControl::Page(n) => !self.pages().contains(&n),
        }
    }

    /// Page a control leads to, or `None` when the control is disabled
    pub fn target(&self, control: PageControl) -> Option<u32> {
        if self.is_disabled(control) {
            return None;
        }
        Some(self.raw_target(control))
    }

    fn raw_target(&self, control: PageControl) -> u32 {
        match control {
            PageControl::First => 1,
            PageControl::Previous => self.page.saturating_sub(1).max(1),
            PageControl::Page(n) => n,
            PageControl::Next => (self.page + 1).min(self.total_pages),
            PageControl::Last => self.total_pages,
        }
    }

    /// All controls in display order: first, previous, indicators, next, last
    pub fn buttons(&self) -> Vec<PageButton> {
        let button = |control: PageControl| PageButton {
            control,
            target: self.raw_target(control),
            active: control == PageControl::Page(self.page),
            disabled: self.is_disabled(control),
        };

        let mut buttons = Vec::with_capacity(self.len() + 4);
        buttons.push(button(PageControl::First));
        buttons.push(button(PageControl::Previous));
        buttons.extend(self.pages().map(|n| button(PageControl::Page(n))));
        buttons.push(button(PageControl::Next));
        buttons.push(button(PageControl::Last));
        buttons
    }
}
