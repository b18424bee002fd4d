//! Page slicing with clamping.
//!
//! Page numbers arrive from query strings and are never trusted: anything
//! that is not an integer becomes page 1, anything below 1 becomes page 1 and
//! anything past the end becomes the last page. An empty source still yields
//! one (empty) page.

use std::convert::Infallible;
use std::num::IntErrorKind;

use serde::Serialize;

use crate::constants::DEFAULT_PAGE_SIZE;

/// A page number as requested by the client, already made safe to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(i64);

impl PageRequest {
    /// Parse the raw `page` query value. Missing or non-numeric input is page 1.
    /// Integers too wide for `i64` saturate, so they still clamp to the
    /// nearest end.
    pub fn parse(raw: Option<&str>) -> Self {
        let number = raw
            .and_then(|s| match s.trim().parse::<i64>() {
                Ok(n) => Some(n),
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Some(i64::MAX),
                    IntErrorKind::NegOverflow => Some(i64::MIN),
                    _ => None,
                },
            })
            .unwrap_or(1);
        Self(number)
    }

    /// Clamp into `1..=num_pages` (`num_pages` is at least 1).
    fn clamp(self, num_pages: usize) -> usize {
        let last = num_pages.max(1) as i64;
        self.0.clamp(1, last) as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self(1)
    }
}

/// Anything that can report its length and hand out a contiguous slice.
///
/// Store listings implement this with `COUNT(*)` plus `LIMIT/OFFSET`, so only
/// the requested page is ever materialised.
pub trait PageSource {
    type Item;
    type Error;

    fn total(&self) -> Result<usize, Self::Error>;

    fn slice(&self, offset: usize, limit: usize) -> Result<Vec<Self::Item>, Self::Error>;
}

impl<T: Clone> PageSource for [T] {
    type Item = T;
    type Error = Infallible;

    fn total(&self) -> Result<usize, Infallible> {
        Ok(self.len())
    }

    fn slice(&self, offset: usize, limit: usize) -> Result<Vec<T>, Infallible> {
        let start = offset.min(self.len());
        let end = offset.saturating_add(limit).min(self.len());
        Ok(self[start..end].to_vec())
    }
}

impl<T: Clone> PageSource for Vec<T> {
    type Item = T;
    type Error = Infallible;

    fn total(&self) -> Result<usize, Infallible> {
        self.as_slice().total()
    }

    fn slice(&self, offset: usize, limit: usize) -> Result<Vec<T>, Infallible> {
        self.as_slice().slice(offset, limit)
    }
}

/// One page of results plus what a renderer needs to draw navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page, 1-indexed.
    pub number: usize,
    pub num_pages: usize,
    /// Items across all pages.
    pub total: usize,
    pub per_page: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    /// A page size of zero is treated as 1.
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn num_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    pub fn page<S>(&self, source: &S, request: PageRequest) -> Result<Page<S::Item>, S::Error>
    where
        S: PageSource + ?Sized,
    {
        let total = source.total()?;
        let num_pages = self.num_pages(total);
        let number = request.clamp(num_pages);

        let items = if total == 0 {
            Vec::new()
        } else {
            source.slice((number - 1) * self.per_page, self.per_page)?
        };

        Ok(Page {
            items,
            number,
            num_pages,
            total,
            per_page: self.per_page,
            has_next: number < num_pages,
            has_previous: number > 1,
            next_page_number: (number < num_pages).then_some(number + 1),
            previous_page_number: (number > 1).then(|| number - 1),
        })
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
