//! Pagination completeness for `fetch_all_stars`.
//!
//! A fake page source splits a star list into pages of at most 100 items
//! and hands out opaque cursors; the fetcher must return the union of all
//! pages in order, with nothing lost or repeated.

use std::cell::Cell;

use rstest::rstest;
use starsync_core::StarRecord;
use starsync_github::{fetch_all_stars, FetchError, StarPage, StarPageSource, PAGE_SIZE};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

struct Paged {
    all: Vec<StarRecord>,
    page_size: usize,
    requests: Cell<usize>,
}

impl Paged {
    fn new(total: usize, page_size: usize) -> Self {
        let all = (0..total)
            .map(|i| {
                StarRecord::new(
                    format!("repo-{i}"),
                    format!("https://github.com/o/repo-{i}"),
                    if i % 3 == 0 { String::new() } else { format!("desc {i}") },
                )
            })
            .collect();
        Self {
            all,
            page_size,
            requests: Cell::new(0),
        }
    }
}

impl StarPageSource for Paged {
    fn fetch_page(&self, login: &str, after: Option<&str>) -> Result<StarPage, FetchError> {
        assert_eq!(login, "octocat");
        self.requests.set(self.requests.get() + 1);
        let start = match after {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("cursor:")
                .and_then(|n| n.parse::<usize>().ok())
                .expect("cursor handed out by this source"),
        };
        let end = (start + self.page_size).min(self.all.len());
        let has_next_page = end < self.all.len();
        Ok(StarPage {
            stars: self.all[start..end].to_vec(),
            has_next_page,
            end_cursor: Some(format!("cursor:{end}")),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(100, 1)]
#[case(101, 2)]
#[case(250, 3)]
fn returns_every_star_in_page_order(#[case] total: usize, #[case] expected_requests: usize) {
    let source = Paged::new(total, PAGE_SIZE as usize);
    let stars = fetch_all_stars(&source, "octocat").expect("fetch");
    assert_eq!(stars, source.all);
    assert_eq!(source.requests.get(), expected_requests);
}

#[test]
fn small_pages_are_stitched_together() {
    let source = Paged::new(7, 2);
    let stars = fetch_all_stars(&source, "octocat").expect("fetch");
    let urls: Vec<_> = stars.iter().map(|s| s.url.as_str()).collect();
    let expected: Vec<_> = source.all.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, expected);
    assert_eq!(source.requests.get(), 4);
}
