//! Cursor pagination over a star-listing source.

use starsync_core::StarRecord;

use crate::error::FetchError;

/// Items requested per page; the GraphQL API caps `first` at 100.
pub const PAGE_SIZE: u32 = 100;

/// One page of starred repositories plus its pagination info.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StarPage {
    pub stars: Vec<StarRecord>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Something that can return a single page of a user's stars.
///
/// `after = None` requests the first page.
pub trait StarPageSource {
    fn fetch_page(&self, login: &str, after: Option<&str>) -> Result<StarPage, FetchError>;
}

/// Something that can return every star of a user, in listing order.
pub trait StarFetcher {
    fn fetch_stars(&self, login: &str) -> Result<Vec<StarRecord>, FetchError>;
}

/// Fetch all stars of `login` by following cursors until `hasNextPage` is false.
///
/// Any page failure aborts the whole fetch; no partial list is returned.
/// There is no page limit: a source that never reports the last page keeps
/// this looping.
pub fn fetch_all_stars<S>(source: &S, login: &str) -> Result<Vec<StarRecord>, FetchError>
where
    S: StarPageSource + ?Sized,
{
    let mut stars = Vec::new();
    let mut end_cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(login, end_cursor.as_deref())?;
        pages += 1;
        tracing::debug!(page = pages, items = page.stars.len(), "fetched star page");
        stars.extend(page.stars);

        if !page.has_next_page {
            break;
        }
        end_cursor = Some(page.end_cursor.ok_or(FetchError::MissingCursor)?);
    }

    tracing::info!(user = login, stars = stars.len(), pages, "retrieved stars");
    Ok(stars)
}

/// [`StarFetcher`] that paginates a live [`StarPageSource`].
#[derive(Debug, Clone)]
pub struct PagedFetcher<S> {
    source: S,
}

impl<S: StarPageSource> PagedFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: StarPageSource> StarFetcher for PagedFetcher<S> {
    fn fetch_stars(&self, login: &str) -> Result<Vec<StarRecord>, FetchError> {
        fetch_all_stars(&self.source, login)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replays canned pages and records the cursors it was asked for.
    struct Scripted {
        pages: Vec<Result<StarPage, FetchError>>,
        cursors: RefCell<Vec<Option<String>>>,
    }

    impl StarPageSource for Scripted {
        fn fetch_page(&self, _login: &str, after: Option<&str>) -> Result<StarPage, FetchError> {
            let mut cursors = self.cursors.borrow_mut();
            let idx = cursors.len();
            cursors.push(after.map(str::to_owned));
            match self.pages.get(idx) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(_)) => Err(FetchError::Transport("scripted failure".into())),
                None => panic!("fetched past the last scripted page"),
            }
        }
    }

    fn page(urls: &[&str], next: Option<&str>) -> StarPage {
        StarPage {
            stars: urls.iter().map(|u| StarRecord::new(*u, *u, "")).collect(),
            has_next_page: next.is_some(),
            end_cursor: next.map(str::to_owned),
        }
    }

    #[test]
    fn first_request_has_no_cursor_and_later_ones_follow_it() {
        let source = Scripted {
            pages: vec![Ok(page(&["a"], Some("c1"))), Ok(page(&["b"], None))],
            cursors: RefCell::new(vec![]),
        };
        fetch_all_stars(&source, "octocat").expect("fetch");
        assert_eq!(
            *source.cursors.borrow(),
            vec![None, Some("c1".to_string())]
        );
    }

    #[test]
    fn failure_mid_way_returns_no_partial_list() {
        let source = Scripted {
            pages: vec![
                Ok(page(&["a"], Some("c1"))),
                Err(FetchError::Transport("x".into())),
            ],
            cursors: RefCell::new(vec![]),
        };
        let err = fetch_all_stars(&source, "octocat").unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn next_page_without_cursor_is_rejected() {
        let source = Scripted {
            pages: vec![Ok(StarPage {
                stars: vec![],
                has_next_page: true,
                end_cursor: None,
            })],
            cursors: RefCell::new(vec![]),
        };
        let err = fetch_all_stars(&source, "octocat").unwrap_err();
        assert!(matches!(err, FetchError::MissingCursor));
    }

    #[test]
    fn paged_fetcher_delegates() {
        let fetcher = PagedFetcher::new(Scripted {
            pages: vec![Ok(page(&["a", "b"], None))],
            cursors: RefCell::new(vec![]),
        });
        let stars = fetcher.fetch_stars("octocat").expect("fetch");
        assert_eq!(stars.len(), 2);
    }
}
