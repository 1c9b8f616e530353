use crate::queries::{AFTER_VARIABLE, Paginator};
use crate::types::{Cursor, JsonMap};
use crate::{QueryExecutor, TransportError, decode_data};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use thiserror::Error;

/// What to do when the request for a page fails
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnPageError {
    /// Stop paginating and return the items fetched so far
    #[default]
    Truncate,

    /// Return the error to the caller
    Propagate,
}

/// Settings for [`paginate()`]
///
/// The default settings truncate on error and place no bound on the number
/// of pages fetched or on the time taken.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PaginationOptions {
    pub on_error: OnPageError,

    /// Stop after requesting this many pages even if the server reports that
    /// more are available
    pub max_pages: Option<NonZeroUsize>,

    /// Do not request any further pages once this much time has passed since
    /// pagination started
    pub max_elapsed: Option<Duration>,
}

impl PaginationOptions {
    pub fn on_error(mut self, on_error: OnPageError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn max_pages(mut self, max_pages: Option<NonZeroUsize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_elapsed(mut self, max_elapsed: Option<Duration>) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    fn bound_reached(&self, pages_requested: usize, start: Instant) -> bool {
        self.max_pages.is_some_and(|n| pages_requested >= n.get())
            || self.max_elapsed.is_some_and(|d| start.elapsed() >= d)
    }
}

/// An iterator over the pages of a paginated listing, yielding the items of
/// each page in turn
///
/// Each call to `next()` performs one request.  Iteration ends after the
/// server reports that there is no next page or after the first failed
/// request, whose error is yielded as the final element.
#[derive(Debug)]
pub struct Pages<'a, E: ?Sized, P> {
    executor: &'a E,
    paginator: P,
    variables: JsonMap,
    cursor: Option<Cursor>,
    pages_requested: usize,
    done: bool,
}

impl<'a, E: QueryExecutor + ?Sized, P: Paginator> Pages<'a, E, P> {
    pub fn new(executor: &'a E, paginator: P) -> Self {
        let mut variables = paginator.variables();
        if variables.remove(AFTER_VARIABLE).is_some() {
            tracing::warn!(
                operation = paginator.query().name(),
                "Ignoring caller-supplied `{AFTER_VARIABLE}` variable; the pagination cursor is managed internally"
            );
        }
        Pages {
            executor,
            paginator,
            variables,
            cursor: None,
            pages_requested: 0,
            done: false,
        }
    }

    /// Returns `true` if another page remains to be requested
    pub fn has_next_page(&self) -> bool {
        !self.done
    }

    /// The number of page requests made so far, including any failed request
    pub fn pages_requested(&self) -> usize {
        self.pages_requested
    }

    /// The cursor that will be sent with the next page request
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    fn fetch_page(&self) -> Result<P::Page, TransportError> {
        let mut variables = self.variables.clone();
        variables.insert(AFTER_VARIABLE.to_owned(), self.cursor.clone().into());
        let data = self.executor.execute(self.paginator.query(), variables)?;
        decode_data(self.paginator.query(), data)
    }
}

impl<E: QueryExecutor + ?Sized, P: Paginator> Iterator for Pages<'_, E, P> {
    type Item = Result<Vec<P::Item>, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.pages_requested += 1;
        match self.fetch_page() {
            Ok(page) => {
                let info = self.paginator.page_info(&page);
                let items = self.paginator.nodes(page);
                tracing::debug!(
                    operation = self.paginator.query().name(),
                    page = self.pages_requested,
                    items = items.len(),
                    has_next_page = info.has_next_page,
                    "Fetched page"
                );
                self.cursor = info.end_cursor;
                self.done = !info.has_next_page;
                Some(Ok(items))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<E: QueryExecutor + ?Sized, P: Paginator> FusedIterator for Pages<'_, E, P> {}

/// Why a call to [`paginate()`] stopped requesting pages
#[derive(Debug)]
pub enum PaginationEnd {
    /// The server reported that there were no more pages
    Exhausted,

    /// A page request failed and the listing was truncated
    Aborted(TransportError),

    /// A page or time bound from [`PaginationOptions`] was reached while the
    /// server still reported more pages
    Bounded,
}

/// The items fetched by [`paginate()`]
#[derive(Debug)]
pub struct Paginated<T> {
    /// All items fetched, in page order
    pub items: Vec<T>,

    /// The number of pages successfully fetched
    pub pages: usize,

    pub end: PaginationEnd,
}

impl<T> Paginated<T> {
    /// Returns `true` if every page of the listing was fetched
    pub fn is_complete(&self) -> bool {
        matches!(self.end, PaginationEnd::Exhausted)
    }
}

#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("failed to fetch page {page} of {operation} after {items_fetched} items")]
    Page {
        operation: &'static str,
        page: usize,
        items_fetched: usize,
        #[source]
        source: TransportError,
    },
}

/// Fetch every page of the listing described by `paginator` and return all
/// of the items in order.
///
/// Under [`OnPageError::Truncate`], a failed page request ends pagination
/// and the items from the preceding pages are returned with
/// [`PaginationEnd::Aborted`]; the error is only returned under
/// [`OnPageError::Propagate`].
pub fn paginate<E, P>(
    executor: &E,
    paginator: P,
    options: PaginationOptions,
) -> Result<Paginated<P::Item>, PaginateError>
where
    E: QueryExecutor + ?Sized,
    P: Paginator,
{
    let operation = paginator.query().name();
    let start = Instant::now();
    let mut pages = Pages::new(executor, paginator);
    let mut items = Vec::new();
    let mut fetched = 0;
    let end = loop {
        if pages.has_next_page() && options.bound_reached(pages.pages_requested(), start) {
            tracing::warn!(
                operation,
                pages = fetched,
                items = items.len(),
                "Stopping pagination at configured bound while more pages remain"
            );
            break PaginationEnd::Bounded;
        }
        match pages.next() {
            Some(Ok(page)) => {
                fetched += 1;
                items.extend(page);
            }
            Some(Err(source)) => match options.on_error {
                OnPageError::Truncate => {
                    tracing::warn!(
                        operation,
                        pages = fetched,
                        items = items.len(),
                        error = %source,
                        "Page request failed; returning partial results"
                    );
                    break PaginationEnd::Aborted(source);
                }
                OnPageError::Propagate => {
                    return Err(PaginateError::Page {
                        operation,
                        page: pages.pages_requested(),
                        items_fetched: items.len(),
                        source,
                    });
                }
            },
            None => break PaginationEnd::Exhausted,
        }
    };
    Ok(Paginated {
        items,
        pages: fetched,
        end,
    })
}

/// Fetch every page of the listing described by `paginator`, stopping
/// quietly at the first failed request, and return the items in order.
///
/// A failure on the first page results in an empty `Vec`.  Use
/// [`paginate()`] to find out whether the listing was truncated.
pub fn fetch_all<E, P>(executor: &E, paginator: P) -> Vec<P::Item>
where
    E: QueryExecutor + ?Sized,
    P: Paginator,
{
    Pages::new(executor, paginator)
        .map_while(Result::ok)
        .flatten()
        .collect()
}
