use crate::types::{JsonMap, Page, PageInfo, Singleton};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// The name of the GraphQL variable through which the pagination cursor is
/// passed
pub const AFTER_VARIABLE: &str = "after";

/// A named GraphQL operation document
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Query {
    name: &'static str,
    document: &'static str,
}

impl Query {
    pub const fn new(name: &'static str, document: &'static str) -> Query {
        Query { name, document }
    }

    /// The operation name, as sent in the request's `operationName` field
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The GraphQL source text of the operation
    pub fn document(&self) -> &'static str {
        self.document
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A description of a cursor-paginated GraphQL listing
///
/// The query returned by [`Paginator::query()`] must accept an `$after`
/// variable giving the cursor after which to start the page; the pagination
/// driver sets that variable itself, so [`Paginator::variables()`] should
/// not include it.
pub trait Paginator {
    /// The deserialized form of one response's `data`
    type Page: DeserializeOwned;

    /// The records contained in each page
    type Item;

    fn query(&self) -> &Query;

    /// Variables to send with every page request
    fn variables(&self) -> JsonMap;

    /// Extract the items from a page, in server order
    fn nodes(&self, page: Self::Page) -> Vec<Self::Item>;

    /// Extract the continuation metadata from a page
    fn page_info(&self, page: &Self::Page) -> PageInfo;
}

impl<P: Paginator + ?Sized> Paginator for &P {
    type Page = P::Page;
    type Item = P::Item;

    fn query(&self) -> &Query {
        (**self).query()
    }

    fn variables(&self) -> JsonMap {
        (**self).variables()
    }

    fn nodes(&self, page: Self::Page) -> Vec<Self::Item> {
        (**self).nodes(page)
    }

    fn page_info(&self, page: &Self::Page) -> PageInfo {
        (**self).page_info(page)
    }
}

/// A [`Paginator`] for queries whose data consists of a single root field
/// holding a connection, i.e., `{"<field>": {"nodes": [...], "pageInfo":
/// {...}}}`
#[derive(Clone, Debug)]
pub struct ConnectionPaginator<T> {
    query: Query,
    variables: JsonMap,
    _item: PhantomData<fn() -> T>,
}

impl<T> ConnectionPaginator<T> {
    pub fn new(query: Query) -> Self {
        ConnectionPaginator {
            query,
            variables: JsonMap::new(),
            _item: PhantomData,
        }
    }

    pub fn with_variable<V: Into<serde_json::Value>>(mut self, name: &str, value: V) -> Self {
        self.variables.insert(name.to_owned(), value.into());
        self
    }
}

impl<T: DeserializeOwned> Paginator for ConnectionPaginator<T> {
    type Page = Singleton<Page<T>>;
    type Item = T;

    fn query(&self) -> &Query {
        &self.query
    }

    fn variables(&self) -> JsonMap {
        self.variables.clone()
    }

    fn nodes(&self, page: Self::Page) -> Vec<T> {
        page.0.items
    }

    fn page_info(&self, page: &Self::Page) -> PageInfo {
        page.0.page_info()
    }
}

/// A [`Paginator`] built from a query, base variables, and a pair of accessor
/// functions
pub struct FnPaginator<Pg, T, N, I> {
    query: Query,
    variables: JsonMap,
    get_nodes: N,
    get_page_info: I,
    _page: PhantomData<fn(Pg) -> T>,
}

impl<Pg, T, N, I> FnPaginator<Pg, T, N, I>
where
    N: Fn(Pg) -> Vec<T>,
    I: Fn(&Pg) -> PageInfo,
{
    pub fn new(query: Query, variables: JsonMap, get_nodes: N, get_page_info: I) -> Self {
        FnPaginator {
            query,
            variables,
            get_nodes,
            get_page_info,
            _page: PhantomData,
        }
    }
}

impl<Pg, T, N, I> fmt::Debug for FnPaginator<Pg, T, N, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPaginator")
            .field("query", &self.query)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

impl<Pg, T, N, I> Paginator for FnPaginator<Pg, T, N, I>
where
    Pg: DeserializeOwned,
    N: Fn(Pg) -> Vec<T>,
    I: Fn(&Pg) -> PageInfo,
{
    type Page = Pg;
    type Item = T;

    fn query(&self) -> &Query {
        &self.query
    }

    fn variables(&self) -> JsonMap {
        self.variables.clone()
    }

    fn nodes(&self, page: Pg) -> Vec<T> {
        (self.get_nodes)(page)
    }

    fn page_info(&self, page: &Pg) -> PageInfo {
        (self.get_page_info)(page)
    }
}
