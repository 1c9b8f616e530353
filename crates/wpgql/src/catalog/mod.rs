//! GraphQL documents and record types for the content published by the
//! site's WordPress backend
mod banners;
mod homepage;
mod lookup;
mod records;
mod yearly;
pub use self::banners::*;
pub use self::homepage::*;
pub use self::lookup::*;
pub use self::records::*;
pub use self::yearly::*;
use crate::queries::{ConnectionPaginator, Query};
use crate::types::{Page, Singleton};
use crate::{JsonMap, QueryExecutor, TransportError};
use indoc::indoc;
use std::fmt;
use std::num::NonZeroUsize;

/// The slug of the magazine type whose latest issue is featured on the home
/// page
pub const FEATURED_MAGAZINE_TYPE: &str = "fft";

pub static GET_ALL_MAGAZINES: Query = Query::new(
    "GetAllMagazines",
    indoc! {"
    query GetAllMagazines($first: Int!, $after: String) {
        magazines(first: $first, after: $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                date
                magazineTypes {
                    nodes {
                        name
                        slug
                    }
                }
                magazines {
                    image {
                        node {
                            sourceUrl
                            altText
                        }
                    }
                    link
                    magazineNo
                }
            }
        }
    }
"},
);

pub static GET_POSTS_BY_CATEGORY: Query = Query::new(
    "GetPostsByCategory",
    indoc! {"
    query GetPostsByCategory($first: Int!, $after: String, $category: String!) {
        posts(first: $first, after: $after, where: {categoryName: $category}) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                excerpt
                date
                slug
                link
                featuredImage {
                    node {
                        sourceUrl
                        altText
                    }
                }
                categories {
                    nodes {
                        name
                        slug
                    }
                }
            }
        }
    }
"},
);

pub static GET_ALL_ROADMAPS: Query = Query::new(
    "GetAllRoadmaps",
    indoc! {"
    query GetAllRoadmaps($first: Int!, $after: String) {
        roadmaps(first: $first, after: $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                content
                slug
                link
                date
                featuredImage {
                    node {
                        sourceUrl
                        altText
                    }
                }
                postSummary {
                    summary
                }
                eventYears {
                    nodes {
                        name
                        slug
                    }
                }
                eventsMetadata {
                    homepage
                }
            }
        }
    }
"},
);

pub static GET_ALL_ROADSHOWS: Query = Query::new(
    "GetAllRoadshows",
    indoc! {"
    query GetAllRoadshows($first: Int!, $after: String) {
        roadshows(first: $first, after: $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                content
                slug
                link
                date
                featuredImage {
                    node {
                        sourceUrl
                        altText
                    }
                }
                postSummary {
                    summary
                }
                eventYears {
                    nodes {
                        name
                        slug
                    }
                }
                eventsMetadata {
                    homepage
                }
            }
        }
    }
"},
);

pub static GET_ALL_SEMINARS: Query = Query::new(
    "GetAllSeminars",
    indoc! {"
    query GetAllSeminars($first: Int!, $after: String) {
        seminars(first: $first, after: $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                content
                slug
                link
                date
                featuredImage {
                    node {
                        sourceUrl
                        altText
                    }
                }
                postSummary {
                    summary
                }
                eventYears {
                    nodes {
                        name
                        slug
                    }
                }
                eventsMetadata {
                    homepage
                }
            }
        }
    }
"},
);

pub static GET_ALL_PROSERIES: Query = Query::new(
    "GetAllProseries",
    indoc! {"
    query GetAllProseries($first: Int!, $after: String) {
        proseries(first: $first, after: $after) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
                content
                slug
                link
                date
                featuredImage {
                    node {
                        sourceUrl
                        altText
                    }
                }
                postSummary {
                    summary
                }
                eventYears {
                    nodes {
                        name
                        slug
                    }
                }
                eventsMetadata {
                    homepage
                }
            }
        }
    }
"},
);

pub static GET_LATEST_MAGAZINE: Query = Query::new(
    "GetLatestMagazine",
    indoc! {"
    query GetLatestMagazine($typeSlug: ID!) {
        magazineType(id: $typeSlug, idType: SLUG) {
            magazines(first: 1) {
                nodes {
                    title
                    date
                    magazines {
                        image {
                            node {
                                sourceUrl
                                altText
                            }
                        }
                        link
                        magazineNo
                    }
                }
            }
        }
    }
"},
);

pub static GET_MAGAZINES_BY_TYPE: Query = Query::new(
    "GetMagazinesByType",
    indoc! {"
    query GetMagazinesByType($typeSlug: ID!) {
        magazineType(id: $typeSlug, idType: SLUG) {
            name
            slug
            magazines(first: 200) {
                nodes {
                    title
                    date
                    magazines {
                        image {
                            node {
                                sourceUrl
                                altText
                            }
                        }
                        link
                        magazineNo
                    }
                }
            }
        }
    }
"},
);

pub static GET_MAGAZINE_TYPES: Query = Query::new(
    "GetMagazineTypes",
    indoc! {"
    query GetMagazineTypes {
        magazineTypes {
            nodes {
                name
                slug
                count
            }
        }
    }
"},
);

pub static GET_EVENT_YEARS: Query = Query::new(
    "GetEventYears",
    indoc! {"
    query GetEventYears {
        eventYears(first: 100) {
            nodes {
                name
                slug
                count
            }
        }
    }
"},
);

/// The custom post types under which events are published
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    Roadmap,
    Roadshow,
    Seminar,
    Proseries,
}

impl EventKind {
    pub fn query(self) -> &'static Query {
        match self {
            EventKind::Roadmap => &GET_ALL_ROADMAPS,
            EventKind::Roadshow => &GET_ALL_ROADSHOWS,
            EventKind::Seminar => &GET_ALL_SEMINARS,
            EventKind::Proseries => &GET_ALL_PROSERIES,
        }
    }

    /// The query for looking up a single event by slug
    pub fn by_slug_query(self) -> &'static Query {
        match self {
            EventKind::Roadmap => &GET_ROADMAP_BY_SLUG,
            EventKind::Roadshow => &GET_ROADSHOW_BY_SLUG,
            EventKind::Seminar => &GET_SEMINAR_BY_SLUG,
            EventKind::Proseries => &GET_PROSERIES_BY_SLUG,
        }
    }

    /// The query for the events filed under a given event year
    pub fn by_year_query(self) -> &'static Query {
        match self {
            EventKind::Roadmap => &GET_ROADMAPS_BY_YEAR,
            EventKind::Roadshow => &GET_ROADSHOWS_BY_YEAR,
            EventKind::Seminar => &GET_SEMINARS_BY_YEAR,
            EventKind::Proseries => &GET_PROSERIES_BY_YEAR,
        }
    }

    pub fn homepage_query(self) -> &'static Query {
        match self {
            EventKind::Roadmap => &GET_HOMEPAGE_ROADMAPS,
            EventKind::Roadshow => &GET_HOMEPAGE_ROADSHOWS,
            EventKind::Seminar => &GET_HOMEPAGE_SEMINARS,
            EventKind::Proseries => &GET_HOMEPAGE_PROSERIES,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Roadmap => "roadmaps",
            EventKind::Roadshow => "roadshows",
            EventKind::Seminar => "seminars",
            EventKind::Proseries => "proseries",
        };
        f.write_str(s)
    }
}

/// A paginator over all magazine issues of every type
pub fn magazines(page_size: NonZeroUsize) -> ConnectionPaginator<Magazine> {
    ConnectionPaginator::new(GET_ALL_MAGAZINES).with_variable("first", page_size.get())
}

/// A paginator over the posts in the category with the given slug
pub fn posts_in_category(category: &str, page_size: NonZeroUsize) -> ConnectionPaginator<Post> {
    ConnectionPaginator::new(GET_POSTS_BY_CATEGORY)
        .with_variable("first", page_size.get())
        .with_variable("category", category)
}

/// A paginator over all events of the given kind
pub fn events(kind: EventKind, page_size: NonZeroUsize) -> ConnectionPaginator<EventPost> {
    ConnectionPaginator::new(*kind.query()).with_variable("first", page_size.get())
}

/// Fetch the most recent issue of the magazine type with the given slug.
///
/// Returns `None` if the type does not exist or has no issues.
pub fn latest_magazine<E: QueryExecutor>(
    executor: &E,
    type_slug: &str,
) -> Result<Option<Magazine>, TransportError> {
    let variables = JsonMap::from_iter([("typeSlug".into(), type_slug.into())]);
    let r = executor
        .fetch::<Singleton<Option<Singleton<Page<Magazine>>>>>(&GET_LATEST_MAGAZINE, variables)?;
    Ok(r.0.and_then(|mt| mt.0.items.into_iter().next()))
}

/// Fetch the magazine type with the given slug along with up to 200 of its
/// issues, or `None` if there is no such type
pub fn magazines_by_type<E: QueryExecutor>(
    executor: &E,
    type_slug: &str,
) -> Result<Option<MagazineTypeIssues>, TransportError> {
    let variables = JsonMap::from_iter([("typeSlug".into(), type_slug.into())]);
    executor
        .fetch::<Singleton<Option<MagazineTypeIssues>>>(&GET_MAGAZINES_BY_TYPE, variables)
        .map(|r| r.0)
}

/// Fetch all magazine types
pub fn magazine_types<E: QueryExecutor>(executor: &E) -> Result<Vec<Term>, TransportError> {
    executor
        .fetch::<Singleton<Page<Term>>>(&GET_MAGAZINE_TYPES, JsonMap::new())
        .map(|r| r.0.items)
}

/// Fetch the years under which events are filed
pub fn event_years<E: QueryExecutor>(executor: &E) -> Result<Vec<Term>, TransportError> {
    executor
        .fetch::<Singleton<Page<Term>>>(&GET_EVENT_YEARS, JsonMap::new())
        .map(|r| r.0.items)
}
