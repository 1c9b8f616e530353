use super::EventKind;
use super::records::{EventPost, Post, SitePage};
use crate::queries::Query;
use crate::types::Singleton;
use crate::{JsonMap, QueryExecutor, TransportError};
use indoc::indoc;

pub static GET_POST_BY_SLUG: Query = Query::new(
    "GetPostBySlug",
    indoc! {"
    query GetPostBySlug($slug: ID!) {
        post(id: $slug, idType: SLUG) {
            title
            content
            excerpt
            date
            slug
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
"},
);

pub static GET_PAGE_BY_SLUG: Query = Query::new(
    "GetPageBySlug",
    indoc! {"
    query GetPageBySlug($slug: ID!) {
        page(id: $slug, idType: URI) {
            title
            content
            featuredImage {
                node {
                    sourceUrl
                    altText
                }
            }
        }
    }
"},
);

pub static GET_ROADMAP_BY_SLUG: Query = Query::new(
    "GetRoadmapBySlug",
    indoc! {"
    query GetRoadmapBySlug($slug: ID!) {
        roadmap(id: $slug, idType: SLUG) {
            title
            content
            slug
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
        }
    }
"},
);

pub static GET_ROADSHOW_BY_SLUG: Query = Query::new(
    "GetRoadshowBySlug",
    indoc! {"
    query GetRoadshowBySlug($slug: ID!) {
        roadshow(id: $slug, idType: SLUG) {
            title
            content
            slug
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
        }
    }
"},
);

pub static GET_SEMINAR_BY_SLUG: Query = Query::new(
    "GetSeminarBySlug",
    indoc! {"
    query GetSeminarBySlug($slug: ID!) {
        seminar(id: $slug, idType: SLUG) {
            title
            content
            slug
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
        }
    }
"},
);

// WPGraphQL derives the singular field name by dropping the trailing "s".
pub static GET_PROSERIES_BY_SLUG: Query = Query::new(
    "GetProseriesBySlug",
    indoc! {"
    query GetProseriesBySlug($slug: ID!) {
        proserie(id: $slug, idType: SLUG) {
            title
            content
            slug
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
        }
    }
"},
);

fn slug_variables(slug: &str) -> JsonMap {
    JsonMap::from_iter([("slug".into(), slug.into())])
}

/// Fetch the post with the given slug, or `None` if there is no such post
pub fn post_by_slug<E: QueryExecutor>(
    executor: &E,
    slug: &str,
) -> Result<Option<Post>, TransportError> {
    executor
        .fetch::<Singleton<Option<Post>>>(&GET_POST_BY_SLUG, slug_variables(slug))
        .map(|r| r.0)
}

/// Fetch the page at the given URI (e.g., `"about-us"` or
/// `"/exhibitions/propak/"`), or `None` if there is no such page
pub fn page_by_slug<E: QueryExecutor>(
    executor: &E,
    uri: &str,
) -> Result<Option<SitePage>, TransportError> {
    executor
        .fetch::<Singleton<Option<SitePage>>>(&GET_PAGE_BY_SLUG, slug_variables(uri))
        .map(|r| r.0)
}

/// Fetch the event of the given kind with the given slug, or `None` if there
/// is no such event
pub fn event_by_slug<E: QueryExecutor>(
    executor: &E,
    kind: EventKind,
    slug: &str,
) -> Result<Option<EventPost>, TransportError> {
    executor
        .fetch::<Singleton<Option<EventPost>>>(kind.by_slug_query(), slug_variables(slug))
        .map(|r| r.0)
}
