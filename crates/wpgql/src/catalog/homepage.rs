use super::EventKind;
use super::records::{EventPost, Post, deser_nodes};
use crate::queries::Query;
use crate::types::{Page, Singleton};
use crate::{JsonMap, QueryExecutor, TransportError};
use indoc::indoc;
use serde::Deserialize;

pub static GET_HOMEPAGE_HIGHLIGHTS: Query = Query::new(
    "GetHomepageHighlights",
    indoc! {r#"
    query GetHomepageHighlights {
        categories(first: 4, where: {name: "homepage"}) {
            nodes {
                posts {
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
        }
    }
"#},
);

pub static GET_HOMEPAGE_ROADMAPS: Query = Query::new(
    "GetHomepageRoadmaps",
    indoc! {r#"
    query GetHomepageRoadmaps {
        roadmaps(where: {homepage: "true"}) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
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
                    homepagePosition
                }
            }
        }
    }
"#},
);

pub static GET_HOMEPAGE_ROADSHOWS: Query = Query::new(
    "GetHomepageRoadshows",
    indoc! {r#"
    query GetHomepageRoadshows {
        roadshows(where: {homepage: "true"}) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
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
                    homepagePosition
                }
            }
        }
    }
"#},
);

pub static GET_HOMEPAGE_SEMINARS: Query = Query::new(
    "GetHomepageSeminars",
    indoc! {r#"
    query GetHomepageSeminars {
        seminars(where: {homepage: "true"}) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
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
                    homepagePosition
                }
            }
        }
    }
"#},
);

pub static GET_HOMEPAGE_PROSERIES: Query = Query::new(
    "GetHomepageProseries",
    indoc! {r#"
    query GetHomepageProseries {
        proseries(where: {homepage: "true"}) {
            pageInfo {
                hasNextPage
                endCursor
            }
            nodes {
                title
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
                    homepagePosition
                }
            }
        }
    }
"#},
);

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct CategoryPosts {
    #[serde(default, deserialize_with = "deser_nodes")]
    posts: Vec<Post>,
}

/// Fetch the posts in the "homepage" category
pub fn homepage_highlights<E: QueryExecutor>(executor: &E) -> Result<Vec<Post>, TransportError> {
    executor
        .fetch::<Singleton<Page<CategoryPosts>>>(&GET_HOMEPAGE_HIGHLIGHTS, JsonMap::new())
        .map(|r| r.0.items.into_iter().flat_map(|c| c.posts).collect())
}

/// Fetch the events of the given kind that are flagged for display on the
/// home page
pub fn homepage_events<E: QueryExecutor>(
    executor: &E,
    kind: EventKind,
) -> Result<Vec<EventPost>, TransportError> {
    executor
        .fetch::<Singleton<Page<EventPost>>>(kind.homepage_query(), JsonMap::new())
        .map(|r| r.0.items)
}
