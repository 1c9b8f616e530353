use super::records::{Banner, deser_nodes};
use crate::queries::Query;
use crate::types::{Page, Singleton};
use crate::{JsonMap, QueryExecutor, TransportError};
use indoc::indoc;
use serde::Deserialize;
use std::fmt;

pub static GET_BANNERS: Query = Query::new(
    "GetBanners",
    indoc! {"
    query GetBanners {
        banners(first: 100) {
            nodes {
                title
                bannerFields {
                    image {
                        node {
                            sourceUrl
                            altText
                        }
                    }
                    link
                }
            }
        }
    }
"},
);

pub static GET_TOP_BANNERS: Query = Query::new(
    "GetTopBanners",
    indoc! {r#"
    query GetTopBanners {
        positions(where: {name: "Top"}) {
            nodes {
                name
                banners {
                    nodes {
                        title
                        bannerFields {
                            image {
                                node {
                                    sourceUrl
                                    altText
                                }
                            }
                            link
                        }
                    }
                }
            }
        }
    }
"#},
);

pub static GET_BOTTOM_BANNERS: Query = Query::new(
    "GetBottomBanners",
    indoc! {r#"
    query GetBottomBanners {
        positions(where: {name: "Bottom"}) {
            nodes {
                name
                banners {
                    nodes {
                        title
                        bannerFields {
                            image {
                                node {
                                    sourceUrl
                                    altText
                                }
                            }
                            link
                        }
                    }
                }
            }
        }
    }
"#},
);

pub static GET_MEDIA_PARTNERS: Query = Query::new(
    "GetMediaPartners",
    indoc! {"
    query GetMediaPartners {
        mediaPartners(first: 100) {
            nodes {
                title
                bannerFields {
                    image {
                        node {
                            sourceUrl
                            altText
                        }
                    }
                    link
                }
            }
        }
    }
"},
);

/// The page slots that banners can be assigned to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BannerPosition {
    Top,
    Bottom,
}

impl BannerPosition {
    pub fn query(self) -> &'static Query {
        match self {
            BannerPosition::Top => &GET_TOP_BANNERS,
            BannerPosition::Bottom => &GET_BOTTOM_BANNERS,
        }
    }
}

impl fmt::Display for BannerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BannerPosition::Top => f.write_str("Top"),
            BannerPosition::Bottom => f.write_str("Bottom"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct PositionNode {
    #[serde(default, deserialize_with = "deser_nodes")]
    banners: Vec<Banner>,
}

/// Fetch all banners regardless of position
pub fn banners<E: QueryExecutor>(executor: &E) -> Result<Vec<Banner>, TransportError> {
    executor
        .fetch::<Singleton<Page<Banner>>>(&GET_BANNERS, JsonMap::new())
        .map(|r| r.0.items)
}

/// Fetch the banners assigned to the given position, in the order that the
/// CMS lists them
pub fn positioned_banners<E: QueryExecutor>(
    executor: &E,
    position: BannerPosition,
) -> Result<Vec<Banner>, TransportError> {
    executor
        .fetch::<Singleton<Page<PositionNode>>>(position.query(), JsonMap::new())
        .map(|r| r.0.items.into_iter().flat_map(|p| p.banners).collect())
}

/// Fetch the logos of the site's media partners
pub fn media_partners<E: QueryExecutor>(executor: &E) -> Result<Vec<Banner>, TransportError> {
    executor
        .fetch::<Singleton<Page<Banner>>>(&GET_MEDIA_PARTNERS, JsonMap::new())
        .map(|r| r.0.items)
}
