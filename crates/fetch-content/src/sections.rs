use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use wpgql::catalog::{self, Banner, EventKind, EventPost, Magazine, Post};
use wpgql::{
    OnPageError, PaginateError, Paginated, PaginationEnd, PaginationOptions, Query,
    QueryExecutor, TransportError, paginate,
};

/// A content section of the site, each backed by one listing
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Section {
    Magazines,
    WhatsIn,
    News,
    Ushare,
    Roadmap,
    Roadshow,
    Seminar,
    Proseries,
    Banners,
    MediaPartners,
}

/// Where the content for a [`Section`] comes from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Source {
    Magazines,

    /// Posts in the category with the given slug
    Category(&'static str),

    Events(EventKind),

    /// Banners and media partner logos, which are fetched in a single request
    Banners,
    MediaPartners,
}

impl Section {
    pub(crate) const ALL: [Section; 10] = [
        Section::Magazines,
        Section::WhatsIn,
        Section::News,
        Section::Ushare,
        Section::Roadmap,
        Section::Roadshow,
        Section::Seminar,
        Section::Proseries,
        Section::Banners,
        Section::MediaPartners,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Section::Magazines => "Magazines",
            Section::WhatsIn => "What's In",
            Section::News => "News",
            Section::Ushare => "Ushare",
            Section::Roadmap => "Roadmap",
            Section::Roadshow => "Roadshow",
            Section::Seminar => "Seminar",
            Section::Proseries => "Proseries",
            Section::Banners => "Banners",
            Section::MediaPartners => "Media Partners",
        }
    }

    pub(crate) fn source(self) -> Source {
        match self {
            Section::Magazines => Source::Magazines,
            Section::WhatsIn => Source::Category("whats-in"),
            Section::News => Source::Category("news"),
            Section::Ushare => Source::Category("ushare"),
            Section::Roadmap => Source::Events(EventKind::Roadmap),
            Section::Roadshow => Source::Events(EventKind::Roadshow),
            Section::Seminar => Source::Events(EventKind::Seminar),
            Section::Proseries => Source::Events(EventKind::Proseries),
            Section::Banners => Source::Banners,
            Section::MediaPartners => Source::MediaPartners,
        }
    }

    /// Drain the listing for this section
    pub(crate) fn fetch<E: QueryExecutor>(
        self,
        executor: &E,
        page_size: NonZeroUsize,
        options: PaginationOptions,
    ) -> Result<Fetched, PaginateError> {
        match self.source() {
            Source::Magazines => paginate(executor, catalog::magazines(page_size), options)
                .map(|p| Fetched::new(p, Item::Magazine)),
            Source::Category(slug) => paginate(
                executor,
                catalog::posts_in_category(slug, page_size),
                options,
            )
            .map(|p| Fetched::new(p, Item::Post)),
            Source::Events(kind) => paginate(executor, catalog::events(kind, page_size), options)
                .map(|p| Fetched::new(p, Item::Event)),
            Source::Banners => single_page(
                &catalog::GET_BANNERS,
                catalog::banners(executor),
                options,
            )
            .map(|p| Fetched::new(p, Item::Banner)),
            Source::MediaPartners => single_page(
                &catalog::GET_MEDIA_PARTNERS,
                catalog::media_partners(executor),
                options,
            )
            .map(|p| Fetched::new(p, Item::Banner)),
        }
    }
}

/// Treat the outcome of a single-shot query as a one-page listing, applying
/// the same error policy as [`paginate()`]
fn single_page<T>(
    query: &Query,
    r: Result<Vec<T>, TransportError>,
    options: PaginationOptions,
) -> Result<Paginated<T>, PaginateError> {
    match r {
        Ok(items) => Ok(Paginated {
            items,
            pages: 1,
            end: PaginationEnd::Exhausted,
        }),
        Err(source) => match options.on_error {
            OnPageError::Truncate => Ok(Paginated {
                items: Vec::new(),
                pages: 0,
                end: PaginationEnd::Aborted(source),
            }),
            OnPageError::Propagate => Err(PaginateError::Page {
                operation: query.name(),
                page: 1,
                items_fetched: 0,
                source,
            }),
        },
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record fetched for some section
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Item {
    Magazine(Magazine),
    Post(Post),
    Event(EventPost),
    Banner(Banner),
}

/// The records fetched for a section
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Fetched {
    pub(crate) items: Vec<Item>,
    pub(crate) pages: usize,

    /// `false` if pagination stopped early due to an error or a configured
    /// bound
    pub(crate) complete: bool,
}

impl Fetched {
    fn new<T, F>(paginated: Paginated<T>, func: F) -> Fetched
    where
        F: FnMut(T) -> Item,
    {
        let complete = paginated.is_complete();
        Fetched {
            items: paginated.items.into_iter().map(func).collect(),
            pages: paginated.pages,
            complete,
        }
    }
}

/// A line of output
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct Entry<'a> {
    pub(crate) section: Section,
    pub(crate) item: &'a Item,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use wpgql::JsonMap;

    #[derive(Debug)]
    struct Canned {
        responses: RefCell<Vec<Value>>,
        requests: RefCell<Vec<(&'static str, JsonMap)>>,
    }

    impl Canned {
        fn new(responses: Vec<Value>) -> Canned {
            Canned {
                responses: RefCell::new(responses),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueryExecutor for Canned {
        fn execute(&self, query: &Query, variables: JsonMap) -> Result<JsonMap, TransportError> {
            self.requests.borrow_mut().push((query.name(), variables));
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                return Err(TransportError::Status(500));
            }
            match responses.remove(0) {
                Value::Object(map) => Ok(map),
                other => panic!("canned response is not an object: {other:?}"),
            }
        }
    }

    fn post(slug: &str) -> Value {
        json!({
            "title": slug.to_uppercase(),
            "excerpt": null,
            "date": "2024-01-01T00:00:00",
            "slug": slug,
            "link": format!("https://foodfocusthailand.com/{slug}/"),
            "featuredImage": null,
            "categories": {"nodes": [{"name": "News", "slug": "news"}]},
        })
    }

    #[test]
    fn parse_section_names() {
        assert_eq!(
            Section::from_str("whats-in", false),
            Ok(Section::WhatsIn)
        );
        assert_eq!(Section::from_str("proseries", false), Ok(Section::Proseries));
        assert_eq!(
            Section::from_str("media-partners", false),
            Ok(Section::MediaPartners)
        );
        assert!(Section::from_str("exhibitions", false).is_err());
    }

    #[test]
    fn all_sections_listed() {
        assert_eq!(Section::value_variants(), Section::ALL);
    }

    #[test]
    fn category_sources() {
        assert_eq!(Section::WhatsIn.source(), Source::Category("whats-in"));
        assert_eq!(Section::News.source(), Source::Category("news"));
        assert_eq!(Section::Ushare.source(), Source::Category("ushare"));
        assert_eq!(Section::Seminar.source(), Source::Events(EventKind::Seminar));
    }

    #[test]
    fn fetch_news() {
        let executor = Canned::new(vec![
            json!({"posts": {
                "pageInfo": {"hasNextPage": true, "endCursor": "c1"},
                "nodes": [post("a"), post("b")],
            }}),
            json!({"posts": {
                "pageInfo": {"hasNextPage": false, "endCursor": "c2"},
                "nodes": [post("c")],
            }}),
        ]);
        let fetched = Section::News
            .fetch(
                &executor,
                NonZeroUsize::new(2).unwrap(),
                PaginationOptions::default(),
            )
            .unwrap();
        assert!(fetched.complete);
        assert_eq!(fetched.pages, 2);
        let slugs = fetched
            .items
            .iter()
            .map(|it| match it {
                Item::Post(p) => p.slug.as_str(),
                other => panic!("unexpected item: {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(slugs, ["a", "b", "c"]);
        let requests = executor.requests.into_inner();
        assert_eq!(
            requests
                .iter()
                .map(|(name, vars)| (*name, vars.get("category"), vars.get("after")))
                .collect::<Vec<_>>(),
            [
                (
                    "GetPostsByCategory",
                    Some(&Value::from("news")),
                    Some(&Value::Null)
                ),
                (
                    "GetPostsByCategory",
                    Some(&Value::from("news")),
                    Some(&Value::from("c1"))
                ),
            ]
        );
    }

    #[test]
    fn fetch_truncated() {
        let executor = Canned::new(vec![json!({"posts": {
            "pageInfo": {"hasNextPage": true, "endCursor": "c1"},
            "nodes": [post("a")],
        }})]);
        let fetched = Section::Ushare
            .fetch(
                &executor,
                NonZeroUsize::new(1).unwrap(),
                PaginationOptions::default(),
            )
            .unwrap();
        assert!(!fetched.complete);
        assert_eq!(fetched.items.len(), 1);
    }

    #[test]
    fn fetch_strict() {
        let executor = Canned::new(Vec::new());
        let r = Section::Roadmap.fetch(
            &executor,
            NonZeroUsize::new(1).unwrap(),
            PaginationOptions::default().on_error(OnPageError::Propagate),
        );
        assert_matches!(r, Err(PaginateError::Page { operation: "GetAllRoadmaps", page: 1, .. }));
    }

    #[test]
    fn entry_serialization() {
        let executor = Canned::new(vec![json!({"posts": {
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "nodes": [post("a")],
        }})]);
        let fetched = Section::WhatsIn
            .fetch(
                &executor,
                NonZeroUsize::new(10).unwrap(),
                PaginationOptions::default(),
            )
            .unwrap();
        let entry = Entry {
            section: Section::WhatsIn,
            item: &fetched.items[0],
        };
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({
                "section": "whats-in",
                "item": {
                    "title": "A",
                    "excerpt": null,
                    "date": "2024-01-01T00:00:00",
                    "slug": "a",
                    "link": "https://foodfocusthailand.com/a/",
                    "featured_image": null,
                    "categories": [{"name": "News", "slug": "news"}],
                }
            })
        );
    }

    fn banner(title: &str) -> Value {
        json!({
            "title": title,
            "bannerFields": {"image": null, "link": format!("https://{title}.example.com/")},
        })
    }

    #[test]
    fn fetch_banners() {
        let executor = Canned::new(vec![json!({
            "banners": {"nodes": [banner("thaifex"), banner("propak")]}
        })]);
        let fetched = Section::Banners
            .fetch(
                &executor,
                NonZeroUsize::new(100).unwrap(),
                PaginationOptions::default(),
            )
            .unwrap();
        assert!(fetched.complete);
        assert_eq!(fetched.pages, 1);
        assert_eq!(
            serde_json::to_value(Entry {
                section: Section::Banners,
                item: &fetched.items[1],
            })
            .unwrap(),
            json!({
                "section": "banners",
                "item": {
                    "title": "propak",
                    "image": null,
                    "link": "https://propak.example.com/",
                }
            })
        );
        assert_eq!(
            executor.requests.into_inner(),
            [("GetBanners", JsonMap::new())]
        );
    }

    #[test]
    fn fetch_media_partners_failure_truncates() {
        let executor = Canned::new(Vec::new());
        let fetched = Section::MediaPartners
            .fetch(
                &executor,
                NonZeroUsize::new(100).unwrap(),
                PaginationOptions::default(),
            )
            .unwrap();
        assert!(!fetched.complete);
        assert!(fetched.items.is_empty());
        assert_eq!(fetched.pages, 0);
    }

    #[test]
    fn fetch_media_partners_strict() {
        let executor = Canned::new(Vec::new());
        let r = Section::MediaPartners.fetch(
            &executor,
            NonZeroUsize::new(100).unwrap(),
            PaginationOptions::default().on_error(OnPageError::Propagate),
        );
        assert_matches!(
            r,
            Err(PaginateError::Page {
                operation: "GetMediaPartners",
                page: 1,
                items_fetched: 0,
                source: TransportError::Status(500),
            })
        );
    }
}
