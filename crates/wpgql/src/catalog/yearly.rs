use super::EventKind;
use super::records::{CalendarEvent, EventPost, EventsByKind};
use crate::queries::Query;
use crate::types::{Page, Singleton};
use crate::{JsonMap, QueryExecutor, TransportError};
use indoc::indoc;

pub static GET_ROADMAPS_BY_YEAR: Query = Query::new(
    "GetRoadmaps",
    indoc! {"
    query GetRoadmaps($yearSlug: ID!) {
        eventYear(id: $yearSlug, idType: SLUG) {
            name
            roadmaps(first: 50) {
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
                }
            }
        }
    }
"},
);

pub static GET_ROADSHOWS_BY_YEAR: Query = Query::new(
    "GetRoadshows",
    indoc! {"
    query GetRoadshows($yearSlug: ID!) {
        eventYear(id: $yearSlug, idType: SLUG) {
            name
            roadshows(first: 50) {
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
                }
            }
        }
    }
"},
);

pub static GET_SEMINARS_BY_YEAR: Query = Query::new(
    "GetSeminars",
    indoc! {"
    query GetSeminars($yearSlug: ID!) {
        eventYear(id: $yearSlug, idType: SLUG) {
            name
            seminars(first: 50) {
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
                }
            }
        }
    }
"},
);

pub static GET_PROSERIES_BY_YEAR: Query = Query::new(
    "GetProseries",
    indoc! {"
    query GetProseries($yearSlug: ID!) {
        eventYear(id: $yearSlug, idType: SLUG) {
            name
            proseries(first: 50) {
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
                }
            }
        }
    }
"},
);

pub static GET_LATEST_EVENTS: Query = Query::new(
    "GetLatestEvents",
    indoc! {"
    query GetLatestEvents($yearSlug: ID!) {
        eventYear(id: $yearSlug, idType: SLUG) {
            roadmaps(first: 3) {
                nodes {
                    title
                    slug
                    link
                    date
                }
            }
            roadshows(first: 3) {
                nodes {
                    title
                    slug
                    link
                    date
                }
            }
            proseries(first: 3) {
                nodes {
                    title
                    slug
                    link
                    date
                }
            }
            seminars(first: 3) {
                nodes {
                    title
                    slug
                    link
                    date
                }
            }
        }
    }
"},
);

pub static GET_EVENTS_BY_YEAR_AND_MONTH: Query = Query::new(
    "GetEventsByYearAndMonth",
    indoc! {"
    query GetEventsByYearAndMonth($year: String!, $month: String!) {
        events(first: 10, where: {year: $year, month: $month}) {
            nodes {
                eventsGroupField {
                    fullEventName
                    location
                    dateStart
                    dateEnd
                    website
                    tel
                    email
                    year
                    month
                }
            }
        }
    }
"},
);

fn year_variables(year_slug: &str) -> JsonMap {
    JsonMap::from_iter([("yearSlug".into(), year_slug.into())])
}

/// Fetch the events of the given kind filed under the event year with the
/// given slug.
///
/// The server returns at most 50 events.  An unknown year yields an empty
/// `Vec`.
pub fn events_in_year<E: QueryExecutor>(
    executor: &E,
    kind: EventKind,
    year_slug: &str,
) -> Result<Vec<EventPost>, TransportError> {
    executor
        .fetch::<Singleton<Option<EventsByKind>>>(kind.by_year_query(), year_variables(year_slug))
        .map(|r| r.0.map(|events| events.into_kind(kind)).unwrap_or_default())
}

/// Fetch the three most recent events of each kind filed under the event
/// year with the given slug, or `None` if there is no such year
pub fn latest_events<E: QueryExecutor>(
    executor: &E,
    year_slug: &str,
) -> Result<Option<EventsByKind>, TransportError> {
    executor
        .fetch::<Singleton<Option<EventsByKind>>>(&GET_LATEST_EVENTS, year_variables(year_slug))
        .map(|r| r.0)
}

/// Fetch the calendar entries for the given month, e.g. `("2025", "09")`
pub fn calendar_events<E: QueryExecutor>(
    executor: &E,
    year: &str,
    month: &str,
) -> Result<Vec<CalendarEvent>, TransportError> {
    let variables = JsonMap::from_iter([
        ("year".into(), year.into()),
        ("month".into(), month.into()),
    ]);
    executor
        .fetch::<Singleton<Page<Singleton<Option<CalendarEvent>>>>>(
            &GET_EVENTS_BY_YEAR_AND_MONTH,
            variables,
        )
        .map(|r| r.0.items.into_iter().filter_map(|ev| ev.0).collect())
}
