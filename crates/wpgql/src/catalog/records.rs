use super::EventKind;
use crate::types::{Page, Singleton, optional_singleton_field};
use serde::{Deserialize, Deserializer, Serialize};

/// A media library image
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Image {
    #[serde(rename(deserialize = "sourceUrl"))]
    pub source_url: String,

    #[serde(
        default,
        rename(deserialize = "altText"),
        deserialize_with = "deser_nonempty"
    )]
    pub alt_text: Option<String>,
}

/// A taxonomy term (category, magazine type, event year, …)
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Term {
    pub name: String,
    pub slug: String,

    /// The number of posts filed under the term, when queried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// An issue of a magazine
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawMagazine")]
pub struct Magazine {
    pub title: String,

    /// The publication timestamp as reported by WordPress (site-local time,
    /// no offset)
    pub date: String,

    /// The magazine types the issue belongs to; empty if not queried
    pub types: Vec<Term>,

    /// The cover image
    pub image: Option<Image>,

    /// The URL of the online edition
    pub link: Option<String>,

    pub magazine_no: Option<String>,
}

impl From<RawMagazine> for Magazine {
    fn from(value: RawMagazine) -> Magazine {
        let fields = value.magazines.unwrap_or_default();
        Magazine {
            title: value.title,
            date: value.date,
            types: value.magazine_types,
            image: fields.image.map(|s| s.0),
            link: fields.link.filter(|s| !s.is_empty()),
            magazine_no: fields.magazine_no,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RawMagazine {
    title: String,
    date: String,
    #[serde(default, deserialize_with = "deser_nodes")]
    magazine_types: Vec<Term>,
    // The issue-specific custom fields
    #[serde(default)]
    magazines: Option<MagazineFields>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MagazineFields {
    #[serde(default)]
    image: Option<Singleton<Image>>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default, deserialize_with = "deser_string_or_number")]
    magazine_no: Option<String>,
}

/// A blog post
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Post {
    pub title: String,

    /// HTML excerpt
    #[serde(default)]
    pub excerpt: Option<String>,

    /// HTML body; only fetched when looking up a single post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    pub date: String,
    pub slug: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default, deserialize_with = "optional_singleton_field")]
    pub featured_image: Option<Image>,

    #[serde(default, deserialize_with = "deser_nodes")]
    pub categories: Vec<Term>,
}

/// A post of one of the event types (roadmap, roadshow, seminar, proseries)
///
/// Which fields are present depends on the query that fetched the post.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawEventPost")]
pub struct EventPost {
    pub title: String,

    /// HTML body
    pub content: Option<String>,

    pub slug: String,
    pub link: Option<String>,
    pub date: Option<String>,
    pub featured_image: Option<Image>,
    pub summary: Option<String>,
    pub event_years: Vec<Term>,

    /// Whether the event is to be featured on the home page
    pub homepage: bool,

    /// Where on the home page the event is placed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_position: Option<String>,
}

impl From<RawEventPost> for EventPost {
    fn from(value: RawEventPost) -> EventPost {
        let metadata = value.events_metadata.unwrap_or_default();
        EventPost {
            title: value.title,
            content: value.content,
            slug: value.slug,
            link: value.link,
            date: value.date,
            featured_image: value.featured_image,
            summary: value.post_summary,
            event_years: value.event_years,
            homepage: match metadata.homepage {
                Some(Flag::Bool(b)) => b,
                Some(Flag::String(s)) => matches!(s.as_str(), "1" | "true"),
                None => false,
            },
            homepage_position: metadata.homepage_position.and_then(StringOrNumber::into_nonempty),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RawEventPost {
    title: String,
    #[serde(default)]
    content: Option<String>,
    slug: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "optional_singleton_field")]
    featured_image: Option<Image>,
    #[serde(default, deserialize_with = "deser_summary")]
    post_summary: Option<String>,
    #[serde(default, deserialize_with = "deser_nodes")]
    event_years: Vec<Term>,
    #[serde(default)]
    events_metadata: Option<EventsMetadata>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct EventsMetadata {
    #[serde(default)]
    homepage: Option<Flag>,
    #[serde(default)]
    homepage_position: Option<StringOrNumber>,
}

// `eventsMetadata { homepage }` is an ACF true/false field, which older
// field groups serialize as "1"/"" or "true"/"false" strings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    String(String),
}

/// The events of each kind filed under some event year
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventsByKind {
    #[serde(default, deserialize_with = "deser_nodes")]
    pub roadmaps: Vec<EventPost>,
    #[serde(default, deserialize_with = "deser_nodes")]
    pub roadshows: Vec<EventPost>,
    #[serde(default, deserialize_with = "deser_nodes")]
    pub seminars: Vec<EventPost>,
    #[serde(default, deserialize_with = "deser_nodes")]
    pub proseries: Vec<EventPost>,
}

impl EventsByKind {
    pub fn get(&self, kind: EventKind) -> &[EventPost] {
        match kind {
            EventKind::Roadmap => &self.roadmaps,
            EventKind::Roadshow => &self.roadshows,
            EventKind::Seminar => &self.seminars,
            EventKind::Proseries => &self.proseries,
        }
    }

    pub fn into_kind(self, kind: EventKind) -> Vec<EventPost> {
        match kind {
            EventKind::Roadmap => self.roadmaps,
            EventKind::Roadshow => self.roadshows,
            EventKind::Seminar => self.seminars,
            EventKind::Proseries => self.proseries,
        }
    }
}

/// An entry in the events calendar
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CalendarEvent {
    #[serde(default)]
    pub full_event_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "deser_string_or_number")]
    pub tel: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deser_string_or_number")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deser_string_or_number")]
    pub month: Option<String>,
}

/// An advertising banner or media partner logo
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawBanner")]
pub struct Banner {
    pub title: String,
    pub image: Option<Image>,

    /// Where the banner links to
    pub link: Option<String>,
}

impl From<RawBanner> for Banner {
    fn from(value: RawBanner) -> Banner {
        let fields = value.banner_fields.unwrap_or_default();
        Banner {
            title: value.title,
            image: fields.image.map(|s| s.0),
            link: fields.link.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RawBanner {
    title: String,
    #[serde(default)]
    banner_fields: Option<BannerFields>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
struct BannerFields {
    #[serde(default)]
    image: Option<Singleton<Image>>,
    #[serde(default)]
    link: Option<String>,
}

/// A static WordPress page
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct SitePage {
    pub title: String,

    /// HTML body
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "optional_singleton_field")]
    pub featured_image: Option<Image>,
}

/// A magazine type along with its issues
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MagazineTypeIssues {
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "deser_nodes")]
    pub magazines: Vec<Magazine>,
}

pub(super) fn deser_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<Page<T>> = Deserialize::deserialize(deserializer)?;
    Ok(value.map(|p| p.items).unwrap_or_default())
}

fn deser_summary<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Singleton<Option<String>>> = Deserialize::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.0).filter(|s| !s.is_empty()))
}

fn deser_nonempty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// ACF returns numeric fields as either numbers or strings depending on the
// field configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_nonempty(self) -> Option<String> {
        match self {
            StringOrNumber::String(s) if s.is_empty() => None,
            StringOrNumber::String(s) => Some(s),
            StringOrNumber::Number(n) => Some(n.to_string()),
        }
    }
}

fn deser_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Deserialize::deserialize(deserializer)?;
    Ok(value.and_then(StringOrNumber::into_nonempty))
}
