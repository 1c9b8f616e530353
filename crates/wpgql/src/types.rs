use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer, IgnoredAny, MapAccess, Visitor},
};
use std::fmt;
use std::marker::PhantomData;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// An opaque pagination cursor as returned in a connection's `pageInfo`
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Cursor {
        Cursor(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Cursor {
        Cursor(value.to_owned())
    }
}

impl From<Cursor> for serde_json::Value {
    fn from(value: Cursor) -> serde_json::Value {
        value.0.into()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Continuation metadata for one page of a paginated listing
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<Cursor>,
}

/// One page of items, deserialized from a GraphQL connection object of the
/// form `{"nodes": [...], "pageInfo": {"endCursor": ..., "hasNextPage": ...}}`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "Connection<T>")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            has_next_page: self.has_next_page,
            end_cursor: self.end_cursor.clone(),
        }
    }

    pub fn map_items<F, U>(self, func: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(func).collect(),
            end_cursor: self.end_cursor,
            has_next_page: self.has_next_page,
        }
    }
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(value: Connection<T>) -> Page<T> {
        Page {
            items: value.nodes,
            end_cursor: value.page_info.end_cursor,
            has_next_page: value.page_info.has_next_page,
        }
    }
}

// Listings that are not paginated server-side (e.g., `banners(first: 100)`)
// omit `pageInfo`, in which case there is no next page.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    #[serde(default)]
    page_info: PageInfo,
}

// Utility type for use in deserializing just `foo` from a map of the form
// `{"anything": foo}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Singleton<T>(pub T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Singleton<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SingletonVisitor::new())
    }
}

struct SingletonVisitor<T>(PhantomData<T>);

impl<T> SingletonVisitor<T> {
    fn new() -> Self {
        SingletonVisitor(PhantomData)
    }
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for SingletonVisitor<T> {
    type Value = Singleton<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string-keyed map containing a single field")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        if let Some((_, value)) = map.next_entry::<String, T>()? {
            if map.next_entry::<String, IgnoredAny>()?.is_some() {
                Err(de::Error::invalid_length(
                    map.size_hint().unwrap_or(0).saturating_add(2),
                    &self,
                ))
            } else {
                Ok(Singleton(value))
            }
        } else {
            Err(de::Error::invalid_length(0, &self))
        }
    }
}

/// `deserialize_with` helper for fields of the form `{"anything": foo}` that
/// should be stored as just `foo`
pub fn singleton_field<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Singleton::<T>::deserialize(deserializer).map(|s| s.0)
}

/// `deserialize_with` helper for nullable fields of the form `{"anything":
/// foo}`
pub fn optional_singleton_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<Singleton<T>>::deserialize(deserializer).map(|o| o.map(|s| s.0))
}
