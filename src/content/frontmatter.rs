//! Front-matter parsing

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;

/// Marker line opening and closing the front-matter block
const DELIMITER: &str = "---";

/// Timestamp formats carrying their own offset
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];

/// Timestamp formats interpreted in the site timezone
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Publication status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Published,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
        }
    }
}

impl FromStr for Status {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("draft") {
            Ok(Status::Draft)
        } else if value.eq_ignore_ascii_case("published") {
            Ok(Status::Published)
        } else {
            Err(DocumentError::InvalidStatus(value.to_string()))
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cover image shown at the top of an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverImage {
    pub url: String,
    pub alt: String,
}

/// Validated front-matter of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(
        serialize_with = "serialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_on: Option<DateTime<FixedOffset>>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Unrecognized keys, kept in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Front-matter exactly as written, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrontMatter {
    #[serde(default, deserialize_with = "scalar_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    published_on: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    status: Option<String>,
    #[serde(default)]
    cover_image: Option<RawCoverImage>,
    #[serde(default, deserialize_with = "string_or_vec")]
    tags: Vec<String>,
    #[serde(flatten)]
    extra: IndexMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCoverImage {
    #[serde(default, deserialize_with = "scalar_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    alt: Option<String>,
}

impl RawFrontMatter {
    fn validate(self, tz: Tz) -> Result<FrontMatter, DocumentError> {
        let title = self
            .title
            .ok_or_else(|| DocumentError::malformed("missing required key `title`"))?;
        if title.trim().is_empty() {
            return Err(DocumentError::malformed("`title` must not be empty"));
        }

        let status = self
            .status
            .ok_or_else(|| DocumentError::malformed("missing required key `status`"))?
            .parse::<Status>()?;

        let published_on = self
            .published_on
            .map(|s| parse_timestamp(&s, tz))
            .transpose()?;

        let cover_image = match self.cover_image {
            Some(raw) => Some(CoverImage {
                url: raw.url.ok_or_else(|| {
                    DocumentError::malformed("missing required key `coverImage.url`")
                })?,
                alt: raw.alt.unwrap_or_default(),
            }),
            None => None,
        };

        Ok(FrontMatter {
            title,
            description: self.description.unwrap_or_default(),
            published_on,
            status,
            cover_image,
            tags: self.tags,
            extra: self.extra,
        })
    }
}

impl FrontMatter {
    /// Parse front-matter from content, reading offset-less timestamps as UTC.
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), DocumentError> {
        Self::parse_in(content, Tz::UTC)
    }

    /// Parse front-matter, reading offset-less timestamps in `tz`
    pub fn parse_in(content: &str, tz: Tz) -> Result<(Self, &str), DocumentError> {
        let (yaml, body) = split(content)?;

        if yaml.trim().is_empty() {
            return Err(DocumentError::malformed("front-matter block is empty"));
        }

        let raw: RawFrontMatter = serde_yaml::from_str(yaml)
            .map_err(|e| DocumentError::malformed(e.to_string()))?;

        Ok((raw.validate(tz)?, body))
    }

    /// Serialize back to the YAML enclosed between the delimiters
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }
}

/// Split raw text into (front-matter YAML, body) at the first two delimiter lines
pub fn split(content: &str) -> Result<(&str, &str), DocumentError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.trim_start();

    let mut lines = content.split_inclusive('\n');
    let opening = lines.next().unwrap_or_default();
    if !is_delimiter(opening) {
        return Err(DocumentError::malformed("missing opening `---` delimiter"));
    }

    let start = opening.len();
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            let yaml = &content[start..offset];
            let body = content[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(DocumentError::malformed("missing closing `---` delimiter"))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse a timestamp in any of the accepted formats
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<DateTime<FixedOffset>, DocumentError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|dt| resolve_local(dt, tz))
        .ok_or_else(|| DocumentError::UnparsableTimestamp(s.to_string()))
}

/// Place a wall-clock time in `tz`, taking the earlier instant when ambiguous
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.fixed_offset()),
        // Inside a DST gap: apply the offset in force before it, landing past the gap
        LocalResult::None => {
            let day_before = naive.checked_sub_signed(Duration::days(1))?;
            let before = tz.from_local_datetime(&day_before).earliest()?;
            let offset = i64::from(before.offset().fix().local_minus_utc());
            let utc = naive.checked_sub_signed(Duration::seconds(offset))?;
            Some(tz.from_utc_datetime(&utc).fixed_offset())
        }
    }
}

fn serialize_timestamp<S>(
    value: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Visitor coercing any YAML scalar into a string.
///
/// Numbers and booleans are rendered from their parsed value, so `1.50`
/// reads as `1.5` and `0x1F` as `31`. Quoted values are kept verbatim.
struct ScalarVisitor;

impl<'de> serde::de::Visitor<'de> for ScalarVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor)
}

/// A list element coerced the same way as top-level scalars
struct Scalar(Option<String>);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor).map(Scalar)
    }
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
                vec.extend(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
