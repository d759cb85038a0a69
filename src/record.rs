use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::notion::LoadError;

pub const PROP_CATEGORY: &str = "알고리즘";
pub const PROP_TITLE: &str = "제목";
pub const PROP_DIFFICULTY: &str = "난이도";
pub const PROP_ACCURACY: &str = "정답률";
pub const PROP_SOURCE_LINK: &str = "Github";
pub const PROP_PROBLEM_LINK: &str = "문제 URL";
pub const PROP_DATE: &str = "생성일";

/// Label prefix on the difficulty select, e.g. `Lv12`.
const DIFFICULTY_PREFIX: &str = "Lv";

/// One flattened practice record. Immutable after construction; the two
/// link fields are the only ones allowed to be null at the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub category: String,
    pub title: String,
    pub difficulty: i64,
    pub accuracy_display: String,
    pub source_link: Option<String>,
    pub problem_link: Option<String>,
    pub recorded_date: NaiveDate,
}

/// Ordered record set, insertion order = query response order. Duplicate
/// dates, titles and categories are expected and left to the aggregations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Flattens every query result, all-or-nothing: one malformed record
    /// fails the whole table, a partial table is never produced.
    pub fn from_results(results: &[Value]) -> Result<Self, LoadError> {
        let mut records = Vec::with_capacity(results.len());
        for result in results {
            records.push(Record::from_result(result)?);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Record {
    /// Extracts the seven fixed properties of one query result. Each
    /// property is selected by name and by the accessor path of its
    /// declared type (select, title, number, url, date).
    pub fn from_result(result: &Value) -> Result<Self, LoadError> {
        let properties = result
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| shape("missing `properties` object"))?;

        let category = select_name(properties, PROP_CATEGORY)?;
        let title = title_text(properties, PROP_TITLE)?;
        let difficulty = parse_difficulty(&select_name(properties, PROP_DIFFICULTY)?)?;
        let accuracy = number(properties, PROP_ACCURACY)?;
        let source_link = url(properties, PROP_SOURCE_LINK)?;
        let problem_link = url(properties, PROP_PROBLEM_LINK)?;
        let recorded_date = date_start(properties, PROP_DATE)?;

        Ok(Self {
            category,
            title,
            difficulty,
            accuracy_display: format_accuracy(accuracy),
            source_link,
            problem_link,
            recorded_date,
        })
    }
}

type Properties = serde_json::Map<String, Value>;

fn property<'a>(properties: &'a Properties, name: &str) -> Result<&'a Value, LoadError> {
    properties
        .get(name)
        .ok_or_else(|| shape(&format!("missing property {name:?}")))
}

fn select_name(properties: &Properties, name: &str) -> Result<String, LoadError> {
    property(properties, name)?
        .pointer("/select/name")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| shape(&format!("property {name:?} is not a populated select")))
}

fn title_text(properties: &Properties, name: &str) -> Result<String, LoadError> {
    property(properties, name)?
        .pointer("/title/0/plain_text")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| shape(&format!("property {name:?} has no title text")))
}

fn number(properties: &Properties, name: &str) -> Result<f64, LoadError> {
    property(properties, name)?
        .get("number")
        .and_then(Value::as_f64)
        .ok_or_else(|| shape(&format!("property {name:?} is not a populated number")))
}

fn url(properties: &Properties, name: &str) -> Result<Option<String>, LoadError> {
    let value = property(properties, name)?
        .get("url")
        .ok_or_else(|| shape(&format!("property {name:?} is not a url property")))?;

    match value {
        Value::Null => Ok(None),
        Value::String(link) => Ok(Some(link.clone())),
        _ => Err(shape(&format!("property {name:?} holds a non-string url"))),
    }
}

fn date_start(properties: &Properties, name: &str) -> Result<NaiveDate, LoadError> {
    let raw = property(properties, name)?
        .pointer("/date/start")
        .and_then(Value::as_str)
        .ok_or_else(|| shape(&format!("property {name:?} is not a populated date")))?;
    parse_recorded_date(raw)
}

/// ISO-8601 calendar date; a trailing time component is ignored.
fn parse_recorded_date(raw: &str) -> Result<NaiveDate, LoadError> {
    let day = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|err| shape(&format!("invalid date {raw:?}: {err}")))
}

fn parse_difficulty(label: &str) -> Result<i64, LoadError> {
    let rest = label.strip_prefix(DIFFICULTY_PREFIX).ok_or_else(|| {
        shape(&format!(
            "difficulty label {label:?} does not start with {DIFFICULTY_PREFIX:?}"
        ))
    })?;
    rest.trim()
        .parse::<i64>()
        .map_err(|err| shape(&format!("difficulty label {label:?}: {err}")))
}

fn format_accuracy(raw: f64) -> String {
    format!("{}%", (raw * 100.0).floor() as i64)
}

fn shape(message: &str) -> LoadError {
    LoadError::Shape(message.to_string())
}
