//! Conversions between Firestore REST payloads and store types.
//!
//! Firestore wraps every value in a single-key object naming its type, e.g.
//! `{"stringValue": "Rejas"}` or `{"integerValue": "3"}`. Integers travel as
//! decimal strings and timestamps as RFC 3339 strings.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Document, FieldValue, Fields, StoreError};

// =============================================================================
// Wire Types
// =============================================================================

/// A Firestore typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    StringValue(String),
    TimestampValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(WireGeoPoint),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireArray {
    #[serde(default)]
    pub values: Vec<WireValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireMap {
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
}

/// A Firestore document resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    /// Full resource name ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, WireValue>,
}

/// Request body for create and patch calls.
#[derive(Debug, Serialize)]
pub struct WriteBody {
    pub fields: BTreeMap<String, WireValue>,
}

/// One page of a `documents.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub documents: Vec<WireDocument>,
    pub next_page_token: Option<String>,
}

/// One element of a `runQuery` response stream.
///
/// Elements without a document only carry progress metadata.
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
    pub document: Option<WireDocument>,
}

// =============================================================================
// Decoding
// =============================================================================

/// Convert a wire value into a [`FieldValue`].
pub fn decode_value(value: WireValue) -> Result<FieldValue, StoreError> {
    Ok(match value {
        WireValue::NullValue(()) => FieldValue::Null,
        WireValue::BooleanValue(b) => FieldValue::Boolean(b),
        WireValue::IntegerValue(raw) => FieldValue::Integer(raw.parse().map_err(|_| {
            StoreError::InvalidDocument(format!("invalid integerValue: {raw}"))
        })?),
        WireValue::DoubleValue(d) => FieldValue::Double(d),
        WireValue::StringValue(s) | WireValue::BytesValue(s) | WireValue::ReferenceValue(s) => {
            FieldValue::String(s)
        }
        WireValue::TimestampValue(raw) => FieldValue::Timestamp(
            DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| {
                    StoreError::InvalidDocument(format!("invalid timestampValue {raw}: {e}"))
                })?
                .with_timezone(&Utc),
        ),
        WireValue::GeoPointValue(point) => FieldValue::Map(Fields::from([
            ("latitude".to_owned(), FieldValue::Double(point.latitude)),
            ("longitude".to_owned(), FieldValue::Double(point.longitude)),
        ])),
        WireValue::ArrayValue(array) => FieldValue::Array(
            array
                .values
                .into_iter()
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        ),
        WireValue::MapValue(map) => FieldValue::Map(decode_fields(map.fields)?),
    })
}

/// Convert a wire field map into [`Fields`].
pub fn decode_fields(fields: BTreeMap<String, WireValue>) -> Result<Fields, StoreError> {
    fields
        .into_iter()
        .map(|(key, value)| Ok((key, decode_value(value)?)))
        .collect()
}

/// Convert a wire document into a [`Document`], taking the id from the last
/// segment of its resource name.
pub fn decode_document(document: WireDocument) -> Result<Document, StoreError> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            StoreError::InvalidDocument(format!("document name has no id: {}", document.name))
        })?
        .to_owned();

    Ok(Document {
        id,
        fields: decode_fields(document.fields)?,
    })
}

// =============================================================================
// Encoding
// =============================================================================

/// Convert a [`FieldValue`] into its wire form.
#[must_use]
pub fn encode_value(value: &FieldValue) -> WireValue {
    match value {
        FieldValue::Null => WireValue::NullValue(()),
        FieldValue::Boolean(b) => WireValue::BooleanValue(*b),
        FieldValue::Integer(i) => WireValue::IntegerValue(i.to_string()),
        FieldValue::Double(d) => WireValue::DoubleValue(*d),
        FieldValue::String(s) => WireValue::StringValue(s.clone()),
        FieldValue::Timestamp(t) => {
            WireValue::TimestampValue(t.to_rfc3339_opts(SecondsFormat::Micros, true))
        }
        FieldValue::Array(values) => WireValue::ArrayValue(WireArray {
            values: values.iter().map(encode_value).collect(),
        }),
        FieldValue::Map(fields) => WireValue::MapValue(WireMap {
            fields: encode_fields(fields),
        }),
    }
}

/// Convert [`Fields`] into a wire field map.
#[must_use]
pub fn encode_fields(fields: &Fields) -> BTreeMap<String, WireValue> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}
