use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rating::{AVERAGE_RATING_FIELD, GRADE_SCORE_PATH, average_rating, bson_number};
use crate::errors::DirectoryError;
use crate::query::resolve_path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// `[longitude, latitude]`
    #[serde(default)]
    pub coord: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Grade {
    pub date: Option<DateTime<Utc>>,
    pub grade: Option<String>,
    pub score: Option<f64>,
}

/// A restaurant as returned to clients, including the derived rating.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub grades: Vec<Grade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
}

impl Restaurant {
    /// Decodes a stored document. Only `name` is mandatory; everything else
    /// is read leniently and left empty when missing or of the wrong type.
    ///
    /// # Errors
    /// Returns `InvalidDocument` when `name` is absent or not a string.
    pub fn from_document(doc: &BsonDocument) -> Result<Self, DirectoryError> {
        let name = match doc.get("name") {
            Some(Bson::String(s)) => s.clone(),
            _ => {
                return Err(DirectoryError::InvalidDocument(
                    "restaurant document has no string `name`".into(),
                ));
            }
        };
        let grades: Vec<Grade> = match doc.get("grades") {
            Some(Bson::Array(items)) => items
                .iter()
                .filter_map(|g| match g {
                    Bson::Document(d) => Some(grade_from_document(d)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        let address = match doc.get("address") {
            Some(Bson::Document(d)) => Some(address_from_document(d)),
            _ => None,
        };
        // Same path walk as the aggregation stage, so a `grades` sub-document
        // rates identically in listings and lookups.
        let average_rating =
            average_rating(resolve_path(doc, GRADE_SCORE_PATH).into_iter().filter_map(bson_number));
        Ok(Self {
            name,
            borough: string_field(doc, "borough"),
            cuisine: string_field(doc, "cuisine"),
            address,
            grades,
            restaurant_id: string_field(doc, "restaurant_id"),
            average_rating,
        })
    }

    /// Rating as attached by an aggregation stage, if the document carries one.
    #[must_use]
    pub fn aggregated_rating(doc: &BsonDocument) -> Option<f64> {
        doc.get(AVERAGE_RATING_FIELD).and_then(bson_number)
    }
}

fn string_field(doc: &BsonDocument, key: &str) -> Option<String> {
    match doc.get(key) {
        Some(Bson::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn address_from_document(d: &BsonDocument) -> Address {
    let coord = match d.get("coord") {
        Some(Bson::Array(a)) => a.iter().filter_map(bson_number).collect(),
        _ => Vec::new(),
    };
    Address {
        building: string_field(d, "building"),
        street: string_field(d, "street"),
        zipcode: string_field(d, "zipcode"),
        coord,
    }
}

fn grade_from_document(d: &BsonDocument) -> Grade {
    let date = match d.get("date") {
        Some(Bson::DateTime(dt)) => Some(dt.to_chrono()),
        Some(Bson::String(s)) => {
            DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
        }
        _ => None,
    };
    Grade { date, grade: string_field(d, "grade"), score: d.get("score").and_then(bson_number) }
}
