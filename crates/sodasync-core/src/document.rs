//! Document and page types for the SODA wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote-stored record wrapping a caller-defined payload.
///
/// Documents are created by the remote store (on insert) or synthesized
/// locally as drafts via [`Document::draft`]. The `id` and `etag` are
/// opaque server-assigned tokens; the timestamps are informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// Opaque stable identifier. Empty for a draft not yet created
    /// remotely.
    pub id: String,

    /// Opaque version token, carried for optimistic concurrency but not
    /// enforced by this library.
    pub etag: String,

    /// Creation timestamp. Absent on drafts.
    #[serde(rename = "created", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last-modification timestamp. Absent on drafts.
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_at: Option<DateTime<Utc>>,

    /// The payload. The remote store omits it on bulk list and insert
    /// responses that return only metadata, so every consumer must handle
    /// the absent case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> Document<T> {
    /// Create a local draft carrying `value`, not yet persisted remotely.
    ///
    /// The empty `id` routes the document to insert on save.
    pub fn draft(value: T) -> Self {
        Self {
            id: String::new(),
            etag: String::new(),
            created_at: None,
            last_modified_at: None,
            value: Some(value),
        }
    }

    /// Returns true if this document has not yet been created remotely.
    pub fn is_draft(&self) -> bool {
        self.id.is_empty()
    }
}

/// One fetched page of a collection listing plus continuation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The documents in this page, in listing order.
    pub items: Vec<Document<T>>,

    /// Whether additional pages exist.
    pub has_more: bool,

    /// Number of items in this page.
    pub count: u64,

    /// Pagination cursor of this page. Absent on a first page fetched
    /// without an explicit offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Page size the server applied. Absent when no explicit size was
    /// requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Total count across all pages. Not always present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

impl<T> Page<T> {
    /// The offset to request for the page after this one.
    ///
    /// An absent `offset` is treated as cursor value 0, not as an error.
    pub fn next_offset(&self) -> u64 {
        self.offset.unwrap_or(0) + self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Fruit {
        name: String,
        count: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    }

    #[test]
    fn draft_has_empty_id_and_carries_value() {
        let draft = Document::draft(Fruit {
            name: "kiwi".to_string(),
            count: 5,
            color: None,
        });
        assert!(draft.is_draft());
        assert!(draft.etag.is_empty());
        assert!(draft.created_at.is_none());
        assert_eq!(draft.value.as_ref().map(|f| f.name.as_str()), Some("kiwi"));
    }

    #[test]
    fn payload_round_trip_with_color_present() {
        let fruit = Fruit {
            name: "wild banana".to_string(),
            count: 10,
            color: Some("bright yellow".to_string()),
        };
        let encoded = serde_json::to_string(&fruit).unwrap();
        let decoded: Fruit = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, fruit);
    }

    #[test]
    fn payload_round_trip_with_color_absent() {
        let fruit = Fruit {
            name: "pear".to_string(),
            count: 3,
            color: None,
        };
        let encoded = serde_json::to_string(&fruit).unwrap();
        assert!(!encoded.contains("color"));
        let decoded: Fruit = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, fruit);
    }

    #[test]
    fn decodes_wire_document() {
        let document: Document<Fruit> = serde_json::from_value(json!({
            "id": "0D856B76EC144C23AF116CD8DDE4B0BF",
            "etag": "711CBA3C074C421F99DA102F7C6EE74A",
            "created": "2020-08-26T09:20:27.891977Z",
            "lastModified": "2020-08-26T13:13:14.419586Z",
            "value": { "name": "apple", "count": 7, "color": "red" }
        }))
        .unwrap();

        assert!(!document.is_draft());
        assert!(document.created_at.is_some());
        assert_eq!(document.value.unwrap().count, 7);
    }

    #[test]
    fn decodes_metadata_only_document() {
        let document: Document<Fruit> = serde_json::from_value(json!({
            "id": "X",
            "etag": "E",
            "created": "2020-08-26T09:20:27.891977Z",
            "lastModified": "2020-08-26T09:20:27.891977Z"
        }))
        .unwrap();

        assert!(document.value.is_none());
    }

    #[test]
    fn next_offset_adds_count_to_offset() {
        let page: Page<Fruit> = serde_json::from_value(json!({
            "items": [],
            "hasMore": true,
            "count": 100,
            "offset": 0,
            "limit": 100
        }))
        .unwrap();

        assert_eq!(page.next_offset(), 100);
    }

    #[test]
    fn next_offset_treats_absent_offset_as_zero() {
        let page: Page<Fruit> = serde_json::from_value(json!({
            "items": [],
            "hasMore": false,
            "count": 25
        }))
        .unwrap();

        assert_eq!(page.next_offset(), 25);
        assert!(page.limit.is_none());
        assert!(page.total_results.is_none());
    }
}
