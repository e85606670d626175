use serde::{Deserialize, Serialize};

/// An inbound blob-store event notification.
///
/// The transport (queue wiring, batching, retries) is external; this is the
/// decoded per-object message. Event types follow the `Class:SubType`
/// convention, e.g. `ObjectCreated:Put`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    pub event_type: String,
    pub bucket: String,
    pub object_key: String,
}

impl StorageEvent {
    /// Returns true for `ObjectCreated`-class events with the `Put`
    /// sub-type, the only kind the reconciler acts on.
    pub fn is_object_created_put(&self) -> bool {
        match self.event_type.split_once(':') {
            Some((class, sub_type)) => class == "ObjectCreated" && sub_type == "Put",
            None => false,
        }
    }
}

/// Decodes a raw queue message into its per-object events.
///
/// The blob store batches events into one message: a JSON envelope holding
/// a `Records` array, each record carrying the event name and the bucket
/// and object it concerns. A message without a `Records` field decodes to
/// no events.
pub fn parse_message(body: &str) -> serde_json::Result<Vec<StorageEvent>> {
    let envelope: MessageEnvelope = serde_json::from_str(body)?;

    Ok(envelope
        .records
        .into_iter()
        .map(|record| StorageEvent {
            event_type: record.event_name,
            bucket: record.s3.bucket.name,
            object_key: record.s3.object.key,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(rename = "Records", default)]
    records: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    #[serde(rename = "eventName")]
    event_name: String,
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: &str) -> StorageEvent {
        StorageEvent {
            event_type: event_type.to_string(),
            bucket: "posts".to_string(),
            object_key: "owner/2024/6/post".to_string(),
        }
    }

    #[test]
    fn test_object_created_put_is_actionable() {
        assert!(event("ObjectCreated:Put").is_object_created_put());
    }

    #[test]
    fn test_other_created_sub_types_are_not_actionable() {
        assert!(!event("ObjectCreated:Copy").is_object_created_put());
        assert!(!event("ObjectCreated:CompleteMultipartUpload").is_object_created_put());
    }

    #[test]
    fn test_other_event_classes_are_not_actionable() {
        assert!(!event("ObjectRemoved:Delete").is_object_created_put());
        assert!(!event("ObjectCreated").is_object_created_put());
    }

    #[test]
    fn test_parse_message_flattens_records() {
        let body = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": {"name": "posts"},
                        "object": {"key": "o/2024/6/a.jpg"}
                    }
                },
                {
                    "eventName": "ObjectRemoved:Delete",
                    "s3": {
                        "bucket": {"name": "posts"},
                        "object": {"key": "o/2024/6/b.jpg"}
                    }
                }
            ]
        }"#;

        let events = parse_message(body).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "ObjectCreated:Put");
        assert_eq!(events[0].bucket, "posts");
        assert_eq!(events[0].object_key, "o/2024/6/a.jpg");
        assert!(events[0].is_object_created_put());
        assert!(!events[1].is_object_created_put());
    }

    #[test]
    fn test_parse_message_without_records_yields_no_events() {
        let events = parse_message("{}").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_message_rejects_malformed_payload() {
        assert!(parse_message("not json").is_err());
        assert!(parse_message(r#"{"Records": [{"eventName": "x"}]}"#).is_err());
    }

    #[test]
    fn test_deserializes_camel_case_wire_names() {
        let parsed: StorageEvent = serde_json::from_str(
            r#"{"eventType":"ObjectCreated:Put","bucket":"posts","objectKey":"o/2024/6/p.jpg"}"#,
        )
        .unwrap();

        assert_eq!(parsed.event_type, "ObjectCreated:Put");
        assert_eq!(parsed.bucket, "posts");
        assert_eq!(parsed.object_key, "o/2024/6/p.jpg");
    }
}
