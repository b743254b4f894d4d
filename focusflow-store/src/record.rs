//! The `Record` trait and shallow patch merging

use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A persisted value identified by a unique string id.
///
/// `Patch` is the partial form of the record. Its serialized JSON object holds
/// only the fields being changed; each present key replaces the record's key of
/// the same name. A key serialized as `null` clears an optional field.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Partial update applied by [`merge_patch`]
    type Patch: Serialize + Send + Sync;

    /// Unique id, used as the sole lookup key
    fn id(&self) -> &str;
}

/// Merge `patch` into `record`, returning the merged copy.
///
/// The merge is shallow: top-level keys of the patch overwrite top-level keys of
/// the record, nested objects are replaced wholesale.
pub fn merge_patch<T: Record>(record: &T, patch: &T::Patch) -> Result<T> {
    let mut base = serde_json::to_value(record)?;
    let overlay = serde_json::to_value(patch)?;

    let target = base
        .as_object_mut()
        .ok_or(StoreError::NotAnObject { what: "record" })?;
    match overlay {
        Value::Object(fields) => {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        // A unit patch changes nothing
        Value::Null => {}
        _ => return Err(StoreError::NotAnObject { what: "patch" }),
    }

    Ok(serde_json::from_value(base)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    #[derive(Default, Serialize)]
    struct ItemPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<Option<String>>,
    }

    impl Record for Item {
        type Patch = ItemPatch;
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item() -> Item {
        Item {
            id: "1".into(),
            name: "First".into(),
            note: Some("keep".into()),
        }
    }

    #[test]
    fn test_merge_overwrites_present_fields_only() {
        let patch = ItemPatch {
            name: Some("Updated".into()),
            ..Default::default()
        };
        let merged = merge_patch(&item(), &patch).unwrap();
        assert_eq!(merged.name, "Updated");
        assert_eq!(merged.note.as_deref(), Some("keep"));
        assert_eq!(merged.id, "1");
    }

    #[test]
    fn test_merge_null_clears_optional_field() {
        let patch = ItemPatch {
            note: Some(None),
            ..Default::default()
        };
        let merged = merge_patch(&item(), &patch).unwrap();
        assert_eq!(merged.note, None);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let merged = merge_patch(&item(), &ItemPatch::default()).unwrap();
        assert_eq!(merged, item());
    }
}
