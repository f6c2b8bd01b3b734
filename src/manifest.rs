use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::media_type;
use crate::schema::{DecodeOptions, Field, FieldSpec, MANIFEST_FIELDS, UnknownFields};

/// Represents an ORAS artifact manifest
///
/// The JSON form is produced from [`MANIFEST_FIELDS`]: keys are emitted in
/// table order and annotations in key order, so encoding the same value
/// always yields the same bytes. The manifest has no digest of its own; it
/// is identified by hashing those bytes, so do not modify a manifest after
/// its digest has been taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Media type of this document
    pub media_type: String,
    /// Logical type of the artifact the manifest describes
    pub artifact_type: String,
    /// Descriptors for the blobs that make up the artifact
    pub blobs: Vec<Descriptor>,
    /// Descriptor of the manifest this artifact is linked to
    pub subject_manifest: Descriptor,
    /// Arbitrary metadata for the artifact
    pub annotations: BTreeMap<String, String>,
}

impl Manifest {
    /// Create an artifact manifest with no blobs and no annotations
    pub fn new(artifact_type: impl Into<String>, subject_manifest: Descriptor) -> Self {
        Self {
            media_type: media_type::ARTIFACT_MANIFEST.to_string(),
            artifact_type: artifact_type.into(),
            blobs: Vec::new(),
            subject_manifest,
            annotations: BTreeMap::new(),
        }
    }

    pub fn with_blob(mut self, blob: Descriptor) -> Self {
        self.blobs.push(blob);
        self
    }

    pub fn with_blobs(mut self, blobs: impl IntoIterator<Item = Descriptor>) -> Self {
        self.blobs.extend(blobs);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Whether the media type is the ORAS artifact manifest media type
    pub fn is_artifact_manifest(&self) -> bool {
        self.media_type == media_type::ARTIFACT_MANIFEST
    }

    /// Serialize to the canonical (compact) JSON bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(self).map_err(Error::Encode)?;
        debug!(
            artifact_type = %self.artifact_type,
            blobs = self.blobs.len(),
            size = bytes.len(),
            "Encoded artifact manifest"
        );
        Ok(bytes)
    }

    /// Serialize to indented JSON for display
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Encode)
    }

    /// Decode a manifest, ignoring unknown keys
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with(bytes, &DecodeOptions::default())
    }

    /// Decode a manifest using the given options
    pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<Self> {
        debug!("Decoding artifact manifest ({} bytes)", bytes.len());

        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::malformed(format!("invalid JSON: {}", e)))?;
        let Value::Object(object) = value else {
            return Err(Error::malformed("document is not a JSON object"));
        };

        let manifest = Self::from_object(object, options)?;
        debug!(
            artifact_type = %manifest.artifact_type,
            blobs = manifest.blobs.len(),
            "Decoded artifact manifest"
        );
        Ok(manifest)
    }

    fn from_object(mut object: Map<String, Value>, options: &DecodeOptions) -> Result<Self> {
        for key in object.keys() {
            if FieldSpec::lookup(key).is_some() {
                continue;
            }
            match options.unknown_fields {
                UnknownFields::Ignore => debug!("Ignoring unknown manifest key: {}", key),
                UnknownFields::Reject => {
                    return Err(Error::malformed(format!("unknown field `{}`", key)));
                }
            }
        }

        for spec in MANIFEST_FIELDS.iter().filter(|spec| spec.required) {
            if !object.contains_key(spec.key) {
                return Err(Error::malformed(format!(
                    "missing required field `{}`",
                    spec.key
                )));
            }
        }

        let media_type = take_required(&mut object, Field::MediaType)?;
        let artifact_type = take_required(&mut object, Field::ArtifactType)?;
        // A null list is what producers emit for a manifest without blobs
        let blobs = take_required::<Option<Vec<Descriptor>>>(&mut object, Field::Blobs)?
            .unwrap_or_default();
        let subject_manifest = take_required(&mut object, Field::SubjectManifest)?;
        // A null map is treated like an absent one
        let annotations = take_optional::<Option<BTreeMap<String, String>>>(
            &mut object,
            Field::Annotations,
        )?
        .flatten()
        .unwrap_or_default();

        let manifest = Self {
            media_type,
            artifact_type,
            blobs,
            subject_manifest,
            annotations,
        };
        if !manifest.is_artifact_manifest() {
            warn!("Unexpected artifact manifest media type: {}", manifest.media_type);
        }
        Ok(manifest)
    }

    fn is_empty_field(&self, field: Field) -> bool {
        match field {
            Field::MediaType => self.media_type.is_empty(),
            Field::ArtifactType => self.artifact_type.is_empty(),
            Field::Blobs => self.blobs.is_empty(),
            Field::SubjectManifest => false,
            Field::Annotations => self.annotations.is_empty(),
        }
    }
}

fn take_optional<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    field: Field,
) -> Result<Option<T>> {
    let key = FieldSpec::for_field(field).key;
    object
        .remove(key)
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| Error::malformed(format!("field `{}`: {}", key, e)))
        })
        .transpose()
}

fn take_required<T: DeserializeOwned>(object: &mut Map<String, Value>, field: Field) -> Result<T> {
    let key = FieldSpec::for_field(field).key;
    take_optional(object, field)?
        .ok_or_else(|| Error::malformed(format!("missing required field `{}`", key)))
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let emitted: Vec<&FieldSpec> = MANIFEST_FIELDS
            .iter()
            .filter(|spec| !(spec.omit_if_empty && self.is_empty_field(spec.field)))
            .collect();

        let mut map = serializer.serialize_map(Some(emitted.len()))?;
        for spec in emitted {
            match spec.field {
                Field::MediaType => map.serialize_entry(spec.key, &self.media_type)?,
                Field::ArtifactType => map.serialize_entry(spec.key, &self.artifact_type)?,
                Field::Blobs => map.serialize_entry(spec.key, &self.blobs)?,
                Field::SubjectManifest => map.serialize_entry(spec.key, &self.subject_manifest)?,
                Field::Annotations => map.serialize_entry(spec.key, &self.annotations)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Manifest::from_object(object, &DecodeOptions::default()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn subject() -> Descriptor {
        Descriptor::new(media_type::IMAGE_MANIFEST, "sha256:abc", 123)
    }

    fn document(blobs: Value) -> Value {
        json!({
            "mediaType": media_type::ARTIFACT_MANIFEST,
            "artifactType": "application/vnd.example.type",
            "blobs": blobs,
            "subjectManifest": serde_json::to_value(subject()).unwrap()
        })
    }

    #[test]
    fn test_new_manifest_defaults() {
        let manifest = Manifest::new("application/vnd.example.type", subject());
        assert!(manifest.is_artifact_manifest());
        assert!(manifest.blobs.is_empty());
        assert!(manifest.annotations.is_empty());
    }

    #[test]
    fn test_annotations_omitted_when_empty() {
        let manifest = Manifest::new("application/vnd.example.type", subject());
        let value = serde_json::to_value(&manifest).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("annotations"));
        assert_eq!(object["blobs"], json!([]));
    }

    #[test]
    fn test_annotations_emitted_when_present() {
        let manifest = Manifest::new("application/vnd.example.type", subject())
            .with_annotation("org.example.created", "2021-01-01");
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["annotations"], json!({"org.example.created": "2021-01-01"}));
    }

    #[test]
    fn test_key_order_follows_field_table() {
        let manifest = Manifest::new("application/vnd.example.type", subject())
            .with_annotation("b", "2")
            .with_annotation("a", "1");
        let text = String::from_utf8(manifest.encode().unwrap()).unwrap();

        let positions: Vec<usize> = MANIFEST_FIELDS
            .iter()
            .map(|spec| text.find(&format!("\"{}\":", spec.key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
        assert!(text.ends_with(r#""annotations":{"a":"1","b":"2"}}"#), "{}", text);
    }

    #[test]
    fn test_null_annotations_decode_as_empty() {
        let mut doc = document(json!([]));
        doc["annotations"] = Value::Null;
        let manifest = Manifest::decode(doc.to_string().as_bytes()).unwrap();
        assert!(manifest.annotations.is_empty());
    }

    #[test]
    fn test_null_blobs_decode_as_empty() {
        let doc = document(Value::Null);
        let manifest = Manifest::decode(doc.to_string().as_bytes()).unwrap();
        assert!(manifest.blobs.is_empty());

        let text = String::from_utf8(manifest.encode().unwrap()).unwrap();
        assert!(text.contains(r#""blobs":[]"#), "{}", text);
    }

    #[test]
    fn test_non_array_blobs_rejected() {
        for bad in [json!("sha256:abc"), json!(1), json!({"mediaType": "x"})] {
            let doc = document(bad);
            let err = Manifest::decode(doc.to_string().as_bytes()).unwrap_err();
            assert_matches!(err, Error::MalformedDocument(msg) if msg.contains("blobs"));
        }
    }

    #[test]
    fn test_serde_deserialize_uses_field_table() {
        let doc = json!({
            "mediaType": media_type::ARTIFACT_MANIFEST,
            "artifactType": "application/vnd.example.type",
            "blobs": [],
            "extra": true
        });
        let result: std::result::Result<Manifest, _> = serde_json::from_value(doc);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("subjectManifest"), "{}", err);
    }

    #[test]
    fn test_foreign_media_type_still_decodes() {
        let manifest = Manifest {
            media_type: media_type::IMAGE_MANIFEST.to_string(),
            ..Manifest::new("application/vnd.example.type", subject())
        };
        let decoded = Manifest::decode(&manifest.encode().unwrap()).unwrap();
        assert!(!decoded.is_artifact_manifest());
        assert_eq!(decoded, manifest);
    }
}
