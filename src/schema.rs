//! Field mapping between [`Manifest`](crate::Manifest) and its JSON document.
//!
//! The mapping is a plain table rather than serde attributes so it can be
//! inspected and tested on its own. Both the serializer and the decoder in
//! [`crate::manifest`] are driven by [`MANIFEST_FIELDS`].

/// Fields of the artifact manifest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MediaType,
    ArtifactType,
    Blobs,
    SubjectManifest,
    Annotations,
}

/// One row of the field mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The in-memory field
    pub field: Field,
    /// The document key
    pub key: &'static str,
    /// Whether decoding fails when the key is absent
    pub required: bool,
    /// Whether the key is left out of the document when the value is empty
    pub omit_if_empty: bool,
}

impl FieldSpec {
    /// Find the table row for a document key
    pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
        MANIFEST_FIELDS.iter().find(|spec| spec.key == key)
    }

    /// Find the table row for a field
    pub fn for_field(field: Field) -> &'static FieldSpec {
        // Every Field variant has exactly one row
        match field {
            Field::MediaType => &MANIFEST_FIELDS[0],
            Field::ArtifactType => &MANIFEST_FIELDS[1],
            Field::Blobs => &MANIFEST_FIELDS[2],
            Field::SubjectManifest => &MANIFEST_FIELDS[3],
            Field::Annotations => &MANIFEST_FIELDS[4],
        }
    }
}

/// Manifest fields in the order they are emitted.
pub const MANIFEST_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        field: Field::MediaType,
        key: "mediaType",
        required: true,
        omit_if_empty: false,
    },
    FieldSpec {
        field: Field::ArtifactType,
        key: "artifactType",
        required: true,
        omit_if_empty: false,
    },
    FieldSpec {
        field: Field::Blobs,
        key: "blobs",
        required: true,
        omit_if_empty: false,
    },
    FieldSpec {
        field: Field::SubjectManifest,
        key: "subjectManifest",
        required: true,
        omit_if_empty: false,
    },
    FieldSpec {
        field: Field::Annotations,
        key: "annotations",
        required: false,
        omit_if_empty: true,
    },
];

/// What to do with document keys that are not in the field table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Skip unknown keys so newer documents still decode
    #[default]
    Ignore,
    /// Fail with a malformed document error
    Reject,
}

/// Options controlling how a manifest document is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub unknown_fields: UnknownFields,
}

impl DecodeOptions {
    /// Create options with the default (lenient) policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown key policy
    pub fn unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Options that reject any key outside the field table
    pub fn strict() -> Self {
        Self::new().unknown_fields(UnknownFields::Reject)
    }
}
