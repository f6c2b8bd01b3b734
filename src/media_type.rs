/// Media type of the ORAS artifact manifest.
pub const ARTIFACT_MANIFEST: &str = "application/vnd.oras.artifact.manifest.v1+json";

/// Media type of an OCI image manifest, the usual subject of an artifact.
pub const IMAGE_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
