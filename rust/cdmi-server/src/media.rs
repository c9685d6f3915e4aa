use cdmi_model::ResourceKind;

use crate::CdmiError;

/// Resolve the declared media type of a write request to the one resource
/// kind it targets.
///
/// Writes never probe: an unrecognized declared type is a client error,
/// not a search problem. Capability nodes are provisioned at bootstrap and
/// read-only afterwards, so `application/cdmi-capability` is rejected here
/// like any other unknown type.
pub fn write_target(declared: &str) -> Result<ResourceKind, CdmiError> {
    let media_type = declared
        .split_once(';')
        .map(|(media_type, _)| media_type)
        .unwrap_or(declared)
        .trim();

    match ResourceKind::from_object_type(media_type) {
        Some(ResourceKind::Capability) | None => Err(CdmiError::BadContentType),
        Some(kind) => Ok(kind),
    }
}
