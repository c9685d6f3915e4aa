use serde_json::{Map, Value};

use crate::CdmiError;

/// Parse a `start-end` range expression into its bounds.
///
/// Both bounds are required byte offsets and both are inclusive; anything
/// non-numeric is a bad range.
pub fn parse_bounds(range: &str) -> Result<(usize, usize), CdmiError> {
    let (start, end) = range.split_once('-').ok_or(CdmiError::BadRange)?;

    let start = start.trim().parse().map_err(|_| CdmiError::BadRange)?;
    let end = end.trim().parse().map_err(|_| CdmiError::BadRange)?;

    Ok((start, end))
}

/// Slice the inclusive byte range `start-end` out of a payload string.
///
/// Offsets index the UTF-8 encoding, not characters; a slice that splits a
/// multi-byte character is served with replacement characters rather than
/// rejected.
pub fn slice_value(payload: &str, range: &str) -> Result<String, CdmiError> {
    let (start, end) = parse_bounds(range)?;
    let bytes = payload.as_bytes();

    if start > end || end >= bytes.len() {
        return Err(CdmiError::BadRange);
    }

    Ok(String::from_utf8_lossy(&bytes[start..=end]).into_owned())
}

/// Apply an HTTP `Range` directive to a data object representation,
/// substituting the sliced payload in place of the full one.
///
/// This runs before field selection, so a `value:a-b` field specifier in
/// the same request operates on the already range-limited payload.
pub fn apply_content_range(
    representation: &mut Map<String, Value>,
    range: &str,
) -> Result<(), CdmiError> {
    let payload = representation
        .get("value")
        .and_then(Value::as_str)
        .ok_or(CdmiError::BadRange)?;

    let sliced = slice_value(payload, range)?;
    representation.insert("value".to_string(), Value::String(sliced));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_slices_inclusively_at_both_bounds() -> Result<(), CdmiError> {
        assert_eq!(slice_value("hello", "0-2")?, "hel");
        assert_eq!(slice_value("hello", "0-0")?, "h");
        assert_eq!(slice_value("hello", "4-4")?, "o");
        assert_eq!(slice_value("hello", "0-4")?, "hello");
        assert_eq!(slice_value("hello", "1-3")?, "ell");

        Ok(())
    }

    #[test]
    fn it_preserves_the_sliced_bytes() -> Result<(), CdmiError> {
        let payload = "the quick brown fox";
        let sliced = slice_value(payload, "4-8")?;

        assert_eq!(sliced.len(), 5);
        assert_eq!(sliced.as_bytes(), &payload.as_bytes()[4..=8]);

        Ok(())
    }

    #[test]
    fn it_rejects_out_of_bounds_ranges() {
        assert!(matches!(
            slice_value("hello", "0-5"),
            Err(CdmiError::BadRange)
        ));
        assert!(matches!(
            slice_value("hello", "3-1"),
            Err(CdmiError::BadRange)
        ));
        assert!(matches!(slice_value("", "0-0"), Err(CdmiError::BadRange)));
    }

    #[test]
    fn it_rejects_malformed_ranges() {
        assert!(matches!(
            slice_value("hello", "one-two"),
            Err(CdmiError::BadRange)
        ));
        assert!(matches!(slice_value("hello", "3"), Err(CdmiError::BadRange)));
        assert!(matches!(
            slice_value("hello", "-1-2"),
            Err(CdmiError::BadRange)
        ));
    }

    #[test]
    fn it_substitutes_the_payload_in_place() -> Result<(), CdmiError> {
        let mut representation = Map::new();
        representation.insert("value".to_string(), Value::String("hello".to_string()));
        representation.insert("mimetype".to_string(), Value::String("text/plain".into()));

        apply_content_range(&mut representation, "1-2")?;

        assert_eq!(
            representation.get("value"),
            Some(&Value::String("el".to_string()))
        );
        assert_eq!(
            representation.get("mimetype"),
            Some(&Value::String("text/plain".to_string()))
        );

        Ok(())
    }
}
