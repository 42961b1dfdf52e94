/*!
Parsing for semicolon-separated attribute strings.

Cookie attribute suffixes (`Secure; Path=/; Max-Age=3600`) and content-type
parameter lists share the same shape. Matching is case-insensitive and
boundary-exact: the attribute name must be a whole segment key, never a
suffix of a longer one, so asking for `id` in `session_id=123; id=456`
yields `456`.
*/

/// Extract the value of the named attribute.
///
/// Returns `None` when the attribute is absent or valueless; an attribute
/// with an empty value (`Domain=`) yields `Some("")`. Values are trimmed.
pub fn extract(attributes: &str, name: &str) -> Option<String> {
    attributes.split(';').find_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// Whether the named attribute is present, with or without a value.
pub fn has_flag(attributes: &str, name: &str) -> bool {
    attributes.split(';').any(|segment| {
        let key = match segment.split_once('=') {
            Some((key, _)) => key,
            None => segment,
        };
        key.trim().eq_ignore_ascii_case(name)
    })
}
