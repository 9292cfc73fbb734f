/// Formats `key=value` pairs as a `Cookie` header value, keeping the given order.
///
/// Values are URI-component encoded; keys are written as-is.
#[must_use]
pub fn make_cookie_header(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("; ")
}
