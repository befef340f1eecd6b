//! URL helpers for concrete API methods: query strings from parameter maps and
//! `{key}` placeholder substitution in method paths.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

/// Bytes escaped inside a query key or value. Everything a query component
/// tolerates stays literal, except the separators `&`, `=` and `+` so that a
/// value cannot split or alter its own pair.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'&')
    .add(b'=')
    .add(b'+');

/// Build `?k1=v1&k2=v2` from a parameter map, or `""` when it is empty.
///
/// Values are stringified first: strings verbatim, everything else as its
/// JSON text. Pair order follows the map's iteration order.
pub fn method_params_from_map<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let pairs: Vec<String> = params
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(&raw, QUERY_COMPONENT)
            )
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Replace `{key}` in `method` with `value`.
///
/// Returns `None` when the placeholder does not occur, so callers can tell a
/// missing substitution apart from a template that needed none.
pub fn method_key_substitute(method: &str, key: &str, value: &str) -> Option<String> {
    let placeholder = format!("{{{key}}}");
    if method.contains(&placeholder) {
        Some(method.replace(&placeholder, value))
    } else {
        None
    }
}
