use serde_json::Value as JsonValue;

/// Follows `path` through nested JSON objects and returns the leaf as text.
///
/// Close to PostgreSQL's `->>` operator: strings are returned unquoted, other
/// scalars in their JSON text form, and a JSON `null` (or a missing key
/// anywhere along the path) yields `None`. Objects and arrays come out as
/// compact `serde_json` text (`{"a":1}`), not jsonb's spaced output
/// (`{"a": 1}`).
pub fn json_path_text(value: &JsonValue, path: &[&str]) -> Option<String> {
    let leaf = path
        .iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))?;

    match leaf {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Same as [`json_path_text`], for a column that may itself be SQL `NULL`.
pub fn column_path_text(column: Option<&JsonValue>, path: &[&str]) -> Option<String> {
    column.and_then(|value| json_path_text(value, path))
}

/// Returns the first candidate that is present, like SQL `COALESCE`.
///
/// An empty string counts as present; callers decide how to display it.
pub fn first_present<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates.into_iter().flatten().next()
}
