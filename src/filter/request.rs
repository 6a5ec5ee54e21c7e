use std::collections::BTreeMap;

use crate::config;

/// Query keys that steer the builder instead of naming a field
pub const RESERVED_KEYS: [&str; 5] = ["sort", "fields", "q", "page", "limit"];

/// Raw, untyped value of one query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
    Nested(BTreeMap<String, FilterValue>),
}

impl FilterValue {
    /// Scalar view of the value; lists yield their last element.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            FilterValue::List(items) => items.last().map(String::as_str),
            FilterValue::Nested(_) => None,
        }
    }
}

/// Decoded HTTP query string, one entry per root parameter name.
///
/// Bracketed keys nest (`price[gt]=100` becomes `price -> {gt: "100"}`). A plain key
/// given more than once keeps its last value unless it is listed as repeatable, in
/// which case every value is kept as a list. Keys that start with `$` or contain `.`
/// are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    params: BTreeMap<String, FilterValue>,
}

impl FilterRequest {
    pub fn parse(query: &str) -> Self {
        Self::parse_with(query, &config::config().filter.repeatable_params)
    }

    pub fn parse_with(query: &str, repeatable: &[String]) -> Self {
        let mut params = BTreeMap::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let (root, segments) = split_key(&key);
            if root.is_empty() {
                continue;
            }
            if !is_safe_key(root) || !segments.iter().all(|s| is_safe_key(s)) {
                tracing::debug!("Dropping query parameter with operator syntax: {}", key);
                continue;
            }

            let value = value.into_owned();
            if segments.is_empty() || segments == [""] {
                let keep_all = repeatable.iter().any(|r| r == root);
                insert_plain(&mut params, root, value, keep_all);
            } else {
                let entry = params
                    .entry(root.to_string())
                    .or_insert_with(|| FilterValue::Nested(BTreeMap::new()));
                if !matches!(entry, FilterValue::Nested(_)) {
                    *entry = FilterValue::Nested(BTreeMap::new());
                }
                if let FilterValue::Nested(inner) = entry {
                    insert_nested(inner, &segments, value);
                }
            }
        }

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.params.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FilterValue::as_text)
    }

    /// Field predicates: every parameter except the reserved control keys.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.params
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn is_safe_key(key: &str) -> bool {
    !key.starts_with('$') && !key.contains('.')
}

/// Splits `a[b][c]` into `("a", ["b", "c"])`. Malformed keys are returned whole.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, vec![]);
    };

    let root = &key[..open];
    let mut segments = vec![];
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(&stripped[..close]);
                rest = &stripped[close + 1..];
            }
            None => return (key, vec![]),
        }
    }

    if !rest.is_empty() {
        return (key, vec![]);
    }
    (root, segments)
}

fn insert_plain(params: &mut BTreeMap<String, FilterValue>, key: &str, value: String, keep_all: bool) {
    let next = match params.remove(key) {
        Some(FilterValue::Text(old)) if keep_all => FilterValue::List(vec![old, value]),
        Some(FilterValue::List(mut items)) if keep_all => {
            items.push(value);
            FilterValue::List(items)
        }
        _ if keep_all => FilterValue::List(vec![value]),
        _ => FilterValue::Text(value),
    };
    params.insert(key.to_string(), next);
}

fn insert_nested(map: &mut BTreeMap<String, FilterValue>, segments: &[&str], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() || rest == [""] {
        let next = match map.remove(*head) {
            Some(FilterValue::Text(old)) => FilterValue::List(vec![old, value]),
            Some(FilterValue::List(mut items)) => {
                items.push(value);
                FilterValue::List(items)
            }
            _ if rest == [""] => FilterValue::List(vec![value]),
            _ => FilterValue::Text(value),
        };
        map.insert(head.to_string(), next);
        return;
    }

    let entry = map
        .entry(head.to_string())
        .or_insert_with(|| FilterValue::Nested(BTreeMap::new()));
    if !matches!(entry, FilterValue::Nested(_)) {
        *entry = FilterValue::Nested(BTreeMap::new());
    }
    if let FilterValue::Nested(inner) = entry {
        insert_nested(inner, rest, value);
    }
}
