//! Path model: segment lists and their bracket/dotted string forms.

use regex::Regex;
use serde_json::Value as Json;
use std::sync::LazyLock;

static BRACKET_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid bracket regex"));

static FIELD_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[(?:'([^']*)'|"([^"]*)"|([^\]'"]*))\]|([^.\[\]]+)"#)
        .expect("valid field regex")
});

/// Join segments as `[a][0][b]`.
pub fn to_bracket_string<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push('[');
        out.push_str(seg.as_ref());
        out.push(']');
    }
    out
}

/// Split a bracket string into segments, dropping one layer of quotes.
///
/// Characters outside of brackets (such as a leading `$`) are ignored.
pub fn from_bracket_string(s: &str) -> Vec<String> {
    BRACKET_GROUP
        .captures_iter(s)
        .filter_map(|c| c.get(1))
        .map(|m| strip_quotes(m.as_str()).to_string())
        .collect()
}

fn strip_quotes(s: &str) -> &str {
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Split a `then.field` path written as `a.b`, `a['b']`, `a["b"]` or `a[0]`.
pub fn field_to_segments(field: &str) -> Vec<String> {
    FIELD_SEGMENT
        .captures_iter(field)
        .filter_map(|c| {
            (1..=4)
                .filter_map(|i| c.get(i))
                .next()
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Walk `segments` from `root`; array segments must be decimal indices.
pub fn lookup<'a, S: AsRef<str>>(root: &'a Json, segments: &[S]) -> Option<&'a Json> {
    let mut cur = root;
    for seg in segments {
        let seg = seg.as_ref();
        cur = match cur {
            Json::Object(map) => map.get(seg)?,
            Json::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}
