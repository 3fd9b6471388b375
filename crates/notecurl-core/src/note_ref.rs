//! Note references: the note id plus the `xsec_*` pair the feed API expects.
//!
//! A reference is built either from a full note URL (as copied from the
//! browser) or from explicit parts. Parsing never fails: input that does not
//! look like a URL degrades to whatever its path and query text yield.

/// Source reported when the URL or caller does not provide one.
pub const DEFAULT_XSEC_SOURCE: &str = "pc_search";

/// Identifies one note for a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
    pub note_id: String,
    pub xsec_token: String,
    /// Never empty; see [`DEFAULT_XSEC_SOURCE`].
    pub xsec_source: String,
}

impl NoteRef {
    pub fn new(note_id: impl Into<String>, xsec_token: impl Into<String>, xsec_source: &str) -> Self {
        Self {
            note_id: note_id.into(),
            xsec_token: xsec_token.into(),
            xsec_source: source_or_default(xsec_source),
        }
    }

    /// Extracts the reference from a note URL such as
    /// `https://www.xiaohongshu.com/explore/<id>?xsec_token=..&xsec_source=..`.
    ///
    /// The note id is taken from the path as written, without normalization:
    /// `;params` on the last segment are dropped, trailing slashes stripped,
    /// and the last segment kept. A bare domain yields an empty id.
    pub fn from_url(note_url: &str) -> Self {
        let (path, query) = split_url(note_url);

        let note_id = last_path_segment(strip_params(path));
        let xsec_token = first_query_value(query, "xsec_token").unwrap_or_default();
        let xsec_source = first_query_value(query, "xsec_source").unwrap_or_default();
        Self::new(note_id, xsec_token, &xsec_source)
    }
}

pub(crate) fn source_or_default(source: &str) -> String {
    if source.is_empty() {
        DEFAULT_XSEC_SOURCE.to_string()
    } else {
        source.to_string()
    }
}

/// Raw path and query of `raw`; the fragment is dropped.
fn split_url(raw: &str) -> (&str, &str) {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (before_query, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));
    (strip_scheme_and_authority(before_query), query)
}

/// `scheme:` and a following `//authority` are not part of the path.
fn strip_scheme_and_authority(s: &str) -> &str {
    let rest = match s.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => s,
    };
    match rest.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map_or("", |i| &authority_and_path[i..]),
        None => rest,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Drops `;params` from the last path segment.
fn strip_params(path: &str) -> &str {
    let last_slash = path.rfind('/').map_or(0, |i| i + 1);
    match path[last_slash..].find(';') {
        Some(i) => &path[..last_slash + i],
        None => path,
    }
}

fn last_path_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// First non-blank, percent-decoded value for `key`.
fn first_query_value(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
