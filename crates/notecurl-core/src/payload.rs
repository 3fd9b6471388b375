//! Request body for the note-feed endpoint.

use serde::Serialize;

use crate::note_ref::{source_or_default, NoteRef};

/// Image formats the web client advertises, in the order it sends them.
pub const IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

/// JSON body of a feed request. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPayload {
    pub source_note_id: String,
    pub image_formats: [&'static str; 3],
    pub extra: FeedExtra,
    pub xsec_source: String,
    pub xsec_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedExtra {
    pub need_body_topic: &'static str,
}

impl Default for FeedExtra {
    fn default() -> Self {
        Self {
            need_body_topic: "1",
        }
    }
}

impl FeedPayload {
    pub fn for_note(note: &NoteRef) -> Self {
        build_payload(&note.note_id, &note.xsec_token, &note.xsec_source)
    }
}

pub fn build_payload(note_id: &str, xsec_token: &str, xsec_source: &str) -> FeedPayload {
    FeedPayload {
        source_note_id: note_id.to_string(),
        image_formats: IMAGE_FORMATS,
        extra: FeedExtra::default(),
        xsec_source: source_or_default(xsec_source),
        xsec_token: xsec_token.to_string(),
    }
}
