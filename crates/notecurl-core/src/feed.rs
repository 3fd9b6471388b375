//! Note-feed endpoint: turns a note reference into a signed curl command.

use anyhow::{Context, Result};

use crate::curl::to_curl;
use crate::debug_dump::DebugDumper;
use crate::env::Cookies;
use crate::note_ref::NoteRef;
use crate::payload::FeedPayload;
use crate::signer::RequestSigner;

pub const API_HOST: &str = "edith.xiaohongshu.com";
pub const API_PATH: &str = "/api/sns/web/v1/feed";
pub const API_URL: &str = "https://edith.xiaohongshu.com/api/sns/web/v1/feed";
pub const METHOD: &str = "POST";

/// Builds the payload for `note`, signs it, and renders the curl command.
///
/// Records `feed_payload` and `feed_request` through `dumper` when enabled.
/// Signer errors propagate unchanged apart from added context.
pub fn prepare_feed_curl(
    note: &NoteRef,
    cookies: &Cookies,
    signer: &dyn RequestSigner,
    dumper: &DebugDumper,
) -> Result<String> {
    let payload = FeedPayload::for_note(note);
    tracing::debug!(
        "feed request for note_id={} xsec_source={}",
        payload.source_note_id,
        payload.xsec_source
    );
    dumper.dump("feed_payload", &payload);

    let signed = signer
        .sign(cookies, API_PATH, &payload, METHOD)
        .context("sign feed request")?;
    dumper.dump("feed_request", &signed);

    let data = signed.data_string()?;
    to_curl(API_URL, &signed.headers, &data, cookies).context("render curl command")
}
