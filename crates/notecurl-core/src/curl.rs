//! Rendering a prepared request as a paste-ready POSIX shell `curl` command.

use anyhow::{Context, Result};
use std::borrow::Cow;

use crate::env::Cookies;

/// Quotes `s` for a POSIX shell; safe words pass through unchanged.
///
/// Fails only for strings containing NUL, which no shell word can carry.
pub fn shell_quote(s: &str) -> Result<Cow<'_, str>> {
    shlex::try_quote(s).with_context(|| format!("cannot quote {:?} for the shell", s))
}

/// Builds the multi-line command: URL, one `-H` per header in order, the
/// cookie header last, then the body as `--data-raw`.
pub fn to_curl(
    url: &str,
    headers: &[(String, String)],
    data: &str,
    cookies: &Cookies,
) -> Result<String> {
    let mut lines = Vec::with_capacity(headers.len() + 3);
    lines.push(format!("curl {} \\", shell_quote(url)?));
    for (name, value) in headers {
        lines.push(format!("  -H {} \\", shell_quote(&format!("{name}: {value}"))?));
    }
    lines.push(format!(
        "  -H {} \\",
        shell_quote(&format!("cookie: {}", cookies.as_str()))?
    ));
    lines.push(format!("  --data-raw {}", shell_quote(data)?));
    Ok(lines.join("\n"))
}
