//! CLI for notecurl.

use anyhow::Result;
use clap::Parser;
use notecurl_core::config::{self, NotecurlConfig};
use notecurl_core::debug_dump::DebugDumper;
use notecurl_core::env;
use notecurl_core::error::UsageError;
use notecurl_core::feed;
use notecurl_core::note_ref::{NoteRef, DEFAULT_XSEC_SOURCE};
use notecurl_core::paths::DataDirs;
use notecurl_core::signer::{signer_from_config, CommandSigner, RequestSigner};

/// Print the note-feed API request for one note as a curl command.
#[derive(Debug, Parser)]
#[command(name = "notecurl")]
#[command(about = "Generate curl for the note detail (feed) API", long_about = None)]
pub struct Cli {
    /// Full note URL with xsec_token.
    #[arg(long, value_name = "URL", conflicts_with_all = ["note_id", "xsec_token"])]
    pub note_url: Option<String>,

    /// Note ID (if not using --note-url).
    #[arg(long, value_name = "ID")]
    pub note_id: Option<String>,

    /// xsec_token (if not using --note-url).
    #[arg(long, value_name = "TOKEN")]
    pub xsec_token: Option<String>,

    /// xsec_source sent with --note-id.
    #[arg(long, value_name = "SOURCE", default_value = DEFAULT_XSEC_SOURCE)]
    pub xsec_source: String,

    /// Cookie string (defaults to .env COOKIES).
    #[arg(long)]
    pub cookies: Option<String>,

    /// Save the payload and signed request as JSON under the debug directory.
    #[arg(long)]
    pub debug: bool,

    /// Signer program; overrides [signer] in config.toml.
    #[arg(long, value_name = "PROGRAM")]
    pub signer: Option<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(&self) -> Result<()> {
        let note = self.note_ref()?;
        let cookies =
            env::resolve_cookies(self.cookies.as_deref()).ok_or(UsageError::MissingCookies)?;

        let cfg = load_config();
        let dumper = self.debug_dumper(&cfg);
        let signer = self.request_signer(&cfg);
        let cmd = feed::prepare_feed_curl(&note, &cookies, signer.as_ref(), &dumper)?;
        println!("{cmd}");
        Ok(())
    }

    /// URL mode wins; otherwise both id and token are required.
    pub fn note_ref(&self) -> Result<NoteRef, UsageError> {
        if let Some(url) = non_empty(&self.note_url) {
            return Ok(NoteRef::from_url(url));
        }
        match (non_empty(&self.note_id), non_empty(&self.xsec_token)) {
            (Some(id), Some(token)) => Ok(NoteRef::new(id, token, &self.xsec_source)),
            _ => Err(UsageError::MissingNote),
        }
    }

    /// Debug records are best effort: an unresolvable directory disables them.
    fn debug_dumper(&self, cfg: &NotecurlConfig) -> DebugDumper {
        if !(self.debug || cfg.debug) {
            return DebugDumper::disabled();
        }
        match DataDirs::from_xdg() {
            Ok(dirs) => {
                let dumper = DebugDumper::new(true, dirs.with_config(cfg).debug);
                tracing::debug!("debug records go to {}", dumper.dir().display());
                dumper
            }
            Err(e) => match &cfg.debug_dir {
                Some(dir) => DebugDumper::new(true, dir),
                None => {
                    tracing::warn!("debug records disabled: {:#}", e);
                    DebugDumper::disabled()
                }
            },
        }
    }

    fn request_signer(&self, cfg: &NotecurlConfig) -> Box<dyn RequestSigner> {
        match (&self.signer, &cfg.signer) {
            (Some(program), _) => Box::new(CommandSigner::new(program, Vec::new())),
            (None, Some(configured)) => signer_from_config(Some(configured)),
            (None, None) => {
                eprintln!(
                    "warning: no signer configured (--signer or [signer] in config.toml); \
                     the request carries no signature headers"
                );
                signer_from_config(None)
            }
        }
    }
}

/// The config file only adds optional behavior, so a broken one never blocks a run.
fn load_config() -> NotecurlConfig {
    match config::load_or_init() {
        Ok(cfg) => {
            tracing::debug!("loaded config: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::warn!("using default config: {:#}", e);
            NotecurlConfig::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests;
