//! Request signing seam.
//!
//! The platform authenticates web requests with proprietary signature headers
//! derived from the session cookies, the API path and the body. That algorithm
//! lives outside this crate: [`CommandSigner`] delegates to an external program,
//! and [`BrowserSigner`] only supplies the static headers the web client sends.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::config::SignerConfig;
use crate::env::Cookies;
use crate::payload::FeedPayload;

/// Headers (in send order) and body produced by a signer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedRequest {
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// Already serialized; sent byte for byte.
    Raw(String),
    Json(Value),
}

impl SignedRequest {
    /// Body as sent on the wire: raw bodies verbatim, JSON compact.
    pub fn data_string(&self) -> Result<String> {
        match &self.body {
            RequestBody::Raw(s) => Ok(s.clone()),
            RequestBody::Json(v) => serde_json::to_string(v).context("serialize request body"),
        }
    }
}

/// Computes authentication headers and the request body for an API call.
pub trait RequestSigner {
    fn sign(
        &self,
        cookies: &Cookies,
        api_path: &str,
        payload: &FeedPayload,
        method: &str,
    ) -> Result<SignedRequest>;
}

/// Picks the configured external signer, or the unsigned browser headers.
pub fn signer_from_config(cfg: Option<&SignerConfig>) -> Box<dyn RequestSigner> {
    match cfg {
        Some(cfg) => Box::new(CommandSigner::new(&cfg.program, cfg.args.clone())),
        None => Box::new(BrowserSigner),
    }
}

/// Runs an external program that implements the signature scheme.
///
/// Protocol: one JSON object on stdin,
/// `{"cookies": .., "api_path": .., "method": .., "payload": {..}}`,
/// and one JSON object on stdout, `{"headers": {name: value, ..}, "data": ..}`.
/// `data` may be a pre-serialized string or any JSON value; when absent the
/// payload itself is sent.
#[derive(Debug, Clone)]
pub struct CommandSigner {
    program: String,
    args: Vec<String>,
}

#[derive(Serialize)]
struct SignInput<'a> {
    cookies: &'a str,
    api_path: &'a str,
    method: &'a str,
    payload: &'a FeedPayload,
}

#[derive(Deserialize)]
struct SignOutput {
    headers: Map<String, Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl CommandSigner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn run(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn signer {}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A signer may exit before reading everything; its status decides.
            if let Err(e) = stdin.write_all(input) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e).context("write signer input");
                }
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("wait for signer {}", self.program))?;
        if !output.status.success() {
            bail!(
                "signer {} failed ({}): {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output.stdout)
    }
}

impl RequestSigner for CommandSigner {
    fn sign(
        &self,
        cookies: &Cookies,
        api_path: &str,
        payload: &FeedPayload,
        method: &str,
    ) -> Result<SignedRequest> {
        let input = serde_json::to_vec(&SignInput {
            cookies: cookies.as_str(),
            api_path,
            method,
            payload,
        })
        .context("serialize signer input")?;

        let stdout = self.run(&input)?;
        let out: SignOutput = serde_json::from_slice(&stdout)
            .with_context(|| format!("parse output of signer {}", self.program))?;

        let headers: Vec<(String, String)> = out
            .headers
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(s) => (name, s),
                other => (name, other.to_string()),
            })
            .collect();
        let body = match out.data {
            Some(Value::String(s)) => RequestBody::Raw(s),
            Some(v) => RequestBody::Json(v),
            None => RequestBody::Json(serde_json::to_value(payload)?),
        };
        tracing::debug!("signer {} returned {} headers", self.program, headers.len());

        Ok(SignedRequest { headers, body })
    }
}

/// Static headers of the platform's web client; no signature headers.
const BROWSER_HEADERS: [(&str, &str); 6] = [
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "zh-CN,zh;q=0.9"),
    ("content-type", "application/json;charset=UTF-8"),
    ("origin", "https://www.xiaohongshu.com"),
    ("referer", "https://www.xiaohongshu.com/"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    ),
];

/// Fallback when no signer program is configured. The server will likely
/// reject the request, but the command is still useful as a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSigner;

impl RequestSigner for BrowserSigner {
    fn sign(
        &self,
        _cookies: &Cookies,
        api_path: &str,
        payload: &FeedPayload,
        method: &str,
    ) -> Result<SignedRequest> {
        tracing::warn!(
            "no signer configured; {} {} will lack signature headers",
            method,
            api_path
        );
        let headers = BROWSER_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(SignedRequest {
            headers,
            body: RequestBody::Json(serde_json::to_value(payload)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::build_payload;

    fn cookies() -> Cookies {
        Cookies::new("a1=x; web_session=y").unwrap()
    }

    #[test]
    fn raw_body_is_sent_verbatim() {
        let req = SignedRequest {
            headers: vec![],
            body: RequestBody::Raw("{\"a\": 1}".into()),
        };
        assert_eq!(req.data_string().unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn json_body_is_compact_and_keeps_non_ascii() {
        let req = SignedRequest {
            headers: vec![],
            body: RequestBody::Json(serde_json::json!({"k": "笔记", "n": [1, 2]})),
        };
        assert_eq!(req.data_string().unwrap(), r#"{"k":"笔记","n":[1,2]}"#);
    }

    #[test]
    fn browser_signer_sends_payload_as_json() {
        let payload = build_payload("abc", "tok", "pc_search");
        let req = BrowserSigner
            .sign(&cookies(), "/api/sns/web/v1/feed", &payload, "POST")
            .unwrap();
        assert_eq!(req.headers.len(), BROWSER_HEADERS.len());
        assert_eq!(req.headers[2].0, "content-type");
        assert_eq!(
            req.data_string().unwrap(),
            serde_json::to_string(&payload).unwrap()
        );
    }

    #[test]
    fn missing_program_is_an_error() {
        let signer = CommandSigner::new("/nonexistent/notecurl-signer", vec![]);
        let payload = build_payload("abc", "tok", "pc_search");
        assert!(signer.sign(&cookies(), "/p", &payload, "POST").is_err());
    }

    #[cfg(unix)]
    mod command {
        use super::*;

        fn sh(script: &str) -> CommandSigner {
            CommandSigner::new("sh", vec!["-c".to_string(), script.to_string()])
        }

        #[test]
        fn preserves_header_order_and_stringifies_values() {
            let signer = sh(
                r#"cat >/dev/null; printf '%s' '{"headers":{"x-s":"sig","x-t":1700000000000,"accept":"*/*"},"data":{"b":1}}'"#,
            );
            let payload = build_payload("abc", "tok", "pc_search");
            let req = signer.sign(&cookies(), "/p", &payload, "POST").unwrap();
            let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(names, ["x-s", "x-t", "accept"]);
            assert_eq!(req.headers[1].1, "1700000000000");
            assert_eq!(req.data_string().unwrap(), r#"{"b":1}"#);
        }

        #[test]
        fn string_data_is_raw_and_missing_data_uses_payload() {
            let payload = build_payload("abc", "tok", "pc_search");

            let raw = sh(r#"cat >/dev/null; printf '%s' '{"headers":{},"data":"{\"x\": 1}"}'"#);
            let req = raw.sign(&cookies(), "/p", &payload, "POST").unwrap();
            assert_eq!(req.body, RequestBody::Raw(r#"{"x": 1}"#.to_string()));

            let bare = sh(r#"cat >/dev/null; printf '%s' '{"headers":{}}'"#);
            let req = bare.sign(&cookies(), "/p", &payload, "POST").unwrap();
            assert_eq!(
                req.data_string().unwrap(),
                serde_json::to_string(&payload).unwrap()
            );
        }

        #[test]
        fn receives_cookies_path_method_and_payload() {
            // Echo the input back inside "data" so we can inspect it.
            let signer = sh(r#"printf '{"headers":{},"data":'; cat; printf '}'"#);
            let payload = build_payload("abc", "tok", "pc_feed");
            let req = signer
                .sign(&cookies(), "/api/sns/web/v1/feed", &payload, "POST")
                .unwrap();
            let input = match req.body {
                RequestBody::Json(v) => v,
                other => panic!("expected JSON echo, got {:?}", other),
            };
            assert_eq!(input["cookies"], "a1=x; web_session=y");
            assert_eq!(input["api_path"], "/api/sns/web/v1/feed");
            assert_eq!(input["method"], "POST");
            assert_eq!(input["payload"]["xsec_source"], "pc_feed");
        }

        #[test]
        fn non_zero_exit_reports_stderr() {
            let signer = sh("echo 'bad cookie' >&2; exit 3");
            let payload = build_payload("abc", "tok", "pc_search");
            let err = signer.sign(&cookies(), "/p", &payload, "POST").unwrap_err();
            assert!(format!("{:#}", err).contains("bad cookie"));
        }

        #[test]
        fn output_without_headers_is_rejected() {
            let signer = sh(r#"cat >/dev/null; printf '%s' '{"data":"x"}'"#);
            let payload = build_payload("abc", "tok", "pc_search");
            assert!(signer.sign(&cookies(), "/p", &payload, "POST").is_err());
        }
    }
}
