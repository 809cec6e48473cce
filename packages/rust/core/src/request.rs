//! Request-level collaborators: request metadata, one-time initialization,
//! and decoding page properties sent by remote callers.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use pagebuilder_shared::{PageBuilderError, Result};

/// Form field carrying URL-encoded JSON page properties.
pub const TEMPLATE_PROPERTIES_FIELD: &str = "templateProperties";

/// What is known about the request a page is built for.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// Script or file that handled the request.
    pub script_filename: Option<PathBuf>,
    /// Raw request URI, e.g. `/admissions/visit.php?day=1`.
    pub request_uri: Option<String>,
}

impl RequestInfo {
    /// The requested file: the script filename, falling back to the path
    /// component of the request URI.
    pub fn requested_file(&self) -> Option<PathBuf> {
        if let Some(script) = self.script_filename.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            return Some(script.clone());
        }
        let uri = self.request_uri.as_deref()?;
        let base = Url::parse("http://localhost/").ok()?;
        let parsed = base.join(uri).ok()?;
        Some(PathBuf::from(parsed.path()))
    }

    /// Directory navigation discovery starts from.
    pub fn start_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self
            .script_filename
            .as_deref()
            .and_then(Path::parent)
            .filter(|d| !d.as_os_str().is_empty())
        {
            return Ok(dir.to_path_buf());
        }
        std::env::current_dir().map_err(|e| PageBuilderError::io(".", e))
    }
}

/// Result of request initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Continue building the page.
    Continue,
    /// Answer the request with this body instead of the page.
    Respond(String),
}

/// One-time per-request setup (sign-in, impersonation, CMS routing).
pub trait RequestInitializer: Send + Sync {
    fn initialize(&self, request: &RequestInfo) -> Result<InitOutcome>;
}

/// Initializer that does nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopInitializer;

impl RequestInitializer for NoopInitializer {
    fn initialize(&self, _request: &RequestInfo) -> Result<InitOutcome> {
        Ok(InitOutcome::Continue)
    }
}

/// Decode page properties from form-encoded request data.
///
/// `body` (POST) is consulted before `query` (GET). The
/// `templateProperties` field holds percent-encoded JSON on top of the form
/// encoding, so its value is percent-decoded once more after the form is
/// parsed. If neither source has the field the result is an empty map.
pub fn decode_template_properties(
    body: Option<&str>,
    query: Option<&str>,
) -> Result<Map<String, Value>> {
    let field = [body, query]
        .into_iter()
        .flatten()
        .find_map(|data| form_field(data, TEMPLATE_PROPERTIES_FIELD));

    let Some(field) = field else {
        debug!("no {TEMPLATE_PROPERTIES_FIELD} field in request");
        return Ok(Map::new());
    };
    let raw = percent_decode_str(&field).decode_utf8().map_err(|e| {
        PageBuilderError::Decode(format!("{TEMPLATE_PROPERTIES_FIELD} is not valid UTF-8: {e}"))
    })?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(PageBuilderError::Decode(format!(
            "{TEMPLATE_PROPERTIES_FIELD} must be a JSON object, got {other}"
        ))),
        Err(e) => Err(PageBuilderError::Decode(format!(
            "{TEMPLATE_PROPERTIES_FIELD} is not valid JSON: {e}"
        ))),
    }
}

fn form_field(data: &str, name: &str) -> Option<String> {
    let data = data.strip_prefix('?').unwrap_or(data);
    url::form_urlencoded::parse(data.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
