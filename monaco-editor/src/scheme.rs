use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use url::Url;

use crate::assets::AssetSource;

pub const SCHEME: &str = "monacoeditor";
pub const EDITOR_URI: &str = "monacoeditor://editor";

/// Assets are looked up under this directory, mirroring the request path.
const ASSET_ROOT: &str = "Editor";
const INDEX_FILE: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decompress {path}: {source}")]
    Decompress {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Synthetic HTTP response for a scheme request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SchemeResponse {
    fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}

/// Content type by file extension.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "html" => "text/html",
        "js" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Map a request URL onto an asset path, e.g. `monacoeditor://editor/vs/loader.js`
/// to `Editor/vs/loader.js`. An empty or extension-less last segment names a
/// directory whose `index.html` is served. Returns `None` for paths that try
/// to climb out of the asset root.
pub fn resolve_asset_path(url: &Url) -> Option<String> {
    let mut segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == ".." || *s == ".") {
        return None;
    }

    let file = match segments.last() {
        Some(last) if Path::new(last).extension().is_some() => {
            let last = *last;
            segments.pop();
            last
        }
        _ => INDEX_FILE,
    };

    let mut parts = vec![ASSET_ROOT];
    parts.extend(segments);
    parts.push(file);
    Some(parts.join("/"))
}

/// Serves `monacoeditor://` requests from gzip-compressed assets.
pub struct SchemeHandler<A: AssetSource> {
    assets: A,
}

impl<A: AssetSource> SchemeHandler<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    /// Answer one request. A missing asset is a 404 response; a broken one
    /// is an error the caller fails the request with.
    pub fn handle(&self, uri: &str) -> Result<SchemeResponse, SchemeError> {
        let url = Url::parse(uri).map_err(|e| SchemeError::BadRequest(format!("{}: {}", uri, e)))?;
        if url.scheme() != SCHEME {
            return Err(SchemeError::BadRequest(format!(
                "unexpected scheme {:?}",
                url.scheme()
            )));
        }

        let Some(path) = resolve_asset_path(&url) else {
            log::warn!("Rejected asset path in {}", uri);
            return Ok(SchemeResponse::not_found());
        };
        if !self.assets.contains(&path) {
            log::debug!("No asset for {} ({})", uri, path);
            return Ok(SchemeResponse::not_found());
        }

        let compressed = self.assets.read(&path).map_err(|source| SchemeError::Io {
            path: path.clone(),
            source,
        })?;
        let body = gunzip(&compressed).map_err(|source| SchemeError::Decompress {
            path: path.clone(),
            source,
        })?;

        let extension = Path::new(&path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Ok(SchemeResponse {
            status: 200,
            headers: vec![
                ("Content-Length".to_string(), body.len().to_string()),
                (
                    "Content-Type".to_string(),
                    content_type_for(extension).to_string(),
                ),
            ],
            body,
        })
    }

    /// The host cancelled a request. Responses are produced synchronously,
    /// so there is never anything in flight to stop.
    pub fn stop(&self, uri: &str) {
        log::debug!("Scheme request stopped: {}", uri);
    }
}

fn gunzip(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(compressed).read_to_end(&mut out)?;
    Ok(out)
}
