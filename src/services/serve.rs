use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

/// URL prefix under which the embedded editor's own source tree is exposed.
pub const EDITOR_PREFIX: &str = "/monaco-editor/";

/// Assets that live in the sibling documentation directory, not the served
/// project directory.
pub const DOC_ASSETS: [&str; 2] = ["/logo.png", "/favicon.ico"];

/// The wasm loader script produced by the build; requesting it triggers a
/// rebuild first.
pub const LOADER_PATH: &str = "pkg/studio_web.js";

pub const PORT: u16 = 8080;

pub struct ServeConfig {
    /// Directory the server is started from; the default root for requests.
    pub root: PathBuf,
    /// Sibling documentation directory holding the logo and favicon.
    pub docs_dir: PathBuf,
    /// Checkout of the monaco-editor sources, supplied via the environment.
    pub editor_src: PathBuf,
    pub loader_path: String,
    pub build_command: Vec<String>,
}

impl ServeConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let editor_src = match std::env::var("MONACO_EDITOR_SRC") {
            Ok(v) => PathBuf::from(v),
            Err(_) => {
                anyhow::bail!("MONACO_EDITOR_SRC must point at the monaco-editor source tree")
            }
        };
        let root = std::env::current_dir()?;
        let docs_dir = root.join("../doc");
        Ok(Self {
            root,
            docs_dir,
            editor_src,
            loader_path: LOADER_PATH.to_string(),
            build_command: ["wasm-pack", "build", "--dev", "--target", "web"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }
}

/// Which directory a request resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    Editor,
    Docs,
    Local,
}

/// Map a request path to a root directory and the path relative to it.
///
/// Exactly one case applies; the editor prefix must be checked before the
/// default case.
pub fn map_path(path: &str) -> (Root, String) {
    if let Some(rest) = path.strip_prefix(EDITOR_PREFIX) {
        return (Root::Editor, rest.to_string());
    }
    if DOC_ASSETS.contains(&path) {
        return (Root::Docs, path.trim_start_matches('/').to_string());
    }
    (Root::Local, path.trim_start_matches('/').to_string())
}

pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Resolve one GET request against the configured roots.
pub fn respond(cfg: &ServeConfig, request_path: &str) -> Reply {
    let path = request_path.split('?').next().unwrap_or(request_path);
    let (root, rel) = map_path(path);

    if rel.split('/').any(|part| part == "..") {
        return not_found();
    }

    if root == Root::Local && rel == cfg.loader_path {
        rebuild(cfg);
    }

    let base = match root {
        Root::Editor => &cfg.editor_src,
        Root::Docs => &cfg.docs_dir,
        Root::Local => &cfg.root,
    };
    let target = if rel.is_empty() {
        base.clone()
    } else {
        base.join(&rel)
    };

    if target.is_dir() {
        let index = target.join("index.html");
        if index.is_file() {
            return file_reply(&index);
        }
        return listing_reply(&target, path);
    }
    file_reply(&target)
}

/// Run the build command in the served root and wait for it. The exit status
/// is not checked; the loader is served either way.
fn rebuild(cfg: &ServeConfig) {
    let Some((program, args)) = cfg.build_command.split_first() else {
        return;
    };
    if let Err(e) = Command::new(program)
        .args(args)
        .current_dir(&cfg.root)
        .status()
    {
        eprintln!("rebuild did not start: {}", e);
    }
}

fn file_reply(path: &Path) -> Reply {
    match std::fs::read(path) {
        Ok(body) => Reply {
            status: StatusCode::OK,
            content_type: content_type_for(path),
            body,
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> Reply {
    Reply {
        status: StatusCode::NOT_FOUND,
        content_type: "text/plain",
        body: b"File not found".to_vec(),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") | Some("mjs") => "application/javascript",
        Some("css") => "text/css",
        Some("wasm") => "application/wasm",
        Some("json") | Some("map") => "application/json",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        Some("ttf") => "font/ttf",
        _ => "application/octet-stream",
    }
}

fn listing_reply(dir: &Path, request_path: &str) -> Reply {
    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(_) => return not_found(),
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| {
            let mut name = e.file_name().to_string_lossy().into_owned();
            if e.path().is_dir() {
                name.push('/');
            }
            name
        })
        .collect();
    names.sort();

    let base = if request_path.ends_with('/') {
        request_path.to_string()
    } else {
        format!("{}/", request_path)
    };
    let mut html = format!(
        "<!DOCTYPE html>\n<html><head><title>Index of {0}</title></head><body>\n<h1>Index of {0}</h1>\n<ul>\n",
        request_path
    );
    for name in &names {
        html.push_str(&format!("<li><a href=\"{0}{1}\">{1}</a></li>\n", base, name));
    }
    html.push_str("</ul>\n</body></html>\n");

    Reply {
        status: StatusCode::OK,
        content_type: "text/html; charset=utf-8",
        body: html.into_bytes(),
    }
}

async fn handle(State(cfg): State<Arc<ServeConfig>>, uri: Uri) -> Response {
    let reply = respond(&cfg, uri.path());
    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}

/// Bind the loopback port and serve until killed. Runs on a current-thread
/// runtime, so the blocking rebuild hook stalls every other request for its
/// duration.
pub async fn run(cfg: ServeConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", PORT)).await?;
    println!("Go to http://127.0.0.1:{}", PORT);

    let app = Router::new().fallback(handle).with_state(Arc::new(cfg));
    axum::serve(listener, app).await?;
    Ok(())
}
