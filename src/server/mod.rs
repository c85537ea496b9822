//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::MockRouter;
use crate::commands;
use crate::helpers::decode_path;
use crate::router::RouterHooks;
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// How the server should run
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub ip: String,
    pub port: u16,
    /// Rebuild and live reload on change
    pub watch: bool,
    pub open: bool,
    /// Build the story catalog and record its navigation
    pub catalog: bool,
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    /// Present when the catalog is served
    router: Option<Arc<MockRouter>>,
}

#[derive(Debug, Deserialize)]
struct NavigateQuery {
    path: String,
}

/// Start the development server. The site must already be generated.
pub async fn start(site: &Site, options: ServerOptions) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let router = if options.catalog {
        let router = Arc::new(MockRouter::new());
        commands::catalog::build(site, router.clone())?;
        Some(router)
    } else {
        None
    };

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: options.watch,
        router: router.clone(),
    });

    let app = app(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if options.ip == "localhost" {
        "127.0.0.1"
    } else {
        options.ip.as_str()
    };
    let addr: SocketAddr = format!("{}:{}", bind_ip, options.port).parse()?;

    let url = format!("http://{}:{}", options.ip, options.port);
    println!("Server running at {}", url);
    if options.catalog {
        println!("Story catalog at {}/catalog/", url);
    }
    if options.watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if options.open {
        let target = if options.catalog {
            format!("{}/catalog/", url)
        } else {
            url.clone()
        };
        if let Err(e) = open_browser(&target) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if options.watch {
        let site = site.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(site, router, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/__navigate", get(navigate_handler))
        .route("/__actions", get(actions_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Paths whose changes trigger a rebuild
fn watched_paths(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    [
        (site.source_dir.clone(), RecursiveMode::Recursive),
        (site.stories_dir.clone(), RecursiveMode::Recursive),
        (site.base_dir.join("_config.yml"), RecursiveMode::NonRecursive),
    ]
    .into_iter()
    .filter(|(path, _)| path.exists())
    .collect()
}

fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
}

/// Watch for file changes and trigger reload
async fn watch_and_reload(
    site: Site,
    router: Option<Arc<MockRouter>>,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            let _ = tx.send(result);
        },
    )?;

    for (path, mode) in watched_paths(&site) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    while let Some(result) = rx.recv().await {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let relevant_events: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
        if relevant_events.is_empty() {
            continue;
        }

        println!();
        for event in &relevant_events {
            println!("📝 File changed: {}", event.path.display());
        }

        println!("\n🔄 Regenerating...");
        let (site, router) = (site.clone(), router.clone());
        match tokio::task::spawn_blocking(move || rebuild(&site, router.as_ref())).await {
            Ok(Ok(())) => {
                println!("✅ Regenerated successfully!");
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                println!("❌ Generation failed: {}", e);
            }
            Err(e) => {
                tracing::error!("Rebuild task failed: {}", e);
            }
        }
    }

    Ok(())
}

/// Regenerate with a freshly read configuration
fn rebuild(site: &Site, router: Option<&Arc<MockRouter>>) -> Result<()> {
    let site = Site::new(&site.base_dir)?;
    commands::generate::run(&site)?;
    if let Some(router) = router {
        commands::catalog::build(&site, router.clone())?;
    }
    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Records a link click from a catalog page
async fn navigate_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<NavigateQuery>,
) -> StatusCode {
    match &state.router {
        Some(router) => {
            router.navigate(&query.path);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Navigation recorded so far
async fn actions_handler(State(state): State<Arc<ServerState>>) -> Response {
    match &state.router {
        Some(router) => Json(router.actions()).into_response(),
        None => (StatusCode::NOT_FOUND, "Catalog not enabled").into_response(),
    }
}

/// Resolve a request path to a file under `public_dir`. Paths that would
/// leave `public_dir` resolve to nothing.
fn resolve_file(public_dir: &Path, path: &str) -> Option<PathBuf> {
    if path == "/" {
        return Some(public_dir.join("index.html"));
    }

    let decoded = decode_path(path);
    let clean_path = decoded.trim_start_matches('/');
    let contained = Path::new(clean_path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !contained {
        return None;
    }

    let candidate = public_dir.join(clean_path);

    let file = if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        // Try adding .html extension
        let with_html = public_dir.join(format!("{}.html", clean_path));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    };
    Some(file)
}

/// Fallback handler that serves files and injects live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(file_path) = resolve_file(&state.public_dir, request.uri().path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
