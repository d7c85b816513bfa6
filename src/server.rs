use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::engine::SuggestionEngine;
use crate::protocol::{ErrorCode, ErrorResponse, Request, RequestBody, Response, ResponseBody};

/// Accepts UI connections on a unix socket and answers line-delimited JSON
/// requests. Connections are served concurrently, but every request takes the
/// engine mutex for its whole duration, so store access is fully serialized.
pub struct SuggestionServer {
    config: ServerConfig,
    engine: Arc<Mutex<SuggestionEngine>>,
}

impl SuggestionServer {
    pub fn new(config: ServerConfig, engine: SuggestionEngine) -> Self {
        Self {
            config,
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.prepare_socket_path().await?;
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)
                .await
                .with_context(|| {
                    format!(
                        "failed to cleanup stale socket {}",
                        self.config.socket_path.display()
                    )
                })?;
        }

        let listener = UnixListener::bind(&self.config.socket_path).with_context(|| {
            format!(
                "failed to bind unix socket at {}",
                self.config.socket_path.display()
            )
        })?;
        info!(
            "suggestd listening on {}",
            self.config.socket_path.display()
        );

        loop {
            let (stream, _) = listener.accept().await?;
            let engine = self.engine.clone();
            tokio::spawn(async move {
                if let Err(error) = handle_connection(stream, engine).await {
                    warn!("connection closed with error: {error:#}");
                }
            });
        }
    }

    async fn prepare_socket_path(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.config.socket_path).parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create socket directory {}", parent.display())
            })?;
        }
        Ok(())
    }
}

async fn handle_connection(
    stream: UnixStream,
    engine: Arc<Mutex<SuggestionEngine>>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = process_line(line, engine.clone()).await;
        let payload = serde_json::to_string(&response)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

async fn process_line(line: String, engine: Arc<Mutex<SuggestionEngine>>) -> Response {
    match serde_json::from_str::<Request>(&line) {
        Ok(request) => handle_request(request, engine).await,
        Err(error) => {
            error!("invalid request JSON: {error}");
            Response {
                id: String::new(),
                body: ResponseBody::Error(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("invalid JSON payload: {error}"),
                }),
            }
        }
    }
}

async fn handle_request(request: Request, engine: Arc<Mutex<SuggestionEngine>>) -> Response {
    let id = request.id;
    let operation = request.body.operation();
    let started = Instant::now();

    let body = match request.body {
        RequestBody::Ping => ResponseBody::Pong,
        RequestBody::GetSuggestions { word, languages } => {
            let engine = engine.lock().await;
            ResponseBody::Suggestions {
                words: engine.get_suggestions(&word, &languages),
            }
        }
        RequestBody::GetAllWords { languages } => {
            let engine = engine.lock().await;
            ResponseBody::Suggestions {
                words: engine.get_all_words(&languages),
            }
        }
        RequestBody::GetCustomWordsOnly { word } => {
            let engine = engine.lock().await;
            ResponseBody::Suggestions {
                words: engine.get_custom_words_only(&word),
            }
        }
        RequestBody::HistoryIncrement { word } => {
            ack(engine.lock().await.history_increment(&word))
        }
        RequestBody::HistoryRemove { word } => ack(engine.lock().await.history_remove(&word)),
        RequestBody::AddToIgnoreList { word } => {
            ack(engine.lock().await.add_to_ignore_list(&word))
        }
        RequestBody::ReloadConfigs => ack(engine.lock().await.reload_configs()),
        RequestBody::ProcessSuggestion { text } => {
            let engine = engine.lock().await;
            ResponseBody::Processed {
                text: engine.process_suggestion(&text),
            }
        }
    };

    info!(
        operation,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    Response { id, body }
}

fn ack(result: Result<()>) -> ResponseBody {
    match result {
        Ok(()) => ResponseBody::Ok,
        Err(error) => {
            warn!("mutation failed: {error:#}");
            ResponseBody::Error(ErrorResponse {
                code: ErrorCode::Internal,
                message: format!("{error:#}"),
            })
        }
    }
}
