use std::convert::Infallible;

use async_stream::stream;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    Json,
};
use cast_store::AssetStore;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    llm::LanguageModel, scrape::ContentScraper, speech::SpeechBackend, web::AppState,
    PipelineRequest, ProgressUpdate, Stage, StatusKind,
};

pub const AUDIO_ROUTE_PREFIX: &str = "/audio/";

const INDEX_HTML: &str = include_str!("./index.html");

#[derive(Debug, Deserialize)]
pub struct PodcastQuery {
    #[serde(default)]
    pub url: String,
}

/// Browser-facing view of a [`ProgressUpdate`]; the audio asset is exposed
/// by url rather than by its path on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub stage: Stage,
    pub summary: Option<String>,
    pub audio_url: Option<String>,
    pub status_message: String,
    pub status_kind: StatusKind,
}

impl From<ProgressUpdate> for UpdatePayload {
    fn from(update: ProgressUpdate) -> Self {
        let audio_url = update
            .audio_asset
            .as_ref()
            .and_then(|audio| audio.file_name())
            .map(|name| format!("{AUDIO_ROUTE_PREFIX}{name}"));

        Self {
            stage: update.stage,
            summary: update.summary_text_so_far,
            audio_url,
            status_message: update.status_message,
            status_kind: update.status_kind,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}

/// Streams one `update` event per progress update, then an `end` event.
/// A client that disconnects drops the stream and the run with it.
pub async fn podcast_handler<S, L, B, A>(
    State(state): State<AppState<S, L, B, A>>,
    Query(query): Query<PodcastQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    tracing::info!(url = %query.url, "Podcast requested");
    let controller = state.controller;
    let request = PipelineRequest::new(query.url);

    let events = stream! {
        let updates = controller.handle(request);
        futures::pin_mut!(updates);

        while let Some(update) = updates.next().await {
            let payload = UpdatePayload::from(update);
            let event = Event::default()
                .event("update")
                .json_data(&payload)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to encode progress update");
                    Event::default().event("update").data(payload.status_message.clone())
                });
            yield Ok::<_, Infallible>(event);
        }

        yield Ok(Event::default().event("end").data("done"));
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

pub async fn audio_handler<S, L, B, A>(
    State(state): State<AppState<S, L, B, A>>,
    Path(name): Path<String>,
) -> Response
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    match state.controller.assets().open(&name).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, %name, "Audio asset not served");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
