//! # Web presentation layer
//!
//! A single page with three panels (input, summary, audio) fed by a
//! Server-Sent Events stream of [`crate::ProgressUpdate`]s.

mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use cast_store::AssetStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub use handlers::{UpdatePayload, AUDIO_ROUTE_PREFIX};

use crate::{
    llm::LanguageModel, scrape::ContentScraper, speech::SpeechBackend, InteractionController,
};

pub struct AppState<S, L, B, A>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    pub controller: Arc<InteractionController<S, L, B, A>>,
}

impl<S, L, B, A> AppState<S, L, B, A>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    pub fn new(controller: InteractionController<S, L, B, A>) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

impl<S, L, B, A> Clone for AppState<S, L, B, A>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

pub fn create_router<S, L, B, A>(state: AppState<S, L, B, A>) -> Router
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/podcast", get(handlers::podcast_handler::<S, L, B, A>))
        .route("/audio/{name}", get(handlers::audio_handler::<S, L, B, A>))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
