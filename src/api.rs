// src/api.rs
//! HTTP boundary. Handlers return immutable JSON values; whatever renders them
//! owns its own thread/update loop.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::calc::{self, DistanceResult, WavelengthResult, WaveguideResult};
use crate::config::HubConfig;
use crate::error::{CalcError, FeedError};
use crate::feed::arxiv::ArxivClient;
use crate::feed::{FeedRecord, FeedSource, PaperFeed};
use crate::news::{curated_physics_news, NewsArticle, NewsSource, SpaceflightNewsClient};
use crate::resolve::{Linkable, LinkResolver};
use crate::space_weather::{self, SpaceWeatherSnapshot, WeatherSection};

#[derive(Clone)]
pub struct AppState {
    pub papers: PaperFeed,
    pub news: Arc<dyn NewsSource>,
    pub links: LinkResolver,
}

impl AppState {
    pub fn new(papers: PaperFeed, news: Arc<dyn NewsSource>, links: LinkResolver) -> Self {
        Self {
            papers,
            news,
            links,
        }
    }

    /// Real arXiv + Spaceflight News clients.
    pub fn from_config(cfg: &HubConfig) -> anyhow::Result<Self> {
        let source: Arc<dyn FeedSource> = Arc::new(ArxivClient::from_config(&cfg.feed)?);
        let news: Arc<dyn NewsSource> = Arc::new(SpaceflightNewsClient::new(cfg.news.clone())?);
        Ok(Self::new(
            PaperFeed::new(source, cfg.feed.clone()),
            news,
            LinkResolver::new(cfg.links.clone()),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/calc/wavelength", get(calc_wavelength))
        .route("/calc/distance", get(calc_distance))
        .route("/calc/waveguide", get(calc_waveguide))
        .route("/papers/latest", get(papers_latest))
        .route("/papers/categories", get(papers_categories))
        .route("/papers/search", get(papers_search))
        .route("/news/spaceflight", get(news_spaceflight))
        .route("/news/physics", get(news_physics))
        .route("/space-weather", get(space_weather_now))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ------------------------------------------------------------
// Errors
// ------------------------------------------------------------

#[derive(Debug)]
pub enum ApiError {
    Calc(CalcError),
    Feed(FeedError),
}

impl From<CalcError> for ApiError {
    fn from(e: CalcError) -> Self {
        ApiError::Calc(e)
    }
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        ApiError::Feed(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Calc(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Feed(e @ FeedError::EmptyQuery) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Feed(FeedError::NoResults) => {
                (StatusCode::NOT_FOUND, "No results".to_string())
            }
            ApiError::Feed(e) => {
                tracing::warn!(error = %e, "upstream feed error");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };
        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

// ------------------------------------------------------------
// Calculators
// ------------------------------------------------------------

#[derive(Deserialize)]
struct WavelengthQuery {
    frequency_hz: Option<String>,
}

#[derive(Serialize)]
struct WavelengthOut {
    #[serde(flatten)]
    result: WavelengthResult,
    display: String,
}

async fn calc_wavelength(
    Query(q): Query<WavelengthQuery>,
) -> Result<Json<WavelengthOut>, ApiError> {
    let result =
        calc::frequency_to_wavelength_from_text(q.frequency_hz.as_deref().unwrap_or(""))?;
    Ok(Json(WavelengthOut {
        display: result.display(),
        result,
    }))
}

#[derive(Deserialize)]
struct DistanceQuery {
    lat1: Option<String>,
    lon1: Option<String>,
    lat2: Option<String>,
    lon2: Option<String>,
}

#[derive(Serialize)]
struct DistanceOut {
    #[serde(flatten)]
    result: DistanceResult,
    display: String,
}

async fn calc_distance(Query(q): Query<DistanceQuery>) -> Result<Json<DistanceOut>, ApiError> {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let result = calc::great_circle_distance_from_text(
        &field(&q.lat1),
        &field(&q.lon1),
        &field(&q.lat2),
        &field(&q.lon2),
    )?;
    Ok(Json(DistanceOut {
        display: result.display(),
        result,
    }))
}

#[derive(Deserialize)]
struct WaveguideQuery {
    frequency_hz: Option<String>,
    d_layer_height_km: Option<String>,
}

#[derive(Serialize)]
struct WaveguideOut {
    #[serde(flatten)]
    result: WaveguideResult,
    below_cutoff: bool,
    display: [String; 4],
}

async fn calc_waveguide(Query(q): Query<WaveguideQuery>) -> Result<Json<WaveguideOut>, ApiError> {
    let result = calc::waveguide_parameters_from_text(
        q.frequency_hz.as_deref().unwrap_or(""),
        q.d_layer_height_km.as_deref().unwrap_or(""),
    )?;
    Ok(Json(WaveguideOut {
        below_cutoff: result.is_below_cutoff(),
        display: result.display_lines(),
        result,
    }))
}

// ------------------------------------------------------------
// Papers / news
// ------------------------------------------------------------

/// A record plus the URL a click should open.
#[derive(Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub record: T,
    pub open_url: String,
}

fn link_all<T: Linkable>(links: &LinkResolver, records: Vec<T>) -> Vec<Linked<T>> {
    records
        .into_iter()
        .map(|record| Linked {
            open_url: links.resolve_url(&record),
            record,
        })
        .collect()
}

#[derive(Serialize)]
struct PapersOut {
    count: usize,
    papers: Vec<Linked<FeedRecord>>,
}

impl PapersOut {
    fn new(links: &LinkResolver, records: Vec<FeedRecord>) -> Self {
        let papers = link_all(links, records);
        Self {
            count: papers.len(),
            papers,
        }
    }
}

async fn papers_latest(State(state): State<AppState>) -> Result<Json<PapersOut>, ApiError> {
    let records = state.papers.latest().await?;
    Ok(Json(PapersOut::new(&state.links, records)))
}

async fn papers_categories(State(state): State<AppState>) -> Result<Json<PapersOut>, ApiError> {
    let records = state.papers.categories().await?;
    Ok(Json(PapersOut::new(&state.links, records)))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn papers_search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<PapersOut>, ApiError> {
    let terms = q.q.unwrap_or_default();
    let records = state.papers.search(&terms).await?;
    Ok(Json(PapersOut::new(&state.links, records)))
}

#[derive(Serialize)]
struct NewsOut {
    count: usize,
    articles: Vec<Linked<NewsArticle>>,
}

async fn news_spaceflight(State(state): State<AppState>) -> Result<Json<NewsOut>, ApiError> {
    let articles = link_all(&state.links, state.news.fetch_latest().await?);
    Ok(Json(NewsOut {
        count: articles.len(),
        articles,
    }))
}

async fn news_physics(State(state): State<AppState>) -> Json<NewsOut> {
    let articles = link_all(&state.links, curated_physics_news());
    Json(NewsOut {
        count: articles.len(),
        articles,
    })
}

// ------------------------------------------------------------
// Space weather
// ------------------------------------------------------------

#[derive(Serialize)]
struct SpaceWeatherOut {
    #[serde(flatten)]
    snapshot: SpaceWeatherSnapshot,
    sections: Vec<WeatherSection>,
    background: Vec<WeatherSection>,
}

async fn space_weather_now() -> Json<SpaceWeatherOut> {
    let snapshot = space_weather::current_snapshot();
    Json(SpaceWeatherOut {
        sections: snapshot.sections(),
        background: space_weather::background_sections(),
        snapshot,
    })
}
