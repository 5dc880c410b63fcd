use crate::form::{self, FormController};
use crate::session::{DEFAULT_SESSION_CAPACITY, SessionStore, generate_session_id};
use crate::{DuplicateCount, count_duplicates, find_anagrams, parse_candidates};
use askama::Html as HtmlEscaper;
use askama::{MarkupDisplay, Template};
use axum::{
    Form, Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{
        HeaderMap, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type SharedState = Arc<AppState>;
type SafeJson = MarkupDisplay<HtmlEscaper, String>;

pub const SESSION_COOKIE: &str = "anagram_session";
const DEFAULT_LOG_FILTER: &str = "anagram_form=info,tower_http=info";

#[derive(Clone)]
pub struct AppState {
    pub theme: WebTheme,
    pub base_url: String,
    pub sessions: SessionStore,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum WebTheme {
    #[default]
    Tailwind,
    Bootstrap,
}

impl fmt::Display for WebTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebTheme::Tailwind => write!(f, "tailwind"),
            WebTheme::Bootstrap => write!(f, "bootstrap"),
        }
    }
}

impl FromStr for WebTheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tailwind" => Ok(WebTheme::Tailwind),
            "bootstrap" => Ok(WebTheme::Bootstrap),
            other => Err(format!(
                "unknown theme {other:?} (expected `tailwind` or `bootstrap`)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Chrome {
    use_tailwind: bool,
    use_bootstrap: bool,
    body_class: &'static str,
    main_class: &'static str,
    card_class: &'static str,
    eyebrow_class: &'static str,
    headline_class: &'static str,
    lede_class: &'static str,
    field_class: &'static str,
    label_class: &'static str,
    input_class: &'static str,
    button_class: &'static str,
    panel_class: &'static str,
    list_class: &'static str,
}

impl Chrome {
    fn new(theme: WebTheme) -> Self {
        match theme {
            WebTheme::Tailwind => Self {
                use_tailwind: true,
                use_bootstrap: false,
                body_class: "bg-slate-50 text-slate-900",
                main_class: "min-h-screen flex flex-col items-center justify-start py-10 px-4",
                card_class: "max-w-2xl w-full space-y-6",
                eyebrow_class: "uppercase tracking-wide text-sm text-slate-500",
                headline_class: "text-4xl font-extrabold tracking-tight",
                lede_class: "text-lg text-slate-600",
                field_class: "flex flex-col gap-1",
                label_class: "text-sm font-semibold text-slate-700",
                input_class: "rounded-md border border-slate-300 px-3 py-2 shadow-sm focus:border-slate-500 focus:outline-none",
                button_class: "inline-flex items-center rounded-md bg-slate-900 px-4 py-2 text-white font-semibold shadow hover:bg-slate-800 transition-colors",
                panel_class: "bg-white shadow rounded p-4 space-y-2",
                list_class: "list-disc pl-6 space-y-1",
            },
            WebTheme::Bootstrap => Self {
                use_tailwind: false,
                use_bootstrap: true,
                body_class: "bg-light text-dark",
                main_class: "container py-5",
                card_class: "mx-auto col-lg-8",
                eyebrow_class: "text-uppercase text-muted mb-2",
                headline_class: "display-5 fw-bold",
                lede_class: "lead mb-4",
                field_class: "mb-3",
                label_class: "form-label fw-semibold",
                input_class: "form-control",
                button_class: "btn btn-primary btn-lg px-4 py-2",
                panel_class: "card card-body mt-4",
                list_class: "mb-0",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Labels {
    word: &'static str,
    word_list: &'static str,
    submit: &'static str,
    matches_heading: &'static str,
    no_matches: &'static str,
    duplicates_heading: &'static str,
    no_duplicates: &'static str,
}

const LABELS: Labels = Labels {
    word: form::WORD_LABEL,
    word_list: form::WORD_LIST_LABEL,
    submit: form::SUBMIT_LABEL,
    matches_heading: form::MATCHES_HEADING,
    no_matches: form::NO_MATCHES_MESSAGE,
    duplicates_heading: form::DUPLICATES_HEADING,
    no_duplicates: form::NO_DUPLICATES_MESSAGE,
};

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub theme: WebTheme,
    pub base_url: String,
    pub session_capacity: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            theme: WebTheme::default(),
            base_url: "http://127.0.0.1:8080".to_string(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

/// Installs the global `tracing` subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn serve(config: WebConfig) -> Result<(), WebError> {
    let state = Arc::new(AppState {
        theme: config.theme,
        base_url: config.base_url.trim_end_matches('/').to_string(),
        sessions: SessionStore::new(config.session_capacity),
    });
    let router = build_router(state);
    info!(
        %config.addr,
        theme = ?config.theme,
        base = %config.base_url,
        sessions = config.session_capacity,
        "Binding HTTP listener"
    );
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/submit", post(submit_form))
        .route("/edit", post(edit_form))
        .route("/analyze", get(analyze_html))
        .route("/api/analyze", post(api_analyze))
        .route("/healthz", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Session id carried by the request cookie, or a freshly issued one.
struct SessionCookie {
    id: String,
    issued: bool,
}

impl SessionCookie {
    fn from_headers(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| is_valid_session_id(id));
        match existing {
            Some(id) => Self { id, issued: false },
            None => Self {
                id: generate_session_id(),
                issued: true,
            },
        }
    }

    fn attach(self, response: impl IntoResponse) -> Response {
        if !self.issued {
            return response.into_response();
        }
        let cookie = Cookie::build((SESSION_COOKIE, self.id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        ([(SET_COOKIE, cookie.to_string())], response).into_response()
    }
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|ch| ch.is_ascii_alphanumeric())
}

async fn home(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = SessionCookie::from_headers(&headers);
    let page = state
        .sessions
        .with_form(&session.id, |form| render_form_page(&state, form, true));
    session.attach(Html(page))
}

#[derive(Debug, Default, Deserialize)]
struct SubmitParams {
    #[serde(default)]
    word: String,
    #[serde(default)]
    word_list: String,
}

async fn submit_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(params): Form<SubmitParams>,
) -> Response {
    let session = SessionCookie::from_headers(&headers);
    let page = state.sessions.with_form(&session.id, |form| {
        form.set_word(params.word);
        form.set_word_list(params.word_list);
        let snapshot = form.submit();
        debug!(
            matches = snapshot.matches.len(),
            duplicates = snapshot.duplicates.len(),
            "form submitted"
        );
        render_form_page(&state, form, true)
    });
    session.attach(Html(page))
}

#[derive(Debug, Default, Deserialize)]
struct EditParams {
    word: Option<String>,
    word_list: Option<String>,
}

async fn edit_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(params): Form<EditParams>,
) -> Response {
    let session = SessionCookie::from_headers(&headers);
    state.sessions.with_form(&session.id, |form| {
        if let Some(word) = params.word {
            form.set_word(word);
        }
        if let Some(word_list) = params.word_list {
            form.set_word_list(word_list);
        }
    });
    session.attach(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct AnalyzeParams {
    word: Option<String>,
    list: Option<String>,
}

async fn analyze_html(
    State(state): State<SharedState>,
    Query(params): Query<AnalyzeParams>,
) -> impl IntoResponse {
    let mut form = FormController::new();
    form.set_word(params.word.unwrap_or_default());
    form.set_word_list(params.list.unwrap_or_default());
    form.submit();
    Html(render_form_page(&state, &form, false))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    word: String,
    #[serde(default)]
    word_list: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnalyzeResponse {
    word: String,
    candidates: Vec<String>,
    matches: Vec<String>,
    duplicates: Vec<String>,
    duplicate_counts: Vec<DuplicateCount>,
    has_duplicates: bool,
}

impl AnalyzeResponse {
    fn compute(word: &str, word_list: &str) -> Self {
        let candidates = parse_candidates(word_list);
        let matches = find_anagrams(word, &candidates)
            .into_iter()
            .map(str::to_string)
            .collect();
        let duplicate_counts = count_duplicates(&candidates);
        let duplicates = duplicate_counts
            .iter()
            .map(|count| count.value.clone())
            .collect::<Vec<_>>();
        Self {
            word: word.to_string(),
            has_duplicates: !duplicates.is_empty(),
            candidates,
            matches,
            duplicates,
            duplicate_counts,
        }
    }
}

async fn api_analyze(
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload.map_err(|err| ApiError::bad_request(err.body_text()))?;
    Ok(Json(AnalyzeResponse::compute(
        &request.word,
        &request.word_list,
    )))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "anagram-form" }))
}

async fn not_found(State(state): State<SharedState>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(render_error_page(state.theme, "That page does not exist.")),
    )
}

fn render_form_page(state: &AppState, form: &FormController, track_edits: bool) -> String {
    let view = form.view();
    let (matches, duplicates) = match &view.results {
        Some(panels) => (panels.matches.items(), panels.duplicates.items()),
        None => (&[][..], &[][..]),
    };
    let permalink = form
        .snapshot()
        .map(|snapshot| analyze_path(&snapshot.word, &snapshot.word_list));
    let template = FormTemplate {
        chrome: Chrome::new(state.theme),
        labels: LABELS,
        word: view.word,
        word_list: view.word_list,
        submitted: view.results.is_some(),
        matches,
        duplicates,
        permalink,
        track_edits,
        canonical_url: format!("{}/", state.base_url),
        json_ld: MarkupDisplay::new_safe(web_application_json_ld(&state.base_url), HtmlEscaper),
    };
    template
        .render()
        .unwrap_or_else(|err| render_error_page(state.theme, err.to_string()))
}

fn render_error_page(theme: WebTheme, message: impl Into<String>) -> String {
    let chrome = Chrome::new(theme);
    let (css_tag, js_tag) = match theme {
        WebTheme::Tailwind => (
            r#"<script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>"#,
            "",
        ),
        WebTheme::Bootstrap => (
            r#"<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">"#,
            r#"<script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/js/bootstrap.bundle.min.js" integrity="sha384-FKyoEForCGlyvwx9Hj09JcYn3nv7wiPVlz7YYwJrWVcXK/BmnVDxM+D2scQbITxI" crossorigin="anonymous"></script>"#,
        ),
    };
    let message = html_escape(&message.into());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Anagram Finder • Error</title>
    {css_tag}
    {js_tag}
  </head>
  <body class="{body_class}">
    <main class="{main_class}">
      <div class="{card_class}">
        <h1 class="{headline_class}">Something went wrong</h1>
        <p class="{lede_class}">{message}</p>
        <a href="/" class="{button_class}">Back to the form</a>
      </div>
    </main>
  </body>
</html>"#,
        css_tag = css_tag,
        js_tag = js_tag,
        body_class = chrome.body_class,
        main_class = chrome.main_class,
        card_class = chrome.card_class,
        headline_class = chrome.headline_class,
        lede_class = chrome.lede_class,
        button_class = chrome.button_class,
        message = message,
    )
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn analyze_path(word: &str, word_list: &str) -> String {
    format!(
        "/analyze?word={}&list={}",
        encode_component(word),
        encode_component(word_list)
    )
}

fn web_application_json_ld(base_url: &str) -> String {
    serde_json::to_string_pretty(&json!({
        "@context": "https://schema.org",
        "@type": "WebApplication",
        "name": "Anagram Finder",
        "url": format!("{}/", base_url),
        "applicationCategory": "UtilitiesApplication",
        "description": "Find anagrams of a word and duplicated entries in a comma-separated list.",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .unwrap_or_else(|_| "{}".to_string())
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Anagram Finder</title>
    {% if chrome.use_tailwind %}
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    {% endif %}
    {% if chrome.use_bootstrap %}
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/js/bootstrap.bundle.min.js" integrity="sha384-FKyoEForCGlyvwx9Hj09JcYn3nv7wiPVlz7YYwJrWVcXK/BmnVDxM+D2scQbITxI" crossorigin="anonymous"></script>
    {% endif %}
    <link rel="canonical" href="{{ canonical_url }}">
    <script type="application/ld+json">
    {{ json_ld }}
    </script>
  </head>
  <body class="{{ chrome.body_class }}">
    <main class="{{ chrome.main_class }}">
      <div class="{{ chrome.card_class }}">
        <div>
          <p class="{{ chrome.eyebrow_class }}">Anagram Finder</p>
          <h1 class="{{ chrome.headline_class }}">Which words share the same letters?</h1>
          <p class="{{ chrome.lede_class }}">Enter a word and a comma-separated list. Matching ignores case; duplicate detection does not.</p>
        </div>

        <form method="post" action="/submit" class="space-y-4">
          <div class="{{ chrome.field_class }}">
            <label for="word" class="{{ chrome.label_class }}">{{ labels.word }}</label>
            <input id="word" name="word" type="text" value="{{ word }}" class="{{ chrome.input_class }}" data-track>
          </div>

          <div class="{{ chrome.field_class }}">
            <label for="wordList" class="{{ chrome.label_class }}">{{ labels.word_list }}</label>
            <input id="wordList" name="word_list" type="text" value="{{ word_list }}" class="{{ chrome.input_class }}" data-track>
          </div>

          <button type="submit" class="{{ chrome.button_class }}">{{ labels.submit }}</button>
        </form>

        {% if submitted %}
        <section id="matches" class="{{ chrome.panel_class }}">
          {% if matches.is_empty() %}
          <p class="no-results">{{ labels.no_matches }}</p>
          {% else %}
          <h2 class="text-xl font-semibold">{{ labels.matches_heading }}</h2>
          <ul class="{{ chrome.list_class }}">
            {% for item in matches %}
            <li>{{ item }}</li>
            {% endfor %}
          </ul>
          {% endif %}
        </section>

        <section id="duplicates" class="{{ chrome.panel_class }}">
          {% if duplicates.is_empty() %}
          <p class="no-duplicates">{{ labels.no_duplicates }}</p>
          {% else %}
          <h2 class="text-xl font-semibold">{{ labels.duplicates_heading }}</h2>
          <ul class="{{ chrome.list_class }}">
            {% for item in duplicates %}
            <li>{{ item }}</li>
            {% endfor %}
          </ul>
          {% endif %}
        </section>

        {% if let Some(link) = permalink %}
        <p class="text-sm text-slate-500"><a href="{{ link }}" class="hover:underline">Permalink to these results</a></p>
        {% endif %}
        {% endif %}
      </div>
    </main>
    {% if track_edits %}
    <script>
      document.querySelectorAll("[data-track]").forEach(function (input) {
        input.addEventListener("input", function () {
          var body = new URLSearchParams();
          body.set(input.name, input.value);
          fetch("/edit", { method: "POST", body: body, credentials: "same-origin" });
        });
      });
    </script>
    {% endif %}
  </body>
</html>"#,
    ext = "html"
)]
struct FormTemplate<'a> {
    chrome: Chrome,
    labels: Labels,
    word: &'a str,
    word_list: &'a str,
    submitted: bool,
    matches: &'a [String],
    duplicates: &'a [String],
    permalink: Option<String>,
    track_edits: bool,
    canonical_url: String,
    json_ld: SafeJson,
}
