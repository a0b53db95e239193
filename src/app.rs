use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::sheets::{SheetCache, SheetsClient, SheetsError, WebsiteRecord};
use crate::table::{self, COLUMNS, ColumnKind, Field, SortDirection, TableQuery, TableView};

pub struct AppState {
    sheets: SheetsClient,
    cache: SheetCache,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(AppState {
            sheets: SheetsClient::new(config.api_key.clone(), config.spreadsheet_id.clone())?,
            cache: SheetCache::default(),
        })
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    use anyhow::Context;

    let state = Arc::new(AppState::new(&config)?);
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.port);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the application router. Only the dashboard route sits behind the
/// access gate.
pub fn build_router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/dashboard", get(serve_dashboard))
        .route_layer(middleware::from_fn(auth::require_auth));

    Router::new()
        .route("/", get(serve_landing))
        .route("/enter", post(auth::handle_enter))
        .route("/logout", get(auth::handle_logout))
        .route("/api/sheets", get(get_sheet_records))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/landing.html"))
}

/// `GET /api/sheets` - the normalized record array as JSON, in source order.
async fn get_sheet_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WebsiteRecord>>, SheetsError> {
    let records = fetch_cached(&state).await?;
    Ok(Json(records))
}

/// Serve records from the revalidate cache, refetching once it has gone
/// stale. Errors are returned without touching the cache.
async fn fetch_cached(state: &AppState) -> Result<Vec<WebsiteRecord>, SheetsError> {
    if let Some(records) = state.cache.get() {
        return Ok(records);
    }

    let records = state.sheets.fetch_records().await?;
    state.cache.store(records.clone());
    Ok(records)
}

/// `GET /dashboard` - the server-rendered table. On a failed fetch the error
/// page is rendered instead, with a Retry link back here.
async fn serve_dashboard(
    Query(query): Query<TableQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    match fetch_cached(&state).await {
        Ok(records) => Html(render_dashboard(&records, &query)),
        Err(error) => {
            tracing::error!("dashboard fetch failed: {error}");
            Html(include_str!("./static/error.html").to_string())
        }
    }
}

fn render_dashboard(records: &[WebsiteRecord], query: &TableQuery) -> String {
    let view = table::derive_view(records, query);

    include_str!("./static/dashboard.html")
        .replace("{{headers}}", &render_headers(&view))
        .replace("{{rows}}", &render_rows(&view))
        .replace("{{filter}}", &escape_html(&view.filter))
        .replace("{{sort}}", view.sort.name)
        .replace("{{dir}}", view.dir.as_str())
        .replace("{{showing}}", &render_showing(&view))
        .replace("{{prev}}", &render_prev(&view))
        .replace("{{next}}", &render_next(&view))
        .replace("{{page}}", &view.page.to_string())
        .replace("{{total_pages}}", &view.total_pages.to_string())
}

fn dashboard_href(filter: &str, sort: &str, dir: SortDirection, page: usize) -> String {
    format!(
        "/dashboard?q={}&sort={}&dir={}&page={}",
        urlencoding::encode(filter),
        sort,
        dir.as_str(),
        page
    )
}

/// Header cells as links that re-request the page with the sort toggled,
/// keeping the current filter and page.
fn render_headers(view: &TableView) -> String {
    let mut headers = String::new();
    for column in &COLUMNS {
        let dir = table::next_sort_dir(view.sort, view.dir, column);
        let href = dashboard_href(&view.filter, column.name, dir, view.page);
        let marker = if column.name == view.sort.name {
            match view.dir {
                SortDirection::Asc => " &#9650;",
                SortDirection::Desc => " &#9660;",
            }
        } else {
            ""
        };
        headers.push_str(&format!(
            "<th><a href=\"{href}\">{}{marker}</a></th>\n",
            column.label
        ));
    }
    headers
}

fn render_rows(view: &TableView) -> String {
    let mut rows = String::new();
    for record in &view.rows {
        rows.push_str("<tr>");
        for column in &COLUMNS {
            let text = escape_html(&column.display(record));
            match column.field {
                // The domain doubles as an external link target.
                Field::Domain => rows.push_str(&format!(
                    "<td><a class=\"domain\" href=\"https://{text}\" target=\"_blank\" \
                     rel=\"noopener noreferrer\">{text}</a></td>"
                )),
                _ if column.kind == ColumnKind::Number => {
                    rows.push_str(&format!("<td class=\"num\">{text}</td>"));
                }
                _ => rows.push_str(&format!("<td>{text}</td>")),
            }
        }
        rows.push_str("</tr>\n");
    }
    rows
}

fn render_showing(view: &TableView) -> String {
    let start = if view.filtered_count == 0 {
        0
    } else {
        (view.page - 1) * table::PAGE_SIZE + 1
    };
    let end = (view.page * table::PAGE_SIZE).min(view.filtered_count);
    format!(
        "Showing {start} to {end} of {} entries",
        view.filtered_count
    )
}

fn render_prev(view: &TableView) -> String {
    if view.page > 1 {
        let href = dashboard_href(&view.filter, view.sort.name, view.dir, view.page - 1);
        format!("<a class=\"page-btn\" href=\"{href}\">&laquo; Prev</a>")
    } else {
        "<span class=\"page-btn disabled\">&laquo; Prev</span>".to_string()
    }
}

fn render_next(view: &TableView) -> String {
    if view.page < view.total_pages {
        let href = dashboard_href(&view.filter, view.sort.name, view.dir, view.page + 1);
        format!("<a class=\"page-btn\" href=\"{href}\">Next &raquo;</a>")
    } else {
        "<span class=\"page-btn disabled\">Next &raquo;</span>".to_string()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
