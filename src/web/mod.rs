use axum::{
    response::{Html, Json},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

use crate::product_manager::ProductManager;
use crate::AppConfig;

pub mod handlers;
pub mod responses;

pub use handlers::{add_product, delete_product, list_products};
pub use responses::*;

#[derive(Clone)]
pub struct AppState {
    pub product_manager: Arc<ProductManager>,
    pub config: AppConfig,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api/v1", api_routes())
        // Dashboard
        .route("/", get(dashboard_page))
        .route("/dashboard", get(dashboard_page))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(add_product))
        .route("/products/:id", axum::routing::delete(delete_product))
}

// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dropwatch"
    }))
}

// Dashboard: list, add and delete against the JSON API
async fn dashboard_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Dropwatch - Dashboard</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        table { border-collapse: collapse; width: 100%; margin-top: 20px; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #ddd; }
        form { margin-top: 20px; }
        input[type=url] { width: 400px; padding: 6px; }
        button { padding: 6px 12px; }
    </style>
</head>
<body>
    <h1>Dropwatch</h1>
    <p>Tracked product pages, checked on a fixed schedule. Drops alert via Telegram.</p>
    <form id="add-form">
        <input type="url" id="url" placeholder="https://..." required>
        <button type="submit">Track</button>
    </form>
    <table>
        <thead>
            <tr><th>Name</th><th>Current</th><th>Lowest</th><th>Last checked</th><th></th></tr>
        </thead>
        <tbody id="products"></tbody>
    </table>
    <script>
        async function refresh() {
            const response = await fetch('/api/v1/products');
            const body = await response.json();
            const rows = (body.data || []).map(p =>
                '<tr><td><a href="' + p.url + '">' + p.name + '</a></td>' +
                '<td>' + (p.current_price ?? '-') + '</td>' +
                '<td>' + (p.lowest_price ?? '-') + '</td>' +
                '<td>' + (p.last_checked ?? 'never') + '</td>' +
                '<td><button onclick="remove(\'' + p.id + '\')">Delete</button></td></tr>');
            document.getElementById('products').innerHTML = rows.join('');
        }
        async function remove(id) {
            await fetch('/api/v1/products/' + id, { method: 'DELETE' });
            refresh();
        }
        document.getElementById('add-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const url = document.getElementById('url').value;
            await fetch('/api/v1/products', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ url })
            });
            document.getElementById('url').value = '';
            refresh();
        });
        refresh();
    </script>
</body>
</html>"#,
    )
}
