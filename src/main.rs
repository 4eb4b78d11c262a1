use anyhow::{Context, Result};
use axum::extract::Request;
use locale_route::{
    handler, into_axum_router, Action, Attributes, CurrentLocale, HttpHandler, LocaleConfig,
    LocaleRouter, LocaleUrls, MiddlewareRegistry, Resource, ResourceAction, ResourceOptions,
    RouteTable,
};
use std::sync::Arc;
use tracing::info;

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_route=info".parse()?),
        )
        .init();

    let config = Arc::new(LocaleConfig::from_env()?);
    info!(
        "Active locales: {}",
        config
            .locales()
            .iter()
            .map(|locale| locale.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut table = RouteTable::new();
    register_routes(&mut LocaleRouter::new(&mut table, Arc::clone(&config)))?;
    info!("Registered {} localized routes", table.len());

    if std::env::args().nth(1).as_deref() == Some("routes") {
        println!("{}", serde_json::to_string_pretty(&table.summaries())?);
        return Ok(());
    }

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse::<u16>().context("PORT must be a valid port number")?,
        Err(_) => DEFAULT_PORT,
    };

    let app = into_axum_router(&table, &MiddlewareRegistry::default())
        .context("Failed to build HTTP router")?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

/// Demo route set: a home page, an about page with translated URIs and a
/// blog with resource routes.
fn register_routes(router: &mut LocaleRouter<'_, RouteTable<HttpHandler>>) -> Result<()> {
    router.get("/", Action::new(handler(greet)).named("home"))?;

    router
        .with_urls(
            LocaleUrls::new()
                .url("fr", "fr/a-propos")
                .url("en", "en/about"),
        )
        .get("about", Action::new(handler(greet)).named("about"))?;

    router.group(Attributes::new().prefix("blog").named("blog."), |blog| {
        let resource = Resource::new()
            .with(ResourceAction::Index, handler(greet))
            .with(ResourceAction::Show, handler(greet));
        blog.resource("post", &resource, ResourceOptions::default())
    })?;

    Ok(())
}

async fn greet(request: Request) -> String {
    match request.extensions().get::<CurrentLocale>() {
        Some(CurrentLocale(locale)) => format!("{} {}", locale, request.uri().path()),
        None => request.uri().path().to_string(),
    }
}
