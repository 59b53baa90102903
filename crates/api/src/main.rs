use labfunds_store::FinanceService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    labfunds_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:labfunds.db?mode=rwc".to_string());
    let listen_addr =
        std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let service = FinanceService::init(&database_url).await?;
    let app = labfunds_api::app::build_app(service, &jwt_secret);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
