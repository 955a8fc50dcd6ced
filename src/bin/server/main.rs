use clap::Parser;
use tracing::info;

mod api;
mod dto;
mod router;

#[tokio::main]
async fn main() {
    let args = kennisbank::config::StartArgs::parse();
    let state = kennisbank::app::state::AppState::new(&args).await;
    let services = kennisbank::app::state::ServiceState::from_app_state(&state);
    let addr = args.address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("error while starting TCP listener");

    let router = router::router(services, args.allowed_origins());

    info!("Listening on {addr}");

    axum::serve(listener, router)
        .await
        .expect("error while starting server");
}
