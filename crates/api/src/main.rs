#[tokio::main]
async fn main() {
    postdesk_observability::init();

    let state = postdesk_api::app::demo_state();
    let app = postdesk_api::app::router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
