#[tokio::main]
async fn main() {
    kurum360_observability::init();

    let addr = std::env::var("KURUM360_GATE_ADDR").unwrap_or_else(|_| {
        tracing::warn!("KURUM360_GATE_ADDR not set; using 0.0.0.0:3000");
        "0.0.0.0:3000".to_string()
    });

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(local) => tracing::info!("listening on {local}"),
        Err(_) => tracing::info!("listening on {addr}"),
    }

    if let Err(e) = axum::serve(listener, kurum360_gate::build_app()).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
