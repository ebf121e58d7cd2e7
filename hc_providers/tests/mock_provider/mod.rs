use axum::Router;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock provider");
    let addr = listener.local_addr().expect("no local address");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock provider error: {e}");
        }
    });

    format!("http://{addr}")
}
