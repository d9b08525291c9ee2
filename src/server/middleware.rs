// Request middleware for the GraphQL server

use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

/// Log the remote address of every inbound request before handling it
///
/// The address comes from the `ConnectInfo` the listener attaches to each
/// connection. Requests without one (for example when the router is driven
/// directly in-process) are still served.
pub async fn log_remote_addr<B>(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    match connect_info {
        Some(ConnectInfo(addr)) => info!("ip: {}", addr.ip()),
        None => warn!("ip: unknown ({} {})", request.method(), request.uri()),
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body, extract::connect_info::MockConnectInfo, middleware, routing::get, Router,
    };
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    // Collects formatted log lines so tests can inspect them
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(log_remote_addr))
    }

    #[tokio::test]
    async fn test_logs_remote_address() {
        let (logs, _guard) = capture();

        let app = app().layer(MockConnectInfo(SocketAddr::from(([192, 168, 0, 7], 4321))));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert!(logs.contents().contains("ip: 192.168.0.7"), "{}", logs.contents());
    }

    #[tokio::test]
    async fn test_logs_unknown_address_without_connect_info() {
        let (logs, _guard) = capture();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert!(logs.contents().contains("ip: unknown (GET /)"), "{}", logs.contents());
    }
}
