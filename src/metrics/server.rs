//! Axum HTTP endpoint serving the counters in Prometheus text format.
//!
//! The server runs on its own thread with a current-thread tokio runtime, so
//! the blocking walker never shares an executor with it.

use super::ScanMetrics;
use crate::error::MetricsError;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default scrape address
pub const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:8010";

/// Configuration for the metrics endpoint
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to serve metrics at all
    pub enabled: bool,
    /// Address to bind
    pub addr: SocketAddr,
    /// Keep serving after the scan completes until the process is terminated
    pub keep_serving: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: SocketAddr::from(([127, 0, 0, 1], 8010)),
            keep_serving: true,
        }
    }
}

pub fn build_router(metrics: Arc<ScanMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<Arc<ScanMetrics>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.prometheus_format(),
    )
}

/// Running metrics endpoint
#[derive(Debug)]
pub struct MetricsServer {
    addr: SocketAddr,
    handle: JoinHandle<Result<(), MetricsError>>,
}

impl MetricsServer {
    /// Bind `addr` and start serving in the background.
    ///
    /// Binding happens before this returns, so an unusable address is
    /// reported to the caller instead of from the server thread.
    pub fn start(addr: SocketAddr, metrics: Arc<ScanMetrics>) -> Result<Self, MetricsError> {
        let bind_error = |source| MetricsError::Bind { addr, source };
        let listener = TcpListener::bind(addr).map_err(bind_error)?;
        listener.set_nonblocking(true).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(MetricsError::Runtime)?;

        let handle = thread::Builder::new()
            .name("metrics-server".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener =
                        tokio::net::TcpListener::from_std(listener).map_err(MetricsError::Serve)?;
                    axum::serve(listener, build_router(metrics))
                        .await
                        .map_err(MetricsError::Serve)
                })
            })
            .map_err(MetricsError::Runtime)?;

        tracing::info!(addr = %local_addr, "serving metrics on http://{local_addr}/metrics");
        Ok(Self {
            addr: local_addr,
            handle,
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block for the lifetime of the server
    pub fn join(self) -> Result<(), MetricsError> {
        self.handle.join().map_err(|_| MetricsError::Panicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    fn scrape(addr: SocketAddr) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn serves_live_counters() {
        let metrics = Arc::new(ScanMetrics::new());
        let server = MetricsServer::start("127.0.0.1:0".parse().unwrap(), Arc::clone(&metrics)).unwrap();

        metrics.inc_subdirs_processed();
        metrics.add_files_size(4_096);
        let response = scrape(server.local_addr());

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("text/plain; version=0.0.4"));
        assert!(response.contains("exif_processed_subdir_count 1"));
        assert!(response.contains("exif_processed_files_size 4096"));
    }

    #[test]
    fn occupied_address_is_a_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let err = MetricsServer::start(addr, Arc::new(ScanMetrics::new())).unwrap_err();
        assert!(matches!(err, MetricsError::Bind { .. }));
    }

    #[test]
    fn default_config_matches_default_addr() {
        let config = MetricsConfig::default();
        assert_eq!(config.addr, DEFAULT_METRICS_ADDR.parse::<SocketAddr>().unwrap());
        assert!(config.enabled);
    }
}
