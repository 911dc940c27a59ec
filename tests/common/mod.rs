//! Shared utilities for integration testing.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::Router;
use prefix_gateway::config::{DestinationConfig, ProxyConfig, RouteConfig};
use prefix_gateway::net::InFlightTracker;
use prefix_gateway::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

/// A running gateway bound to an ephemeral port.
#[allow(dead_code)]
pub struct Gateway {
    pub addr: SocketAddr,
    pub inflight: InFlightTracker,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the gateway with `config` on 127.0.0.1:0.
pub async fn start_gateway(config: ProxyConfig) -> Gateway {
    let server = HttpServer::new(&config).unwrap();
    let inflight = server.inflight().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    Gateway {
        addr,
        inflight,
        shutdown,
        handle,
    }
}

/// Reference route layout pointed at test backends.
///
/// `/google` → remote (strip), `/go` → literal, `/node` → local, default → local.
pub fn gateway_config(default: SocketAddr, node: SocketAddr, remote: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes = vec![
        RouteConfig {
            name: "google".into(),
            prefix: "/google".into(),
            destination: DestinationConfig::Remote {
                origin: format!("http://{}", remote),
            },
            strip_prefix: None,
        },
        RouteConfig {
            name: "go".into(),
            prefix: "/go".into(),
            destination: DestinationConfig::Literal {
                body: "I'm Go!\r\n[{path}]\n".into(),
            },
            strip_prefix: None,
        },
        RouteConfig {
            name: "node".into(),
            prefix: "/node".into(),
            destination: DestinationConfig::Local {
                address: node.to_string(),
            },
            strip_prefix: None,
        },
    ];
    config.default_route.destination = DestinationConfig::Local {
        address: default.to_string(),
    };
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Start a backend that answers `"<name> <METHOD> <path?query>"` and reports
/// what it received in `x-seen-*` response headers.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new()
        .fallback(move |request: Request<Body>| echo(name, request))
        .layer(DefaultBodyLimit::disable());
    serve(app).await
}

async fn echo(name: &'static str, request: Request<Body>) -> Response<Body> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let seen = |header: &str| {
        parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("absent")
            .to_string()
    };
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Response::builder()
        .header("x-seen-host", seen("host"))
        .header("x-seen-forwarded-for", seen("x-forwarded-for"))
        .header("x-seen-forwarded-host", seen("x-forwarded-host"))
        .header("x-seen-request-id", seen("x-request-id"))
        .header("x-seen-drop-me", seen("x-drop-me"))
        .header("x-seen-body-len", bytes.len().to_string())
        .body(Body::from(format!("{} {} {}", name, parts.method, path_and_query)))
        .unwrap()
}

/// Start a backend that streams `first`, waits for `release`, then sends `second`.
#[allow(dead_code)]
pub async fn start_streaming_backend(
    first: &'static str,
    second: &'static str,
    release: Arc<Notify>,
) -> SocketAddr {
    let app = Router::new().fallback(move || {
        let release = release.clone();
        async move {
            let (tx, rx) = mpsc::channel::<Bytes>(4);
            tokio::spawn(async move {
                let _ = tx.send(Bytes::from_static(first.as_bytes())).await;
                release.notified().await;
                let _ = tx.send(Bytes::from_static(second.as_bytes())).await;
            });
            let stream = futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
            });
            Body::from_stream(stream)
        }
    });
    serve(app).await
}

/// Start a backend that writes `response` verbatim and closes.
#[allow(dead_code)]
pub async fn start_raw_backend(response: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = socket;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });

    addr
}

/// Start a backend that writes `response`, holds the connection for `hold`,
/// then closes it. Used to cut a body short after some bytes went out.
#[allow(dead_code)]
pub async fn start_truncating_backend(response: &'static [u8], hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response).await;
                let _ = socket.flush().await;
                tokio::time::sleep(hold).await;
            });
        }
    });

    addr
}

/// Start a backend that never answers and counts connections the gateway
/// closed on it.
#[allow(dead_code)]
pub async fn start_watching_silent_backend() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = closed.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => {
                            counter.fetch_add(1, Ordering::SeqCst);
                            return;
                        }
                        Ok(_) => continue,
                    }
                }
            });
        }
    });

    (addr, closed)
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
