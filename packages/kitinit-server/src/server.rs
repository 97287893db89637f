use http_body_util::BodyExt;
use hyper::{body::Incoming, service::Service, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use kitinit_utils::BoxError;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::dispatch::dispatch;
use crate::response::{text, Body};
use crate::state::AppState;

pub struct WizardServer {
    state: Arc<AppState>,
}

impl WizardServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Serves connections from `listener` until accepting fails.
    pub async fn start(self, listener: TcpListener) -> Result<(), BoxError> {
        let addr = listener.local_addr()?;
        info!("Wizard server accepting connections on {}", addr);

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let service = WizardService {
                state: self.state.clone(),
                peer,
            };

            tokio::spawn(async move {
                if let Err(err) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    warn!("Error serving connection from {}: {:?}", peer, err);
                }
            });
        }
    }
}

#[derive(Clone)]
struct WizardService {
    state: Arc<AppState>,
    peer: SocketAddr,
}

impl Service<Request<Incoming>> for WizardService {
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let state = self.state.clone();
        let peer = self.peer;

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            debug!("{} {} from {}", parts.method, parts.uri, peer);

            let body_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    return Ok(text(
                        StatusCode::BAD_REQUEST,
                        &format!("Failed to read body: {}", e),
                    ));
                }
            };

            Ok(dispatch(&state, &parts.method, &parts.uri, body_bytes).await)
        })
    }
}
