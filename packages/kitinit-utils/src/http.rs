use bytes::{Bytes, BytesMut};
use http_body_util::{BodyExt, Empty};
use hyper::{header::HeaderMap, StatusCode, Uri};
#[cfg(not(feature = "rustls-platform-verifier"))]
use hyper_rustls::ConfigBuilderExt;
use hyper_util::{
    client::legacy::{
        connect::{Connect, HttpConnector},
        Client,
    },
    rt::TokioExecutor,
};
use once_cell::sync::Lazy;
use rustls::ClientConfig;
#[cfg(feature = "rustls-platform-verifier")]
use rustls_platform_verifier::BuilderVerifierExt;
use std::{collections::HashMap, fmt};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub struct ResponseData {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseData {
    /// First value of `name`, if it is present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response status: {}, body: {}",
            self.status,
            self.body_text()
        )
    }
}

pub async fn get(url: Uri, header_map: &HashMap<String, String>) -> Result<ResponseData, BoxError> {
    if url.scheme_str() == Some("https") {
        https_get(url, header_map).await
    } else {
        http_get(url, header_map).await
    }
}

pub async fn http_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError> {
    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
    send(client, url, header_map).await
}

pub async fn https_get(
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError> {
    let https = https_connector()?;
    let client = Client::builder(TokioExecutor::new()).build(https);
    send(client, url, header_map).await
}

async fn send<C>(
    client: Client<C, Empty<Bytes>>,
    url: Uri,
    header_map: &HashMap<String, String>,
) -> Result<ResponseData, BoxError>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    let mut req = hyper::Request::builder().method("GET").uri(url);
    for (key, value) in header_map {
        req = req.header(key, value);
    }
    let req = req.body(Empty::<Bytes>::new())?;

    let mut res = client.request(req).await?;
    let status = res.status();
    let headers = res.headers().clone();
    let mut body = BytesMut::new();
    while let Some(next) = res.frame().await {
        let frame = next?;
        if let Some(chunk) = frame.data_ref() {
            body.extend_from_slice(chunk);
        }
    }
    Ok(ResponseData {
        status: status.as_u16(),
        headers,
        body: body.freeze(),
    })
}

static PROVIDER: Lazy<std::sync::Arc<rustls::crypto::CryptoProvider>> =
    Lazy::new(|| std::sync::Arc::new(rustls::crypto::ring::default_provider()));

/// The TLS client could not be configured, e.g. no usable root certificates.
#[derive(Debug, Error)]
#[error("couldn't set up TLS: {0}")]
pub struct TlsSetupError(#[source] BoxError);

fn tls_setup<E: std::error::Error + Send + Sync + 'static>(e: E) -> TlsSetupError {
    TlsSetupError(Box::new(e))
}

#[cfg(all(
    not(feature = "native-tokio"),
    not(feature = "webpki-roots"),
    not(feature = "rustls-platform-verifier")
))]
compile_error!("No TLS backend enabled");

fn client_config() -> Result<ClientConfig, TlsSetupError> {
    let builder = ClientConfig::builder_with_provider(PROVIDER.clone())
        .with_safe_default_protocol_versions()
        .map_err(tls_setup)?;
    #[cfg(feature = "rustls-platform-verifier")]
    let builder = builder.with_platform_verifier().map_err(tls_setup)?;
    #[cfg(all(feature = "webpki-roots", not(feature = "rustls-platform-verifier")))]
    let builder = builder.with_webpki_roots();
    #[cfg(all(
        feature = "native-tokio",
        not(feature = "webpki-roots"),
        not(feature = "rustls-platform-verifier")
    ))]
    let builder = builder.with_native_roots().map_err(tls_setup)?;
    Ok(builder.with_no_client_auth())
}

fn https_connector() -> Result<hyper_rustls::HttpsConnector<HttpConnector>, TlsSetupError> {
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(client_config()?)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build())
}

pub fn http_status_is_ok(status: u16) -> bool {
    if let Ok(status) = StatusCode::from_u16(status) {
        !(status.is_client_error() || status.is_server_error())
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_http_get_keeps_headers_and_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/releases")
            .match_header("user-agent", "kitinit-test")
            .with_status(200)
            .with_header("link", "<https://example.com/?page=2>; rel=\"next\"")
            .with_body("[]")
            .create_async()
            .await;

        let url = format!("{}/releases", server.url()).parse().unwrap();
        let headers = HashMap::from([("User-Agent".to_string(), "kitinit-test".to_string())]);
        let rsp = http_get(url, &headers).await.unwrap();

        assert_eq!(rsp.status, 200);
        assert_eq!(rsp.body_text(), "[]");
        assert_eq!(
            rsp.header("link"),
            Some("<https://example.com/?page=2>; rel=\"next\"")
        );
        assert_eq!(rsp.header("x-missing"), None);
    }

    #[tokio::test]
    async fn test_get_dispatches_plain_http() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("{\"message\":\"Not Found\"}")
            .create_async()
            .await;

        let url = format!("{}/missing", server.url()).parse().unwrap();
        let rsp = get(url, &HashMap::new()).await.unwrap();
        assert_eq!(rsp.status, 404);
        assert!(!http_status_is_ok(rsp.status));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let url = "http://127.0.0.1:1/".parse().unwrap();
        assert!(http_get(url, &HashMap::new()).await.is_err());
    }

    #[test]
    fn test_http_status_is_ok() {
        assert!(http_status_is_ok(200));
        assert!(http_status_is_ok(302));
        assert!(!http_status_is_ok(403));
        assert!(!http_status_is_ok(502));
        assert!(!http_status_is_ok(1000));
    }
}
