use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use kitinit_release::FetchError;
use kitinit_wizard::views::pages;
use kitinit_wizard::WizardError;

pub type Body = Full<Bytes>;

pub fn with_content_type(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Body> {
    let mut rsp = Response::new(Body::from(body));
    *rsp.status_mut() = status;
    rsp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    rsp
}

pub fn html(status: StatusCode, page: String) -> Response<Body> {
    let mut rsp = with_content_type(status, "text/html; charset=utf-8", Bytes::from(page));
    rsp.headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    rsp
}

pub fn text(status: StatusCode, message: &str) -> Response<Body> {
    with_content_type(
        status,
        "text/plain; charset=utf-8",
        Bytes::from(message.to_string()),
    )
}

/// `302 Found` to a wizard URL.
pub fn redirect(location: &str) -> Response<Body> {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut rsp = Response::new(Body::from(Bytes::new()));
            *rsp.status_mut() = StatusCode::FOUND;
            rsp.headers_mut().insert(LOCATION, value);
            rsp
        }
        Err(_) => text(StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect"),
    }
}

/// Status, page title and user facing message for a failed request.
/// Only bad requests and GitHub's rate limit message reach the user verbatim.
pub fn describe(err: &WizardError) -> (StatusCode, &'static str, String) {
    match err {
        WizardError::BadRequest(message) => {
            (StatusCode::BAD_REQUEST, "Bad request", message.clone())
        }
        WizardError::NotFound(_) | WizardError::Fetch(FetchError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            "Page not found",
            "If you typed the web address, check it is correct.".to_string(),
        ),
        WizardError::Fetch(FetchError::RateLimited(message)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "You have hit the GitHub usage limit",
            message.clone(),
        ),
        WizardError::Fetch(FetchError::InvalidPage(page)) => (
            StatusCode::BAD_REQUEST,
            "Bad request",
            format!("There is no release page {}", page),
        ),
        WizardError::Fetch(_) => (
            StatusCode::BAD_GATEWAY,
            "Could not get releases from GitHub",
            "Check your internet connection and try again.".to_string(),
        ),
        WizardError::Filesystem { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong",
            "The installer could not read or write a directory on your computer.".to_string(),
        ),
    }
}

pub fn error_page(err: &WizardError) -> Response<Body> {
    let (status, title, message) = describe(err);
    html(status, pages::error(status.as_u16(), title, &message))
}
