use bytes::Bytes;
use hyper::{Method, Response, StatusCode, Uri};
use std::path::PathBuf;
use tracing::{error, info, warn};

use kitinit_release::FetchError;
use kitinit_wizard::flow::{resolve_latest, submit};
use kitinit_wizard::step::{CURRENT_PARAM, DIR_PARAM, ENTER_A_SERVICE_NAME, ERROR_PARAM};
use kitinit_wizard::views::pages;
use kitinit_wizard::{list_directories, FormData, Result, Step, WizardError};

use crate::assets::{content_type, read_asset, STYLESHEET_FILE};
use crate::response::{error_page, html, redirect, text, with_content_type, Body};
use crate::state::AppState;

const ASSETS_PREFIX: &str = "/assets/";

/// Answers one request. Never fails: errors become error pages.
pub async fn dispatch(state: &AppState, method: &Method, uri: &Uri, body: Bytes) -> Response<Body> {
    let path = uri.path();
    if let Some(asset) = path.strip_prefix(ASSETS_PREFIX) {
        if method != Method::GET && method != Method::HEAD {
            return text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }
        return serve_asset(state, asset).await;
    }

    let query = FormData::parse(uri.query().unwrap_or_default());
    let result = match Step::parse(path) {
        Ok(step) => match method {
            &Method::GET | &Method::HEAD => render(state, &step, &query).await,
            &Method::POST => {
                let form = FormData::parse(&String::from_utf8_lossy(&body));
                match submit(&step, &form, state.finalizer.as_ref()).await {
                    Ok(transition) => {
                        info!("{} {} -> {}", method, path, transition.location());
                        Ok(redirect(transition.location()))
                    }
                    Err(e) => Err(e),
                }
            }
            _ => return text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(rsp) => rsp,
        Err(err) => {
            match &err {
                WizardError::NotFound(_) | WizardError::BadRequest(_) => {
                    warn!("{} {} failed: {}", method, path, err)
                }
                WizardError::Fetch(e) if e.is_rate_limited() => {
                    warn!("{} {} hit the GitHub rate limit: {}", method, path, e)
                }
                _ => error!("{} {} failed: {}", method, path, err),
            }
            error_page(&err)
        }
    }
}

async fn serve_asset(state: &AppState, asset: &str) -> Response<Body> {
    if asset == STYLESHEET_FILE {
        return with_content_type(
            StatusCode::OK,
            content_type(STYLESHEET_FILE),
            state.stylesheet.bytes(),
        );
    }
    let Some(dir) = &state.assets_dir else {
        return text(StatusCode::NOT_FOUND, "Not found");
    };
    match read_asset(dir, asset).await {
        Ok(Some(data)) => with_content_type(StatusCode::OK, content_type(asset), data),
        Ok(None) => text(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            error!("Failed to read asset {}: {}", asset, e);
            text(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
    }
}

async fn render(state: &AppState, step: &Step, query: &FormData) -> Result<Response<Body>> {
    let error = query.get(ERROR_PARAM);
    let page = match step {
        Step::Start => pages::start(),
        Step::Existing => pages::existing(),
        Step::NewKit => {
            let latest = match state.fetcher.latest_release().await {
                Ok(release) => Some(release),
                Err(FetchError::NoReleases) => None,
                Err(e) => return Err(e.into()),
            };
            pages::new_kit(latest.as_ref())
        }
        Step::LatestRelease => {
            let transition = resolve_latest(&state.fetcher).await?;
            return Ok(redirect(transition.location()));
        }
        Step::ChooseRelease { page } => {
            let releases = state.fetcher.list_releases(*page).await?;
            pages::choose_release(*page, &releases)
        }
        Step::ConfirmRelease { release } => {
            let release = state.fetcher.get_release_by_tag(release).await?;
            pages::confirm_release(&release)
        }
        Step::ServiceName { release } => pages::service_name(
            release,
            query.get(CURRENT_PARAM),
            error == Some(ENTER_A_SERVICE_NAME),
        ),
        Step::Location {
            release,
            service_name,
        } => {
            let cwd = match query.get(DIR_PARAM).filter(|dir| !dir.is_empty()) {
                Some(dir) => {
                    let dir = PathBuf::from(dir);
                    if !dir.is_absolute() {
                        return Err(WizardError::bad_request(format!(
                            "Not an absolute directory: {}",
                            dir.display()
                        )));
                    }
                    dir
                }
                None => state.home.clone(),
            };
            let listing = list_directories(&cwd).await?;
            pages::location(release, service_name, &listing, error)
        }
        Step::Extensions {
            release,
            service_name,
            directory,
        } => {
            let current: Vec<String> = match query.get(CURRENT_PARAM) {
                Some(json) => serde_json::from_str(json).map_err(|_| {
                    WizardError::bad_request(format!("Invalid extensions list: {}", json))
                })?,
                None => Vec::new(),
            };
            pages::extensions(release, service_name, directory, &current)
        }
        Step::CheckYourAnswers(answers) => pages::check_your_answers(answers),
        Step::Done(answers) => pages::done(answers),
    };
    Ok(html(StatusCode::OK, page))
}
