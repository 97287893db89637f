//! Answers to submitted wizard forms.
//!
//! Every submission either fails or redirects to the next step, with all the
//! answers collected so far encoded into the new URL.

use std::path::PathBuf;

use kitinit_release::ReleaseFetcher;
use kitinit_utils::is_release_tag;
use tracing::info;

use crate::codec::WizardAnswers;
use crate::directory::{create_directory, directory_is_empty, is_valid_directory_name};
use crate::error::{Result, WizardError};
use crate::extensions;
use crate::finalize::{Finalized, Finalizer};
use crate::form::FormData;
use crate::step::{
    Step, DIR_PARAM, ENTER_A_DIRECTORY_NAME, ENTER_A_SERVICE_NAME, ERROR_PARAM, NON_EMPTY,
};

/// Value prefix of the "Use this directory" option.
pub const USE_DIRECTORY_PREFIX: &str = "use:";
/// Value of the "Create a new directory here" option.
pub const CREATE_DIRECTORY: &str = "create";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Redirect(String),
}

impl Transition {
    fn to(step: Step) -> Self {
        Transition::Redirect(step.path())
    }

    fn to_with(step: Step, query: &[(&str, &str)]) -> Self {
        Transition::Redirect(step.url_with(query))
    }

    pub fn location(&self) -> &str {
        match self {
            Transition::Redirect(url) => url,
        }
    }
}

fn unknown_option(value: Option<&str>) -> WizardError {
    WizardError::bad_request(format!("Unknown option: {}", value.unwrap_or_default()))
}

pub fn submit_start(form: &FormData) -> Result<Transition> {
    match form.get("new-or-existing") {
        Some("new") => Ok(Transition::to(Step::NewKit)),
        Some("existing") => Ok(Transition::to(Step::Existing)),
        other => Err(unknown_option(other)),
    }
}

pub fn submit_new_kit(form: &FormData) -> Result<Transition> {
    match form.get("latest-or-specific") {
        Some("latest") => Ok(Transition::to(Step::LatestRelease)),
        Some("specific") => Ok(Transition::to(Step::ChooseRelease { page: 1 })),
        other => Err(unknown_option(other)),
    }
}

/// Resolves "latest" to the newest published release.
pub async fn resolve_latest(fetcher: &ReleaseFetcher) -> Result<Transition> {
    let release = fetcher.latest_release().await?;
    Ok(Transition::to(Step::ConfirmRelease {
        release: release.tag,
    }))
}

pub fn submit_choose_release(page: u32, form: &FormData) -> Result<Transition> {
    match form.get("release") {
        Some("next") => {
            let next = page
                .checked_add(1)
                .ok_or_else(|| WizardError::bad_request(format!("No page after {}", page)))?;
            Ok(Transition::to(Step::ChooseRelease { page: next }))
        }
        Some("previous") if page > 1 => Ok(Transition::to(Step::ChooseRelease { page: page - 1 })),
        Some(tag) if is_release_tag(tag) => Ok(Transition::to(Step::ConfirmRelease {
            release: tag.to_string(),
        })),
        other => Err(unknown_option(other)),
    }
}

pub fn submit_confirm_release(release: &str, form: &FormData) -> Result<Transition> {
    if form.get("confirm") == Some("yes") {
        Ok(Transition::to(Step::ServiceName {
            release: release.to_string(),
        }))
    } else {
        Ok(Transition::to(Step::NewKit))
    }
}

pub fn submit_service_name(release: &str, form: &FormData) -> Result<Transition> {
    let service_name = form.get("service-name").unwrap_or_default().trim();
    if service_name.is_empty() {
        return Ok(Transition::to_with(
            Step::ServiceName {
                release: release.to_string(),
            },
            &[(ERROR_PARAM, ENTER_A_SERVICE_NAME)],
        ));
    }
    Ok(Transition::to(Step::Location {
        release: release.to_string(),
        service_name: service_name.to_string(),
    }))
}

fn absolute_path(value: &str) -> Result<PathBuf> {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(WizardError::bad_request(format!(
            "Not an absolute directory: {}",
            value
        )))
    }
}

pub async fn submit_location(
    release: &str,
    service_name: &str,
    form: &FormData,
) -> Result<Transition> {
    let location = Step::Location {
        release: release.to_string(),
        service_name: service_name.to_string(),
    };
    let dir = match form.get("dir") {
        Some(dir) if !dir.is_empty() => dir,
        _ => return Err(WizardError::bad_request("No directory specified.")),
    };

    if let Some(chosen) = dir.strip_prefix(USE_DIRECTORY_PREFIX) {
        let chosen = absolute_path(chosen)?;
        if directory_is_empty(&chosen).await? {
            return Ok(Transition::to(Step::Extensions {
                release: release.to_string(),
                service_name: service_name.to_string(),
                directory: chosen,
            }));
        }
        let shown = chosen.to_string_lossy();
        return Ok(Transition::to_with(
            location,
            &[(DIR_PARAM, shown.as_ref()), (ERROR_PARAM, NON_EMPTY)],
        ));
    }

    if dir == CREATE_DIRECTORY {
        let cwd = absolute_path(form.get("cwd").unwrap_or_default())?;
        let shown = cwd.to_string_lossy();
        let name = form.get("new-dir-name").unwrap_or_default();
        if !is_valid_directory_name(name) {
            return Ok(Transition::to_with(
                location,
                &[(DIR_PARAM, shown.as_ref()), (ERROR_PARAM, ENTER_A_DIRECTORY_NAME)],
            ));
        }
        let created = create_directory(&cwd, name).await?;
        info!("Created directory {}", created.display());
        return Ok(Transition::to_with(location, &[(DIR_PARAM, shown.as_ref())]));
    }

    let target = absolute_path(dir)?;
    let shown = target.to_string_lossy();
    Ok(Transition::to_with(location, &[(DIR_PARAM, shown.as_ref())]))
}

pub fn submit_extensions(
    release: &str,
    service_name: &str,
    directory: &std::path::Path,
    form: &FormData,
) -> Result<Transition> {
    let mut chosen = Vec::new();
    for package in form.get_all("extensions") {
        if extensions::find(package).is_none() {
            return Err(WizardError::bad_request(format!(
                "Unknown extension: {}",
                package
            )));
        }
        if !chosen.iter().any(|c| c == package) {
            chosen.push(package.to_string());
        }
    }
    Ok(Transition::to(Step::CheckYourAnswers(WizardAnswers {
        release: release.to_string(),
        service_name: service_name.to_string(),
        directory: directory.to_path_buf(),
        extensions: chosen,
    })))
}

pub async fn submit_check_your_answers(
    answers: &WizardAnswers,
    finalizer: &dyn Finalizer,
) -> Result<Transition> {
    match finalizer.finalize(answers).await? {
        Finalized::Written(_) => Ok(Transition::to(Step::Done(answers.clone()))),
        Finalized::DirectoryNotEmpty => {
            let shown = answers.directory.to_string_lossy();
            Ok(Transition::to_with(
                Step::Location {
                    release: answers.release.clone(),
                    service_name: answers.service_name.clone(),
                },
                &[(DIR_PARAM, shown.as_ref()), (ERROR_PARAM, NON_EMPTY)],
            ))
        }
    }
}

/// Handles a form posted to `step`. Steps without a form are not found.
pub async fn submit(step: &Step, form: &FormData, finalizer: &dyn Finalizer) -> Result<Transition> {
    match step {
        Step::Start => submit_start(form),
        Step::NewKit => submit_new_kit(form),
        Step::ChooseRelease { page } => submit_choose_release(*page, form),
        Step::ConfirmRelease { release } => submit_confirm_release(release, form),
        Step::ServiceName { release } => submit_service_name(release, form),
        Step::Location {
            release,
            service_name,
        } => submit_location(release, service_name, form).await,
        Step::Extensions {
            release,
            service_name,
            directory,
        } => submit_extensions(release, service_name, directory, form),
        Step::CheckYourAnswers(answers) => submit_check_your_answers(answers, finalizer).await,
        Step::Existing | Step::LatestRelease | Step::Done(_) => {
            Err(WizardError::NotFound(step.path()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalize::ScaffoldFinalizer;
    use tempfile::tempdir;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_pairs(pairs)
    }

    fn redirect(result: Result<Transition>) -> String {
        result.unwrap().location().to_string()
    }

    fn location_step() -> Step {
        Step::Location {
            release: "v13.2.4".to_string(),
            service_name: "My service".to_string(),
        }
    }

    #[test]
    fn test_start() {
        assert_eq!(
            redirect(submit_start(&form(&[("new-or-existing", "new")]))),
            "/new-prototype-kit"
        );
        assert_eq!(
            redirect(submit_start(&form(&[("new-or-existing", "existing")]))),
            "/existing-prototype-kit"
        );
        let err = submit_start(&form(&[("new-or-existing", "maybe")])).unwrap_err();
        assert_eq!(err.to_string(), "Unknown option: maybe");
        assert!(matches!(
            submit_start(&FormData::default()),
            Err(WizardError::BadRequest(_))
        ));
    }

    #[test]
    fn test_new_kit() {
        assert_eq!(
            redirect(submit_new_kit(&form(&[("latest-or-specific", "latest")]))),
            "/new-prototype-kit/latest"
        );
        assert_eq!(
            redirect(submit_new_kit(&form(&[("latest-or-specific", "specific")]))),
            "/new-prototype-kit/choose-release/page-1"
        );
        assert!(submit_new_kit(&form(&[("latest-or-specific", "")])).is_err());
    }

    #[test]
    fn test_choose_release() {
        assert_eq!(
            redirect(submit_choose_release(3, &form(&[("release", "next")]))),
            "/new-prototype-kit/choose-release/page-4"
        );
        assert_eq!(
            redirect(submit_choose_release(3, &form(&[("release", "previous")]))),
            "/new-prototype-kit/choose-release/page-2"
        );
        assert_eq!(
            redirect(submit_choose_release(1, &form(&[("release", "v12.0.1")]))),
            "/new-prototype-kit/v12.0.1"
        );
        for value in ["previous", "latest", "12.0.1", ""] {
            assert!(
                matches!(
                    submit_choose_release(1, &form(&[("release", value)])),
                    Err(WizardError::BadRequest(_))
                ),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_choose_release_last_page() {
        let step = Step::parse(&format!("/new-prototype-kit/choose-release/page-{}", u32::MAX)).unwrap();
        assert_eq!(step, Step::ChooseRelease { page: u32::MAX });
        assert!(matches!(
            submit_choose_release(u32::MAX, &form(&[("release", "next")])),
            Err(WizardError::BadRequest(_))
        ));
        assert_eq!(
            redirect(submit_choose_release(u32::MAX, &form(&[("release", "previous")]))),
            format!("/new-prototype-kit/choose-release/page-{}", u32::MAX - 1)
        );
    }

    #[test]
    fn test_confirm_release() {
        assert_eq!(
            redirect(submit_confirm_release("v13.2.4", &form(&[("confirm", "yes")]))),
            "/new-prototype-kit/v13.2.4/serviceName"
        );
        assert_eq!(
            redirect(submit_confirm_release("v13.2.4", &form(&[("confirm", "no")]))),
            "/new-prototype-kit"
        );
        assert_eq!(
            redirect(submit_confirm_release("v13.2.4", &FormData::default())),
            "/new-prototype-kit"
        );
    }

    #[test]
    fn test_service_name() {
        assert_eq!(
            redirect(submit_service_name(
                "v13.2.4",
                &form(&[("service-name", "Apply / renew?")])
            )),
            "/new-prototype-kit/v13.2.4/Apply%20%2F%20renew%3F/location"
        );
        for blank in ["", "   "] {
            assert_eq!(
                redirect(submit_service_name("v13.2.4", &form(&[("service-name", blank)]))),
                "/new-prototype-kit/v13.2.4/serviceName?error=enter-a-service-name"
            );
        }
    }

    #[tokio::test]
    async fn test_location_navigate() {
        let url = redirect(
            submit_location("v13.2.4", "My service", &form(&[("dir", "/tmp/some where")])).await,
        );
        assert_eq!(url, location_step().url_with(&[("dir", "/tmp/some where")]));
        assert!(matches!(
            submit_location("v13.2.4", "My service", &FormData::default()).await,
            Err(WizardError::BadRequest(_))
        ));
        assert!(matches!(
            submit_location("v13.2.4", "My service", &form(&[("dir", "relative")])).await,
            Err(WizardError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_location_use_directory() {
        let dir = tempdir().unwrap();
        let value = format!("use:{}", dir.path().display());
        let url = redirect(submit_location("v13.2.4", "My service", &form(&[("dir", &value)])).await);
        assert_eq!(
            url,
            Step::Extensions {
                release: "v13.2.4".to_string(),
                service_name: "My service".to_string(),
                directory: dir.path().to_path_buf(),
            }
            .path()
        );

        std::fs::write(dir.path().join("file"), "").unwrap();
        let url = redirect(submit_location("v13.2.4", "My service", &form(&[("dir", &value)])).await);
        let shown = dir.path().to_string_lossy().into_owned();
        assert_eq!(
            url,
            location_step().url_with(&[("dir", &shown), ("error", "non-empty")])
        );
    }

    #[tokio::test]
    async fn test_location_create_directory() {
        let dir = tempdir().unwrap();
        let cwd = dir.path().to_string_lossy().into_owned();
        let url = redirect(
            submit_location(
                "v13.2.4",
                "My service",
                &form(&[("dir", "create"), ("cwd", &cwd), ("new-dir-name", "proto")]),
            )
            .await,
        );
        assert_eq!(url, location_step().url_with(&[("dir", &cwd)]));
        assert!(dir.path().join("proto").is_dir());

        for name in ["", "a/b"] {
            let url = redirect(
                submit_location(
                    "v13.2.4",
                    "My service",
                    &form(&[("dir", "create"), ("cwd", &cwd), ("new-dir-name", name)]),
                )
                .await,
            );
            assert_eq!(
                url,
                location_step().url_with(&[("dir", &cwd), ("error", "enter-a-directory-name")])
            );
        }
    }

    #[test]
    fn test_extensions() {
        let dir = PathBuf::from("/tmp/proto");
        let url = redirect(submit_extensions(
            "v13.2.4",
            "My service",
            &dir,
            &form(&[
                ("extensions", "hmrc-frontend"),
                ("extensions", "@govuk-prototype-kit/task-list"),
                ("extensions", "hmrc-frontend"),
            ]),
        ));
        let step = Step::parse(&url).unwrap();
        match step {
            Step::CheckYourAnswers(answers) => assert_eq!(
                answers.extensions,
                vec!["hmrc-frontend", "@govuk-prototype-kit/task-list"]
            ),
            other => panic!("unexpected step {:?}", other),
        }

        let url = redirect(submit_extensions("v13.2.4", "My service", &dir, &FormData::default()));
        assert!(url.ends_with("/%5B%5D/check-your-answers"));

        assert!(matches!(
            submit_extensions("v13.2.4", "x", &dir, &form(&[("extensions", "left-pad")])),
            Err(WizardError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_check_your_answers_finalizes() {
        let dir = tempdir().unwrap();
        let answers = WizardAnswers {
            release: "v13.2.4".to_string(),
            service_name: "My service".to_string(),
            directory: dir.path().to_path_buf(),
            extensions: vec![],
        };
        let url = redirect(submit_check_your_answers(&answers, &ScaffoldFinalizer).await);
        assert_eq!(url, Step::Done(answers.clone()).path());
        assert!(dir.path().join("package.json").is_file());

        let url = redirect(submit_check_your_answers(&answers, &ScaffoldFinalizer).await);
        let shown = dir.path().to_string_lossy().into_owned();
        assert_eq!(
            url,
            location_step().url_with(&[("dir", &shown), ("error", "non-empty")])
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_steps_without_forms() {
        for step in [Step::Existing, Step::LatestRelease] {
            assert!(matches!(
                submit(&step, &FormData::default(), &ScaffoldFinalizer).await,
                Err(WizardError::NotFound(_))
            ));
        }
        assert_eq!(
            redirect(submit(&Step::Start, &form(&[("new-or-existing", "new")]), &ScaffoldFinalizer).await),
            "/new-prototype-kit"
        );
    }
}
