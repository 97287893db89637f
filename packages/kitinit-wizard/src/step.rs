use std::path::PathBuf;

use crate::codec::{
    decode_directory, decode_release, decode_service_name, encode_directory, encode_extensions,
    encode_query, encode_segment, WizardAnswers,
};
use crate::error::{Result, WizardError};

pub const NEW_KIT_ROOT: &str = "/new-prototype-kit";
pub const EXISTING_KIT_ROOT: &str = "/existing-prototype-kit";

/// Query parameter flagging a validation error on a re-rendered step.
pub const ERROR_PARAM: &str = "error";
/// Query parameter holding the working directory of the Location step.
pub const DIR_PARAM: &str = "dir";
/// Query parameter pre-seeding a step with the answer being changed.
pub const CURRENT_PARAM: &str = "current";

pub const ENTER_A_SERVICE_NAME: &str = "enter-a-service-name";
pub const NON_EMPTY: &str = "non-empty";
pub const ENTER_A_DIRECTORY_NAME: &str = "enter-a-directory-name";

/// One page of the wizard. Every step carries the answers it depends on,
/// and `Step::parse(&step.path())` gives the step back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start,
    Existing,
    NewKit,
    LatestRelease,
    ChooseRelease {
        page: u32,
    },
    ConfirmRelease {
        release: String,
    },
    ServiceName {
        release: String,
    },
    Location {
        release: String,
        service_name: String,
    },
    Extensions {
        release: String,
        service_name: String,
        directory: PathBuf,
    },
    CheckYourAnswers(WizardAnswers),
    Done(WizardAnswers),
}

impl Step {
    /// Parses a request path (without the query string).
    pub fn parse(path: &str) -> Result<Step> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            vec![]
        } else {
            trimmed.trim_start_matches('/').split('/').collect()
        };
        let step = match segments.as_slice() {
            [] => Step::Start,
            ["existing-prototype-kit"] => Step::Existing,
            ["new-prototype-kit"] => Step::NewKit,
            ["new-prototype-kit", "latest"] => Step::LatestRelease,
            ["new-prototype-kit", "choose-release", page] => Step::ChooseRelease {
                page: parse_page(page)?,
            },
            ["new-prototype-kit", release] => Step::ConfirmRelease {
                release: decode_release(release)?,
            },
            ["new-prototype-kit", release, "serviceName"] => Step::ServiceName {
                release: decode_release(release)?,
            },
            ["new-prototype-kit", release, service_name, "location"] => Step::Location {
                release: decode_release(release)?,
                service_name: decode_service_name(service_name)?,
            },
            ["new-prototype-kit", release, service_name, directory, "extensions"] => {
                Step::Extensions {
                    release: decode_release(release)?,
                    service_name: decode_service_name(service_name)?,
                    directory: decode_directory(directory)?,
                }
            }
            ["new-prototype-kit", release, service_name, directory, extensions, "check-your-answers"] => {
                Step::CheckYourAnswers(WizardAnswers::from_segments(
                    release,
                    service_name,
                    directory,
                    extensions,
                )?)
            }
            ["new-prototype-kit", release, service_name, directory, extensions, "done"] => {
                Step::Done(WizardAnswers::from_segments(
                    release,
                    service_name,
                    directory,
                    extensions,
                )?)
            }
            _ => return Err(WizardError::NotFound(path.to_string())),
        };
        Ok(step)
    }

    pub fn path(&self) -> String {
        match self {
            Step::Start => "/".to_string(),
            Step::Existing => EXISTING_KIT_ROOT.to_string(),
            Step::NewKit => NEW_KIT_ROOT.to_string(),
            Step::LatestRelease => format!("{}/latest", NEW_KIT_ROOT),
            Step::ChooseRelease { page } => format!("{}/choose-release/page-{}", NEW_KIT_ROOT, page),
            Step::ConfirmRelease { release } => {
                format!("{}/{}", NEW_KIT_ROOT, encode_segment(release))
            }
            Step::ServiceName { release } => {
                format!("{}/{}/serviceName", NEW_KIT_ROOT, encode_segment(release))
            }
            Step::Location {
                release,
                service_name,
            } => format!(
                "{}/{}/{}/location",
                NEW_KIT_ROOT,
                encode_segment(release),
                encode_segment(service_name)
            ),
            Step::Extensions {
                release,
                service_name,
                directory,
            } => format!(
                "{}/{}/{}/{}/extensions",
                NEW_KIT_ROOT,
                encode_segment(release),
                encode_segment(service_name),
                encode_directory(directory)
            ),
            Step::CheckYourAnswers(answers) => {
                format!("{}/check-your-answers", answers_prefix(answers))
            }
            Step::Done(answers) => format!("{}/done", answers_prefix(answers)),
        }
    }

    /// The step's path followed by an encoded query string.
    pub fn url_with(&self, query: &[(&str, &str)]) -> String {
        if query.is_empty() {
            self.path()
        } else {
            format!("{}?{}", self.path(), encode_query(query))
        }
    }
}

fn answers_prefix(answers: &WizardAnswers) -> String {
    let [release, service_name, directory, _] = answers.to_segments();
    format!(
        "{}/{}/{}/{}/{}",
        NEW_KIT_ROOT,
        release,
        service_name,
        directory,
        encode_extensions(&answers.extensions)
    )
}

fn parse_page(segment: &str) -> Result<u32> {
    segment
        .strip_prefix("page-")
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| WizardError::bad_request(format!("Unknown release page: {}", segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> WizardAnswers {
        WizardAnswers {
            release: "v13.2.4".to_string(),
            service_name: "Check / apply?".to_string(),
            directory: PathBuf::from("/home/me/my prototypes/new"),
            extensions: vec!["@govuk-prototype-kit/task-list".to_string()],
        }
    }

    fn all_steps() -> Vec<Step> {
        vec![
            Step::Start,
            Step::Existing,
            Step::NewKit,
            Step::LatestRelease,
            Step::ChooseRelease { page: 1 },
            Step::ChooseRelease { page: 17 },
            Step::ConfirmRelease {
                release: "v13.2.4".to_string(),
            },
            Step::ServiceName {
                release: "v13.0.0-beta.1".to_string(),
            },
            Step::Location {
                release: "v13.2.4".to_string(),
                service_name: "location".to_string(),
            },
            Step::Extensions {
                release: "v13.2.4".to_string(),
                service_name: "My service".to_string(),
                directory: PathBuf::from("/tmp/a b/c"),
            },
            Step::CheckYourAnswers(answers()),
            Step::Done(answers()),
        ]
    }

    #[test]
    fn test_every_step_round_trips() {
        for step in all_steps() {
            assert_eq!(Step::parse(&step.path()).unwrap(), step, "{}", step.path());
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(Step::Start.path(), "/");
        assert_eq!(
            Step::ChooseRelease { page: 2 }.path(),
            "/new-prototype-kit/choose-release/page-2"
        );
        assert_eq!(
            Step::Location {
                release: "v13.2.4".to_string(),
                service_name: "My service".to_string(),
            }
            .path(),
            "/new-prototype-kit/v13.2.4/My%20service/location"
        );
        assert_eq!(
            Step::CheckYourAnswers(answers()).path(),
            "/new-prototype-kit/v13.2.4/Check%20%2F%20apply%3F/%2Fhome%2Fme%2Fmy%20prototypes%2Fnew/%5B%22%40govuk-prototype-kit%2Ftask-list%22%5D/check-your-answers"
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        assert_eq!(Step::parse("/new-prototype-kit/").unwrap(), Step::NewKit);
        assert_eq!(Step::parse("").unwrap(), Step::Start);
    }

    #[test]
    fn test_url_with_query() {
        let step = Step::ServiceName {
            release: "v13.2.4".to_string(),
        };
        assert_eq!(
            step.url_with(&[(ERROR_PARAM, ENTER_A_SERVICE_NAME)]),
            "/new-prototype-kit/v13.2.4/serviceName?error=enter-a-service-name"
        );
        assert_eq!(step.url_with(&[]), step.path());
    }

    #[test]
    fn test_unknown_paths() {
        for path in ["/nope", "/new-prototype-kit/v13.2.4/a/b/c/d/e/f", "/assets"] {
            assert!(matches!(Step::parse(path), Err(WizardError::NotFound(_))), "{}", path);
        }
    }

    #[test]
    fn test_malformed_answers_are_bad_requests() {
        for path in [
            "/new-prototype-kit/choose-release/page-0",
            "/new-prototype-kit/choose-release/page-x",
            "/new-prototype-kit/choose-release/serviceName",
            "/new-prototype-kit/13.2.4",
            "/new-prototype-kit/not-a-release/serviceName",
            "/new-prototype-kit/v13.2.4/%20/location",
            "/new-prototype-kit/v13.2.4/name/relative/extensions",
            "/new-prototype-kit/v13.2.4/name/%2Ftmp/nope/check-your-answers",
            "/new-prototype-kit/v13.2.4/x/%2Ftmp%2Fe/%5B%22evil-pkg%22%5D/check-your-answers",
            "/new-prototype-kit/v13.2.4/x/%2Ftmp%2Fe/%5B%22evil-pkg%22%5D/done",
        ] {
            assert!(
                matches!(Step::parse(path), Err(WizardError::BadRequest(_))),
                "{}",
                path
            );
        }
    }
}
