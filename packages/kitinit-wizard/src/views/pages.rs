use std::path::Path;

use kitinit_release::{Release, ReleasePage};

use super::layout::{
    checkboxes, error_summary, escape, form, heading, page, paragraph, radios, summary_list,
    text_input, RadioItem, SummaryRow,
};
use crate::codec::WizardAnswers;
use crate::directory::DirectoryListing;
use crate::extensions::{self, CATALOGUE};
use crate::flow::{CREATE_DIRECTORY, USE_DIRECTORY_PREFIX};
use crate::step::{Step, CURRENT_PARAM, DIR_PARAM, ENTER_A_DIRECTORY_NAME, NON_EMPTY};

pub fn start() -> String {
    let fields = radios(
        "new-or-existing",
        "Do you want to create a new prototype or work on an existing one?",
        None,
        &[
            RadioItem::text("new", "Create a new prototype"),
            RadioItem::text("existing", "Work on an existing prototype"),
        ],
    );
    page(
        "Create a GOV.UK prototype",
        None,
        &form(&Step::Start.path(), &fields, "Continue"),
    )
}

pub fn existing() -> String {
    let main = format!(
        "{}{}{}",
        heading("Work on an existing prototype"),
        paragraph(
            "Open a terminal in your prototype's directory and run npm run dev to start it."
        ),
        paragraph("Installing into an existing prototype is not supported by this installer yet."),
    );
    page("Work on an existing prototype", Some(Step::Start.path().as_str()), &main)
}

pub fn new_kit(latest: Option<&Release>) -> String {
    let latest_label = match latest {
        Some(release) => format!("The latest release ({})", release.tag),
        None => "The latest release".to_string(),
    };
    let fields = radios(
        "latest-or-specific",
        "Which release of the Prototype Kit do you want to use?",
        Some("We recommend the latest release."),
        &[
            RadioItem::text("latest", &latest_label),
            RadioItem::text("specific", "A specific release"),
        ],
    );
    page(
        "Choose a release",
        Some(Step::Start.path().as_str()),
        &form(&Step::NewKit.path(), &fields, "Continue"),
    )
}

pub fn choose_release(page_number: u32, releases: &ReleasePage) -> String {
    let mut items: Vec<RadioItem> = releases
        .items
        .iter()
        .map(|release| {
            RadioItem::html(
                release.tag.clone(),
                format!(
                    r#"{} released on {}. <a href="{}" class="govuk-link" rel="noreferrer noopener" target="_blank">Release notes (opens in new tab)</a>"#,
                    escape(&release.tag),
                    escape(&release.released_on()),
                    escape(&release.html_url)
                ),
            )
        })
        .collect();
    let show_previous = releases.has_previous() && page_number > 1;
    if show_previous || releases.has_next() {
        if !items.is_empty() {
            items.push(RadioItem::Divider("or"));
        }
        if show_previous {
            items.push(RadioItem::text("previous", "Find a newer release"));
        }
        if releases.has_next() {
            items.push(RadioItem::text("next", "Find an older release"));
        }
    }
    let step = Step::ChooseRelease { page: page_number };
    let main = if items.is_empty() {
        format!(
            "{}{}",
            heading("Which release do you want to use?"),
            paragraph("There are no releases on this page.")
        )
    } else {
        let fields = radios("release", "Which release do you want to use?", None, &items);
        form(&step.path(), &fields, "Continue")
    };
    page("Choose a release", Some(Step::NewKit.path().as_str()), &main)
}

pub fn confirm_release(release: &Release) -> String {
    let notes = release.notes_html();
    let notes_html = if notes.trim().is_empty() {
        paragraph("This release has no release notes.")
    } else {
        format!(r#"<div class="govuk-body release-notes">{}</div>"#, notes)
    };
    let fields = radios(
        "confirm",
        "Do you want to use this release?",
        None,
        &[
            RadioItem::text("yes", "Yes"),
            RadioItem::text("no", "No, choose another release"),
        ],
    );
    let step = Step::ConfirmRelease {
        release: release.tag.clone(),
    };
    let main = format!(
        r#"{}<p class="govuk-body">Released on {}. <a href="{}" class="govuk-link" rel="noreferrer noopener" target="_blank">View on GitHub (opens in new tab)</a></p>{}{}"#,
        heading(&format!("Release {}", release.tag)),
        escape(&release.released_on()),
        escape(&release.html_url),
        notes_html,
        form(&step.path(), &fields, "Continue")
    );
    page(&release.tag, Some(Step::NewKit.path().as_str()), &main)
}

pub fn service_name(release: &str, current: Option<&str>, missing: bool) -> String {
    let error = missing.then_some("Enter a service name");
    let summary = error
        .map(|message| error_summary(&[("service-name", message)]))
        .unwrap_or_default();
    let fields = text_input(
        "service-name",
        "What is the name of your service?",
        current.unwrap_or_default(),
        error,
    );
    let step = Step::ServiceName {
        release: release.to_string(),
    };
    let back = Step::ConfirmRelease {
        release: release.to_string(),
    };
    let title = if missing {
        "Error: Service name"
    } else {
        "Service name"
    };
    page(
        title,
        Some(back.path().as_str()),
        &format!("{}{}", summary, form(&step.path(), &fields, "Continue")),
    )
}

pub fn location(
    release: &str,
    service_name: &str,
    listing: &DirectoryListing,
    error: Option<&str>,
) -> String {
    let current = listing.current.to_string_lossy();
    let summary = match error {
        Some(NON_EMPTY) => error_summary(&[("dir-1", "The directory you choose must be empty")]),
        Some(ENTER_A_DIRECTORY_NAME) => {
            error_summary(&[("new-dir-name", "Enter a name for the new directory")])
        }
        _ => String::new(),
    };

    let mut items = Vec::new();
    if listing.entries.is_empty() {
        items.push(RadioItem::text(
            format!("{}{}", USE_DIRECTORY_PREFIX, current),
            "Use this directory",
        ));
    }
    for name in &listing.entries {
        items.push(RadioItem::html(
            listing.entry_path(name).to_string_lossy().into_owned(),
            format!("<code>{}</code>", escape(name)),
        ));
    }
    if !items.is_empty() {
        items.push(RadioItem::Divider("or"));
    }
    if !listing.is_root() {
        items.push(RadioItem::text(
            listing.parent.to_string_lossy().into_owned(),
            "Go to the parent directory",
        ));
    }
    items.push(
        RadioItem::text(CREATE_DIRECTORY, "Create a new directory here")
            .checked(error == Some(ENTER_A_DIRECTORY_NAME))
            .conditional(text_input(
                "new-dir-name",
                "What name would you like this new directory to have?",
                "",
                (error == Some(ENTER_A_DIRECTORY_NAME)).then_some("Enter a name for the new directory"),
            )),
    );

    let fields = format!(
        r#"<input type="hidden" name="cwd" value="{}">{}"#,
        escape(&current),
        radios(
            "dir",
            "Where do you want to create your prototype?",
            Some(format!("You are in {}", current).as_str()),
            &items,
        )
    );
    let step = Step::Location {
        release: release.to_string(),
        service_name: service_name.to_string(),
    };
    let back = Step::ServiceName {
        release: release.to_string(),
    };
    let back_href = back.url_with(&[(CURRENT_PARAM, service_name)]);
    page(
        "Choose a directory",
        Some(back_href.as_str()),
        &format!("{}{}", summary, form(&step.path(), &fields, "Continue")),
    )
}

pub fn extensions(
    release: &str,
    service_name: &str,
    directory: &Path,
    current: &[String],
) -> String {
    let items: Vec<(&str, &str, Option<&str>, bool)> = CATALOGUE
        .iter()
        .map(|ext| {
            (
                ext.package,
                ext.name,
                Some(ext.hint),
                current.iter().any(|c| c == ext.package),
            )
        })
        .collect();
    let fields = checkboxes(
        "extensions",
        "Which extensions do you want to install?",
        Some("Select all that apply, or none."),
        &items,
    );
    let step = Step::Extensions {
        release: release.to_string(),
        service_name: service_name.to_string(),
        directory: directory.to_path_buf(),
    };
    let shown = directory.to_string_lossy();
    let back = Step::Location {
        release: release.to_string(),
        service_name: service_name.to_string(),
    }
    .url_with(&[(DIR_PARAM, shown.as_ref())]);
    page(
        "Extensions",
        Some(back.as_str()),
        &form(&step.path(), &fields, "Continue"),
    )
}

fn extensions_html(extensions: &[String]) -> String {
    if extensions.is_empty() {
        return escape("No extensions");
    }
    let items: String = extensions
        .iter()
        .map(|package| format!("<li>{}</li>", escape(extensions::display_name(package))))
        .collect();
    format!(r#"<ul class="govuk-list">{}</ul>"#, items)
}

fn answer_rows(answers: &WizardAnswers) -> Vec<SummaryRow> {
    let release = answers.release.clone();
    let service_name = answers.service_name.clone();
    let directory = answers.directory.to_string_lossy().into_owned();
    vec![
        SummaryRow {
            key: "Release".to_string(),
            value_html: escape(&answers.release),
            change_href: Step::NewKit.path(),
        },
        SummaryRow {
            key: "Service name".to_string(),
            value_html: escape(&answers.service_name),
            change_href: Step::ServiceName {
                release: release.clone(),
            }
            .url_with(&[(CURRENT_PARAM, answers.service_name.as_str())]),
        },
        SummaryRow {
            key: "Directory".to_string(),
            value_html: format!("<code>{}</code>", escape(&directory)),
            change_href: Step::Location {
                release: release.clone(),
                service_name: service_name.clone(),
            }
            .url_with(&[(DIR_PARAM, directory.as_str())]),
        },
        SummaryRow {
            key: "Extensions".to_string(),
            value_html: extensions_html(&answers.extensions),
            change_href: Step::Extensions {
                release,
                service_name,
                directory: answers.directory.clone(),
            }
            .url_with(&[(CURRENT_PARAM, extensions_json(&answers.extensions).as_str())]),
        },
    ]
}

/// The extension list as it travels in `?current=`.
pub fn extensions_json(extensions: &[String]) -> String {
    serde_json::Value::from(extensions.to_vec()).to_string()
}

pub fn check_your_answers(answers: &WizardAnswers) -> String {
    let step = Step::CheckYourAnswers(answers.clone());
    let main = format!(
        "{}{}{}{}",
        heading("Check your answers before creating your prototype"),
        summary_list(&answer_rows(answers)),
        paragraph("Your prototype will be created in the directory above."),
        form(&step.path(), "", "Create prototype")
    );
    let back = Step::Extensions {
        release: answers.release.clone(),
        service_name: answers.service_name.clone(),
        directory: answers.directory.clone(),
    }
    .url_with(&[(CURRENT_PARAM, extensions_json(&answers.extensions).as_str())]);
    page("Check your answers", Some(back.as_str()), &main)
}

pub fn done(answers: &WizardAnswers) -> String {
    let directory = answers.directory.to_string_lossy();
    let main = format!(
        r#"<div class="govuk-panel govuk-panel--confirmation"><h1 class="govuk-panel__title">Prototype created</h1><div class="govuk-panel__body">{}</div></div>{}<pre class="govuk-body"><code>cd {}
npm install
npm run dev</code></pre>"#,
        escape(&answers.service_name),
        paragraph("To start your prototype, run these commands in a terminal:"),
        escape(&shell_quote(&directory)),
    );
    page("Prototype created", None, &main)
}

fn shell_quote(path: &str) -> String {
    if path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-~".contains(c))
    {
        path.to_string()
    } else {
        format!("'{}'", path.replace('\'', r"'\''"))
    }
}

/// Plain error page; `message` is shown as text.
pub fn error(status: u16, title: &str, message: &str) -> String {
    let main = format!("{}{}", heading(title), paragraph(message));
    page(&format!("{} {}", status, title), Some(Step::Start.path().as_str()), &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::parent_path;
    use chrono::{TimeZone, Utc};
    use kitinit_release::PageCursor;
    use std::path::PathBuf;

    fn release(tag: &str, body: Option<&str>) -> Release {
        Release {
            tag: tag.to_string(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 30, 14, 5, 11).unwrap(),
            html_url: format!(
                "https://github.com/alphagov/govuk-prototype-kit/releases/tag/{}",
                tag
            ),
            body: body.map(str::to_string),
        }
    }

    fn answers() -> WizardAnswers {
        WizardAnswers {
            release: "v13.2.4".to_string(),
            service_name: "<Apply> & 'renew'".to_string(),
            directory: PathBuf::from("/tmp/my proto"),
            extensions: vec!["hmrc-frontend".to_string()],
        }
    }

    #[test]
    fn test_choose_release_navigation() {
        let releases = ReleasePage {
            items: vec![release("v13.2.4", None), release("v13.2.3", None)],
            cursor: PageCursor {
                next: Some("n".to_string()),
                previous: Some("p".to_string()),
            },
        };
        let html = choose_release(2, &releases);
        assert!(html.contains(r#"value="v13.2.4""#));
        assert!(html.contains("v13.2.3 released on 2023-01-30."));
        assert!(html.contains("Find a newer release"));
        assert!(html.contains("Find an older release"));
        assert!(html.contains(r#"action="/new-prototype-kit/choose-release/page-2""#));

        let first = ReleasePage {
            items: vec![release("v13.2.4", None)],
            cursor: PageCursor::default(),
        };
        let html = choose_release(1, &first);
        assert!(!html.contains("Find a newer release"));
        assert!(!html.contains("govuk-radios__divider"));
    }

    #[test]
    fn test_choose_release_past_the_end() {
        let html = choose_release(9, &ReleasePage::default());
        assert!(html.contains("There are no releases on this page."));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_confirm_release_escapes_notes() {
        let html = confirm_release(&release(
            "v13.2.4",
            Some("## Fixes\n\n<script>alert(1)</script>"),
        ));
        assert!(html.contains("<h2>Fixes</h2>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"action="/new-prototype-kit/v13.2.4""#));
    }

    #[test]
    fn test_service_name_prefill_and_error() {
        let html = service_name("v13.2.4", Some("Old \"name\""), false);
        assert!(html.contains(r#"value="Old &quot;name&quot;""#));
        assert!(!html.contains("There is a problem"));
        let html = service_name("v13.2.4", None, true);
        assert!(html.contains("There is a problem"));
        assert!(html.contains("Enter a service name"));
    }

    #[test]
    fn test_location_options() {
        let listing = DirectoryListing {
            current: PathBuf::from("/home/me"),
            entries: vec!["a".to_string(), "<b>".to_string()],
            parent: parent_path(Path::new("/home/me")),
        };
        let html = location("v13.2.4", "My service", &listing, None);
        assert!(!html.contains("Use this directory"));
        assert!(html.contains(r#"value="/home/me/a""#));
        assert!(html.contains("<code>&lt;b&gt;</code>"));
        assert!(html.contains(r#"value="/home""#));
        assert!(html.contains(r#"value="create""#));
        assert!(html.contains(r#"name="cwd" value="/home/me""#));

        let empty = DirectoryListing {
            current: PathBuf::from("/home/me/new"),
            entries: vec![],
            parent: PathBuf::from("/home/me"),
        };
        let html = location("v13.2.4", "My service", &empty, Some(NON_EMPTY));
        assert!(html.contains(r#"value="use:/home/me/new""#));
        assert!(html.contains("The directory you choose must be empty"));
        assert!(html.contains(r##"<a href="#dir-1">"##));

        let html = location("v13.2.4", "My service", &empty, Some(ENTER_A_DIRECTORY_NAME));
        assert!(html.contains(r##"<a href="#new-dir-name">Enter a name for the new directory</a>"##));
        assert!(html.contains(r#"id="new-dir-name""#));
        assert!(!html.contains(r##"<a href="#dir-1">"##));
    }

    #[test]
    fn test_location_root_has_no_parent_option() {
        let root = DirectoryListing {
            current: PathBuf::from("/"),
            entries: vec!["home".to_string()],
            parent: PathBuf::from("/"),
        };
        let html = location("v13.2.4", "x", &root, None);
        assert!(!html.contains("Go to the parent directory"));
    }

    #[test]
    fn test_extensions_prechecked() {
        let html = extensions(
            "v13.2.4",
            "x",
            Path::new("/tmp"),
            &["hmrc-frontend".to_string()],
        );
        assert!(html.contains(r#"value="hmrc-frontend" checked>"#));
        assert!(html.contains(r#"value="@govuk-prototype-kit/task-list">"#));
    }

    #[test]
    fn test_check_your_answers_change_links() {
        let html = check_your_answers(&answers());
        assert!(html.contains("&lt;Apply&gt; &amp; &#39;renew&#39;"));
        assert!(html.contains("HMRC Design System"));
        assert!(html.contains(r#"href="/new-prototype-kit""#));
        assert!(html.contains(
            "/new-prototype-kit/v13.2.4/serviceName?current=%3CApply%3E%20%26%20%27renew%27"
        ));
        assert!(html.contains("location?dir=%2Ftmp%2Fmy%20proto"));
        assert!(html.contains("extensions?current=%5B%22hmrc-frontend%22%5D"));
    }

    #[test]
    fn test_no_extensions() {
        let mut answers = answers();
        answers.extensions.clear();
        assert!(check_your_answers(&answers).contains("No extensions"));
    }

    #[test]
    fn test_done_quotes_directory() {
        let html = done(&answers());
        assert!(html.contains("cd &#39;/tmp/my proto&#39;"));
        assert!(html.contains("Prototype created"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error(503, "Service unavailable", "<b>limit</b>");
        assert!(html.contains("&lt;b&gt;limit&lt;/b&gt;"));
        assert!(html.contains("<title>503 Service unavailable"));
    }
}
