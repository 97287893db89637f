/// An installable kit extension offered on the Extensions step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub package: &'static str,
    pub name: &'static str,
    pub hint: &'static str,
}

pub static CATALOGUE: &[Extension] = &[
    Extension {
        package: "@govuk-prototype-kit/common-templates",
        name: "Common templates",
        hint: "Page templates for common patterns such as start pages and confirmation pages.",
    },
    Extension {
        package: "@govuk-prototype-kit/step-by-step",
        name: "Step by step navigation",
        hint: "Templates and components for step by step journeys.",
    },
    Extension {
        package: "@govuk-prototype-kit/task-list",
        name: "Task list",
        hint: "Components for task list pages.",
    },
    Extension {
        package: "@ministryofjustice/frontend",
        name: "Ministry of Justice Design System",
        hint: "Components and patterns from the Ministry of Justice.",
    },
    Extension {
        package: "hmrc-frontend",
        name: "HMRC Design System",
        hint: "Components and patterns from HM Revenue and Customs.",
    },
];

pub fn find(package: &str) -> Option<&'static Extension> {
    CATALOGUE.iter().find(|ext| ext.package == package)
}

/// Display name of a package, falling back to the package itself.
pub fn display_name(package: &str) -> &str {
    find(package).map(|ext| ext.name).unwrap_or(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("hmrc-frontend").map(|e| e.name), Some("HMRC Design System"));
        assert!(find("left-pad").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_catalogue_packages_are_unique() {
        let mut packages: Vec<_> = CATALOGUE.iter().map(|e| e.package).collect();
        packages.sort_unstable();
        packages.dedup();
        assert_eq!(packages.len(), CATALOGUE.len());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("@govuk-prototype-kit/task-list"), "Task list");
        assert_eq!(display_name("unknown"), "unknown");
    }
}
