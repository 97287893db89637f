use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kitinit_utils::tag_version;
use serde_json::{json, Map, Value};
use tokio::fs;
use tracing::info;

use crate::codec::WizardAnswers;
use crate::directory::directory_is_empty;
use crate::error::{Result, WizardError};

pub const KIT_PACKAGE: &str = "govuk-prototype-kit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalized {
    /// Files written into the target directory.
    Written(Vec<PathBuf>),
    /// The target directory gained entries since it was chosen.
    DirectoryNotEmpty,
}

/// Turns a completed set of answers into a prototype on disk.
#[async_trait]
pub trait Finalizer: Send + Sync {
    async fn finalize(&self, answers: &WizardAnswers) -> Result<Finalized>;
}

/// Writes the skeleton of a new prototype: `package.json` pinned to the
/// chosen kit release, and `app/config.json` carrying the service name.
/// Installing the packages is left to `npm install`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldFinalizer;

#[async_trait]
impl Finalizer for ScaffoldFinalizer {
    async fn finalize(&self, answers: &WizardAnswers) -> Result<Finalized> {
        let dir = answers.directory.as_path();
        if !directory_is_empty(dir).await? {
            return Ok(Finalized::DirectoryNotEmpty);
        }

        let package_json = dir.join("package.json");
        write_json(&package_json, &package_manifest(answers)).await?;

        let app_dir = dir.join("app");
        fs::create_dir_all(&app_dir)
            .await
            .map_err(|e| WizardError::filesystem(&app_dir, e))?;
        let config_json = app_dir.join("config.json");
        write_json(&config_json, &json!({ "serviceName": answers.service_name })).await?;

        info!(
            "Created prototype \"{}\" in {}",
            answers.service_name,
            dir.display()
        );
        Ok(Finalized::Written(vec![package_json, config_json]))
    }
}

pub fn package_manifest(answers: &WizardAnswers) -> Value {
    let mut dependencies = Map::new();
    dependencies.insert(
        KIT_PACKAGE.to_string(),
        Value::from(tag_version(&answers.release)),
    );
    for extension in &answers.extensions {
        dependencies.insert(extension.clone(), Value::from("latest"));
    }
    json!({
        "name": slug(&answers.service_name),
        "private": true,
        "scripts": {
            "dev": "govuk-prototype-kit dev",
            "serve": "govuk-prototype-kit serve",
            "start": "govuk-prototype-kit start"
        },
        "dependencies": dependencies
    })
}

/// npm package name for a service name: lower case ASCII words joined by `-`.
pub fn slug(service_name: &str) -> String {
    let words: Vec<String> = service_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if words.is_empty() {
        "prototype".to_string()
    } else {
        words.join("-")
    }
}

async fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .map_err(|e| WizardError::filesystem(path, e.into()))?;
    content.push('\n');
    fs::write(path, content)
        .await
        .map_err(|e| WizardError::filesystem(path, e))
}
