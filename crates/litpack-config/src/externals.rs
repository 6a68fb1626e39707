//! Library-build externals taken from `package.json`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Deserialize)]
struct PackageDependencies {
    #[serde(default)]
    dependencies: IndexMap<String, Value>,

    #[serde(default, rename = "devDependencies")]
    dev_dependencies: IndexMap<String, Value>,
}

/// Dependency names declared in the `package.json` at `path`.
///
/// Keys of `dependencies` come first, then `devDependencies`, each in file
/// order. A name listed in both appears once.
pub fn externals_from_package_json(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    externals_from_package_str(&content)
}

/// Same as [`externals_from_package_json`] for already loaded contents.
pub fn externals_from_package_str(content: &str) -> Result<Vec<String>> {
    let deps: PackageDependencies =
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidValue {
            field: "package.json".to_string(),
            hint: Some(format!("Invalid JSON: {e}")),
        })?;

    let mut names: Vec<String> = Vec::with_capacity(deps.dependencies.len() + deps.dev_dependencies.len());
    for name in deps
        .dependencies
        .into_keys()
        .chain(deps.dev_dependencies.into_keys())
    {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let names = externals_from_package_str(
            r#"{
                "name": "app",
                "dependencies": { "lit": "^3", "zod": "^3", "axios": "^1" },
                "devDependencies": { "typescript": "^5", "lit": "^3" }
            }"#,
        )
        .unwrap();

        assert_eq!(names, vec!["lit", "zod", "axios", "typescript"]);
    }

    #[test]
    fn missing_sections_are_empty() {
        let names = externals_from_package_str(r#"{ "name": "app" }"#).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(externals_from_package_str("{ nope").is_err());
    }
}
