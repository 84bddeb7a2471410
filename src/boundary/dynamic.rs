// Classes loaded reflectively by the program under analysis
//
// The file lists one fully qualified class name per line:
// ```
// com.example.plugins.PdfExporter
// org.json.JSONObject
// ```

use super::classifier::BoundaryClassifier;
use crate::error::{AppScopeError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Names of dynamically loaded classes, read once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicClasses {
    names: Vec<String>,
}

impl DynamicClasses {
    /// Read the list from `path`, or an empty list when the feature is off.
    ///
    /// A configured file that cannot be read is an error, never an empty list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| AppScopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let classes = Self::parse_content(&content);
        debug!("Loaded {} dynamic classes from {}", classes.len(), path.display());
        Ok(classes)
    }

    pub fn parse_content(content: &str) -> Self {
        let names = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn application_classes(&self, classifier: &BoundaryClassifier) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| classifier.is_application(name))
            .collect()
    }

    pub fn library_classes(&self, classifier: &BoundaryClassifier) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| classifier.is_library(name))
            .collect()
    }
}
