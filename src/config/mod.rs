//! Run configuration
//!
//! [`Settings`] collects raw values from a settings file and the command
//! line. [`Configuration`] is the validated, immutable result that every
//! component receives by reference.

mod loader;

pub use loader::Settings;

use crate::boundary::BoundaryClassifier;
use crate::error::{AppScopeError, Result};
use crate::mode::{self, RunMode};
use std::path::{Path, PathBuf};
use tracing::info;

/// Separator for list-valued options (`java.io.File.pathSeparator` style)
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Split a list option on [`PATH_SEPARATOR`], dropping empty segments
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Configuration {
    application_patterns: Vec<String>,
    classifier: BoundaryClassifier,
    application_artifacts: Vec<PathBuf>,
    library_artifacts: Vec<PathBuf>,
    dynamic_classes_file: Option<PathBuf>,
    tamiflex_facts_file: Option<PathBuf>,
    output_directory: PathBuf,
    runtime_directory: Option<PathBuf>,
    platform_directory: Option<PathBuf>,
    main_class: Option<String>,
    mode: RunMode,
}

impl Configuration {
    /// Validate merged settings. Required options are checked before the
    /// run mode, and the application patterns are parsed eagerly so a bad
    /// pattern fails here rather than half-way through a run.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        if settings.application_regex.is_empty() {
            return Err(AppScopeError::configuration("missing option r : application-regex"));
        }
        if settings.application_jars.is_empty() {
            return Err(AppScopeError::configuration("missing option a : application-jars"));
        }
        let output_directory = settings
            .output_directory
            .ok_or_else(|| AppScopeError::configuration("missing option o : output-directory"))?;

        let classifier = BoundaryClassifier::from_patterns(&settings.application_regex)?;

        let mode = mode::detect(
            &settings.application_jars,
            settings.android_platform_directory.is_some(),
            settings.java_runtime_directory.is_some(),
            settings.main_class.is_some(),
        )?;

        info!(
            "{} mode, {} application artifact(s), {} pattern(s)",
            mode,
            settings.application_jars.len(),
            settings.application_regex.len()
        );

        Ok(Self {
            application_patterns: settings.application_regex,
            classifier,
            application_artifacts: settings.application_jars,
            library_artifacts: settings.library_jars,
            dynamic_classes_file: settings.dynamic_classes_file,
            tamiflex_facts_file: settings.tamiflex_facts_file,
            output_directory,
            runtime_directory: settings.java_runtime_directory,
            platform_directory: settings.android_platform_directory,
            main_class: settings.main_class,
            mode,
        })
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_android(&self) -> bool {
        self.mode.is_android()
    }

    pub fn application_patterns(&self) -> &[String] {
        &self.application_patterns
    }

    pub fn classifier(&self) -> &BoundaryClassifier {
        &self.classifier
    }

    pub fn is_application_class(&self, class_name: &str) -> bool {
        self.classifier.is_application(class_name)
    }

    pub fn is_library_class(&self, class_name: &str) -> bool {
        self.classifier.is_library(class_name)
    }

    pub fn application_artifacts(&self) -> &[PathBuf] {
        &self.application_artifacts
    }

    pub fn library_artifacts(&self) -> &[PathBuf] {
        &self.library_artifacts
    }

    pub fn is_dynamic_classes_enabled(&self) -> bool {
        self.dynamic_classes_file.is_some()
    }

    pub fn dynamic_classes_file(&self) -> Option<&Path> {
        self.dynamic_classes_file.as_deref()
    }

    pub fn is_tamiflex_enabled(&self) -> bool {
        self.tamiflex_facts_file.is_some()
    }

    pub fn tamiflex_facts_file(&self) -> Option<&Path> {
        self.tamiflex_facts_file.as_deref()
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn runtime_directory(&self) -> Option<&Path> {
        self.runtime_directory.as_deref()
    }

    pub fn platform_directory(&self) -> Option<&Path> {
        self.platform_directory.as_deref()
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    /// The single application package, in Android mode only
    pub fn apk(&self) -> Option<&Path> {
        match self.mode {
            RunMode::Android => self.application_artifacts.first().map(PathBuf::as_path),
            RunMode::Java => None,
        }
    }

    /// The package path with `.apk` replaced by `.jar`
    pub fn apk_jar(&self) -> Option<PathBuf> {
        self.apk().map(|apk| apk.with_extension("jar"))
    }
}
