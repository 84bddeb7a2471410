//! Run mode detection
//!
//! A run targets either a single Android package (`.apk`) or one or more
//! conventional Java archives. The mode decides which other inputs are
//! required and how the entry point is obtained.

use crate::error::{AppScopeError, Result};
use std::path::Path;
use tracing::debug;

const ANDROID_PACKAGE_EXTENSION: &str = "apk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    Java,
    Android,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Java => "java",
            RunMode::Android => "android",
        }
    }

    pub fn is_android(&self) -> bool {
        matches!(self, RunMode::Android)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Is this artifact an Android package?
pub fn is_android_package(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == ANDROID_PACKAGE_EXTENSION)
        .unwrap_or(false)
}

/// Decide the run mode and check the inputs that mode requires
pub fn detect<P: AsRef<Path>>(
    application_artifacts: &[P],
    has_platform_dir: bool,
    has_runtime_dir: bool,
    has_main_class: bool,
) -> Result<RunMode> {
    let android = application_artifacts
        .iter()
        .any(|p| is_android_package(p.as_ref()));

    let mode = if android {
        if application_artifacts.len() > 1 {
            return Err(AppScopeError::configuration(
                "multiple application archives in Android mode",
            ));
        }
        if !has_platform_dir {
            return Err(AppScopeError::configuration("missing platform directory"));
        }
        RunMode::Android
    } else {
        if !(has_runtime_dir && has_main_class) {
            return Err(AppScopeError::configuration(
                "missing runtime directory and/or main class",
            ));
        }
        RunMode::Java
    };

    debug!("Detected {} mode for {} artifact(s)", mode, application_artifacts.len());
    Ok(mode)
}
