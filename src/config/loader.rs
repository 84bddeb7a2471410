use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw settings, from a settings file, the command line, or both.
///
/// Every field is optional here; [`super::Configuration`] decides what is
/// required once all sources are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Application patterns (`com.app.*`, `com.app.**`, `**`, or a class name)
    pub application_regex: Vec<String>,

    /// Main class of a Java application
    pub main_class: Option<String>,

    /// Application archives (.jar files, or a single .apk)
    pub application_jars: Vec<PathBuf>,

    /// Library archives
    pub library_jars: Vec<PathBuf>,

    /// Newline-delimited list of reflectively loaded classes
    pub dynamic_classes_file: Option<PathBuf>,

    /// Reflection facts in the TamiFlex format
    pub tamiflex_facts_file: Option<PathBuf>,

    pub output_directory: Option<PathBuf>,

    /// Java runtime to model (Java mode)
    pub java_runtime_directory: Option<PathBuf>,

    /// SDK platforms directory containing android-N/android.jar (Android mode)
    pub android_platform_directory: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read settings file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML settings"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML settings"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(settings) = serde_yaml::from_str(&contents) {
                    Ok(settings)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse settings file")
                }
            }
        }
    }

    /// Try to load settings from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".appscope.yml",
            ".appscope.yaml",
            ".appscope.toml",
            "appscope.yml",
            "appscope.yaml",
            "appscope.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Values set in `overrides` replace ours; unset ones keep ours
    pub fn merge(self, overrides: Settings) -> Settings {
        fn list<T>(base: Vec<T>, over: Vec<T>) -> Vec<T> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        Settings {
            application_regex: list(self.application_regex, overrides.application_regex),
            main_class: overrides.main_class.or(self.main_class),
            application_jars: list(self.application_jars, overrides.application_jars),
            library_jars: list(self.library_jars, overrides.library_jars),
            dynamic_classes_file: overrides.dynamic_classes_file.or(self.dynamic_classes_file),
            tamiflex_facts_file: overrides.tamiflex_facts_file.or(self.tamiflex_facts_file),
            output_directory: overrides.output_directory.or(self.output_directory),
            java_runtime_directory: overrides
                .java_runtime_directory
                .or(self.java_runtime_directory),
            android_platform_directory: overrides
                .android_platform_directory
                .or(self.android_platform_directory),
        }
    }
}
