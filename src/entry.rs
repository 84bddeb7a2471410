//! Synthetic entry point provisioning
//!
//! Android apps have no `main`. An external synthesizer builds a dummy main
//! method that drives the app's lifecycle callbacks and registers it as the
//! program entry point of the whole-program analysis. That registration is a
//! one-shot side effect, so the provider builds the method at most once and
//! hands out the cached handle afterwards.

use crate::error::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reference to the synthesized root method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPointHandle {
    pub declaring_class: String,
    /// Method signature, e.g. `<dummyMainClass: void dummyMainMethod(java.lang.String[])>`
    pub signature: String,
}

/// Builds the dummy main method for an app.
///
/// Implementations parse the artifact and its manifest, build the method and
/// declare it as the analysis entry point. Failures are reported as
/// [`crate::AppScopeError::EntrySynthesis`].
pub trait EntryPointSynthesizer {
    fn synthesize(&self, platform_dir: &Path, artifact: &Path) -> Result<EntryPointHandle>;
}

impl<F> EntryPointSynthesizer for F
where
    F: Fn(&Path, &Path) -> Result<EntryPointHandle>,
{
    fn synthesize(&self, platform_dir: &Path, artifact: &Path) -> Result<EntryPointHandle> {
        self(platform_dir, artifact)
    }
}

/// Lazily synthesizes and caches the entry point of one artifact
pub struct EntryPointProvider<S> {
    synthesizer: S,
    platform_dir: PathBuf,
    artifact: PathBuf,
    cache: OnceCell<EntryPointHandle>,
}

impl<S: EntryPointSynthesizer> EntryPointProvider<S> {
    pub fn new(synthesizer: S, platform_dir: impl Into<PathBuf>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            platform_dir: platform_dir.into(),
            artifact: artifact.into(),
            cache: OnceCell::new(),
        }
    }

    /// Return the entry point, synthesizing it on first use.
    ///
    /// Concurrent first calls block until one of them finishes; the
    /// synthesizer never runs twice once it has succeeded. A failure leaves
    /// the cache empty and is returned to the caller as-is.
    pub fn get_entry_point(&self) -> Result<&EntryPointHandle> {
        if let Some(handle) = self.cache.get() {
            debug!("Using cached entry point {}", handle.signature);
            return Ok(handle);
        }

        self.cache.get_or_try_init(|| {
            info!("Synthesizing entry point for {}", self.artifact.display());
            let handle = self.synthesizer.synthesize(&self.platform_dir, &self.artifact)?;
            info!("Entry point: {}", handle.signature);
            Ok(handle)
        })
    }

    pub fn is_synthesized(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn platform_dir(&self) -> &Path {
        &self.platform_dir
    }
}

impl<S> std::fmt::Debug for EntryPointProvider<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPointProvider")
            .field("platform_dir", &self.platform_dir)
            .field("artifact", &self.artifact)
            .field("cache", &self.cache.get())
            .finish()
    }
}
