use super::platform::ArtifactInspector;
use crate::census::{DexIndex, ReferenceCensus};
use crate::config::Configuration;
use crate::entry::{EntryPointHandle, EntryPointProvider, EntryPointSynthesizer};
use crate::error::{AppScopeError, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything an Android run needs beyond the configuration: the platform
/// API level, the synthesized entry point and the app's dex index.
pub struct AndroidSetup<S> {
    api_level: u32,
    apk: PathBuf,
    platform_dir: PathBuf,
    entry_point: EntryPointProvider<S>,
    census: ReferenceCensus,
    index: OnceCell<DexIndex>,
}

impl<S: EntryPointSynthesizer> AndroidSetup<S> {
    pub fn new<I>(config: &Configuration, inspector: &I, synthesizer: S) -> Result<Self>
    where
        I: ArtifactInspector + ?Sized,
    {
        let (apk, platform_dir) = match (config.apk(), config.platform_directory()) {
            (Some(apk), Some(dir)) => (apk.to_path_buf(), dir.to_path_buf()),
            _ => {
                return Err(AppScopeError::configuration(
                    "Android setup requires an .apk and a platform directory",
                ))
            }
        };

        let api_level = inspector
            .platform_api_level(&platform_dir, &apk)
            .ok_or_else(|| {
                AppScopeError::PlatformDetection(format!(
                    "no android-N/android.jar under {}",
                    platform_dir.display()
                ))
            })?;
        info!("Android API level {}", api_level);

        let census = ReferenceCensus::from_patterns(config.application_patterns())?;

        Ok(Self {
            api_level,
            entry_point: EntryPointProvider::new(synthesizer, platform_dir.clone(), apk.clone()),
            apk,
            platform_dir,
            census,
            index: OnceCell::new(),
        })
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }

    pub fn apk_path(&self) -> &Path {
        &self.apk
    }

    pub fn platform_dir(&self) -> &Path {
        &self.platform_dir
    }

    pub fn apk_jar_path(&self) -> PathBuf {
        self.apk.with_extension("jar")
    }

    pub fn entry_point(&self) -> Result<&EntryPointHandle> {
        self.entry_point.get_entry_point()
    }

    /// The app's dex index, read on first use
    pub fn raw_index(&self) -> Result<&DexIndex> {
        self.index.get_or_try_init(|| DexIndex::open(&self.apk))
    }

    pub fn referenced_application_class_count(&self) -> Result<usize> {
        Ok(self.census.count_application_classes(self.raw_index()?))
    }

    pub fn referenced_application_method_count(&self) -> Result<usize> {
        Ok(self.census.count_application_methods(self.raw_index()?))
    }
}

impl<S> std::fmt::Debug for AndroidSetup<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidSetup")
            .field("api_level", &self.api_level)
            .field("apk", &self.apk)
            .field("platform_dir", &self.platform_dir)
            .field("entry_point", &self.entry_point)
            .finish()
    }
}
