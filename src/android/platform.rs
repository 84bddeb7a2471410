use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Determines the Android API level a run targets
pub trait ArtifactInspector {
    /// `None` when no level can be determined
    fn platform_api_level(&self, platform_dir: &Path, artifact: &Path) -> Option<u32>;
}

/// Picks the highest `android-N` platform that ships an `android.jar`.
///
/// Layout of an SDK platforms directory:
/// ```text
/// platforms/
///   android-28/android.jar
///   android-33/android.jar
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDirInspector;

impl PlatformDirInspector {
    /// All installed API levels, ascending
    pub fn installed_levels(platform_dir: &Path) -> Vec<u32> {
        let entries = match fs::read_dir(platform_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {}: {}", platform_dir.display(), e);
                return Vec::new();
            }
        };

        let mut levels: Vec<u32> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join("android.jar").is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_prefix("android-"))
                    .and_then(|level| level.parse().ok())
            })
            .collect();
        levels.sort_unstable();
        levels
    }
}

impl ArtifactInspector for PlatformDirInspector {
    fn platform_api_level(&self, platform_dir: &Path, _artifact: &Path) -> Option<u32> {
        let level = Self::installed_levels(platform_dir).last().copied();
        debug!("API level from {}: {:?}", platform_dir.display(), level);
        level
    }
}
