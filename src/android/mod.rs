// Android-specific setup: platform detection and the per-app setup value

mod platform;
mod setup;

pub use platform::{ArtifactInspector, PlatformDirInspector};
pub use setup::AndroidSetup;
