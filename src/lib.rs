//! appscope - application/library boundary for whole-program analysis
//!
//! Decides, for every class met while analyzing a Java or Android program,
//! whether it belongs to the application (analyzed precisely) or to the
//! library (replaced by a placeholder model), and provisions the synthetic
//! entry point that the analysis starts from.
//!
//! # Architecture
//!
//! 1. **Patterns** - Parse user patterns into typed rules
//! 2. **Classification** - Answer "application or library" per class
//! 3. **Mode detection** - Java archives vs. a single Android package
//! 4. **Entry point** - Synthesize the dummy main once, then reuse it
//! 5. **Census** - Count application classes/methods in a dex index

pub mod android;
pub mod boundary;
pub mod census;
pub mod config;
pub mod entry;
pub mod error;
pub mod mode;

pub use android::{AndroidSetup, ArtifactInspector, PlatformDirInspector};
pub use boundary::{BoundaryClassifier, ClassDescriptor, ClassRegistry, DynamicClasses, FilterPattern, RuleSet};
pub use census::{BinaryIndex, DexIndex, ReferenceCensus, VecIndex};
pub use config::{Configuration, Settings};
pub use entry::{EntryPointHandle, EntryPointProvider, EntryPointSynthesizer};
pub use error::{AppScopeError, Result};
pub use mode::RunMode;
