// Application/library boundary
//
// - pattern: parses user patterns into rules and the bulk census filter
// - classifier: answers "application or library" for a class name
// - dynamic: reflectively loaded classes, split along the boundary

mod classifier;
mod dynamic;
mod pattern;

pub use classifier::{
    is_application, is_library, BoundaryClassifier, ClassDescriptor, ClassIdentity, ClassRegistry,
};
pub use dynamic::DynamicClasses;
pub use pattern::{to_filter_pattern, FilterPattern, Rule, RuleKind, RuleSet, RuleSetStats};
