use super::pattern::{Rule, RuleKind, RuleSet};
use crate::error::Result;

/// A fully qualified class name split into package and simple name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassIdentity<'a> {
    pub name: &'a str,
    /// Everything before the last `.`, empty for the default package
    pub package: &'a str,
}

impl<'a> ClassIdentity<'a> {
    pub fn of(name: &'a str) -> Self {
        let package = name.rfind('.').map(|idx| &name[..idx]).unwrap_or("");
        Self { name, package }
    }

    pub fn in_default_package(&self) -> bool {
        self.package.is_empty()
    }
}

/// Structured class description handed out by a class registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDescriptor {
    pub package: String,
    pub simple_name: String,
}

impl ClassDescriptor {
    pub fn from_name(name: &str) -> Self {
        let identity = ClassIdentity::of(name);
        let simple_name = if identity.package.is_empty() {
            name.to_string()
        } else {
            name[identity.package.len() + 1..].to_string()
        };
        Self {
            package: identity.package.to_string(),
            simple_name,
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package, self.simple_name)
        }
    }
}

/// Resolves class names to descriptors (e.g. a call-graph's class table)
pub trait ClassRegistry {
    fn resolve(&self, name: &str) -> ClassDescriptor;
}

/// Decides whether a class is part of the application or the library.
///
/// A class is application code when any rule matches it. Nothing matching is
/// not an error, it simply means library.
#[derive(Debug, Clone)]
pub struct BoundaryClassifier {
    rules: RuleSet,
}

impl BoundaryClassifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn from_patterns<S: AsRef<str>>(raw_patterns: &[S]) -> Result<Self> {
        Ok(Self::new(RuleSet::parse(raw_patterns)?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn is_application(&self, class_name: &str) -> bool {
        is_application(class_name, &self.rules)
    }

    pub fn is_library(&self, class_name: &str) -> bool {
        !self.is_application(class_name)
    }

    pub fn is_application_descriptor(&self, descriptor: &ClassDescriptor) -> bool {
        let name = descriptor.qualified_name();
        let identity = ClassIdentity {
            name: &name,
            package: &descriptor.package,
        };
        self.rules.iter().any(|rule| rule_matches(rule, &identity))
    }

    pub fn is_library_descriptor(&self, descriptor: &ClassDescriptor) -> bool {
        !self.is_application_descriptor(descriptor)
    }

    /// Classify through the registry's view of the class
    pub fn is_application_in<R: ClassRegistry + ?Sized>(&self, class_name: &str, registry: &R) -> bool {
        self.is_application_descriptor(&registry.resolve(class_name))
    }

    pub fn is_library_in<R: ClassRegistry + ?Sized>(&self, class_name: &str, registry: &R) -> bool {
        !self.is_application_in(class_name, registry)
    }

    /// Split names into (application, library), keeping input order
    pub fn partition<'n, I>(&self, names: I) -> (Vec<&'n str>, Vec<&'n str>)
    where
        I: IntoIterator<Item = &'n str>,
    {
        names.into_iter().partition(|name| self.is_application(name))
    }
}

/// True when any rule in `rules` matches `class_name`
pub fn is_application(class_name: &str, rules: &RuleSet) -> bool {
    let identity = ClassIdentity::of(class_name);
    rules.iter().any(|rule| rule_matches(rule, &identity))
}

pub fn is_library(class_name: &str, rules: &RuleSet) -> bool {
    !is_application(class_name, rules)
}

fn rule_matches(rule: &Rule, class: &ClassIdentity<'_>) -> bool {
    match &rule.kind {
        RuleKind::ExactClass => eq_ignore_case(&rule.source, class.name),
        RuleKind::Package { prefix } => eq_ignore_case(prefix, class.package),
        // case-sensitive on purpose, unlike the other kinds
        RuleKind::SuperPackage { prefix } => class.name.starts_with(prefix.as_str()),
        RuleKind::DefaultPackage => class.in_default_package(),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}
