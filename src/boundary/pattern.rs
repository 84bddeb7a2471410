// Application pattern model
//
// Users describe the application with a list of patterns:
// ```
// com.example.Main     exact class
// com.example.*        every class directly inside com.example
// com.example.**       com.example and every nested package
// **                   the default (unnamed) package
// ```

use crate::error::{AppScopeError, Result};
use regex::Regex;
use tracing::debug;

/// How a single pattern decides membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Case-insensitive equality with the full class name
    ExactClass,
    /// Case-insensitive equality with the class's package
    Package { prefix: String },
    /// Case-sensitive prefix test on the full class name
    SuperPackage { prefix: String },
    /// Class has no package
    DefaultPackage,
}

/// One parsed application pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    /// The pattern as the user wrote it
    pub source: String,
}

impl Rule {
    /// Classify one raw entry. `**` wins over `.**`, which wins over `.*`.
    pub fn parse(entry: &str) -> Result<Self> {
        if entry.trim().is_empty() {
            return Err(AppScopeError::configuration("empty application pattern"));
        }

        let kind = if entry == "**" {
            RuleKind::DefaultPackage
        } else if let Some(package) = entry.strip_suffix(".**") {
            // keep the trailing dot so `a.b.**` does not match `a.bc.D`
            RuleKind::SuperPackage {
                prefix: format!("{}.", package),
            }
        } else if let Some(stripped) = entry.strip_suffix(".*") {
            RuleKind::Package {
                prefix: stripped.to_string(),
            }
        } else {
            RuleKind::ExactClass
        };

        Ok(Self {
            kind,
            source: entry.to_string(),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            RuleKind::ExactClass => "class",
            RuleKind::Package { .. } => "package",
            RuleKind::SuperPackage { .. } => "super-package",
            RuleKind::DefaultPackage => "default-package",
        }
    }
}

/// Ordered, immutable set of rules built from the user's pattern list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse every raw pattern. A single bad entry fails the whole set.
    pub fn parse<S: AsRef<str>>(raw_patterns: &[S]) -> Result<Self> {
        if raw_patterns.is_empty() {
            return Err(AppScopeError::configuration(
                "missing option r : no application patterns given",
            ));
        }

        let rules = raw_patterns
            .iter()
            .map(|p| Rule::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let stats = RuleSetStats::of(&rules);
        debug!("Parsed application patterns: {}", stats);

        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn stats(&self) -> RuleSetStats {
        RuleSetStats::of(&self.rules)
    }
}

/// Number of rules per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetStats {
    pub classes: usize,
    pub packages: usize,
    pub super_packages: usize,
    pub default_package: usize,
}

impl RuleSetStats {
    fn of(rules: &[Rule]) -> Self {
        let mut stats = Self::default();
        for rule in rules {
            match rule.kind {
                RuleKind::ExactClass => stats.classes += 1,
                RuleKind::Package { .. } => stats.packages += 1,
                RuleKind::SuperPackage { .. } => stats.super_packages += 1,
                RuleKind::DefaultPackage => stats.default_package += 1,
            }
        }
        stats
    }
}

impl std::fmt::Display for RuleSetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} classes, {} packages, {} super-packages, {} default-package",
            self.classes, self.packages, self.super_packages, self.default_package
        )
    }
}

/// Build the alternation used for bulk scanning of a dex index.
///
/// Each entry becomes a non-capturing group, `.` is escaped and any run of
/// `*` expands to `.*`. Everything else passes through as regex syntax, so an
/// entry like `com.app.[AB]` is a character class. The result is unanchored.
pub fn to_filter_pattern<S: AsRef<str>>(raw_patterns: &[S]) -> Result<String> {
    if raw_patterns.is_empty() {
        return Err(AppScopeError::configuration(
            "missing option r : no application patterns given",
        ));
    }

    let groups: Vec<String> = raw_patterns
        .iter()
        .map(|entry| format!("(?:{})", expand_wildcards(entry.as_ref())))
        .collect();

    Ok(groups.join("|"))
}

fn expand_wildcards(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len() + 8);
    let mut chars = entry.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => out.push_str(r"\."),
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push_str(".*");
            }
            _ => out.push(c),
        }
    }
    out
}

/// Compiled bulk filter for the reference census
#[derive(Debug, Clone)]
pub struct FilterPattern {
    regex: Regex,
}

impl FilterPattern {
    pub fn new<S: AsRef<str>>(raw_patterns: &[S]) -> Result<Self> {
        let pattern = to_filter_pattern(raw_patterns)?;
        let regex = Regex::new(&pattern).map_err(|source| AppScopeError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of non-overlapping matches inside `text`
    pub fn count_matches(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}
