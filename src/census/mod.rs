//! Reference census
//!
//! Counts how many declared classes and referenced methods of a binary index
//! fall inside the application, using the bulk filter pattern rather than the
//! per-rule classifier. The two can disagree on corner cases: the filter
//! scans for every occurrence inside a type name, the classifier compares
//! whole names.

mod descriptor;
mod dex;

pub use descriptor::{owner_of_method, type_name_of_descriptor};
pub use dex::DexIndex;

use crate::boundary::FilterPattern;
use crate::error::Result;
use tracing::debug;

/// A platform-specific listing of declared classes and methods
pub trait BinaryIndex {
    /// Class type descriptors, e.g. `Lcom/app/A;`
    fn declared_classes(&self) -> &[String];

    /// Method references, e.g. `Lcom/app/A;->run()V`
    fn declared_methods(&self) -> &[String];
}

/// Index held in memory
#[derive(Debug, Clone, Default)]
pub struct VecIndex {
    pub classes: Vec<String>,
    pub methods: Vec<String>,
}

impl VecIndex {
    pub fn new<C, M>(classes: C, methods: M) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

impl BinaryIndex for VecIndex {
    fn declared_classes(&self) -> &[String] {
        &self.classes
    }

    fn declared_methods(&self) -> &[String] {
        &self.methods
    }
}

/// Counts application references in a binary index
#[derive(Debug, Clone)]
pub struct ReferenceCensus {
    filter: FilterPattern,
}

impl ReferenceCensus {
    pub fn new(filter: FilterPattern) -> Self {
        Self { filter }
    }

    pub fn from_patterns<S: AsRef<str>>(raw_patterns: &[S]) -> Result<Self> {
        Ok(Self::new(FilterPattern::new(raw_patterns)?))
    }

    pub fn filter(&self) -> &FilterPattern {
        &self.filter
    }

    /// Every match counts, so one class can contribute more than once
    pub fn count_application_classes<I: BinaryIndex + ?Sized>(&self, index: &I) -> usize {
        let count: usize = index
            .declared_classes()
            .iter()
            .map(|d| self.filter.count_matches(&type_name_of_descriptor(d)))
            .sum();
        debug!(
            "{} application class matches among {} classes",
            count,
            index.declared_classes().len()
        );
        count
    }

    pub fn count_application_methods<I: BinaryIndex + ?Sized>(&self, index: &I) -> usize {
        let count: usize = index
            .declared_methods()
            .iter()
            .map(|m| {
                let owner = type_name_of_descriptor(owner_of_method(m));
                self.filter.count_matches(&owner)
            })
            .sum();
        debug!(
            "{} application method matches among {} methods",
            count,
            index.declared_methods().len()
        );
        count
    }
}
