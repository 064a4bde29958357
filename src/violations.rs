//! Violation subsets and the per-run aggregator that collects them.

use crate::record::{Dataset, Record};

/// Records failing one rule, labeled for reporting.
///
/// Borrows records from the [`Dataset`]; never owns or copies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationSubset<'d> {
    label: String,
    records: Vec<&'d Record>,
}

impl<'d> ViolationSubset<'d> {
    /// Collect the records matching `failed`, in dataset order.
    /// Returns `None` when nothing fails, so empty subsets are never recorded.
    pub fn collect(
        label: impl Into<String>,
        dataset: &'d Dataset,
        mut failed: impl FnMut(&Record) -> bool,
    ) -> Option<Self> {
        let records: Vec<&'d Record> = dataset.records().iter().filter(|r| failed(r)).collect();
        if records.is_empty() {
            None
        } else {
            Some(Self {
                label: label.into(),
                records,
            })
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[&'d Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Insertion-ordered mapping from label to subset for one run.
#[derive(Debug, Default)]
pub struct Violations<'d> {
    entries: Vec<ViolationSubset<'d>>,
}

impl<'d> Violations<'d> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subset. An existing label is overwritten in place, keeping
    /// its original position.
    pub fn record(&mut self, subset: ViolationSubset<'d>) {
        match self.entries.iter_mut().find(|e| e.label == subset.label) {
            Some(existing) => *existing = subset,
            None => self.entries.push(subset),
        }
    }

    /// Subsets in insertion order.
    pub fn entries(&self) -> &[ViolationSubset<'d>] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&ViolationSubset<'d>> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
