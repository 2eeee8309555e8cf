// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event filter deciding which lifecycle events enter the pipeline.

use crate::event::{JobEvent, JobStatus};

/// Conjunctive match conditions, fixed at startup from configuration.
///
/// `matches` is pure and total: an event missing any inspected field fails
/// the corresponding condition instead of erroring. Recognition and
/// processing stay decoupled; this type never looks at reasons, attempts,
/// or anything else the processor derives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub source: String,
    pub detail_type: String,
    pub status: JobStatus,
    pub job_name_prefix: String,
}

impl MatchCriteria {
    /// True when all four conditions hold: source equality, detail-type
    /// equality, exact status equality, and job-name prefix.
    pub fn matches(&self, event: &JobEvent) -> bool {
        let source_ok = event.source.as_deref() == Some(self.source.as_str());
        let type_ok = event.detail_type.as_deref() == Some(self.detail_type.as_str());
        let Some(detail) = &event.detail else {
            return false;
        };
        let status_ok = detail.status.as_ref() == Some(&self.status);
        let name_ok = detail
            .job_name
            .as_deref()
            .is_some_and(|name| name.starts_with(self.job_name_prefix.as_str()));
        source_ok && type_ok && status_ok && name_ok
    }
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;
