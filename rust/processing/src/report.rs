// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operator outcomes and user-facing reports.

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// A message shown to the user after an operator runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub level: ReportLevel,
    pub message: String,
}

impl Report {
    pub fn new(level: ReportLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ReportLevel::Info, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorStatus {
    Finished,
    Cancelled,
}

/// Status plus the reports an operator emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorResult {
    pub status: OperatorStatus,
    pub reports: Vec<Report>,
}

impl OperatorResult {
    pub fn finished() -> Self {
        Self {
            status: OperatorStatus::Finished,
            reports: Vec::new(),
        }
    }

    pub fn cancelled(report: Report) -> Self {
        Self {
            status: OperatorStatus::Cancelled,
            reports: vec![report],
        }
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.status == OperatorStatus::Finished
    }
}

impl From<Error> for OperatorResult {
    fn from(err: Error) -> Self {
        Self::cancelled(err.report())
    }
}
