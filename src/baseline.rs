//! Baselines: findings accepted once and hidden from later runs.
//!
//! A baseline file is JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "findings": ["LongMethod:Service.kt$Service.run"]
//! }
//! ```
//!
//! Entries are [`Finding::baseline_id`]s, which ignore line numbers so that
//! unrelated edits do not resurface accepted findings.

use crate::error::{Error, Result};
use crate::finding::Finding;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const BASELINE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    findings: BTreeSet<String>,
}

fn default_version() -> u32 {
    BASELINE_VERSION
}

impl Baseline {
    pub fn from_findings<'a, I>(findings: I) -> Self
    where
        I: IntoIterator<Item = &'a Finding>,
    {
        Self {
            version: BASELINE_VERSION,
            findings: findings.into_iter().map(Finding::baseline_id).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::BaselineIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| Error::BaselineFormat {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| Error::BaselineFormat {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, content + "\n").map_err(|e| Error::BaselineIo {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn contains(&self, finding: &Finding) -> bool {
        self.findings.contains(&finding.baseline_id())
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}
