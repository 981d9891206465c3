//! Manual override edges for the call graph.
//!
//! Static extraction misses indirect calls (dynamic dispatch, callbacks,
//! function tables). An override document patches those gaps: a JSON object
//! mapping caller name to an ordered list of callee names. Overrides are
//! purely additive; callee names need not be indexed symbols.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::OverrideError;

/// Parsed override document: caller -> ordered callee list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl OverrideMap {
    /// Load and validate an override document from a JSON file.
    ///
    /// A missing or malformed file is fatal for the call: silently ignoring
    /// overrides would hide intended edges.
    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| OverrideError::Unreadable {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|reason| OverrideError::Malformed {
            path: display,
            reason,
        })
    }

    /// Parse an override document from JSON text.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| e.to_string())?;
        let obj = value
            .as_object()
            .ok_or_else(|| "expected a JSON object of caller -> [callees]".to_string())?;

        let mut entries = BTreeMap::new();
        for (caller, callees) in obj {
            let list = callees
                .as_array()
                .ok_or_else(|| format!("callees of {:?} must be an array", caller))?;
            let mut names = Vec::with_capacity(list.len());
            for callee in list {
                let name = callee
                    .as_str()
                    .ok_or_else(|| format!("callees of {:?} must be strings", caller))?;
                names.push(name.to_string());
            }
            entries.insert(caller.clone(), names);
        }
        Ok(Self { entries })
    }

    /// Iterate entries as (caller, callees) in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
