use tracing::{debug, warn};

use crate::calculator::{compute_emissions, EmissionsResult};
use crate::record::{ActivityField, ActivityRecord};

/// An in-progress questionnaire: the record being edited plus its result,
/// recomputed after every mutation so the two never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSession {
    record: ActivityRecord,
    result: EmissionsResult,
}

impl AuditSession {
    pub fn new(record: ActivityRecord) -> Self {
        let result = compute_emissions(&record);
        Self { record, result }
    }

    pub fn record(&self) -> &ActivityRecord {
        &self.record
    }

    pub fn result(&self) -> &EmissionsResult {
        &self.result
    }

    /// Apply one field edit and recompute.
    pub fn edit(&mut self, field: ActivityField, raw: &str) -> &EmissionsResult {
        self.record.apply_edit(field, raw);
        self.recompute();
        debug!(field = field.key(), total_tonnes = self.result.total_tonnes, "recomputed");
        &self.result
    }

    /// Edit by raw form key. Unknown keys leave the session untouched.
    pub fn edit_key(&mut self, key: &str, raw: &str) -> &EmissionsResult {
        match key.parse::<ActivityField>() {
            Ok(field) => self.edit(field, raw),
            Err(e) => {
                warn!("{e}, edit ignored");
                &self.result
            }
        }
    }

    /// Swap in a whole record, e.g. one loaded from the store.
    pub fn replace(&mut self, record: ActivityRecord) -> &EmissionsResult {
        self.record = record;
        self.recompute();
        &self.result
    }

    pub fn into_parts(self) -> (ActivityRecord, EmissionsResult) {
        (self.record, self.result)
    }

    fn recompute(&mut self) {
        self.result = compute_emissions(&self.record);
    }
}
