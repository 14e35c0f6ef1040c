use serde::Serialize;

use crate::collab::lookup::MaterialId;
use crate::kind::JobKind;
use crate::range::TaskRange;

/// One acknowledged submission: immutable once created
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub material_id: MaterialId,
    /// The formula whose expansion admitted this material; `None` when the
    /// material was selected directly by id
    pub formula: Option<String>,
    pub kind: JobKind,
    pub range: TaskRange,
}

impl LedgerRecord {
    pub fn new(
        material_id: MaterialId,
        formula: Option<String>,
        kind: JobKind,
        range: TaskRange,
    ) -> LedgerRecord {
        LedgerRecord {
            material_id,
            formula,
            kind,
            range,
        }
    }
}

/// Append-only within one submission run, insertion order significant
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProvenanceLedger {
    records: Vec<LedgerRecord>,
}

/// One row of the derived tabular view, with the range in its
/// `"<low>-<high>"` string form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub range: String,
    pub formula: String,
    pub material_id: String,
    pub job_kind: String,
}

impl ProvenanceLedger {
    pub fn new() -> ProvenanceLedger {
        ProvenanceLedger::default()
    }

    pub fn push(&mut self, record: LedgerRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.records
            .iter()
            .map(|record| ReportRow {
                range: record.range.to_string(),
                formula: record.formula.clone().unwrap_or_else(|| "-".to_string()),
                material_id: record.material_id.to_string(),
                job_kind: record.kind.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(low: u64, high: u64) -> LedgerRecord {
        LedgerRecord::new(
            "mp-594".parse().unwrap(),
            Some("NiS".to_string()),
            JobKind::Dielectric,
            TaskRange::new(low, high).unwrap(),
        )
    }

    #[test]
    fn records_are_returned_in_insertion_order() {
        let mut ledger = ProvenanceLedger::new();
        ledger.push(record(100, 104));
        ledger.push(record(105, 109));
        let lows: Vec<u64> = ledger.records().iter().map(|r| r.range.low()).collect();
        assert_eq!(lows, vec![100, 105]);
    }

    #[test]
    fn records_is_idempotent() {
        let mut ledger = ProvenanceLedger::new();
        ledger.push(record(100, 104));
        assert_eq!(ledger.records(), ledger.records());
        assert_eq!(ledger.rows(), ledger.rows());
    }

    #[test]
    fn rows_use_the_range_string_form() {
        let mut ledger = ProvenanceLedger::new();
        ledger.push(record(100, 104));
        let rows = ledger.rows();
        assert_eq!(rows[0].range, "100-104");
        assert_eq!(rows[0].formula, "NiS");
        assert_eq!(rows[0].material_id, "mp-594");
        assert_eq!(rows[0].job_kind, "dielectric");
    }

    #[test]
    fn missing_formula_renders_as_a_dash() {
        let mut ledger = ProvenanceLedger::new();
        ledger.push(LedgerRecord::new(
            "mp-149".parse().unwrap(),
            None,
            JobKind::Elastic,
            TaskRange::new(1, 2).unwrap(),
        ));
        assert_eq!(ledger.rows()[0].formula, "-");
    }
}
