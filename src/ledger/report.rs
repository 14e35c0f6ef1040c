use chrono::Utc;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::ledger::record::{ProvenanceLedger, ReportRow};

/// Rendering context for the provenance report
#[derive(Serialize)]
struct ReportContext {
    time_now: String,
    rows: Vec<ReportRow>,
}

/// Render the provenance table using TinyTemplate
pub fn render(ledger: &ProvenanceLedger) -> String {
    /// included report template
    static REPORT: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/templates/report.txt"
    ));
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("report", REPORT).expect("Template");

    let context = ReportContext {
        time_now: Utc::now().to_string(),
        rows: ledger.rows(),
    };
    tt.render("report", &context).expect("Rendered report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::JobKind;
    use crate::ledger::record::LedgerRecord;
    use crate::range::TaskRange;

    #[test]
    fn report_contains_one_line_per_record() {
        let mut ledger = ProvenanceLedger::new();
        ledger.push(LedgerRecord::new(
            "mp-594".parse().unwrap(),
            Some("NiS".to_string()),
            JobKind::Dielectric,
            TaskRange::new(100, 104).unwrap(),
        ));
        ledger.push(LedgerRecord::new(
            "mp-1547".parse().unwrap(),
            Some("NiS".to_string()),
            JobKind::Dielectric,
            TaskRange::new(105, 109).unwrap(),
        ));

        let report = render(&ledger);
        assert!(report.contains("100-104: NiS mp-594  dielectric"));
        assert!(report.contains("105-109: NiS mp-1547  dielectric"));
    }
}
