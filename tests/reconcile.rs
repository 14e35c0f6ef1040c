use serde_json::json;

use matbatch::collab::fixture::{FixtureBook, SequentialStore};
use matbatch::collab::graph::PresetBuilder;
use matbatch::db;
use matbatch::kind::JobKind;
use matbatch::ledger::report;
use matbatch::policy::{ConfigPolicy, JobConfiguration};
use matbatch::range::TaskRange;
use matbatch::reconcile::reconcile;
use matbatch::request::message::EntitySelector;
use matbatch::submit::batch::Submitter;
use matbatch::WorkingDirectory;

fn submitted_ledger() -> matbatch::ledger::record::ProvenanceLedger {
    let book = FixtureBook::from_value(json!({
        "materials": [
            { "material_id": "mp-594", "formula": "NiS", "num_sites": 4 },
            { "material_id": "mp-1547", "formula": "NiS", "num_sites": 8 },
        ]
    }))
    .expect("fixture book");
    let store = SequentialStore::new(100);
    let submitter = Submitter::new(&book, &PresetBuilder, &store, ConfigPolicy::default(), 10);
    let result = submitter.submit_batch(
        &[EntitySelector::Formula {
            formula: "NiS".to_string(),
        }],
        JobKind::Dielectric,
        &JobConfiguration::new(),
    );
    assert!(result.outcome.is_complete());
    result.ledger
}

#[test]
fn ledger_survives_a_save_load_cycle() {
    let dir = tempfile::tempdir().expect("temp dir");
    let wd = WorkingDirectory {
        path: dir.path().to_path_buf(),
    };
    let ledger = submitted_ledger();

    let conn = db::open::open_db(&wd).expect("open db");
    db::save::save_ledger(&conn, &ledger).expect("save ledger");
    let loaded = db::load::load_ledger(&conn).expect("load ledger");

    assert_eq!(loaded, ledger);
}

#[test]
fn failed_ids_reconcile_through_the_persisted_ledger() {
    let dir = tempfile::tempdir().expect("temp dir");
    let wd = WorkingDirectory {
        path: dir.path().to_path_buf(),
    };

    {
        let conn = db::open::open_db(&wd).expect("open db");
        db::save::save_ledger(&conn, &submitted_ledger()).expect("save ledger");
    }

    // a later process opens the same database and reconciles store failures
    let conn = db::open::open_db(&wd).expect("reopen db");
    let ledger = db::load::load_ledger(&conn).expect("load ledger");

    // dielectric preset is two tasks per material: 100-101 and 102-103
    let outcome = reconcile(&ledger, &[101, 103, 999]).expect("reconcile");
    assert_eq!(outcome.matched[&101].as_str(), "mp-594");
    assert_eq!(outcome.matched[&103].as_str(), "mp-1547");
    assert_eq!(outcome.unmatched, vec![999]);
}

#[test]
fn report_renders_the_persisted_table() {
    let ledger = submitted_ledger();
    let rendered = report::render(&ledger);
    assert!(rendered.contains("100-101: NiS mp-594  dielectric"));
    assert!(rendered.contains("102-103: NiS mp-1547  dielectric"));
}

#[test]
fn persisted_range_strings_round_trip() {
    let ledger = submitted_ledger();
    for row in ledger.rows() {
        let parsed: TaskRange = row.range.parse().expect("range string");
        assert_eq!(parsed.to_string(), row.range);
    }
}
