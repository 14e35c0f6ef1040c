use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use matbatch::collab::fixture::{FixtureBook, SequentialStore};
use matbatch::collab::graph::PresetBuilder;
use matbatch::collab::lookup::{ApiKey, MpClient};
use matbatch::collab::store::{JobStore, LaunchpadCli};
use matbatch::db;
use matbatch::ledger::report;
use matbatch::reconcile::reconcile;
use matbatch::request::message::RequestFile;
use matbatch::request::schema::load_schema;
use matbatch::submit::batch::Submitter;
use matbatch::submit::outcome::{AdmissionOutcome, BatchResult};
use matbatch::WorkingDirectory;

#[derive(Parser)]
#[command(
    name = "matbatch",
    about = "Cap-enforced batch submission of materials workflows with range-indexed provenance"
)]
struct Cli {
    /// Directory holding the ledger database
    #[arg(long, default_value = ".", global = true)]
    db_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a batch of materials under an admission cap
    Submit(SubmitArgs),
    /// Map failed sub-task ids back to the materials that produced them
    Reconcile(ReconcileArgs),
    /// Render the provenance table from the persisted ledger
    Report,
}

#[derive(Args)]
struct SubmitArgs {
    /// Path to a batch request message (JSON)
    #[arg(long)]
    request: PathBuf,
    /// Materials API key; falls back to the MP_API_KEY environment variable
    #[arg(long)]
    api_key: Option<String>,
    /// Base URL of the materials API
    #[arg(long, default_value = MpClient::DEFAULT_BASE_URL)]
    api_url: String,
    /// Launchpad command used to submit job graphs
    #[arg(long, default_value = "lpad")]
    lpad: PathBuf,
    /// Use a local fixture book instead of the HTTP lookup service and the
    /// launchpad command
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

#[derive(Args)]
struct ReconcileArgs {
    /// Failed sub-task ids reported by the job store
    #[arg(long, value_delimiter = ',')]
    failed: Vec<u64>,
    /// Launchpad command used to pull failed ids when --failed is not given
    #[arg(long)]
    lpad: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("starting up");

    let wd = WorkingDirectory { path: cli.db_dir };
    match cli.command {
        Command::Submit(args) => run_submit(&wd, args),
        Command::Reconcile(args) => run_reconcile(&wd, args),
        Command::Report => run_report(&wd),
    }
}

fn run_submit(wd: &WorkingDirectory, args: SubmitArgs) -> Result<()> {
    let request_file = RequestFile {
        path: args.request,
        compiled_schema: load_schema(),
    };
    let batch = request_file.read()?;
    let conn = db::open::open_db(wd).context("can't open the ledger database")?;

    let result: BatchResult = match &args.fixtures {
        Some(path) => {
            let book = FixtureBook::from_path(path)?;
            let store = SequentialStore::new(1);
            Submitter::new(&book, &PresetBuilder, &store, batch.policy.clone(), batch.cap)
                .submit_batch(&batch.selectors, batch.job_kind, &batch.base_config)
        }
        None => {
            let api_key = args
                .api_key
                .or_else(|| env::var("MP_API_KEY").ok())
                .map(ApiKey::new)
                .context("an API key is required: pass --api-key or set MP_API_KEY")?;
            let client = MpClient::new(&args.api_url, api_key)?;
            let store = LaunchpadCli::new(args.lpad);
            Submitter::new(
                &client,
                &PresetBuilder,
                &store,
                batch.policy.clone(),
                batch.cap,
            )
            .submit_batch(&batch.selectors, batch.job_kind, &batch.base_config)
        }
    };

    db::save::save_ledger(&conn, &result.ledger).context("can't persist the ledger")?;
    print!("{}", report::render(&result.ledger));

    match result.outcome {
        AdmissionOutcome::Complete { admitted } => {
            info!("all selectors processed, {admitted} workflows submitted");
            Ok(())
        }
        AdmissionOutcome::CapExceeded {
            selector,
            would_admit,
            cap,
            ..
        } => {
            warn!(
                "batch incomplete: admitting {selector} (+{would_admit}) would exceed the cap \
                 ({cap}); wait for running workflows to finish and resume with {selector}"
            );
            Ok(())
        }
        AdmissionOutcome::Aborted {
            selector_index,
            material_id,
            error,
        } => {
            let at = match material_id {
                Some(id) => format!("selector {selector_index} ({id})"),
                None => format!("selector {selector_index}"),
            };
            Err(anyhow!(error).context(format!("batch aborted at {at}, partial ledger saved")))
        }
    }
}

fn run_reconcile(wd: &WorkingDirectory, args: ReconcileArgs) -> Result<()> {
    let conn = db::open::open_db(wd).context("can't open the ledger database")?;
    let ledger = db::load::load_ledger(&conn)?;

    let failed = if !args.failed.is_empty() {
        args.failed
    } else if let Some(program) = args.lpad {
        LaunchpadCli::new(program)
            .report_failed()
            .context("can't pull failed ids from the job store")?
    } else {
        bail!("pass --failed or --lpad to source failed task ids");
    };

    let outcome = reconcile(&ledger, &failed)?;
    for (task_id, material_id) in &outcome.matched {
        println!("{task_id}: {material_id}");
    }
    for task_id in &outcome.unmatched {
        println!("{task_id}: unmatched");
    }
    Ok(())
}

fn run_report(wd: &WorkingDirectory) -> Result<()> {
    let conn = db::open::open_db(wd).context("can't open the ledger database")?;
    let ledger = db::load::load_ledger(&conn)?;
    print!("{}", report::render(&ledger));
    Ok(())
}
