//! `orcatax` command-line front end
//!
//! ```bash
//! orcatax generate --count 10
//! orcatax generate --query jones --type llc --status "waiting docs"
//! orcatax --seed 7 report --json
//! orcatax add "Dana Cruz" --type s-corp --filing "married joint"
//! orcatax profile C0001
//! orcatax export C0001 --out-dir ./summaries
//! orcatax efile C0002 --review-first --out-dir ./returns
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use orcatax_core_rs::core::money::{format_usd, micros_to_cents};
use orcatax_core_rs::document::{render_summary, PdfRenderer};
use orcatax_core_rs::metrics::{
    compute_tax_profile, forecast_refunds, summarize, RiskLevel,
};
use orcatax_core_rs::models::{ClientType, FilingStatus, NewClient};
use orcatax_core_rs::reports::{filter_clients, kpis, Report};
use orcatax_core_rs::workflows::{EFileWorkflow, WorkflowRunner};
use orcatax_core_rs::{
    ChangeCause, Client, ClientStatus, ClientStore, Command, Event, PracticeConfig, RngManager,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orcatax")]
#[command(about = "Deterministic tax-practice demo engine")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of clients to generate (overrides the config file)
    #[arg(long, global = true)]
    count: Option<usize>,

    /// Roster seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the generated roster
    Generate {
        /// Show at most this many clients
        #[arg(long)]
        limit: Option<usize>,

        /// Case-insensitive name or id substring
        #[arg(long, default_value = "")]
        query: String,

        /// Only this client type, e.g. "LLC" or "s-corp"
        #[arg(long = "type", value_parser = ClientType::from_label)]
        client_type: Option<ClientType>,

        /// Only this status, e.g. "Waiting Docs" or "payment_due"
        #[arg(long, value_parser = ClientStatus::from_label)]
        status: Option<ClientStatus>,
    },

    /// Add a client through the manual form
    Add {
        name: String,

        #[arg(long = "type", value_parser = ClientType::from_label, default_value = "Individual")]
        client_type: ClientType,

        #[arg(long, value_parser = FilingStatus::from_label, default_value = "Single")]
        filing: FilingStatus,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Dashboard KPIs and the canned reports
    Report {
        /// Only this report
        #[arg(long, value_enum)]
        only: Option<ReportChoice>,
    },

    /// Tax profile, advisory and refund forecast of one client
    Profile { client_id: String },

    /// Write a client's PDF summary
    Export {
        client_id: String,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Run a mock IRS e-file for one client
    Efile {
        client_id: String,

        /// Move the client to Review first
        #[arg(long, default_value_t = false)]
        review_first: bool,

        /// Seed of the acknowledgement id
        #[arg(long, default_value_t = 0)]
        ack_seed: u32,

        /// Write the mock Form 1040 here
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ReportChoice {
    Workload,
    HighRisk,
    Mix,
}

impl From<ReportChoice> for Report {
    fn from(value: ReportChoice) -> Self {
        match value {
            ReportChoice::Workload => Report::WorkloadByStatus,
            ReportChoice::HighRisk => Report::HighRiskClients,
            ReportChoice::Mix => Report::RefundVsBalanceMix,
        }
    }
}

fn load_config(cli: &Cli) -> Result<PracticeConfig> {
    let mut config = match &cli.config {
        Some(path) => PracticeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PracticeConfig::default(),
    };
    if let Some(count) = cli.count {
        config.dataset.count = count;
    }
    if let Some(seed) = cli.seed {
        config.dataset.seed = seed;
    }
    Ok(config)
}

fn find<'a>(store: &'a ClientStore, client_id: &str) -> Result<&'a Client> {
    store
        .get(client_id)
        .with_context(|| format!("no client {} in this roster", client_id))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_document(out_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(file_name);
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn print_client_row(c: &Client) {
    println!(
        "{}  {:<20} {:<12} {:<18} {:>12}  {:<13} risk {:>2}",
        c.id(),
        c.name(),
        c.client_type(),
        c.filing_status(),
        format_usd(c.income()),
        c.status(),
        c.risk_score()
    );
}

struct ListFilter {
    limit: Option<usize>,
    query: String,
    client_type: Option<ClientType>,
    status: Option<ClientStatus>,
}

fn cmd_generate(store: &ClientStore, filter: ListFilter, as_json: bool) -> Result<()> {
    let snapshot = store.snapshot();
    let mut shown = filter_clients(
        snapshot.clients(),
        &filter.query,
        filter.client_type,
        filter.status,
    );
    if let Some(limit) = filter.limit {
        shown.truncate(limit);
    }

    if as_json {
        return print_json(&json!({
            "fingerprint": snapshot.fingerprint()?,
            "clients": shown,
        }));
    }
    for c in shown {
        print_client_row(c);
    }
    Ok(())
}

fn cmd_add(store: &mut ClientStore, form: NewClient, as_json: bool) -> Result<()> {
    let events = store.apply(Command::AddClient(form))?;
    let Some(Event::ClientAdded { client_id, .. }) = events.first() else {
        bail!("add produced no client");
    };
    let client = find(store, client_id)?;

    if as_json {
        return print_json(&serde_json::to_value(client)?);
    }
    print_client_row(client);
    Ok(())
}

fn cmd_report(store: &ClientStore, only: Option<ReportChoice>, as_json: bool) -> Result<()> {
    let snapshot = store.snapshot();
    let clients = snapshot.clients();
    let reports: Vec<Report> = match only {
        Some(choice) => vec![choice.into()],
        None => Report::ALL.to_vec(),
    };
    let headline = kpis(clients);

    if as_json {
        let rendered: Vec<_> = reports
            .iter()
            .map(|r| json!({ "title": r.title(), "rows": r.rows(clients) }))
            .collect();
        return print_json(&json!({ "kpis": headline, "reports": rendered }));
    }

    println!(
        "Clients {} | Filed {} | Waiting docs {} | Avg refund {}",
        headline.total,
        headline.filed,
        headline.waiting,
        format_usd(headline.avg_refund)
    );
    for report in reports {
        println!("\n{}", report);
        for row in report.rows(clients) {
            println!("  {:<32} {:>6}", row.label, row.value);
        }
    }
    Ok(())
}

fn cmd_profile(store: &ClientStore, config: &PracticeConfig, client_id: &str, as_json: bool) -> Result<()> {
    let client = find(store, client_id)?;
    let tax = compute_tax_profile(client, &config.tax);
    let advisory = summarize(client);
    let forecast = forecast_refunds(client, &mut RngManager::new(config.dataset.seed));

    if as_json {
        return print_json(&json!({
            "client": client,
            "tax": tax,
            "breakdown": tax.breakdown(),
            "advisory": advisory,
            "forecast": forecast,
        }));
    }

    println!("{} ({}) - {}", client.name(), client.id(), client.status());
    println!(
        "Risk: {} ({})",
        RiskLevel::from_score(client.risk_score()),
        client.risk_score()
    );
    println!("\nTax");
    for line in tax.breakdown() {
        println!("  {:<22} {:>12}", line.label, format_usd(line.dollars * 100));
    }
    println!("  {:<22} {:>12}", "Total", format_usd(micros_to_cents(tax.total_tax)));
    println!(
        "  {:<22} {:>12}",
        "Estimated refund",
        format_usd(micros_to_cents(tax.estimated_refund))
    );
    println!("  {:<22} {:>11}%", "Efficiency", tax.efficiency);

    println!("\nAdvisory");
    for bullet in &advisory.bullets {
        println!("  - {}", bullet);
    }
    for (i, action) in advisory.actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }

    println!("\nRefund forecast");
    for point in forecast {
        println!("  {}  {}", point.year, format_usd(point.refund * 100));
    }
    Ok(())
}

fn cmd_export(store: &ClientStore, config: &PracticeConfig, client_id: &str, out_dir: PathBuf) -> Result<()> {
    let client = find(store, client_id)?;
    let doc = render_summary(client, &config.tax, &PdfRenderer::new())?;
    let path = write_document(&out_dir, &doc.file_name, &doc.bytes)?;

    let fingerprint = store.snapshot().fingerprint()?;
    info!(client_id, bytes = doc.bytes.len(), roster = %fingerprint, "summary exported");
    println!("{}", path.display());
    Ok(())
}

struct EfileArgs {
    review_first: bool,
    ack_seed: u32,
    out_dir: Option<PathBuf>,
}

fn cmd_efile(
    store: &mut ClientStore,
    config: &PracticeConfig,
    client_id: &str,
    args: EfileArgs,
    as_json: bool,
) -> Result<()> {
    let EfileArgs {
        review_first,
        ack_seed,
        out_dir,
    } = args;
    let status = find(store, client_id)?.status();
    if review_first && status != ClientStatus::Review {
        store.apply(Command::ChangeStatus {
            client_id: client_id.to_string(),
            to: ClientStatus::Review,
            cause: ChangeCause::Manual,
        })?;
    }

    let mut runner = WorkflowRunner::with_documents(config.tax, Box::new(PdfRenderer::new()));
    let launched = runner.launch(store, client_id, Box::new(EFileWorkflow::with_seed(ack_seed)))?;
    let mut updates = vec![launched];
    updates.extend(runner.run_until_idle(store));

    if let Some(error) = updates.iter().find_map(|u| u.error.as_ref()) {
        bail!("e-file for {} stopped: {}", client_id, error);
    }
    let Some(last) = updates.last() else {
        bail!("e-file produced no steps");
    };
    if !last.finished {
        bail!("e-file for {} did not finish", client_id);
    }

    let documents: Vec<_> = updates.iter().flat_map(|u| &u.documents).collect();
    let mut written = Vec::new();
    if let Some(dir) = &out_dir {
        for doc in &documents {
            written.push(write_document(dir, &doc.file_name, &doc.bytes)?);
        }
    }

    if as_json {
        let steps: Vec<_> = updates
            .iter()
            .filter(|u| !u.log.is_empty())
            .map(|u| json!({ "at_ms": u.at_ms, "log": u.log }))
            .collect();
        return print_json(&json!({
            "client_id": client_id,
            "status": find(store, client_id)?.status(),
            "steps": steps,
            "documents": documents.iter().map(|d| &d.file_name).collect::<Vec<_>>(),
            "written": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        }));
    }

    for update in updates.iter().filter(|u| !u.log.is_empty()) {
        for line in &update.log {
            println!("[{:>5} ms] {}", update.at_ms, line);
        }
    }
    println!("{} is now {}", client_id, find(store, client_id)?.status());
    for doc in &documents {
        println!("Issued {} ({} bytes)", doc.file_name, doc.bytes.len());
    }
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut store = ClientStore::generated(&config.dataset, &config.store)
        .context("generating roster")?;
    info!(
        count = config.dataset.count,
        seed = config.dataset.seed,
        "roster ready"
    );

    match cli.command {
        Cmd::Generate {
            limit,
            ref query,
            client_type,
            status,
        } => cmd_generate(
            &store,
            ListFilter {
                limit,
                query: query.clone(),
                client_type,
                status,
            },
            cli.json,
        ),
        Cmd::Add {
            ref name,
            client_type,
            filing,
            ref email,
            ref phone,
        } => cmd_add(
            &mut store,
            NewClient {
                name: name.clone(),
                client_type,
                filing_status: filing,
                email: email.clone(),
                phone: phone.clone(),
            },
            cli.json,
        ),
        Cmd::Report { only } => cmd_report(&store, only, cli.json),
        Cmd::Profile { ref client_id } => cmd_profile(&store, &config, client_id, cli.json),
        Cmd::Export {
            ref client_id,
            ref out_dir,
        } => cmd_export(&store, &config, client_id, out_dir.clone()),
        Cmd::Efile {
            ref client_id,
            review_first,
            ack_seed,
            ref out_dir,
        } => cmd_efile(
            &mut store,
            &config,
            client_id,
            EfileArgs {
                review_first,
                ack_seed,
                out_dir: out_dir.clone(),
            },
            cli.json,
        ),
    }
}
