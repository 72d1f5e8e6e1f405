//! dash-runner: headless runner for the retail dashboard query layer.
//!
//! Usage:
//!   dash-runner --csv online_retail_II.csv --country France
//!   dash-runner --csv online_retail_II.csv --db retail.db --import
//!   dash-runner --db retail.db --ipc-mode
//!   dash-runner --sample-seed 42 --sample-invoices 2000

use anyhow::{Context, Result};
use chrono::NaiveDate;
use retail_dash_core::{
    config::DashboardConfig,
    dashboard::Dashboard,
    dataset::Dataset,
    loader,
    query::{DashboardViews, ViewFilter},
    record::TransactionRecord,
    sample::{SampleConfig, SampleGenerator},
    store::DashStore,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let csv = flag_value(&args, "--csv");
    let db = flag_value(&args, "--db");
    let import = has_flag(&args, "--import");
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let seed = parse_arg(&args, "--sample-seed", 42u64);
    let invoices = parse_arg(&args, "--sample-invoices", 2_000usize);

    check_import_flags(csv, db, import)?;
    let config = DashboardConfig::load(data_dir)?;

    if !ipc_mode {
        println!("Online Retail Dashboard: dash-runner");
        println!("  csv:       {}", csv.unwrap_or("-"));
        println!("  db:        {}", db.unwrap_or("-"));
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let records = load_records(csv, db, import, seed, invoices)?;
    let dashboard = Dashboard::new(Dataset::with_config(records, &config), config);

    if ipc_mode {
        run_ipc_loop(&dashboard)?;
    } else {
        print_overview(&dashboard);
        let filter = match requested_filter(&args, &dashboard)? {
            Some(f) => f,
            None => {
                println!("  (No filterable rows)");
                return Ok(());
            }
        };
        print_views(&dashboard, &filter, &dashboard.apply(&filter));
    }

    Ok(())
}

/// Pick the row source: CSV (optionally imported into the DB), then the DB,
/// then a synthetic sample.
fn load_records(
    csv: Option<&str>,
    db: Option<&str>,
    import: bool,
    seed: u64,
    invoices: usize,
) -> Result<Vec<TransactionRecord>> {
    match (csv, db) {
        (Some(path), db) => {
            let (records, report) = loader::load_csv_path(path)
                .with_context(|| format!("Cannot load {path}"))?;
            if let (true, Some(db_path)) = (import, db) {
                let mut store = DashStore::open(db_path)?;
                store.migrate()?;
                store.clear()?;
                store.insert_records(&records)?;
                store.record_import(path, &report, &chrono::Local::now().to_rfc3339())?;
                log::info!("imported {} records into {db_path}", records.len());
            }
            Ok(records)
        }
        (None, Some(db_path)) => {
            let store = DashStore::open(db_path)?;
            store.migrate()?;
            let records = store.load_records()?;
            if let Some((source, report)) = store.last_import()? {
                log::info!(
                    "{db_path}: {} records from {source} ({} skipped at import)",
                    records.len(),
                    report.skipped
                );
            }
            Ok(records)
        }
        (None, None) => {
            log::info!("no input given, generating {invoices} sample invoices (seed {seed})");
            Ok(SampleGenerator::new(SampleConfig::new(seed, invoices)).generate())
        }
    }
}

fn run_ipc_loop(dashboard: &Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let Some(reply) = dashboard.handle_line(&buffer) else {
            continue;
        };
        writeln!(stdout, "{}", reply.json)?;
        stdout.flush()?;
        if reply.quit {
            break;
        }
    }
    Ok(())
}

/// `--import` writes the parsed CSV into the DB, so it needs both.
fn check_import_flags(csv: Option<&str>, db: Option<&str>, import: bool) -> Result<()> {
    if import && (csv.is_none() || db.is_none()) {
        anyhow::bail!("--import needs both --csv and --db");
    }
    Ok(())
}

/// `--country`, `--start`, `--end`, each falling back to the control default.
fn requested_filter(args: &[String], dashboard: &Dashboard) -> Result<Option<ViewFilter>> {
    let controls = dashboard.controls();
    let country = flag_value(args, "--country")
        .map(str::to_string)
        .or(controls.default_country);
    let start = parse_date_arg(args, "--start")?.or(controls.min_date);
    let end = parse_date_arg(args, "--end")?.or(controls.max_date);

    Ok(match (country, start, end) {
        (Some(c), Some(s), Some(e)) => Some(ViewFilter::new(c, s, e)),
        _ => None,
    })
}

fn print_overview(dashboard: &Dashboard) {
    let overview = dashboard.overview();
    let currency = &dashboard.config().currency_symbol;

    println!("=== OVERVIEW ===");
    println!("  rows:           {}", dashboard.dataset().len());
    println!(
        "  dropped (no customer id): {}",
        dashboard.dataset().dropped_without_customer()
    );
    println!("  total revenue:  {currency}{:.2}", overview.total_revenue);
    println!();
    println!("  Top countries by revenue:");
    for c in &overview.top_countries {
        println!("    {:<24} {currency}{:>14.2}", c.country, c.revenue);
    }
    println!();
    println!("  Top products by revenue:");
    for p in &overview.top_products {
        println!("    {:<40} {currency}{:>12.2}", p.description, p.revenue);
    }
    println!();
    println!("  Revenue series: {} periods", overview.revenue_series.len());
    if let (Some(first), Some(last)) = (
        overview.revenue_series.first(),
        overview.revenue_series.last(),
    ) {
        println!("    {} .. {}", first.period, last.period);
    }
    println!();
}

fn print_views(dashboard: &Dashboard, filter: &ViewFilter, views: &DashboardViews) {
    let currency = &dashboard.config().currency_symbol;

    println!(
        "=== {} | {} .. {} ===",
        filter.country, filter.start_date, filter.end_date
    );
    if views.is_empty() {
        println!("  (No matching rows)");
        return;
    }
    println!("  revenue:           {currency}{:.2}", views.summary.total_revenue);
    println!("  quantity:          {}", views.summary.total_quantity);
    println!("  distinct products: {}", views.summary.distinct_products);
    println!("  distinct invoices: {}", views.summary.distinct_invoices);
    println!("  series points:     {}", views.revenue_series.len());
    println!("  scatter points:    {}", views.scatter_points.len());
    println!();
    println!("  Top products:");
    for p in &views.top_products {
        println!("    {:<40} {currency}{:>12.2}", p.description, p.revenue);
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_date_arg(args: &[String], flag: &str) -> Result<Option<NaiveDate>> {
    flag_value(args, flag)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .with_context(|| format!("{flag} expects YYYY-MM-DD, got '{v}'"))
        })
        .transpose()
}
