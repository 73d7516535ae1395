use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use debtors_ageing::ageing::{ACCOUNT_NAME_COLUMN, TOTAL_OUTSTANDING_COLUMN};
use debtors_ageing::config::{
    config_dir, config_file, load_config, resolve_output_dir, CONFIG_TEMPLATE,
};
use debtors_ageing::export::{to_json, write_report};
use debtors_ageing::{
    process_ledger, AgeingError, AgeingReport, AgeingRun, Bucket, Config, ReferenceTime,
    ReportFormat, Result,
};

#[derive(Parser)]
#[command(name = "ageing")]
#[command(version, about = "FIFO debtors ageing report", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.ageing or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Build the ageing report for a ledger file
    Report {
        /// Ledger export (.xlsx, .xls, .ods or .csv)
        ledger: PathBuf,

        /// Output file (default: <output_dir>/<file_name> from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: xlsx, csv or json (default: from the -o extension, else xlsx)
        #[arg(short, long)]
        format: Option<String>,

        /// Measure ages from this date instead of now (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// Print the report without writing a file
        #[arg(long)]
        no_write: bool,
    },

    /// List every unpaid invoice remainder with its age
    Unsettled {
        /// Ledger export (.xlsx, .xls, .ods or .csv)
        ledger: PathBuf,

        /// Only show this account
        #[arg(short, long)]
        account: Option<String>,

        /// Measure ages from this date instead of now (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// List the age buckets
    Buckets,

    /// Show the configuration in effect
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        if e.is_processing() {
            eprintln!("Error processing file: {e}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory; an explicit one has to exist
    let explicit = cli.config_dir.is_some();
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    if explicit && !cfg_dir.exists() && !matches!(cli.command, Commands::Init) {
        return Err(AgeingError::ConfigNotFound(cfg_dir));
    }

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Report {
            ledger,
            output,
            format,
            as_of,
            no_write,
        } => cmd_report(&cfg_dir, &ledger, output, format, as_of, no_write),
        Commands::Unsettled {
            ledger,
            account,
            as_of,
        } => cmd_unsettled(&cfg_dir, &ledger, account, as_of),
        Commands::Buckets => cmd_buckets(),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(AgeingError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(config_file(cfg_dir), CONFIG_TEMPLATE)?;

    println!("Initialized ageing config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Adjust ledger layout and output:  $EDITOR {}",
        config_file(cfg_dir).display()
    );
    println!("  2. Build a report:                   ageing report <ledger.xlsx>");

    Ok(())
}

/// Capture the reference time once for the whole run
fn reference_time(as_of: Option<String>) -> Result<ReferenceTime> {
    match as_of {
        Some(s) => chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(ReferenceTime::as_of)
            .map_err(|_| AgeingError::InvalidAsOf(s)),
        None => Ok(ReferenceTime::now()),
    }
}

#[derive(Tabled)]
struct UnsettledRow {
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "DOC NO")]
    doc_no: String,
    #[tabled(rename = "DOC DATE")]
    date: String,
    #[tabled(rename = "UNPAID")]
    unpaid: String,
    #[tabled(rename = "AGE (DAYS)")]
    age: String,
    #[tabled(rename = "BUCKET")]
    bucket: String,
}

#[derive(Tabled)]
struct OverpaymentRow {
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "UNAPPLIED")]
    amount: String,
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "BUCKET")]
    bucket: String,
    #[tabled(rename = "AGE (DAYS)")]
    range: String,
}

fn format_grouped_int(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a money amount with two decimal places and thousands separators
fn format_amount(value: Decimal, currency_symbol: &str) -> String {
    let rounded = format!("{:.2}", value.round_dp(2));
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };

    format!("{sign}{currency_symbol}{}.{frac}", format_grouped_int(digits))
}

/// Pivot table with a TOTAL footer row
fn render_report(report: &AgeingReport, currency_symbol: &str) -> String {
    let mut builder = Builder::default();
    builder.push_record(report.columns());

    for row in &report.rows {
        let mut record = vec![row.account_name.clone()];
        record.extend(
            report
                .bucket_cells(row)
                .map(|amount| format_amount(amount, currency_symbol)),
        );
        record.push(format_amount(row.total, currency_symbol));
        builder.push_record(record);
    }

    let mut footer = vec!["TOTAL".to_string()];
    footer.extend(
        report
            .bucket_totals()
            .into_iter()
            .map(|amount| format_amount(amount, currency_symbol)),
    );
    footer.push(format_amount(report.total_outstanding(), currency_symbol));
    builder.push_record(footer);

    builder.build().with(Style::rounded()).to_string()
}

fn default_output(config: &Config, format: ReportFormat) -> PathBuf {
    let file_name = Path::new(&config.report.file_name).with_extension(format.extension());
    resolve_output_dir(&config.report).join(file_name)
}

/// Build the ageing report and write it out
fn cmd_report(
    cfg_dir: &Path,
    ledger: &Path,
    output: Option<PathBuf>,
    format: Option<String>,
    as_of: Option<String>,
    no_write: bool,
) -> Result<()> {
    let reference = reference_time(as_of)?;
    let config = load_config(cfg_dir)?;
    // Without --format, an output path's extension decides
    let format = match format {
        Some(f) => f.parse::<ReportFormat>()?,
        None => output
            .as_deref()
            .and_then(ReportFormat::from_path)
            .unwrap_or_default(),
    };

    let run = process_ledger(ledger, &config.ledger, reference)?;
    let symbol = config.report.currency_symbol.as_str();

    // JSON goes to stdout unless a file was asked for
    if format == ReportFormat::Json && output.is_none() {
        println!("{}", to_json(&run.report)?);
        return Ok(());
    }

    println!(
        "Debtors ageing as of {}",
        reference.timestamp().format("%B %d, %Y")
    );
    if run.report.is_empty() {
        println!("No outstanding balances.");
    } else {
        println!("{}", render_report(&run.report, symbol));
        println!();
        println!(
            "Accounts: {}  Unpaid invoices: {}",
            run.report.rows.len(),
            run.unsettled.len()
        );
    }
    print_overpayment_note(&run);

    if no_write {
        return Ok(());
    }

    let path = output.unwrap_or_else(|| default_output(&config, format));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_report(&run.report, format, &path)?;
    println!("Saved: {}", path.display());

    Ok(())
}

fn print_overpayment_note(run: &AgeingRun) {
    if !run.overpayments.is_empty() {
        println!(
            "Note: {} account(s) paid more than was invoiced; the excess is not shown. See 'ageing unsettled'.",
            run.overpayments.len()
        );
    }
}

/// List unpaid invoice remainders
fn cmd_unsettled(
    cfg_dir: &Path,
    ledger: &Path,
    account: Option<String>,
    as_of: Option<String>,
) -> Result<()> {
    let reference = reference_time(as_of)?;
    let config = load_config(cfg_dir)?;
    let run = process_ledger(ledger, &config.ledger, reference)?;
    let symbol = config.report.currency_symbol.as_str();

    let wanted = |name: &str| account.as_deref().map_or(true, |a| a == name);

    let rows: Vec<UnsettledRow> = run
        .unsettled
        .iter()
        .filter(|item| wanted(&item.account_name))
        .map(|item| UnsettledRow {
            account: item.account_name.clone(),
            doc_no: item.doc_no.clone().unwrap_or_default(),
            date: item
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            unpaid: format_amount(item.unpaid_amount, symbol),
            age: item
                .age_days
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".to_string()),
            bucket: item.bucket.to_string(),
        })
        .collect();

    if rows.is_empty() {
        println!("No unpaid invoices.");
    } else {
        let count = rows.len();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
        println!("Total: {count} unpaid invoice(s)");
    }

    let overpaid: Vec<OverpaymentRow> = run
        .overpayments
        .iter()
        .filter(|o| wanted(&o.account_name))
        .map(|o| OverpaymentRow {
            account: o.account_name.clone(),
            amount: format_amount(o.amount, symbol),
        })
        .collect();

    if !overpaid.is_empty() {
        println!();
        println!("Payments not matched to any invoice:");
        let table = Table::new(overpaid).with(Style::rounded()).to_string();
        println!("{table}");
    }

    Ok(())
}

/// List the age buckets
fn cmd_buckets() -> Result<()> {
    let rows: Vec<BucketRow> = Bucket::ALL
        .iter()
        .map(|b| BucketRow {
            bucket: b.label().to_string(),
            range: b.range_label().to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show configuration in effect
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let file = config_file(cfg_dir);

    println!("Ageing Status");
    println!("{}", "-".repeat(50));

    if file.exists() {
        println!("Config file:      {}", file.display());
    } else {
        println!("Config file:      {} (not found, using defaults)", file.display());
    }
    println!("Skip rows:        {}", config.ledger.skip_rows);
    println!("Subtotal marker:  {}", config.ledger.subtotal_marker);
    println!(
        "Worksheet:        {}",
        config.ledger.sheet.as_deref().unwrap_or("(first)")
    );
    println!("Date formats:     {}", config.ledger.date_formats.join(", "));
    println!(
        "Report output:    {}",
        default_output(&config, ReportFormat::Xlsx).display()
    );
    println!(
        "Columns:          {}, <buckets>, {}",
        ACCOUNT_NAME_COLUMN, TOTAL_OUTSTANDING_COLUMN
    );

    Ok(())
}
