use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::application::{BatchResult, BillingService, RentalActions, RentalPrice};
use crate::domain::{
    build_actions, format_cents, parse_cents, rental_price, Action, Cents, Commission, Options,
    RentalInfo,
};
use crate::io::{load_dataset, Exporter};
use crate::telemetry::{self, LogFormat};

/// carshare-ledger - rental billing for a car-sharing service
#[derive(Parser)]
#[command(name = "carshare-ledger")]
#[command(
    about = "Prices car-sharing rentals and splits their billing between driver, owner, insurance, assistance and platform"
)]
#[command(version)]
pub struct Cli {
    /// Dataset file with cars, rentals and rental modifications
    #[arg(short, long, default_value = "data.json", global = true)]
    pub input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Write the records that could be billed even if some failed
    #[arg(long, global = true)]
    pub skip_invalid: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price every rental
    Price {
        /// Include the commission split and the options
        #[arg(long)]
        detailed: bool,
    },

    /// Bill every rental: debit and credit actions per actor
    Actions {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Bill every rental modification against its original rental
    Modifications {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show the full billing breakdown of one rental
    Show {
        /// Rental ID
        id: i64,
    },

    /// Verify that every rental ledger is balanced
    Check,

    /// Price an ad-hoc rental without a dataset
    Quote {
        /// Number of billed days
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=100_000))]
        days: i64,

        /// Daily rate (e.g., "20.00")
        #[arg(long)]
        price_per_day: String,

        /// Rate per kilometer (e.g., "0.10")
        #[arg(long)]
        price_per_km: String,

        /// Distance in kilometers
        #[arg(long, default_value = "0")]
        distance: i64,

        /// Add the reduced deductible option
        #[arg(long)]
        deductible: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        telemetry::init(self.verbose, self.log_format);

        let Cli {
            input,
            output,
            skip_invalid,
            command,
            ..
        } = self;
        let output = output.as_deref();

        match command {
            Commands::Price { detailed } => {
                let service = load_service(&input)?;
                let rentals = settle(service.process_rentals(), skip_invalid, "rental")?;
                let prices: Vec<RentalPrice> = rentals
                    .iter()
                    .map(|info| RentalPrice::from_info(info, detailed))
                    .collect();

                let count = Exporter::new(open_output(output)?).prices_json(prices)?;
                report_written(output, count, "rental prices");
            }

            Commands::Actions { format } => {
                let service = load_service(&input)?;
                let rentals = settle(service.process_rentals(), skip_invalid, "rental")?;
                let rentals: Vec<RentalActions> = rentals.iter().map(RentalActions::from).collect();

                let mut exporter = Exporter::new(open_output(output)?);
                let count = match format {
                    OutputFormat::Json => exporter.actions_json(rentals)?,
                    OutputFormat::Csv => exporter.actions_csv(&rentals)?,
                };
                report_written(output, count, "rental records");
            }

            Commands::Modifications { format } => {
                let service = load_service(&input)?;
                let modifications = settle(
                    service.process_modifications(),
                    skip_invalid,
                    "modification",
                )?;

                let mut exporter = Exporter::new(open_output(output)?);
                let count = match format {
                    OutputFormat::Json => exporter.modifications_json(modifications)?,
                    OutputFormat::Csv => exporter.modifications_csv(&modifications)?,
                };
                report_written(output, count, "modification records");
            }

            Commands::Show { id } => {
                let service = load_service(&input)?;
                let info = service.rental_info(id)?;
                print_rental_info(&info);
            }

            Commands::Check => {
                let service = load_service(&input)?;
                run_check_command(&service)?;
            }

            Commands::Quote {
                days,
                price_per_day,
                price_per_km,
                distance,
                deductible,
            } => {
                let price_per_day = parse_cents(&price_per_day)
                    .context("Invalid daily rate. Use '20.00' or '20'")?;
                let price_per_km = parse_cents(&price_per_km)
                    .context("Invalid rate per kilometer. Use '0.10'")?;

                let price = rental_price(days, price_per_day, price_per_km, distance)
                    .context("Quoted price is beyond the supported range")?;
                let commission = Commission::split(price, days);
                let options = Options::price(days, deductible);
                let actions = build_actions(price, &commission, &options);

                println!(
                    "Quote: {} day(s), {} km at {}/day and {}/km",
                    days,
                    distance,
                    format_cents(price_per_day),
                    format_cents(price_per_km)
                );
                print_breakdown(price, &commission, &options, &actions);
            }
        }

        Ok(())
    }
}

fn load_service(input: &Path) -> Result<BillingService> {
    let dataset = load_dataset(input)?;
    Ok(BillingService::from_dataset(dataset))
}

/// Keep the outputs of a batch, or fail when some records could not be billed.
fn settle<T>(batch: BatchResult<T>, skip_invalid: bool, record: &str) -> Result<Vec<T>> {
    if !batch.is_complete() {
        let ids: Vec<String> = batch
            .failures
            .iter()
            .map(|failure| failure.record_id.to_string())
            .collect();
        eprintln!(
            "{} {}(s) could not be billed: {}",
            ids.len(),
            record,
            ids.join(", ")
        );
        if !skip_invalid {
            anyhow::bail!("Billing aborted, use --skip-invalid to write the other records");
        }
    }
    Ok(batch.outputs)
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(stdout()),
    };
    Ok(writer)
}

fn report_written(output: Option<&Path>, count: usize, what: &str) {
    if let Some(path) = output {
        eprintln!("Wrote {} {} to {}", count, what, path.display());
    }
}

fn print_rental_info(info: &RentalInfo) {
    println!("Rental {}", info.id);
    println!(
        "  {} day(s) at {}/day, {} km at {}/km{}",
        info.nb_days,
        format_cents(info.price_per_day),
        info.nb_kms,
        format_cents(info.price_per_km),
        if info.deductible_option {
            ", reduced deductible"
        } else {
            ""
        }
    );
    print_breakdown(info.price, &info.commission, &info.options, &info.actions);
}

fn print_breakdown(price: Cents, commission: &Commission, options: &Options, actions: &[Action]) {
    println!();
    println!("  {:<22} {:>12}", "Price:", format_cents(price));
    println!("  {:<22} {:>12}", "Insurance fee:", format_cents(commission.insurance_fee));
    println!("  {:<22} {:>12}", "Assistance fee:", format_cents(commission.assistance_fee));
    println!("  {:<22} {:>12}", "Platform fee:", format_cents(commission.drivy_fee));
    println!(
        "  {:<22} {:>12}",
        "Deductible reduction:",
        format_cents(options.deductible_reduction)
    );
    println!();
    println!("  {:<12} {:<8} {:>12}", "WHO", "TYPE", "AMOUNT");
    println!("  {}", "-".repeat(34));
    for action in actions {
        println!(
            "  {:<12} {:<8} {:>12}",
            action.who.as_str(),
            action.kind.as_str(),
            format_cents(action.amount)
        );
    }
}

fn run_check_command(service: &BillingService) -> Result<()> {
    println!("Checking rental ledgers...\n");

    let report = service.check_ledgers();

    println!("  {:<8} {:>12} {:>12}  {}", "RENTAL", "PRICE", "NET", "STATUS");
    println!("  {}", "-".repeat(44));
    for ledger in &report.ledgers {
        println!(
            "  {:<8} {:>12} {:>12}  {}",
            ledger.rental_id,
            format_cents(ledger.price),
            format_cents(ledger.net_balance),
            if ledger.is_balanced() {
                "OK"
            } else {
                "UNBALANCED!"
            }
        );
    }
    println!();

    let negative: Vec<_> = report.negative_drivy_fees().collect();
    if !negative.is_empty() {
        println!("Rentals where assistance exceeds the platform share:");
        for ledger in negative {
            println!(
                "  rental {}: platform fee {}",
                ledger.rental_id,
                format_cents(ledger.drivy_fee)
            );
        }
        println!();
    }

    if report.is_healthy() {
        println!("All {} ledgers are balanced.", report.ledgers.len());
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        for ledger in report.unbalanced() {
            println!(
                "  - rental {}: ledger off by {}",
                ledger.rental_id,
                format_cents(ledger.net_balance)
            );
        }
        anyhow::bail!("Ledger check failed");
    }

    Ok(())
}
