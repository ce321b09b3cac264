use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::{error, info};

use catalog_scraper::apis::factory::create_scraper;
use catalog_scraper::common::progress::TracingProgress;
use catalog_scraper::observability::logging::init_logging;
use catalog_scraper::registry::{find_site, SUPPORTED_SITES};
use catalog_scraper::export;

#[derive(Parser)]
#[command(name = "catalog-scraper")]
#[command(about = "Product catalog scraper with per-site crawlers and Excel export")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported countries and sites
    List,
    /// Scrape one site and export the results to an Excel workbook
    Scrape {
        /// Country the site belongs to, e.g. "Sri Lanka"
        #[arg(long)]
        country: String,
        /// Site key, e.g. "buyabans"
        #[arg(long)]
        site: String,
        /// Override the configured output filename
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for entry in &SUPPORTED_SITES {
                println!("{:<12} {:<15} {}", entry.country, entry.key, entry.label);
            }
        }
        Commands::Scrape {
            country,
            site,
            output,
        } => {
            let Some(entry) = find_site(&country, &site) else {
                eprintln!("Unknown selection: country {country:?}, site {site:?}. Run `list` to see supported sites.");
                std::process::exit(1);
            };
            let mut config = entry.config();
            if let Some(output) = output {
                config.output_filename = output;
            }

            let Some(scraper) = create_scraper(entry.key) else {
                eprintln!("No scraper registered for site {:?}.", entry.key);
                std::process::exit(1);
            };

            info!(site = entry.key, country = entry.country, "running scraper");
            let records = scraper.scrape_products(&config, &TracingProgress).await?;

            if records.is_empty() {
                error!("no data was scraped, nothing to save");
                return Ok(());
            }

            let written = export::write_workbook(&records, Path::new(&config.output_filename))?;
            info!(
                records = written,
                file = %config.output_filename,
                "scrape complete, workbook saved"
            );
        }
    }

    Ok(())
}
