use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use shared::domain::{ChartOfAccount, Invoice, OfficeId, Property};
use storage::FixtureStore;
use tracing_subscriber::EnvFilter;
use view_core::{FilterState, InvoiceSummary, ListEntity, ListView, TracingNotifier};

mod config;
mod demo;
mod render;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "rental-admin", about = "Office-scoped record lists")]
struct Args {
    /// Settings file (defaults to ./admin.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the JSON fixtures.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load one list view and print its rows.
    List(ListArgs),
    /// Write a small demo data set into the data directory.
    Seed,
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    #[arg(value_enum)]
    view: ViewKind,
    #[arg(long, conflicts_with = "all_offices")]
    office: Option<i64>,
    /// Ignore the configured default office.
    #[arg(long)]
    all_offices: bool,
    #[arg(long)]
    show_inactive: bool,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn filter(&self, settings: &Settings) -> FilterState {
        let office = if self.all_offices {
            None
        } else {
            self.office.or(settings.default_office)
        };
        FilterState {
            office_id: office.map(OfficeId),
            show_inactive: self.show_inactive || settings.show_inactive,
            search: self.search.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewKind {
    Invoices,
    Accounts,
    Properties,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Seed => {
            demo::seed(&FixtureStore::new(&settings.data_dir)).await?;
            println!("Wrote demo data to {}", settings.data_dir.display());
        }
        Command::List(list) => {
            let filter = list.filter(&settings);
            let store = FixtureStore::open(&settings.data_dir).with_context(|| {
                format!("cannot open data directory '{}'", settings.data_dir.display())
            })?;
            match list.view {
                ViewKind::Invoices => {
                    let rows = load_rows::<Invoice>(&settings, store, filter).await;
                    if list.json {
                        render::print_json(&rows)?;
                    } else {
                        render::print_invoices(&rows);
                        render::print_invoice_summary(&InvoiceSummary::from_rows(&rows));
                    }
                }
                ViewKind::Accounts => {
                    let rows = load_rows::<ChartOfAccount>(&settings, store, filter).await;
                    if list.json {
                        render::print_json(&rows)?;
                    } else {
                        render::print_accounts(&rows);
                    }
                }
                ViewKind::Properties => {
                    let rows = load_rows::<Property>(&settings, store, filter).await;
                    if list.json {
                        render::print_json(&rows)?;
                    } else {
                        render::print_properties(&rows);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn load_rows<E: ListEntity>(
    settings: &Settings,
    store: FixtureStore,
    filter: FilterState,
) -> Vec<E::Row> {
    let mut view: ListView<E> = ListView::new(Arc::new(store), Arc::new(TracingNotifier))
        .with_timeout(settings.fetch_timeout())
        .with_filter(filter);
    let state = view.refresh().await;
    tracing::debug!(?state, "view refreshed");
    let rows = view.rows().as_ref().clone();
    view.dispose();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_args(argv: &[&str]) -> ListArgs {
        let args = Args::try_parse_from(argv).expect("parse");
        match args.command {
            Command::List(list) => list,
            Command::Seed => panic!("expected list"),
        }
    }

    fn with_default_office() -> Settings {
        Settings {
            default_office: Some(5),
            ..Settings::default()
        }
    }

    #[test]
    fn default_office_applies_unless_overridden() {
        let settings = with_default_office();
        let list = list_args(&["rental-admin", "list", "invoices"]);
        assert_eq!(list.filter(&settings).office_id, Some(OfficeId(5)));

        let list = list_args(&["rental-admin", "list", "invoices", "--office", "7"]);
        assert_eq!(list.filter(&settings).office_id, Some(OfficeId(7)));
    }

    #[test]
    fn all_offices_clears_the_default() {
        let list = list_args(&["rental-admin", "list", "properties", "--all-offices"]);
        assert_eq!(list.filter(&with_default_office()).office_id, None);
    }

    #[test]
    fn office_and_all_offices_conflict() {
        let parsed = Args::try_parse_from([
            "rental-admin",
            "list",
            "accounts",
            "--office",
            "5",
            "--all-offices",
        ]);
        assert!(parsed.is_err());
    }
}
