use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use catalog_search::catalog::{AdvancedQuery, AdvancedResults};
use catalog_search::config::{load_config, Config};
use catalog_search::model::{Difficulty, FieldFilter};
use catalog_search::sources::dataset::list_datasets;
use catalog_search::sources::history;
use catalog_search::state::{load_catalog, Session};
use catalog_search::ui::render;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a dataset and print exact matches and suggestions
    Search {
        query: String,
        /// Fields to match: all, filename, keywords or content
        #[arg(short, long)]
        filter: Option<FieldFilter>,
        /// Dataset name in the data dir, a JSON file path, or - for stdin
        #[arg(short, long)]
        dataset: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List records by category and difficulty, optionally scored against a query
    Browse {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        min_difficulty: Option<Difficulty>,
        #[arg(long)]
        max_difficulty: Option<Difficulty>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        filter: Option<FieldFilter>,
        #[arg(short, long)]
        dataset: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print every distinct keyword of a dataset
    Keywords {
        #[arg(short, long)]
        dataset: Option<String>,
    },
    /// List the datasets found in the data dir
    Datasets,
    /// Show (or clear) recent queries
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Read queries from stdin until `exit`
    Interactive {
        #[arg(short, long)]
        dataset: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config()?;
    debug!("Config: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Search { query, filter, dataset, json } => {
            let dataset = dataset_or_default(&config, dataset);
            let mut session = Session::open(config, &dataset)?;
            if let Some(filter) = filter {
                session.set_filter(filter);
            }
            let results = session.run_query(&query);
            if json {
                render::render_json(&mut out, &results)?;
            } else {
                render::render_text(&mut out, &query, &results)?;
            }
        }
        Command::Browse { category, min_difficulty, max_difficulty, query, filter, dataset, json } => {
            let catalog = load_catalog(&config, &dataset_or_default(&config, dataset))?;
            let advanced = AdvancedQuery {
                category,
                min_difficulty,
                max_difficulty,
                query: query.clone(),
                filter: filter.unwrap_or(config.search.default_filter),
            };
            match catalog.advanced_search(&advanced) {
                AdvancedResults::Listing(records) if json => render::render_json(&mut out, &records)?,
                AdvancedResults::Listing(records) => render::render_listing(&mut out, &records)?,
                AdvancedResults::Scored(results) if json => render::render_json(&mut out, &results)?,
                AdvancedResults::Scored(results) => {
                    render::render_text(&mut out, query.as_deref().unwrap_or_default(), &results)?
                }
            }
        }
        Command::Keywords { dataset } => {
            let catalog = load_catalog(&config, &dataset_or_default(&config, dataset))?;
            for keyword in catalog.unique_keywords() {
                writeln!(out, "{}", keyword)?;
            }
        }
        Command::Datasets => {
            let dir = config.data_dir();
            let names = list_datasets(&dir);
            if names.is_empty() {
                writeln!(out, "No datasets in {}", dir.display())?;
            }
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        Command::History { clear } => {
            let mut past = history::load_history();
            if clear {
                past.clear();
                history::save_history(&past);
            }
            for (i, query) in past.queries.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, query)?;
            }
        }
        Command::Interactive { dataset } => {
            let dataset = dataset_or_default(&config, dataset);
            let mut session = Session::open(config, &dataset)?;
            drop(out);
            run_interactive(&mut session)?;
        }
    }

    Ok(())
}

fn dataset_or_default(config: &Config, dataset: Option<String>) -> String {
    dataset.unwrap_or_else(|| config.general.default_dataset.clone())
}

fn run_interactive(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(
        out,
        "Dataset '{}' loaded ({} records). Commands: :filter F, :dataset NAME, :history, exit",
        session.dataset,
        session.catalog.len()
    )?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "\n[{}|{}] search: ", session.dataset, session.filter)?;
        out.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            break;
        }

        if let Some(filter) = input.strip_prefix(":filter") {
            match filter.parse::<FieldFilter>() {
                Ok(filter) => session.set_filter(filter),
                Err(e) => writeln!(out, "{}", e)?,
            }
        } else if let Some(name) = input.strip_prefix(":dataset") {
            if let Err(e) = session.switch_dataset(name.trim()) {
                writeln!(out, "{}", e)?;
            }
        } else if input == ":history" {
            for (i, query) in session.history.queries.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, query)?;
            }
        } else {
            let results = session.run_query(input);
            render::render_text(&mut out, input, &results)?;
        }
    }

    Ok(())
}
