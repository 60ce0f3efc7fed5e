use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::model::{FieldFilter, SearchResults};
use crate::sources::dataset;
use crate::sources::history::{self, History};

pub struct Session {
    pub config: Config,
    pub catalog: Catalog,
    pub dataset: String,
    pub filter: FieldFilter,
    pub history: History,
    history_path: Option<PathBuf>, // None: keep history in memory only
}

impl Session {
    pub fn new(config: Config, dataset: String, catalog: Catalog) -> Self {
        Self {
            filter: config.search.default_filter,
            config,
            catalog,
            dataset,
            history: History::default(),
            history_path: None,
        }
    }

    pub fn open(config: Config, dataset: &str) -> Result<Self> {
        let catalog = load_catalog(&config, dataset)?;
        let mut session = Self::new(config, dataset.to_string(), catalog);
        session.history_path = history::get_history_path();
        session.history = history::load_history();
        Ok(session)
    }

    pub fn with_history_file(mut self, path: PathBuf) -> Self {
        self.history = history::load_history_from(&path);
        self.history_path = Some(path);
        self
    }

    pub fn set_filter(&mut self, filter: FieldFilter) {
        self.filter = filter;
    }

    pub fn switch_dataset(&mut self, dataset: &str) -> Result<()> {
        self.catalog = load_catalog(&self.config, dataset)?;
        self.dataset = dataset.to_string();
        info!("Session: switched to dataset '{}'", self.dataset);
        Ok(())
    }

    pub fn run_query(&mut self, query: &str) -> SearchResults {
        let results = self.catalog.search(query, self.filter);

        if !query.trim().is_empty() {
            self.history.record(query, self.config.general.history_size);
            self.persist_history();
        }

        info!(
            "Session: dataset='{}', query='{}', exact={}, fuzzy={}",
            self.dataset,
            query.trim(),
            results.exact.len(),
            results.fuzzy.len()
        );
        results
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    fn persist_history(&self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = history::save_history_to(path, &self.history) {
                warn!("Could not save search history to {:?}: {}", path, e);
            }
        }
    }
}

pub fn load_catalog(config: &Config, dataset: &str) -> Result<Catalog> {
    let source = dataset::open(&config.data_dir(), dataset)?;
    Ok(Catalog::new(source.scan()?))
}
