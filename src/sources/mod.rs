use crate::model::Record;
use anyhow::Result;

pub trait Source {
    fn scan(&self) -> Result<Vec<Record>>;
}

pub mod dataset;
pub mod history;
