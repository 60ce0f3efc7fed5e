use crate::error::CatalogError;
use crate::model::Record;
use crate::sources::Source;
use anyhow::Result;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use log::{info, debug, warn};
use walkdir::WalkDir;

pub const STDIN_DATASET: &str = "-";

pub struct DatasetFile {
    pub path: PathBuf,
}

impl Source for DatasetFile {
    fn scan(&self) -> Result<Vec<Record>> {
        debug!("Reading dataset {:?}", self.path);
        let content = fs::read_to_string(&self.path).map_err(|e| CatalogError::io(&self.path, e))?;
        let records = parse_records(&content)?;
        info!("DatasetFile: loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

pub struct StdinSource;

impl Source for StdinSource {
    fn scan(&self) -> Result<Vec<Record>> {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CatalogError::io("<stdin>", e))?;
        let records = parse_records(&content)?;
        info!("StdinSource: loaded {} records", records.len());
        Ok(records)
    }
}

/// Parses a JSON array of records. Elements that are not valid records (missing `filename`,
/// wrong field types) are logged and skipped; anything but an array is an error.
pub fn parse_records(json: &str) -> Result<Vec<Record>, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(CatalogError::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed record #{}: {}", i, e),
        }
    }
    Ok(records)
}

pub fn list_datasets(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        debug!("Data directory {:?} does not exist", dir);
        return Vec::new();
    }

    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .filter_map(|entry| entry.path().file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();
    names.sort();
    names
}

pub fn resolve(dir: &Path, name: &str) -> Result<PathBuf, CatalogError> {
    let as_path = Path::new(name);
    if as_path.is_file() {
        return Ok(as_path.to_path_buf());
    }
    let candidate = dir.join(format!("{name}.json"));
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(CatalogError::UnknownDataset {
        name: name.to_string(),
        dir: dir.to_path_buf(),
    })
}

pub fn open(dir: &Path, name: &str) -> Result<Box<dyn Source>> {
    if name == STDIN_DATASET {
        return Ok(Box::new(StdinSource));
    }
    Ok(Box::new(DatasetFile {
        path: resolve(dir, name)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_records_are_skipped() {
        let json = r#"[
            {"filename": "a.jpg", "keywords": ["x"], "last_updated": "2024-01-01T00:00:00"},
            {"keywords": ["no filename"]},
            {"filename": 42},
            "not an object",
            {"filename": "b.jpg", "keywords": "y，z", "song_name": "桜の花びら"}
        ]"#;
        let records = parse_records(json).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(records[1].keywords, vec!["y", "z"]);
    }

    #[test]
    fn non_array_document_is_rejected() {
        assert!(matches!(parse_records(r#"{"filename":"a.jpg"}"#), Err(CatalogError::NotAnArray)));
        assert!(matches!(parse_records("not json"), Err(CatalogError::Json(_))));
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn lists_and_resolves_datasets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("single_skill.json"), "[]").unwrap();
        fs::write(dir.path().join("call_book.json"), r#"[{"filename":"c.jpg"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("backup")).unwrap();
        fs::write(dir.path().join("backup").join("old.json"), "[]").unwrap();

        assert_eq!(list_datasets(dir.path()), vec!["call_book", "single_skill"]);
        assert!(list_datasets(&dir.path().join("missing")).is_empty());

        let path = resolve(dir.path(), "call_book").unwrap();
        let records = DatasetFile { path }.scan().unwrap();
        assert_eq!(records.len(), 1);

        assert!(matches!(
            resolve(dir.path(), "nope"),
            Err(CatalogError::UnknownDataset { .. })
        ));
    }
}
