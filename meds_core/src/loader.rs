//! Loading drug records and the glossary from a data directory.
//!
//! Layout:
//! - `<data_dir>/drugs/**/*.yaml` (or `.yml`): one [`DrugRecord`] per file
//! - `<data_dir>/terms.yaml`: the glossary, optional

use crate::{DrugLibrary, DrugRecord, Error, Glossary, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subdirectory of the data directory holding drug records
pub const DRUGS_DIR: &str = "drugs";

/// Glossary file name inside the data directory
pub const TERMS_FILE: &str = "terms.yaml";

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse a single drug record file
pub fn load_record(path: &Path) -> Result<DrugRecord> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect record file paths under `dir`, sorted for deterministic load order
fn collect_yaml_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_yaml(entry.path()) {
            paths.push(entry.into_path());
        } else {
            tracing::debug!("Skipping non-YAML file {:?}", entry.path());
        }
    }
    Ok(paths)
}

/// Load every record under `dir` into an immutable library
///
/// Fails on the first malformed file (naming its path) or on a drug id
/// that appears in more than one file.
pub fn load_dir(dir: &Path) -> Result<DrugLibrary> {
    if !dir.is_dir() {
        return Err(Error::Other(format!(
            "Drug record directory {:?} does not exist",
            dir
        )));
    }

    let records = collect_yaml_paths(dir)?
        .iter()
        .map(|path| load_record(path))
        .collect::<Result<Vec<_>>>()?;

    let library = DrugLibrary::from_records(records)?;
    tracing::info!("Loaded {} drug records from {:?}", library.len(), dir);
    Ok(library)
}

/// Load the glossary, returning an empty one if the file is missing
pub fn load_glossary(path: &Path) -> Result<Glossary> {
    if !path.exists() {
        tracing::info!("No glossary found at {:?}, using empty glossary", path);
        return Ok(Glossary::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let glossary: Glossary = serde_yaml::from_str(&contents).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loaded {} glossary terms from {:?}", glossary.len(), path);
    Ok(glossary)
}

/// Load records and glossary from a data directory root
pub fn load_data_dir(data_dir: &Path) -> Result<(DrugLibrary, Glossary)> {
    let library = load_dir(&data_dir.join(DRUGS_DIR))?;
    let glossary = load_glossary(&data_dir.join(TERMS_FILE))?;
    Ok((library, glossary))
}
