use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::utils::error::{AppError, Result};

/// One scenario input from the external JSON file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchCase {
    #[serde(rename = "searchQuery")]
    pub search_query: String,
}

/// Load the scenario inputs: a JSON array of objects carrying `searchQuery`.
pub fn load_cases(path: &Path) -> Result<Vec<SearchCase>> {
    let raw = fs::read_to_string(path)?;
    let cases: Vec<SearchCase> = serde_json::from_str(&raw)?;
    if cases.is_empty() {
        return Err(AppError::Validation(format!(
            "test data file {} contains no cases",
            path.display()
        )));
    }
    Ok(cases)
}
