//! Loading contracts and delimited data from disk

use contract_dq_core::{Record, Schema};
use std::fs::File;
use std::path::Path;

use crate::error::{CliError, Result};

/// Records of a data file together with its header
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Declared schema fields that the header does not provide
    pub fn missing_columns<'a>(&self, schema: &'a Schema) -> Vec<&'a str> {
        schema
            .field_names()
            .filter(|name| !self.headers.iter().any(|h| h == name))
            .collect()
    }
}

/// Read a contract file, choosing the parser by extension
pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::file_error(format!(
            "Failed to read schema file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema = match extension.as_str() {
        "json" => Schema::from_json_str(&content)?,
        "yaml" | "yml" => Schema::from_yaml_str(&content)?,
        "toml" => Schema::from_toml_str(&content)?,
        _ => {
            return Err(CliError::invalid_input(format!(
                "Unsupported schema format: '{}'. Supported formats: json, yaml, yml, toml",
                extension
            )))
        }
    };

    tracing::debug!(
        path = %path.display(),
        dialect = %schema.dialect,
        fields = schema.len(),
        "Loaded schema"
    );

    Ok(schema)
}

/// Read a delimited file whose first line names the fields
///
/// Short rows yield absent values for their missing trailing columns.
/// Cells beyond the header width are dropped.
pub fn read_dataset(path: &Path, delimiter: u8) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| {
        CliError::file_error(format!(
            "Failed to read data file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() > headers.len() {
            tracing::debug!(
                position = index + 1,
                cells = row.len(),
                columns = headers.len(),
                "Row wider than header, extra cells dropped"
            );
        }
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = records.len(),
        "Loaded data file"
    );

    Ok(Dataset { headers, records })
}

/// Warn once for each declared field absent from the header
pub fn warn_missing_columns(dataset: &Dataset, schema: &Schema) -> usize {
    let missing = dataset.missing_columns(schema);
    for field in &missing {
        tracing::warn!(
            field = %field,
            "Declared field is not present in the data header; treating it as absent in every row"
        );
    }
    missing.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_schema_by_extension() {
        let json = temp_file(".json", r#"{"columns": {"id": {"type": "integer"}}}"#);
        assert_eq!(load_schema(json.path()).unwrap().len(), 1);

        let yaml = temp_file(".yml", "fields:\n  - name: id\n    type: int\n");
        assert_eq!(load_schema(yaml.path()).unwrap().len(), 1);

        let toml = temp_file(".toml", "[columns.id]\ntype = \"integer\"\n");
        assert_eq!(load_schema(toml.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_load_schema_errors() {
        let txt = temp_file(".txt", "{}");
        assert!(matches!(load_schema(txt.path()), Err(CliError::InvalidInput(_))));

        let bad = temp_file(".json", r#"{"columns": {"id": {"type": "uuid"}}}"#);
        assert!(matches!(load_schema(bad.path()), Err(CliError::Schema(_))));

        let missing = Path::new("/definitely/not/here.json");
        assert!(matches!(load_schema(missing), Err(CliError::FileError(_))));
    }

    #[test]
    fn test_read_dataset() {
        let data = temp_file(".csv", "id,name\n1,alice\n2\n3,carol,extra\n");
        let dataset = read_dataset(data.path(), b',').unwrap();

        assert_eq!(dataset.headers, vec!["id", "name"]);
        assert_eq!(dataset.records.len(), 3);
        assert_eq!(dataset.records[0].get("name"), Some("alice"));
        assert!(!dataset.records[1].contains("name"));
        assert_eq!(dataset.records[2].len(), 2);
    }

    #[test]
    fn test_read_dataset_with_delimiter() {
        let data = temp_file(".tsv", "id\temail\n1\ta@b.co\n");
        let dataset = read_dataset(data.path(), b'\t').unwrap();
        assert_eq!(dataset.records[0].get("email"), Some("a@b.co"));
    }

    #[test]
    fn test_missing_columns() {
        let schema = Schema::from_json_str(
            r#"{"columns": {"id": {"type": "integer"}, "email": {"type": "string"}}}"#,
        )
        .unwrap();
        let data = temp_file(".csv", "id\n1\n");
        let dataset = read_dataset(data.path(), b',').unwrap();

        assert_eq!(dataset.missing_columns(&schema), vec!["email"]);
        assert_eq!(warn_missing_columns(&dataset, &schema), 1);
    }
}
