//! Static description of the TLC tables.
//!
//! The catalog is descriptive only: it is never checked against the live
//! warehouse. It is handed to the calling assistant so it can write SQL.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors loading a catalog override file.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Schema file {0} declares no tables")]
    Empty(String),
}

/// One table: name, what it holds, and its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub description: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    fn new(name: &str, description: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Ordered, immutable set of table descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    tables: Vec<TableSchema>,
}

impl SchemaCatalog {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// The NYC TLC tables shipped with the server.
    pub fn builtin() -> Self {
        Self::new(vec![
            TableSchema::new(
                "gtp_tlc_data",
                "Taxi trip data (right now just yellow and green taxis), including pickup/dropoff locations, times, fares, and passenger counts",
                &[
                    "vendorid", "tpep_pickup_datetime", "tpep_dropoff_datetime",
                    "passenger_count", "trip_distance", "ratecodeid",
                    "store_and_fwd_flag", "pulocationid", "dolocationid",
                    "payment_type", "fare_amount", "extra", "mta_tax",
                    "tip_amount", "tolls_amount", "improvement_surcharge",
                    "total_amount", "congestion_surcharge", "airport_fee",
                    "type", "year", "month",
                ],
            ),
            TableSchema::new(
                "taxi_zones",
                "Taxi zone boundaries for location lookups and joins (includes geometry and WKT)",
                &[
                    "objectid", "shape_leng", "shape_area",
                    "zone", "locationid", "borough",
                    "geometry", "geometry_wkt",
                ],
            ),
        ])
    }

    /// Load a catalog from a TOML file of `[[tables]]` entries.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            SchemaError::Parse { source, .. } => SchemaError::Parse {
                path: display.clone(),
                source,
            },
            SchemaError::Empty(_) => SchemaError::Empty(display.clone()),
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        let catalog: SchemaCatalog = toml::from_str(text).map_err(|source| SchemaError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        if catalog.tables.is_empty() {
            return Err(SchemaError::Empty("<inline>".to_string()));
        }
        Ok(catalog)
    }

    /// Built-in catalog, or the override file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, SchemaError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Human-readable listing of every table, in catalog order.
    pub fn describe(&self) -> String {
        let mut text = String::from("NYC TLC Database Schema:\n\n");
        for table in &self.tables {
            let _ = write!(
                text,
                "Table: {}\nDescription: {}\nColumns: {}\n\n",
                table.name,
                table.description,
                table.columns.join(", ")
            );
        }
        text
    }
}
