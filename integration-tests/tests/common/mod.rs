//! Shared test utilities for integration tests.
//!
//! Provides plan fixtures shaped like the documents the persistence service
//! stores, plus a temporary file repository.

#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use mjop_engine::domain::Plan;
use mjop_host::storage::FilePlanRepository;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Temporary plan directory with a repository on top of it.
pub struct StorageContext {
    /// Kept alive for the duration of the test.
    pub temp_dir: TempDir,
    /// Repository writing into `temp_dir`.
    pub repository: FilePlanRepository,
}

impl StorageContext {
    /// Creates an empty storage directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let repository = FilePlanRepository::new(temp_dir.path().join("plans"));
        Ok(Self {
            temp_dir,
            repository,
        })
    }
}

/// Calendar date shorthand.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Parses a plan document.
pub fn plan(value: Value) -> Plan {
    serde_json::from_value(value).expect("plan document")
}

/// A small but complete plan.
///
/// Cash 1000 at 2024-01-01, 100 per month, worth 200 000 (minimum 1000).
/// Roof tasks bundled into a fixed-price offer group, a gutter task priced
/// individually, one undated task and one task in a deleted group.
pub fn sample_document() -> Value {
    json!({
        "generalInfo": {"name": "VvE De Linde", "address": "Lindelaan 4"},
        "cashInfo": {
            "currentCash": 1000,
            "monthlyContribution": "100",
            "reserveDate": "2024-01-01",
            "totalWorth": 200000
        },
        "globalElements": [
            {
                "id": "roof",
                "name": "Roof",
                "inspectionReport": [{
                    "date": "2023-10-12",
                    "tasks": [
                        {
                            "id": "roof-tiles",
                            "description": "Replace broken tiles",
                            "urgency": 4,
                            "offerGroupId": "roofing",
                            "planned": {"workDate": "2025-04-01", "offerPrice": "1200"}
                        },
                        {
                            "id": "roof-flashing",
                            "description": "Renew lead flashing",
                            "urgency": "6",
                            "offerGroupId": "roofing",
                            "planned": {"workDate": "2025-05-01", "estimatedPrice": 800}
                        }
                    ]
                }]
            },
            {
                "id": "gutter",
                "name": "Gutters",
                "inspectionReport": [{
                    "tasks": [
                        {
                            "id": "gutter-clean",
                            "description": "Clean gutters",
                            "urgency": 2,
                            "planned": {"workDate": "2024-07-01", "invoicePrice": 250, "offerPrice": 300}
                        },
                        {
                            "id": "gutter-paint",
                            "description": "Paint brackets",
                            "ultimateDate": "2026-09-15",
                            "planned": {"estimatedPrice": "1500,50"}
                        },
                        {
                            "id": "gutter-survey",
                            "description": "Survey downpipes"
                        },
                        {
                            "id": "gutter-old-offer",
                            "offerGroupId": "withdrawn",
                            "planned": {"workDate": "2026-02-01", "offerPrice": 90}
                        }
                    ]
                }]
            }
        ],
        "globalSpaces": [{"id": "attic"}],
        "globalDocuments": [],
        "offerGroups": [
            {
                "offerGroupId": "roofing",
                "name": "Roofing contractor",
                "assignPricesIndividually": false,
                "cost": 2500,
                "groupWorkDate": "2025-03-15"
            }
        ]
    })
}

/// [`sample_document`] parsed.
pub fn sample_plan() -> Plan {
    plan(sample_document())
}

/// Writes `value` to `name` inside `dir` and returns the path.
pub fn write_json(dir: &TempDir, name: &str, value: &Value) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value)?)?;
    Ok(path)
}
