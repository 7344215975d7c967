//! Named scenarios kept in a single JSON file.
//!
//! Every mutation rewrites the whole file. There is no locking across processes and
//! no journal; a crash mid-write can lose the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{ParameterField, ProjectionParameters};
use crate::error::{WealthError, WealthResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: ProjectionParameters,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedScenario {
    name: String,
    #[serde(default)]
    description: String,
    parameters: ProjectionParameters,
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_favorite: bool,
}

#[derive(Debug)]
pub struct ScenarioStore {
    path: PathBuf,
    scenarios: Vec<Scenario>,
}

impl ScenarioStore {
    /// Loads the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> WealthResult<Self> {
        let path = path.into();
        let scenarios: Vec<Scenario> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "scenario store: loaded {} scenario(s) from {}",
            scenarios.len(),
            path.display()
        );
        Ok(Self { path, scenarios })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> WealthResult<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn save(
        &mut self,
        name: &str,
        description: &str,
        parameters: ProjectionParameters,
    ) -> WealthResult<Scenario> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WealthError::EmptyScenarioName);
        }
        check_parameters(&parameters)?;
        let scenario = Scenario {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.trim().to_string(),
            parameters,
            created_at: Utc::now(),
            is_favorite: false,
        };
        let mut next = self.scenarios.clone();
        next.push(scenario.clone());
        self.commit(next)?;
        log::info!("scenario store: saved '{}' ({})", scenario.name, scenario.id);
        Ok(scenario)
    }

    pub fn delete(&mut self, id: &str) -> WealthResult<()> {
        let next: Vec<Scenario> = self
            .scenarios
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        if next.len() == self.scenarios.len() {
            return Err(not_found(id));
        }
        self.commit(next)?;
        log::info!("scenario store: deleted {id}");
        Ok(())
    }

    /// Flips the favourite flag and returns the new value.
    pub fn toggle_favorite(&mut self, id: &str) -> WealthResult<bool> {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;
        let mut next = self.scenarios.clone();
        next[index].is_favorite = !next[index].is_favorite;
        let is_favorite = next[index].is_favorite;
        self.commit(next)?;
        Ok(is_favorite)
    }

    pub fn export_json(&self, id: &str) -> WealthResult<String> {
        Ok(serde_json::to_string_pretty(self.get(id)?)?)
    }

    /// Adds a scenario from an exported JSON document under a fresh id.
    pub fn import_json(&mut self, raw: &str) -> WealthResult<Scenario> {
        let imported: ImportedScenario = serde_json::from_str(raw)
            .map_err(|e| WealthError::InvalidScenario(e.to_string()))?;
        let name = imported.name.trim();
        if name.is_empty() {
            return Err(WealthError::EmptyScenarioName);
        }
        check_parameters(&imported.parameters)?;
        let scenario = Scenario {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: imported.description,
            parameters: imported.parameters,
            created_at: imported.created_at.unwrap_or_else(Utc::now),
            is_favorite: imported.is_favorite,
        };
        let mut next = self.scenarios.clone();
        next.push(scenario.clone());
        self.commit(next)?;
        log::info!(
            "scenario store: imported '{}' ({})",
            scenario.name,
            scenario.id
        );
        Ok(scenario)
    }

    /// Writes `next` to disk and only then makes it the in-memory state.
    fn commit(&mut self, next: Vec<Scenario>) -> WealthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&next)?)?;
        self.scenarios = next;
        Ok(())
    }
}

fn check_parameters(parameters: &ProjectionParameters) -> WealthResult<()> {
    parameters.validate().map_err(|violation| {
        WealthError::InvalidScenario(violation.describe(ParameterField::key))
    })
}

fn not_found(id: &str) -> WealthError {
    WealthError::ScenarioNotFound { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CareerTrack, TaxJurisdiction};

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("wealth-roadmap-test-{}", Uuid::new_v4()))
            .join("scenarios.json")
    }

    fn sample_params() -> ProjectionParameters {
        ProjectionParameters {
            current_age: 25,
            annual_salary: 75_000.0,
            salary_growth_percent: 8.0,
            investment_rate_percent: 20.0,
            market_return_percent: 8.0,
            inflation_rate_percent: 3.0,
            career_track: CareerTrack::Faang,
            tax_jurisdiction: TaxJurisdiction::Germany,
            horizon_end_age: 35,
        }
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            if dir.is_dir() {
                let _ = fs::remove_dir_all(dir);
            } else {
                let _ = fs::remove_file(dir);
            }
        }
    }

    /// Swaps the store's directory for a plain file so every later write fails.
    fn block_writes(path: &Path) {
        let dir = path.parent().expect("store path has a parent");
        if dir.is_dir() {
            fs::remove_dir_all(dir).expect("remove store dir");
        }
        fs::write(dir, b"").expect("plant blocking file");
    }

    #[test]
    fn missing_file_opens_empty_store() {
        let path = temp_store_path();
        let store = ScenarioStore::open(&path).expect("open");
        assert!(store.list().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn saved_scenarios_survive_reopen_verbatim() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let saved = store
            .save("  Big tech  ", "move at 23", sample_params())
            .expect("save");
        assert_eq!(saved.name, "Big tech");
        assert!(!saved.is_favorite);

        let reopened = ScenarioStore::open(&path).expect("reopen");
        assert_eq!(reopened.list(), &[saved.clone()]);
        assert_eq!(
            reopened.get(&saved.id).expect("present").parameters,
            sample_params()
        );
        cleanup(&path);
    }

    #[test]
    fn blank_names_are_rejected() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let err = store.save("   ", "", sample_params()).expect_err("must reject");
        assert!(matches!(err, WealthError::EmptyScenarioName));
        assert!(store.list().is_empty());
    }

    #[test]
    fn toggle_favorite_flips_and_persists() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let saved = store.save("Plan", "", sample_params()).expect("save");

        assert!(store.toggle_favorite(&saved.id).expect("toggle"));
        assert!(
            ScenarioStore::open(&path)
                .expect("reopen")
                .get(&saved.id)
                .expect("present")
                .is_favorite
        );
        assert!(!store.toggle_favorite(&saved.id).expect("toggle"));
        cleanup(&path);
    }

    #[test]
    fn delete_removes_and_reports_unknown_ids() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let saved = store.save("Plan", "", sample_params()).expect("save");

        store.delete(&saved.id).expect("delete");
        assert!(store.list().is_empty());

        let err = store.delete(&saved.id).expect_err("already gone");
        assert!(matches!(err, WealthError::ScenarioNotFound { .. }));
        cleanup(&path);
    }

    #[test]
    fn export_then_import_assigns_fresh_id() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let saved = store.save("Plan", "notes", sample_params()).expect("save");

        let exported = store.export_json(&saved.id).expect("export");
        assert!(exported.contains("\"careerTrack\": \"faang\""));

        let imported = store.import_json(&exported).expect("import");
        assert_ne!(imported.id, saved.id);
        assert_eq!(imported.name, saved.name);
        assert_eq!(imported.description, "notes");
        assert_eq!(imported.parameters, saved.parameters);
        assert_eq!(imported.created_at, saved.created_at);
        assert_eq!(store.list().len(), 2);
        cleanup(&path);
    }

    #[test]
    fn import_rejects_malformed_documents() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");

        let err = store.import_json("{ not json").expect_err("must reject");
        assert!(matches!(err, WealthError::InvalidScenario(_)));

        let err = store
            .import_json(r#"{"name": "orphan"}"#)
            .expect_err("parameters are required");
        assert!(matches!(err, WealthError::InvalidScenario(_)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn unknown_career_track_in_file_falls_back() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let raw = r#"{
          "name": "Legacy",
          "parameters": {
            "currentAge": 30,
            "annualSalary": 50000,
            "salaryGrowthPercent": 5,
            "investmentRatePercent": 10,
            "marketReturnPercent": 7,
            "inflationRatePercent": 2,
            "careerTrack": "astronaut",
            "taxJurisdiction": "uk",
            "horizonEndAge": 35
          }
        }"#;
        let imported = store.import_json(raw).expect("import");
        assert_eq!(imported.parameters.career_track, CareerTrack::Unrecognized);
        assert!(!imported.is_favorite);
        cleanup(&path);
    }

    #[test]
    fn failed_save_and_import_leave_store_unchanged() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        block_writes(&path);

        let err = store.save("Plan", "", sample_params()).expect_err("write must fail");
        assert!(matches!(err, WealthError::Io(_)));
        assert!(store.list().is_empty());

        let exported = r#"{"name": "Plan", "parameters": {
            "currentAge": 25, "annualSalary": 75000, "salaryGrowthPercent": 8,
            "investmentRatePercent": 20, "marketReturnPercent": 8, "inflationRatePercent": 3,
            "careerTrack": "global", "taxJurisdiction": "usa", "horizonEndAge": 35}}"#;
        let err = store.import_json(exported).expect_err("write must fail");
        assert!(matches!(err, WealthError::Io(_)));
        assert!(store.list().is_empty());
        cleanup(&path);
    }

    #[test]
    fn failed_delete_and_toggle_leave_store_unchanged() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let saved = store.save("Plan", "", sample_params()).expect("save");
        block_writes(&path);

        let err = store.toggle_favorite(&saved.id).expect_err("write must fail");
        assert!(matches!(err, WealthError::Io(_)));
        assert!(!store.get(&saved.id).expect("still present").is_favorite);

        let err = store.delete(&saved.id).expect_err("write must fail");
        assert!(matches!(err, WealthError::Io(_)));
        assert_eq!(store.list(), &[saved]);
        cleanup(&path);
    }

    #[test]
    fn import_and_save_reject_out_of_range_parameters() {
        let path = temp_store_path();
        let mut store = ScenarioStore::open(&path).expect("open");
        let raw = r#"{
          "name": "Immortal",
          "parameters": {
            "currentAge": 500,
            "annualSalary": 50000,
            "salaryGrowthPercent": 5,
            "investmentRatePercent": 10,
            "marketReturnPercent": 7,
            "inflationRatePercent": 2,
            "careerTrack": "local",
            "taxJurisdiction": "uk",
            "horizonEndAge": 100000
          }
        }"#;
        let err = store.import_json(raw).expect_err("must reject");
        match err {
            WealthError::InvalidScenario(msg) => assert!(msg.contains("currentAge"), "{msg}"),
            other => panic!("expected invalid scenario, got {other:?}"),
        }

        let mut params = sample_params();
        params.horizon_end_age = 100_000;
        let err = store.save("Forever", "", params).expect_err("must reject");
        match err {
            WealthError::InvalidScenario(msg) => assert!(msg.contains("horizonEndAge"), "{msg}"),
            other => panic!("expected invalid scenario, got {other:?}"),
        }
        assert!(store.list().is_empty());
        assert!(!path.exists());
    }
}
