// src/api/buildings.rs
use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::models::{Building, BuildingFilter, NewBuilding};

impl ApiClient {
    pub fn list_buildings(&self) -> Result<Vec<Building>, ApiError> {
        let url = self.url("buildings")?;
        self.send(self.get(url), "buildings")
    }

    pub fn get_building(&self, id: i64) -> Result<Building, ApiError> {
        let url = self.url(&format!("buildings/{id}"))?;
        self.send(self.get(url), &format!("building {id}"))
    }

    /// Only the filters that are set end up in the query string.
    pub fn filter_buildings(&self, filter: &BuildingFilter) -> Result<Vec<Building>, ApiError> {
        let mut url = self.url("buildings/filter")?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(min) = filter.min_cost {
                q.append_pair("minCost", &min.to_string());
            }
            if let Some(max) = filter.max_cost {
                q.append_pair("maxCost", &max.to_string());
            }
            if let Some(t) = filter.property_type.as_deref().filter(|t| !t.is_empty()) {
                q.append_pair("type", t);
            }
        }
        self.send(self.get(url), "buildings filter")
    }

    pub fn create_building(&self, input: &NewBuilding) -> Result<Building, ApiError> {
        let url = self.url("buildings")?;
        self.send(self.post(url).json(input), "create building")
    }

    pub fn update_building(&self, id: i64, input: &NewBuilding) -> Result<Building, ApiError> {
        let url = self.url(&format!("buildings/{id}"))?;
        self.send(self.put(url).json(input), &format!("building {id}"))
    }

    pub fn delete_building(&self, id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("buildings/{id}"))?;
        self.send(self.delete(url), &format!("building {id}"))
    }
}
