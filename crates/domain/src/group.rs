//! Process groups for reporting.

use chrono::{DateTime, Utc};
use common::RecordId;
use record_store::Collection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Entity;

/// Errors raised by group operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroupError {
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Invalid group: {0}")]
    InvalidGroup(String),
}

/// A named set of process ids.
///
/// Members are not checked against existing processes; stale ids are
/// tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroup {
    pub id: String,
    pub name: String,
    pub process_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ProcessGroup {
    /// Creates a group with a fresh id.
    pub fn new(name: &str, process_ids: Vec<String>) -> Result<Self, GroupError> {
        Ok(Self {
            id: RecordId::new().to_string(),
            name: validate_name(name)?,
            process_ids: validate_members(process_ids)?,
            created_at: Utc::now(),
        })
    }

    /// Applies a partial update.
    pub fn update(
        &mut self,
        name: Option<&str>,
        process_ids: Option<Vec<String>>,
    ) -> Result<(), GroupError> {
        let name = name.map(validate_name).transpose()?;
        let process_ids = process_ids.map(validate_members).transpose()?;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(ids) = process_ids {
            self.process_ids = ids;
        }
        Ok(())
    }

    pub fn contains(&self, process_id: &str) -> bool {
        self.process_ids.iter().any(|id| id == process_id)
    }
}

impl Entity for ProcessGroup {
    const COLLECTION: Collection = Collection::ProcessGroups;

    fn key(&self) -> String {
        self.id.clone()
    }
}

fn validate_name(name: &str) -> Result<String, GroupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GroupError::InvalidGroup("name must not be blank".to_string()));
    }
    Ok(name.to_string())
}

fn validate_members(ids: Vec<String>) -> Result<Vec<String>, GroupError> {
    let mut members: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !members.contains(&id) {
            members.push(id);
        }
    }
    if members.is_empty() {
        return Err(GroupError::InvalidGroup(
            "a group needs at least one process".to_string(),
        ));
    }
    Ok(members)
}
