//! Commands accepted by the inventory service.

use common::{Diameter, Weight};
use serde::Deserialize;

use crate::ledger::ProcessTag;
use crate::reconciliation::ProcessOutputs;

/// Command to add a batch of rods to stock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositStock {
    pub diameter: Diameter,
    pub weight: Weight,
    /// Total length in millimetres.
    #[serde(default, alias = "totalLength")]
    pub length: Option<f64>,
}

impl DepositStock {
    pub fn new(diameter: Diameter, weight: Weight) -> Self {
        Self {
            diameter,
            weight,
            length: None,
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }
}

/// Command to take weight out of stock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawStock {
    pub diameter: Diameter,
    #[serde(alias = "amount")]
    pub weight: Weight,
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub process_name: Option<String>,
}

impl WithdrawStock {
    pub fn new(diameter: Diameter, weight: Weight) -> Self {
        Self {
            diameter,
            weight,
            process_id: None,
            process_name: None,
        }
    }

    pub fn tagged(mut self, process_id: impl Into<String>, process_name: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self.process_name = Some(process_name.into());
        self
    }

    /// The history tag, when a process id was given.
    pub fn tag(&self) -> Option<ProcessTag> {
        self.process_id.as_ref().map(|id| {
            ProcessTag::new(id.clone(), self.process_name.clone().unwrap_or_default())
        })
    }
}

/// Command to reconcile and complete a process.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeProcess {
    pub process_id: String,
    pub outputs: ProcessOutputs,
    pub add_leftover_to_stock: bool,
}

impl FinalizeProcess {
    pub fn new(process_id: impl Into<String>, outputs: ProcessOutputs) -> Self {
        Self {
            process_id: process_id.into(),
            outputs,
            add_leftover_to_stock: false,
        }
    }

    pub fn add_leftover_to_stock(mut self, add: bool) -> Self {
        self.add_leftover_to_stock = add;
        self
    }
}

/// Command to create a process group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub name: String,
    pub process_ids: Vec<String>,
}

impl CreateGroup {
    pub fn new(name: impl Into<String>, process_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            process_ids,
        }
    }
}

/// Command to rename a group or replace its members.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateGroup {
    pub group_id: String,
    pub name: Option<String>,
    pub process_ids: Option<Vec<String>>,
}

impl UpdateGroup {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            name: None,
            process_ids: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn process_ids(mut self, ids: Vec<String>) -> Self {
        self.process_ids = Some(ids);
        self
    }
}
