//! Worker (employee) model.
//!
//! Workers perform work items. Each worker holds a set of stage
//! capabilities (roles) and a daily capacity in minutes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Stage;

/// Default working hours per day.
pub const DEFAULT_WORK_HOURS_PER_DAY: u32 = 8;

/// A worker that can be assigned work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Stages this worker may process.
    #[serde(default)]
    pub capabilities: BTreeSet<Stage>,
    /// Working minutes per day.
    #[serde(default = "default_daily_capacity")]
    pub daily_capacity_minutes: u32,
    /// Inactive workers are never eligible.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_daily_capacity() -> u32 {
    DEFAULT_WORK_HOURS_PER_DAY * 60
}

fn default_active() -> bool {
    true
}

impl Worker {
    /// Creates an active worker with an 8-hour day and no capabilities.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capabilities: BTreeSet::new(),
            daily_capacity_minutes: default_daily_capacity(),
            active: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a capability.
    pub fn with_capability(mut self, stage: Stage) -> Self {
        self.capabilities.insert(stage);
        self
    }

    /// Adds the capability granted by a role name. Unknown roles are ignored.
    pub fn with_role(mut self, role: &str) -> Self {
        if let Some(stage) = Stage::from_role(role) {
            self.capabilities.insert(stage);
        }
        self
    }

    /// Sets the daily capacity from working hours.
    pub fn with_work_hours(mut self, hours_per_day: u32) -> Self {
        self.daily_capacity_minutes = hours_per_day * 60;
        self
    }

    /// Sets the daily capacity in minutes.
    pub fn with_daily_capacity(mut self, minutes: u32) -> Self {
        self.daily_capacity_minutes = minutes;
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this worker holds the capability for a stage.
    pub fn can_process(&self, stage: &Stage) -> bool {
        self.capabilities.contains(stage)
    }

    /// Whether this worker can take any work at all.
    pub fn is_available_for_planning(&self) -> bool {
        self.active && self.daily_capacity_minutes > 0
    }

    /// Whether this worker is eligible for a stage.
    pub fn is_eligible_for(&self, stage: &Stage) -> bool {
        self.is_available_for_planning() && self.can_process(stage)
    }

    /// Name if present, otherwise the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
