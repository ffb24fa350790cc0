//! Group Registry
//!
//! Name → group directory shared by the inbound peer server and the
//! application. Created once at startup and passed around explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::group::{Group, GroupBuilder};

// == Group Registry ==
/// Directory of every group served by this process.
///
/// Groups are only ever added; creating a group under an existing name
/// replaces the previous one.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Create ==
    /// Builds the group and installs it under its name.
    pub async fn create(&self, builder: GroupBuilder) -> Result<Arc<Group>> {
        let group = Arc::new(builder.build()?);

        let mut groups = self.groups.write().await;
        if groups
            .insert(group.name().to_string(), group.clone())
            .is_some()
        {
            warn!(group = group.name(), "replaced existing group");
        } else {
            info!(group = group.name(), "group created");
        }

        Ok(group)
    }

    // == Get ==
    /// Returns the group registered under `name`.
    pub async fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().await.get(name).cloned()
    }

    /// Names of all registered groups, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
