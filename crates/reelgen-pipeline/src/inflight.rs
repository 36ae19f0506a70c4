// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user in-flight task registry.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use reelgen_core::UserId;
use tracing::debug;

/// Tracks which users have a generation running.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    tasks: Arc<DashMap<UserId, String>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `user`, or returns `None` if one is already held.
    pub fn try_acquire(&self, user: &UserId) -> Option<InFlightSlot> {
        match self.tasks.entry(user.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let task_id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
                debug!(user_id = %user, task_id = %task_id, "task registered");
                vacant.insert(task_id.clone());
                Some(InFlightSlot {
                    tasks: Arc::clone(&self.tasks),
                    user: user.clone(),
                    task_id,
                })
            }
        }
    }

    pub fn is_busy(&self, user: &UserId) -> bool {
        self.tasks.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Held for the duration of one request; releases the user's slot on drop.
#[derive(Debug)]
pub struct InFlightSlot {
    tasks: Arc<DashMap<UserId, String>>,
    user: UserId,
    task_id: String,
}

impl InFlightSlot {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        // Only remove our own entry.
        self.tasks.remove_if(&self.user, |_, id| *id == self.task_id);
        debug!(user_id = %self.user, task_id = %self.task_id, "task released");
    }
}
