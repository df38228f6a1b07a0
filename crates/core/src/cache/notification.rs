use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ResourceType;

/// A "data changed" signal emitted after a mutation.
///
/// Serialized as `{ "type", "timestamp", "id", "delayed"? }`, the same shape
/// every process reads from the shared change slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    #[serde(rename = "type")]
    pub resource: ResourceType,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Random correlation id, unique per emission.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delayed: Option<bool>,
}

impl ChangeNotification {
    /// Creates the immediate notification for a mutation.
    pub fn new(resource: ResourceType, at: DateTime<Utc>) -> Self {
        Self {
            resource,
            timestamp: at.timestamp_millis(),
            id: Uuid::new_v4().to_string(),
            delayed: None,
        }
    }

    /// Creates the delayed re-emission for a mutation.
    pub fn delayed(resource: ResourceType, at: DateTime<Utc>) -> Self {
        Self {
            delayed: Some(true),
            ..Self::new(resource, at)
        }
    }

    /// Sets a specific id (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns true if this is the delayed re-emission.
    pub fn is_delayed(&self) -> bool {
        self.delayed.unwrap_or(false)
    }
}

/// Bounded memory of notification ids that have already been handled.
///
/// Listeners that want to react once per emission record each id here and
/// skip repeats. The oldest ids are forgotten once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct SeenIds {
    ids: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl SeenIds {
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records `id` and returns true if it had not been seen before.
    pub fn first_sighting(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.ids.insert(id.to_string());
        self.order.push_back(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
