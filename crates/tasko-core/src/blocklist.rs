//! Distraction-blocking filter shared with the browser extension.
//!
//! The extension owns the actual network interception; this module owns
//! the decision logic and the message shape handed across that boundary.
//! Matching is by hostname containment after stripping the scheme and a
//! leading `www.`, and only website resources participate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::task::{Task, TimerStatus};

/// Kind of blocked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Website,
    Application,
}

impl std::str::FromStr for ResourceKind {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(ResourceKind::Website),
            "application" => Ok(ResourceKind::Application),
            other => Err(crate::error::ValidationError::InvalidValue {
                field: "kind".into(),
                message: format!("unknown kind: {other} (expected website or application)"),
            }),
        }
    }
}

/// A resource the user wants blocked during focused work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedResource {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub created_at: DateTime<Utc>,
}

impl BlockedResource {
    pub fn new(url: impl Into<String>, name: impl Into<String>, kind: ResourceKind) -> Self {
        BlockedResource {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            name: name.into(),
            kind,
            created_at: Utc::now(),
        }
    }
}

/// The message handed to the blocking extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockUpdate {
    pub resources: Vec<BlockedResource>,
    pub is_blocking: bool,
}

/// Allow/deny filter over a set of blocked resources.
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    resources: Vec<BlockedResource>,
    is_blocking: bool,
}

/// Strip scheme and a leading `www.` for comparison.
fn normalize_host(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let stripped = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    stripped
        .strip_prefix("www.")
        .unwrap_or(stripped)
        .to_string()
}

impl BlockFilter {
    pub fn new(update: BlockUpdate) -> Self {
        Self {
            resources: update.resources,
            is_blocking: update.is_blocking,
        }
    }

    /// Replace the active resource set and blocking flag.
    pub fn apply(&mut self, update: BlockUpdate) {
        self.resources = update.resources;
        self.is_blocking = update.is_blocking;
    }

    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    /// Decide whether a request to `request_url` should be blocked.
    ///
    /// Unparseable URLs are never blocked; the filter fails open.
    pub fn is_blocked(&self, request_url: &str) -> bool {
        if !self.is_blocking {
            return false;
        }
        let host = match Url::parse(request_url) {
            Ok(url) => match url.host_str() {
                Some(h) => normalize_host(h),
                None => return false,
            },
            Err(_) => return false,
        };
        self.resources.iter().any(|resource| {
            resource.kind == ResourceKind::Website && host.contains(&normalize_host(&resource.url))
        })
    }
}

/// Build the update for the currently running tasks.
///
/// Blocking is on only while at least one task timer is RUNNING with a
/// non-empty block list; the update then carries every resource those
/// tasks reference.
pub fn active_block_update(tasks: &[Task], resources: &[BlockedResource]) -> BlockUpdate {
    let active_ids: Vec<&String> = tasks
        .iter()
        .filter(|t| t.timer_status == TimerStatus::Running && !t.blocked_resources.is_empty())
        .flat_map(|t| t.blocked_resources.iter())
        .collect();

    if active_ids.is_empty() {
        return BlockUpdate {
            resources: Vec::new(),
            is_blocking: false,
        };
    }

    let selected: Vec<BlockedResource> = resources
        .iter()
        .filter(|r| active_ids.iter().any(|id| **id == r.id))
        .cloned()
        .collect();

    BlockUpdate {
        is_blocking: !selected.is_empty(),
        resources: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn site(url: &str) -> BlockedResource {
        BlockedResource::new(url, url, ResourceKind::Website)
    }

    #[test]
    fn blocks_matching_hostnames() {
        let filter = BlockFilter::new(BlockUpdate {
            resources: vec![site("https://www.youtube.com")],
            is_blocking: true,
        });
        assert!(filter.is_blocked("https://youtube.com/watch?v=abc"));
        assert!(filter.is_blocked("https://www.youtube.com/"));
        assert!(filter.is_blocked("https://music.youtube.com/"));
        assert!(!filter.is_blocked("https://example.com/"));
    }

    #[test]
    fn disabled_filter_blocks_nothing() {
        let filter = BlockFilter::new(BlockUpdate {
            resources: vec![site("youtube.com")],
            is_blocking: false,
        });
        assert!(!filter.is_blocked("https://youtube.com/"));
    }

    #[test]
    fn applications_do_not_match_urls() {
        let filter = BlockFilter::new(BlockUpdate {
            resources: vec![BlockedResource::new(
                "slack.com",
                "Slack",
                ResourceKind::Application,
            )],
            is_blocking: true,
        });
        assert!(!filter.is_blocked("https://slack.com/"));
    }

    #[test]
    fn apply_replaces_the_active_set() {
        let mut filter = BlockFilter::new(BlockUpdate {
            resources: vec![site("youtube.com")],
            is_blocking: true,
        });
        assert!(filter.is_blocked("https://youtube.com/"));

        filter.apply(BlockUpdate {
            resources: vec![site("twitter.com")],
            is_blocking: true,
        });
        assert!(!filter.is_blocked("https://youtube.com/"));
        assert!(filter.is_blocked("https://twitter.com/home"));
        assert!(filter.is_blocking());

        filter.apply(BlockUpdate {
            resources: Vec::new(),
            is_blocking: false,
        });
        assert!(!filter.is_blocking());
    }

    #[test]
    fn unparseable_urls_fail_open() {
        let filter = BlockFilter::new(BlockUpdate {
            resources: vec![site("youtube.com")],
            is_blocking: true,
        });
        assert!(!filter.is_blocked("not a url"));
        assert!(!filter.is_blocked(""));
    }

    #[test]
    fn update_for_running_tasks_only() {
        let youtube = site("youtube.com");
        let twitter = site("twitter.com");

        let mut watching = Task::new("Watch course");
        watching.blocked_resources = vec![youtube.id.clone()];
        watching.start_timer(1500).unwrap();

        let mut idle = Task::new("Later");
        idle.blocked_resources = vec![twitter.id.clone()];

        let resources = vec![youtube.clone(), twitter.clone()];
        let update = active_block_update(&[watching.clone(), idle], &resources);
        assert!(update.is_blocking);
        assert_eq!(update.resources.len(), 1);
        assert_eq!(update.resources[0].id, youtube.id);

        // Pausing the only running task disables blocking.
        watching.pause_timer().unwrap();
        let update = active_block_update(&[watching], &resources);
        assert!(!update.is_blocking);
        assert!(update.resources.is_empty());
    }

    #[test]
    fn running_task_without_block_list_keeps_blocking_off() {
        let mut task = Task::new("Unblocked work");
        task.start_timer(60).unwrap();
        let update = active_block_update(&[task], &[site("youtube.com")]);
        assert!(!update.is_blocking);
    }
}
