//! SQLite-based storage for tasks, categories and blocked resources.
//!
//! Also hosts the key-value table where the focus timer and the reward
//! ledger persist their state. Each component writes only its own key;
//! the in-memory accumulate call is the only thing that crosses between
//! them.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::data_dir;
use crate::blocklist::{BlockedResource, ResourceKind};
use crate::error::{CoreError, DatabaseError};
use crate::focus::{FocusTimer, RewardLedger};
use crate::task::{Category, Priority, Task, TimerStatus, DEFAULT_CATEGORIES};

/// kv key holding the persisted focus timer.
const FOCUS_TIMER_KEY: &str = "focus_timer";
/// kv key holding the persisted reward ledger.
const FOCUS_REWARDS_KEY: &str = "focus_rewards";

// === Helper Functions ===

/// Parse timer status from database string
fn parse_timer_status(status_str: &str) -> TimerStatus {
    match status_str {
        "running" => TimerStatus::Running,
        "paused" => TimerStatus::Paused,
        "completed" => TimerStatus::Completed,
        "failed" => TimerStatus::Failed,
        _ => TimerStatus::NotStarted,
    }
}

/// Format timer status for database storage
fn format_timer_status(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::NotStarted => "not_started",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
        TimerStatus::Completed => "completed",
        TimerStatus::Failed => "failed",
    }
}

/// Parse priority from database string
fn parse_priority(priority_str: &str) -> Priority {
    match priority_str {
        "low" => Priority::Low,
        "high" => Priority::High,
        _ => Priority::Medium,
    }
}

/// Format priority for database storage
fn format_priority(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

/// Parse resource kind from database string
fn parse_resource_kind(kind_str: &str) -> ResourceKind {
    match kind_str {
        "application" => ResourceKind::Application,
        _ => ResourceKind::Website,
    }
}

/// Format resource kind for database storage
fn format_resource_kind(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Website => "website",
        ResourceKind::Application => "application",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

/// Build a Task from a database row.
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let created_at: String = row.get(4)?;
    let due_date: Option<String> = row.get(5)?;
    let priority_str: String = row.get(7)?;
    let timer_started_at: Option<String> = row.get(9)?;
    let timer_status_str: String = row.get(10)?;
    let blocked_json: String = row.get(12)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at),
        due_date: parse_datetime_opt(due_date),
        category: row.get(6)?,
        priority: parse_priority(&priority_str),
        timer_duration_secs: row.get(8)?,
        timer_started_at: parse_datetime_opt(timer_started_at),
        timer_status: parse_timer_status(&timer_status_str),
        work_session_secs: row.get(11)?,
        blocked_resources: serde_json::from_str(&blocked_json).unwrap_or_default(),
    })
}

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, due_date, category, \
                            priority, timer_duration_secs, timer_started_at, timer_status, \
                            work_session_secs, blocked_resources";

/// SQLite database at `~/.config/tasko/tasko.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `data_dir()/tasko.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::DataDir(e.to_string()))?
            .join("tasko.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path (tests use a temp dir).
    pub fn open_at(path: &std::path::Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id                  TEXT PRIMARY KEY,
                    title               TEXT NOT NULL,
                    description         TEXT,
                    completed           INTEGER NOT NULL DEFAULT 0,
                    created_at          TEXT NOT NULL,
                    due_date            TEXT,
                    category            TEXT,
                    priority            TEXT NOT NULL DEFAULT 'medium',
                    timer_duration_secs INTEGER,
                    timer_started_at    TEXT,
                    timer_status        TEXT NOT NULL DEFAULT 'not_started',
                    work_session_secs   INTEGER NOT NULL DEFAULT 0,
                    blocked_resources   TEXT NOT NULL DEFAULT '[]'
                );

                CREATE TABLE IF NOT EXISTS categories (
                    id         TEXT PRIMARY KEY,
                    name       TEXT NOT NULL UNIQUE,
                    color      TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS blocked_resources (
                    id         TEXT PRIMARY KEY,
                    url        TEXT NOT NULL,
                    name       TEXT NOT NULL,
                    kind       TEXT NOT NULL DEFAULT 'website',
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
                CREATE INDEX IF NOT EXISTS idx_tasks_timer_status ON tasks(timer_status);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        self.seed_default_categories()?;
        Ok(())
    }

    fn seed_default_categories(&self) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        for (name, color) in DEFAULT_CATEGORIES {
            self.conn.execute(
                "INSERT OR IGNORE INTO categories (id, name, color, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![Uuid::new_v4().to_string(), name, color, now],
            )?;
        }
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            &format!(
                "INSERT INTO tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                TASK_COLUMNS
            ),
            params![
                task.id,
                task.title,
                task.description,
                task.completed,
                task.created_at.to_rfc3339(),
                task.due_date.map(|d| d.to_rfc3339()),
                task.category,
                format_priority(task.priority),
                task.timer_duration_secs,
                task.timer_started_at.map(|d| d.to_rfc3339()),
                format_timer_status(task.timer_status),
                task.work_session_secs,
                serde_json::to_string(&task.blocked_resources).unwrap_or_else(|_| "[]".into()),
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .prepare(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS))?
            .query_row(params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    /// All tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks ORDER BY created_at DESC",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Overwrite every mutable field of an existing task.
    pub fn update_task(&self, task: &Task) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, description = ?3, completed = ?4, due_date = ?5,
                              category = ?6, priority = ?7, timer_duration_secs = ?8,
                              timer_started_at = ?9, timer_status = ?10,
                              work_session_secs = ?11, blocked_resources = ?12
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.completed,
                task.due_date.map(|d| d.to_rfc3339()),
                task.category,
                format_priority(task.priority),
                task.timer_duration_secs,
                task.timer_started_at.map(|d| d.to_rfc3339()),
                format_timer_status(task.timer_status),
                task.work_session_secs,
                serde_json::to_string(&task.blocked_resources).unwrap_or_else(|_| "[]".into()),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn add_category(&self, category: &Category) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO categories (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                category.id,
                category.name,
                category.color,
                category.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, created_at FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], |row| {
                let created_at: String = row.get(3)?;
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                    created_at: parse_datetime_fallback(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn delete_category(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Blocked resources ────────────────────────────────────────────

    pub fn add_blocked_resource(&self, resource: &BlockedResource) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO blocked_resources (id, url, name, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                resource.id,
                resource.url,
                resource.name,
                format_resource_kind(resource.kind),
                resource.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_blocked_resources(&self) -> Result<Vec<BlockedResource>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, name, kind, created_at FROM blocked_resources ORDER BY created_at",
        )?;
        let resources = stmt
            .query_map([], |row| {
                let kind: String = row.get(3)?;
                let created_at: String = row.get(4)?;
                Ok(BlockedResource {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    name: row.get(2)?,
                    kind: parse_resource_kind(&kind),
                    created_at: parse_datetime_fallback(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(resources)
    }

    pub fn delete_blocked_resource(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM blocked_resources WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Focus state persistence ──────────────────────────────────────

    /// Load the persisted focus timer, falling back to the defaults on a
    /// missing key or malformed state.
    pub fn load_focus_timer(&self) -> FocusTimer {
        match self.kv_get(FOCUS_TIMER_KEY) {
            Ok(Some(json)) => FocusTimer::from_json(&json),
            _ => FocusTimer::new(),
        }
    }

    pub fn save_focus_timer(&self, timer: &FocusTimer) -> Result<(), CoreError> {
        let json = serde_json::to_string(timer)?;
        self.kv_set(FOCUS_TIMER_KEY, &json)?;
        Ok(())
    }

    /// Load the persisted reward ledger, falling back to the defaults on a
    /// missing key or malformed state.
    pub fn load_reward_ledger(&self) -> RewardLedger {
        match self.kv_get(FOCUS_REWARDS_KEY) {
            Ok(Some(json)) => RewardLedger::from_json(&json),
            _ => RewardLedger::new(),
        }
    }

    pub fn save_reward_ledger(&self, ledger: &RewardLedger) -> Result<(), CoreError> {
        let json = serde_json::to_string(ledger)?;
        self.kv_set(FOCUS_REWARDS_KEY, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_roundtrip() {
        let db = Database::open_memory().unwrap();
        let mut task = Task::new("Persist me");
        task.description = Some("details".into());
        task.category = Some("Work".into());
        task.priority = Priority::High;
        task.due_date = Some(Utc::now());
        task.blocked_resources = vec!["res-1".into(), "res-2".into()];
        db.create_task(&task).unwrap();

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Persist me");
        assert_eq!(loaded.priority, Priority::High);
        assert_eq!(loaded.timer_status, TimerStatus::NotStarted);
        assert_eq!(loaded.blocked_resources, task.blocked_resources);
        assert!(loaded.due_date.is_some());
    }

    #[test]
    fn update_and_delete_task() {
        let db = Database::open_memory().unwrap();
        let mut task = Task::new("Mutable");
        db.create_task(&task).unwrap();

        task.start_timer(1500).unwrap();
        task.title = "Renamed".into();
        assert!(db.update_task(&task).unwrap());

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.timer_status, TimerStatus::Running);

        assert!(db.delete_task(&task.id).unwrap());
        assert!(db.get_task(&task.id).unwrap().is_none());
        assert!(!db.delete_task(&task.id).unwrap());
    }

    #[test]
    fn default_categories_are_seeded_once() {
        let db = Database::open_memory().unwrap();
        let categories = db.list_categories().unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        for expected in ["Work", "Personal", "Shopping", "Health"] {
            assert!(names.contains(&expected));
        }
        // Re-running the migration must not duplicate them.
        db.migrate().unwrap();
        assert_eq!(db.list_categories().unwrap().len(), categories.len());
    }

    #[test]
    fn blocked_resource_roundtrip() {
        let db = Database::open_memory().unwrap();
        let resource = BlockedResource::new("youtube.com", "YouTube", ResourceKind::Website);
        db.add_blocked_resource(&resource).unwrap();

        let listed = db.list_blocked_resources().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, ResourceKind::Website);
        assert!(db.delete_blocked_resource(&resource.id).unwrap());
        assert!(db.list_blocked_resources().unwrap().is_empty());
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn focus_state_persists_and_recovers() {
        let db = Database::open_memory().unwrap();

        // Missing keys fall back to the defaults.
        assert_eq!(db.load_focus_timer().duration_secs(), 1500);
        assert_eq!(db.load_reward_ledger().total_focus_minutes(), 0);

        let mut timer = FocusTimer::with_duration(300);
        let mut ledger = RewardLedger::new();
        timer.start();
        timer.tick(&mut ledger);
        ledger.accumulate(11);
        db.save_focus_timer(&timer).unwrap();
        db.save_reward_ledger(&ledger).unwrap();

        let timer2 = db.load_focus_timer();
        let ledger2 = db.load_reward_ledger();
        assert_eq!(timer2.remaining_secs(), 299);
        assert!(timer2.is_running());
        assert_eq!(ledger2.total_focus_minutes(), 11);
        assert!(ledger2.is_unlocked("dust"));

        // Corrupted keys recover to the defaults.
        db.kv_set(FOCUS_TIMER_KEY, "{broken").unwrap();
        db.kv_set(FOCUS_REWARDS_KEY, "{broken").unwrap();
        assert_eq!(db.load_focus_timer().duration_secs(), 1500);
        assert_eq!(db.load_reward_ledger().total_focus_minutes(), 0);
    }
}
