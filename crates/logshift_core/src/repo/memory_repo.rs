//! In-memory tracker repository.
//!
//! # Responsibility
//! - Provide a non-durable `TrackerRepository` for tests and throwaway
//!   sessions.
//! - Mirror the SQLite backend's uniqueness, referential and ordering rules.
//!
//! # Invariants
//! - Maps are keyed by the unique fields (`username`, project `id`, `name`).
//! - Ids are assigned sequentially starting at 1, like SQLite rowids.
//! - Not `Sync`; single-threaded use only.

use crate::model::project::{Project, ProjectId};
use crate::model::user::{validate_username, User, UserId};
use crate::model::work_entry::{NewWorkEntry, WorkEntry, WorkEntryId};
use crate::repo::tracker_repo::{
    DuplicateKey, RepoError, RepoResult, TrackerRepository, WorkEntryFilter,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug)]
struct StoredEntry {
    id: WorkEntryId,
    user_id: UserId,
    date: NaiveDate,
    project_id: ProjectId,
    hours_worked: f64,
    description: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    user_ids_by_name: HashMap<String, UserId>,
    projects: Vec<Project>,
    project_slots: HashMap<ProjectId, usize>,
    project_names: HashSet<String>,
    entries: Vec<StoredEntry>,
    last_user_id: i64,
    last_entry_id: i64,
}

impl MemoryState {
    fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.project_slots
            .get(id)
            .and_then(|slot| self.projects.get(*slot))
    }

    fn resolve(&self, stored: &StoredEntry) -> RepoResult<WorkEntry> {
        let user = self.users.get(&stored.user_id).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "work entry {} references missing user {}",
                stored.id, stored.user_id
            ))
        })?;
        let project = self.project(&stored.project_id).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "work entry {} references missing project {}",
                stored.id, stored.project_id
            ))
        })?;

        Ok(WorkEntry {
            id: stored.id,
            user: user.clone(),
            date: stored.date,
            project: project.clone(),
            hours_worked: stored.hours_worked,
            description: stored.description.clone(),
        })
    }
}

/// `TrackerRepository` backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryTrackerRepository {
    state: RefCell<MemoryState>,
}

impl MemoryTrackerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackerRepository for MemoryTrackerRepository {
    fn create_user(&self, username: &str) -> RepoResult<User> {
        validate_username(username)?;

        let mut state = self.state.borrow_mut();
        if state.user_ids_by_name.contains_key(username) {
            return Err(RepoError::Duplicate(DuplicateKey::Username(
                username.to_string(),
            )));
        }

        state.last_user_id += 1;
        let user = User {
            id: UserId(state.last_user_id),
            username: username.to_string(),
        };
        state.user_ids_by_name.insert(user.username.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let state = self.state.borrow();
        Ok(state
            .user_ids_by_name
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.state.borrow().users.values().cloned().collect())
    }

    fn create_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let mut state = self.state.borrow_mut();
        if state.project_slots.contains_key(&project.id) {
            return Err(RepoError::Duplicate(DuplicateKey::ProjectId(
                project.id.clone(),
            )));
        }
        if state.project_names.contains(&project.name) {
            return Err(RepoError::Duplicate(DuplicateKey::ProjectName(
                project.name.clone(),
            )));
        }

        let slot = state.projects.len();
        state.projects.push(project.clone());
        state.project_slots.insert(project.id.clone(), slot);
        state.project_names.insert(project.name.clone());
        Ok(())
    }

    fn find_project(&self, id: &ProjectId) -> RepoResult<Option<Project>> {
        Ok(self.state.borrow().project(id).cloned())
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        Ok(self.state.borrow().projects.clone())
    }

    fn create_work_entry(&self, entry: &NewWorkEntry) -> RepoResult<WorkEntryId> {
        entry.validate()?;

        let mut state = self.state.borrow_mut();
        if !state.users.contains_key(&entry.user_id) {
            return Err(RepoError::UnknownUser(entry.user_id));
        }
        if !state.project_slots.contains_key(&entry.project_id) {
            return Err(RepoError::UnknownProject(entry.project_id.clone()));
        }

        state.last_entry_id += 1;
        let id = WorkEntryId(state.last_entry_id);
        state.entries.push(StoredEntry {
            id,
            user_id: entry.user_id,
            date: entry.date,
            project_id: entry.project_id.clone(),
            hours_worked: entry.hours_worked,
            description: entry.description.clone(),
        });
        Ok(id)
    }

    fn list_work_entries(&self, filter: &WorkEntryFilter) -> RepoResult<Vec<WorkEntry>> {
        let state = self.state.borrow();
        let mut matching = state
            .entries
            .iter()
            .filter(|stored| filter.matches(stored.user_id, &stored.project_id, stored.date))
            .collect::<Vec<_>>();
        matching.sort_by_key(|stored| (stored.date, stored.id));

        matching
            .into_iter()
            .map(|stored| state.resolve(stored))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTrackerRepository;
    use crate::model::project::Project;
    use crate::repo::tracker_repo::{DuplicateKey, RepoError, TrackerRepository};

    #[test]
    fn user_ids_are_sequential_from_one() {
        let repo = MemoryTrackerRepository::new();
        assert_eq!(repo.create_user("alice").unwrap().id.0, 1);
        assert_eq!(repo.create_user("bob").unwrap().id.0, 2);
    }

    #[test]
    fn project_id_collision_wins_over_name_collision() {
        let repo = MemoryTrackerRepository::new();
        repo.create_project(&Project::new("P1", "Website")).unwrap();

        let err = repo
            .create_project(&Project::new("P1", "Website"))
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Duplicate(DuplicateKey::ProjectId(id)) if id.as_str() == "P1"
        ));
    }

    #[test]
    fn failed_project_insert_leaves_state_untouched() {
        let repo = MemoryTrackerRepository::new();
        repo.create_project(&Project::new("P1", "Website")).unwrap();
        repo.create_project(&Project::new("P2", "Website"))
            .unwrap_err();

        assert_eq!(repo.list_projects().unwrap().len(), 1);
        assert!(repo.find_project(&"P2".into()).unwrap().is_none());
    }
}
