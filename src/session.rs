use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;
use crate::schedule::{generate_assignment, Assignment, ScheduleTable};

type Observer = Arc<dyn Fn(&Assignment) + Send + Sync>;

/// Current assignment and the day it was generated for
struct Held {
    day_name: String,
    assignment: Arc<Assignment>,
}

/// Holds the current assignment for one session.
///
/// `replace` swaps the whole value, so readers only ever see the previous or
/// the new assignment.
#[derive(Default)]
pub struct Session {
    current: Mutex<Option<Held>>,
    observers: Mutex<Vec<Observer>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Assignment>> {
        self.lock_current().as_ref().map(|held| Arc::clone(&held.assignment))
    }

    /// Day name the current assignment was generated for
    pub fn current_day(&self) -> Option<String> {
        self.lock_current().as_ref().map(|held| held.day_name.clone())
    }

    /// Makes `assignment` (generated for `day_name`) the current one and
    /// notifies observers. Observers run without any session lock held.
    pub fn replace(&self, day_name: &str, assignment: Assignment) -> Arc<Assignment> {
        let assignment = Arc::new(assignment);
        *self.lock_current() = Some(Held {
            day_name: day_name.to_string(),
            assignment: Arc::clone(&assignment),
        });

        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(&assignment);
        }
        assignment
    }

    /// Registers a callback run after every replace
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&Assignment) + Send + Sync + 'static,
    {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Generates for `day_name` and replaces the current assignment.
    /// Days without a schedule entry leave the current value untouched.
    pub fn regenerate(&self, table: &ScheduleTable, day_name: &str, roster: &[String]) -> Option<Arc<Assignment>> {
        let assignment = generate_assignment(table, day_name, roster)?;
        info!(day_name, task_type = %assignment.task_type, "new assignment");
        Some(self.replace(day_name, assignment))
    }

    /// Current assignment if it was generated for `day_name`, otherwise a
    /// fresh one for that day
    pub fn current_for(&self, table: &ScheduleTable, day_name: &str, roster: &[String]) -> Option<Arc<Assignment>> {
        if self.current_day().as_deref() == Some(day_name) {
            return self.current();
        }
        self.regenerate(table, day_name, roster)
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Held>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn assignment(task: &str) -> Assignment {
        Assignment {
            task_type: task.to_string(),
            assigned_members: vec!["Ana".to_string()],
            message: format!("Kuy, piket {}", task),
        }
    }

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(session.current().is_none());
        assert!(session.current_day().is_none());
    }

    #[test]
    fn replace_supersedes_previous() {
        let session = Session::new();
        session.replace("Rabu", assignment("sampah"));
        let held = session.current().unwrap();
        session.replace("Kamis", assignment("lantai 1"));

        assert_eq!(held.task_type, "sampah");
        assert_eq!(session.current().unwrap().task_type, "lantai 1");
        assert_eq!(session.current_day().as_deref(), Some("Kamis"));
    }

    #[test]
    fn observers_see_each_replace() {
        let session = Session::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        session.subscribe(move |a| {
            assert!(!a.message.is_empty());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        session.replace("Rabu", assignment("sampah"));
        session.replace("Jumat", assignment("lantai 2"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observer_can_use_the_session() {
        let session = Arc::new(Session::new());
        let inner = Arc::clone(&session);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        session.subscribe(move |a| {
            assert_eq!(inner.current().unwrap().task_type, a.task_type);
            inner.subscribe(|_| {});
            seen.fetch_add(1, Ordering::SeqCst);
        });

        session.replace("Rabu", assignment("sampah"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn regenerate_unknown_day_keeps_current() {
        let session = Session::new();
        let table = ScheduleTable::default();
        session.replace("Rabu", assignment("sampah"));

        assert!(session.regenerate(&table, "Libur", &["Ana".to_string()]).is_none());
        assert_eq!(session.current().unwrap().task_type, "sampah");
        assert_eq!(session.current_day().as_deref(), Some("Rabu"));
    }

    #[test]
    fn regenerate_known_day_replaces_current() {
        let session = Session::new();
        let table = ScheduleTable::default();
        let roster = vec!["Ana".to_string(), "Budi".to_string()];

        let fresh = session.regenerate(&table, "Senin", &roster).unwrap();
        assert_eq!(fresh.task_type, "jendela");
        assert!(Arc::ptr_eq(&fresh, &session.current().unwrap()));
        assert_eq!(session.current_day().as_deref(), Some("Senin"));
    }

    #[test]
    fn current_for_keeps_same_day_and_refreshes_other_day() {
        let session = Session::new();
        let table = ScheduleTable::default();
        let roster = vec!["Ana".to_string(), "Budi".to_string()];

        let monday = session.regenerate(&table, "Senin", &roster).unwrap();
        let again = session.current_for(&table, "Senin", &roster).unwrap();
        assert!(Arc::ptr_eq(&monday, &again));

        let tuesday = session.current_for(&table, "Selasa", &roster).unwrap();
        assert_eq!(tuesday.task_type, "makan");
        assert_eq!(session.current_day().as_deref(), Some("Selasa"));
    }
}
