//! Request/completion front for the appointment database.
//!
//! Writes are queued and return a [`Ticket`] straight away; nothing touches
//! storage until the owner pumps the queue with [`RecordStore::poll`] or
//! [`RecordStore::drain`]. Completions come back in request order on the
//! same thread, so the event loop can treat each one like a callback.

use std::collections::VecDeque;
use std::path::Path;

use crate::database::{Database, DatabaseError};
use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Insert(Appointment),
    Update(Appointment),
    Delete(i64),
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Insert(_) => "insert",
            Request::Update(_) => "update",
            Request::Delete(_) => "delete",
        }
    }
}

/// Outcome of one request. `result` carries the affected id.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub request: Request,
    pub result: Result<i64, DatabaseError>,
}

pub struct RecordStore {
    db: Database,
    pending: VecDeque<(Ticket, Request)>,
    next_ticket: u64,
}

impl RecordStore {
    pub fn open(path: &Path, schema_version: u32) -> Result<Self, DatabaseError> {
        match Database::open(path, schema_version) {
            Ok(db) => {
                tracing::info!(path = %path.display(), schema_version, "record store opened");
                Ok(Self::new(db))
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "record store failed to open");
                Err(e)
            }
        }
    }

    pub fn new(db: Database) -> Self {
        Self {
            db,
            pending: VecDeque::new(),
            next_ticket: 0,
        }
    }

    /// Queue a write and return immediately
    pub fn request(&mut self, request: Request) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        tracing::debug!(ticket = ticket.0, kind = request.kind(), "store request queued");
        self.pending.push_back((ticket, request));
        ticket
    }

    pub fn insert(&mut self, appointment: Appointment) -> Ticket {
        self.request(Request::Insert(appointment))
    }

    pub fn update(&mut self, appointment: Appointment) -> Ticket {
        self.request(Request::Update(appointment))
    }

    pub fn delete(&mut self, id: i64) -> Ticket {
        self.request(Request::Delete(id))
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run the oldest queued request
    pub fn poll(&mut self) -> Option<Completion> {
        let (ticket, request) = self.pending.pop_front()?;
        let result = match &request {
            Request::Insert(appointment) => self.db.insert(appointment),
            Request::Update(appointment) => self.db.update(appointment),
            Request::Delete(id) => self.db.delete(*id).map(|()| *id),
        };
        if let Err(ref e) = result {
            tracing::error!(ticket = ticket.0, kind = request.kind(), error = %e, "store request failed");
        }
        Some(Completion {
            ticket,
            request,
            result,
        })
    }

    /// Run every queued request in arrival order
    pub fn drain(&mut self) -> Vec<Completion> {
        std::iter::from_fn(|| self.poll()).collect()
    }

    pub fn iterate_all<F>(&self, visit: F) -> Result<(), DatabaseError>
    where
        F: FnMut(Appointment),
    {
        self.db.for_each(visit)
    }

    pub fn get(&self, id: i64) -> Result<Option<Appointment>, DatabaseError> {
        self.db.get(id)
    }

    pub fn all(&self) -> Result<Vec<Appointment>, DatabaseError> {
        self.db.all()
    }

    pub fn count(&self) -> Result<usize, DatabaseError> {
        self.db.count()
    }

    pub fn max_id(&self) -> Result<i64, DatabaseError> {
        self.db.max_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SCHEMA_VERSION;

    fn store() -> RecordStore {
        RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap())
    }

    fn appointment(id: i64, pet: &str) -> Appointment {
        Appointment {
            id: Some(id),
            pet: pet.to_string(),
            owner: "Ana".to_string(),
            phone: String::new(),
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
            symptoms: "cough".to_string(),
        }
    }

    #[test]
    fn request_does_not_touch_storage_until_polled() {
        let mut store = store();
        let ticket = store.insert(appointment(1, "Rex"));
        assert_eq!(store.pending(), 1);
        assert!(store.all().unwrap().is_empty());

        let completion = store.poll().unwrap();
        assert_eq!(completion.ticket, ticket);
        assert_eq!(completion.result.unwrap(), 1);
        assert_eq!(store.all().unwrap().len(), 1);
        assert!(store.poll().is_none());
    }

    #[test]
    fn completions_arrive_in_request_order() {
        let mut store = store();
        let first = store.insert(appointment(1, "Rex"));
        let second = store.update(Appointment {
            symptoms: "fever".to_string(),
            ..appointment(1, "Rex")
        });
        let third = store.delete(1);

        let completions = store.drain();
        let tickets: Vec<_> = completions.iter().map(|c| c.ticket).collect();
        assert_eq!(tickets, vec![first, second, third]);
        assert!(completions.iter().all(|c| c.result.is_ok()));
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn failed_request_reports_error_and_leaves_store_alone() {
        let mut store = store();
        store.update(appointment(77, "Ghost"));
        store.delete(77);
        let completions = store.drain();
        assert!(matches!(completions[0].result, Err(DatabaseError::NotFound(77))));
        assert_eq!(completions[1].result.as_ref().ok(), Some(&77));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn open_twice_sees_earlier_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.db");
        {
            let mut store = RecordStore::open(&path, SCHEMA_VERSION).unwrap();
            store.insert(appointment(3, "Rex"));
            store.drain();
        }
        let store = RecordStore::open(&path, SCHEMA_VERSION).unwrap();
        assert_eq!(store.get(3).unwrap().map(|a| a.pet), Some("Rex".to_string()));
        assert_eq!(store.max_id().unwrap(), 3);
    }
}
