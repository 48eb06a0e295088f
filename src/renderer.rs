use crate::database::DatabaseError;
use crate::models::Appointment;
use crate::store::RecordStore;

/// Action bound to a rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Delete(i64),
    Edit(Appointment),
}

/// One displayed appointment block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub appointment: Appointment,
}

impl Row {
    pub fn id(&self) -> Option<i64> {
        self.appointment.id
    }

    pub fn heading(&self) -> &str {
        &self.appointment.pet
    }

    /// Labeled detail lines under the heading
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let a = &self.appointment;
        vec![
            ("Owner", a.owner.as_str()),
            ("Phone", a.phone.as_str()),
            ("Date", a.date.as_str()),
            ("Time", a.time.as_str()),
            ("Symptoms", a.symptoms.as_str()),
        ]
    }

    pub fn delete_action(&self) -> Option<RowAction> {
        self.appointment.id.map(RowAction::Delete)
    }

    pub fn edit_action(&self) -> RowAction {
        RowAction::Edit(self.appointment.clone())
    }
}

/// Rows currently on screen, always rebuilt from the store
#[derive(Debug, Clone, Default)]
pub struct ListRenderer {
    rows: Vec<Row>,
}

impl ListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every row and re-read the store from the start
    pub fn rebuild(&mut self, store: &RecordStore) -> Result<(), DatabaseError> {
        self.rows.clear();
        let rows = &mut self.rows;
        store.iterate_all(|appointment| rows.push(Row { appointment }))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
