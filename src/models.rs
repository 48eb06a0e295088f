use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Option<i64>,
    pub pet: String,
    pub owner: String,
    pub phone: String,
    pub date: String, // YYYY-MM-DD as typed
    pub time: String, // HH:MM as typed
    pub symptoms: String,
}

/// One of the six form inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Pet,
    Owner,
    Phone,
    Date,
    Time,
    Symptoms,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Pet,
        Field::Owner,
        Field::Phone,
        Field::Date,
        Field::Time,
        Field::Symptoms,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Pet => "Pet",
            Field::Owner => "Owner",
            Field::Phone => "Phone",
            Field::Date => "Date",
            Field::Time => "Time",
            Field::Symptoms => "Symptoms",
        }
    }

    /// Column name in the appointments table
    pub fn column(self) -> &'static str {
        match self {
            Field::Pet => "pet",
            Field::Owner => "owner",
            Field::Phone => "phone",
            Field::Date => "date",
            Field::Time => "time",
            Field::Symptoms => "symptoms",
        }
    }

    // Phone is collected but never checked.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::Phone)
    }

    pub fn next(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required (missing: {})", join_fields(.0))]
    MissingFields(Vec<Field>),
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(|f| f.column()).collect::<Vec<_>>().join(", ")
}

/// Staging record filled from form input before a create or edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub pet: String,
    pub owner: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub symptoms: String,
}

impl Draft {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            pet: appointment.pet.clone(),
            owner: appointment.owner.clone(),
            phone: appointment.phone.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            symptoms: appointment.symptoms.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Pet => &self.pet,
            Field::Owner => &self.owner,
            Field::Phone => &self.phone,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Symptoms => &self.symptoms,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Pet => self.pet = value,
            Field::Owner => self.owner = value,
            Field::Phone => self.phone = value,
            Field::Date => self.date = value,
            Field::Time => self.time = value,
            Field::Symptoms => self.symptoms = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_empty())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// Build the record to persist, fields exactly as typed
    pub fn to_appointment(&self, id: Option<i64>) -> Appointment {
        Appointment {
            id,
            pet: self.pet.clone(),
            owner: self.owner.clone(),
            phone: self.phone.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            symptoms: self.symptoms.clone(),
        }
    }
}

/// Hands out creation-time identifiers that never repeat within a process.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Seed with the largest id already stored so ids keep increasing
    /// across restarts even if the clock moved backwards.
    pub fn seeded(last: i64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id
    }
}
