use crate::appointments::AppointmentList;
use crate::models::{Appointment, Draft, Field, IdGenerator, ValidationError};
use crate::store::{Completion, RecordStore, Request, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message for the banner line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// What the caller has to do after a completion was handled
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reaction {
    pub notice: Option<Notice>,
    pub rerender: bool,
}

/// Drives the appointment form: staging record, create/edit state, and
/// what happens when the store reports back.
#[derive(Debug, Clone)]
pub struct FormController {
    mode: FormMode,
    draft: Draft,
    focus: Field,
    ids: IdGenerator,
}

impl FormController {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            mode: FormMode::Creating,
            draft: Draft::default(),
            focus: Field::Pet,
            ids,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Create",
            FormMode::Editing { .. } => "Save changes",
        }
    }

    /// Mirror one input into the staging record
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Load an existing record for editing
    pub fn begin_edit(&mut self, appointment: &Appointment) {
        let Some(id) = appointment.id else {
            tracing::warn!("edit requested for an appointment that was never stored");
            return;
        };
        self.draft = Draft::from_appointment(appointment);
        self.focus = Field::Pet;
        self.mode = FormMode::Editing { id };
        tracing::debug!(id, "editing appointment");
    }

    pub fn cancel_edit(&mut self) {
        self.mode = FormMode::Creating;
        self.reset();
    }

    fn reset(&mut self) {
        self.draft.clear();
        self.focus = Field::Pet;
    }

    /// Validate the staging record and queue the matching store write.
    /// The staging record is cleared once the write is queued.
    pub fn submit(&mut self, store: &mut RecordStore) -> Result<Ticket, ValidationError> {
        self.draft.validate()?;

        let ticket = match self.mode {
            FormMode::Creating => {
                let id = self.ids.next_id();
                store.insert(self.draft.to_appointment(Some(id)))
            }
            FormMode::Editing { id } => store.update(self.draft.to_appointment(Some(id))),
        };
        self.reset();
        Ok(ticket)
    }

    /// Apply a store completion to the list and form state
    pub fn on_completion(&mut self, completion: &Completion, list: &mut AppointmentList) -> Reaction {
        match (&completion.request, &completion.result) {
            (Request::Insert(appointment), Ok(id)) => {
                list.add(Appointment {
                    id: Some(*id),
                    ..appointment.clone()
                });
                Reaction {
                    notice: Some(Notice::success("Appointment added")),
                    rerender: true,
                }
            }
            (Request::Update(appointment), Ok(id)) => {
                list.replace(appointment.clone());
                self.leave_edit(*id);
                Reaction {
                    notice: Some(Notice::success("Changes saved")),
                    rerender: true,
                }
            }
            (Request::Delete(id), Ok(_)) => {
                list.remove(*id);
                // Typed values stay in the draft and become a new record
                self.leave_edit(*id);
                Reaction {
                    notice: None,
                    rerender: true,
                }
            }
            (Request::Update(appointment), Err(e)) => {
                tracing::error!(id = ?appointment.id, error = %e, "appointment update failed");
                if let Some(id) = appointment.id {
                    self.leave_edit(id);
                }
                Reaction::default()
            }
            (request, Err(e)) => {
                tracing::error!(kind = request.kind(), error = %e, "appointment write failed");
                Reaction::default()
            }
        }
    }

    fn leave_edit(&mut self, id: i64) {
        if self.mode == (FormMode::Editing { id }) {
            self.mode = FormMode::Creating;
        }
    }
}
