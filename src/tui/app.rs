use crate::Config;
use crate::appointments::AppointmentList;
use crate::controller::{FormController, FormMode, Notice};
use crate::database::DatabaseError;
use crate::models::{Field, IdGenerator};
use crate::renderer::{ListRenderer, Row, RowAction};
use crate::store::RecordStore;
use crate::tui::widgets::input::{FormInputs, Input};
use ratatui::widgets::ListState;
use std::time::Instant;

/// Which pane receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: Focus,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Form,
            mode: Mode::Normal,
            selected_index: 0,
            list_state: ListState::default(),
        }
    }
}

/// A notice on screen and when it appeared
#[derive(Debug, Clone)]
pub struct Banner {
    pub notice: Notice,
    pub shown_at: Instant,
}

pub struct App {
    pub config: Config,
    pub store: RecordStore,

    pub appointments: AppointmentList,
    pub controller: FormController,
    pub renderer: ListRenderer,
    pub inputs: FormInputs,

    pub ui: UiState,
    pub banner: Option<Banner>,
}

impl App {
    pub fn new(config: Config, store: RecordStore) -> Result<Self, DatabaseError> {
        let ids = IdGenerator::seeded(store.max_id()?);
        let appointments = AppointmentList::from_records(store.all()?);
        let mut renderer = ListRenderer::new();
        renderer.rebuild(&store)?;

        let mut app = Self {
            config,
            store,
            appointments,
            controller: FormController::new(ids),
            renderer,
            inputs: FormInputs::default(),
            ui: UiState::default(),
            banner: None,
        };
        app.sync_list_state();
        Ok(app)
    }

    /// Run queued store writes and apply each completion in order
    pub fn pump_store(&mut self) {
        for completion in self.store.drain() {
            let reaction = self.controller.on_completion(&completion, &mut self.appointments);
            if let Some(notice) = reaction.notice {
                self.show_notice(notice);
            }
            if reaction.rerender {
                self.rerender();
            }
        }
    }

    /// Rebuild the visible rows from the store
    pub fn rerender(&mut self) {
        if let Err(e) = self.renderer.rebuild(&self.store) {
            tracing::error!(error = %e, "failed to rebuild appointment list");
        }
        self.adjust_selected_index();
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.banner = Some(Banner {
            notice,
            shown_at: Instant::now(),
        });
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Clear the banner once the configured timeout has passed
    pub fn check_banner_timeout(&mut self) {
        self.expire_banner(Instant::now());
    }

    fn expire_banner(&mut self, now: Instant) {
        let timeout = self.config.banner_timeout();
        let expired = self
            .banner
            .as_ref()
            .is_some_and(|banner| now.saturating_duration_since(banner.shown_at) >= timeout);
        if expired {
            self.clear_banner();
        }
    }

    /// Validate and queue the form's record. Errors go to the banner.
    pub fn submit_form(&mut self) {
        match self.controller.submit(&mut self.store) {
            Ok(_) => self.inputs.load(self.controller.draft()),
            Err(e) => self.show_notice(Notice::error(e.to_string())),
        }
    }

    pub fn perform_action(&mut self, action: RowAction) {
        match action {
            RowAction::Delete(id) => {
                self.store.delete(id);
            }
            RowAction::Edit(appointment) => {
                self.controller.begin_edit(&appointment);
                self.inputs.load(self.controller.draft());
                self.ui.focus = Focus::Form;
            }
        }
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.renderer.row(self.ui.selected_index)
    }

    pub fn edit_selected(&mut self) {
        if let Some(action) = self.selected_row().map(Row::edit_action) {
            self.perform_action(action);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(action) = self.selected_row().and_then(Row::delete_action) {
            self.perform_action(action);
        }
    }

    /// Start a fresh record, abandoning any edit in progress
    pub fn new_appointment(&mut self) {
        self.controller.cancel_edit();
        self.inputs.clear();
        self.ui.focus = Focus::Form;
    }

    pub fn cancel_form(&mut self) {
        self.controller.cancel_edit();
        self.inputs.clear();
        self.ui.focus = Focus::List;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.controller.mode(), FormMode::Editing { .. })
    }

    pub fn focus_list(&mut self) {
        self.ui.focus = Focus::List;
    }

    pub fn focus_form(&mut self) {
        self.ui.focus = Focus::Form;
    }

    pub fn next_field(&mut self) {
        self.controller.focus_next();
    }

    pub fn prev_field(&mut self) {
        self.controller.focus_prev();
    }

    fn current_input(&mut self) -> &mut Input {
        self.inputs.get_mut(self.controller.focus())
    }

    /// Copy the focused input into the staging record
    fn sync_field(&mut self) {
        let field: Field = self.controller.focus();
        let value = self.inputs.get(field).value();
        self.controller.set_field(field, value);
    }

    pub fn input_char(&mut self, ch: char) {
        self.current_input().insert_char(ch);
        self.sync_field();
    }

    pub fn input_backspace(&mut self) {
        self.current_input().delete_char();
        self.sync_field();
    }

    pub fn input_delete(&mut self) {
        self.current_input().delete_forward();
        self.sync_field();
    }

    pub fn cursor_left(&mut self) {
        self.current_input().move_cursor_left();
    }

    pub fn cursor_right(&mut self) {
        self.current_input().move_cursor_right();
    }

    pub fn cursor_home(&mut self) {
        self.current_input().move_cursor_home();
    }

    pub fn cursor_end(&mut self) {
        self.current_input().move_cursor_end();
    }

    /// Keep the selection on a real row after the list changed size
    pub fn adjust_selected_index(&mut self) {
        let len = self.renderer.len();
        if self.ui.selected_index >= len {
            self.ui.selected_index = len.saturating_sub(1);
        }
        self.sync_list_state();
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        if self.renderer.is_empty() {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index < self.renderer.len().saturating_sub(1) {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeKind;
    use crate::database::{Database, SCHEMA_VERSION};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn app() -> App {
        let store = RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap());
        App::new(Config::default(), store).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.input_char(c));
    }

    fn fill_form(app: &mut App, values: [&str; 6]) {
        for value in values {
            type_text(app, value);
            app.next_field();
        }
    }

    fn rex() -> [&'static str; 6] {
        ["Rex", "Ana", "555", "2024-01-01", "10:00", "cough"]
    }

    #[test]
    fn typed_record_appears_after_pump() {
        let mut app = app();
        fill_form(&mut app, rex());
        app.submit_form();

        // Nothing lands until the store is pumped
        assert!(app.renderer.is_empty());
        assert_eq!(app.inputs.get(Field::Pet).value(), "");

        app.pump_store();
        assert_eq!(app.renderer.len(), 1);
        assert_eq!(app.appointments.len(), 1);
        let banner = app.banner.as_ref().unwrap();
        assert_eq!(banner.notice.kind, NoticeKind::Success);
        assert_eq!(banner.notice.message, "Appointment added");
        assert_eq!(app.ui.list_state.selected(), Some(0));
    }

    #[test]
    fn missing_field_shows_error_banner() {
        let mut app = app();
        fill_form(&mut app, ["Rex", "Ana", "", "2024-01-01", "", "cough"]);
        app.submit_form();
        app.pump_store();

        let banner = app.banner.as_ref().unwrap();
        assert_eq!(banner.notice.kind, NoticeKind::Error);
        assert!(banner.notice.message.contains("time"));
        assert!(!banner.notice.message.contains("phone"));
        assert!(app.renderer.is_empty());
        // Typed values stay so the user can fix them
        assert_eq!(app.inputs.get(Field::Pet).value(), "Rex");
    }

    #[test]
    fn edit_selected_round_trip() {
        let mut app = app();
        fill_form(&mut app, rex());
        app.submit_form();
        app.pump_store();

        app.focus_list();
        app.edit_selected();
        assert_eq!(app.ui.focus, Focus::Form);
        assert!(app.is_editing());
        assert_eq!(app.controller.submit_label(), "Save changes");
        assert_eq!(app.inputs.get(Field::Symptoms).value(), "cough");

        for _ in 0..5 {
            app.next_field();
        }
        assert_eq!(app.controller.focus(), Field::Symptoms);
        for _ in 0.."cough".len() {
            app.input_backspace();
        }
        type_text(&mut app, "fever");
        app.submit_form();
        app.pump_store();

        assert!(!app.is_editing());
        assert_eq!(app.renderer.len(), 1);
        assert_eq!(app.renderer.row(0).unwrap().appointment.symptoms, "fever");
        assert_eq!(app.banner.as_ref().unwrap().notice.message, "Changes saved");
    }

    #[test]
    fn delete_selected_shrinks_list_and_clamps_selection() {
        let mut app = app();
        for pet in ["Rex", "Tom"] {
            let mut values = rex();
            values[0] = pet;
            fill_form(&mut app, values);
            app.submit_form();
        }
        app.pump_store();
        assert_eq!(app.renderer.len(), 2);

        app.move_selection_down();
        app.delete_selected();
        app.pump_store();
        assert_eq!(app.renderer.len(), 1);
        assert_eq!(app.ui.selected_index, 0);
        assert_eq!(app.renderer.row(0).unwrap().heading(), "Rex");

        app.delete_selected();
        app.pump_store();
        assert!(app.renderer.is_empty());
        assert_eq!(app.ui.list_state.selected(), None);
        // Nothing selected, nothing queued
        app.delete_selected();
        assert_eq!(app.store.pending(), 0);
    }

    #[test]
    fn stored_record_matches_typed_values_exactly() {
        let mut app = app();
        fill_form(&mut app, [" Rex ", "Ana", "", "2024-01-01", "10:00", "cough "]);
        app.submit_form();
        app.pump_store();

        let stored = app.store.all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].pet, " Rex ");
        assert_eq!(stored[0].symptoms, "cough ");
    }

    #[test]
    fn editing_keeps_stored_line_breaks() {
        let mut store = RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap());
        store.insert(crate::models::Appointment {
            id: Some(3),
            pet: "Rex".to_string(),
            owner: "Ana".to_string(),
            phone: String::new(),
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
            symptoms: "cough\nsince monday".to_string(),
        });
        store.drain();
        let mut app = App::new(Config::default(), store).unwrap();

        app.edit_selected();
        app.prev_field();
        assert_eq!(app.controller.focus(), Field::Symptoms);
        app.cursor_end();
        app.input_char('!');
        app.submit_form();
        app.pump_store();

        let stored = app.store.get(3).unwrap().unwrap();
        assert_eq!(stored.symptoms, "cough\nsince monday!");
    }

    #[test]
    fn cancel_form_leaves_edit_mode() {
        let mut app = app();
        fill_form(&mut app, rex());
        app.submit_form();
        app.pump_store();
        app.edit_selected();
        app.cancel_form();
        assert!(!app.is_editing());
        assert_eq!(app.ui.focus, Focus::List);
        assert_eq!(app.inputs.get(Field::Pet).value(), "");
    }

    #[test]
    fn banner_expires_after_timeout() {
        let mut app = app();
        app.show_notice(Notice::success("Appointment added"));
        let shown_at = app.banner.as_ref().unwrap().shown_at;

        app.expire_banner(shown_at + Duration::from_millis(3000));
        assert!(app.banner.is_some());
        app.expire_banner(shown_at + Duration::from_millis(3500));
        assert!(app.banner.is_none());
    }

    #[test]
    fn existing_records_load_on_start() {
        let mut store = RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap());
        store.insert(crate::models::Appointment {
            id: Some(7),
            pet: "Rex".to_string(),
            owner: "Ana".to_string(),
            phone: String::new(),
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
            symptoms: "cough".to_string(),
        });
        store.drain();

        let mut app = App::new(Config::default(), store).unwrap();
        assert_eq!(app.appointments.ids(), vec![7]);
        assert_eq!(app.renderer.len(), 1);

        // New ids never collide with stored ones
        fill_form(&mut app, rex());
        app.submit_form();
        app.pump_store();
        assert_eq!(app.renderer.len(), 2);
    }
}
