use crate::models::Appointment;

/// In-memory mirror of the stored appointments, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AppointmentList {
    items: Vec<Appointment>,
}

impl AppointmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(items: Vec<Appointment>) -> Self {
        Self { items }
    }

    /// Append without checking ids; the store owns uniqueness
    pub fn add(&mut self, appointment: Appointment) {
        self.items.push(appointment);
    }

    pub fn remove(&mut self, id: i64) {
        self.items.retain(|a| a.id != Some(id));
    }

    /// Swap in the record with the same id. Silently ignored when no record matches.
    pub fn replace(&mut self, updated: Appointment) {
        for item in self.items.iter_mut().filter(|a| a.id == updated.id) {
            *item = updated.clone();
        }
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.items.iter().find(|a| a.id == Some(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().filter_map(|a| a.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: i64, symptoms: &str) -> Appointment {
        Appointment {
            id: Some(id),
            pet: "Rex".to_string(),
            owner: "Ana".to_string(),
            phone: String::new(),
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
            symptoms: symptoms.to_string(),
        }
    }

    #[test]
    fn add_appends_without_dedup() {
        let mut list = AppointmentList::new();
        list.add(appointment(1, "cough"));
        list.add(appointment(1, "cough"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_drops_every_match_and_ignores_unknown() {
        let mut list = AppointmentList::from_records(vec![
            appointment(1, "a"),
            appointment(2, "b"),
            appointment(1, "c"),
        ]);
        list.remove(1);
        assert_eq!(list.ids(), vec![2]);
        list.remove(99);
        assert_eq!(list.ids(), vec![2]);
    }

    #[test]
    fn replace_swaps_matching_record_only() {
        let mut list =
            AppointmentList::from_records(vec![appointment(1, "cough"), appointment(2, "limp")]);
        list.replace(appointment(1, "fever"));
        assert_eq!(list.get(1).map(|a| a.symptoms.as_str()), Some("fever"));
        assert_eq!(list.get(2).map(|a| a.symptoms.as_str()), Some("limp"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn replace_without_match_is_a_no_op() {
        let mut list = AppointmentList::from_records(vec![appointment(1, "cough")]);
        list.replace(appointment(3, "fever"));
        assert_eq!(list.ids(), vec![1]);
        assert_eq!(list.get(1).map(|a| a.symptoms.as_str()), Some("cough"));
    }
}
