use crate::checklist::{Checklist, SymptomDescriptor};
use crate::scoring::{ScoreResult, ScoringSession};
use crate::store::{chart_series, ResultRecord, ResultStore};
use crate::tui::theme::ThemeColors;
use ratatui::widgets::TableState;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calculator,
    History,
    Chart,
}

impl View {
    pub const ALL: [View; 3] = [View::Calculator, View::History, View::Chart];

    pub fn title(self) -> &'static str {
        match self {
            View::Calculator => "Calculator",
            View::History => "History",
            View::Chart => "Chart",
        }
    }

    fn next(self) -> Self {
        match self {
            View::Calculator => View::History,
            View::History => View::Chart,
            View::Chart => View::Calculator,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

pub struct App {
    pub session: ScoringSession,
    pub store: ResultStore,
    pub records: Vec<ResultRecord>,
    pub checklist_state: TableState,
    pub history_state: TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub show_description: bool,
    /// Result of the last Enter press, cleared by reset
    pub last_result: Option<ScoreResult>,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(checklist: Arc<Checklist>, store: ResultStore, theme: ThemeColors) -> Self {
        let mut checklist_state = TableState::default();
        if !checklist.is_empty() {
            checklist_state.select(Some(0));
        }

        Self {
            session: ScoringSession::new(checklist),
            store,
            records: Vec::new(),
            checklist_state,
            history_state: TableState::default(),
            current_view: View::Calculator,
            input_mode: InputMode::Normal,
            show_description: false,
            last_result: None,
            flash_message: None,
            should_quit: false,
            theme,
        }
    }

    pub fn checklist(&self) -> &Checklist {
        self.session.checklist()
    }

    fn current_len(&self) -> usize {
        match self.current_view {
            View::Calculator => self.checklist().len(),
            View::History => self.records.len(),
            View::Chart => 0,
        }
    }

    fn current_state_mut(&mut self) -> Option<&mut TableState> {
        match self.current_view {
            View::Calculator => Some(&mut self.checklist_state),
            View::History => Some(&mut self.history_state),
            View::Chart => None,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        if let Some(state) = self.current_state_mut() {
            let i = match state.selected() {
                Some(i) if i >= len - 1 => 0,
                Some(i) => i + 1,
                None => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous_row(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        if let Some(state) = self.current_state_mut() {
            let i = match state.selected() {
                Some(0) => len - 1,
                Some(i) => i - 1,
                None => 0,
            };
            state.select(Some(i));
        }
    }

    /// Descriptor under the cursor in the calculator view
    pub fn highlighted(&self) -> Option<&SymptomDescriptor> {
        self.checklist_state
            .selected()
            .and_then(|i| self.checklist().get(i))
    }

    /// Toggle the descriptor under the cursor
    pub fn toggle_selected(&mut self) {
        if self.current_view != View::Calculator {
            return;
        }
        let Some(index) = self.checklist_state.selected() else {
            return;
        };
        if let Err(e) = self.session.toggle(index) {
            // Cursor and checklist disagree; not reachable through key handling
            tracing::error!("Toggle rejected: {}", e);
        }
    }

    pub fn toggle_description(&mut self) {
        self.show_description = !self.show_description;
    }

    /// Clear all selections and the last result
    pub fn reset(&mut self) {
        self.session.reset();
        self.last_result = None;
        self.show_flash("Selection cleared".to_string());
    }

    /// Score the current selection and save it
    pub async fn calculate_and_save(&mut self) {
        let outcome = self.session.commit(&self.store).await;
        let total = outcome.result.total;
        let label = outcome.result.activity.label();
        self.last_result = Some(outcome.result);

        match outcome.saved {
            Ok(_) => {
                self.show_flash(format!("Saved score {} ({})", total, label));
                self.reload_history().await;
            }
            Err(e) => self.show_flash(format!("Score {} not saved: {}", total, e)),
        }
    }

    /// Re-read every record from the store
    pub async fn reload_history(&mut self) {
        self.records = self.store.list_all().await;

        if self.records.is_empty() {
            self.history_state.select(None);
        } else {
            match self.history_state.selected() {
                Some(i) if i >= self.records.len() => {
                    self.history_state.select(Some(self.records.len() - 1))
                }
                Some(_) => {}
                None => self.history_state.select(Some(0)),
            }
        }
    }

    /// Cycle Calculator -> History -> Chart. History is re-read on entering
    /// the history or chart views.
    pub async fn toggle_view(&mut self) {
        self.current_view = self.current_view.next();
        if self.current_view != View::Calculator {
            self.reload_history().await;
        }
    }

    /// Chart points as `(unix seconds, score)`, oldest first
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        chart_series(&self.records)
            .into_iter()
            .map(|(date, score)| (date.timestamp() as f64, f64::from(score)))
            .collect()
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Activity;
    use crate::store::DocumentBackend;

    async fn app() -> App {
        let checklist = Arc::new(Checklist::new(vec![
            SymptomDescriptor::new("A", "first", 4),
            SymptomDescriptor::new("B", "second", 8),
            SymptomDescriptor::new("C", "third", 10),
        ]));
        let store = ResultStore::open(Box::new(DocumentBackend::in_memory())).await;
        App::new(checklist, store, ThemeColors::dark())
    }

    #[tokio::test]
    async fn test_navigation_wraps() {
        let mut app = app().await;
        assert_eq!(app.checklist_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.checklist_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.checklist_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.highlighted().map(|d| d.title.as_str()), Some("B"));
    }

    #[tokio::test]
    async fn test_toggle_updates_live_score() {
        let mut app = app().await;
        app.toggle_selected();
        app.next_row();
        app.next_row();
        app.toggle_selected();
        assert_eq!(app.session.score().total, 14);

        app.toggle_selected();
        assert_eq!(app.session.score().total, 4);
    }

    #[tokio::test]
    async fn test_calculate_and_save_records_result() {
        let mut app = app().await;
        app.next_row();
        app.toggle_selected();
        app.next_row();
        app.toggle_selected();

        app.calculate_and_save().await;
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.total, 18);
        assert_eq!(result.activity, Activity::Low);
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.records[0].score, 18);
        assert!(app.flash_message.as_ref().unwrap().0.starts_with("Saved score 18"));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_result_and_reports() {
        let checklist = Arc::new(Checklist::new(vec![SymptomDescriptor::new("A", "", 20)]));
        // Never initialized
        let store = ResultStore::new(Box::new(DocumentBackend::in_memory()));
        let mut app = App::new(checklist, store, ThemeColors::dark());
        app.toggle_selected();

        app.calculate_and_save().await;
        assert_eq!(app.last_result.as_ref().map(|r| r.total), Some(20));
        assert!(app.records.is_empty());
        assert!(app.flash_message.as_ref().unwrap().0.contains("not saved"));
    }

    #[tokio::test]
    async fn test_reset_clears_selection_and_result() {
        let mut app = app().await;
        app.toggle_selected();
        app.calculate_and_save().await;
        app.reset();
        assert_eq!(app.session.score().total, 0);
        assert!(app.last_result.is_none());
    }

    #[tokio::test]
    async fn test_toggle_view_cycles_and_loads_history() {
        let mut app = app().await;
        app.store
            .append(7, chrono::Utc::now())
            .await
            .unwrap();
        assert!(app.records.is_empty());

        app.toggle_view().await;
        assert_eq!(app.current_view, View::History);
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.history_state.selected(), Some(0));

        app.toggle_view().await;
        assert_eq!(app.current_view, View::Chart);
        assert_eq!(app.chart_points().len(), 1);

        app.toggle_view().await;
        assert_eq!(app.current_view, View::Calculator);
    }

    #[tokio::test]
    async fn test_toggle_ignored_outside_calculator() {
        let mut app = app().await;
        app.toggle_view().await;
        app.toggle_selected();
        assert_eq!(app.session.selection().selected_count(), 0);
    }

    #[tokio::test]
    async fn test_chart_points_ascending() {
        use chrono::TimeZone;
        let mut app = app().await;
        let t1 = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        app.store.append(30, t2).await.unwrap();
        app.store.append(10, t1).await.unwrap();
        app.reload_history().await;

        let points = app.chart_points();
        assert_eq!(points[0], (t1.timestamp() as f64, 10.0));
        assert_eq!(points[1], (t2.timestamp() as f64, 30.0));
    }
}
