//! The container: owns the cycle manager, the form and the ticker, and maps
//! key presses onto them.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::{
    config::Config,
    countdown::{self, TICK_INTERVAL, TickOutcome, Ticker},
    cycle::{Clock, CycleManager, SystemClock},
    form::{Field, NewCycleForm},
    theme::Theme,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Timer,
    History,
    Help,
}

pub struct App<C: Clock = SystemClock> {
    manager: CycleManager<C>,
    form: NewCycleForm,
    ticker: Option<Ticker>,
    view: View,
    theme: Theme,
    history_selected: usize,
}

impl App<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(config: &Config, clock: C) -> Self {
        Self {
            manager: CycleManager::with_clock(clock),
            form: NewCycleForm::new(config.default_minutes),
            ticker: None,
            view: View::Timer,
            theme: Theme::named(&config.theme),
            history_selected: 0,
        }
    }

    pub fn manager(&self) -> &CycleManager<C> {
        &self.manager
    }

    pub fn form(&self) -> &NewCycleForm {
        &self.form
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn history_selected(&self) -> usize {
        self.history_selected
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Past task that extends what is typed in the task field, if any.
    pub fn suggestion(&self) -> Option<&str> {
        let typed = self.form.task();
        if typed.is_empty() {
            return None;
        }
        self.manager
            .task_suggestions(typed)
            .into_iter()
            .find(|task| task.len() > typed.len())
    }

    pub fn window_title(&self) -> String {
        countdown::window_title(&self.manager)
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, refresh_rate: Duration, now: Instant) -> Duration {
        match &self.ticker {
            Some(ticker) => refresh_rate.min(ticker.time_until_due(now)),
            None => refresh_rate,
        }
    }

    /// Submits the form and, when it validates, activates a new cycle.
    pub fn start_cycle(&mut self, now: Instant) -> bool {
        if self.manager.active_cycle().is_some() {
            return false;
        }
        let Some(new_cycle) = self.form.submit() else {
            debug!(errors = ?self.form.errors(), "submission rejected");
            return false;
        };

        self.manager.create_cycle(new_cycle);
        self.ticker = Some(Ticker::start(TICK_INTERVAL, now));
        true
    }

    pub fn interrupt_cycle(&mut self) {
        self.manager.interrupt_active_cycle();
        self.ticker = None;
    }

    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        let Some(ticker) = self.ticker.as_mut() else {
            return TickOutcome::Idle;
        };
        if !ticker.poll(now) {
            return TickOutcome::Idle;
        }

        let outcome = countdown::tick(&mut self.manager);
        if !matches!(outcome, TickOutcome::Advanced(_)) {
            self.ticker = None;
        }
        outcome
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match key.code {
            KeyCode::F(1) => {
                self.toggle_view(View::Help);
                return false;
            }
            KeyCode::F(2) => {
                self.toggle_view(View::History);
                return false;
            }
            KeyCode::Esc => {
                if self.view == View::Timer {
                    return true;
                }
                self.view = View::Timer;
                return false;
            }
            _ => {}
        }

        match self.view {
            View::Timer => self.handle_timer_key(key, now),
            View::History => self.handle_history_key(key),
            View::Help => {}
        }
        false
    }

    fn toggle_view(&mut self, view: View) {
        self.view = if self.view == view { View::Timer } else { view };
        if self.view == View::History {
            self.history_selected = self.manager.cycles().len().saturating_sub(1);
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Enter {
            if self.manager.active_cycle().is_some() {
                self.interrupt_cycle();
            } else {
                self.start_cycle(now);
            }
            return;
        }

        // The form is read-only while a cycle runs.
        if self.manager.active_cycle().is_some() {
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.form.focus_next(),
            KeyCode::Up if self.form.focus() == Field::MinutesAmount => self.form.step_minutes(true),
            KeyCode::Down if self.form.focus() == Field::MinutesAmount => {
                self.form.step_minutes(false)
            }
            KeyCode::Right if self.form.focus() == Field::Task => {
                if let Some(suggestion) = self.suggestion().map(str::to_string) {
                    self.form.complete_task(&suggestion);
                }
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.input_char(c)
            }
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let last = self.manager.cycles().len().saturating_sub(1);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.history_selected = (self.history_selected + 1).min(last);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_selected = self.history_selected.saturating_sub(1);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::{CycleStatus, tests::ManualClock};
    use crate::form::MINUTES_TOO_LONG;

    fn app() -> App<ManualClock> {
        App::with_clock(&Config::default(), ManualClock::new())
    }

    fn press(app: &mut App<ManualClock>, code: KeyCode, now: Instant) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now)
    }

    fn type_str(app: &mut App<ManualClock>, s: &str, now: Instant) {
        for c in s.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    fn start(app: &mut App<ManualClock>, task: &str, minutes: &str, now: Instant) {
        type_str(app, task, now);
        press(app, KeyCode::Tab, now);
        type_str(app, minutes, now);
        press(app, KeyCode::Enter, now);
    }

    #[test]
    fn enter_starts_a_cycle_and_the_ticker() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "25", now);

        assert_eq!(app.manager().cycles().len(), 1);
        assert!(app.manager().active_cycle().is_some());
        assert!(app.is_ticking());
        assert_eq!(app.form().task(), "");
    }

    #[test]
    fn invalid_form_creates_nothing() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "75", now);

        assert!(app.manager().cycles().is_empty());
        assert!(!app.is_ticking());
        assert_eq!(app.form().errors().minutes_amount, Some(MINUTES_TOO_LONG));
    }

    #[test]
    fn enter_interrupts_a_running_cycle_and_cancels_ticker() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "25", now);

        press(&mut app, KeyCode::Enter, now);

        let cycle = &app.manager().cycles()[0];
        assert_eq!(cycle.status(), CycleStatus::Interrupted);
        assert_eq!(app.manager().active_cycle_id(), None);
        assert!(!app.is_ticking());
    }

    #[test]
    fn form_ignores_typing_while_running() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "25", now);

        type_str(&mut app, "abc", now);
        assert_eq!(app.form().task(), "");
    }

    #[test]
    fn ticks_finish_the_cycle_and_stop_the_ticker() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "5", now);

        app.manager.clock().advance(120);
        assert_eq!(app.on_tick(now + Duration::from_secs(1)), TickOutcome::Advanced(120));

        app.manager.clock().advance(180);
        assert_eq!(app.on_tick(now + Duration::from_secs(2)), TickOutcome::Finished);
        assert!(!app.is_ticking());
        assert_eq!(app.on_tick(now + Duration::from_secs(3)), TickOutcome::Idle);

        // The start button is back.
        type_str(&mut app, "Next", now);
        assert!(!app.form().is_submit_disabled());
    }

    #[test]
    fn tick_before_interval_does_nothing() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "5", now);
        app.manager.clock().advance(3);

        assert_eq!(app.on_tick(now + Duration::from_millis(500)), TickOutcome::Idle);
        assert_eq!(app.manager().amount_seconds_passed(), 0);
    }

    #[test]
    fn right_arrow_completes_a_previous_task() {
        let mut app = app();
        let now = Instant::now();
        start(&mut app, "Study", "25", now);
        press(&mut app, KeyCode::Enter, now);

        type_str(&mut app, "St", now);
        assert_eq!(app.suggestion(), Some("Study"));
        press(&mut app, KeyCode::Right, now);
        assert_eq!(app.form().task(), "Study");
        assert_eq!(app.suggestion(), None);
    }

    #[test]
    fn function_keys_switch_views_and_escape_returns() {
        let mut app = app();
        let now = Instant::now();

        assert!(!press(&mut app, KeyCode::F(2), now));
        assert_eq!(app.view(), View::History);
        assert!(!press(&mut app, KeyCode::Esc, now));
        assert_eq!(app.view(), View::Timer);
        assert!(!press(&mut app, KeyCode::F(1), now));
        assert!(!press(&mut app, KeyCode::F(1), now));
        assert_eq!(app.view(), View::Timer);
        assert!(press(&mut app, KeyCode::Esc, now));
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app();
        let now = Instant::now();
        press(&mut app, KeyCode::F(2), now);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now));
    }

    #[test]
    fn poll_timeout_respects_the_ticker_deadline() {
        let mut app = app();
        let now = Instant::now();
        let refresh = Duration::from_millis(50);
        assert_eq!(app.poll_timeout(refresh, now), refresh);

        start(&mut app, "Study", "5", now);
        assert_eq!(app.poll_timeout(refresh, now + Duration::from_millis(990)), Duration::from_millis(10));
    }
}
