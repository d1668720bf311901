use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local, TimeDelta, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cycletimer::{
    app::{App, View},
    config::Config,
    countdown::TickOutcome,
    cycle::{Clock, CycleStatus},
    form::TASK_REQUIRED,
    ui,
};
use ratatui::{Terminal, backend::TestBackend};

struct SteppedClock(Cell<DateTime<Local>>);

impl SteppedClock {
    fn new() -> Self {
        Self(Cell::new(Local.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()))
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> DateTime<Local> {
        self.0.get()
    }
}

fn key(app: &mut App<SteppedClock>, code: KeyCode, now: Instant) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now)
}

fn type_str(app: &mut App<SteppedClock>, s: &str, now: Instant) {
    s.chars().for_each(|c| {
        key(app, KeyCode::Char(c), now);
    });
}

fn screen(app: &App<SteppedClock>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| ui::render_ui(f, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn idle_screen_offers_start() {
    let app = App::with_clock(&Config::default(), SteppedClock::new());
    let text = screen(&app);

    assert!(text.contains("Vou trabalhar em"));
    assert!(text.contains("Começar"));
    assert!(!text.contains("Interromper"));
}

#[test]
fn full_cycle_through_the_keyboard() {
    let mut app = App::with_clock(&Config::default(), SteppedClock::new());
    let now = Instant::now();

    type_str(&mut app, "Study", now);
    key(&mut app, KeyCode::Tab, now);
    type_str(&mut app, "25", now);
    key(&mut app, KeyCode::Enter, now);

    assert!(app.manager().active_cycle().is_some());
    assert_eq!(app.window_title(), "25:00 • Study");
    assert!(screen(&app).contains("Interromper"));

    let clock = app.manager().clock();
    clock.0.set(clock.0.get() + TimeDelta::seconds(1500));
    assert_eq!(app.on_tick(now + Duration::from_secs(1)), TickOutcome::Finished);

    let cycle = &app.manager().cycles()[0];
    assert_eq!(cycle.status(), CycleStatus::Finished);
    assert_eq!(app.manager().amount_seconds_passed(), 1500);
    assert!(!app.is_ticking());
    assert!(screen(&app).contains("Começar"));

    key(&mut app, KeyCode::F(2), now);
    assert_eq!(app.view(), View::History);
    let history = screen(&app);
    assert!(history.contains("Study"));
    assert!(history.contains("Concluído"));
}

#[test]
fn invalid_minutes_show_inline_message() {
    let mut app = App::with_clock(&Config::default(), SteppedClock::new());
    let now = Instant::now();

    type_str(&mut app, "Study", now);
    key(&mut app, KeyCode::Enter, now);

    assert!(app.manager().cycles().is_empty());
    assert!(screen(&app).contains("O ciclo precisa ser maior que 5 minutos."));
    assert!(!screen(&app).contains(TASK_REQUIRED));
}

#[test]
fn interrupted_cycle_shows_in_history() {
    let mut app = App::with_clock(&Config::default(), SteppedClock::new());
    let now = Instant::now();

    type_str(&mut app, "Write", now);
    key(&mut app, KeyCode::Tab, now);
    key(&mut app, KeyCode::Up, now);
    key(&mut app, KeyCode::Enter, now);
    assert_eq!(app.manager().cycles()[0].minutes_amount, 5);

    key(&mut app, KeyCode::Enter, now);
    assert_eq!(app.manager().active_cycle_id(), None);

    key(&mut app, KeyCode::F(2), now);
    assert!(screen(&app).contains("Interrompido"));
}
