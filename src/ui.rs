use chrono::{DateTime, Local};
use ratatui::{prelude::*, widgets::*};

use crate::{
    app::{App, View},
    countdown::Countdown,
    cycle::{Clock, Cycle},
    form::Field,
};

const TASK_LABEL: &str = "  Vou trabalhar em ";
const MINUTES_LABEL: &str = " durante ";
const MINUTES_SUFFIX: &str = " minutos.";
const TASK_PLACEHOLDER: &str = "Dê um nome para o seu projeto";
const MINUTES_PLACEHOLDER: &str = "00";

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render_ui<C: Clock>(f: &mut Frame, app: &App<C>) {
    match app.view() {
        View::Timer => render_timer(f, app),
        View::History => render_history(f, app),
        View::Help => render_help(f, app),
    }
}

fn render_timer<C: Clock>(f: &mut Frame, app: &App<C>) {
    let theme = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(2)])
        .split(f.size());

    // Header
    let header = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
        .title(Span::styled(" 🍅 CYCLETIMER ", Style::default()
            .fg(theme.accent_color).add_modifier(Modifier::BOLD)));
    f.render_widget(header, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1), Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Percentage(10),
        ])
        .split(chunks[1]);

    render_form(f, app, sections[1], sections[2]);

    // Countdown
    let countdown = Countdown::of(app.manager());
    let running = app.manager().active_cycle().is_some();
    let digit_color = if running { theme.running_color } else { Color::Gray };
    let digits: Vec<Line> = big_digits(&countdown.display())
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(digits)
            .style(Style::default().fg(digit_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[4]
    );

    // Progress
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(digit_color).bg(Color::Black))
            .percent((countdown.progress_ratio() * 100.0) as u16),
        sections[6]
    );

    // Start / interrupt
    let button = if running {
        Span::styled(" ✋ Interromper ", Style::default()
            .fg(Color::White).bg(theme.interrupted_color).add_modifier(Modifier::BOLD))
    } else if app.form().is_submit_disabled() {
        Span::styled(" ▶ Começar ", Style::default().fg(Color::DarkGray).bg(Color::Black))
    } else {
        Span::styled(" ▶ Começar ", Style::default()
            .fg(Color::Black).bg(theme.finished_color).add_modifier(Modifier::BOLD))
    };
    f.render_widget(Paragraph::new(Line::from(button)).alignment(Alignment::Center), sections[8]);

    // Controls
    let action = if running { " Interrupt  •  " } else { " Start  •  " };
    let controls = vec![
        Line::from(vec![
            span_key("Enter", app), Span::raw(action),
            span_key("Tab", app), Span::raw(" Field  •  "),
            span_key("↑↓", app), Span::raw(" Minutes  •  "),
            span_key("→", app), Span::raw(" Complete"),
        ]),
        Line::from(vec![
            span_key("F1", app), Span::raw(" Help  •  "),
            span_key("F2", app), Span::raw(" History  •  "),
            span_key("Esc", app), Span::raw(" Quit"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center).style(Style::default().fg(Color::DarkGray)),
        chunks[2]
    );
}

fn render_form<C: Clock>(f: &mut Frame, app: &App<C>, line_area: Rect, errors_area: Rect) {
    let form = app.form();
    let locked = app.manager().active_cycle().is_some();
    let accent = app.theme().accent_color;
    let field_style = |field: Field| {
        if locked {
            Style::default().fg(Color::DarkGray)
        } else if form.focus() == field {
            Style::default().fg(accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
        }
    };
    let placeholder = Style::default().fg(Color::DarkGray).add_modifier(Modifier::UNDERLINED);

    let mut spans = vec![Span::raw(TASK_LABEL)];
    let mut task_width = 0;
    if form.task().is_empty() {
        spans.push(Span::styled(TASK_PLACEHOLDER, placeholder));
    } else {
        spans.push(Span::styled(form.task(), field_style(Field::Task)));
        task_width = form.task().chars().count();
        if let Some(rest) = app.suggestion().and_then(|s| s.get(form.task().len()..)) {
            spans.push(Span::styled(rest.to_string(), placeholder));
        }
    }
    let task_shown: usize = spans[1..].iter().map(|s| s.content.chars().count()).sum();

    spans.push(Span::raw(MINUTES_LABEL));
    if form.minutes_input().is_empty() {
        spans.push(Span::styled(MINUTES_PLACEHOLDER, placeholder));
    } else {
        spans.push(Span::styled(form.minutes_input(), field_style(Field::MinutesAmount)));
    }
    spans.push(Span::raw(MINUTES_SUFFIX));

    f.render_widget(Paragraph::new(Line::from(spans)), line_area);

    if !locked {
        let label = TASK_LABEL.chars().count();
        let offset = match form.focus() {
            Field::Task => label + task_width,
            Field::MinutesAmount => {
                label + task_shown + MINUTES_LABEL.chars().count() + form.minutes_input().chars().count()
            }
        };
        let x = line_area.x.saturating_add(offset as u16).min(line_area.right().saturating_sub(1));
        f.set_cursor(x, line_area.y);
    }

    let errors = form.errors();
    let error_lines: Vec<Line> = [errors.task, errors.minutes_amount]
        .into_iter()
        .flatten()
        .map(|msg| Line::from(Span::styled(format!("  ⚠ {msg}"), Style::default().fg(Color::Red))))
        .collect();
    f.render_widget(Paragraph::new(error_lines), errors_area);
}

fn render_history<C: Clock>(f: &mut Frame, app: &App<C>) {
    let area = centered_rect(80, 85, f.size());
    let theme = app.theme();
    let now = app.manager().clock().now();
    let cycles = app.manager().cycles();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("📜 MEU HISTÓRICO", Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];

    if cycles.is_empty() {
        lines.push(Line::from(Span::styled("  Nenhum ciclo ainda.", Style::default().fg(Color::DarkGray))));
    } else {
        lines.push(Line::from(Span::styled(
            format!("  {:<28} {:>9}  {:<22} {}", "Tarefa", "Duração", "Início", "Status"),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )));
        for (idx, cycle) in cycles.iter().enumerate() {
            lines.push(history_line(cycle, idx == app.history_selected(), now, app));
        }
    }

    // Keep the selected row on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let selected_row = 4 + app.history_selected();
    let scroll = selected_row.saturating_sub(visible.saturating_sub(1)) as u16;

    f.render_widget(
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(Block::default()
                .title(" History ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border_color))),
        area
    );
}

fn history_line<'a, C: Clock>(cycle: &'a Cycle, selected: bool, now: DateTime<Local>, app: &App<C>) -> Line<'a> {
    let status = cycle.status();
    let (prefix, task_style) = if selected {
        ("> ", Style::default().fg(app.theme().accent_color).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default().fg(Color::White))
    };
    let task: String = cycle.task.chars().take(28).collect();

    Line::from(vec![
        Span::styled(prefix, task_style),
        Span::styled(format!("{task:<28}"), task_style),
        Span::styled(format!(" {:>5} min", cycle.minutes_amount), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  {:<22}", format!("{} ({})", cycle.start_date.format("%H:%M"), relative_time(cycle.start_date, now))),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!(" ● {}", status.label()), Style::default().fg(app.theme().status_color(status))),
    ])
}

fn render_help<C: Clock>(f: &mut Frame, app: &App<C>) {
    let area = centered_rect(70, 85, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("⌨️  KEYBOARD SHORTCUTS", Style::default().fg(app.theme().accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Form:"),
        help_line("Tab", "Switch between task and minutes"),
        help_line("↑ / ↓", "Step minutes by 5 (5 to 60)"),
        help_line("→", "Accept the suggested task"),
        help_line("Enter", "Start a cycle"),
        Line::from(""),
        Line::from("  Running cycle:"),
        help_line("Enter", "Interrupt the cycle"),
        Line::from(""),
        Line::from("  Views:"),
        help_line("F1", "Toggle this help"),
        help_line("F2", "Toggle cycle history (↑↓ to scroll)"),
        help_line("Esc", "Back to timer / quit"),
        help_line("Ctrl+C", "Quit"),
    ];

    f.render_widget(
        Paragraph::new(help_text)
            .block(Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme().border_color))),
        area
    );
}

fn span_key<'a, C: Clock>(text: &'a str, app: &App<C>) -> Span<'a> {
    Span::styled(text, Style::default().fg(app.theme().accent_color).add_modifier(Modifier::BOLD))
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(format!("{key:<8}"), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

// ============================================================================
// Formatting
// ============================================================================

fn glyph(c: char) -> [&'static str; 3] {
    match c {
        '0' => ["█▀█", "█ █", "▀▀▀"],
        '1' => ["▀█ ", " █ ", "▀▀▀"],
        '2' => ["▀▀█", "█▀▀", "▀▀▀"],
        '3' => ["▀▀█", " ▀█", "▀▀▀"],
        '4' => ["█ █", "▀▀█", "  ▀"],
        '5' => ["█▀▀", "▀▀█", "▀▀▀"],
        '6' => ["█▀▀", "█▀█", "▀▀▀"],
        '7' => ["▀▀█", "  █", "  ▀"],
        '8' => ["█▀█", "█▀█", "▀▀▀"],
        '9' => ["█▀█", "▀▀█", "▀▀▀"],
        ':' => ["▄", " ", "▀"],
        _ => ["   ", "   ", "   "],
    }
}

/// Renders `text` as three rows of block glyphs.
pub fn big_digits(text: &str) -> [String; 3] {
    let mut rows: [String; 3] = Default::default();
    for (i, c) in text.chars().enumerate() {
        for (row, part) in rows.iter_mut().zip(glyph(c)) {
            if i > 0 {
                row.push(' ');
            }
            row.push_str(part);
        }
    }
    rows
}

pub fn relative_time(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    match minutes {
        0 => "agora".into(),
        1 => "há 1 minuto".into(),
        2..=59 => format!("há {minutes} minutos"),
        60..=119 => "há 1 hora".into(),
        _ => format!("há {} horas", minutes / 60),
    }
}
