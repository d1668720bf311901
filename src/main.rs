use std::{io, path::PathBuf, time::Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::prelude::*;
use tracing::{error, info};

use cycletimer::{
    app::App,
    config::{self, Config},
    countdown::TickOutcome,
    cycle::{MAX_MINUTES, MIN_MINUTES},
    logging, notify, theme, ui, Result,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "🍅 cycletimer - Focused work cycles in your terminal")]
struct Args {
    /// Minutes prefilled in the form (e.g. 25, 25m, 1h)
    #[arg(short, long, value_parser = parse_minutes)]
    minutes: Option<u32>,
    #[arg(short = 't', long, value_parser = clap::builder::PossibleValuesParser::new(theme::THEMES.iter().copied()))]
    theme: Option<String>,
    #[arg(long)]
    no_notify: bool,
    #[arg(long)]
    no_sound: bool,
    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_minutes(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim().to_lowercase();
    let mut total = 0u32;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'h' => { total += num.parse::<u32>().map_err(|_| "Invalid hours")? * 60; num.clear(); }
            'm' => { total += num.parse::<u32>().map_err(|_| "Invalid minutes")?; num.clear(); }
            _ => return Err("Invalid format".into()),
        }
    }
    if !num.is_empty() {
        total += num.parse::<u32>().map_err(|_| "Invalid minutes")?;
    }

    if (MIN_MINUTES..=MAX_MINUTES).contains(&total) {
        Ok(total)
    } else {
        Err(format!("Duration must be between {MIN_MINUTES} and {MAX_MINUTES} minutes"))
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = logging::init(&config::app_dir(dirs::data_local_dir()), &args.log_level)?;

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load(&config_path)?;

    // CLI overrides
    if let Some(m) = args.minutes { config.default_minutes = Some(m); }
    if let Some(t) = args.theme { config.theme = t; }
    if args.no_notify { config.notifications_enabled = false; }
    if args.no_sound { config.sound_enabled = false; }

    info!(config = %config_path.display(), theme = %config.theme, "starting");
    let mut app = App::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, SetTitle(""))?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        error!(error = %e, "exiting with error");
    }
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App, config: &Config) -> Result<()> {
    let mut title = String::new();

    loop {
        let current = app.window_title();
        if current != title {
            execute!(terminal.backend_mut(), SetTitle(&current))?;
            title = current;
        }

        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = app.poll_timeout(config.refresh_rate(), Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key, Instant::now()) {
                    info!("quit");
                    return Ok(());
                }
            }
        }

        if app.on_tick(Instant::now()) == TickOutcome::Finished && config.notifications_enabled {
            if let Some(cycle) = app.manager().current_cycle() {
                notify::cycle_finished(cycle, config.sound_enabled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minutes_accepts_plain_and_suffixed_values() {
        assert_eq!(parse_minutes("25"), Ok(25));
        assert_eq!(parse_minutes("25m"), Ok(25));
        assert_eq!(parse_minutes("1h"), Ok(60));
        assert_eq!(parse_minutes(" 45M "), Ok(45));
    }

    #[test]
    fn parse_minutes_rejects_out_of_range_and_garbage() {
        assert!(parse_minutes("4").is_err());
        assert!(parse_minutes("1h5m").is_err());
        assert!(parse_minutes("ten").is_err());
        assert!(parse_minutes("").is_err());
    }
}
