use std::{
    path::Path,
    process::{Command, Stdio},
    thread,
};

use notify_rust::{Notification, Urgency};
use tracing::warn;

use crate::cycle::Cycle;

const SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

pub fn cycle_finished(cycle: &Cycle, sound: bool) {
    notify(
        "Ciclo concluído! 🍅",
        &format!("{} • {} minutos", cycle.task, cycle.minutes_amount),
        sound,
    );
}

fn notify(title: &str, body: &str, sound: bool) {
    if let Err(e) = Notification::new()
        .summary(title)
        .body(body)
        .appname(crate::countdown::APP_TITLE)
        .icon("alarm-clock")
        .urgency(Urgency::Critical)
        .show()
    {
        warn!(error = %e, "desktop notification failed");
    }

    if sound {
        thread::spawn(|| {
            if let Some((cmd, file)) = SOUNDS.iter().find(|(_, file)| Path::new(file).exists()) {
                play(cmd, file);
            }
        });
    }
}

/// Runs `cmd file` to completion. Returns false if the player could not run.
fn play(cmd: &str, file: &str) -> bool {
    let child = Command::new(cmd)
        .arg(file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match child.and_then(|mut child| child.wait()) {
        Ok(status) => {
            if !status.success() {
                warn!(player = cmd, %status, "sound player exited with an error");
            }
            true
        }
        Err(e) => {
            warn!(player = cmd, error = %e, "could not play notification sound");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_player_is_reported_not_ignored() {
        assert!(!play("cycletimer-no-such-player", "/nonexistent.oga"));
    }
}
