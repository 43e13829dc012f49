use std::io::{self, Write};

use tracing::warn;

/// Something that can get the operator's attention audibly.
pub trait NotificationSound: Send + Sync {
    fn play(&self) -> io::Result<()>;
}

/// Rings the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl NotificationSound for TerminalBell {
    fn play(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }
}

/// Used when sound is disabled in the configuration.
#[derive(Debug, Default)]
pub struct Silent;

impl NotificationSound for Silent {
    fn play(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Plays `sound`, logging a failure instead of returning it.
pub fn play_notification(sound: &dyn NotificationSound) {
    if let Err(err) = sound.play() {
        warn!(%err, "notification sound could not be played");
    }
}
