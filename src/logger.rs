use egui::{Color32, Label, RichText};
use log::Level;

/// Installs the channel logger, the returned receiver gets every record from
/// this crate.
pub fn init_logger() -> anyhow::Result<flume::Receiver<Record>> {
    log::set_max_level(log::LevelFilter::Trace);
    let (sender, receiver) = flume::bounded(Logger::BACKLOG);
    log::set_boxed_logger(Box::new(Logger::new(sender)))?;
    Ok(receiver)
}

fn now() -> time::OffsetDateTime {
    time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayOptions {
    pub timestamp: bool,
    pub level: bool,
    pub target: bool,
}

impl DisplayOptions {
    pub const fn new() -> Self {
        Self {
            timestamp: true,
            level: true,
            target: false,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Record {
    pub timestamp: time::OffsetDateTime,
    pub start: time::OffsetDateTime,
    pub target: Box<str>,
    pub level: Level,
    pub data: Box<str>,
}

impl Record {
    const fn level(&self) -> &'static str {
        match self.level {
            Level::Error => "error",
            Level::Warn => "warn ",
            Level::Info => "info ",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    const fn level_color(&self) -> Color32 {
        match self.level {
            Level::Error => Color32::RED,
            Level::Warn => Color32::YELLOW,
            Level::Info => Color32::GREEN,
            Level::Debug => Color32::from_rgb(0x00, 0xFF, 0xFF),
            Level::Trace => Color32::from_rgb(0xFF, 0x00, 0xFF),
        }
    }

    /// Milliseconds since the logger started, as `seconds.millis`.
    pub fn elapsed(&self) -> String {
        let ms = (self.timestamp - self.start).whole_milliseconds().max(0);
        format!("{:>5}.{:03}", ms / 1000, ms % 1000)
    }

    pub fn display(&self, opts: DisplayOptions, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if opts.timestamp {
                ui.add(Label::new(
                    RichText::new(self.elapsed())
                        .monospace()
                        .color(Color32::LIGHT_BLUE),
                ));
            }

            if opts.level {
                ui.add(Label::new(
                    RichText::new(self.level())
                        .monospace()
                        .color(self.level_color()),
                ));
            }

            if opts.target {
                ui.monospace(&*self.target);
            }

            ui.add(
                Label::new(
                    RichText::new(&*self.data)
                        .monospace()
                        .color(ui.style().visuals.strong_text_color()),
                )
                .wrap(true),
            );
        });
    }
}

struct Logger {
    sender: flume::Sender<Record>,
    start: time::OffsetDateTime,
}

impl Logger {
    const BACKLOG: usize = 4096;

    fn new(sender: flume::Sender<Record>) -> Self {
        Self {
            sender,
            start: now(),
        }
    }

    fn is_from_our_pkg(module: Option<&str>) -> bool {
        module
            .map(|module| module.split("::").next() == Some(env!("CARGO_PKG_NAME")))
            .unwrap_or(false)
    }
}

impl log::Log for Logger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if !Self::is_from_our_pkg(record.module_path()) {
            return;
        }

        // a full backlog means the window isn't being drained, drop the record
        let _ = self.sender.try_send(Record {
            timestamp: now(),
            start: self.start,
            target: Box::from(record.target()),
            level: record.level(),
            data: Box::from(&*record.args().to_string()),
        });
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_our_records() {
        assert!(Logger::is_from_our_pkg(Some("spinstats::rotation")));
        assert!(Logger::is_from_our_pkg(Some("spinstats")));
        assert!(!Logger::is_from_our_pkg(Some("ureq::unit")));
        assert!(!Logger::is_from_our_pkg(None));
    }

    #[test]
    fn elapsed() {
        let start = time::OffsetDateTime::UNIX_EPOCH;
        let record = Record {
            timestamp: start + time::Duration::milliseconds(12_345),
            start,
            target: Box::from("spinstats"),
            level: Level::Info,
            data: Box::from("hello"),
        };
        assert_eq!(record.elapsed(), "   12.345");
        assert_eq!(record.level(), "info ");
    }
}
