use egui::{ScrollArea, Window};

use crate::{
    font_icon,
    logger::{DisplayOptions, Record},
    Queue,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Level {
    #[default]
    All,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    const fn as_log(&self) -> Option<log::Level> {
        match self {
            Self::All => None,
            Self::Error => Some(log::Level::Error),
            Self::Warn => Some(log::Level::Warn),
            Self::Info => Some(log::Level::Info),
            Self::Debug => Some(log::Level::Debug),
            Self::Trace => Some(log::Level::Trace),
        }
    }
}

/// Recent log records, kept per level so chatty levels can't push out errors.
#[derive(Default)]
pub struct LogWindow {
    trace: Queue<Record>,
    debug: Queue<Record>,
    info: Queue<Record>,
    warn: Queue<Record>,
    error: Queue<Record>,

    active_log: Level,
    opts: DisplayOptions,
}

impl LogWindow {
    pub fn with_caps(trace: usize, debug: usize, info: usize, warn: usize, error: usize) -> Self {
        Self {
            trace: Queue::with_capacity(trace),
            debug: Queue::with_capacity(debug),
            info: Queue::with_capacity(info),
            warn: Queue::with_capacity(warn),
            error: Queue::with_capacity(error),
            active_log: Level::default(),
            opts: DisplayOptions::new(),
        }
    }

    fn queue_mut(&mut self, level: log::Level) -> &mut Queue<Record> {
        match level {
            log::Level::Error => &mut self.error,
            log::Level::Warn => &mut self.warn,
            log::Level::Info => &mut self.info,
            log::Level::Debug => &mut self.debug,
            log::Level::Trace => &mut self.trace,
        }
    }

    pub fn push(&mut self, record: Record) {
        self.queue_mut(record.level).push(record);
    }

    pub fn drain(&mut self, records: &flume::Receiver<Record>) {
        for record in records.try_iter() {
            self.push(record)
        }
    }

    /// Records at `level`, or every record in time order.
    pub fn records(&self, level: Level) -> Vec<&Record> {
        let queues = match level.as_log() {
            Some(log::Level::Error) => vec![&self.error],
            Some(log::Level::Warn) => vec![&self.warn],
            Some(log::Level::Info) => vec![&self.info],
            Some(log::Level::Debug) => vec![&self.debug],
            Some(log::Level::Trace) => vec![&self.trace],
            None => vec![
                &self.trace,
                &self.debug,
                &self.info,
                &self.warn,
                &self.error,
            ],
        };

        let mut list = queues
            .into_iter()
            .flat_map(Queue::iter)
            .collect::<Vec<_>>();
        list.sort_by_key(|record| record.timestamp);
        list
    }

    pub fn display(&mut self, show_logs: &mut bool, ctx: &egui::Context) {
        Window::new("logs")
            .default_height(200.0)
            .resizable(true)
            .collapsible(true)
            .open(show_logs)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for (repr, level) in [
                        ("all", Level::All),
                        ("error", Level::Error),
                        ("warn", Level::Warn),
                        ("info", Level::Info),
                        ("debug", Level::Debug),
                        ("trace", Level::Trace),
                    ] {
                        ui.selectable_value(&mut self.active_log, level, repr);
                    }

                    ui.separator();
                    for (opt, repr, desc) in [
                        (&mut self.opts.level, font_icon::LEVEL, "Toggle level"),
                        (&mut self.opts.timestamp, font_icon::TIME, "Toggle timestamp"),
                        (&mut self.opts.target, font_icon::TARGET, "Toggle target"),
                    ] {
                        ui.toggle_value(opt, repr).on_hover_text_at_pointer(desc);
                    }
                });

                ui.separator();
                ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        for record in self.records(self.active_log) {
                            record.display(self.opts, ui);
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: log::Level, ms: i64, data: &str) -> Record {
        let start = time::OffsetDateTime::UNIX_EPOCH;
        Record {
            timestamp: start + time::Duration::milliseconds(ms),
            start,
            target: Box::from("spinstats"),
            level,
            data: Box::from(data),
        }
    }

    #[test]
    fn per_level_caps() {
        let mut window = LogWindow::with_caps(2, 2, 2, 2, 2);
        for i in 0..10 {
            window.push(record(log::Level::Trace, i, "noise"));
        }
        window.push(record(log::Level::Error, 3, "boom"));

        assert_eq!(window.records(Level::Trace).len(), 2);
        assert_eq!(window.records(Level::Error).len(), 1);
        assert!(window.records(Level::Info).is_empty());
    }

    #[test]
    fn all_is_time_ordered() {
        let mut window = LogWindow::default();
        window.push(record(log::Level::Info, 20, "second"));
        window.push(record(log::Level::Warn, 10, "first"));
        window.push(record(log::Level::Debug, 30, "third"));

        let all = window
            .records(Level::All)
            .into_iter()
            .map(|record| &*record.data)
            .collect::<Vec<_>>();
        assert_eq!(all, vec!["first", "second", "third"]);
    }

    #[test]
    fn drains_the_channel() {
        let (tx, rx) = flume::unbounded();
        tx.send(record(log::Level::Info, 1, "a")).unwrap();
        tx.send(record(log::Level::Info, 2, "b")).unwrap();

        let mut window = LogWindow::default();
        window.drain(&rx);
        assert_eq!(window.records(Level::Info).len(), 2);
    }
}
