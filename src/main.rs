use cosmic::app::Settings;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;
mod style;

use notepin::config::NotepinConfig;

use application::{Flags, Notepin};

/// Crate-local targets; anything else is held to warn.
const APP_TARGETS: [&str; 4] = ["notepin", "application", "pages", "components"];

struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let target = metadata.target();
        if APP_TARGETS.iter().any(|t| target.starts_with(t)) {
            let max = if notepin::debug_logging() {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to the user journal (`journalctl --user -t notepin -f`).
    let journal =
        systemd_journal_logger::JournalLog::new()?.with_syslog_identifier("notepin".to_string());
    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max stays at Debug so the filter above decides.
    log::set_max_level(log::LevelFilter::Debug);

    let (config, _handle) = NotepinConfig::load();
    notepin::set_debug_logging(config.debug_logging);

    localize::localize();

    let settings = Settings::default().size_limits(Limits::NONE.min_width(400.0).min_height(300.0));

    cosmic::app::run::<Notepin>(settings, Flags { config })?;

    Ok(())
}
