use std::fmt::Display;

use colored::Colorize;
use log::{Level, LevelFilter};

/// External crates only need to log warnings and errors
const EXTERNAL_LEVEL: LevelFilter = LevelFilter::Warn;

/// Sets up logging to stdout, `verbose` includes debug logs from our own crates
pub fn init_logger(verbose: bool) {
    let local_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^9} {}",
                level_to_string(&record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .filter(move |meta| {
            let max_level = if Target::from_str(meta.target()).is_local() {
                local_level
            } else {
                EXTERNAL_LEVEL
            };

            meta.level() <= max_level
        })
        .chain(std::io::stdout())
        .apply()
        .expect("logging is initialized")
}

enum Target {
    External(String),
    App,
    Server,
    Ledger,
}

impl Target {
    fn from_str(str: &str) -> Self {
        let module = str.split("::").next().unwrap_or_default();

        match module {
            "guestlist" => Self::App,
            "guestlist_server" => Self::Server,
            "guestlist_ledger" => Self::Ledger,
            other => Target::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Target::External(x) => x.as_str().clear(),
            Target::App => "GUESTLIST".bright_cyan(),
            Target::Server => "SERVER".bright_green(),
            Target::Ledger => "LEDGER".bright_purple(),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::Target;

    #[test]
    fn targets_are_labelled_by_crate() {
        assert!(matches!(Target::from_str("guestlist"), Target::App));
        assert!(matches!(
            Target::from_str("guestlist_ledger::guests"),
            Target::Ledger
        ));
        assert!(matches!(
            Target::from_str("guestlist_server::errors"),
            Target::Server
        ));
        assert!(!Target::from_str("sqlx::query").is_local());
    }
}
