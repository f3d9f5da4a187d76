use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

// Index is the verbosity count the name maps to.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts `MYAPI_LOG_LEVEL` as either a count (0-5) or a level name.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        match level.parse::<u8>() {
            Ok(count) if count <= 5 => return Ok(count),
            Ok(count) => return Err(format!("verbosity {count} is out of range (0-5)")),
            Err(_) => {}
        }

        let name = level.to_ascii_lowercase();
        LEVEL_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level: {level}"))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("MYAPI_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
