use blind_clock::{
    catalog::{BlindLevel, LevelField, LevelId},
    clock::ClockCommand,
    prize::{DistributionMode, DistributionPatch},
    tournament::SettingsPatch,
};
use std::fmt;

/// Command reference printed by `help`
pub const COMMANDS: &str = "\
CLOCK:
  play | pause | resume | toggle     Control the countdown
  next                               Skip to the next level
  reset                              Reset the clock to the level duration
  restart                            Back to the first level, keeping settings
  reset all                          Back to defaults and erase the saved state
  +TIME | -TIME                      Add or remove time (90, 90s, 5m)

BUY-INS:
  buyin | unbuyin                    Count a buy-in / undo one
  rebuy | unrebuy                    Count a re-buy / undo one

LEVELS:
  structure KEY                      Switch to a preset (regular, turbo, deep)
  level add SB BB TIME [ANTE]        Append a level
  level remove ID                    Remove a level
  level set ID FIELD VALUE           Edit sb, bb, ante or duration

SETTINGS:
  set title TEXT | set currency SYMBOL
  set buyin AMOUNT | set rebuy AMOUNT
  prizes pct FIRST SECOND THIRD      Percentage payouts
  prizes fixed FIRST SECOND THIRD    Fixed payouts

OTHER:
  dismiss                            Silence the level alert
  panel                              Toggle the organizer panel
  status | dump | help | quit
";

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forward to the clock
    Command(ClockCommand),
    /// Print the current view
    Status,
    /// Print the saved snapshot as JSON
    Dump,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command is missing arguments.
    MissingArgument { usage: &'static str },
    /// Not a valid non-negative whole number.
    InvalidNumber(String),
    /// Not a valid duration.
    InvalidDuration(String),
    /// Not a finite, non-negative amount.
    InvalidAmount(String),
    /// Unknown level field.
    UnknownField(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { usage } => write!(f, "Missing argument. Usage: {}", usage),
            Self::InvalidNumber(value) => {
                write!(f, "Invalid number '{}'. Must be a whole number", value)
            }
            Self::InvalidDuration(value) => write!(
                f,
                "Invalid duration '{}'. Use seconds or a suffix (e.g., '90', '90s', '5m')",
                value
            ),
            Self::InvalidAmount(value) => write!(
                f,
                "Invalid amount '{}'. Must be a non-negative number",
                value
            ),
            Self::UnknownField(field) => write!(
                f,
                "Unknown level field '{}'. Use sb, bb, ante or duration",
                field
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a console line into an [`Input`].
///
/// # Examples
///
/// ```
/// use bc_console::commands::{Input, parse_command};
/// use blind_clock::clock::ClockCommand;
///
/// assert_eq!(parse_command("play"), Ok(Input::Command(ClockCommand::Start)));
/// assert_eq!(parse_command("+5m"), Ok(Input::Command(ClockCommand::AddTime(300))));
/// assert_eq!(parse_command("quit"), Ok(Input::Quit));
/// ```
pub fn parse_command(input: &str) -> Result<Input, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    let command = match trimmed {
        "play" | "start" => ClockCommand::Start,
        "pause" => ClockCommand::Pause,
        "resume" => ClockCommand::Resume,
        "toggle" | "p" => ClockCommand::Toggle,
        "next" => ClockCommand::NextLevel,
        "reset" => ClockCommand::ResetTimer,
        "restart" => ClockCommand::ResetTournament {
            clear_persisted: false,
        },
        "buyin" => ClockCommand::AddBuyIn,
        "unbuyin" => ClockCommand::RemoveBuyIn,
        "rebuy" => ClockCommand::AddReBuy,
        "unrebuy" => ClockCommand::RemoveReBuy,
        "dismiss" => ClockCommand::DismissAlert,
        "panel" => ClockCommand::TogglePanel,
        "status" => return Ok(Input::Status),
        "dump" => return Ok(Input::Dump),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        _ => return parse_multi_word(trimmed),
    };

    Ok(Input::Command(command))
}

fn parse_multi_word(trimmed: &str) -> Result<Input, ParseError> {
    if let Some(rest) = trimmed.strip_prefix('+') {
        return parse_duration(rest.trim()).map(|secs| Input::Command(ClockCommand::AddTime(secs)));
    }
    if let Some(rest) = trimmed.strip_prefix('-') {
        return parse_duration(rest.trim()).map(|secs| Input::Command(ClockCommand::AddTime(-secs)));
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let command = match parts.as_slice() {
        ["reset", "all"] => ClockCommand::ResetTournament {
            clear_persisted: true,
        },
        ["structure", key] => ClockCommand::SelectStructure(key.to_ascii_lowercase()),
        ["structure"] => {
            return Err(ParseError::MissingArgument {
                usage: "structure KEY",
            });
        }
        ["level", rest @ ..] => parse_level_command(rest)?,
        ["set", rest @ ..] => parse_set_command(trimmed, rest)?,
        ["prizes", rest @ ..] => parse_prizes_command(rest)?,
        _ => return Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    };

    Ok(Input::Command(command))
}

/// Parse "level add SB BB TIME [ANTE]", "level remove ID" or "level set ID FIELD VALUE"
fn parse_level_command(parts: &[&str]) -> Result<ClockCommand, ParseError> {
    match parts {
        ["add", sb, bb, time] | ["add", sb, bb, time, _] => {
            let duration = parse_duration(time)?;
            let mut level = BlindLevel::new(
                0,
                parse_number(sb)?,
                parse_number(bb)?,
                u32::try_from(duration).map_err(|_| ParseError::InvalidDuration(time.to_string()))?,
            );
            if let Some(ante) = parts.get(4) {
                level = level.with_ante(parse_number(ante)?);
            }
            Ok(ClockCommand::AddLevel(level))
        }
        ["add", ..] => Err(ParseError::MissingArgument {
            usage: "level add SB BB TIME [ANTE]",
        }),
        ["remove", id] => Ok(ClockCommand::RemoveLevel(parse_level_id(id)?)),
        ["remove"] => Err(ParseError::MissingArgument {
            usage: "level remove ID",
        }),
        ["set", id, field, value] => {
            let id = parse_level_id(id)?;
            let field = field
                .parse::<LevelField>()
                .map_err(|_| ParseError::UnknownField(field.to_string()))?;
            let value = match field {
                LevelField::Duration => u64::try_from(parse_duration(value)?)
                    .map_err(|_| ParseError::InvalidDuration(value.to_string()))?,
                _ => parse_number(value)?,
            };
            Ok(ClockCommand::UpdateLevel { id, field, value })
        }
        ["set", ..] => Err(ParseError::MissingArgument {
            usage: "level set ID FIELD VALUE",
        }),
        _ => Err(ParseError::UnrecognizedCommand(format!(
            "level {}",
            parts.join(" ")
        ))),
    }
}

/// Parse "set title TEXT", "set currency SYMBOL", "set buyin AMOUNT" or "set rebuy AMOUNT"
fn parse_set_command(line: &str, parts: &[&str]) -> Result<ClockCommand, ParseError> {
    let Some(&key) = parts.first() else {
        return Err(ParseError::MissingArgument {
            usage: "set title|currency|buyin|rebuy VALUE",
        });
    };

    // Free text keeps its inner spacing
    let text = line
        .trim_start_matches("set")
        .trim_start()
        .trim_start_matches(key)
        .trim()
        .to_string();

    let patch = match key {
        "title" if !text.is_empty() => SettingsPatch {
            title: Some(text),
            ..Default::default()
        },
        "currency" => SettingsPatch {
            currency: Some(text),
            ..Default::default()
        },
        "buyin" => SettingsPatch {
            buy_in_amount: Some(parse_amount(single_value(parts, "set buyin AMOUNT")?)?),
            ..Default::default()
        },
        "rebuy" => SettingsPatch {
            re_buy_amount: Some(parse_amount(single_value(parts, "set rebuy AMOUNT")?)?),
            ..Default::default()
        },
        "title" => return Err(ParseError::MissingArgument { usage: "set title TEXT" }),
        _ => return Err(ParseError::UnrecognizedCommand(line.to_string())),
    };

    Ok(ClockCommand::UpdateSettings(patch))
}

/// Parse "prizes pct|fixed FIRST SECOND THIRD"
fn parse_prizes_command(parts: &[&str]) -> Result<ClockCommand, ParseError> {
    let usage = "prizes pct|fixed FIRST SECOND THIRD";
    let (mode, values) = match parts {
        ["pct" | "percent" | "percentage", rest @ ..] => (DistributionMode::Percentage, rest),
        ["fixed", rest @ ..] => (DistributionMode::Fixed, rest),
        [] => return Err(ParseError::MissingArgument { usage }),
        _ => {
            return Err(ParseError::UnrecognizedCommand(format!(
                "prizes {}",
                parts.join(" ")
            )));
        }
    };

    let [first, second, third] = values else {
        return Err(ParseError::MissingArgument { usage });
    };

    Ok(ClockCommand::UpdatePrizeDistribution(DistributionPatch {
        mode: Some(mode),
        first: Some(parse_amount(first)?),
        second: Some(parse_amount(second)?),
        third: Some(parse_amount(third)?),
    }))
}

fn single_value<'a>(parts: &[&'a str], usage: &'static str) -> Result<&'a str, ParseError> {
    match parts {
        [_, value] => Ok(*value),
        _ => Err(ParseError::MissingArgument { usage }),
    }
}

fn parse_number(value: &str) -> Result<u64, ParseError> {
    value
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

fn parse_level_id(value: &str) -> Result<LevelId, ParseError> {
    value
        .parse::<LevelId>()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

/// Parse an amount, rejecting NaN, infinities and negatives
fn parse_amount(value: &str) -> Result<f64, ParseError> {
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(ParseError::InvalidAmount(value.to_string())),
    }
}

/// Parse "90", "90s" or "5m" into seconds
fn parse_duration(value: &str) -> Result<i64, ParseError> {
    let invalid = || ParseError::InvalidDuration(value.to_string());
    let (digits, multiplier) = if let Some(minutes) = value.strip_suffix('m') {
        (minutes, 60)
    } else if let Some(seconds) = value.strip_suffix('s') {
        (seconds, 1)
    } else {
        (value, 1)
    };

    let amount = digits.parse::<u32>().map_err(|_| invalid())?;
    Ok(i64::from(amount) * multiplier)
}
