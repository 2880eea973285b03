//! Command-line input → controller messages.

use mitai_api::{MediaFormat, MediaSeason};
use mitai_core::controller::Message;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  search <text>     search the catalog (also: / <text>); `search` alone repeats
  season <name|any> filter by season (winter, spring, summer, fall)
  format <name|any> filter by format (tv, tv_short, movie, special, ova, ona, music)
  next, prev        change page
  details <n>       show details for result n
  add [n]           add result n (or the open details) to the watchlist
  watch [n]         where to watch result n (or the open details)
  page              open the catalog page of the open details
  player            open the player overlay for the open details
  close             close the details / player overlay
  home, watchlist   switch view
  remove <id>       remove an entry from the watchlist
  open <id>         open the catalog page of a watchlist entry
  help, quit";

/// A parsed input line.
#[derive(Debug)]
pub enum Command {
    Send(Vec<Message>),
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("'{0}' is not a valid number")]
    BadNumber(String),

    #[error("{0}")]
    BadFilter(String),
}

pub fn parse(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    if let Some(text) = line.strip_prefix('/') {
        return Ok(search(text));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let messages = match word.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        "search" | "s" => return Ok(search(rest)),
        "season" => vec![Message::SeasonSelected(filter::<MediaSeason>(
            "season", rest,
        )?)],
        "format" => vec![Message::FormatSelected(filter::<MediaFormat>(
            "format", rest,
        )?)],
        "next" | "n" => vec![Message::NextPage],
        "prev" | "p" => vec![Message::PrevPage],
        "details" | "d" => vec![Message::OpenDetails(card("details", rest)?)],
        "add" | "a" if rest.is_empty() => vec![Message::AddDetailsToWatchlist],
        "add" | "a" => vec![Message::AddToWatchlist(card("add", rest)?)],
        "watch" | "w" if rest.is_empty() => vec![Message::WhereToWatchDetails],
        "watch" | "w" => vec![Message::WhereToWatch(card("watch", rest)?)],
        "page" => vec![Message::OpenDetailsSitePage],
        "player" => vec![Message::OpenPlayer],
        "close" | "c" => vec![Message::ClosePlayer, Message::CloseDetails],
        "home" | "h" => vec![Message::ShowHome],
        "watchlist" | "wl" => vec![Message::ShowWatchlist],
        "remove" | "rm" => vec![Message::RemoveFromWatchlist(id("remove", rest)?)],
        "open" | "o" => vec![Message::OpenWatchlistEntry(id("open", rest)?)],
        _ => return Err(InputError::Unknown(word.to_string())),
    };
    Ok(Command::Send(messages))
}

fn search(text: &str) -> Command {
    let text = text.trim();
    if text.is_empty() {
        Command::Send(vec![Message::SubmitSearch])
    } else {
        Command::Send(vec![
            Message::QueryInput(text.to_string()),
            Message::SubmitSearch,
        ])
    }
}

/// `any` (or nothing) clears the filter.
fn filter<T>(command: &'static str, arg: &str) -> Result<Option<T>, InputError>
where
    T: std::str::FromStr<Err = String>,
{
    if arg.is_empty() || arg.eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    arg.parse::<T>()
        .map(Some)
        .map_err(|e| InputError::BadFilter(format!("{command}: {e}")))
}

/// 1-based card number → 0-based index.
fn card(command: &'static str, arg: &str) -> Result<usize, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument {
            command,
            what: "a result number",
        });
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(InputError::BadNumber(arg.to_string())),
    }
}

fn id(command: &'static str, arg: &str) -> Result<u64, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument {
            command,
            what: "an anime id",
        });
    }
    arg.parse::<u64>()
        .map_err(|_| InputError::BadNumber(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(line: &str) -> Vec<Message> {
        match parse(line).unwrap() {
            Command::Send(messages) => messages,
            other => panic!("expected messages, got {other:?}"),
        }
    }

    #[test]
    fn test_search_with_text() {
        let msgs = messages("search  one piece ");
        assert!(matches!(&msgs[0], Message::QueryInput(q) if q == "one piece"));
        assert!(matches!(msgs[1], Message::SubmitSearch));

        let msgs = messages("/frieren");
        assert!(matches!(&msgs[0], Message::QueryInput(q) if q == "frieren"));
    }

    #[test]
    fn test_bare_search_resubmits() {
        let msgs = messages("search");
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0], Message::SubmitSearch));
    }

    #[test]
    fn test_filters() {
        assert!(matches!(
            messages("season Fall")[0],
            Message::SeasonSelected(Some(MediaSeason::Fall))
        ));
        assert!(matches!(
            messages("season any")[0],
            Message::SeasonSelected(None)
        ));
        assert!(matches!(
            messages("format ova")[0],
            Message::FormatSelected(Some(MediaFormat::Ova))
        ));
        assert!(matches!(
            parse("season monsoon"),
            Err(InputError::BadFilter(_))
        ));
    }

    #[test]
    fn test_card_numbers_are_one_based() {
        assert!(matches!(messages("details 1")[0], Message::OpenDetails(0)));
        assert!(matches!(messages("add 3")[0], Message::AddToWatchlist(2)));
        assert_eq!(
            parse("details 0").unwrap_err(),
            InputError::BadNumber("0".into())
        );
        assert!(matches!(
            parse("details").unwrap_err(),
            InputError::MissingArgument { .. }
        ));
    }

    #[test]
    fn test_add_without_number_targets_details() {
        assert!(matches!(
            messages("add")[0],
            Message::AddDetailsToWatchlist
        ));
        assert!(matches!(messages("watch")[0], Message::WhereToWatchDetails));
    }

    #[test]
    fn test_watchlist_commands() {
        assert!(matches!(
            messages("remove 101")[0],
            Message::RemoveFromWatchlist(101)
        ));
        assert!(matches!(
            messages("open 101")[0],
            Message::OpenWatchlistEntry(101)
        ));
        assert!(matches!(messages("watchlist")[0], Message::ShowWatchlist));
    }

    #[test]
    fn test_control_commands() {
        assert!(matches!(parse("quit"), Ok(Command::Quit)));
        assert!(matches!(parse("HELP"), Ok(Command::Help)));
        assert!(matches!(parse("   "), Ok(Command::Nothing)));
        assert_eq!(
            parse("dance").unwrap_err(),
            InputError::Unknown("dance".into())
        );
    }
}
