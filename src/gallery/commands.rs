//! # Commands Module
//!
//! Parses lines typed at the gallery prompt into commands.

use crate::gallery::models::{FacetKind, PageControl, UnknownFacet};
use std::str::FromStr;

/// A user action at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    /// Replace the search text (empty clears it)
    Search(String),
    /// Replace a facet filter (empty means All)
    Filter { kind: FacetKind, value: String },
    /// Activate a pagination control
    Navigate(PageControl),
    /// Open the detail view for a card, 1-based
    Show(usize),
    /// Dismiss the detail view
    Close,
    /// List the options of a facet
    Options(FacetKind),
    /// Re-fetch facet options
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Facet(#[from] UnknownFacet),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// Help text listing every command
pub const HELP_TEXT: &str = "\
Commands:
  search <text>             search titles, dates, artists, ... (empty clears)
  filter <facet> [value]    set classification, century or culture (no value = All)
  page <n>                  go to page n
  first | prev | next | last
  show <n>                  show details of card n
  close                     close the detail view
  options <facet>           list the values of a facet
  refresh                   reload facet options
  help                      show this help
  quit                      exit";

fn parse_number<T: FromStr>(value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidNumber(value.to_string()))
}

impl FromStr for GalleryCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let line = line.strip_prefix(':').unwrap_or(line);
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "search" | "s" | "/" => Ok(GalleryCommand::Search(rest.to_string())),
            "filter" | "f" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("filter <facet> [value]"));
                }
                let (facet, value) = match rest.split_once(char::is_whitespace) {
                    Some((facet, value)) => (facet, value.trim()),
                    None => (rest, ""),
                };
                let value = if value.eq_ignore_ascii_case("all") {
                    ""
                } else {
                    value
                };
                Ok(GalleryCommand::Filter {
                    kind: facet.parse()?,
                    value: value.to_string(),
                })
            }
            "page" | "p" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("page <n>"));
                }
                Ok(GalleryCommand::Navigate(PageControl::Page(parse_number(
                    rest,
                )?)))
            }
            "first" => Ok(GalleryCommand::Navigate(PageControl::First)),
            "prev" | "previous" => Ok(GalleryCommand::Navigate(PageControl::Previous)),
            "next" | "n" => Ok(GalleryCommand::Navigate(PageControl::Next)),
            "last" => Ok(GalleryCommand::Navigate(PageControl::Last)),
            "show" => match parse_number::<usize>(rest) {
                Ok(0) | Err(_) => Err(CommandError::Usage("show <n> (card number, from 1)")),
                Ok(index) => Ok(GalleryCommand::Show(index)),
            },
            "close" => Ok(GalleryCommand::Close),
            "options" | "o" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("options <facet>"));
                }
                Ok(GalleryCommand::Options(rest.parse()?))
            }
            "refresh" => Ok(GalleryCommand::Refresh),
            "help" | "h" | "?" => Ok(GalleryCommand::Help),
            "quit" | "q" | "q!" | "exit" => Ok(GalleryCommand::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<GalleryCommand, CommandError> {
        line.parse()
    }

    #[test]
    fn search_should_keep_full_text() {
        assert_eq!(
            parse("search  blue  vase "),
            Ok(GalleryCommand::Search("blue  vase".to_string()))
        );
        assert_eq!(parse("search"), Ok(GalleryCommand::Search(String::new())));
    }

    #[test]
    fn filter_should_accept_multi_word_values() {
        assert_eq!(
            parse("filter century 18th century"),
            Ok(GalleryCommand::Filter {
                kind: FacetKind::Century,
                value: "18th century".to_string()
            })
        );
    }

    #[test]
    fn filter_without_value_or_all_should_clear() {
        let cleared = Ok(GalleryCommand::Filter {
            kind: FacetKind::Culture,
            value: String::new(),
        });
        assert_eq!(parse("filter culture"), cleared);
        assert_eq!(parse("filter culture All"), cleared);
    }

    #[test]
    fn filter_with_unknown_facet_should_fail() {
        assert_eq!(
            parse("filter medium oil"),
            Err(CommandError::Facet(UnknownFacet("medium".to_string())))
        );
    }

    #[test]
    fn navigation_commands_should_map_to_controls() {
        assert_eq!(
            parse("page 4"),
            Ok(GalleryCommand::Navigate(PageControl::Page(4)))
        );
        assert_eq!(
            parse(":next"),
            Ok(GalleryCommand::Navigate(PageControl::Next))
        );
        assert_eq!(
            parse("prev"),
            Ok(GalleryCommand::Navigate(PageControl::Previous))
        );
        assert_eq!(
            parse("page x"),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn show_should_require_positive_index() {
        assert_eq!(parse("show 3"), Ok(GalleryCommand::Show(3)));
        assert!(matches!(parse("show 0"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("show"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn unknown_commands_should_be_reported() {
        assert_eq!(
            parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(parse("q"), Ok(GalleryCommand::Quit));
    }
}
