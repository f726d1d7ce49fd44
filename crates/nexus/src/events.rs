use crate::debounce::{HoverState, TimerToken};
use crate::registry::SectorId;
use ringpath::Point;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Enter(SectorId),
    Leave,
    PanelEnter,
    PanelLeave,
    /// Raw pointer position; hit-tested against the wedges.
    PointerMove(Point),
}

#[derive(Debug)]
pub enum AppEvent {
    Hover(HoverEvent),
    TimerFired(TimerToken),
    ConfigReload,
    /// Answered by the event loop once every earlier event is applied.
    Status(oneshot::Sender<HoverState>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
enum Verb {
    Enter,
    Leave,
    PanelEnter,
    PanelLeave,
    Move,
    Status,
}

impl Verb {
    fn arity(self) -> usize {
        match self {
            Self::Enter => 1,
            Self::Move => 2,
            Self::Leave | Self::PanelEnter | Self::PanelLeave | Self::Status => 0,
        }
    }
}

/// One line of the control protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Hover(HoverEvent),
    Status,
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("empty command")]
    Empty,
    #[error("bad quoting: {0}")]
    Quoting(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{verb}' takes {expected} argument(s), got {got}")]
    Arity {
        verb: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid coordinate '{0}'")]
    Coordinate(String),
}

impl Request {
    /// Parses already-split words, e.g. `["enter", "neural"]`.
    pub fn from_words(words: &[String]) -> Result<Self, RequestError> {
        let (first, args) = words.split_first().ok_or(RequestError::Empty)?;
        let verb = Verb::from_str(first)
            .map_err(|_| RequestError::UnknownCommand(first.clone()))?;

        if args.len() != verb.arity() {
            return Err(RequestError::Arity {
                verb: verb.to_string(),
                expected: verb.arity(),
                got: args.len(),
            });
        }

        let request = match verb {
            Verb::Enter => Self::Hover(HoverEvent::Enter(SectorId::new(args[0].clone()))),
            Verb::Leave => Self::Hover(HoverEvent::Leave),
            Verb::PanelEnter => Self::Hover(HoverEvent::PanelEnter),
            Verb::PanelLeave => Self::Hover(HoverEvent::PanelLeave),
            Verb::Move => Self::Hover(HoverEvent::PointerMove(Point::new(
                parse_coordinate(&args[0])?,
                parse_coordinate(&args[1])?,
            ))),
            Verb::Status => Self::Status,
        };
        Ok(request)
    }
}

fn parse_coordinate(s: &str) -> Result<f64, RequestError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RequestError::Coordinate(s.to_string()))
}

/// Splits a line shell-style so ids may be quoted.
pub fn split_words(line: &str) -> Result<Vec<String>, RequestError> {
    shell_words::split(line).map_err(|e| RequestError::Quoting(e.to_string()))
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::from_words(&split_words(line)?)
    }
}
