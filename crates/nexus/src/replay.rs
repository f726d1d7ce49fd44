//! Deterministic playback of timed hover scripts.
//!
//! ```text
//! # ms   event
//! 0      enter neural
//! 50     enter quantum
//! 100    leave
//! ```

use crate::config::TimingConfig;
use crate::debounce::{ManualScheduler, PanelChange};
use crate::events::{HoverEvent, Request, RequestError, split_words};
use crate::registry::SectorRegistry;
use crate::session::Session;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error("line {line}: missing timestamp")]
    MissingTime { line: usize },
    #[error("line {line}: invalid timestamp '{value}'")]
    BadTime { line: usize, value: String },
    #[error("line {line}: time goes backwards ({at}ms after {previous}ms)")]
    Backwards { line: usize, at: u64, previous: u64 },
    #[error("line {line}: {source}")]
    Request {
        line: usize,
        #[source]
        source: RequestError,
    },
    #[error("line {line}: 'status' is not a hover event")]
    NotHover { line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub at: Duration,
    pub event: HoverEvent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let mut steps = Vec::new();
        let mut previous = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            let words = split_words(content)
                .map_err(|source| ReplayError::Request { line, source })?;
            let (time, rest) = words
                .split_first()
                .ok_or(ReplayError::MissingTime { line })?;
            let at: u64 = time.parse().map_err(|_| ReplayError::BadTime {
                line,
                value: time.clone(),
            })?;
            if at < previous {
                return Err(ReplayError::Backwards {
                    line,
                    at,
                    previous,
                });
            }
            previous = at;

            let event = match Request::from_words(rest)
                .map_err(|source| ReplayError::Request { line, source })?
            {
                Request::Hover(event) => event,
                Request::Status => return Err(ReplayError::NotHover { line }),
            };
            steps.push(Step {
                at: Duration::from_millis(at),
                event,
            });
        }

        Ok(Self { steps })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub change: PanelChange,
}

impl fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}ms active=", self.at.as_millis())?;
        match &self.change.to {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("none"),
        }
    }
}

/// Plays `script` on a virtual clock and returns every active-panel change.
/// Timers still pending after the last step are run to completion.
pub fn run(script: &Script, registry: SectorRegistry, timing: TimingConfig) -> Vec<TimelineEntry> {
    let mut session = Session::new(registry, timing, ManualScheduler::default());
    let mut timeline = Vec::new();

    for step in &script.steps {
        fire_due(&mut session, step.at, &mut timeline);
        session.scheduler_mut().advance_to(step.at);
        if let Some(change) = session.handle_hover(step.event.clone()) {
            timeline.push(TimelineEntry {
                at: step.at,
                change,
            });
        }
    }
    fire_due(&mut session, Duration::MAX, &mut timeline);

    timeline
}

fn fire_due(
    session: &mut Session<ManualScheduler>,
    until: Duration,
    timeline: &mut Vec<TimelineEntry>,
) {
    while let Some((at, token)) = session.scheduler_mut().pop_due(until) {
        if let Some(change) = session.handle_timer(token) {
            timeline.push(TimelineEntry { at, change });
        }
    }
}
