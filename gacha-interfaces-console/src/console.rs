use std::io::Write;
use std::sync::mpsc::Receiver;

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::debug;

use gacha_application::{SessionEvent, SessionPhase};

use crate::options::DisplayOptions;
use crate::progress::{new_spinner, status_message};
use crate::report::render_summaries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOutcome {
    Populated,
    Failed,
    Cancelled,
}

/// Renders session events until a final one arrives. The spinner draws on
/// stderr; results go to `out` and failures to `err`. Neither writer should be
/// a held stdio lock, since the session worker logs to stderr meanwhile.
pub fn run<O, E>(
    events: &Receiver<SessionEvent>,
    options: &DisplayOptions,
    out: &mut O,
    err: &mut E,
) -> Result<ConsoleOutcome>
where
    O: Write,
    E: Write,
{
    let spinner = new_spinner(options);
    spinner.set_message(status_message(SessionPhase::LocateLog, 0));

    loop {
        let Ok(event) = events.recv() else {
            spinner.finish_and_clear();
            report_failure(err, options, "session worker stopped unexpectedly")?;
            return Ok(ConsoleOutcome::Failed);
        };
        debug!(?event, "session event");

        match event {
            SessionEvent::Waiting { phase, attempt } => {
                spinner.set_message(status_message(phase, attempt));
            }
            SessionEvent::Moved(state) => {
                if let Some(phase) = state.pending_phase() {
                    spinner.set_message(status_message(phase, 0));
                }
            }
            SessionEvent::Finished(summaries) => {
                spinner.finish_and_clear();
                let rendered = render_summaries(&summaries, options)?;
                write!(out, "{}", rendered)?;
                if options.json {
                    writeln!(out)?;
                }
                out.flush()?;
                return Ok(ConsoleOutcome::Populated);
            }
            SessionEvent::Failed(reason) => {
                spinner.finish_and_clear();
                let message = format!("failed to {}: {}", reason.phase, reason.message);
                report_failure(err, options, &message)?;
                return Ok(ConsoleOutcome::Failed);
            }
            SessionEvent::Cancelled => {
                spinner.finish_and_clear();
                writeln!(err, "cancelled")?;
                return Ok(ConsoleOutcome::Cancelled);
            }
        }
    }
}

fn report_failure<E: Write>(err: &mut E, options: &DisplayOptions, message: &str) -> Result<()> {
    if options.enable_color {
        writeln!(err, "{} {}", "error:".red().bold(), message)?;
    } else {
        writeln!(err, "error: {}", message)?;
    }
    Ok(())
}
