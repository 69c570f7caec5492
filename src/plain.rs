//! # Plain Line Mode
//!
//! A terminal-free adapter: every stdin line is one submission, every
//! transcript change is one stdout line. Useful for piping and scripting.
//!
//! ```text
//! stdin ──► InputBuffer ──► Action::Submit ──► Controller
//!                                                  │
//! stdout ◄── PlainRenderer ◄── TranscriptEvent ◄───┘
//! ```
//!
//! After stdin closes the loop keeps running until every pending reply has
//! been delivered.

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{Instant, sleep_until};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::controller::Controller;
use crate::core::input::InputBuffer;
use crate::core::transcript::{Message, TranscriptEvent};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `user: hello`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonLine<'a> {
    Message(&'a Message),
    Cleared,
}

pub struct PlainRenderer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn render(&mut self, event: &TranscriptEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => match event {
                TranscriptEvent::MessageAdded(message) => {
                    writeln!(self.out, "{}: {}", message.sender(), message.text())
                }
                TranscriptEvent::Cleared => writeln!(self.out, "-- cleared --"),
            },
            OutputFormat::Json => {
                let line = match event {
                    TranscriptEvent::MessageAdded(message) => JsonLine::Message(message),
                    TranscriptEvent::Cleared => JsonLine::Cleared,
                };
                serde_json::to_writer(&mut self.out, &line)?;
                writeln!(self.out)
            }
        }
    }

    /// Writes every notification queued on `events`. Returns how many.
    pub fn drain(&mut self, events: &Receiver<TranscriptEvent>) -> io::Result<usize> {
        let mut written = 0;
        for event in events.try_iter() {
            self.render(&event)?;
            written += 1;
        }
        if written > 0 {
            self.out.flush()?;
        }
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Maps a stdin line to an action. Slash commands are matched exactly,
/// anything else is a message.
fn line_action(line: &str) -> Action {
    match line.trim() {
        "/clear" => Action::Clear,
        "/quit" => Action::Quit,
        _ => Action::Submit,
    }
}

/// Feeds one line into the controller the same way the TUI does.
fn submit_line(controller: &mut Controller<InputBuffer>, line: String) -> Effect {
    let action = line_action(&line);
    if action == Action::Submit {
        controller.input_mut().set(line);
    }
    update(controller, action)
}

pub async fn run(config: &ResolvedConfig, format: OutputFormat) -> io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_with(config, format, stdin, io::stdout()).await
}

/// Runs line mode over any line source and sink.
pub async fn run_with<R, W>(
    config: &ResolvedConfig,
    format: OutputFormat,
    reader: R,
    writer: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut controller = Controller::from_config(InputBuffer::new(), config);
    let events = controller.subscribe();
    let mut renderer = PlainRenderer::new(writer, format);

    controller.start();
    renderer.drain(&events)?;

    let mut lines = reader.lines();
    let mut input_open = true;

    loop {
        let next_deadline = controller.next_deadline();

        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    if submit_line(&mut controller, line) == Effect::Quit {
                        info!("Quit requested, dropping {} pending repl(ies)", controller.pending());
                        break;
                    }
                }
                None => {
                    debug!("Input closed, {} repl(ies) pending", controller.pending());
                    input_open = false;
                }
            },
            _ = sleep_until(next_deadline.unwrap_or_else(Instant::now)), if next_deadline.is_some() => {
                controller.run_due();
            }
            else => break,
        }

        renderer.drain(&events)?;
    }

    renderer.drain(&events)?;
    info!(
        "Line mode finished with {} message(s)",
        controller.transcript().len()
    );
    Ok(())
}
