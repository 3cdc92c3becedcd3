//! Terminal drawer — line-oriented view over the request controller.
//!
//! DESIGN
//! ======
//! The drawer reads commands line by line and forwards everything that is
//! not a `:command` to [`RequestController::submit`]. It never mutates
//! request state itself; it re-renders whenever the controller publishes a
//! new snapshot. Visibility (`:open` / `:close`) only affects what is
//! printed, the request lifecycle keeps running while the drawer is closed.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::controller::{RequestController, SubmitError};
use crate::state::{Phase, RequestState};

pub const TITLE: &str = "Oyyy! Hive Here! I am Helping you with Your Writing and Research Work Here 📝";
pub const PLACEHOLDER: &str = "Enter your description...";
pub const LOADING: &str = "Loading...";
pub const SUGGESTION_HEADER: &str = "Hive Suggestion:";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Quit,
    Submit(String),
}

impl Command {
    /// Interpret one line of user input. Anything that is not a known
    /// `:command` is a submission, passed through untouched.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":open" => Self::Open,
            ":close" => Self::Close,
            ":quit" | ":q" | ":exit" => Self::Quit,
            _ => Self::Submit(line.to_owned()),
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Text shown for the current lifecycle state, or `None` when there is
/// nothing to show (an empty suggestion).
#[must_use]
pub fn render(state: &RequestState) -> Option<String> {
    match state.phase() {
        Phase::Idle => Some(PLACEHOLDER.to_string()),
        Phase::Pending => Some(LOADING.to_string()),
        Phase::Succeeded => state
            .result()
            .filter(|text| !text.is_empty())
            .map(|text| format!("{SUGGESTION_HEADER}\n{text}")),
        Phase::Failed => state.error_message().map(str::to_owned),
    }
}

/// Inline notice for a refused submission.
#[must_use]
pub fn render_submit_error(err: &SubmitError) -> String {
    match err {
        SubmitError::EmptyInput => err.to_string(),
        SubmitError::Busy { .. } => format!("{LOADING} (wait for the current suggestion)"),
    }
}

fn render_banner() -> String {
    format!("── {TITLE} ──")
}

// =============================================================================
// DRAWER
// =============================================================================

/// Drawer visibility plus the last snapshot it printed.
#[derive(Debug, Default)]
pub struct Drawer {
    open: bool,
    last_rendered: Option<RequestState>,
}

impl Drawer {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the drawer; returns the lines to print.
    pub fn open(&mut self, state: &RequestState) -> Vec<String> {
        if self.open {
            return Vec::new();
        }
        self.open = true;
        self.last_rendered = Some(state.clone());
        std::iter::once(render_banner()).chain(render(state)).collect()
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Lines to print for `state`, empty when closed or nothing changed.
    pub fn update(&mut self, state: &RequestState) -> Vec<String> {
        if !self.open || self.last_rendered.as_ref() == Some(state) {
            return Vec::new();
        }
        self.last_rendered = Some(state.clone());
        render(state).into_iter().collect()
    }

    /// Record that `text` was just accepted and return the loading line.
    ///
    /// Always reports the new request, even when the snapshot it replaces
    /// looks identical to what the next settlement will publish.
    pub fn submitted(&mut self, text: &str) -> Vec<String> {
        if !self.open {
            return Vec::new();
        }
        self.last_rendered = Some(RequestState::pending(text.to_owned()));
        vec![LOADING.to_string()]
    }
}

/// Run the interactive drawer until `:quit` or end of input.
///
/// On end of input a pending request is still awaited so piped prompts get
/// their answer printed.
///
/// # Errors
///
/// Returns any I/O error from reading `input` or writing `output`.
pub async fn run<R, W>(controller: &RequestController, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut drawer = Drawer::default();
    let mut states = controller.subscribe();
    let mut lines = input.lines();

    let opened = drawer.open(&controller.state());
    write_lines(&mut output, &opened).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Command::Quit => return output.flush().await,
                    Command::Open => {
                        let out = drawer.open(&controller.state());
                        write_lines(&mut output, &out).await?;
                    }
                    Command::Close => drawer.close(),
                    Command::Submit(_) if !drawer.is_open() => {
                        write_lines(&mut output, &["drawer is closed; type :open to ask Hive".to_string()]).await?;
                    }
                    Command::Submit(text) => {
                        match controller.submit(&text) {
                            Ok(_) => {
                                let out = drawer.submitted(&text);
                                write_lines(&mut output, &out).await?;
                            }
                            Err(e) => {
                                debug!(error = %e, "drawer: submission refused");
                                write_lines(&mut output, &[render_submit_error(&e)]).await?;
                            }
                        }
                    }
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                let out = drawer.update(&state);
                write_lines(&mut output, &out).await?;
            }
        }
    }

    let state = controller.settled().await;
    let out = drawer.update(&state);
    write_lines(&mut output, &out).await?;
    output.flush().await
}

async fn write_lines<W: AsyncWrite + Unpin>(output: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.flush().await
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
