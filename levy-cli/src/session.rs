//! Line-oriented interactive form.
//!
//! Each input line is one command. Lookups and suggestion queries run as
//! background tasks so the prompt stays responsive; their results go
//! through [`AppState`]'s ticket check before anything is displayed.

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use levy_core::TaxEstimator;
use levy_core::input::autocomplete::suggestion_query;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::logging;
use crate::render::{render_form, render_output, render_suggestions};
use crate::state::{AppState, SelectionError, Submission};

pub const HELP: &str = "\
Commands:
  address <text>    set the property address (3+ characters lists suggestions)
  parcel <id>       set the parcel ID (digits only)
  assessed <n>      set the assessed value
  exemption <n>     set the exemption amount
  clear             clear all fields
  estimate          compute the tax share for the current fields
  suggest <text>    list addresses matching <text>
  select <n>        use suggestion <n> as the property address
  dismiss           close the suggestion list
  show              show the current fields and results
  log <level>       change the log filter (e.g. debug)
  help              show this help
  quit              leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Address(String),
    Parcel(String),
    Assessed(String),
    Exemption(String),
    Clear,
    Estimate,
    Suggest(String),
    Select(usize),
    Dismiss,
    Show,
    Log(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a suggestion number")]
    BadIndex(String),
}

impl FromStr for SessionCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseCommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            // Empty arguments clear the field.
            "address" => Ok(Self::Address(rest.to_string())),
            "parcel" => Ok(Self::Parcel(rest.to_string())),
            "assessed" => Ok(Self::Assessed(rest.to_string())),
            "exemption" => Ok(Self::Exemption(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "estimate" | "go" => Ok(Self::Estimate),
            "suggest" => arg("suggest").map(Self::Suggest),
            "select" => {
                let raw = arg("select")?;
                match raw.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(Self::Select(n)),
                    _ => Err(ParseCommandError::BadIndex(raw)),
                }
            }
            "dismiss" => Ok(Self::Dismiss),
            "show" => Ok(Self::Show),
            "log" => arg("log").map(Self::Log),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug)]
pub enum Flow {
    Continue,
    /// A background task was started; its output arrives on the channel.
    Pending(JoinHandle<()>),
    Quit,
}

pub struct Session {
    state: Arc<Mutex<AppState>>,
    estimator: TaxEstimator,
    project_name: String,
    output: mpsc::UnboundedSender<String>,
}

impl Session {
    /// Creates a session whose display text is sent to `output`.
    pub fn new(
        estimator: TaxEstimator,
        project_name: impl Into<String>,
        output: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState::new())),
            estimator,
            project_name: project_name.into(),
            output,
        }
    }

    pub fn state(&self) -> Arc<Mutex<AppState>> {
        self.state.clone()
    }

    fn emit(
        &self,
        text: impl Into<String>,
    ) {
        let _ = self.output.send(text.into());
    }

    pub async fn handle(
        &self,
        command: SessionCommand,
    ) -> Flow {
        match command {
            SessionCommand::Address(text) => {
                self.state.lock().await.form.set_street_address(&text);
                match suggestion_query(&text) {
                    Some(query) => self.spawn_suggestions(query.to_string()).await,
                    None => {
                        self.state.lock().await.suggestions.dismiss();
                        Flow::Continue
                    }
                }
            }
            SessionCommand::Parcel(text) => {
                let mut state = self.state.lock().await;
                state.form.set_parcel_id(&text);
                if state.form.parcel_id.is_empty() && !text.trim().is_empty() {
                    self.emit("Parcel ID accepts digits only; field cleared.\n");
                }
                Flow::Continue
            }
            SessionCommand::Assessed(text) => {
                self.state.lock().await.form.set_assessed_value(&text);
                Flow::Continue
            }
            SessionCommand::Exemption(text) => {
                self.state.lock().await.form.set_exemption_value(&text);
                Flow::Continue
            }
            SessionCommand::Clear => {
                self.state.lock().await.form.clear();
                Flow::Continue
            }
            SessionCommand::Estimate => self.submit().await,
            SessionCommand::Suggest(text) => self.spawn_suggestions(text).await,
            SessionCommand::Select(number) => {
                let mut state = self.state.lock().await;
                let selected = match number.checked_sub(1) {
                    Some(index) => state.select_suggestion(index),
                    None => Err(SelectionError::OutOfRange(number)),
                };
                match selected {
                    Ok(chosen) => self.emit(format!("Property Address: {}\n", chosen.full_address)),
                    Err(err) => self.emit(format!("{err}\n")),
                }
                Flow::Continue
            }
            SessionCommand::Dismiss => {
                self.state.lock().await.suggestions.dismiss();
                Flow::Continue
            }
            SessionCommand::Show => {
                let state = self.state.lock().await;
                self.emit(format!(
                    "{}\n{}{}",
                    render_form(&state),
                    render_output(&self.project_name, &state.output),
                    render_suggestions(&state)
                ));
                Flow::Continue
            }
            SessionCommand::Log(level) => {
                match logging::set_log_level(&level) {
                    Ok(()) => self.emit(format!("Log filter set to '{level}'.\n")),
                    Err(err) => self.emit(format!("{err}\n")),
                }
                Flow::Continue
            }
            SessionCommand::Help => {
                self.emit(HELP);
                Flow::Continue
            }
            SessionCommand::Quit => Flow::Quit,
        }
    }

    async fn submit(&self) -> Flow {
        let mut state = self.state.lock().await;
        let (ticket, mode) = match state.submit() {
            Submission::Rejected => {
                self.emit(render_output(&self.project_name, &state.output));
                return Flow::Continue;
            }
            Submission::Pending(ticket, mode) => (ticket, mode),
        };
        drop(state);

        if mode.needs_lookup() {
            self.emit("Looking up property...\n");
        }

        let shared = self.state.clone();
        let estimator = self.estimator.clone();
        let project_name = self.project_name.clone();
        let output = self.output.clone();
        Flow::Pending(tokio::spawn(async move {
            let outcome = estimator.run(mode).await;
            let mut state = shared.lock().await;
            if state.apply(ticket, outcome) {
                let _ = output.send(render_output(&project_name, &state.output));
            }
        }))
    }

    async fn spawn_suggestions(
        &self,
        query: String,
    ) -> Flow {
        let ticket = self.state.lock().await.begin_suggestion();

        let shared = self.state.clone();
        let estimator = self.estimator.clone();
        let output = self.output.clone();
        Flow::Pending(tokio::spawn(async move {
            let result = estimator.suggest(&query).await;
            let mut state = shared.lock().await;
            match result {
                Ok(candidates) => {
                    if state.apply_suggestions(ticket, candidates) && state.suggestions.is_open() {
                        let _ = output.send(render_suggestions(&state));
                    }
                }
                Err(err) => {
                    debug!(ticket = ticket.number(), %err, "suggestion query failed");
                    if state.is_current_suggestion(ticket) {
                        let _ = output.send(format!("{err}\n"));
                    }
                }
            }
        }))
    }
}

/// Runs the session against stdin/stdout until `quit` or end of input.
pub async fn run_interactive(
    estimator: TaxEstimator,
    project_name: &str,
) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = Session::new(estimator, project_name, tx);

    println!("{project_name} tax share estimator. Type 'help' for commands.");
    info!("interactive session started");
    drive(session, rx, BufReader::new(tokio::io::stdin()), &mut std::io::stdout()).await?;
    info!("interactive session ended");
    Ok(())
}

/// Feeds `input` line by line into `session`, writing its output to `out`.
///
/// Returns once input ends (or `quit` is read) and every background task
/// the session started has reported.
pub async fn drive<R, W>(
    session: Session,
    mut rx: mpsc::UnboundedReceiver<String>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<SessionCommand>() {
                    Ok(command) => {
                        if let Flow::Quit = session.handle(command).await {
                            break;
                        }
                    }
                    Err(ParseCommandError::Empty) => {}
                    Err(err) => writeln!(out, "{err}")?,
                }
            }
            Some(text) = rx.recv() => {
                write!(out, "{text}")?;
                out.flush()?;
            }
        }
    }

    // Tasks hold clones of the sender; the channel closes once they finish.
    drop(session);
    while let Some(text) = rx.recv().await {
        write!(out, "{text}")?;
    }
    out.flush()?;
    Ok(())
}
