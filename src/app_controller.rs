use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::app_config::Config;
use crate::capabilities::Capabilities;
use crate::language_utils;
use crate::session::{
    CopyOutcome, OutputKind, RecognitionOutcome, Session, SpeechOutcome, TranslationOutcome, ViewEvent, ViewState,
};

// @module: Application controller for the interactive prompt

const HELP: &str = "Type text to translate it. Commands:
    :source <code|auto>   select the source language
    :target <code>        select the target language
    :swap                 swap languages, moving the translation into the input
    :copy                 copy the translation to the clipboard
    :speak                speak the translation
    :listen               translate one spoken utterance
    :status               show the current languages, counter and output
    :help                 show this help
    :quit                 exit";

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// New input text
    Text(String),
    Source(String),
    Target(String),
    Swap,
    Copy,
    Speak,
    Listen,
    Status,
    Help,
    Quit,
    /// A `:` command that is not recognized, or misses its argument
    Invalid(String),
}

impl Command {
    // @parses: A prompt line into a command; anything not starting with ':' is input text
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix(':') else {
            return Self::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts.next().map(str::to_string);

        match (name.as_str(), argument) {
            ("source" | "s", Some(code)) => Self::Source(code),
            ("target" | "t", Some(code)) => Self::Target(code),
            ("swap", None) => Self::Swap,
            ("copy", None) => Self::Copy,
            ("speak", None) => Self::Speak,
            ("listen", None) => Self::Listen,
            ("status", None) => Self::Status,
            ("help" | "h" | "?", None) => Self::Help,
            ("quit" | "q" | "exit", None) => Self::Quit,
            _ => Self::Invalid(trimmed.to_string()),
        }
    }
}

/// Whether the prompt loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main application controller for the interactive prompt
pub struct Controller {
    // @field: Session every command goes through
    session: Session,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration and no capabilities
    pub fn new_for_test() -> Self {
        Self::with_config(&Config::default(), Capabilities::none())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: &Config, capabilities: Capabilities) -> Self {
        Self {
            session: Session::with_config(config, capabilities),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands from `input` until it ends or `:quit`, rendering view changes as they happen
    pub async fn run<R>(&self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let renderer = spawn_renderer(self.session.subscribe());
        println!("{}", format_status(&self.session.view()));

        let mut lines = input.lines();
        loop {
            let Some(line) = lines.next_line().await? else {
                // Input ended; the last edit still gets its translation
                self.session.flush_pending().await;
                break;
            };
            if self.handle(Command::parse(&line)).await == Flow::Quit {
                break;
            }
        }

        info!("Bye");
        renderer.abort();
        Ok(())
    }

    // @returns: Whether to keep reading commands
    pub async fn handle(&self, command: Command) -> Flow {
        debug!("Command: {:?}", command);

        match command {
            Command::Text(text) => self.session.on_input_changed(&text),
            Command::Source(code) => {
                if let Err(e) = self.session.select_source_language(&code).await {
                    warn!("{}", e);
                }
            }
            Command::Target(code) => {
                if let Err(e) = self.session.select_target_language(&code).await {
                    warn!("{}", e);
                }
            }
            Command::Swap => {
                if let TranslationOutcome::Cleared = self.session.swap_languages().await {
                    println!("{}", format_status(&self.session.view()));
                }
            }
            Command::Copy => match self.session.copy_translation().await {
                CopyOutcome::Copied => println!("Copied."),
                CopyOutcome::NothingToCopy => println!("Nothing to copy."),
                CopyOutcome::Unavailable => warn!("Clipboard is not available in this build"),
                CopyOutcome::Failed(_) => {}
            },
            Command::Speak => match self.session.speak_translation().await {
                SpeechOutcome::NothingToSpeak => println!("Nothing to speak."),
                SpeechOutcome::Unavailable => warn!("Speech synthesis is not available"),
                SpeechOutcome::Spoken | SpeechOutcome::Failed(_) => {}
            },
            Command::Listen => {
                if let RecognitionOutcome::Unavailable = self.session.start_voice_recognition().await {
                    warn!("Speech recognition is not available");
                }
            }
            Command::Status => println!("{}", format_status(&self.session.view())),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Flow::Quit,
            Command::Invalid(line) => warn!("Unknown command '{}', type :help", line),
        }

        Flow::Continue
    }
}

/// Display name for a selector value
fn language_label(code: &str, view: &ViewState) -> String {
    if language_utils::is_auto(code) {
        return view
            .auto_label
            .clone()
            .unwrap_or_else(|| "Detect language".to_string());
    }

    language_utils::get_language_name(code)
        .map(|name| format!("{} ({})", name, code))
        .unwrap_or_else(|_| code.to_string())
}

/// One-line summary of the view
pub fn format_status(view: &ViewState) -> String {
    let counter = if view.over_limit {
        format!("\x1B[1;31m{} chars\x1B[0m", view.char_count)
    } else {
        format!("{} chars", view.char_count)
    };

    let output = if view.output.is_empty() {
        String::new()
    } else {
        format!(" | {}", view.output)
    };

    format!(
        "{} -> {} | {}{}",
        language_label(&view.source_language, view),
        language_label(&view.target_language, view),
        counter,
        output
    )
}

// @creates: Download progress bar styled like the rest of the CLI
fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}% {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("█▓▒░"));
    bar.set_message("Downloading model");
    bar
}

/// Print output changes until the session goes away
fn spawn_renderer(mut events: broadcast::Receiver<ViewEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut download: Option<ProgressBar> = None;

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Renderer skipped {} view events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                ViewEvent::DownloadProgress { fraction } => {
                    let bar = download.get_or_insert_with(download_bar);
                    bar.set_position((fraction * 100.0).floor() as u64);
                }
                ViewEvent::OutputChanged { text, kind } => {
                    if kind != OutputKind::Progress {
                        if let Some(bar) = download.take() {
                            bar.finish_and_clear();
                        }
                    }

                    match kind {
                        OutputKind::Status => println!("\x1B[2m{}\x1B[0m", text),
                        OutputKind::Result => println!("\x1B[1m=> {}\x1B[0m", text),
                        OutputKind::Error => println!("\x1B[1;31m{}\x1B[0m", text),
                        OutputKind::Progress | OutputKind::Cleared => {}
                    }
                }
                ViewEvent::AutoLabelChanged { label } => println!("\x1B[2m{}\x1B[0m", label),
                ViewEvent::PlaceholderChanged { text } => println!("\x1B[2m{}\x1B[0m", text),
                ViewEvent::CharCountChanged { count, over_limit: true } => {
                    warn!("Input has {} characters, over the limit", count)
                }
                _ => {}
            }
        }
    })
}
