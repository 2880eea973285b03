//! Terminal runtime: reads commands, executes controller effects, redraws.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use mitai_api::Catalog;
use mitai_core::config::AppConfig;
use mitai_core::controller::{Controller, Effect, Message, SearchForm};
use mitai_core::error::MitaiError;
use mitai_core::storage::KeyValueStore;
use mitai_core::watchlist::Watchlist;

use crate::input::{self, Command};
use crate::render;

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S, C, W> {
    controller: Controller<S>,
    catalog: Arc<C>,
    open_links: bool,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    out: W,
}

impl<S, C> App<S, C, std::io::Stdout>
where
    S: KeyValueStore,
    C: Catalog + 'static,
{
    pub fn new(watchlist: Watchlist<S>, catalog: C, config: &AppConfig) -> Self {
        Self::with_output(watchlist, catalog, config, std::io::stdout())
    }
}

impl<S, C, W> App<S, C, W>
where
    S: KeyValueStore,
    C: Catalog + 'static,
    W: Write,
{
    pub fn with_output(watchlist: Watchlist<S>, catalog: C, config: &AppConfig, out: W) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: Controller::new(watchlist, config),
            catalog: Arc::new(catalog),
            open_links: config.ui.open_links,
            tx,
            rx,
            out,
        }
    }

    /// Run the initial search, then process stdin and fetch results until
    /// `quit` or end of input.
    pub async fn run(mut self, initial: SearchForm) -> Result<(), MitaiError> {
        self.start(initial)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.prompt()?;
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(message) = self.rx.recv() => {
                    self.handle_message(message)?;
                }
            }
        }

        tracing::info!("mitai shutting down");
        Ok(())
    }

    pub fn start(&mut self, initial: SearchForm) -> Result<(), MitaiError> {
        let effects = self.controller.start(initial);
        self.execute(effects)?;
        self.draw()
    }

    /// Handle one line of user input.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, MitaiError> {
        match input::parse(line) {
            Ok(Command::Quit) => return Ok(Flow::Quit),
            Ok(Command::Help) => writeln!(self.out, "{}", input::HELP)?,
            Ok(Command::Nothing) => {}
            Ok(Command::Send(messages)) => {
                for message in messages {
                    let effects = self.controller.update(message);
                    self.execute(effects)?;
                }
                self.draw()?;
            }
            Err(e) => writeln!(self.out, "{e} (type `help` for commands)")?,
        }
        Ok(Flow::Continue)
    }

    /// Feed a message from a finished background task.
    pub fn handle_message(&mut self, message: Message) -> Result<(), MitaiError> {
        let effects = self.controller.update(message);
        self.execute(effects)?;
        self.draw()
    }

    /// Wait for the next background message (fetch completion).
    #[cfg(test)]
    pub async fn next_message(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    #[cfg(test)]
    pub fn controller(&self) -> &Controller<S> {
        &self.controller
    }

    fn execute(&mut self, effects: Vec<Effect>) -> Result<(), MitaiError> {
        for effect in effects {
            match effect {
                Effect::Fetch { generation, query } => {
                    let catalog = Arc::clone(&self.catalog);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = catalog
                            .search_page(&query)
                            .await
                            .map_err(|e| e.to_string());
                        // The receiver only goes away on shutdown.
                        let _ = tx.send(Message::SearchCompleted { generation, result });
                    });
                }
                Effect::Notify(text) => {
                    writeln!(self.out, "\n  [!] {text}\n")?;
                }
                Effect::OpenUrl(url) => {
                    writeln!(self.out, "  -> {url}")?;
                    if self.open_links {
                        if let Err(e) = open::that(&url) {
                            tracing::warn!(error = %e, url = %url, "failed to open link");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<(), MitaiError> {
        let frame = render::render(self.controller.screen(), self.controller.form());
        write!(self.out, "{frame}")?;
        self.out.flush()?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), MitaiError> {
        write!(self.out, "mitai> ")?;
        self.out.flush()?;
        Ok(())
    }
}
