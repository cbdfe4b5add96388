//! Line-driven event loop for the console host.
//!
//! Every event (a line typed by the user or a command fired by a timer)
//! arrives on one `mpsc` channel and is handled to completion before the
//! next one is read, so page state is only ever touched from this loop.

use std::{io::Write, str::FromStr};

use anyhow::Context;
use site_core::{
    AddOnId, Command, Effect, EstimateDisplay, FormField, GalleryItem, PageController,
    PresentationSurface,
    controller::RESET_PROMPT,
    gallery::{self, GalleryFilter, ModalSet},
    news::{CategoryFilter, NewsFeed},
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{console::ConsoleSurface, logging::log_task_error};

pub const HELP: &str = "\
Commands:
  set <field> <value>     edit name, surname, phone, email, product or term
  blur <field>            validate a field
  product <id>            select a product
  term <days>             set the term
  addon <id> [on|off]     select or clear an add-on
  consent [on|off]        accept the privacy conditions
  submit                  send the estimate request
  ok                      close the confirmation
  reset [yes|no]          clear the form
  catalog                 list products and add-ons
  status                  show the form
  news [category <c> | search <q>]
  gallery [filter <c> | search <q> | open <id> | close <id> | escape]
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(String),
    Page(Command),
    InputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsQuery {
    Latest,
    Category(CategoryFilter),
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryAction {
    Filter(GalleryFilter),
    Search(String),
    Open(String),
    Close(String),
    Escape,
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Page(Command),
    /// `None` asks the user before resetting.
    Reset(Option<bool>),
    News(NewsQuery),
    Gallery(GalleryAction),
    Catalog,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}', type `help`")]
    UnknownCommand(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("{0}")]
    UnknownField(String),

    #[error("expected on or off, got '{0}'")]
    InvalidSwitch(String),
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(head, rest)| (head, rest.trim()))
}

fn required<'a>(
    value: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::MissingArgument { command, what })
    } else {
        Ok(value)
    }
}

fn switch(value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "" | "on" | "yes" | "y" | "true" => Ok(true),
        "off" | "no" | "n" | "false" => Ok(false),
        other => Err(ParseError::InvalidSwitch(other.to_string())),
    }
}

fn edit(
    field: FormField,
    value: &str,
) -> Input {
    Input::Page(Command::EditField {
        field,
        value: value.to_string(),
    })
}

impl FromStr for Input {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(line);
        let input = match word.to_ascii_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "status" => Self::Status,
            "catalog" => Self::Catalog,
            "set" => {
                let (field, value) = split_word(rest);
                let field = required(field, "set", "a field name")?;
                edit(field.parse().map_err(ParseError::UnknownField)?, value)
            }
            "blur" => {
                let field = required(rest, "blur", "a field name")?;
                Self::Page(Command::BlurField(
                    field.parse().map_err(ParseError::UnknownField)?,
                ))
            }
            "product" => edit(FormField::Product, rest),
            "term" => edit(FormField::Term, rest),
            "addon" => {
                let (id, state) = split_word(rest);
                let id = required(id, "addon", "an add-on id")?;
                Self::Page(Command::ToggleAddOn {
                    id: AddOnId::new(id),
                    selected: switch(state)?,
                })
            }
            "consent" => Self::Page(Command::SetConsent(switch(rest)?)),
            "submit" => Self::Page(Command::Submit),
            "ok" | "close" => Self::Page(Command::DismissConfirmation),
            "reset" if rest.is_empty() => Self::Reset(None),
            "reset" => Self::Reset(Some(switch(rest)?)),
            "news" => Self::News(parse_news(rest)?),
            "gallery" => Self::Gallery(parse_gallery(rest)?),
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(input)
    }
}

fn parse_news(args: &str) -> Result<NewsQuery, ParseError> {
    let (verb, rest) = split_word(args);
    match verb {
        "" | "latest" => Ok(NewsQuery::Latest),
        "category" => Ok(NewsQuery::Category(CategoryFilter::parse(required(
            rest,
            "news category",
            "a category",
        )?))),
        "search" => Ok(NewsQuery::Search(rest.to_string())),
        other => Err(ParseError::UnknownCommand(format!("news {other}"))),
    }
}

fn parse_gallery(args: &str) -> Result<GalleryAction, ParseError> {
    let (verb, rest) = split_word(args);
    match verb {
        "" | "all" => Ok(GalleryAction::Filter(GalleryFilter::All)),
        "filter" => Ok(GalleryAction::Filter(GalleryFilter::parse(required(
            rest,
            "gallery filter",
            "a category",
        )?))),
        "search" => Ok(GalleryAction::Search(rest.to_string())),
        "open" => Ok(GalleryAction::Open(
            required(rest, "gallery open", "a project id")?.to_string(),
        )),
        "close" => Ok(GalleryAction::Close(
            required(rest, "gallery close", "a project id")?.to_string(),
        )),
        "escape" | "esc" => Ok(GalleryAction::Escape),
        other => Err(ParseError::UnknownCommand(format!("gallery {other}"))),
    }
}

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Vec<Effect>),
    Quit,
}

/// Owns the page controller and its console for the lifetime of the host.
pub struct Session<W: Write> {
    controller: PageController,
    surface: ConsoleSurface<W>,
    news: Option<NewsFeed>,
    gallery: Vec<GalleryItem>,
    modals: ModalSet,
    awaiting_reset: bool,
}

impl<W: Write> Session<W> {
    pub fn new(
        controller: PageController,
        surface: ConsoleSurface<W>,
    ) -> Self {
        Self {
            controller,
            surface,
            news: None,
            gallery: Vec::new(),
            modals: ModalSet::default(),
            awaiting_reset: false,
        }
    }

    pub fn with_news(
        mut self,
        feed: NewsFeed,
    ) -> Self {
        self.news = Some(feed);
        self
    }

    pub fn with_gallery(
        mut self,
        items: Vec<GalleryItem>,
    ) -> Self {
        self.gallery = items;
        self
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    pub fn surface(&self) -> &ConsoleSurface<W> {
        &self.surface
    }

    pub fn into_output(self) -> W {
        self.surface.into_inner()
    }

    /// Prints the greeting and the initial, empty estimate.
    pub fn start(&mut self) {
        self.surface
            .line(format_args!("Budget form ready. Type `help` for commands."));
        self.surface.show_estimate(&EstimateDisplay::zeroed());
    }

    pub async fn handle_event(
        &mut self,
        event: Event,
    ) -> Flow {
        match event {
            Event::Line(line) => self.handle_line(&line).await,
            Event::Page(command) => {
                Flow::Continue(self.controller.dispatch(command, &mut self.surface).await)
            }
            Event::InputClosed => Flow::Quit,
        }
    }

    pub async fn handle_line(
        &mut self,
        line: &str,
    ) -> Flow {
        if self.awaiting_reset {
            self.awaiting_reset = false;
            let answer = switch(line.trim()).unwrap_or(false);
            return self.reset(answer).await;
        }

        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(ParseError::Empty) => return Flow::Continue(Vec::new()),
            Err(err) => {
                debug!(line, %err, "unparsed input");
                self.surface.line(format_args!("! {err}"));
                return Flow::Continue(Vec::new());
            }
        };

        match input {
            Input::Page(command) => {
                return Flow::Continue(self.controller.dispatch(command, &mut self.surface).await);
            }
            Input::Reset(Some(answer)) => return self.reset(answer).await,
            Input::Reset(None) => {
                self.awaiting_reset = true;
                self.surface.line(format_args!("{RESET_PROMPT} [y/N]"));
            }
            Input::News(query) => self.show_news(query).await,
            Input::Gallery(action) => self.show_gallery(action),
            Input::Catalog => self.show_catalog(),
            Input::Status => self.show_status(),
            Input::Help => self.surface.line(format_args!("{HELP}")),
            Input::Quit => return Flow::Quit,
        }
        Flow::Continue(Vec::new())
    }

    async fn reset(
        &mut self,
        answer: bool,
    ) -> Flow {
        self.surface.answer_next_confirm(answer);
        Flow::Continue(
            self.controller
                .dispatch(Command::RequestReset, &mut self.surface)
                .await,
        )
    }

    async fn show_news(
        &mut self,
        query: NewsQuery,
    ) {
        let Some(feed) = &self.news else {
            self.surface.line(format_args!("! News feed not configured."));
            return;
        };
        let view = match query {
            NewsQuery::Latest => feed.latest().await,
            NewsQuery::Category(filter) => feed.by_category(&filter).await,
            NewsQuery::Search(query) => feed.search(&query).await,
        };
        self.surface.line(format_args!("{view}"));
    }

    fn show_gallery(
        &mut self,
        action: GalleryAction,
    ) {
        match action {
            GalleryAction::Filter(filter) => {
                let visibility = gallery::apply_filter(&self.gallery, &filter);
                for entry in visibility.iter().filter(|v| v.visible) {
                    let delay = entry.reveal_delay.unwrap_or_default().as_millis();
                    self.surface.line(format_args!(
                        "  [{}] {} ({}) +{delay}ms",
                        entry.item.id, entry.item.title, entry.item.category
                    ));
                }
                let hidden = visibility.iter().filter(|v| !v.visible).count();
                if hidden > 0 {
                    self.surface.line(format_args!("  ({hidden} hidden)"));
                }
            }
            GalleryAction::Search(query) => {
                let matches = gallery::search(&self.gallery, &query);
                if matches.is_empty() {
                    self.surface.line(format_args!("  No projects match '{query}'."));
                }
                for item in matches {
                    self.surface
                        .line(format_args!("  [{}] {}", item.id, item.title));
                }
            }
            GalleryAction::Open(id) => match self.gallery.iter().find(|item| item.id == id) {
                Some(item) => {
                    self.surface.line(format_args!(
                        "== {} ==\n{}\n(`gallery escape` to close)",
                        item.title, item.description
                    ));
                    self.modals.open(id);
                }
                None => self.surface.line(format_args!("! No project '{id}'.")),
            },
            GalleryAction::Close(id) => {
                if self.modals.close(&id) {
                    self.surface.line(format_args!("Closed {id}."));
                }
            }
            GalleryAction::Escape => {
                if let Some(id) = self.modals.close_on_escape() {
                    self.surface.line(format_args!("Closed {id}."));
                }
            }
        }
    }

    fn show_catalog(&mut self) {
        let catalog = self.controller.catalog();
        let products: Vec<String> = catalog
            .products()
            .map(|p| format!("  {:<12} {} ({})", p.id, p.label, p.price))
            .collect();
        let add_ons: Vec<String> = catalog
            .add_ons()
            .map(|a| format!("  {:<12} {} ({})", a.id, a.label, a.price))
            .collect();

        self.surface
            .line(format_args!("Products:\n{}", products.join("\n")));
        self.surface
            .line(format_args!("Add-ons:\n{}", add_ons.join("\n")));
    }

    fn show_status(&mut self) {
        let form = self.controller.form();
        let mut lines: Vec<String> = FormField::ALL
            .iter()
            .map(|field| format!("  {:<8} {}", field.as_str(), form.value(*field)))
            .collect();
        let add_ons: Vec<&str> = form.add_ons.iter().map(AddOnId::as_str).collect();
        lines.push(format!("  {:<8} {}", "add-ons", add_ons.join(", ")));
        lines.push(format!(
            "  {:<8} {}",
            "consent",
            if form.consent { "yes" } else { "no" }
        ));
        for (field, message) in self.surface.field_errors() {
            lines.push(format!("  ✗ {field}: {message}"));
        }

        let display = self.controller.estimate().display();
        self.surface.line(format_args!("{}", lines.join("\n")));
        self.surface.show_estimate(&display);
    }

    /// Runs until the user quits or input ends. Delayed resets are spawned
    /// as timer tasks that post back into `events`.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<Event>,
        sender: mpsc::Sender<Event>,
    ) -> W {
        self.start();
        while let Some(event) = events.recv().await {
            match self.handle_event(event).await {
                Flow::Continue(effects) => {
                    for effect in effects {
                        schedule(effect, sender.clone());
                    }
                }
                Flow::Quit => break,
            }
        }
        info!("session ended");
        self.into_output()
    }
}

fn schedule(
    effect: Effect,
    sender: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    match effect {
        Effect::ScheduleReset(delay) => tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = sender
                .send(Event::Page(Command::ResetForm))
                .await
                .context("session closed before the delayed reset");
            log_task_error("delayed reset", result);
        }),
    }
}

/// Forwards stdin lines into the session, then [`Event::InputClosed`].
pub fn spawn_stdin_reader(sender: mpsc::Sender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let result = async {
            while let Some(line) = lines.next_line().await.context("reading stdin")? {
                sender
                    .send(Event::Line(line))
                    .await
                    .context("session closed")?;
            }
            sender
                .send(Event::InputClosed)
                .await
                .context("session closed")?;
            Ok::<(), anyhow::Error>(())
        }
        .await;
        log_task_error("stdin reader", result);
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_form_edits() {
        assert_eq!(
            "set email  ana@example.com".parse::<Input>(),
            Ok(edit(FormField::Email, "ana@example.com"))
        );
        assert_eq!(
            "set name Ana María".parse::<Input>(),
            Ok(edit(FormField::Name, "Ana María"))
        );
        assert_eq!("term 90".parse::<Input>(), Ok(edit(FormField::Term, "90")));
        assert_eq!("product".parse::<Input>(), Ok(edit(FormField::Product, "")));
    }

    #[test]
    fn parses_switches_with_default_on() {
        assert_eq!(
            "addon seo".parse::<Input>(),
            Ok(Input::Page(Command::ToggleAddOn {
                id: AddOnId::new("seo"),
                selected: true,
            }))
        );
        assert_eq!(
            "consent off".parse::<Input>(),
            Ok(Input::Page(Command::SetConsent(false)))
        );
        assert_eq!(
            "consent maybe".parse::<Input>(),
            Err(ParseError::InvalidSwitch("maybe".to_string()))
        );
    }

    #[test]
    fn parses_reset_with_and_without_answer() {
        assert_eq!("reset".parse::<Input>(), Ok(Input::Reset(None)));
        assert_eq!("RESET yes".parse::<Input>(), Ok(Input::Reset(Some(true))));
    }

    #[test]
    fn parses_news_and_gallery_queries() {
        assert_eq!(
            "news category Cloud".parse::<Input>(),
            Ok(Input::News(NewsQuery::Category(CategoryFilter::Category(
                "Cloud".to_string()
            ))))
        );
        assert_eq!(
            "gallery filter all".parse::<Input>(),
            Ok(Input::Gallery(GalleryAction::Filter(GalleryFilter::All)))
        );
        assert_eq!(
            "gallery open".parse::<Input>(),
            Err(ParseError::MissingArgument {
                command: "gallery open",
                what: "a project id",
            })
        );
    }

    #[test]
    fn rejects_unknown_input() {
        assert_eq!("   ".parse::<Input>(), Err(ParseError::Empty));
        assert_eq!(
            "dance".parse::<Input>(),
            Err(ParseError::UnknownCommand("dance".to_string()))
        );
        assert!(matches!(
            "blur age".parse::<Input>(),
            Err(ParseError::UnknownField(_))
        ));
    }
}
