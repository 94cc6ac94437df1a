//! # Gallery Application Controller
//!
//! Orchestrates the gallery components and runs the event loop.
//! It connects typed commands to the gallery controller and re-renders
//! whenever the published state changes.

use crate::gallery::{
    commands::GalleryCommand,
    controllers::GalleryController,
    events::{EventBus, SimpleEventBus},
    io::{LineSource, StdinLineSource},
    models::{FacetKind, PageControl},
    services::HttpCatalogClient,
    views::{TerminalRenderer, ViewRenderer},
};
use crate::{cmd_args::CommandLineArgs, config};
use anyhow::Result;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The main application controller
pub struct AppController<LS: LineSource, W: Write> {
    gallery: GalleryController,
    view_renderer: TerminalRenderer<W>,
    line_source: LS,
    // Set by the event bus when a published change alters the gallery view
    redraw: Arc<AtomicBool>,
    should_quit: bool,
}

impl AppController<StdinLineSource, io::Stdout> {
    /// Create the application from command line arguments, reading stdin and writing stdout
    pub fn new(cmd_args: &CommandLineArgs) -> Result<Self> {
        let profile = config::load_profile(cmd_args.profile(), &config::get_profile_path())?;
        let client = HttpCatalogClient::new(&profile)?;

        let gallery = GalleryController::new(Arc::new(client))
            .with_facet_refresh(profile.facet_refresh())
            .with_query(cmd_args.initial_query().clone());

        let styled = io::stdout().is_terminal();
        let view_renderer = TerminalRenderer::new(io::stdout()).with_styling(styled);

        Ok(Self::with_io_streams(
            gallery,
            StdinLineSource::new(),
            view_renderer,
        ))
    }
}

impl<LS: LineSource, W: Write> AppController<LS, W> {
    /// Create an application controller with injected I/O streams.
    /// Installs the event bus the redraw decisions are driven by.
    pub fn with_io_streams(
        mut gallery: GalleryController,
        line_source: LS,
        view_renderer: TerminalRenderer<W>,
    ) -> Self {
        let redraw = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&redraw);
        let mut event_bus = SimpleEventBus::new();
        event_bus.subscribe_to_model_events(Box::new(move |event| {
            if event.requires_redraw() {
                flag.store(true, Ordering::SeqCst);
            }
        }));
        gallery.set_event_bus(Box::new(event_bus));

        Self {
            gallery,
            view_renderer,
            line_source,
            redraw,
            should_quit: false,
        }
    }

    pub fn gallery(&self) -> &GalleryController {
        &self.gallery
    }

    pub fn view_renderer(&self) -> &TerminalRenderer<W> {
        &self.view_renderer
    }

    /// Fetch the first page, print it and return
    pub async fn run_once(&mut self) -> Result<()> {
        self.gallery.start();
        self.gallery.settle().await;
        self.redraw.store(false, Ordering::SeqCst);
        self.view_renderer.render_full(&self.gallery.snapshot())
    }

    /// Run the main application loop until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.gallery.start();
        self.process_events()?;

        while !self.should_quit {
            let loading = self.gallery.is_loading();
            tokio::select! {
                line = self.line_source.next_line() => {
                    match line? {
                        Some(line) => self.handle_line(&line)?,
                        None => {
                            tracing::debug!("Input closed, finishing outstanding requests");
                            self.gallery.settle().await;
                            self.process_events()?;
                            break;
                        }
                    }
                }
                applied = self.gallery.next_response(), if loading => {
                    if applied {
                        self.process_events()?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Re-render when any event since the last call changed what is shown
    fn process_events(&mut self) -> Result<()> {
        if self.redraw.swap(false, Ordering::SeqCst) {
            self.view_renderer.render_full(&self.gallery.snapshot())?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        tracing::debug!("Command line: {:?}", line);

        match line.parse::<GalleryCommand>() {
            Ok(command) => self.apply_command(command)?,
            Err(e) => self.view_renderer.render_message(&e.to_string())?,
        }
        self.process_events()
    }

    /// Apply a parsed command to the gallery
    fn apply_command(&mut self, command: GalleryCommand) -> Result<()> {
        match command {
            GalleryCommand::Search(text) => self.gallery.set_search_text(text),
            GalleryCommand::Filter { kind, value } => match self.resolve_filter_value(kind, &value)
            {
                Some(value) => self.gallery.set_filter(kind, value),
                None => self
                    .view_renderer
                    .render_message(&format!("'{value}' is not a known {kind}"))?,
            },
            GalleryCommand::Navigate(control) => {
                // Typed page numbers may jump outside the visible window
                let outcome = match control {
                    PageControl::Page(page) => self.gallery.set_page(page),
                    control => self.gallery.navigate(control),
                };
                if let Err(e) = outcome {
                    self.view_renderer.render_message(&e.to_string())?;
                }
            }
            GalleryCommand::Show(index) => {
                if let Err(e) = self.gallery.select_index(index - 1) {
                    self.view_renderer.render_message(&e.to_string())?;
                }
            }
            GalleryCommand::Close => self.gallery.select_item(None),
            GalleryCommand::Options(kind) => {
                let options = Arc::clone(self.gallery.filter_options().get(kind));
                let selected = self.gallery.query().filters().get(kind).to_string();
                self.view_renderer
                    .render_options(kind, &options, &selected)?;
            }
            GalleryCommand::Refresh => self.gallery.refresh_facets(),
            GalleryCommand::Help => self.view_renderer.render_help()?,
            GalleryCommand::Quit => self.should_quit = true,
        }
        Ok(())
    }

    /// Match a typed value against the loaded options, case-insensitively.
    /// Any value is accepted while the option list is empty.
    fn resolve_filter_value(&self, kind: FacetKind, value: &str) -> Option<String> {
        let options = self.gallery.filter_options().get(kind);
        if value.is_empty() || options.is_empty() {
            return Some(value.to_string());
        }
        options
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(value))
            .map(|option| option.name.clone())
    }
}
