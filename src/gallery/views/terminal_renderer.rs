//! # Terminal Renderer
//!
//! Renders gallery snapshots as plain terminal text. Styling goes through
//! crossterm commands and can be switched off for captured output.

use crate::gallery::commands::HELP_TEXT;
use crate::gallery::models::{ArtItem, FacetKind, FacetOption, PageButton, PageControl};
use crate::gallery::view_models::GallerySnapshot;
use anyhow::Result;
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::Write;

// Helper macro to convert crossterm errors to anyhow errors
macro_rules! queue_term {
    ($($arg:expr),* $(,)?) => {
        queue!($($arg),*).map_err(anyhow::Error::from)
    };
}

/// Trait for rendering views
pub trait ViewRenderer {
    /// Render the whole gallery state
    fn render_full(&mut self, snapshot: &GallerySnapshot) -> Result<()>;

    /// Render the option list of a facet
    fn render_options(&mut self, kind: FacetKind, options: &[FacetOption], selected: &str)
        -> Result<()>;

    /// Render a one-line message, e.g. a rejected command
    fn render_message(&mut self, message: &str) -> Result<()>;

    /// Render the command reference
    fn render_help(&mut self) -> Result<()>;
}

/// Text renderer writing to any output stream
pub struct TerminalRenderer<W: Write> {
    out: W,
    styled: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, styled: true }
    }

    /// Enable or disable ANSI styling
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn colored(&mut self, color: Color, text: &str) -> Result<()> {
        if self.styled {
            queue_term!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor
            )
        } else {
            queue_term!(self.out, Print(text))
        }
    }

    fn bold(&mut self, text: &str) -> Result<()> {
        if self.styled {
            queue_term!(
                self.out,
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset)
            )
        } else {
            queue_term!(self.out, Print(text))
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        queue_term!(self.out, Print(text), Print("\n"))
    }

    fn render_header(&mut self, snapshot: &GallerySnapshot) -> Result<()> {
        self.bold("Virtual Art Gallery")?;
        self.line("")?;
        self.colored(Color::DarkGrey, &snapshot.query.to_string())?;
        self.line("")
    }

    fn render_cards(&mut self, items: &[ArtItem]) -> Result<()> {
        let width = items.len().to_string().len();
        for (index, item) in items.iter().enumerate() {
            self.line(&format!(
                "{:>width$}. {} ({})",
                index + 1,
                item.display_title(),
                item.display_date(),
            ))?;
        }
        Ok(())
    }

    fn button_label(button: &PageButton) -> String {
        match button.control {
            PageControl::First => "«".to_string(),
            PageControl::Previous => "‹".to_string(),
            PageControl::Next => "›".to_string(),
            PageControl::Last => "»".to_string(),
            PageControl::Page(n) if button.active => format!("[{n}]"),
            PageControl::Page(n) => n.to_string(),
        }
    }

    fn render_pagination(&mut self, snapshot: &GallerySnapshot) -> Result<()> {
        let window = snapshot.pagination();
        for (i, button) in window.buttons().iter().enumerate() {
            if i > 0 {
                queue_term!(self.out, Print(" "))?;
            }
            let label = Self::button_label(button);
            if button.disabled {
                self.colored(Color::DarkGrey, &label)?;
            } else if button.active {
                self.colored(Color::Cyan, &label)?;
            } else {
                queue_term!(self.out, Print(label))?;
            }
        }
        self.line(&format!("   (page {} of {})", window.page(), window.total_pages()))
    }

    fn render_detail(&mut self, item: &ArtItem) -> Result<()> {
        self.line("")?;
        self.bold(&format!("── {} ──", item.display_title()))?;
        self.line("")?;
        self.line(&format!("Title: {}", item.display_title()))?;
        self.line(&format!("Artist: {}", item.display_artist()))?;
        self.line(&format!("Date: {}", item.display_date()))?;
        self.line(&format!("Description: {}", item.display_description()))?;
        if let Some(image) = item.image_url() {
            self.line(&format!("Image: {image}"))?;
        }
        if let Some(url) = item.detail_url.as_deref() {
            self.line(&format!("View on Harvard Art Museums: {url}"))?;
        }
        Ok(())
    }
}

impl<W: Write> ViewRenderer for TerminalRenderer<W> {
    fn render_full(&mut self, snapshot: &GallerySnapshot) -> Result<()> {
        self.line("")?;
        self.render_header(snapshot)?;

        if snapshot.search_loading {
            self.colored(Color::Yellow, "Loading...")?;
            self.line("")?;
        } else {
            if let Some(error) = &snapshot.error {
                self.colored(
                    Color::Red,
                    &format!("Search failed ({}): {}", error.kind, error.message),
                )?;
                self.line("")?;
            } else if snapshot.items.is_empty() {
                self.line("No results found.")?;
            } else {
                self.render_cards(&snapshot.items)?;
            }
            self.render_pagination(snapshot)?;
        }

        if let Some(item) = &snapshot.selected_item {
            self.render_detail(item)?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_options(
        &mut self,
        kind: FacetKind,
        options: &[FacetOption],
        selected: &str,
    ) -> Result<()> {
        self.bold(&format!("{} options", kind.label()))?;
        self.line("")?;

        let marker = |active: bool| if active { "*" } else { " " };
        self.line(&format!("{} All", marker(selected.is_empty())))?;
        for option in options {
            self.line(&format!("{} {}", marker(option.name == selected), option.name))?;
        }
        if options.is_empty() {
            self.colored(Color::DarkGrey, "  (no options loaded)")?;
            self.line("")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_message(&mut self, message: &str) -> Result<()> {
        self.colored(Color::Red, message)?;
        self.line("")?;
        self.out.flush()?;
        Ok(())
    }

    fn render_help(&mut self) -> Result<()> {
        self.line(HELP_TEXT)?;
        self.out.flush()?;
        Ok(())
    }
}
