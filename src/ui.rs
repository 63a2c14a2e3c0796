use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::host::{DisplaySink, InfoSink, RoundNotifier};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const BUTTON_WIDTH: u16 = 20;

/// How long the button stays "pressed" after a tap
pub const BOUNCE_TIME: Duration = Duration::from_millis(300);
/// How long the game-over toast stays on screen
pub const TOAST_TIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub shown_for: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AboutDialog {
    pub title: String,
    pub body: String,
}

/// Terminal rendition of the game screen.
///
/// Holds only what the session pushed to it plus short-lived cosmetic state.
#[derive(Debug, Default)]
pub struct TuiView {
    score: String,
    time_left: String,
    bounce_left: Duration,
    toast: Option<Toast>,
    about: Option<AboutDialog>,
}

impl TuiView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn time_left(&self) -> &str {
        &self.time_left
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn about(&self) -> Option<&AboutDialog> {
        self.about.as_ref()
    }

    pub fn is_bouncing(&self) -> bool {
        !self.bounce_left.is_zero()
    }

    /// Close the about dialog. Returns true if one was open.
    pub fn dismiss_about(&mut self) -> bool {
        self.about.take().is_some()
    }

    /// Age the animations by wall time, whatever woke the event loop
    pub fn age(&mut self, elapsed: Duration) {
        self.bounce_left = self.bounce_left.saturating_sub(elapsed);

        if let Some(toast) = &mut self.toast {
            toast.shown_for = toast.shown_for.saturating_add(elapsed);
            if toast.shown_for >= TOAST_TIME {
                self.toast = None;
            }
        }
    }
}

impl DisplaySink for TuiView {
    fn show_score(&mut self, text: &str) {
        self.score = text.to_string();
    }

    fn show_time_left(&mut self, text: &str) {
        self.time_left = text.to_string();
    }

    fn bounce(&mut self) {
        self.bounce_left = BOUNCE_TIME;
    }
}

impl RoundNotifier for TuiView {
    fn notify_game_over(&mut self, _final_score: u32, message: &str) {
        self.toast = Some(Toast {
            text: message.to_string(),
            shown_for: Duration::ZERO,
        });
    }
}

impl InfoSink for TuiView {
    fn show_info(&mut self, title: &str, body: &str) {
        self.about = Some(AboutDialog {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for &TuiView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // score
                Constraint::Length(1), // time left
                Constraint::Min(3),    // button
                Constraint::Length(1), // toast
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(self.score.as_str(), bold_style))
            .alignment(Alignment::Left)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            self.time_left.as_str(),
            Style::default().patch(bold_style).fg(Color::Cyan),
        ))
        .alignment(Alignment::Left)
        .render(chunks[1], buf);

        let (button_style, border_type) = if self.is_bouncing() {
            (
                Style::default()
                    .patch(bold_style)
                    .fg(Color::Black)
                    .bg(Color::Yellow),
                BorderType::Thick,
            )
        } else {
            (Style::default().patch(bold_style).fg(Color::Yellow), BorderType::Rounded)
        };
        let button_area = centered(chunks[2], BUTTON_WIDTH, 3);
        Paragraph::new(Line::from("TAP ME"))
            .alignment(Alignment::Center)
            .style(button_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type),
            )
            .render(button_area, buf);

        if let Some(toast) = &self.toast {
            Paragraph::new(Span::styled(
                toast.text.as_str(),
                Style::default().patch(bold_style).fg(Color::Magenta),
            ))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled("(space) tap / (i)nfo / (esc)ape", italic_style))
            .render(chunks[4], buf);

        if let Some(about) = &self.about {
            let popup = centered(area, area.width.saturating_sub(10).min(60), 8);
            Clear.render(popup, buf);
            Paragraph::new(about.body.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(Span::styled(about.title.as_str(), bold_style)),
                )
                .render(popup, buf);
        }
    }
}
