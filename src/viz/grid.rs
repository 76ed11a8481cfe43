use ratatui::{prelude::*, widgets::*};

use crate::render::Snapshot;

fn glyph_style(glyph: char) -> Style {
    match glyph {
        'M' => Style::default().yellow().bold(),
        'C' => Style::default().red().bold(),
        'X' => Style::default().white().on_red().bold(),
        '*' => Style::default().light_green().bold(),
        '#' => Style::default().dark_gray().on_dark_gray(),
        '.' => Style::default().dark_gray(),
        _ => Style::default().white(),
    }
}

/// Draws a [`Snapshot`] inside a rounded border
pub struct GridView<'a> {
    snapshot: &'a Snapshot,
    title: String,
}

impl<'a> GridView<'a> {
    pub fn new(snapshot: &'a Snapshot, title: impl Into<String>) -> Self {
        Self {
            snapshot,
            title: title.into(),
        }
    }

    /// Width and height the grid needs, border included
    pub fn extent(&self) -> (u16, u16) {
        let text = self.snapshot.to_string();
        let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let height = text.lines().count();
        (width as u16 + 2, height as u16 + 2)
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.snapshot.to_string();
        let lines = text
            .lines()
            .map(|line| {
                Line::from(
                    line.chars()
                        .map(|c| Span::styled(c.to_string(), glyph_style(c)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(self.title),
            )
            .render(area, buf);
    }
}
