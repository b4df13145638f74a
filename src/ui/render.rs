use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::config::{CELL_W, play_size};
use crate::game::{Phase, Snapshot};

/// Everything the renderer needs for one frame.
pub struct View<'a> {
    pub snapshot: &'a Snapshot,
    pub ghost: Option<(i32, i32)>,
    pub best: u64,
}

pub fn draw_game(frame: &mut Frame, view: &View) {
    let area = frame.size();
    let arena_w = view.snapshot.arena.first().map_or(0, Vec::len);
    let arena_h = view.snapshot.arena.len();
    let (play_w, play_h) = play_size(arena_w, arena_h);
    let min_width = play_w as u16 + 2;

    if area.width < min_width {
        let msg = Paragraph::new(format!("RESIZE PANE\nmin width: {min_width}"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("BLOCKFALL"));
        frame.render_widget(msg, area);
        return;
    }

    // Outer "cabinet" frame.
    let cabinet = Block::default()
        .title("BLOCKFALL")
        .border_type(BorderType::Thick)
        .borders(Borders::ALL)
        .title_alignment(Alignment::Left);
    let cabinet_inner = cabinet.inner(area);
    frame.render_widget(cabinet, area);

    let col_rect = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(play_w as u16),
            Constraint::Min(0),
        ])
        .split(cabinet_inner)[1];

    let stack = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(play_h as u16),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(col_rect);

    draw_info(frame, view, stack[1]);
    draw_playfield(frame, view, stack[2]);
    draw_controls(frame, stack[3]);
}

/// Display colour for an arena colour index.
pub fn cell_color(index: u8) -> Color {
    match index {
        1 => Color::Rgb(0xFF, 0x0D, 0x72),
        2 => Color::Rgb(0x0D, 0xC2, 0xFF),
        3 => Color::Rgb(0x0D, 0xFF, 0x72),
        4 => Color::Rgb(0xF5, 0x38, 0xFF),
        5 => Color::Rgb(0xFF, 0x8E, 0x0D),
        6 => Color::Rgb(0xFF, 0xE1, 0x38),
        7 => Color::Rgb(0x38, 0x77, 0xFF),
        _ => Color::Reset,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Empty,
    Ghost,
    Block(u8),
}

fn draw_playfield(frame: &mut Frame, view: &View, play_rect: Rect) {
    let snap = view.snapshot;
    let mut grid: Vec<Vec<Glyph>> = snap
        .arena
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v == 0 { Glyph::Empty } else { Glyph::Block(v) })
                .collect()
        })
        .collect();

    // Ghost first so the live piece paints over it.
    let mut paint = |x: i32, y: i32, glyph: Glyph| {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(cell) = grid.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
            if glyph != Glyph::Ghost || *cell == Glyph::Empty {
                *cell = glyph;
            }
        }
    };
    if snap.phase == Phase::Playing {
        for (dy, row) in snap.piece.iter().enumerate() {
            for (dx, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                if let Some((gx, gy)) = view.ghost {
                    paint(gx + dx as i32, gy + dy as i32, Glyph::Ghost);
                }
                paint(snap.piece_x + dx as i32, snap.piece_y + dy as i32, Glyph::Block(v));
            }
        }
    }

    let width = grid.first().map_or(0, Vec::len);
    let wall = Style::default().fg(Color::Gray);
    let mut lines: Vec<Line> = Vec::with_capacity(grid.len() + 2);
    lines.push(Line::styled(format!("┌{}┐", "─".repeat(width * CELL_W)), wall));
    for row in &grid {
        let mut spans = Vec::with_capacity(row.len() + 2);
        spans.push(Span::styled("│", wall));
        for glyph in row {
            spans.push(match *glyph {
                Glyph::Empty => Span::raw(" ".repeat(CELL_W)),
                Glyph::Ghost => {
                    Span::styled("·".repeat(CELL_W), Style::default().fg(Color::DarkGray))
                }
                Glyph::Block(v) => {
                    Span::styled("█".repeat(CELL_W), Style::default().fg(cell_color(v)))
                }
            });
        }
        spans.push(Span::styled("│", wall));
        lines.push(Line::from(spans));
    }
    lines.push(Line::styled(format!("└{}┘", "═".repeat(width * CELL_W)), wall));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(paragraph, play_rect);

    if snap.phase == Phase::GameOver {
        let overlay_w = play_rect.width.saturating_sub(4).max(8);
        let overlay_h = 5u16;
        // Short panes squeeze the play rect, so keep the popup on screen.
        let popup = Rect {
            x: play_rect.x + (play_rect.width.saturating_sub(overlay_w)) / 2,
            y: play_rect.y + (play_rect.height.saturating_sub(overlay_h)) / 2,
            width: overlay_w,
            height: overlay_h,
        }
        .intersection(frame.size());
        if popup.area() == 0 {
            return;
        }
        let overlay = Paragraph::new("GAME OVER\nr restart\nq quit")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(Clear, popup);
        frame.render_widget(overlay, popup);
    }
}

fn draw_info(frame: &mut Frame, view: &View, area: Rect) {
    let status = match view.snapshot.phase {
        Phase::Playing => "PLAY",
        Phase::GameOver => "OVER",
    };

    let block = Block::default().title("INFO").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw(format!("{:<7} {}", "SCORE:", view.snapshot.score)),
        Line::raw(format!("{:<7} {}", "LINES:", view.snapshot.lines)),
        Line::raw(format!("{:<7} {}", "STATUS:", status)),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![Line::raw(format!("{:<5} {}", "BEST:", view.best))])
        .alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let block = Block::default().title("CONTROLS").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let left = Paragraph::new(vec![
        Line::raw("←/→ move"),
        Line::raw("↓ soft"),
        Line::raw("q/esc quit"),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(left, cols[0]);

    let right = Paragraph::new(vec![
        Line::raw("↑/x z/m rot"),
        Line::raw("space slam"),
        Line::raw("r restart"),
    ])
    .alignment(Alignment::Left);
    frame.render_widget(right, cols[1]);
}
