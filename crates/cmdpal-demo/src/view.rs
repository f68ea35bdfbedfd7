#![forbid(unsafe_code)]

//! Draws the host and, on top, the palette overlay.
//!
//! ```text
//!  File  Edit                                   menu bar
//!  [Choose file] [Choose quote] [Undo]          toolbar
//!  text pad ...  ┌──────────────────────┐
//!                │ > query              │       palette header
//!                ├──────────────────────┤
//!                │ ▸ entry     Ctrl+P   │       result rows
//!                └──────────────────────┘
//!  status line
//! ```

use cmdpal_core::geometry::Rect;
use cmdpal_core::text::display_width;
use cmdpal_widgets::command_palette::{CommandPalette, VisibleRow};

use crate::app::{Focus, HostApp};
use crate::canvas::{Canvas, Tone};

/// Rows above the text pad.
const CHROME_TOP: u16 = 2;

/// Render the whole screen.
#[must_use]
pub fn render(app: &HostApp) -> Canvas {
    let size = app.size();
    let mut canvas = Canvas::new(size.width, size.height);
    if size.width == 0 || size.height == 0 {
        return canvas;
    }

    draw_menu_bar(app, &mut canvas);
    draw_toolbar(app, &mut canvas);
    draw_pad(app, &mut canvas);
    draw_status(app, &mut canvas);

    let palette = app.palette();
    if palette.is_visible() {
        draw_palette(palette, &mut canvas);
        if app.focus() == Focus::Palette {
            let area = palette.area();
            let query = u16::try_from(display_width(palette.query())).unwrap_or(u16::MAX);
            canvas.set_cursor(area.x.saturating_add(4).saturating_add(query), area.y + 1);
        }
    }
    canvas
}

fn draw_menu_bar(app: &HostApp, canvas: &mut Canvas) {
    let graph = app.graph();
    let mut x = 1;
    for &id in graph.menu_bar() {
        if let Some(action) = graph.get(id) {
            x = canvas.put_str(x, 0, &action.label, canvas.width(), Tone::Bold) + 2;
        }
    }
}

fn draw_toolbar(app: &HostApp, canvas: &mut Canvas) {
    let graph = app.graph();
    let mut x = 1;
    for toolbar in graph.toolbars() {
        for &id in &toolbar.actions {
            if let Some(action) = graph.get(id) {
                let label = format!("[{}]", action.label);
                x = canvas.put_str(x, 1, &label, canvas.width(), Tone::Dim) + 1;
            }
        }
    }
}

fn draw_pad(app: &HostApp, canvas: &mut Canvas) {
    let pad = app.pad();
    let rows = canvas.height().saturating_sub(CHROME_TOP + 1);
    if rows == 0 {
        return;
    }
    let lines = pad.lines();
    let skip = lines.len().saturating_sub(usize::from(rows));
    let gutter: u16 = if pad.line_numbers() { 6 } else { 1 };

    let mut y = CHROME_TOP;
    for (n, line) in lines.iter().enumerate().skip(skip) {
        if pad.line_numbers() {
            canvas.put_str(0, y, &format!("{:>4} ", n + 1), gutter, Tone::Dim);
        }
        let end = canvas.put_str(gutter, y, line, canvas.width(), Tone::Plain);
        if app.focus() == Focus::Pad && n + 1 == lines.len() {
            canvas.set_cursor(end, y);
        }
        y += 1;
    }
}

fn draw_status(app: &HostApp, canvas: &mut Canvas) {
    let y = canvas.height() - 1;
    canvas.fill(0, y, canvas.width(), Tone::Reverse);
    canvas.put_str(1, y, app.status(), canvas.width().saturating_sub(2), Tone::Reverse);
}

/// Everything is drawn inside `palette.area()`; the closing border is its
/// last row.
fn draw_palette(palette: &CommandPalette, canvas: &mut Canvas) {
    let area = palette.area();
    if area.width < 4 || area.height < 2 {
        return;
    }
    let inner = area.width - 2;
    let last = area.bottom() - 1;

    border(canvas, area, area.y, '┌', '┐');
    for y in area.y + 1..last {
        canvas.fill(area.x, y, area.width, Tone::Plain);
        canvas.put_str(area.x, y, "│", 1, Tone::Plain);
        canvas.put_str(area.right() - 1, y, "│", 1, Tone::Plain);
    }
    border(canvas, area, last, '└', '┘');

    let query_y = area.y + 1;
    if query_y < last {
        canvas.put_str(area.x + 2, query_y, ">", 1, Tone::Bold);
        canvas.put_str(area.x + 4, query_y, palette.query(), inner.saturating_sub(3), Tone::Plain);
    }

    let divider_y = area.y + 2;
    if divider_y >= last {
        return;
    }
    if !palette.is_list_visible() {
        canvas.put_str(area.x + 4, divider_y, "No matches", inner.saturating_sub(3), Tone::Dim);
        return;
    }
    border(canvas, area, divider_y, '├', '┤');

    let mut y = area.y + 3;
    for row in palette.visible_rows() {
        if y >= last {
            break;
        }
        draw_row(canvas, area, y, &row);
        y += 1;
    }
}

fn draw_row(canvas: &mut Canvas, area: Rect, y: u16, row: &VisibleRow<'_>) {
    let tone = if row.selected { Tone::Reverse } else { Tone::Plain };
    canvas.fill(area.x, y, area.width, Tone::Plain);
    canvas.put_str(area.x, y, "│", 1, Tone::Plain);
    canvas.put_str(area.right() - 1, y, "│", 1, Tone::Plain);

    let inner = area.width - 2;
    canvas.fill(area.x + 1, y, inner, tone);
    let icon = row
        .entry
        .icon
        .as_ref()
        .map_or(" ", |icon| icon_glyph(icon.name()));
    canvas.put_str(area.x + 2, y, icon, 1, tone);

    let shortcut = row.entry.shortcut.as_deref().unwrap_or("");
    let shortcut_width = u16::try_from(display_width(shortcut)).unwrap_or(inner);
    let text_width = inner.saturating_sub(4).saturating_sub(shortcut_width);
    canvas.put_str(area.x + 4, y, &row.entry.text, text_width, tone);
    if !shortcut.is_empty() && shortcut_width + 5 < inner {
        canvas.put_str(area.right() - 2 - shortcut_width, y, shortcut, shortcut_width, tone);
    }
}

fn border(canvas: &mut Canvas, area: Rect, y: u16, left: char, right: char) {
    let line: String = std::iter::once(left)
        .chain(std::iter::repeat_n('─', usize::from(area.width.saturating_sub(2))))
        .chain(std::iter::once(right))
        .collect();
    canvas.put_str(area.x, y, &line, area.width, Tone::Plain);
}

fn icon_glyph(name: &str) -> &'static str {
    match name {
        "folder" => "▸",
        "file" => "·",
        "terminal" => "$",
        "quote" => "\"",
        _ => "•",
    }
}
