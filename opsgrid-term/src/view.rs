//! Drawing the table and recording where things landed.
//!
//! The engine measures columns in pixels; the terminal draws one character
//! per [`CELL_PX`] pixels. [`HitMap`] maps mouse cells back to header
//! columns, chooser items and pagination links for the event loop.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use opsgrid_lib::engine::ColumnChoice;
use opsgrid_lib::notify::{Notice, NoticeLevel};
use opsgrid_lib::pagination::{PageLink, PageWindow};
use opsgrid_lib::reorder::DropTarget;
use opsgrid_lib::render::RenderedTable;

/// Pixels per terminal column.
pub const CELL_PX: u32 = 8;

/// Width of the column chooser panel in terminal columns.
const CHOOSER_WIDTH: u16 = 34;

/// Terminal rows taken by each visible entry of the chooser: upper half
/// drops before the entry, lower half after it.
pub const CHOOSER_ITEM_ROWS: u16 = 2;

/// Terminal columns for a pixel width.
pub fn cells(px: u32) -> u16 {
    u16::try_from((px / CELL_PX).max(1)).unwrap_or(u16::MAX)
}

/// Pixel position of the middle of a terminal column.
pub fn px_at(column: u16) -> f32 {
    (u32::from(column) * CELL_PX + CELL_PX / 2) as f32
}

/// Pads or truncates text to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::with_capacity(width);
    let mut used = 0;
    if text.width() <= width {
        out.push_str(text);
        used = text.width();
    } else {
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// A rendered header cell on screen.
#[derive(Debug, Clone)]
pub struct HeaderHit {
    pub key: String,
    pub x: u16,
    pub cells: u16,
    pub clickable: bool,
}

impl HeaderHit {
    pub fn contains(&self, column: u16) -> bool {
        column >= self.x && column < self.x + self.cells
    }

    /// Pixel offset of a terminal column inside this header.
    pub fn offset_px(&self, column: u16) -> f32 {
        px_at(column.saturating_sub(self.x))
    }

    /// Rendered width in pixels.
    pub fn width_px(&self) -> f32 {
        (u32::from(self.cells) * CELL_PX) as f32
    }
}

/// A chooser entry on screen.
#[derive(Debug, Clone)]
pub struct ChooserHit {
    pub key: String,
    pub top: u16,
    pub rows: u16,
    pub visible: bool,
}

impl ChooserHit {
    pub fn contains(&self, row: u16) -> bool {
        row >= self.top && row < self.top + self.rows
    }
}

/// A pagination link on screen.
#[derive(Debug, Clone)]
pub struct LinkHit {
    pub link: PageLink,
    pub x: u16,
    pub width: u16,
}

/// Screen regions of the last frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub header_y: u16,
    pub headers: Vec<HeaderHit>,
    pub chooser_x: Option<u16>,
    pub chooser: Vec<ChooserHit>,
    pub pages_y: u16,
    pub page_links: Vec<LinkHit>,
}

impl HitMap {
    pub fn header_at(&self, column: u16, row: u16) -> Option<&HeaderHit> {
        if row != self.header_y {
            return None;
        }
        self.headers.iter().find(|h| h.contains(column))
    }

    pub fn chooser_at(&self, column: u16, row: u16) -> Option<&ChooserHit> {
        let x = self.chooser_x?;
        if column < x {
            return None;
        }
        self.chooser.iter().find(|c| c.contains(row))
    }

    pub fn in_chooser(&self, column: u16) -> bool {
        self.chooser_x.is_some_and(|x| column >= x)
    }

    pub fn link_at(&self, column: u16, row: u16) -> Option<&PageLink> {
        if row != self.pages_y {
            return None;
        }
        self.page_links
            .iter()
            .find(|l| column >= l.x && column < l.x + l.width)
            .map(|l| &l.link)
    }
}

/// Everything one frame shows.
pub struct Frame<'a> {
    pub title: &'a str,
    pub table: &'a RenderedTable,
    pub pagination: &'a PageWindow,
    pub total_count: u64,
    pub loading: bool,
    pub notice: Option<&'a Notice>,
    pub chooser: Option<&'a [ColumnChoice]>,
    pub dragged: Option<&'a str>,
    pub drop_indicator: Option<&'a DropTarget>,
    pub resizing: Option<&'a str>,
}

const HELP: &str = "q quit  n/p page  c columns  r reset  1-9 sort  esc cancel";

/// Draws a frame and returns where its interactive parts landed.
pub fn draw(out: &mut impl Write, (width, height): (u16, u16), frame: &Frame<'_>) -> io::Result<HitMap> {
    let mut hits = HitMap::default();
    queue!(out, Clear(ClearType::All))?;
    if height < 6 || width < 20 {
        queue!(out, MoveTo(0, 0), Print("terminal too small"))?;
        out.flush()?;
        return Ok(hits);
    }

    let table_width = match frame.chooser {
        Some(_) => width.saturating_sub(CHOOSER_WIDTH),
        None => width,
    };

    // title
    let title = format!("{} | {} orders", frame.title, frame.total_count);
    queue!(
        out,
        MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print(fit(&title, width as usize)),
        SetAttribute(Attribute::Reset)
    )?;

    // header
    hits.header_y = 1;
    let mut x = 0u16;
    queue!(out, MoveTo(0, 1), SetAttribute(Attribute::Reverse))?;
    for head in &frame.table.header {
        if x >= table_width {
            break;
        }
        let cells = cells(head.width).min(table_width - x);
        let glyph = head.indicator.glyph();
        let label = if glyph.is_empty() {
            head.label.clone()
        } else {
            format!("{} {}", head.label, glyph)
        };
        let resizing = frame.resizing == Some(head.key.as_str());
        if resizing {
            queue!(out, SetForegroundColor(Color::Yellow))?;
        }
        let text = fit(&label, usize::from(cells.saturating_sub(1)));
        queue!(out, Print(text), Print(if resizing { "┃" } else { "│" }))?;
        if resizing {
            queue!(out, SetForegroundColor(Color::Reset))?;
        }
        hits.headers.push(HeaderHit {
            key: head.key.clone(),
            x,
            cells,
            clickable: head.is_clickable(),
        });
        x += cells;
    }
    queue!(out, Print(" ".repeat(usize::from(table_width.saturating_sub(x)))))?;
    queue!(out, SetAttribute(Attribute::Reset))?;

    // body
    let body_rows = height.saturating_sub(5);
    for (i, row) in frame.table.rows.iter().take(usize::from(body_rows)).enumerate() {
        let y = 2 + i as u16;
        queue!(out, MoveTo(0, y))?;
        if frame.loading {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
        }
        for (cell, hit) in row.cells.iter().zip(&hits.headers) {
            let text = fit(&cell.text, usize::from(hit.cells.saturating_sub(1)));
            queue!(out, Print(text), Print(" "))?;
        }
        queue!(out, ResetColor)?;
    }
    if frame.table.rows.is_empty() {
        let message = if frame.loading { "loading…" } else { "no rows" };
        queue!(out, MoveTo(1, 3), Print(message))?;
    }

    // pagination
    hits.pages_y = height - 3;
    let mut x = 0u16;
    queue!(out, MoveTo(0, hits.pages_y))?;
    for link in frame.pagination.links() {
        let label = match &link {
            PageLink::Prev => "‹ prev".to_string(),
            PageLink::Next => "next ›".to_string(),
            PageLink::Ellipsis => "…".to_string(),
            PageLink::Page { number, .. } => number.to_string(),
        };
        let current = matches!(link, PageLink::Page { current: true, .. });
        let text = format!(" {} ", label);
        let w = text.width() as u16;
        if x + w > table_width {
            break;
        }
        if current {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, Print(&text), SetAttribute(Attribute::Reset))?;
        if !matches!(link, PageLink::Ellipsis) && !current {
            hits.page_links.push(LinkHit { link, x, width: w });
        }
        x += w;
    }

    // status
    queue!(out, MoveTo(0, height - 2))?;
    if let Some(notice) = frame.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        queue!(
            out,
            SetForegroundColor(color),
            Print(fit(&notice.message, width as usize)),
            ResetColor
        )?;
    } else if frame.loading {
        queue!(out, Print("loading…"))?;
    }

    queue!(
        out,
        MoveTo(0, height - 1),
        SetForegroundColor(Color::DarkGrey),
        Print(fit(HELP, width as usize)),
        ResetColor
    )?;

    if let Some(choices) = frame.chooser {
        draw_chooser(out, table_width, height - 3, choices, frame, &mut hits)?;
    }

    out.flush()?;
    Ok(hits)
}

fn draw_chooser(
    out: &mut impl Write,
    x: u16,
    bottom: u16,
    choices: &[ColumnChoice],
    frame: &Frame<'_>,
    hits: &mut HitMap,
) -> io::Result<()> {
    let inner = usize::from(CHOOSER_WIDTH - 2);
    hits.chooser_x = Some(x);

    let line = |out: &mut dyn Write, y: u16, text: &str| -> io::Result<()> {
        let mut out = out;
        queue!(&mut out, MoveTo(x, y), Print("│ "), Print(fit(text, inner)))
    };

    line(out, 1, "Columns (drag to reorder)")?;
    line(out, 2, "")?;
    let mut y = 3u16;

    // visible entries in display order, as drag targets
    for key in frame.table.header.iter().map(|h| h.key.as_str()) {
        let Some(choice) = choices.iter().find(|c| c.key == key) else {
            continue;
        };
        if y + CHOOSER_ITEM_ROWS > bottom {
            break;
        }
        if frame.dragged == Some(key) {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        line(out, y, &format!("≡ [x] {}", choice.display_name))?;
        queue!(out, SetAttribute(Attribute::Reset))?;
        line(out, y + 1, "")?;

        if let Some(target) = frame.drop_indicator.filter(|t| t.key == key) {
            let rule_y = if target.insert_after { y + 1 } else { y - 1 };
            queue!(
                out,
                MoveTo(x + 2, rule_y),
                SetForegroundColor(Color::Cyan),
                Print("━".repeat(inner)),
                ResetColor
            )?;
        }

        hits.chooser.push(ChooserHit {
            key: key.to_string(),
            top: y,
            rows: CHOOSER_ITEM_ROWS,
            visible: true,
        });
        y += CHOOSER_ITEM_ROWS;
    }

    let mut category: Option<&str> = None;
    for choice in choices.iter().filter(|c| !c.visible) {
        if y >= bottom {
            break;
        }
        if choice.category.as_deref() != category {
            category = choice.category.as_deref();
            if let Some(name) = category {
                line(out, y, &format!("{}:", name))?;
                y += 1;
                if y >= bottom {
                    break;
                }
            }
        }
        line(out, y, &format!("  [ ] {}", choice.display_name))?;
        hits.chooser.push(ChooserHit {
            key: choice.key.clone(),
            top: y,
            rows: 1,
            visible: false,
        });
        y += 1;
    }

    while y < bottom {
        line(out, y, "")?;
        y += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("anything", 0), "");
        assert_eq!(fit("日本語", 4), "日… ");
    }

    #[test]
    fn test_header_hit_geometry() {
        let hit = HeaderHit {
            key: "amount".to_string(),
            x: 10,
            cells: 12,
            clickable: true,
        };
        assert!(hit.contains(21));
        assert!(!hit.contains(22));
        assert_eq!(hit.width_px(), 96.0);
        // last cell of the header falls in a 6px grab zone
        assert!(hit.width_px() - hit.offset_px(21) <= 6.0);
        assert!(hit.width_px() - hit.offset_px(20) > 6.0);
    }
}
