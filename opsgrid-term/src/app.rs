//! Event loop of the terminal client.
//!
//! Terminal events become engine calls. Pointer moves and releases go to the
//! engine only while it holds a pointer capture. Anything that awaits
//! (fetches, persistence) runs on a spawned task that wakes the loop when it
//! finishes, so the table stays interactive while a page loads.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::sleep_until;

use opsgrid_lib::TableEngine;
use opsgrid_lib::PointerCapture;
use opsgrid_lib::notify::{Notice, NoticeQueue};
use opsgrid_lib::pagination::PageLink;
use opsgrid_lib::reorder::ItemBounds;

use crate::error::TermError;
use crate::terminal::TerminalGuard;
use crate::view::{self, Frame, HitMap, px_at};

/// Offset of the checkbox inside a chooser line.
const CHECKBOX: std::ops::RangeInclusive<u16> = 4..=6;

pub struct App {
    engine: TableEngine,
    notices: Arc<NoticeQueue>,
    title: String,
    chooser_open: bool,
    hits: HitMap,
    notice: Option<(Notice, Instant)>,
    wakeup: UnboundedSender<()>,
    quit: bool,
}

impl App {
    pub fn new(engine: TableEngine, notices: Arc<NoticeQueue>, title: String) -> (Self, UnboundedReceiver<()>) {
        let (wakeup, rx) = unbounded_channel();
        let app = Self {
            engine,
            notices,
            title,
            chooser_open: false,
            hits: HitMap::default(),
            notice: None,
            wakeup,
            quit: false,
        };
        (app, rx)
    }

    /// Runs an engine operation in the background and redraws when it ends.
    fn spawn<F, Fut>(&self, f: F)
    where
        F: FnOnce(TableEngine) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = f(self.engine.clone());
        let wakeup = self.wakeup.clone();
        tokio::spawn(async move {
            task.await;
            let _ = wakeup.send(());
        });
    }

    fn toggle_sort(&self, key: String) {
        self.spawn(|engine| async move {
            engine.toggle_sort(&key).await;
        });
    }

    fn go_to(&self, link: PageLink) {
        self.spawn(|engine| async move {
            match link {
                PageLink::Prev => {
                    engine.prev_page().await;
                }
                PageLink::Next => {
                    engine.next_page().await;
                }
                PageLink::Page { number, .. } => {
                    engine.go_to_page(number).await;
                }
                PageLink::Ellipsis => {}
            }
        });
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => match self.engine.pointer_capture() {
                Some(PointerCapture::Reorder) => self.engine.cancel_drag(),
                Some(PointerCapture::Resize) => self.spawn(|engine| async move {
                    engine.end_resize().await;
                }),
                None => self.chooser_open = false,
            },
            KeyCode::Char('n') | KeyCode::Right => self.go_to(PageLink::Next),
            KeyCode::Char('p') | KeyCode::Left => self.go_to(PageLink::Prev),
            KeyCode::Char('c') => self.chooser_open = !self.chooser_open,
            KeyCode::Char('r') => self.spawn(|engine| async move {
                engine.reset_layout().await;
            }),
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                if let Some(head) = self.hits.headers.get(index).filter(|h| h.clickable) {
                    self.toggle_sort(head.key.clone());
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(column, row),
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
            _ => {}
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        if let Some(entry) = self.hits.chooser_at(column, row).cloned() {
            let offset = column - self.hits.chooser_x.unwrap_or(0);
            if CHECKBOX.contains(&offset) {
                self.spawn(|engine| async move {
                    engine.toggle_column(&entry.key).await;
                });
            } else if entry.visible {
                self.engine.begin_drag(&entry.key);
            }
            return;
        }
        if self.hits.in_chooser(column) {
            return;
        }

        if let Some(head) = self.hits.header_at(column, row).cloned() {
            let resizing =
                self.engine
                    .begin_resize(&head.key, head.offset_px(column), head.width_px(), px_at(column));
            if !resizing && head.clickable {
                self.toggle_sort(head.key);
            }
            return;
        }

        if let Some(link) = self.hits.link_at(column, row).copied() {
            self.go_to(link);
        }
    }

    fn pointer_move(&mut self, column: u16, row: u16) {
        match self.engine.pointer_capture() {
            Some(PointerCapture::Resize) => {
                self.engine.update_resize(px_at(column));
            }
            Some(PointerCapture::Reorder) => {
                match self.hits.chooser_at(column, row).filter(|e| e.visible) {
                    Some(entry) => {
                        let bounds = ItemBounds::new(f32::from(entry.top), f32::from(entry.rows));
                        self.engine.drag_over(&entry.key, f32::from(row) + 0.5, bounds);
                    }
                    None => self.engine.drag_leave(),
                }
            }
            None => {}
        }
    }

    fn pointer_up(&mut self) {
        match self.engine.pointer_capture() {
            Some(PointerCapture::Resize) => self.spawn(|engine| async move {
                engine.end_resize().await;
            }),
            Some(PointerCapture::Reorder) => self.spawn(|engine| async move {
                engine.finish_drag().await;
            }),
            None => {}
        }
    }

    fn collect_notices(&mut self) {
        if let Some(notice) = self.notices.drain().pop() {
            let until = Instant::now() + notice.duration;
            self.notice = Some((notice, until));
        }
        if self.notice.as_ref().is_some_and(|(_, until)| *until <= Instant::now()) {
            self.notice = None;
        }
    }

    fn render(&mut self, guard: &mut TerminalGuard) -> Result<(), TermError> {
        self.collect_notices();

        let table = self.engine.rendered();
        let pagination = self.engine.pagination();
        let choices = self.chooser_open.then(|| self.engine.column_choices());
        let dragged = self.engine.dragged_column();
        let indicator = self.engine.drop_indicator();
        let resizing = self.engine.resizing_column();

        let frame = Frame {
            title: &self.title,
            table: &table,
            pagination: &pagination,
            total_count: self.engine.total_count(),
            loading: self.engine.is_loading(),
            notice: self.notice.as_ref().map(|(notice, _)| notice),
            chooser: choices.as_deref(),
            dragged: dragged.as_deref(),
            drop_indicator: indicator.as_ref(),
            resizing: resizing.as_deref(),
        };
        let size = guard.size()?;
        self.hits = view::draw(guard.out(), size, &frame)?;
        Ok(())
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.notice.as_ref().map(|(_, until)| *until)
    }
}

/// Sleeps until a deadline, or forever without one.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

/// Runs the client until the user quits.
pub async fn run(engine: TableEngine, notices: Arc<NoticeQueue>, title: String) -> Result<(), TermError> {
    let mut guard = TerminalGuard::new()?;
    let (mut app, mut wakeups) = App::new(engine.clone(), notices, title);
    let mut events = EventStream::new();

    app.spawn(|engine| async move {
        engine.refresh().await;
    });
    app.render(&mut guard)?;

    while !app.quit {
        tokio::select! {
            next = events.next() => match next {
                Some(Ok(event)) => {
                    log::trace!("terminal event: {:?}", event);
                    app.handle_event(event);
                }
                Some(Err(e)) => log::error!("event stream error: {}", e),
                None => break,
            },
            Some(()) = wakeups.recv() => {
                // collapse queued wakeups into one redraw
                while wakeups.try_recv().is_ok() {}
            }
            _ = sleep_until_optional(app.next_deadline()) => {}
            _ = tokio::time::sleep(Duration::from_millis(250)), if engine.is_loading() => {}
        }
        app.render(&mut guard)?;
    }

    engine.teardown();
    log::info!("client closed");
    Ok(())
}
