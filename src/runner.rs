use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::layout::floating::{ResizeEdge, resize_edge_at};
use crate::layout::{Bounds, DockSide, Point, Viewport, extent};
use crate::window::gesture::GestureController;
use crate::window::{TaskbarEntry, WindowRegistry, WindowState};

const CLOSE_GLYPH: &str = "[x]";
const TASKBAR_HEIGHT: u16 = 1;

/// Where a pointer press landed on a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHit {
    Close,
    Header,
    Edge(ResizeEdge),
    Body,
}

/// Classifies `point` against a window occupying `bounds`. The top border
/// row is the header; its corners still resize, and the close glyph sits
/// right-aligned just inside the top-right corner.
pub fn hit_test(bounds: Bounds, closeable: bool, point: Point) -> Option<WindowHit> {
    if !bounds.contains(point) {
        return None;
    }
    if let Some(edge) = resize_edge_at(bounds, point) {
        return Some(WindowHit::Edge(edge));
    }
    if point.y == bounds.y {
        let glyph = CLOSE_GLYPH.len() as i32;
        let close_end = bounds.right() - 1;
        if closeable && point.x >= close_end - glyph && point.x < close_end {
            return Some(WindowHit::Close);
        }
        return Some(WindowHit::Header);
    }
    Some(WindowHit::Body)
}

/// Terminal area available to windows once the taskbar row is reserved.
pub fn viewport_for(width: u16, height: u16) -> Viewport {
    Viewport::new(
        u32::from(width),
        u32::from(height.saturating_sub(TASKBAR_HEIGHT)),
    )
}

fn taskbar_label(entry: &TaskbarEntry) -> String {
    if entry.minimized {
        format!(" ({}) ", entry.title)
    } else {
        format!(" {} ", entry.title)
    }
}

/// Index of the taskbar entry under column `x`.
fn taskbar_hit(entries: &[TaskbarEntry], x: u16) -> Option<usize> {
    let mut start = 0u16;
    for (idx, entry) in entries.iter().enumerate() {
        let width = taskbar_label(entry).chars().count() as u16;
        if x >= start && x < start.saturating_add(width) {
            return Some(idx);
        }
        start = start.saturating_add(width).saturating_add(1);
    }
    None
}

fn to_rect(bounds: Bounds, area: Rect) -> Rect {
    let x = bounds.x.max(0).min(i32::from(u16::MAX)) as u16;
    let y = bounds.y.max(0).min(i32::from(u16::MAX)) as u16;
    let width = bounds.width.min(u32::from(u16::MAX)) as u16;
    let height = bounds.height.min(u32::from(u16::MAX)) as u16;
    Rect::new(x, y, width, height).intersection(area)
}

/// Interactive state of the terminal host: the registry, the pointer
/// gesture in flight, and the quit flag.
#[derive(Debug)]
pub struct LayoutApp<C> {
    registry: WindowRegistry<C>,
    gestures: GestureController,
    quit: bool,
}

impl<C> LayoutApp<C> {
    pub fn new(registry: WindowRegistry<C>) -> Self {
        Self {
            registry,
            gestures: GestureController::new(),
            quit: false,
        }
    }

    pub fn registry(&self) -> &WindowRegistry<C> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WindowRegistry<C> {
        &mut self.registry
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Animation frame: commits the coalesced pointer position, if any.
    pub fn frame_tick(&mut self) -> bool {
        self.gestures.commit_frame(&mut self.registry)
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.registry.resize_viewport(viewport_for(*width, *height));
            }
            _ => {}
        }
        if self.quit {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        }
    }

    fn focused_id(&self) -> Option<String> {
        self.registry.focused().map(|window| window.id.clone())
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.quit = true;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => self.gestures.cancel(),
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Char('R') => self.registry.reset_layout(),
            KeyCode::Char('r') => {
                let minimized: Vec<String> = self
                    .registry
                    .iter()
                    .filter(|window| window.is_minimized)
                    .map(|window| window.id.clone())
                    .collect();
                for id in minimized {
                    self.registry.restore(&id);
                }
            }
            code => {
                let Some(id) = self.focused_id() else {
                    return;
                };
                let Some(caps) = self.registry.get(&id).map(|window| window.capabilities) else {
                    return;
                };
                match code {
                    KeyCode::Char('m') if caps.minimizable => self.registry.minimize(&id),
                    KeyCode::Char('h') => self.dock_and_relax(&id, DockSide::Left),
                    KeyCode::Char('l') => self.dock_and_relax(&id, DockSide::Right),
                    KeyCode::Char('u') => self.dock_and_relax(&id, DockSide::None),
                    KeyCode::Char('x') if caps.closeable => {
                        self.gestures.cancel();
                        self.registry.close(&id);
                    }
                    _ => {}
                }
            }
        }
    }

    fn dock_and_relax(&mut self, id: &str, side: DockSide) {
        self.registry.dock(id, side);
        self.registry.relax();
    }

    /// Raises the bottom-most visible window, which walks focus through
    /// every visible window in turn.
    fn cycle_focus(&mut self) {
        let next = self
            .registry
            .windows_in_paint_order()
            .first()
            .map(|window| window.id.clone());
        if let Some(id) = next {
            self.registry.focus(&id);
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let point = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(mouse.column, point),
            MouseEventKind::Drag(MouseButton::Left) => self.gestures.pointer_move(point),
            MouseEventKind::Up(MouseButton::Left) => {
                if self.gestures.is_active() {
                    self.gestures.pointer_up(&mut self.registry, point);
                }
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, column: u16, point: Point) {
        let viewport = self.registry.viewport();
        if point.y >= extent(viewport.height) {
            let entries = self.registry.taskbar_entries();
            if let Some(entry) = taskbar_hit(&entries, column).and_then(|idx| entries.get(idx)) {
                if entry.focused {
                    self.registry.minimize(&entry.id);
                } else {
                    self.registry.focus(&entry.id);
                }
            }
            return;
        }
        let Some((id, hit)) = self.registry.topmost_at(point).and_then(|window| {
            hit_test(window.bounds(), window.capabilities.closeable, point)
                .map(|hit| (window.id.clone(), hit))
        }) else {
            return;
        };
        match hit {
            WindowHit::Close => {
                self.registry.close(&id);
            }
            WindowHit::Header => {
                self.gestures
                    .pointer_down_header(&mut self.registry, &id, point);
            }
            WindowHit::Edge(edge) => {
                self.gestures
                    .pointer_down_edge(&mut self.registry, &id, edge, point);
            }
            WindowHit::Body => self.registry.focus(&id),
        }
    }
}

impl<C: AsRef<str>> LayoutApp<C> {
    pub fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let desktop = Rect::new(
            area.x,
            area.y,
            area.width,
            area.height.saturating_sub(TASKBAR_HEIGHT),
        );
        for window in self.registry.windows_in_paint_order() {
            render_window(frame, window, desktop);
        }
        if let Some(preview) = self.gestures.dock_preview(&self.registry) {
            let rect = to_rect(preview, desktop);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            frame.render_widget(block, rect);
        }
        self.render_taskbar(frame, area);
    }

    fn render_taskbar(&self, frame: &mut ratatui::Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let row = Rect::new(
            area.x,
            area.y + area.height - TASKBAR_HEIGHT,
            area.width,
            TASKBAR_HEIGHT,
        );
        let mut spans = Vec::new();
        for entry in self.registry.taskbar_entries() {
            let style = if entry.focused {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            };
            spans.push(Span::styled(taskbar_label(&entry), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), row);
    }
}

fn render_window<C: AsRef<str>>(frame: &mut ratatui::Frame, window: &WindowState<C>, area: Rect) {
    let rect = to_rect(window.bounds(), area);
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let header_style = if window.is_focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::styled(format!(" {} ", window.title_or_id()), header_style));
    if window.capabilities.closeable {
        block = block.title(Line::from(CLOSE_GLYPH).right_aligned());
    }
    let body = Paragraph::new(window.content.as_ref())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, rect);
    frame.render_widget(body, rect);
}

/// Drives `app` until it quits.
///
/// Each poll interval is one animation frame: the pending gesture is
/// committed once and the screen is redrawn. Terminal resizes relax the
/// layout into the new viewport.
pub fn run_layout_app<B, D, C>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    app: &mut LayoutApp<C>,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
    C: AsRef<str>,
{
    let size = terminal
        .size()
        .map_err(|e| io::Error::other(e.to_string()))?;
    app.registry_mut()
        .resize_viewport(viewport_for(size.width, size.height));

    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    event_loop.run(|_driver, event| {
        if let Some(evt) = event {
            return Ok(app.handle_event(&evt));
        }
        if app.should_quit() {
            return Ok(ControlFlow::Quit);
        }
        app.frame_tick();
        terminal
            .draw(|frame| app.render(frame))
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(ControlFlow::Continue)
    })
}
