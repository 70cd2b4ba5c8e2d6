use crate::application::state::TransportView;
use crate::core::events::UiEvent;
use crate::core::models::{SeekState, SurfaceHandle};
use crate::core::traits::UiRenderer;
use crate::utils::APP_NAME;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MediaKeyCode, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::cell::Cell;
use std::io::{Stdout, stdout};
use std::time::Duration;

/// Terminal control surface: title and status on top, transport row below.
///
/// The slider is driven by the mouse (press, drag, release) or by the
/// arrow keys, which emit the same gesture sequence one step at a time.
pub struct TuiRenderer {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    surface: SurfaceHandle,
    seek_step_seconds: f64,

    // Last view drawn, kept for resize redraws and keyboard steps
    view: TransportView,
    slider_area: Cell<Rect>,
    dragging: bool,
}

impl TuiRenderer {
    pub fn new(seek_step_seconds: f64) -> Self {
        Self {
            terminal: None,
            surface: SurfaceHandle::new(APP_NAME),
            seek_step_seconds,
            view: TransportView::unbound(),
            slider_area: Cell::new(Rect::default()),
            dragging: false,
        }
    }

    fn draw_ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Surface
                Constraint::Length(3), // Transport row
                Constraint::Length(1), // Key help
            ])
            .split(f.area());

        self.draw_surface(f, chunks[0]);
        self.draw_transport(f, chunks[1]);
        self.draw_help(f, chunks[2]);
    }

    fn draw_surface(&self, f: &mut Frame, area: Rect) {
        let status_color = match self.view.seek_state {
            SeekState::Idle if self.view.paused => Color::Yellow,
            SeekState::Idle => Color::Green,
            SeekState::Seeking | SeekState::Settling => Color::Cyan,
        };

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.view.title.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.view.status_message.as_str(),
                Style::default().fg(status_color),
            )),
        ];

        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", APP_NAME)),
            );
        f.render_widget(paragraph, area);
    }

    fn draw_transport(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(3),  // Play/pause
                Constraint::Length(10), // Elapsed
                Constraint::Min(1),     // Slider
                Constraint::Length(10), // Duration
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new(self.view.glyph())
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            columns[0],
        );
        f.render_widget(
            Paragraph::new(self.view.elapsed_label()).alignment(Alignment::Center),
            columns[1],
        );

        let slider = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .use_unicode(true)
            .label("")
            .ratio(gauge_ratio(self.view.position));
        f.render_widget(slider, columns[2]);
        self.slider_area.set(columns[2]);

        f.render_widget(
            Paragraph::new(self.view.duration_label()).alignment(Alignment::Center),
            columns[3],
        );
    }

    fn draw_help(&self, f: &mut Frame, area: Rect) {
        let help = Paragraph::new(Line::from(vec![
            Span::raw("Space: Play/Pause • "),
            Span::raw("Enter: Play • "),
            Span::raw("s: Pause • "),
            Span::raw("←/→: Seek • "),
            Span::raw("Drag slider: Scrub • "),
            Span::raw("q: Quit"),
        ]))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
        f.render_widget(help, area);
    }

    fn translate_key(&mut self, key: KeyEvent, events: &mut Vec<UiEvent>) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => events.push(UiEvent::QuitRequested),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                events.push(UiEvent::QuitRequested);
            }
            KeyCode::Char(' ')
            | KeyCode::Char('p')
            | KeyCode::Char('k')
            | KeyCode::Media(MediaKeyCode::PlayPause) => {
                events.push(UiEvent::TogglePlayPauseRequested);
            }
            KeyCode::Enter | KeyCode::Media(MediaKeyCode::Play) => {
                events.push(UiEvent::PlayRequested);
            }
            KeyCode::Char('s') | KeyCode::Media(MediaKeyCode::Pause) => {
                events.push(UiEvent::PauseRequested);
            }
            KeyCode::Left | KeyCode::Char('h') => self.step_seek(-self.seek_step_seconds, events),
            KeyCode::Right | KeyCode::Char('l') => self.step_seek(self.seek_step_seconds, events),
            _ => {}
        }
    }

    /// A keyboard seek is a complete one-step drag gesture
    fn step_seek(&self, delta_seconds: f64, events: &mut Vec<UiEvent>) {
        // Mid-drag or no duration: there is nothing to step against
        if self.dragging || self.view.duration_seconds <= 0.0 {
            return;
        }

        let target = self.view.position + delta_seconds / self.view.duration_seconds;
        events.push(UiEvent::DragStarted);
        events.push(UiEvent::DragMoved {
            value: target.clamp(0.0, 1.0),
        });
        events.push(UiEvent::DragEnded);
    }

    fn translate_mouse(&mut self, mouse: MouseEvent, events: &mut Vec<UiEvent>) {
        let area = self.slider_area.get();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if contains(area, mouse.column, mouse.row) => {
                self.dragging = true;
                events.push(UiEvent::DragStarted);
                events.push(UiEvent::DragMoved {
                    value: slider_value(area, mouse.column),
                });
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                events.push(UiEvent::DragMoved {
                    value: slider_value(area, mouse.column),
                });
            }
            MouseEventKind::Up(MouseButton::Left) if self.dragging => {
                self.dragging = false;
                events.push(UiEvent::DragMoved {
                    value: slider_value(area, mouse.column),
                });
                events.push(UiEvent::DragEnded);
            }
            _ => {}
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let mut terminal = match self.terminal.take() {
            Some(t) => t,
            None => return Ok(()),
        };

        let drawn = terminal.draw(|f| self.draw_ui(f)).map(|_| ());
        self.terminal = Some(terminal);
        drawn?;
        Ok(())
    }
}

impl UiRenderer for TuiRenderer {
    fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        if let Some(mut terminal) = self.terminal.take() {
            execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    fn surface(&self) -> SurfaceHandle {
        self.surface.clone()
    }

    fn render(&mut self, view: &TransportView) -> Result<()> {
        self.view = view.clone();
        self.redraw()
    }

    fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Drain everything pending so a fast drag does not lag behind the pointer
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => self.translate_key(key, &mut events),
                Event::Mouse(mouse) => self.translate_mouse(mouse, &mut events),
                Event::Resize(_, _) => self.redraw()?,
                _ => {}
            }
        }

        Ok(events)
    }
}

fn gauge_ratio(position: f64) -> f64 {
    if position.is_finite() {
        position.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Slider value under `column`, clamped to the track
fn slider_value(area: Rect, column: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }

    let offset = column.saturating_sub(area.x).min(area.width - 1);
    f64::from(offset) / f64::from(area.width - 1)
}
