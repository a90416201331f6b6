//! Terminal front-end for the 3D CSS model editor
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use cssmodel_core::{EditorError, EditorSession, FieldDescriptor, ObjectId, Viewport};
use log::{info, warn};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod frontend;
pub mod renderer;

pub use config::{ConfigError, TerminalConfig};
pub use frontend::{FileSink, PanelForm, TerminalProjector};
pub use renderer::AsciiRenderer;

/// Columns reserved on the right for the property panel
const PANEL_WIDTH: u16 = 30;

pub type TerminalSession = EditorSession<TerminalProjector, PanelForm, FileSink>;

#[derive(Debug, Clone, PartialEq)]
enum InputMode {
    Normal,
    EditField { label: String, buffer: String },
    NameExport { buffer: String },
}

/// Main application struct for the terminal editor
pub struct TerminalApp {
    session: TerminalSession,
    viewport: Viewport,
    renderer: AsciiRenderer,
    frame_time: Duration,
    mode: InputMode,
    focus: usize,
    status: String,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: &TerminalConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    pub fn with_size(config: &TerminalConfig, width: u16, height: u16) -> Self {
        let session = EditorSession::new(
            TerminalProjector::new(),
            PanelForm::default(),
            FileSink::new(config.export_dir.clone()),
        );
        Self {
            session,
            viewport: Viewport::new(width as u32, height as u32, config.px_per_column, config.px_per_row),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / u64::from(config.frame_rate.max(1))),
            mode: InputMode::Normal,
            focus: 0,
            status: String::from("c: cube  p: polygon  Tab: field  Enter: edit  e: export  q: quit"),
            running: true,
        }
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Drain all pending input before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.render()?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.viewport.width = width as u32;
                self.viewport.height = height as u32;
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::EditField { label, mut buffer } => match code {
                KeyCode::Enter => self.commit_field(&label, &buffer),
                KeyCode::Esc => self.status = format!("Edit of {label} cancelled"),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = InputMode::EditField { label, buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = InputMode::EditField { label, buffer };
                }
                _ => self.mode = InputMode::EditField { label, buffer },
            },
            InputMode::NameExport { mut buffer } => match code {
                KeyCode::Enter => self.export(Some(&buffer)),
                KeyCode::Esc => self.export(None),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = InputMode::NameExport { buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = InputMode::NameExport { buffer };
                }
                _ => self.mode = InputMode::NameExport { buffer },
            },
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('c') => {
                let id = self.session.add_cuboid();
                self.focus = 0;
                self.status = format!("Added cube {id}");
            }
            KeyCode::Char('p') => {
                let id = self.session.add_polygon();
                self.focus = 0;
                self.status = format!("Added polygon {id}");
            }
            KeyCode::Char(']') => self.cycle_selection(1),
            KeyCode::Char('[') => self.cycle_selection(-1),
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Enter => {
                if let Some(field) = self.panel_fields().get(self.focus) {
                    self.mode = InputMode::EditField {
                        label: field.label.clone(),
                        buffer: String::new(),
                    };
                }
            }
            KeyCode::Char('e') => {
                self.mode = InputMode::NameExport { buffer: String::new() };
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEvent { kind, column, row, .. } = mouse;
        let pointer = self.viewport.cell_to_screen(column, row);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if column >= self.scene_width() {
                    return;
                }
                if let Some(id) = self.renderer.pick(column, row) {
                    if self.session.pointer_down(id, pointer) {
                        self.focus = 0;
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.session.projector().pointer_captured() => {
                self.session.pointer_move(pointer);
            }
            MouseEventKind::Up(_) if self.session.projector().pointer_captured() => {
                self.session.pointer_up();
            }
            _ => {}
        }
    }

    fn commit_field(&mut self, label: &str, raw: &str) {
        let result = self
            .session
            .apply_edit(label, raw)
            .map(|_| format!("{label} = {}", raw.trim()))
            .map_err(EditorError::from);
        self.report(result);
    }

    fn export(&mut self, name: Option<&str>) {
        let result = match self.session.export(name) {
            Ok(Some(export)) => {
                info!("Saved {}", export.filename);
                Ok(format!("Saved {}", export.filename))
            }
            Ok(None) => Ok("Export cancelled".to_string()),
            Err(err) => Err(EditorError::from(err)),
        };
        self.report(result);
    }

    fn report(&mut self, result: Result<String, EditorError>) {
        self.status = match result {
            Ok(status) => status,
            Err(EditorError::Edit(err)) => format!("Ignored: {err}"),
            Err(err) => {
                warn!("{}", err);
                err.to_string()
            }
        };
    }

    fn cycle_selection(&mut self, step: isize) {
        let ids: Vec<ObjectId> = self.session.scene().objects().map(|(id, _)| id).collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .session
            .scene()
            .selected()
            .and_then(|selected| ids.iter().position(|id| *id == selected))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(ids.len() as isize) as usize;
        match self.session.select(ids[next]) {
            Ok(()) => self.focus = 0,
            Err(err) => self.report(Err(err)),
        }
    }

    fn move_focus(&mut self, step: isize) {
        let count = self.panel_fields().len();
        if count > 0 {
            self.focus = (self.focus as isize + step).rem_euclid(count as isize) as usize;
        }
    }

    /// Selected primitive's fields followed by the camera's
    fn panel_fields(&self) -> Vec<FieldDescriptor> {
        let mut fields = self.session.form().fields().to_vec();
        fields.extend(self.session.camera_fields());
        fields
    }

    fn scene_width(&self) -> u16 {
        (self.viewport.width as u16).saturating_sub(PANEL_WIDTH)
    }

    /// Rasterize the scene into the character buffer
    pub fn rasterize(&mut self) {
        self.renderer.clear();
        self.session.projector().render(&mut self.renderer, &self.viewport);
    }

    fn panel_lines(&self) -> Vec<String> {
        let mut lines = vec![String::from(" Properties")];
        let editing = match &self.mode {
            InputMode::EditField { label, buffer } => Some((label.as_str(), buffer.as_str())),
            _ => None,
        };
        for (i, field) in self.panel_fields().iter().enumerate() {
            let marker = if i == self.focus { '>' } else { ' ' };
            let value = match editing {
                Some((label, buffer)) if label == field.label => format!("[{buffer}_]"),
                _ => field.value.to_string(),
            };
            lines.push(format!("{marker} {:<18}{value}", field.label));
        }
        lines
    }

    fn status_line(&self) -> String {
        match &self.mode {
            InputMode::NameExport { buffer } => format!("Export as: {buffer}_"),
            _ => self.status.clone(),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterize();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout, self.session.scene().selected())?;

        // Draw UI overlay
        let width = PANEL_WIDTH as usize;
        let panel_x = self.scene_width();
        queue!(stdout, SetForegroundColor(Color::Green))?;
        for (row, line) in self.panel_lines().iter().enumerate() {
            if row + 2 >= self.viewport.height as usize {
                break;
            }
            let text: String = line.chars().take(width).collect();
            queue!(stdout, cursor::MoveTo(panel_x, row as u16 + 1), Print(format!("{text:<width$}")))?;
        }
        let bottom = (self.viewport.height as u16).saturating_sub(1);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("cssmodel | {} objects", self.session.scene().len())),
            cursor::MoveTo(0, bottom),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
