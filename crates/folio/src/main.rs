use std::io::stdout;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
};
use folio_background::{BackgroundState, CellSize, FieldOptions, Paint};
use folio_config::{BackgroundConfig, Config, Profile, SectionConfig};
use folio_core::Theme;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

mod controller;
mod logging;
mod sections;
mod typewriter;

use controller::AnimationController;
use sections::{Document, Navigator, Row};
use typewriter::Typewriter;

/// How long the loading splash stays up.
const LOADING_DURATION: Duration = Duration::from_millis(1500);

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: isize = 3;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();
    let config = Config::load()?;

    let terminal = ratatui::init();
    let result = enable_input_capture().and_then(|()| App::new(config).run(terminal));
    disable_input_capture();
    ratatui::restore();
    result
}

/// Ask the terminal for mouse motion and focus notifications.
fn enable_input_capture() -> color_eyre::Result<()> {
    execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;
    Ok(())
}

fn disable_input_capture() {
    if let Err(err) = execute!(stdout(), DisableMouseCapture, DisableFocusChange) {
        log::warn!("failed to release mouse capture: {err}");
    }
}

/// Build the particle background described by the config, unless disabled.
fn background_from_config(config: &BackgroundConfig, theme: &Theme) -> Option<BackgroundState> {
    if !config.enabled {
        log::info!("particle background disabled in config");
        return None;
    }

    let options = FieldOptions {
        pointer_radius: config.pointer_radius,
        max_speed: config.max_speed,
        radius_min: config.radius_min,
        radius_max: config.radius_max,
        particle: Paint::new(theme.primary, config.particle_opacity),
        line: Paint::new(theme.secondary, config.line_opacity),
        line_width: config.line_width,
    };
    let cell = CellSize::new(config.cell_width_px, config.cell_height_px);
    Some(BackgroundState::new(options, theme, cell))
}

/// A clickable nav bar entry: columns `[start, end)` jump to `section`.
#[derive(Debug, Clone, Copy)]
struct NavHit {
    start: u16,
    end: u16,
    section: usize,
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Frame scheduling and shutdown.
    controller: AnimationController,
    /// When the app started, for the loading splash and cursor blink.
    started: Instant,
    profile: Profile,
    sections: Vec<SectionConfig>,
    theme: Theme,
    /// Particle background, `None` when disabled.
    background: Option<BackgroundState>,
    /// Toggled with `p`.
    show_background: bool,
    typewriter: Typewriter,
    navigator: Navigator,
    document: Document,
    /// Body area the document was laid out for.
    body: Rect,
    /// Nav bar row and its clickable entries from the last frame.
    nav_row: u16,
    nav_hits: Vec<NavHit>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let theme = config.theme.resolve();
        let background = background_from_config(&config.background, &theme);
        let typewriter = Typewriter::new(config.profile.words.iter().cloned());
        let cell_height = CellSize::new(
            config.background.cell_width_px,
            config.background.cell_height_px,
        )
        .height;

        Self {
            controller: AnimationController::new(config.background.fps),
            started: Instant::now(),
            navigator: Navigator::new(cell_height),
            profile: config.profile,
            sections: config.sections.0,
            theme,
            background,
            show_background: true,
            typewriter,
            document: Document::default(),
            body: Rect::default(),
            nav_row: 0,
            nav_hits: Vec::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.init(Rect::new(0, 0, size.width, size.height), Instant::now());

        while self.controller.is_running() {
            let now = Instant::now();
            self.typewriter.poll(now);
            if self.controller.frame_due(now) {
                terminal.draw(|frame| self.render(frame))?;
                self.controller.mark_frame(now);
            }
            self.handle_crossterm_events()?;
        }

        self.typewriter.dispose();
        log::info!("stopped after {} frames", self.controller.frames());
        Ok(())
    }

    /// Lay out the page for the terminal size, size the particle field and
    /// start the typewriter.
    fn init(&mut self, area: Rect, now: Instant) {
        let body = Self::split(area)[1];
        self.relayout(body);
        if let Some(background) = &mut self.background {
            background.init(body);
        }
        self.typewriter.start(now);
    }

    /// Split the screen into nav bar, body and help line.
    fn split(area: Rect) -> [Rect; 3] {
        Layout::vertical([
            Constraint::Length(1), // Nav bar
            Constraint::Fill(1),   // Body
            Constraint::Length(1), // Help text
        ])
        .areas(area)
    }

    /// Re-wrap the document when the body size changes.
    fn relayout(&mut self, body: Rect) {
        if body.width == self.body.width && body.height == self.body.height {
            self.body = body;
            return;
        }
        self.body = body;
        let content_width = body.width.saturating_sub(4).max(1) as usize;
        self.document = Document::layout(&self.sections, content_width, body.height as usize);
        self.navigator.relayout(&self.document, self.viewport());
    }

    fn viewport(&self) -> usize {
        self.body.height as usize
    }

    fn is_loading(&self, now: Instant) -> bool {
        now.duration_since(self.started) < LOADING_DURATION
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let now = Instant::now();
        let area = frame.area();

        if self.is_loading(now) {
            self.render_splash(frame, area, now);
            return;
        }

        let [nav, body, help] = Self::split(area);
        self.relayout(body);

        if self.show_background {
            if let Some(background) = &mut self.background {
                background.render(frame, body);
            }
        }

        self.render_document(frame, body, now);
        self.render_nav(frame, nav);
        self.render_help(frame, help);
    }

    fn render_splash(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let color = self.theme.primary.color();
        let dots = (now.duration_since(self.started).as_millis() / 250 % 4) as usize;

        let chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        let splash = Paragraph::new(format!("Loading{:<3}", ".".repeat(dots)))
            .style(Style::new().fg(color))
            .alignment(Alignment::Center);
        frame.render_widget(splash, chunks[1]);
    }

    /// Lines of the hero, indexed by document row.
    fn hero_line(&self, row: usize, now: Instant) -> Line<'static> {
        let middle = self.viewport() / 2;
        let color = self.theme.primary.color();

        if row + 2 == middle {
            Line::from(self.profile.greeting.clone()).dark_gray().centered()
        } else if row == middle {
            Line::from(self.profile.name.clone())
                .style(Style::new().fg(color).add_modifier(Modifier::BOLD))
                .centered()
        } else if row == middle + 2 {
            let blink_on = (now.duration_since(self.started).as_millis() / 500) % 2 == 0;
            let cursor = if blink_on { "▌" } else { " " };
            Line::from(vec![
                Span::raw(format!("{} ", self.profile.role_prefix)),
                Span::styled(self.typewriter.text().to_string(), Style::new().fg(color)),
                Span::styled(cursor, Style::new().fg(color)),
            ])
            .centered()
        } else {
            Line::default()
        }
    }

    fn render_document(&self, frame: &mut Frame, body: Rect, now: Instant) {
        let color = self.theme.primary.color();
        let start = self.navigator.scroll();
        let end = (start + body.height as usize).min(self.document.height());

        let lines: Vec<Line> = self.document.rows[start.min(end)..end]
            .iter()
            .enumerate()
            .map(|(i, row)| match row {
                Row::Hero => self.hero_line(start + i, now),
                Row::Blank => Line::default(),
                Row::Title(index) => Line::from(self.sections[*index].title.clone())
                    .style(Style::new().fg(color).add_modifier(Modifier::BOLD)),
                Row::Body(text) => Line::from(text.clone()),
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), body.inner(Margin::new(2, 0)));
    }

    fn render_nav(&mut self, frame: &mut Frame, nav: Rect) {
        let color = self.theme.primary.color();
        let mut spans = vec![Span::styled(
            " folio ",
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        )];

        self.nav_row = nav.y;
        self.nav_hits.clear();
        let mut x = nav.x + " folio ".len() as u16;

        for (index, section) in self.sections.iter().enumerate() {
            let label = format!(" {} {} ", index + 1, section.title);
            let width = label.chars().count() as u16;
            self.nav_hits.push(NavHit {
                start: x,
                end: x.saturating_add(width),
                section: index,
            });
            x = x.saturating_add(width);

            let span = if self.navigator.active() == Some(index) {
                Span::styled(label, Style::new().fg(Color::Black).bg(color))
            } else {
                Span::raw(label).dark_gray()
            };
            spans.push(span);
        }

        if self.navigator.show_scroll_top() {
            spans.push(Span::raw("  ↑ top").fg(color));
        }

        let style = if self.navigator.nav_solid() {
            Style::new().bg(self.theme.background.color())
        } else {
            Style::new()
        };
        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), nav);
    }

    fn render_help(&self, frame: &mut Frame, help: Rect) {
        let color = self.theme.primary.color();
        let year = Local::now().year();

        let help_line = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "↑↓".bold().fg(color),
            " scroll  ".dark_gray(),
            "1-9".bold().fg(color),
            " sections  ".dark_gray(),
            "t".bold().fg(color),
            " top  ".dark_gray(),
            "p".bold().fg(color),
            " particles  ".dark_gray(),
            Span::raw(format!("© {year} {}", self.profile.name)).dark_gray(),
        ])
        .centered();
        frame.render_widget(help_line, help);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next frame or keystroke.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let now = Instant::now();
        let mut timeout = self.controller.time_until_next_frame(now);
        if let Some(deadline) = self.typewriter.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(width, height) => self.on_resize(width, height),
                Event::FocusLost => self.on_focus_lost(),
                Event::FocusGained => self.on_focus_gained(Instant::now()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = self.viewport().max(1) as isize;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page),
            (_, KeyCode::PageUp) => self.scroll_by(-page),
            (_, KeyCode::Home | KeyCode::Char('t') | KeyCode::Char('g')) => self.scroll_to_top(),
            (_, KeyCode::End | KeyCode::Char('G')) => self.scroll_by(isize::MAX),
            (_, KeyCode::Tab) => self.cycle_section(1),
            (_, KeyCode::BackTab) => self.cycle_section(-1),
            (_, KeyCode::Char(c @ '1'..='9')) => {
                let index = c as usize - '1' as usize;
                self.jump_to(index);
            }
            (_, KeyCode::Char('p')) => self.toggle_background(),
            _ => {}
        }
    }

    /// Pointer motion feeds the particle field; wheel scrolls; clicks on the
    /// nav bar jump to sections.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if let Some(background) = &mut self.background {
                    background.pointer_moved(mouse.column, mouse.row);
                }
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            MouseEventKind::Down(MouseButton::Left) if mouse.row == self.nav_row => {
                let hit = self
                    .nav_hits
                    .iter()
                    .find(|hit| (hit.start..hit.end).contains(&mouse.column))
                    .map(|hit| hit.section);
                if let Some(index) = hit {
                    self.jump_to(index);
                }
            }
            _ => {}
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        let body = Self::split(Rect::new(0, 0, width, height))[1];
        self.relayout(body);
        if let Some(background) = &mut self.background {
            background.resize(body);
        }
    }

    /// Terminal hidden behind another window: stop typing, forget the pointer.
    fn on_focus_lost(&mut self) {
        self.typewriter.pause();
        if let Some(background) = &mut self.background {
            background.pointer_left();
        }
    }

    fn on_focus_gained(&mut self, now: Instant) {
        self.typewriter.resume(now);
    }

    fn scroll_by(&mut self, delta: isize) {
        let viewport = self.viewport();
        self.navigator.scroll_by(delta, &self.document, viewport);
    }

    fn scroll_to_top(&mut self) {
        let viewport = self.viewport();
        self.navigator.scroll_to_top(&self.document, viewport);
    }

    fn jump_to(&mut self, index: usize) {
        let viewport = self.viewport();
        self.navigator.jump_to(index, &self.document, viewport);
    }

    /// Jump to the next (or previous) section, wrapping around.
    fn cycle_section(&mut self, step: isize) {
        let count = self.sections.len() as isize;
        if count == 0 {
            return;
        }
        let next = match self.navigator.active() {
            Some(current) => (current as isize + step).rem_euclid(count),
            None if step > 0 => 0,
            None => count - 1,
        };
        self.jump_to(next as usize);
    }

    /// Show or hide the particle background.
    fn toggle_background(&mut self) {
        self.show_background = !self.show_background;
        if let Some(background) = &mut self.background {
            background.pointer_left();
        }
    }

    /// Cancel the animation loop so `run` returns.
    fn quit(&mut self) {
        self.controller.cancel();
    }
}
