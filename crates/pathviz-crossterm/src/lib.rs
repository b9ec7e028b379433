//! Crossterm terminal front-end for pathviz.
//!
//! [`TerminalDriver`] draws a [`Grid`] through [`Grid::render`] and turns
//! key presses and mouse clicks into [`Command`]s. It holds no simulation
//! state beyond a keyboard cursor.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{Algorithm, CellView, Color, Command, Grid, Marker, Palette, Pos};

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    let (r, g, b) = (c.r(), c.g(), c.b());
    CtColor::Rgb { r, g, b }
}

/// Black or white, whichever reads better on `bg`.
fn contrast(bg: Color) -> CtColor {
    let luma = 299 * bg.r() as u32 + 587 * bg.g() as u32 + 114 * bg.b() as u32;
    if luma > 128_000 {
        CtColor::Black
    } else {
        CtColor::White
    }
}

/// Key bindings shown under the grid.
pub const HELP: &str = "arrows move  space wall  s start  e end  enter run  \
                        r reset  c clear  b/d algo  g diag  n random  q quit";

/// A terminal back-end using crossterm.
pub struct TerminalDriver {
    mouse_enabled: bool,
    cursor: Pos,
    /// What each cell looked like at the last flush, for diffing.
    last: Vec<Option<(CellView, bool)>>,
    status: String,
}

impl TerminalDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            cursor: Pos::default(),
            last: Vec::new(),
            status: String::new(),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Keyboard cursor position.
    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        self.last.clear();
        Ok(())
    }

    pub fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    /// Paint every cell that changed since the previous call, then the
    /// status and help lines.
    pub fn draw(
        &mut self,
        grid: &Grid,
        palette: &Palette,
        status: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();
        if self.last.len() != grid.dims().len() {
            self.last = vec![None; grid.dims().len()];
        }

        let mut result: Result<(), Box<dyn std::error::Error>> = Ok(());
        let cursor = self.cursor;
        let last = &mut self.last;
        grid.render(|view| {
            if result.is_err() {
                return;
            }
            let Some(i) = grid.dims().index(view.pos) else {
                return;
            };
            let key = Some((view, view.pos == cursor));
            if last[i] == key {
                return;
            }
            last[i] = key;
            result = draw_cell(&mut stdout, view, view.pos == cursor, palette);
        });
        result?;

        if self.status != status {
            // past the last addressable row the lines overwrite the bottom
            let y = term_coord(grid.rows(), grid.cell_size().height)
                .unwrap_or(u16::MAX)
                .min(u16::MAX - 1);
            queue!(
                stdout,
                ResetColor,
                cursor::MoveTo(0, y),
                terminal::Clear(ClearType::CurrentLine),
                Print(status),
                cursor::MoveTo(0, y.saturating_add(1)),
                terminal::Clear(ClearType::CurrentLine),
                Print(HELP),
            )?;
            self.status = status.to_owned();
        }

        stdout.flush()?;
        Ok(())
    }

    /// Wait up to `timeout` for input and translate it into commands.
    pub fn poll(
        &mut self,
        grid: &Grid,
        timeout: Duration,
    ) -> Result<Vec<Command>, Box<dyn std::error::Error>> {
        let mut cmds = Vec::new();
        if !event::poll(timeout)? {
            return Ok(cmds);
        }
        while event::poll(Duration::ZERO)? {
            let cmd = match event::read()? {
                Event::Key(key) => self.on_key(grid, key),
                Event::Mouse(me) => self.on_mouse(grid, me),
                Event::Resize(..) => {
                    self.last.clear();
                    self.status.clear();
                    execute!(io::stdout(), terminal::Clear(ClearType::All))?;
                    None
                }
                _ => None,
            };
            cmds.extend(cmd);
        }
        Ok(cmds)
    }

    fn on_key(&mut self, grid: &Grid, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let here = self.cursor;
        let cell = grid.cell(here)?;
        match key.code {
            KeyCode::Up => self.move_cursor(grid, -1, 0),
            KeyCode::Down => self.move_cursor(grid, 1, 0),
            KeyCode::Left => self.move_cursor(grid, 0, -1),
            KeyCode::Right => self.move_cursor(grid, 0, 1),
            KeyCode::Char(' ') => Some(Command::ToggleWall {
                pos: here,
                value: !cell.is_wall(),
            }),
            KeyCode::Char('s') => Some(Command::SetStart {
                pos: here,
                enabled: !cell.is_start(),
            }),
            KeyCode::Char('e') => Some(Command::SetEnd { pos: here }),
            KeyCode::Enter => Some(Command::Run),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('c') => Some(Command::ClearSearch),
            KeyCode::Char('b') => Some(Command::SetAlgorithm(Algorithm::Bfs)),
            KeyCode::Char('d') => Some(Command::SetAlgorithm(Algorithm::Dfs)),
            KeyCode::Char('g') => Some(Command::ToggleDiagonals),
            KeyCode::Char('n') => Some(Command::Randomize),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }

    fn move_cursor(&mut self, grid: &Grid, drow: i32, dcol: i32) -> Option<Command> {
        let next = self.cursor.shift(drow, dcol);
        if grid.contains(next) {
            self.cursor = next;
        }
        None
    }

    fn on_mouse(&mut self, grid: &Grid, me: MouseEvent) -> Option<Command> {
        let size = grid.cell_size();
        let pos = Pos::new(
            me.row as i32 / size.height as i32,
            me.column as i32 / size.width as i32,
        );
        if !grid.contains(pos) {
            return None;
        }
        self.cursor = pos;
        match me.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                Some(Command::ToggleWall { pos, value: true })
            }
            MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => {
                Some(Command::ToggleWall { pos, value: false })
            }
            MouseEventKind::Down(MouseButton::Middle) => Some(Command::SetStart {
                pos,
                enabled: !grid.cell(pos)?.is_start(),
            }),
            _ => None,
        }
    }
}

impl Default for TerminalDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal coordinate of cell index `i` with cells `size` wide, or `None`
/// past `u16::MAX`.
fn term_coord(i: i32, size: u32) -> Option<u16> {
    let v = u64::try_from(i).ok()? * u64::from(size);
    u16::try_from(v).ok()
}

fn draw_cell(
    out: &mut impl Write,
    view: CellView,
    under_cursor: bool,
    palette: &Palette,
) -> Result<(), Box<dyn std::error::Error>> {
    let bg = palette.marker(view.marker).unwrap_or(palette.color(view.state));
    let w = view.size.width as usize;
    let glyph = match view.marker {
        Marker::Start => "S",
        Marker::End => "E",
        Marker::None => "",
    };
    let mut text = if under_cursor {
        format!("[{glyph}]")
    } else {
        glyph.to_owned()
    };
    text.truncate(w);
    let text = format!("{text:<w$}");

    // cells beyond the terminal's coordinate range are not drawn
    let (Some(x), Some(y0)) = (
        term_coord(view.pos.col, view.size.width),
        term_coord(view.pos.row, view.size.height),
    ) else {
        return Ok(());
    };
    queue!(out, SetBackgroundColor(to_ct_color(bg)), SetForegroundColor(contrast(bg)))?;
    for dy in 0..view.size.height {
        let Some(y) = u16::try_from(dy).ok().and_then(|dy| y0.checked_add(dy)) else {
            break;
        };
        let line = if dy == 0 { text.as_str() } else { "" };
        queue!(out, cursor::MoveTo(x, y), Print(format!("{line:<w$}")))?;
    }
    queue!(out, ResetColor)?;
    Ok(())
}
