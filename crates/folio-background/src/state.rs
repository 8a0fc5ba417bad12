//! Terminal host binding for the particle field.

use folio_core::{Point, Theme};
use ratatui::{
    Frame,
    layout::{Position, Rect},
};

use crate::field::{Field, FieldOptions};
use crate::surface::CanvasSurface;

/// Size of one terminal cell in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

/// Largest accepted cell edge in surface units.
pub const MAX_CELL_PX: f32 = 64.0;

impl CellSize {
    /// Cell size from configured values. Non-finite or non-positive edges fall
    /// back to the default and oversized ones are capped at [`MAX_CELL_PX`].
    pub fn new(width: f32, height: f32) -> Self {
        let fallback = Self::default();
        let edge = |value: f32, default: f32| {
            if value.is_finite() && value > 0.0 {
                value.min(MAX_CELL_PX)
            } else {
                log::warn!("invalid cell size {value}, using {default}");
                default
            }
        };
        Self {
            width: edge(width, fallback.width),
            height: edge(height, fallback.height),
        }
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

/// Particle network background state.
///
/// Owns the field and the canvas it draws on, and translates terminal cells
/// into surface units for resize and pointer notifications.
#[derive(Debug)]
pub struct BackgroundState {
    field: Field,
    surface: CanvasSurface,
    cell: CellSize,
    /// Last known canvas area, empty until initialized.
    area: Rect,
}

impl BackgroundState {
    /// Create a background whose particles use the theme's accents.
    pub fn new(options: FieldOptions, theme: &Theme, cell: CellSize) -> Self {
        Self::with_field(Field::new(options), theme, cell)
    }

    /// Create a background around an existing (usually seeded) field.
    pub fn with_field(field: Field, theme: &Theme, cell: CellSize) -> Self {
        Self {
            field,
            surface: CanvasSurface::new(theme.background),
            cell,
            area: Rect::default(),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Whether the field has been sized to a canvas.
    pub fn is_initialized(&self) -> bool {
        !self.area.is_empty()
    }

    /// First resize onto the given canvas area. Does nothing without an area.
    pub fn init(&mut self, area: Rect) {
        if area.is_empty() {
            log::debug!("no canvas area, particle background stays idle");
            return;
        }
        self.resize(area);
        log::info!(
            "particle background started with {} particles",
            self.field.particles().len()
        );
    }

    /// Track a new canvas area, resetting the field when its size changes.
    pub fn resize(&mut self, area: Rect) {
        let size_changed = area.width != self.area.width || area.height != self.area.height;
        self.area = area;

        if size_changed && !area.is_empty() {
            let width = area.width as f32 * self.cell.width;
            let height = area.height as f32 * self.cell.height;
            self.field.resize(width, height);
            self.surface.set_bounds(self.field.bounds());
        }
    }

    /// Pointer moved to a terminal cell. Outside the canvas counts as leaving.
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let position = Position::new(column, row);
        if !self.area.contains(position) {
            self.field.set_pointer(None);
            return;
        }

        // Aim at the middle of the cell
        let x = (column - self.area.x) as f32 + 0.5;
        let y = (row - self.area.y) as f32 + 0.5;
        self.field.set_pointer(Some(Point::new(
            x * self.cell.width,
            y * self.cell.height,
        )));
    }

    /// Pointer left the canvas or the terminal lost focus.
    pub fn pointer_left(&mut self) {
        self.field.set_pointer(None);
    }

    /// Simulate one frame onto the canvas.
    pub fn advance(&mut self) {
        let bounds = self.field.bounds();
        self.field.step(&mut self.surface, bounds.width, bounds.height);
        self.field.connect(&mut self.surface);
    }

    /// Advance one frame and draw it into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.is_initialized() {
            self.init(area);
        } else {
            self.resize(area);
        }
        if !self.is_initialized() {
            return;
        }

        self.advance();
        frame.render_widget(&self.surface, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background() -> BackgroundState {
        let theme = Theme::default();
        let field = Field::with_seed(FieldOptions::themed(&theme), 42);
        BackgroundState::with_field(field, &theme, CellSize::default())
    }

    #[test]
    fn test_cell_size_repairs_bad_values() {
        let cell = CellSize::new(10.0, 20.0);
        assert_eq!((cell.width, cell.height), (10.0, 20.0));
        assert_eq!(CellSize::new(0.0, f32::NAN), CellSize::default());
        assert_eq!(CellSize::new(-8.0, f32::INFINITY), CellSize::default());

        let cell = CellSize::new(f32::MAX, 1e30);
        assert_eq!((cell.width, cell.height), (MAX_CELL_PX, MAX_CELL_PX));
    }

    #[test]
    fn test_oversized_cells_keep_particle_count_bounded() {
        let theme = Theme::default();
        let field = Field::with_seed(FieldOptions::themed(&theme), 5);
        let mut bg = BackgroundState::with_field(field, &theme, CellSize::new(1e30, 1e30));
        bg.init(Rect::new(0, 0, 100, 50));
        // 6400x3200 units at most
        assert_eq!(bg.field().particles().len(), 1365);
    }

    #[test]
    fn test_init_without_area_is_noop() {
        let mut bg = background();
        bg.init(Rect::new(0, 0, 0, 0));
        assert!(!bg.is_initialized());
        assert!(!bg.field().is_running());
    }

    #[test]
    fn test_init_sizes_field_from_cells() {
        let mut bg = background();
        // 100x50 cells -> 800x800 units -> 42 particles
        bg.init(Rect::new(0, 1, 100, 50));
        assert!(bg.is_initialized());
        assert_eq!(bg.field().bounds().width, 800.0);
        assert_eq!(bg.field().bounds().height, 800.0);
        assert_eq!(bg.field().particles().len(), 42);
    }

    #[test]
    fn test_moving_area_keeps_particles() {
        let mut bg = background();
        bg.init(Rect::new(0, 1, 100, 50));
        let before = bg.field().particles().to_vec();
        bg.resize(Rect::new(0, 2, 100, 50));
        assert_eq!(bg.field().particles(), before.as_slice());

        bg.resize(Rect::new(0, 2, 120, 50));
        assert_ne!(bg.field().particles(), before.as_slice());
    }

    #[test]
    fn test_pointer_maps_cells_to_surface() {
        let mut bg = background();
        bg.init(Rect::new(0, 1, 100, 50));

        bg.pointer_moved(10, 1);
        assert_eq!(bg.field().pointer(), Some(Point::new(84.0, 8.0)));

        // Row 0 is outside the canvas
        bg.pointer_moved(10, 0);
        assert_eq!(bg.field().pointer(), None);

        bg.pointer_moved(10, 5);
        bg.pointer_left();
        assert_eq!(bg.field().pointer(), None);
    }

    #[test]
    fn test_advance_draws_particles() {
        let mut bg = background();
        bg.init(Rect::new(0, 0, 100, 50));
        bg.advance();
        bg.advance();

        // The second frame replaces the first: one dot per particle plus
        // one segment per close pair.
        let particles = bg.field().particles();
        let mut links = 0;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                if a.position().distance(b.position()) < crate::CONNECTION_DISTANCE {
                    links += 1;
                }
            }
        }
        assert_eq!(bg.surface.len(), particles.len() + links);
    }
}
