//! Drawing surface abstraction and its Braille canvas implementation.

use folio_core::{Bounds, ColorToken, Point};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Line, Points},
    },
};

/// Color and opacity used for a fill or stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: ColorToken,
    pub opacity: f32,
}

impl Paint {
    pub const fn new(color: ColorToken, opacity: f32) -> Self {
        Self { color, opacity }
    }

    /// Same color with a different opacity.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }
}

/// Something the particle field can draw on.
///
/// Coordinates are surface units with the origin at the top-left corner and
/// `y` growing downward.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint);

    /// Draw a straight line segment.
    fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, width: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Dot {
        center: Point,
        radius: f32,
        color: ColorToken,
    },
    Segment {
        from: Point,
        to: Point,
        color: ColorToken,
    },
}

/// A retained-mode surface that paints onto a Ratatui Braille canvas.
///
/// Opacity is flattened against the page background when a shape is
/// recorded; stroke width is not representable on a Braille grid and every
/// segment is drawn one dot wide.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    shapes: Vec<Shape>,
    bounds: Bounds,
    background: ColorToken,
}

impl CanvasSurface {
    pub fn new(background: ColorToken) -> Self {
        Self {
            shapes: Vec::new(),
            bounds: Bounds::default(),
            background,
        }
    }

    /// Set the surface extent that maps onto the widget area.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Number of shapes recorded since the last clear.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint) {
        self.shapes.push(Shape::Dot {
            center,
            radius,
            color: paint.color.over(self.background, paint.opacity),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, _width: f32) {
        self.shapes.push(Shape::Segment {
            from,
            to,
            color: paint.color.over(self.background, paint.opacity),
        });
    }
}

impl Widget for &CanvasSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.bounds.is_empty() {
            return;
        }

        let width = self.bounds.width as f64;
        let height = self.bounds.height as f64;
        // A Braille cell holds 2x4 dots
        let dot_width = width / (area.width as f64 * 2.0);

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(self.background.color())
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                // Canvas y grows upward
                for shape in &self.shapes {
                    match *shape {
                        Shape::Dot {
                            center,
                            radius,
                            color,
                        } => {
                            let x = center.x as f64;
                            let y = height - center.y as f64;
                            ctx.draw(&Points {
                                coords: &[(x, y)],
                                color: color.color(),
                            });
                            if radius as f64 > dot_width {
                                ctx.draw(&Circle {
                                    x,
                                    y,
                                    radius: radius as f64,
                                    color: color.color(),
                                });
                            }
                        }
                        Shape::Segment { from, to, color } => {
                            ctx.draw(&Line::new(
                                from.x as f64,
                                height - from.y as f64,
                                to.x as f64,
                                height - to.y as f64,
                                color.color(),
                            ));
                        }
                    }
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A draw call captured by [`RecordingSurface`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Circle {
            center: Point,
            radius: f32,
            paint: Paint,
        },
        Line {
            from: Point,
            to: Point,
            paint: Paint,
            width: f32,
        },
    }

    /// Surface that records every call for later inspection.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn lines(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Line { .. }))
                .collect()
        }

        pub fn circles(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Circle { .. }))
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn fill_circle(&mut self, center: Point, radius: f32, paint: Paint) {
            self.calls.push(DrawCall::Circle {
                center,
                radius,
                paint,
            });
        }

        fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, width: f32) {
            self.calls.push(DrawCall::Line {
                from,
                to,
                paint,
                width,
            });
        }
    }
}
