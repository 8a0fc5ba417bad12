//! The particle field: particle set, pointer state and the per-frame cycle.

use folio_core::{Bounds, Point, Theme};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::particle::{Particle, Pointer};
use crate::surface::{Paint, Surface};

/// Surface area (square units) that accounts for one particle.
pub const AREA_PER_PARTICLE: f32 = 15_000.0;

/// Maximum distance at which two particles are joined by a line.
pub const CONNECTION_DISTANCE: f32 = 120.0;

/// Number of particles a surface of the given size holds.
pub fn target_count(width: f32, height: f32) -> usize {
    let area = Bounds::new(width.max(0.0), height.max(0.0)).area();
    if !area.is_finite() {
        return 0;
    }
    // NaN saturates to 0
    (area / AREA_PER_PARTICLE).floor() as usize
}

/// Opacity of the line joining two particles `distance` apart, or `None` when
/// they are too far apart to be joined.
pub fn link_opacity(distance: f32, base_opacity: f32) -> Option<f32> {
    if distance < CONNECTION_DISTANCE {
        Some(base_opacity * (1.0 - distance / CONNECTION_DISTANCE))
    } else {
        None
    }
}

/// Largest accepted initial speed; keeps the width of the spawn range finite.
const MAX_SPEED_LIMIT: f32 = f32::MAX / 4.0;

/// Tunables for spawning and drawing particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOptions {
    /// Distance within which the pointer pushes particles away.
    pub pointer_radius: f32,
    /// Bound on each initial velocity component.
    pub max_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Particle fill.
    pub particle: Paint,
    /// Connector line color and its opacity at zero distance.
    pub line: Paint,
    pub line_width: f32,
}

impl FieldOptions {
    /// Default options drawn in the given theme's accents.
    pub fn themed(theme: &Theme) -> Self {
        Self {
            particle: Paint::new(theme.primary, 0.6),
            line: Paint::new(theme.secondary, 0.35),
            ..Self::default()
        }
    }

    /// Repair values that would make spawning impossible.
    fn sanitized(mut self) -> Self {
        if !self.max_speed.is_finite() {
            self.max_speed = 0.0;
        }
        self.max_speed = self.max_speed.abs().min(MAX_SPEED_LIMIT);

        let min_radius = 0.1;
        let (lo, hi) = if self.radius_min <= self.radius_max {
            (self.radius_min, self.radius_max)
        } else {
            (self.radius_max, self.radius_min)
        };
        self.radius_min = if lo.is_finite() {
            lo.max(min_radius)
        } else {
            min_radius
        };
        self.radius_max = if hi.is_finite() {
            hi.max(self.radius_min)
        } else {
            self.radius_min
        };

        if !self.pointer_radius.is_finite() || self.pointer_radius < 0.0 {
            self.pointer_radius = 0.0;
        }
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            pointer_radius: 100.0,
            max_speed: 0.5,
            radius_min: 1.0,
            radius_max: 3.0,
            particle: Paint::new(theme.primary, 0.6),
            line: Paint::new(theme.secondary, 0.35),
            line_width: 1.0,
        }
    }
}

/// The full particle set plus pointer state.
///
/// A field starts uninitialized with no particles; the first [`Field::resize`]
/// populates it and every later resize replaces the whole set.
#[derive(Debug)]
pub struct Field {
    particles: Vec<Particle>,
    pointer: Option<Point>,
    bounds: Bounds,
    options: FieldOptions,
    rng: StdRng,
}

impl Field {
    /// Create an uninitialized field seeded from the OS.
    pub fn new(options: FieldOptions) -> Self {
        Self::from_rng(options, StdRng::from_os_rng())
    }

    /// Create an uninitialized field with a fixed seed.
    pub fn with_seed(options: FieldOptions, seed: u64) -> Self {
        Self::from_rng(options, StdRng::seed_from_u64(seed))
    }

    fn from_rng(options: FieldOptions, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            pointer: None,
            bounds: Bounds::default(),
            options: options.sanitized(),
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether the field holds a particle set.
    pub fn is_running(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Discard every particle and spawn a fresh set sized for the surface.
    pub fn resize(&mut self, width: f32, height: f32) {
        let count = target_count(width, height);
        self.bounds = Bounds::new(width, height);

        let FieldOptions {
            max_speed,
            radius_min,
            radius_max,
            ..
        } = self.options;

        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| {
                // count > 0 implies both dimensions are positive
                let position = Point::new(
                    rng.random_range(0.0..width),
                    rng.random_range(0.0..height),
                );
                let velocity = Point::new(
                    rng.random_range(-max_speed..=max_speed),
                    rng.random_range(-max_speed..=max_speed),
                );
                let radius = rng.random_range(radius_min..=radius_max);
                Particle::new(position, velocity, radius)
            })
            .collect();

        log::debug!("particle field reset to {count} particles for {width}x{height}");
    }

    /// Record the pointer position, or clear it when the pointer has left.
    pub fn set_pointer(&mut self, position: Option<Point>) {
        self.pointer = position;
    }

    /// Clear the surface, then advance and draw every particle.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S, width: f32, height: f32) {
        surface.clear();

        let bounds = Bounds::new(width, height);
        let pointer = self.pointer.map(|position| Pointer {
            position,
            radius: self.options.pointer_radius,
        });
        let paint = self.options.particle;

        for particle in &mut self.particles {
            particle.update(bounds, pointer);
            particle.draw(surface, paint);
        }
    }

    /// Join every pair of particles closer than [`CONNECTION_DISTANCE`].
    pub fn connect<S: Surface + ?Sized>(&self, surface: &mut S) {
        let line = self.options.line;

        for (i, a) in self.particles.iter().enumerate() {
            let from = a.position();
            for b in &self.particles[i + 1..] {
                let to = b.position();
                if let Some(opacity) = link_opacity(from.distance(to), line.opacity) {
                    surface.stroke_line(
                        from,
                        to,
                        line.with_opacity(opacity),
                        self.options.line_width,
                    );
                }
            }
        }
    }
}
