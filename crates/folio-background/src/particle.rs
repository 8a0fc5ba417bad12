//! A single animated point of the particle network.

use folio_core::{Bounds, Point};

use crate::surface::{Paint, Surface};

/// Velocity damping applied every frame.
pub const FRICTION: f32 = 0.99;

/// Scale of the impulse a nearby pointer applies.
pub const REPULSION: f32 = 0.2;

/// Pointer position together with the distance it affects particles within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub position: Point,
    pub radius: f32,
}

/// One point's kinematic state. The radius is fixed for the particle's life.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
}

impl Particle {
    pub fn new(position: Point, velocity: Point, radius: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
            radius,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Point {
        Point::new(self.vx, self.vy)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Speed in surface units per frame.
    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Advance one frame: bounce, pointer repulsion, damping, integration.
    pub fn update(&mut self, bounds: Bounds, pointer: Option<Pointer>) {
        // Point the velocity back inside rather than flipping it blindly, so a
        // particle that has just re-entered is not sent straight back out.
        if self.x < 0.0 {
            self.vx = self.vx.abs();
        } else if self.x > bounds.width {
            self.vx = -self.vx.abs();
        }
        if self.y < 0.0 {
            self.vy = self.vy.abs();
        } else if self.y > bounds.height {
            self.vy = -self.vy.abs();
        }

        if let Some(pointer) = pointer {
            let dx = self.x - pointer.position.x;
            let dy = self.y - pointer.position.y;
            let distance = (dx * dx + dy * dy).sqrt();

            // A coincident pointer has no direction to push in
            if distance > 0.0 && distance < pointer.radius {
                let angle = dy.atan2(dx);
                let force = (pointer.radius - distance) / pointer.radius;
                self.vx += angle.cos() * force * REPULSION;
                self.vy += angle.sin() * force * REPULSION;
            }
        }

        self.vx *= FRICTION;
        self.vy *= FRICTION;

        self.x += self.vx;
        self.y += self.vy;
    }

    /// Draw this particle as a filled circle.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, paint: Paint) {
        surface.fill_circle(self.position(), self.radius, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{DrawCall, RecordingSurface};
    use folio_core::ColorToken;

    const BOUNDS: Bounds = Bounds::new(100.0, 100.0);

    fn particle(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle::new(Point::new(x, y), Point::new(vx, vy), 2.0)
    }

    #[test]
    fn test_update_integrates_with_friction() {
        let mut p = particle(50.0, 50.0, 1.0, -2.0);
        p.update(BOUNDS, None);
        let v = p.velocity();
        let pos = p.position();
        assert!((v.x - 0.99).abs() < 1e-5);
        assert!((v.y + 1.98).abs() < 1e-5);
        assert!((pos.x - 50.99).abs() < 1e-4);
        assert!((pos.y - 48.02).abs() < 1e-4);
    }

    #[test]
    fn test_friction_never_expands_velocity() {
        let mut p = particle(10.0, 90.0, 0.7, -0.3);
        for _ in 0..200 {
            let before = p.velocity();
            p.update(BOUNDS, None);
            let after = p.velocity();
            assert!(after.x.abs() <= before.x.abs());
            assert!(after.y.abs() <= before.y.abs());
        }
    }

    #[test]
    fn test_bounce_turns_velocity_inward() {
        let mut left = particle(-0.5, 50.0, -1.0, 0.0);
        left.update(BOUNDS, None);
        assert!(left.velocity().x > 0.0);

        let mut bottom = particle(50.0, 100.5, 0.0, 1.0);
        bottom.update(BOUNDS, None);
        assert!(bottom.velocity().y < 0.0);
    }

    #[test]
    fn test_bounce_does_not_trap_reentering_particle() {
        // Outside but already heading back in: keep heading in.
        let mut p = particle(-0.5, 50.0, 1.0, 0.0);
        p.update(BOUNDS, None);
        assert!(p.velocity().x > 0.0);
        assert!(p.position().x > -0.5);
    }

    #[test]
    fn test_position_stays_near_bounds() {
        let v_max = 3.0;
        let mut particles = vec![
            particle(0.0, 0.0, -v_max, -v_max),
            particle(100.0, 100.0, v_max, v_max),
            particle(99.0, 1.0, 2.5, -2.5),
            particle(50.0, 50.0, -1.0, 3.0),
        ];
        for _ in 0..500 {
            for p in &mut particles {
                p.update(BOUNDS, None);
                let pos = p.position();
                assert!(pos.x >= -v_max && pos.x <= BOUNDS.width + v_max);
                assert!(pos.y >= -v_max && pos.y <= BOUNDS.height + v_max);
            }
        }
    }

    #[test]
    fn test_pointer_repels() {
        let pointer = Pointer {
            position: Point::new(40.0, 50.0),
            radius: 100.0,
        };
        let mut p = particle(50.0, 50.0, 0.0, 0.0);
        p.update(BOUNDS, Some(pointer));

        // force = (100 - 10) / 100 = 0.9, impulse = 0.9 * 0.2 = 0.18
        let v = p.velocity();
        assert!((v.x - 0.18 * FRICTION).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn test_pointer_out_of_range_has_no_effect() {
        let pointer = Pointer {
            position: Point::new(0.0, 0.0),
            radius: 10.0,
        };
        let mut with = particle(50.0, 50.0, 0.5, 0.5);
        let mut without = with.clone();
        with.update(BOUNDS, Some(pointer));
        without.update(BOUNDS, None);
        assert_eq!(with, without);
    }

    #[test]
    fn test_coincident_pointer_stays_finite() {
        let pointer = Pointer {
            position: Point::new(50.0, 50.0),
            radius: 100.0,
        };
        let mut p = particle(50.0, 50.0, 0.0, 0.0);
        p.update(BOUNDS, Some(pointer));
        let v = p.velocity();
        assert!(v.x.is_finite() && v.y.is_finite());
        assert!(p.position().x.is_finite() && p.position().y.is_finite());
    }

    #[test]
    fn test_draw_fills_circle_at_position() {
        let p = particle(12.0, 34.0, 0.0, 0.0);
        let paint = Paint::new(ColorToken::rgb(1, 2, 3), 0.6);
        let mut surface = RecordingSurface::default();
        p.draw(&mut surface, paint);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Circle {
                center: Point::new(12.0, 34.0),
                radius: 2.0,
                paint,
            }]
        );
    }
}
