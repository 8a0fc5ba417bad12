//! Particle network background for the folio portfolio.
//!
//! Particles drift across the surface, bounce off its edges and are pushed
//! away by the pointer; pairs closer than [`CONNECTION_DISTANCE`] are joined
//! by lines that fade with distance. The simulation draws through the
//! [`Surface`] trait, and [`BackgroundState`] binds it to a terminal canvas.

mod field;
mod particle;
mod state;
mod surface;

pub use field::{
    AREA_PER_PARTICLE, CONNECTION_DISTANCE, Field, FieldOptions, link_opacity, target_count,
};
pub use particle::{FRICTION, Particle, Pointer, REPULSION};
pub use state::{BackgroundState, CellSize};
pub use surface::{CanvasSurface, Paint, Surface};
