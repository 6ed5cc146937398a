//! Printable ID cards ("nameplates") for fire-department personnel.
//!
//! A [`Card`] lays out four blocks (portrait, name and leading role, vehicle
//! instructions, technical qualifications with QR code) and draws them onto
//! any [`Surface`]. The [`Sheet`] driver places cards on A4 or label pages;
//! [`preview`] rasterizes a single card to PNG.

pub mod assets;
pub mod card;
pub mod config;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod person;
pub mod preview;
pub mod registry;
pub mod sheet;
pub mod surface;

#[cfg(test)]
mod testing;

pub use assets::Assets;
pub use card::{Card, CardContext, CardGeometry};
pub use config::NameplateConfig;
pub use error::{NameplateError, Result};
pub use person::{Function, Instruction, Person, PersonInput, Qualification};
pub use sheet::{ErrorPolicy, PaperSize, Sheet, SheetReport};
pub use surface::{PagedSurface, Surface};
