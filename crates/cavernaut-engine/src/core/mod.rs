pub use self::{grid::*, movement::*, terrain::*};

pub mod grid;
pub mod movement;
pub mod terrain;
