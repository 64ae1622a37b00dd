pub use self::{session::*, state::*};

pub mod session;
pub mod state;
