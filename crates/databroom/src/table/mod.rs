//! Table model: ordered named columns of heterogeneous cells.

mod cell;
mod frame;

pub use cell::{is_null_token, Cell};
pub use frame::Table;
