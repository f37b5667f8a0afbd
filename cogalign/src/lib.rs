pub mod align;
pub mod batch;
mod setup;
