pub mod render;
pub mod term_host;

pub use render::{draw, Status};
pub use term_host::TermHost;
