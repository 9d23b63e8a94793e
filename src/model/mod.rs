pub mod config;
pub mod item;
pub mod list;
pub mod project;
pub mod route;

pub use config::*;
pub use item::*;
pub use list::*;
pub use project::*;
pub use route::*;
