//! Infrastructure layer: storage backends and the services built on them.

pub mod shopping_list;
pub mod store;

pub use shopping_list::build_shopping_list;
