pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod file_store;
pub mod io;
pub mod ordering;
pub mod paths;
pub mod repo;
pub mod store;
pub mod types;

pub use controller::TodoListController;
pub use error::{GitodoError, Result, StoreError};
pub use events::TodoEvent;
pub use store::TodoStore;
