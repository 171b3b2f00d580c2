//! Browsable catalog state.
//!
//! - [`CatalogStore`]: fetched set, live query, and the filtered set derived from them
//! - [`CatalogView`]: source tabs, pagination and render states on top of the store
//! - [`SelectionHolder`]: hands the chosen template to the editor

pub mod selection;
pub mod store;
pub mod view;

pub use selection::{SelectedTemplate, SelectionHolder};
pub use store::{CatalogStore, RequestTicket};
pub use view::{CatalogView, Navigation, SourceFilter, ViewState, PAGE_SIZE};
