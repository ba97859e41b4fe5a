pub mod base_date;
pub mod event_kind;
pub mod local_key;
pub mod quantity;
pub mod text_input;

pub use base_date::BaseDate;
pub use event_kind::EventKind;
pub use local_key::LocalKey;
pub use quantity::{Quantity, coerce_count};
pub use text_input::TextInput;
