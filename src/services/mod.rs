pub mod api_client;
pub mod document_store;
pub mod other_field;
pub mod selector;
pub mod validation;

pub use api_client::{GenerationApi, HttpApiClient};
pub use document_store::DocumentStore;
pub use other_field::{OtherField, OTHER_SENTINEL};
pub use selector::{CascadingSelector, ChainField};
pub use validation::{parse_positive, validate_form, validate_required};
