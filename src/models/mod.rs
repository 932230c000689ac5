pub mod loaders;
pub mod request;
pub mod response;
pub mod submission;
pub mod taxonomy;
pub mod variant;

pub use loaders::{load_all_submissions, load_submission, load_taxonomy};
pub use request::{ExportRequest, GenerationRequest};
pub use response::{ErrorBody, GeneratedDocument, GenerationResponse, HealthStatus};
pub use submission::{FieldValue, Submission};
pub use taxonomy::Taxonomy;
pub use variant::FormVariant;
