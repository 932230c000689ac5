pub mod app_ctx;
pub mod layout;
pub mod page;
pub mod pipeline;

pub use app_ctx::AppCtx;
pub use layout::{PageLayout, TaxonomyKind};
pub use page::PageController;
pub use pipeline::{GenerationPipeline, ViewState};
