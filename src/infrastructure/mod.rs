pub mod file_saver;
pub mod form_surface;
pub mod notifier;

pub use file_saver::{DiskFileSaver, FileSaver};
pub use form_surface::{FieldKind, FieldSpec, FormSurface, MemoryForm, Section, SelectOption};
pub use notifier::{MemoryNotifier, Notification, Notifier, Severity, TracingNotifier};
