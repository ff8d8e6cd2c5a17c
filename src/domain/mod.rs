// ==========================================
// Система управления строительными сметами - доменный слой
// ==========================================

pub mod catalog;
pub mod estimate;
pub mod types;

pub use catalog::{MaterialTemplate, WorkTemplate};
pub use estimate::{EstimateMeta, MaterialLine, Section, WorkItem};
pub use types::{ceil_quantity, normalize_consumption, parse_amount, round2};
pub use types::{DEFAULT_PHASE, DEFAULT_SECTION_CODE};
