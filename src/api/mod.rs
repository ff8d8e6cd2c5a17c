// ==========================================
// Система управления строительными сметами - API слой
// ==========================================

pub mod estimate_api;

pub use estimate_api::EstimateApi;
