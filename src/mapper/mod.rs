// ==========================================
// Система управления строительными сметами - маппер хранилища
// ==========================================
// Единственный шов трансляции внешней формы:
// плоский список работ с материалами <-> дерево разделов
// ==========================================

pub mod dto;
pub mod estimate_mapper;

pub use dto::{
    EstimateDto, EstimateItemDto, EstimateMaterialDto, SaveEstimateDto, SaveItemDto,
    SaveMaterialDto,
};
pub use estimate_mapper::EstimateMapper;
