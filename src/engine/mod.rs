// ==========================================
// Система управления строительными сметами - слой движков
// ==========================================
// coefficient    - ценовые коэффициенты относительно исходных цен
// events         - события изменения дерева (инверсия зависимостей)
// material_calc  - расчёт количеств и сумм материалов
// ordering       - детерминированный порядок работ
// ports          - порты коллабораторов (хранилище, каталог, подтверждение)
// price_registry - реестр исходных цен (первая запись побеждает)
// tree           - дерево сметы, основной изменяемый агрегат
// ==========================================

pub mod coefficient;
pub mod events;
pub mod material_calc;
pub mod ordering;
pub mod ports;
pub mod price_registry;
pub mod tree;

pub use coefficient::CoefficientEngine;
pub use events::{EstimateEvent, EstimateEventPublisher, OptionalEventPublisher};
pub use material_calc::MaterialCalculator;
pub use ordering::compare_work_items;
pub use ports::{ConfirmationPort, EstimateStore, PriceCatalog, WorkCatalog};
pub use price_registry::OriginalPriceRegistry;
pub use tree::{EstimateConfig, EstimateTree};
