// ==========================================
// Система управления строительными сметами - расчётное ядро
// ==========================================
// Назначение: иерархическая модель сметы (разделы → работы → материалы),
// пересчёт производных сумм, ценовые коэффициенты, плоское представление
// для хранилища
// Позиционирование: ядро без транспорта и UI (коллабораторы внедряются)
// ==========================================

// ==========================================
// Объявление модулей
// ==========================================

// Доменный слой - сущности и типы
pub mod domain;

// Слой движков - бизнес-правила
pub mod engine;

// Маппер хранилища - плоское <-> иерархическое представление
pub mod mapper;

// API слой - сессия редактирования сметы
pub mod api;

// Ошибки
pub mod error;

// Логирование
pub mod logging;

// ==========================================
// Реэкспорт основных типов
// ==========================================

// Доменные сущности
pub use domain::catalog::{MaterialTemplate, WorkTemplate};
pub use domain::estimate::{EstimateMeta, MaterialLine, Section, WorkItem};

// Движки
pub use engine::coefficient::CoefficientEngine;
pub use engine::material_calc::MaterialCalculator;
pub use engine::ordering::compare_work_items;
pub use engine::price_registry::OriginalPriceRegistry;
pub use engine::tree::{EstimateConfig, EstimateTree};

// Маппер хранилища
pub use mapper::dto::{EstimateDto, SaveEstimateDto};
pub use mapper::estimate_mapper::EstimateMapper;

// Порты коллабораторов
pub use engine::ports::{ConfirmationPort, EstimateStore, PriceCatalog, WorkCatalog};

// События
pub use engine::events::{EstimateEvent, EstimateEventPublisher, OptionalEventPublisher};

// API
pub use api::estimate_api::EstimateApi;

// Ошибки
pub use error::{EstimateError, EstimateResult};

// ==========================================
// Константы
// ==========================================

// Версия ядра
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Название системы
pub const APP_NAME: &str = "Система управления строительными сметами";

// ==========================================
// Проверка сборки
// ==========================================
