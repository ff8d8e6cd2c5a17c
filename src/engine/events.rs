// ==========================================
// Система управления строительными сметами - события изменения дерева
// ==========================================
// Назначение: trait публикации событий, инверсия зависимостей
// Ядро определяет trait, оболочка (UI) реализует адаптер
// Публикация синхронная, в момент мутации
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// Типы событий
// ==========================================

/// Событие изменения дерева сметы
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateEvent {
    /// Добавлены работы
    WorksAdded,
    /// Изменён объём работы
    WorkQuantityChanged,
    /// Изменена цена работы
    WorkPriceChanged,
    /// Работа удалена
    WorkRemoved,
    /// Изменён состав или параметры материалов
    MaterialsChanged,
    /// Применён или сброшен коэффициент
    CoefficientChanged,
    /// Смета очищена
    EstimateCleared,
}

impl EstimateEvent {
    /// Строковый идентификатор события
    pub fn as_str(&self) -> &str {
        match self {
            EstimateEvent::WorksAdded => "WorksAdded",
            EstimateEvent::WorkQuantityChanged => "WorkQuantityChanged",
            EstimateEvent::WorkPriceChanged => "WorkPriceChanged",
            EstimateEvent::WorkRemoved => "WorkRemoved",
            EstimateEvent::MaterialsChanged => "MaterialsChanged",
            EstimateEvent::CoefficientChanged => "CoefficientChanged",
            EstimateEvent::EstimateCleared => "EstimateCleared",
        }
    }
}

// ==========================================
// Trait публикации
// ==========================================

/// Издатель событий дерева сметы
///
/// Ядро определяет trait, оболочка реализует
/// (например, пометка "есть несохранённые изменения" в UI)
pub trait EstimateEventPublisher: Send + Sync {
    /// Публикация события (синхронно)
    fn publish(&self, event: EstimateEvent);
}

// ==========================================
// OptionalEventPublisher - опциональная обёртка
// ==========================================

/// Обёртка над опциональным издателем
///
/// Без издателя публикация - no-op; дерево не обязано знать,
/// подключена ли оболочка
#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn EstimateEventPublisher>>,
}

impl OptionalEventPublisher {
    /// Без издателя
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// С издателем
    pub fn with_publisher(publisher: Arc<dyn EstimateEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// Публикация события, если издатель подключён
    pub fn publish(&self, event: EstimateEvent) {
        if let Some(publisher) = &self.inner {
            publisher.publish(event);
        }
    }
}
