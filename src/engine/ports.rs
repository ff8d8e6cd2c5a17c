// ==========================================
// Система управления строительными сметами - порты коллабораторов
// ==========================================
// Назначение: ядро определяет trait, внешние слои реализуют адаптеры
// (HTTP-клиент, справочник, диалог подтверждения)
// Повторов и отмены нет: один запрос - один ответ,
// неудача возвращается вызывающему, дерево не меняется
// ==========================================

use crate::domain::catalog::MaterialTemplate;
use crate::error::EstimateResult;
use crate::mapper::dto::{EstimateDto, SaveEstimateDto};
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// EstimateStore - хранилище смет
// ==========================================

/// Хранилище смет (плоское представление)
///
/// Загрузка возвращает Ok(None) для "смета ещё не создана" -
/// это ожидаемое состояние, не ошибка
#[async_trait]
pub trait EstimateStore: Send + Sync {
    /// Загрузка сметы по идентификатору
    async fn load(&self, estimate_id: &str) -> EstimateResult<Option<EstimateDto>>;

    /// Создание новой сметы
    ///
    /// # Возвращает
    /// Идентификатор, присвоенный хранилищем
    async fn create(&self, payload: &SaveEstimateDto) -> EstimateResult<String>;

    /// Обновление существующей сметы (та же форма данных, что и create)
    async fn update(&self, estimate_id: &str, payload: &SaveEstimateDto) -> EstimateResult<()>;
}

// ==========================================
// WorkCatalog - справочник работ и материалов
// ==========================================

/// Справочник: применимые материалы с коэффициентами расхода
#[async_trait]
pub trait WorkCatalog: Send + Sync {
    /// Материалы для работы по её идентификатору
    async fn materials_for_work(&self, work_id: &str) -> EstimateResult<Vec<MaterialTemplate>>;

    /// Материалы для набора работ
    ///
    /// # Возвращает
    /// work_id -> список шаблонов материалов
    async fn materials_for_works(
        &self,
        work_ids: &[String],
    ) -> EstimateResult<HashMap<String, Vec<MaterialTemplate>>> {
        let lookups = work_ids.iter().map(|id| async move {
            let materials = self.materials_for_work(id).await?;
            Ok::<_, crate::error::EstimateError>((id.clone(), materials))
        });
        let resolved = futures::future::try_join_all(lookups).await?;
        Ok(resolved.into_iter().collect())
    }
}

// ==========================================
// PriceCatalog - фиксация базовой цены
// ==========================================

/// Запись пересмотренной базовой цены в общий справочник
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// Зафиксировать новую базовую цену работы
    async fn commit_base_price(&self, work_id: &str, price: f64) -> EstimateResult<()>;
}

// ==========================================
// ConfirmationPort - подтверждение пользователя
// ==========================================

/// Порт подтверждения (замена блокирующего window.confirm)
///
/// Ядро вызывает и ждёт булев ответ; отказ прерывает операцию
/// без изменения состояния
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Запрос подтверждения у пользователя
    async fn confirm(&self, message: &str) -> bool;
}
