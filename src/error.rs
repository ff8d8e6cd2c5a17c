// ==========================================
// Система управления строительными сметами - типы ошибок
// ==========================================
// Инструмент: derive-макрос thiserror
// Политика: ядро не глотает ошибки коллабораторов молча;
// единственное исключение - "смета ещё не создана" при загрузке
// (моделируется как Ok(None) хранилища, а не как ошибка)
// ==========================================

use thiserror::Error;

/// Ошибки расчётного ядра
#[derive(Error, Debug)]
pub enum EstimateError {
    // ===== Ошибки ввода =====
    #[error("Некорректный ввод: {0}")]
    InvalidInput(String),

    #[error("Не найдено: {entity} с id={id}")]
    NotFound { entity: String, id: String },

    // ===== Ошибки коллабораторов =====
    #[error("Ошибка хранилища смет: {0}")]
    Store(String),

    #[error("Ошибка справочника работ и материалов: {0}")]
    Catalog(String),

    #[error("Ошибка фиксации базовой цены: {0}")]
    PriceCommit(String),

    // ===== Общие ошибки =====
    #[error("Внутренняя ошибка: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Псевдоним Result
pub type EstimateResult<T> = Result<T, EstimateError>;
