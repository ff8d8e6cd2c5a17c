// ==========================================
// Инициализация логирования
// ==========================================
// Используются tracing и tracing-subscriber
// Уровень логирования настраивается переменной окружения
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Инициализация логирования
///
/// # Переменные окружения
/// - RUST_LOG: фильтр уровня логирования (по умолчанию: info)
///   Например: RUST_LOG=debug или RUST_LOG=smeta_engine=trace
///
/// # Пример
/// ```no_run
/// use smeta_engine::logging;
/// logging::init();
/// ```
pub fn init() {
    // Читаем уровень из окружения, по умолчанию info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Формат вывода
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Инициализация логирования для тестов
///
/// Более подробный уровень, вывод в тестовый writer
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
