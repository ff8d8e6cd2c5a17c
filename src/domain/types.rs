// ==========================================
// Система управления строительными сметами - общие типы и числовая политика
// ==========================================
// Все денежные суммы округляются до 2 знаков
// Количества авто-материалов округляются вверх до целого
// Расход при добавлении нормализуется вверх до 1 знака
// ==========================================

/// Фаза по умолчанию для работ без фазы
pub const DEFAULT_PHASE: &str = "Без фазы";

/// Код раздела по умолчанию (работа без числового префикса кода)
pub const DEFAULT_SECTION_CODE: &str = "00";

/// Округление денежной суммы до 2 знаков
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Количество авто-материала: объём работы * расход, вверх до целого
pub fn ceil_quantity(work_quantity: f64, consumption: f64) -> f64 {
    (work_quantity * consumption).ceil()
}

/// Нормализация расхода из справочника: вверх до 1 знака
///
/// Применяется один раз - при первом добавлении материала к работе,
/// чтобы не тащить лишнюю точность справочных данных
pub fn normalize_consumption(raw: f64) -> f64 {
    (raw * 10.0).ceil() / 10.0
}

/// Разбор пользовательского ввода количества/цены
///
/// # Правила (молчаливая валидация)
/// - None или пустая строка -> Some(0.0) ("очистить в ноль")
/// - корректное неотрицательное число -> Some(число)
/// - нечисловой или отрицательный ввод -> None (операция no-op)
pub fn parse_amount(input: Option<&str>) -> Option<f64> {
    let raw = match input {
        None => return Some(0.0),
        Some(s) => s.trim(),
    };
    if raw.is_empty() {
        return Some(0.0);
    }
    // Допускаем запятую как десятичный разделитель
    let normalized = raw.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

// ==========================================
// Тесты
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1100.0000000000002), 1100.0);
        assert_eq!(round2(16.108), 16.11);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_ceil_quantity() {
        // Сценарий из постановки: 5 * 2.3 = 11.5 -> 12, 7 * 2.3 = 16.1 -> 17
        assert_eq!(ceil_quantity(5.0, 2.3), 12.0);
        assert_eq!(ceil_quantity(7.0, 2.3), 17.0);
        assert_eq!(ceil_quantity(0.0, 2.3), 0.0);
    }

    #[test]
    fn test_normalize_consumption() {
        assert_eq!(normalize_consumption(2.34), 2.4);
        assert_eq!(normalize_consumption(2.3), 2.3);
        assert_eq!(normalize_consumption(0.0), 0.0);
    }

    #[test]
    fn test_parse_amount_blank_is_zero() {
        assert_eq!(parse_amount(None), Some(0.0));
        assert_eq!(parse_amount(Some("")), Some(0.0));
        assert_eq!(parse_amount(Some("   ")), Some(0.0));
    }

    #[test]
    fn test_parse_amount_valid() {
        assert_eq!(parse_amount(Some("12.5")), Some(12.5));
        assert_eq!(parse_amount(Some("12,5")), Some(12.5));
        assert_eq!(parse_amount(Some(" 0 ")), Some(0.0));
    }

    #[test]
    fn test_parse_amount_invalid_is_noop() {
        assert_eq!(parse_amount(Some("abc")), None);
        assert_eq!(parse_amount(Some("-3")), None);
        assert_eq!(parse_amount(Some("NaN")), None);
        assert_eq!(parse_amount(Some("inf")), None);
    }
}
