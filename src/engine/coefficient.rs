// ==========================================
// Система управления строительными сметами - ценовые коэффициенты
// ==========================================
// Назначение: процентная надбавка/скидка ко всем ценам работ
// Красная линия: множитель всегда применяется к исходной цене
// из реестра, никогда к уже скорректированной
// Обе операции - полный проход по дереву, без частичных пересчётов
// ==========================================

use crate::domain::estimate::Section;
use crate::domain::types::round2;
use crate::engine::price_registry::OriginalPriceRegistry;

// ==========================================
// CoefficientEngine - движок коэффициентов
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CoefficientEngine {
    current_percent: f64, // текущий коэффициент (для отображения)
}

impl CoefficientEngine {
    pub fn new() -> Self {
        Self {
            current_percent: 0.0,
        }
    }

    /// Текущий коэффициент
    pub fn current_percent(&self) -> f64 {
        self.current_percent
    }

    /// Применение коэффициента ко всем работам
    ///
    /// Для каждой работы: новая цена = round2(исходная * (1 + percent/100)),
    /// где исходная берётся из реестра (нет записи - текущая цена работы).
    /// Процент не валидируется: 0, отрицательный и большой положительный
    /// одинаково допустимы (отрицательный - скидка).
    pub fn apply(
        &mut self,
        sections: &mut [Section],
        registry: &OriginalPriceRegistry,
        percent: f64,
    ) {
        let factor = 1.0 + percent / 100.0;
        for section in sections.iter_mut() {
            for item in section.items.iter_mut() {
                let base = registry.get(&item.price_key()).unwrap_or(item.price);
                item.price = round2(base * factor);
                item.recompute_total();
            }
            section.recompute_subtotal();
        }
        self.current_percent = percent;
    }

    /// Сброс цен к исходным значениям реестра
    ///
    /// Работы без записи в реестре не меняются.
    /// Текущий коэффициент становится 0.
    pub fn reset(&mut self, sections: &mut [Section], registry: &OriginalPriceRegistry) {
        for section in sections.iter_mut() {
            for item in section.items.iter_mut() {
                if let Some(original) = registry.get(&item.price_key()) {
                    item.price = original;
                    item.recompute_total();
                }
            }
            section.recompute_subtotal();
        }
        self.current_percent = 0.0;
    }
}
