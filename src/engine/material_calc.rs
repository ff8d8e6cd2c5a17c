// ==========================================
// Система управления строительными сметами - расчёт материалов
// ==========================================
// Назначение: количество и сумма строки материала от объёма работы
// Красная линия: асимметрия округления сохраняется как есть -
// вверх до целого при добавлении и изменении объёма работы,
// round2 при прямом редактировании расхода (не унифицировать)
// ==========================================

use crate::domain::catalog::MaterialTemplate;
use crate::domain::estimate::MaterialLine;
use crate::domain::types::{ceil_quantity, normalize_consumption, round2};
use uuid::Uuid;

// ==========================================
// MaterialCalculator - расчёт материалов
// ==========================================
pub struct MaterialCalculator {
    // движок без состояния
}

impl MaterialCalculator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // Основные методы
    // ==========================================

    /// Новая строка материала из шаблона справочника
    ///
    /// Расход нормализуется вверх до 1 знака до первого использования;
    /// строка создаётся в авто-режиме, количество выводится из объёма работы
    ///
    /// # Параметры
    /// - `template`: шаблон материала из справочника
    /// - `work_quantity`: текущий объём работы-владельца
    ///
    /// # Возвращает
    /// Строка материала с согласованными quantity/total
    pub fn line_from_template(&self, template: &MaterialTemplate, work_quantity: f64) -> MaterialLine {
        let consumption = normalize_consumption(template.consumption);
        let quantity = ceil_quantity(work_quantity, consumption);
        let mut line = MaterialLine {
            id: Uuid::new_v4().to_string(),
            material_id: Some(template.material_id.clone()),
            code: template.material_sku.clone(),
            name: template.material_name.clone(),
            unit: template.material_unit.clone(),
            quantity,
            price: template.material_price,
            total: 0.0,
            consumption,
            auto_calculate: true,
            is_required: false,
            notes: None,
            image: template.show_image.clone(),
        };
        line.recompute_total();
        line
    }

    /// Пересчёт строки после изменения объёма работы-владельца
    ///
    /// Авто-режим: quantity = ceil(объём * расход), сумма пересчитывается.
    /// Ручной режим: quantity не трогается, сумма пересчитывается
    /// от текущей цены (участвует только количество)
    pub fn on_work_quantity_changed(&self, line: &mut MaterialLine, work_quantity: f64) {
        if line.auto_calculate {
            line.quantity = ceil_quantity(work_quantity, line.consumption);
        }
        line.recompute_total();
    }

    /// Прямое изменение расхода
    ///
    /// В авто-режиме количество пересчитывается как round2(объём * расход) -
    /// именно round2, не ceil: существующее поведение этого пути
    pub fn on_consumption_changed(&self, line: &mut MaterialLine, new_consumption: f64, work_quantity: f64) {
        line.consumption = new_consumption;
        if line.auto_calculate {
            line.quantity = round2(work_quantity * new_consumption);
        }
        line.recompute_total();
    }

    /// Прямое изменение количества
    ///
    /// Побочный эффект: строка переводится в ручной режим
    pub fn on_quantity_edited(&self, line: &mut MaterialLine, new_quantity: f64) {
        line.auto_calculate = false;
        line.quantity = new_quantity;
        line.recompute_total();
    }

    /// Изменение цены материала: обновляется только сумма
    pub fn on_price_changed(&self, line: &mut MaterialLine, new_price: f64) {
        line.price = new_price;
        line.recompute_total();
    }
}

// ==========================================
// Default trait
// ==========================================
impl Default for MaterialCalculator {
    fn default() -> Self {
        Self::new()
    }
}
