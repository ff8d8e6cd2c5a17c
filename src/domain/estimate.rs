// ==========================================
// Система управления строительными сметами - доменная модель сметы
// ==========================================
// Иерархия: Section (раздел/фаза) -> WorkItem (работа) -> MaterialLine (материал)
// Красная линия: материалы НЕ входят в subtotal раздела -
// стоимость материалов учитывается отдельно от стоимости работ
// ==========================================

use crate::domain::types::{round2, DEFAULT_PHASE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// MaterialLine - строка материала работы
// ==========================================
// Авто-режим: quantity = ceil(объём работы * расход)
// Ручной режим: quantity задан пользователем, расход - только метаданные
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub id: String,                    // локальный идентификатор строки
    pub material_id: Option<String>,   // идентификатор материала в справочнике
    pub code: Option<String>,          // артикул (SKU)
    pub name: String,                  // наименование материала
    pub unit: Option<String>,          // единица измерения
    pub quantity: f64,                 // количество (>= 0)
    pub price: f64,                    // цена за единицу (>= 0)
    pub total: f64,                    // сумма = round2(quantity * price)
    pub consumption: f64,              // коэффициент расхода на единицу работы
    pub auto_calculate: bool,          // авто-пересчёт количества от объёма работы
    pub is_required: bool,             // обязательный материал
    pub notes: Option<String>,         // примечания
    pub image: Option<String>,         // изображение (ссылка)
}

impl MaterialLine {
    /// Пересчёт суммы строки
    pub fn recompute_total(&mut self) {
        self.total = round2(self.quantity * self.price);
    }
}

// ==========================================
// WorkItem - работа сметы
// ==========================================
// Идентичность для ценового реестра: work_id, иначе code + "_" + name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,                      // локальный идентификатор строки
    pub work_id: Option<String>,         // идентификатор работы в справочнике
    pub code: String,                    // шифр работы (например "01-002")
    pub name: String,                    // наименование работы
    pub description: Option<String>,     // описание
    pub unit: Option<String>,            // единица измерения
    pub quantity: f64,                   // объём (>= 0)
    pub price: f64,                      // цена за единицу (>= 0)
    pub total: f64,                      // сумма = round2(quantity * price)
    pub phase: Option<String>,           // фаза строительства
    pub section: Option<String>,         // раздел (источник)
    pub subsection: Option<String>,      // подраздел (источник)
    pub materials: Vec<MaterialLine>,    // материалы работы
}

impl WorkItem {
    /// Ценовой ключ работы
    ///
    /// # Возвращает
    /// work_id, если задан и не пуст, иначе "code_name"
    pub fn price_key(&self) -> String {
        match self.work_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}_{}", self.code, self.name),
        }
    }

    /// Фаза работы с подстановкой значения по умолчанию
    pub fn phase_or_default(&self) -> &str {
        match self.phase.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PHASE,
        }
    }

    /// Пересчёт суммы работы
    pub fn recompute_total(&mut self) {
        self.total = round2(self.quantity * self.price);
    }
}

// ==========================================
// Section - раздел сметы (группировка по фазе)
// ==========================================
// Инвариант: subtotal == сумма total всех работ раздела
// (материалы в subtotal не входят)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,                  // локальный идентификатор раздела
    pub code: String,                // код раздела (числовой префикс шифра работы)
    pub title: String,               // название раздела (имя фазы)
    pub items: Vec<WorkItem>,        // работы раздела
    pub subtotal: f64,               // итог раздела по работам
}

impl Section {
    /// Новый пустой раздел
    pub fn new(code: &str, title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            title: title.to_string(),
            items: Vec::new(),
            subtotal: 0.0,
        }
    }

    /// Пересчёт итога раздела (только работы, без материалов)
    pub fn recompute_subtotal(&mut self) {
        self.subtotal = round2(self.items.iter().map(|i| i.total).sum());
    }
}

// ==========================================
// EstimateMeta - метаданные сметы
// ==========================================
// Хранятся и возвращаются как есть, вычисляемых инвариантов нет
// vat_rate / overhead_rate - заглушки (налоги и накладные вне ядра)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateMeta {
    pub name: String,                    // название сметы
    pub estimate_type: Option<String>,   // тип сметы
    pub status: Option<String>,          // статус
    pub description: Option<String>,     // описание
    pub estimate_date: Option<NaiveDate>, // дата сметы
    pub currency: Option<String>,        // валюта
    pub client_name: Option<String>,     // заказчик
    pub contractor_name: Option<String>, // подрядчик
    pub object_address: Option<String>,  // адрес объекта
    pub contract_number: Option<String>, // номер договора
    pub vat_rate: Option<f64>,           // ставка НДС (заглушка)
    pub overhead_rate: Option<f64>,      // накладные расходы (заглушка)
}
