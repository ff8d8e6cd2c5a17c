// ==========================================
// Система управления строительными сметами - шаблоны справочника
// ==========================================
// Назначение: формы данных, приходящие от справочника работ и материалов
// Жизненный цикл: только на входе add_works / add_material
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// WorkTemplate - работа из справочника
// ==========================================
// Вход операции add_works: новая работа добавляется с нулевым объёмом
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTemplate {
    pub work_id: Option<String>,     // идентификатор работы в справочнике
    pub code: String,                // шифр работы
    pub name: String,                // наименование
    pub description: Option<String>, // описание
    pub unit: Option<String>,        // единица измерения
    pub price: f64,                  // базовая цена за единицу
    pub phase: Option<String>,       // фаза строительства
    pub section: Option<String>,     // раздел (источник)
    pub subsection: Option<String>,  // подраздел (источник)
}

// ==========================================
// MaterialTemplate - материал из справочника
// ==========================================
// Возвращается каталогом по идентификатору работы
// вместе с коэффициентом расхода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTemplate {
    pub material_id: String,             // идентификатор материала
    pub material_sku: Option<String>,    // артикул
    pub material_name: String,           // наименование
    pub material_unit: Option<String>,   // единица измерения
    pub material_price: f64,             // цена за единицу
    pub consumption: f64,                // расход на единицу работы
    pub show_image: Option<String>,      // изображение (ссылка)
}
