// ==========================================
// Система управления строительными сметами - формы данных хранилища
// ==========================================
// Контракт загрузки: snake_case с историческими дублями полей
// (auto_calculate/autoCalculate, consumption_coefficient/consumption,
// unit_price/price) - дубли читаются парами Option и схлопываются
// в одно каноническое значение методами-аксессорами
// Контракт сохранения: camelCase метаданные + snake_case строки
// (исключение в строке работы: ключ workId)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Контракт загрузки
// ==========================================

/// Смета в плоском представлении хранилища
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub estimate_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimate_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub object_address: Option<String>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub vat_rate: Option<f64>,
    #[serde(default)]
    pub overhead_rate: Option<f64>,
    #[serde(default)]
    pub items: Vec<EstimateItemDto>,
}

/// Строка работы в плоском представлении
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateItemDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub work_id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub final_price: Option<f64>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subsection: Option<String>,
    #[serde(default)]
    pub materials: Vec<EstimateMaterialDto>,
}

/// Строка материала в плоском представлении
///
/// Исторические дубли полей читаются парами Option
/// и схлопываются в канонические значения методами-аксессорами
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateMaterialDto {
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub consumption_coefficient: Option<f64>,
    #[serde(default)]
    pub consumption: Option<f64>,
    #[serde(default)]
    pub auto_calculate: Option<bool>,
    #[serde(default, rename = "autoCalculate")]
    pub auto_calculate_camel: Option<bool>,
    #[serde(default)]
    pub is_required: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl EstimateMaterialDto {
    /// Каноническая цена: unit_price, иначе price, иначе 0
    pub fn canonical_price(&self) -> f64 {
        self.unit_price.or(self.price).unwrap_or(0.0)
    }

    /// Канонический расход: consumption_coefficient, иначе consumption, иначе 0
    pub fn canonical_consumption(&self) -> f64 {
        self.consumption_coefficient
            .or(self.consumption)
            .unwrap_or(0.0)
    }

    /// Канонический режим: auto_calculate, иначе autoCalculate, по умолчанию true
    pub fn canonical_auto(&self) -> bool {
        self.auto_calculate.or(self.auto_calculate_camel).unwrap_or(true)
    }
}

// ==========================================
// Контракт сохранения
// ==========================================

/// Полезная нагрузка сохранения (create и update - одна форма)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEstimateDto {
    pub name: String,
    pub project_id: Option<String>,
    pub estimate_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub estimate_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub client_name: Option<String>,
    pub contractor_name: Option<String>,
    pub object_address: Option<String>,
    pub contract_number: Option<String>,
    pub vat_rate: Option<f64>,
    pub overhead_rate: Option<f64>,
    pub items: Vec<SaveItemDto>,
}

/// Строка работы в полезной нагрузке сохранения
///
/// Исторический контракт: строка snake_case, кроме ключа workId
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveItemDto {
    #[serde(rename = "workId")]
    pub work_id: Option<String>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub final_price: f64,
    pub phase: Option<String>,
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub materials: Vec<SaveMaterialDto>,
}

/// Строка материала в полезной нагрузке сохранения
///
/// Только материалы с разрешённым material_id и положительным количеством
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveMaterialDto {
    pub material_id: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub consumption: f64,
    pub auto_calculate: bool,
    pub is_required: bool,
    pub notes: Option<String>,
}

// ==========================================
// Тесты
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_dto_collapses_duplicate_fields() {
        // Исторический дубль autoCalculate тоже читается
        let json = r#"{
            "material_id": "mat-1",
            "quantity": 3.0,
            "price": 120.5,
            "consumption": 1.5,
            "autoCalculate": false
        }"#;
        let dto: EstimateMaterialDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.canonical_price(), 120.5);
        assert_eq!(dto.canonical_consumption(), 1.5);
        assert!(!dto.canonical_auto());
    }

    #[test]
    fn test_material_dto_prefers_snake_case_fields() {
        let json = r#"{
            "material_id": "mat-1",
            "quantity": 3.0,
            "unit_price": 100.0,
            "price": 120.5,
            "consumption_coefficient": 2.0,
            "consumption": 1.5,
            "auto_calculate": true
        }"#;
        let dto: EstimateMaterialDto = serde_json::from_str(json).unwrap();

        assert_eq!(dto.canonical_price(), 100.0);
        assert_eq!(dto.canonical_consumption(), 2.0);
        assert!(dto.canonical_auto());
    }

    #[test]
    fn test_material_dto_defaults() {
        let dto: EstimateMaterialDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.canonical_price(), 0.0);
        assert_eq!(dto.canonical_consumption(), 0.0);
        assert!(dto.canonical_auto()); // авто-режим по умолчанию
    }

    #[test]
    fn test_save_payload_metadata_is_camel_case() {
        let payload = SaveEstimateDto {
            name: "Смета".to_string(),
            project_id: Some("prj-1".to_string()),
            client_name: Some("ООО Заказчик".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("projectId").is_some());
        assert!(json.get("clientName").is_some());
        assert!(json.get("project_id").is_none());
    }

    #[test]
    fn test_save_item_rows_are_snake_case_except_work_id() {
        // Смешанный исторический контракт строки:
        // идентификатор работы пишется как workId, остальное - snake_case
        let item = SaveItemDto {
            work_id: Some("wrk-1".to_string()),
            code: "01-001".to_string(),
            name: "Работа".to_string(),
            unit_price: 10.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json.get("workId").and_then(|v| v.as_str()), Some("wrk-1"));
        assert!(json.get("work_id").is_none());
        assert!(json.get("unit_price").is_some());
        assert!(json.get("final_price").is_some());
    }
}
