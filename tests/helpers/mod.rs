// ==========================================
// Тестовые помощники: моки портов и сборка окружения
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use smeta_engine::domain::catalog::{MaterialTemplate, WorkTemplate};
use smeta_engine::engine::ports::{ConfirmationPort, EstimateStore, PriceCatalog, WorkCatalog};
use smeta_engine::error::{EstimateError, EstimateResult};
use smeta_engine::mapper::dto::{
    EstimateDto, EstimateItemDto, EstimateMaterialDto, SaveEstimateDto,
};
use smeta_engine::EstimateApi;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==========================================
// Хранилище смет в памяти
// ==========================================

/// Хранилище в памяти: create присваивает "est-N", update перезаписывает.
/// Сохранённая полезная нагрузка возвращается при следующей загрузке
/// в плоской форме (эхо-хранилище)
pub struct InMemoryEstimateStore {
    estimates: Mutex<HashMap<String, EstimateDto>>,
    next_id: AtomicUsize,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    pub save_calls: AtomicUsize,
}

impl InMemoryEstimateStore {
    pub fn new() -> Self {
        Self {
            estimates: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            fail_load: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            save_calls: AtomicUsize::new(0),
        }
    }

    /// Предзаполнение хранилища для тестов загрузки
    pub fn seed(&self, estimate_id: &str, dto: EstimateDto) {
        self.estimates
            .lock()
            .unwrap()
            .insert(estimate_id.to_string(), dto);
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, estimate_id: &str) -> Option<EstimateDto> {
        self.estimates.lock().unwrap().get(estimate_id).cloned()
    }

    /// Плоская форма сохранения -> плоская форма загрузки
    fn echo(payload: &SaveEstimateDto) -> EstimateDto {
        EstimateDto {
            name: payload.name.clone(),
            estimate_type: payload.estimate_type.clone(),
            status: payload.status.clone(),
            description: payload.description.clone(),
            estimate_date: payload.estimate_date,
            currency: payload.currency.clone(),
            client_name: payload.client_name.clone(),
            contractor_name: payload.contractor_name.clone(),
            object_address: payload.object_address.clone(),
            contract_number: payload.contract_number.clone(),
            vat_rate: payload.vat_rate,
            overhead_rate: payload.overhead_rate,
            items: payload
                .items
                .iter()
                .map(|item| EstimateItemDto {
                    id: None,
                    work_id: item.work_id.clone(),
                    code: item.code.clone(),
                    name: item.name.clone(),
                    description: item.description.clone(),
                    unit: item.unit.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    final_price: Some(item.final_price),
                    phase: item.phase.clone(),
                    section: item.section.clone(),
                    subsection: item.subsection.clone(),
                    materials: item
                        .materials
                        .iter()
                        .map(|m| EstimateMaterialDto {
                            material_id: Some(m.material_id.clone()),
                            quantity: m.quantity,
                            unit_price: Some(m.unit_price),
                            consumption_coefficient: Some(m.consumption),
                            auto_calculate: Some(m.auto_calculate),
                            is_required: Some(m.is_required),
                            notes: m.notes.clone(),
                            ..Default::default()
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl EstimateStore for InMemoryEstimateStore {
    async fn load(&self, estimate_id: &str) -> EstimateResult<Option<EstimateDto>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(EstimateError::Store("хранилище недоступно".to_string()));
        }
        Ok(self.estimates.lock().unwrap().get(estimate_id).cloned())
    }

    async fn create(&self, payload: &SaveEstimateDto) -> EstimateResult<String> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(EstimateError::Store("запись отклонена".to_string()));
        }
        let id = format!("est-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.estimates
            .lock()
            .unwrap()
            .insert(id.clone(), Self::echo(payload));
        Ok(id)
    }

    async fn update(&self, estimate_id: &str, payload: &SaveEstimateDto) -> EstimateResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(EstimateError::Store("запись отклонена".to_string()));
        }
        self.estimates
            .lock()
            .unwrap()
            .insert(estimate_id.to_string(), Self::echo(payload));
        Ok(())
    }
}

// ==========================================
// Справочник работ
// ==========================================

/// Статический справочник: материалы по work_id из заранее заданной карты
pub struct StaticWorkCatalog {
    materials: HashMap<String, Vec<MaterialTemplate>>,
}

impl StaticWorkCatalog {
    pub fn empty() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    pub fn with_materials(materials: HashMap<String, Vec<MaterialTemplate>>) -> Self {
        Self { materials }
    }
}

#[async_trait]
impl WorkCatalog for StaticWorkCatalog {
    async fn materials_for_work(&self, work_id: &str) -> EstimateResult<Vec<MaterialTemplate>> {
        Ok(self.materials.get(work_id).cloned().unwrap_or_default())
    }
}

/// Справочник, отвечающий ошибкой на любой запрос
pub struct FailingWorkCatalog;

#[async_trait]
impl WorkCatalog for FailingWorkCatalog {
    async fn materials_for_work(&self, _work_id: &str) -> EstimateResult<Vec<MaterialTemplate>> {
        Err(EstimateError::Catalog("справочник недоступен".to_string()))
    }
}

// ==========================================
// Справочник базовых цен
// ==========================================

/// Записывает фиксации цен; по флагу отвечает ошибкой
pub struct RecordingPriceCatalog {
    pub commits: Mutex<Vec<(String, f64)>>,
    fail: AtomicBool,
}

impl RecordingPriceCatalog {
    pub fn new() -> Self {
        Self {
            commits: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PriceCatalog for RecordingPriceCatalog {
    async fn commit_base_price(&self, work_id: &str, price: f64) -> EstimateResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EstimateError::PriceCommit(
                "справочник цен недоступен".to_string(),
            ));
        }
        self.commits
            .lock()
            .unwrap()
            .push((work_id.to_string(), price));
        Ok(())
    }
}

// ==========================================
// Подтверждения
// ==========================================

/// Фиксированный ответ на подтверждение, последнее сообщение записывается
pub struct ScriptedConfirmations {
    answer: AtomicBool,
    pub last_message: Mutex<Option<String>>,
}

impl ScriptedConfirmations {
    pub fn accepting() -> Self {
        Self {
            answer: AtomicBool::new(true),
            last_message: Mutex::new(None),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: AtomicBool::new(false),
            last_message: Mutex::new(None),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirmations {
    async fn confirm(&self, message: &str) -> bool {
        *self.last_message.lock().unwrap() = Some(message.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

// ==========================================
// Тестовое окружение
// ==========================================

/// Сессия с моками всех портов
pub struct ApiTestEnv {
    pub api: EstimateApi,
    pub store: Arc<InMemoryEstimateStore>,
    pub price_catalog: Arc<RecordingPriceCatalog>,
    pub confirmations: Arc<ScriptedConfirmations>,
}

impl ApiTestEnv {
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(StaticWorkCatalog::empty()))
    }

    pub fn with_catalog(catalog: Arc<dyn WorkCatalog>) -> Self {
        let store = Arc::new(InMemoryEstimateStore::new());
        let price_catalog = Arc::new(RecordingPriceCatalog::new());
        let confirmations = Arc::new(ScriptedConfirmations::accepting());
        let api = EstimateApi::new(
            store.clone(),
            catalog,
            price_catalog.clone(),
            confirmations.clone(),
        );
        Self {
            api,
            store,
            price_catalog,
            confirmations,
        }
    }
}

// ==========================================
// Построители тестовых данных
// ==========================================

pub fn work_template(code: &str, name: &str, phase: Option<&str>, price: f64) -> WorkTemplate {
    WorkTemplate {
        work_id: Some(format!("wrk-{}", code)),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        unit: Some("м2".to_string()),
        price,
        phase: phase.map(|s| s.to_string()),
        section: None,
        subsection: None,
    }
}

pub fn material_template(material_id: &str, name: &str, consumption: f64, price: f64) -> MaterialTemplate {
    MaterialTemplate {
        material_id: material_id.to_string(),
        material_sku: Some(format!("SKU-{}", material_id)),
        material_name: name.to_string(),
        material_unit: Some("кг".to_string()),
        material_price: price,
        consumption,
        show_image: None,
    }
}

pub fn item_dto(code: &str, phase: Option<&str>, quantity: f64, price: f64) -> EstimateItemDto {
    EstimateItemDto {
        id: None,
        work_id: Some(format!("wrk-{}", code)),
        code: code.to_string(),
        name: format!("Работа {}", code),
        description: None,
        unit: Some("м2".to_string()),
        quantity,
        unit_price: price,
        final_price: None,
        phase: phase.map(|s| s.to_string()),
        section: None,
        subsection: None,
        materials: Vec::new(),
    }
}
