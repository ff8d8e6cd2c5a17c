// ==========================================
// Система управления строительными сметами - сессия редактирования
// ==========================================
// Назначение: фасад одной сессии редактирования сметы -
// загрузка/сохранение через порты, подтверждаемые удаления,
// явные идентификаторы сметы и проекта (не глобальное состояние)
// Модель: однопоточная, мутации синхронны; асинхронны только
// загрузка, сохранение, запросы каталога и фиксация цены
// Между сессиями конфликты не разрешаются: побеждает последнее
// сохранение (известное принятое ограничение)
// ==========================================

use crate::domain::catalog::{MaterialTemplate, WorkTemplate};
use crate::domain::estimate::{EstimateMeta, Section};
use crate::engine::events::EstimateEventPublisher;
use crate::engine::ports::{ConfirmationPort, EstimateStore, PriceCatalog, WorkCatalog};
use crate::engine::tree::EstimateTree;
use crate::error::{EstimateError, EstimateResult};
use crate::mapper::estimate_mapper::EstimateMapper;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// EstimateApi - сессия редактирования сметы
// ==========================================

/// Сессия редактирования сметы
///
/// Ответственность:
/// 1. Загрузка и сохранение через хранилище (create/update - одна форма)
/// 2. Добавление работ с запросом материалов в каталоге (атомарно)
/// 3. Подтверждаемые удаления работ и материалов
/// 4. Фиксация базовой цены в общем справочнике
/// 5. Отслеживание несохранённых изменений
pub struct EstimateApi {
    // Порты коллабораторов
    store: Arc<dyn EstimateStore>,
    catalog: Arc<dyn WorkCatalog>,
    price_catalog: Arc<dyn PriceCatalog>,
    confirmations: Arc<dyn ConfirmationPort>,

    // Состояние сессии
    tree: EstimateTree,
    meta: EstimateMeta,
    estimate_id: Option<String>,
    project_id: Option<String>,
    meta_dirty: bool,
    last_saved: Option<serde_json::Value>,

    // Маппер и издатель событий
    mapper: EstimateMapper,
    event_publisher: Option<Arc<dyn EstimateEventPublisher>>,
}

impl EstimateApi {
    /// Новая сессия с пустым деревом
    pub fn new(
        store: Arc<dyn EstimateStore>,
        catalog: Arc<dyn WorkCatalog>,
        price_catalog: Arc<dyn PriceCatalog>,
        confirmations: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            store,
            catalog,
            price_catalog,
            confirmations,
            tree: EstimateTree::new(),
            meta: EstimateMeta::default(),
            estimate_id: None,
            project_id: None,
            meta_dirty: false,
            last_saved: None,
            mapper: EstimateMapper::new(),
            event_publisher: None,
        }
    }

    /// Подключение издателя событий дерева
    pub fn set_event_publisher(&mut self, publisher: Arc<dyn EstimateEventPublisher>) {
        self.tree.set_event_publisher(publisher.clone());
        self.event_publisher = Some(publisher);
    }

    /// Привязка к проекту (передаётся в полезной нагрузке сохранения)
    pub fn set_project_id(&mut self, project_id: Option<String>) {
        self.project_id = project_id;
    }

    // ==========================================
    // Загрузка и сохранение
    // ==========================================

    /// Загрузка сметы из хранилища
    ///
    /// # Поведение
    /// - Ok(Some): дерево гидратируется, реестр засевается,
    ///   снимок "последнего сохранённого" обновляется
    /// - Ok(None): "смета ещё не создана" - ожидаемое состояние;
    ///   сохранённый идентификатор очищается, дерево пустое, без ошибки
    /// - Err: дерево остаётся пустым, ошибка возвращается вызывающему
    #[instrument(skip(self), fields(estimate_id = %estimate_id))]
    pub async fn load(&mut self, estimate_id: &str) -> EstimateResult<()> {
        if estimate_id.trim().is_empty() {
            return Err(EstimateError::InvalidInput(
                "идентификатор сметы не может быть пустым".to_string(),
            ));
        }

        match self.store.load(estimate_id).await {
            Ok(Some(dto)) => {
                let (meta, sections) = self.mapper.build(dto);
                self.meta = meta;
                self.install_tree(EstimateTree::from_sections(sections));
                self.estimate_id = Some(estimate_id.to_string());
                self.take_snapshot();
                info!(
                    sections = self.tree.sections().len(),
                    "смета загружена"
                );
                Ok(())
            }
            Ok(None) => {
                // Смета ещё не создана - очищаем ссылку, дерево пустое
                warn!("смета не найдена, ссылка очищена");
                self.estimate_id = None;
                self.meta = EstimateMeta::default();
                self.install_tree(EstimateTree::new());
                self.take_snapshot();
                Ok(())
            }
            Err(e) => {
                self.meta = EstimateMeta::default();
                self.install_tree(EstimateTree::new());
                self.last_saved = None;
                Err(e)
            }
        }
    }

    /// Сохранение сметы
    ///
    /// Без идентификатора - create, с идентификатором - update;
    /// форма полезной нагрузки одна. При успехе идентификатор
    /// поглощается, снимок обновляется, флаг изменений снимается.
    /// При неудаче дерево не меняется и флаг остаётся поднятым.
    ///
    /// # Возвращает
    /// Идентификатор сметы (новый или подтверждённый)
    #[instrument(skip(self))]
    pub async fn save(&mut self) -> EstimateResult<String> {
        let payload = self
            .mapper
            .flatten(&self.meta, self.tree.sections(), self.project_id.as_deref());

        let estimate_id = match &self.estimate_id {
            Some(id) => {
                self.store.update(id, &payload).await?;
                id.clone()
            }
            None => {
                let id = self.store.create(&payload).await?;
                self.estimate_id = Some(id.clone());
                id
            }
        };

        self.tree.clear_dirty();
        self.meta_dirty = false;
        self.take_snapshot();
        info!(estimate_id = %estimate_id, "смета сохранена");
        Ok(estimate_id)
    }

    // ==========================================
    // Добавление работ
    // ==========================================

    /// Добавление работ из справочника
    ///
    /// Материалы запрашиваются в каталоге до мутации: при любой
    /// неудаче каталога операция прерывается целиком,
    /// частичной вставки не бывает
    pub async fn add_works(&mut self, works: Vec<WorkTemplate>) -> EstimateResult<usize> {
        if works.is_empty() {
            return Ok(0);
        }

        let work_ids: Vec<String> = works
            .iter()
            .filter_map(|w| w.work_id.clone())
            .filter(|id| !id.is_empty())
            .collect();

        let materials = if work_ids.is_empty() {
            HashMap::new()
        } else {
            self.catalog.materials_for_works(&work_ids).await?
        };

        Ok(self.tree.add_works(works, &materials))
    }

    // ==========================================
    // Подтверждаемые удаления
    // ==========================================

    /// Удаление работы с подтверждением
    ///
    /// # Возвращает
    /// - Ok(true): подтверждено и удалено
    /// - Ok(false): пользователь отказался, состояние не изменилось
    pub async fn remove_work(&mut self, section_idx: usize, item_idx: usize) -> EstimateResult<bool> {
        let name = self
            .tree
            .sections()
            .get(section_idx)
            .and_then(|s| s.items.get(item_idx))
            .map(|i| i.name.clone())
            .ok_or_else(|| EstimateError::InvalidInput("работа не найдена".to_string()))?;

        let message = format!("Удалить работу «{}»?", name);
        if !self.confirmations.confirm(&message).await {
            return Ok(false);
        }

        Ok(self.tree.remove_work(section_idx, item_idx))
    }

    /// Удаление материала с подтверждением
    pub async fn remove_material(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
    ) -> EstimateResult<bool> {
        let name = self
            .tree
            .sections()
            .get(section_idx)
            .and_then(|s| s.items.get(item_idx))
            .and_then(|i| i.materials.get(material_idx))
            .map(|m| m.name.clone())
            .ok_or_else(|| EstimateError::InvalidInput("материал не найден".to_string()))?;

        let message = format!("Удалить материал «{}»?", name);
        if !self.confirmations.confirm(&message).await {
            return Ok(false);
        }

        Ok(self.tree.remove_material(section_idx, item_idx, material_idx))
    }

    // ==========================================
    // Фиксация базовой цены
    // ==========================================

    /// Отправка текущей цены работы в общий справочник
    ///
    /// Реестр исходных цен обновляется только после успешной записи
    /// в справочник - сброс коэффициента затем идёт к новому якорю
    pub async fn commit_base_price(
        &mut self,
        section_idx: usize,
        item_idx: usize,
    ) -> EstimateResult<()> {
        let (work_id, key, price) = {
            let item = self
                .tree
                .sections()
                .get(section_idx)
                .and_then(|s| s.items.get(item_idx))
                .ok_or_else(|| EstimateError::InvalidInput("работа не найдена".to_string()))?;
            let work_id = item
                .work_id
                .clone()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    EstimateError::InvalidInput(
                        "у работы нет идентификатора справочника".to_string(),
                    )
                })?;
            (work_id, item.price_key(), item.price)
        };

        self.price_catalog.commit_base_price(&work_id, price).await?;
        self.tree.commit_original_price(&key, price);
        info!(work_id = %work_id, price, "базовая цена зафиксирована");
        Ok(())
    }

    // ==========================================
    // Синхронные мутации (делегирование дереву)
    // ==========================================

    pub fn update_work_quantity(&mut self, s: usize, i: usize, input: Option<&str>) -> bool {
        self.tree.update_work_quantity(s, i, input)
    }

    pub fn update_work_price(&mut self, s: usize, i: usize, input: Option<&str>) -> bool {
        self.tree.update_work_price(s, i, input)
    }

    pub fn add_material(&mut self, s: usize, i: usize, template: &MaterialTemplate) -> bool {
        self.tree.add_material(s, i, template)
    }

    pub fn replace_material(
        &mut self,
        s: usize,
        i: usize,
        m: usize,
        template: &MaterialTemplate,
    ) -> bool {
        self.tree.replace_material(s, i, m, template)
    }

    pub fn update_material_consumption(
        &mut self,
        s: usize,
        i: usize,
        m: usize,
        input: Option<&str>,
    ) -> bool {
        self.tree.update_material_consumption(s, i, m, input)
    }

    pub fn update_material_quantity(
        &mut self,
        s: usize,
        i: usize,
        m: usize,
        input: Option<&str>,
    ) -> bool {
        self.tree.update_material_quantity(s, i, m, input)
    }

    pub fn update_material_price(
        &mut self,
        s: usize,
        i: usize,
        m: usize,
        input: Option<&str>,
    ) -> bool {
        self.tree.update_material_price(s, i, m, input)
    }

    pub fn apply_coefficient(&mut self, percent: f64) {
        self.tree.apply_coefficient(percent);
    }

    pub fn reset_coefficient(&mut self) {
        self.tree.reset_coefficient();
    }

    /// Очистка сметы (пустой список разделов)
    pub fn clear_estimate(&mut self) {
        self.tree.clear();
    }

    /// Обновление метаданных сметы
    pub fn update_meta(&mut self, update: impl FnOnce(&mut EstimateMeta)) {
        update(&mut self.meta);
        self.meta_dirty = true;
    }

    // ==========================================
    // Доступ к состоянию
    // ==========================================

    pub fn sections(&self) -> &[Section] {
        self.tree.sections()
    }

    pub fn meta(&self) -> &EstimateMeta {
        &self.meta
    }

    pub fn estimate_id(&self) -> Option<&str> {
        self.estimate_id.as_deref()
    }

    pub fn current_coefficient(&self) -> f64 {
        self.tree.current_coefficient()
    }

    pub fn grand_total(&self) -> f64 {
        self.tree.grand_total()
    }

    /// Исходная цена работы из реестра
    pub fn original_price(&self, key: &str) -> Option<f64> {
        self.tree.registry().get(key)
    }

    /// Есть ли несохранённые изменения
    pub fn has_unsaved_changes(&self) -> bool {
        self.tree.is_dirty() || self.meta_dirty
    }

    /// Структурное сравнение с последним сохранённым снимком
    ///
    /// Без снимка (сессия ещё не загружалась и не сохранялась)
    /// отличием считается любое непустое дерево или правка метаданных
    pub fn differs_from_saved(&self) -> bool {
        match &self.last_saved {
            Some(snapshot) => self.state_snapshot() != *snapshot,
            None => self.meta_dirty || !self.tree.sections().is_empty(),
        }
    }

    // ==========================================
    // Вспомогательные методы
    // ==========================================

    /// Установка нового дерева с переподключением издателя событий
    fn install_tree(&mut self, mut tree: EstimateTree) {
        if let Some(publisher) = &self.event_publisher {
            tree.set_event_publisher(publisher.clone());
        }
        self.tree = tree;
        self.meta_dirty = false;
    }

    /// Снимок текущего состояния (метаданные + разделы)
    fn state_snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "meta": &self.meta,
            "sections": self.tree.sections(),
        })
    }

    fn take_snapshot(&mut self) {
        self.last_saved = Some(self.state_snapshot());
    }
}
