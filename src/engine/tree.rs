// ==========================================
// Система управления строительными сметами - дерево сметы
// ==========================================
// Назначение: основной изменяемый агрегат
// (разделы -> работы -> материалы) и все операции мутации
// Красные линии:
// - ни одна операция не оставляет нарушенным инвариант subtotal
// - материалы не входят в subtotal раздела
// - редактирование цены работы не трогает реестр исходных цен
// Каждая мутация поднимает флаг изменений и публикует событие
// ==========================================

use crate::domain::catalog::{MaterialTemplate, WorkTemplate};
use crate::domain::estimate::{MaterialLine, Section, WorkItem};
use crate::domain::types::{parse_amount, round2, DEFAULT_PHASE, DEFAULT_SECTION_CODE};
use crate::engine::coefficient::CoefficientEngine;
use crate::engine::events::{EstimateEvent, EstimateEventPublisher, OptionalEventPublisher};
use crate::engine::material_calc::MaterialCalculator;
use crate::engine::ordering::compare_work_items;
use crate::engine::price_registry::OriginalPriceRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// EstimateConfig - конфигурация дерева
// ==========================================
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub default_phase: String,        // фаза по умолчанию: "Без фазы"
    pub default_section_code: String, // код раздела по умолчанию: "00"
    pub auto_calculate_default: bool, // новые материалы в авто-режиме: true
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            default_phase: DEFAULT_PHASE.to_string(),
            default_section_code: DEFAULT_SECTION_CODE.to_string(),
            auto_calculate_default: true,
        }
    }
}

// ==========================================
// EstimateTree - дерево сметы
// ==========================================
pub struct EstimateTree {
    // Состояние
    sections: Vec<Section>,
    registry: OriginalPriceRegistry,
    coefficient: CoefficientEngine,
    dirty: bool,

    // Конфигурация и события
    config: EstimateConfig,
    event_publisher: OptionalEventPublisher,
}

impl EstimateTree {
    /// Пустое дерево
    pub fn new() -> Self {
        Self::with_config(EstimateConfig::default(), None)
    }

    /// Дерево с конфигурацией и издателем событий
    pub fn with_config(
        config: EstimateConfig,
        event_publisher: Option<Arc<dyn EstimateEventPublisher>>,
    ) -> Self {
        let event_publisher = match event_publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };

        Self {
            sections: Vec::new(),
            registry: OriginalPriceRegistry::new(),
            coefficient: CoefficientEngine::new(),
            dirty: false,
            config,
            event_publisher,
        }
    }

    /// Дерево из загруженных разделов
    ///
    /// Реестр исходных цен засевается из всех работ;
    /// флаг изменений сброшен (дерево совпадает с сохранённым)
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut tree = Self::new();
        tree.sections = sections;
        let items = tree.sections.iter().flat_map(|s| s.items.iter());
        tree.registry.seed(items);
        tree
    }

    // ==========================================
    // Доступ к состоянию
    // ==========================================

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn registry(&self) -> &OriginalPriceRegistry {
        &self.registry
    }

    pub fn current_coefficient(&self) -> f64 {
        self.coefficient.current_percent()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Сброс флага изменений (после успешного сохранения)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Подключение издателя событий
    pub fn set_event_publisher(&mut self, publisher: Arc<dyn EstimateEventPublisher>) {
        self.event_publisher = OptionalEventPublisher::with_publisher(publisher);
    }

    /// Итог по всем разделам (только работы)
    pub fn grand_total(&self) -> f64 {
        round2(self.sections.iter().map(|s| s.subtotal).sum())
    }

    // ==========================================
    // Добавление работ
    // ==========================================

    /// Добавление работ из справочника
    ///
    /// # Параметры
    /// - `works`: шаблоны работ
    /// - `materials_by_work`: материалы справочника по work_id
    ///   (поиск выполняется вызывающим до мутации - при неудаче
    ///   каталога ни одна работа не вставляется)
    ///
    /// # Шаги
    /// 1. Раздел подбирается по фазе (создаётся при отсутствии,
    ///    код - числовой префикс шифра работы)
    /// 2. Работа создаётся с нулевым объёмом, материалы - с нулевым
    ///    количеством в авто-режиме
    /// 3. Вставка с пересортировкой работ раздела, пересчёт итога
    /// 4. Разделы пересортировываются по коду
    /// 5. Реестр исходных цен засевается из всех текущих работ
    pub fn add_works(
        &mut self,
        works: Vec<WorkTemplate>,
        materials_by_work: &HashMap<String, Vec<MaterialTemplate>>,
    ) -> usize {
        let added = works.len();
        let calc = MaterialCalculator::new();
        for template in works {
            let materials = template
                .work_id
                .as_ref()
                .and_then(|id| materials_by_work.get(id))
                .map(|templates| {
                    templates
                        .iter()
                        .map(|t| {
                            let mut line = calc.line_from_template(t, 0.0);
                            line.auto_calculate = self.config.auto_calculate_default;
                            line
                        })
                        .collect()
                })
                .unwrap_or_default();

            let item = WorkItem {
                id: Uuid::new_v4().to_string(),
                work_id: template.work_id,
                code: template.code,
                name: template.name,
                description: template.description,
                unit: template.unit,
                quantity: 0.0,
                price: template.price,
                total: 0.0,
                phase: template.phase,
                section: template.section,
                subsection: template.subsection,
                materials,
            };

            let section_idx = self.resolve_section(&item);
            let section = &mut self.sections[section_idx];
            section.items.push(item);
            section.items.sort_by(compare_work_items);
            section.recompute_subtotal();
        }

        self.sections.sort_by(|a, b| a.code.cmp(&b.code));
        let items = self.sections.iter().flat_map(|s| s.items.iter());
        self.registry.seed(items);

        tracing::debug!(added, "добавлены работы из справочника");
        self.mark_changed(EstimateEvent::WorksAdded);
        added
    }

    /// Раздел для работы: поиск по фазе, создание при отсутствии
    fn resolve_section(&mut self, item: &WorkItem) -> usize {
        let title = item.phase_or_default().to_string();
        if let Some(idx) = self.sections.iter().position(|s| s.title == title) {
            return idx;
        }

        let code = Self::section_code_from(&item.code, &self.config.default_section_code);
        self.sections.push(Section::new(&code, &title));
        self.sections.len() - 1
    }

    /// Код раздела: ведущий сегмент шифра работы (разделители '-' и '–')
    fn section_code_from(code: &str, default: &str) -> String {
        let lead = code.split(['-', '–']).next().unwrap_or("").trim();
        if lead.is_empty() {
            default.to_string()
        } else {
            lead.to_string()
        }
    }

    // ==========================================
    // Мутации работ
    // ==========================================

    /// Изменение объёма работы
    ///
    /// # Правила ввода
    /// - None / пустая строка: "очистить в ноль" - объём и сумма работы
    ///   обнуляются, авто-материалы обнуляются, ручные сохраняют
    ///   количество (пересчитывается только сумма)
    /// - корректное неотрицательное число: применяется с каскадом
    ///   в материалы
    /// - нечисловой или отрицательный ввод: no-op
    ///
    /// # Возвращает
    /// true, если состояние изменилось
    pub fn update_work_quantity(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        input: Option<&str>,
    ) -> bool {
        let quantity = match parse_amount(input) {
            Some(v) => v,
            None => return false,
        };
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };

        item.quantity = quantity;
        item.recompute_total();

        let calc = MaterialCalculator::new();
        for line in item.materials.iter_mut() {
            calc.on_work_quantity_changed(line, quantity);
        }

        self.sections[section_idx].recompute_subtotal();
        self.mark_changed(EstimateEvent::WorkQuantityChanged);
        true
    }

    /// Изменение цены работы
    ///
    /// Пересчитываются сумма работы и итог раздела.
    /// Реестр исходных цен НЕ трогается: якорь меняется только
    /// посевом или явной фиксацией, иначе сброс коэффициента
    /// терял бы смысл после ручных правок цены
    pub fn update_work_price(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        input: Option<&str>,
    ) -> bool {
        let price = match parse_amount(input) {
            Some(v) => v,
            None => return false,
        };
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };

        item.price = price;
        item.recompute_total();

        self.sections[section_idx].recompute_subtotal();
        self.mark_changed(EstimateEvent::WorkPriceChanged);
        true
    }

    /// Удаление работы (подтверждение - на вызывающем)
    ///
    /// Опустевший раздел удаляется целиком
    pub fn remove_work(&mut self, section_idx: usize, item_idx: usize) -> bool {
        match self.sections.get_mut(section_idx) {
            Some(s) if item_idx < s.items.len() => {
                s.items.remove(item_idx);
            }
            _ => return false,
        }

        if self.sections[section_idx].items.is_empty() {
            self.sections.remove(section_idx);
        } else {
            self.sections[section_idx].recompute_subtotal();
        }

        self.mark_changed(EstimateEvent::WorkRemoved);
        true
    }

    // ==========================================
    // Мутации материалов
    // ==========================================
    // Ни одна из них не меняет subtotal раздела:
    // стоимость материалов учитывается отдельно от стоимости работ

    /// Добавление материала к работе из шаблона справочника
    pub fn add_material(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        template: &MaterialTemplate,
    ) -> bool {
        let calc = MaterialCalculator::new();
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };

        let line = calc.line_from_template(template, item.quantity);
        item.materials.push(line);

        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    /// Замена материала на другой из справочника
    ///
    /// Замена выводится из шаблона заново: строка возвращается
    /// в авто-режим, расход нормализуется, количество пересчитывается
    /// от текущего объёма работы
    pub fn replace_material(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
        template: &MaterialTemplate,
    ) -> bool {
        let calc = MaterialCalculator::new();
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };
        if material_idx >= item.materials.len() {
            return false;
        }

        let quantity = item.quantity;
        item.materials[material_idx] = calc.line_from_template(template, quantity);

        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    /// Удаление материала (подтверждение - на вызывающем)
    pub fn remove_material(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
    ) -> bool {
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };
        if material_idx >= item.materials.len() {
            return false;
        }

        item.materials.remove(material_idx);
        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    /// Прямое изменение расхода материала
    ///
    /// В авто-режиме количество = round2(объём работы * расход)
    pub fn update_material_consumption(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
        input: Option<&str>,
    ) -> bool {
        let consumption = match parse_amount(input) {
            Some(v) => v,
            None => return false,
        };
        let calc = MaterialCalculator::new();
        let item = match self.item_mut(section_idx, item_idx) {
            Some(i) => i,
            None => return false,
        };
        let quantity = item.quantity;
        let line = match item.materials.get_mut(material_idx) {
            Some(l) => l,
            None => return false,
        };

        calc.on_consumption_changed(line, consumption, quantity);
        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    /// Прямое изменение количества материала
    ///
    /// Побочный эффект: материал переводится в ручной режим
    pub fn update_material_quantity(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
        input: Option<&str>,
    ) -> bool {
        let quantity = match parse_amount(input) {
            Some(v) => v,
            None => return false,
        };
        let calc = MaterialCalculator::new();
        let line = match self.material_mut(section_idx, item_idx, material_idx) {
            Some(l) => l,
            None => return false,
        };

        calc.on_quantity_edited(line, quantity);
        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    /// Изменение цены материала: обновляется только сумма строки
    pub fn update_material_price(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
        input: Option<&str>,
    ) -> bool {
        let price = match parse_amount(input) {
            Some(v) => v,
            None => return false,
        };
        let calc = MaterialCalculator::new();
        let line = match self.material_mut(section_idx, item_idx, material_idx) {
            Some(l) => l,
            None => return false,
        };

        calc.on_price_changed(line, price);
        self.mark_changed(EstimateEvent::MaterialsChanged);
        true
    }

    // ==========================================
    // Коэффициенты
    // ==========================================

    /// Применение коэффициента ко всем работам (от исходных цен)
    pub fn apply_coefficient(&mut self, percent: f64) {
        self.coefficient
            .apply(&mut self.sections, &self.registry, percent);
        tracing::debug!(percent, "применён ценовой коэффициент");
        self.mark_changed(EstimateEvent::CoefficientChanged);
    }

    /// Сброс цен к исходным значениям реестра
    pub fn reset_coefficient(&mut self) {
        self.coefficient.reset(&mut self.sections, &self.registry);
        self.mark_changed(EstimateEvent::CoefficientChanged);
    }

    /// Фиксация новой базовой цены в реестре
    ///
    /// Вызывается после успешной записи в общий справочник
    pub fn commit_original_price(&mut self, key: &str, price: f64) {
        self.registry.commit(key, price);
    }

    // ==========================================
    // Очистка
    // ==========================================

    /// Очистка сметы: пустой список разделов
    ///
    /// Реестр исходных цен сохраняется до конца сессии
    pub fn clear(&mut self) {
        self.sections.clear();
        self.mark_changed(EstimateEvent::EstimateCleared);
    }

    // ==========================================
    // Вспомогательные методы
    // ==========================================

    fn item_mut(&mut self, section_idx: usize, item_idx: usize) -> Option<&mut WorkItem> {
        self.sections.get_mut(section_idx)?.items.get_mut(item_idx)
    }

    fn material_mut(
        &mut self,
        section_idx: usize,
        item_idx: usize,
        material_idx: usize,
    ) -> Option<&mut MaterialLine> {
        self.item_mut(section_idx, item_idx)?
            .materials
            .get_mut(material_idx)
    }

    /// Пометка изменения и синхронная публикация события
    fn mark_changed(&mut self, event: EstimateEvent) {
        self.dirty = true;
        self.event_publisher.publish(event);
    }
}

impl Default for EstimateTree {
    fn default() -> Self {
        Self::new()
    }
}
