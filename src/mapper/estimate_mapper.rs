// ==========================================
// Система управления строительными сметами - трансформация форм
// ==========================================
// Назначение: плоский список работ -> дерево разделов (загрузка)
// и обратно (сохранение)
// Правила загрузки: группировка по фазе, код раздела - ведущий
// сегмент шифра (разделители '-' и '–', по умолчанию "00"),
// порядок работ - движок порядка, итоги пересчитываются
// Правила сохранения: материалы фильтруются до строк с разрешённым
// material_id и положительным количеством
// ==========================================

use crate::domain::estimate::{EstimateMeta, MaterialLine, Section, WorkItem};
use crate::domain::types::{round2, DEFAULT_SECTION_CODE};
use crate::engine::ordering::compare_work_items;
use crate::mapper::dto::{
    EstimateDto, EstimateItemDto, EstimateMaterialDto, SaveEstimateDto, SaveItemDto,
    SaveMaterialDto,
};
use uuid::Uuid;

// ==========================================
// EstimateMapper - маппер сметы
// ==========================================
pub struct EstimateMapper {
    // движок без состояния
}

impl EstimateMapper {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // Загрузка: плоское -> дерево
    // ==========================================

    /// Построение дерева из плоского представления
    ///
    /// # Возвращает
    /// (метаданные, разделы): разделы сгруппированы по фазе,
    /// работы упорядочены, итоги пересчитаны
    pub fn build(&self, dto: EstimateDto) -> (EstimateMeta, Vec<Section>) {
        let meta = EstimateMeta {
            name: dto.name,
            estimate_type: dto.estimate_type,
            status: dto.status,
            description: dto.description,
            estimate_date: dto.estimate_date,
            currency: dto.currency,
            client_name: dto.client_name,
            contractor_name: dto.contractor_name,
            object_address: dto.object_address,
            contract_number: dto.contract_number,
            vat_rate: dto.vat_rate,
            overhead_rate: dto.overhead_rate,
        };

        let mut sections: Vec<Section> = Vec::new();
        for item_dto in dto.items {
            let item = Self::work_from_dto(item_dto);
            let title = item.phase_or_default().to_string();

            let idx = match sections.iter().position(|s| s.title == title) {
                Some(i) => i,
                None => {
                    let code = Self::section_code(&item.code);
                    sections.push(Section::new(&code, &title));
                    sections.len() - 1
                }
            };
            sections[idx].items.push(item);
        }

        for section in sections.iter_mut() {
            section.items.sort_by(compare_work_items);
            section.recompute_subtotal();
        }
        sections.sort_by(|a, b| a.code.cmp(&b.code));

        (meta, sections)
    }

    /// Работа из плоской строки
    ///
    /// Сумма пересчитывается как round2(quantity * unit_price):
    /// гидратация не может нарушить инвариант итогов,
    /// final_price из хранилища не используется
    fn work_from_dto(dto: EstimateItemDto) -> WorkItem {
        let materials = dto
            .materials
            .into_iter()
            .map(Self::material_from_dto)
            .collect();

        let mut item = WorkItem {
            id: dto.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            work_id: dto.work_id,
            code: dto.code,
            name: dto.name,
            description: dto.description,
            unit: dto.unit,
            quantity: dto.quantity,
            price: dto.unit_price,
            total: 0.0,
            phase: dto.phase,
            section: dto.section,
            subsection: dto.subsection,
            materials,
        };
        item.recompute_total();
        item
    }

    /// Материал из плоской строки (дубли полей уже схлопнуты)
    fn material_from_dto(dto: EstimateMaterialDto) -> MaterialLine {
        let price = dto.canonical_price();
        let consumption = dto.canonical_consumption();
        let auto_calculate = dto.canonical_auto();

        let mut line = MaterialLine {
            id: Uuid::new_v4().to_string(),
            material_id: dto.material_id,
            code: dto.sku,
            name: dto.material_name.unwrap_or_default(),
            unit: dto.unit,
            quantity: dto.quantity,
            price,
            total: 0.0,
            consumption,
            auto_calculate,
            is_required: dto.is_required.unwrap_or(false),
            notes: dto.notes,
            image: dto.image,
        };
        line.recompute_total();
        line
    }

    /// Код раздела из шифра работы
    fn section_code(code: &str) -> String {
        let lead = code.split(['-', '–']).next().unwrap_or("").trim();
        if lead.is_empty() {
            DEFAULT_SECTION_CODE.to_string()
        } else {
            lead.to_string()
        }
    }

    // ==========================================
    // Сохранение: дерево -> плоское
    // ==========================================

    /// Плоская полезная нагрузка сохранения
    ///
    /// Группировка по разделам отбрасывается; материалы фильтруются
    /// до строк с разрешённым material_id и положительным количеством.
    /// Create и update используют одну и ту же форму.
    pub fn flatten(
        &self,
        meta: &EstimateMeta,
        sections: &[Section],
        project_id: Option<&str>,
    ) -> SaveEstimateDto {
        let items = sections
            .iter()
            .flat_map(|s| s.items.iter())
            .map(Self::item_to_dto)
            .collect();

        SaveEstimateDto {
            name: meta.name.clone(),
            project_id: project_id.map(|s| s.to_string()),
            estimate_type: meta.estimate_type.clone(),
            status: meta.status.clone(),
            description: meta.description.clone(),
            estimate_date: meta.estimate_date,
            currency: meta.currency.clone(),
            client_name: meta.client_name.clone(),
            contractor_name: meta.contractor_name.clone(),
            object_address: meta.object_address.clone(),
            contract_number: meta.contract_number.clone(),
            vat_rate: meta.vat_rate,
            overhead_rate: meta.overhead_rate,
            items,
        }
    }

    fn item_to_dto(item: &WorkItem) -> SaveItemDto {
        let materials = item
            .materials
            .iter()
            .filter(|m| {
                m.material_id.as_deref().map_or(false, |id| !id.is_empty()) && m.quantity > 0.0
            })
            .map(|m| SaveMaterialDto {
                material_id: m.material_id.clone().unwrap_or_default(),
                quantity: m.quantity,
                unit_price: m.price,
                consumption: m.consumption,
                auto_calculate: m.auto_calculate,
                is_required: m.is_required,
                notes: m.notes.clone(),
            })
            .collect();

        SaveItemDto {
            work_id: item.work_id.clone(),
            code: item.code.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            final_price: round2(item.quantity * item.price),
            phase: item.phase.clone(),
            section: item.section.clone(),
            subsection: item.subsection.clone(),
            materials,
        }
    }
}

impl Default for EstimateMapper {
    fn default() -> Self {
        Self::new()
    }
}
