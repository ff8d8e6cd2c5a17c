// ==========================================
// Система управления строительными сметами - порядок работ
// ==========================================
// Назначение: детерминированное сравнение работ при вставке и сортировке
// Ключи: фаза -> числовой префикс шифра -> второй сегмент -> полный шифр,
// при отсутствии шифра - раздел, затем подраздел
// ==========================================

use crate::domain::estimate::WorkItem;
use std::cmp::Ordering;

/// Сравнение двух работ
///
/// # Правила
/// 1. Фазы (по умолчанию "Без фазы"): разные фазы решают порядок.
/// 2. Оба шифра непустые: сравнивается ведущий числовой префикс
///    (нечисловой -> 0); при равенстве - второй числовой сегмент,
///    если он есть у обоих; затем полный шифр как строка.
/// 3. Иначе - раздел, затем подраздел.
///
/// Порядок тотален и детерминирован: повторная сортировка
/// даёт тот же результат.
pub fn compare_work_items(a: &WorkItem, b: &WorkItem) -> Ordering {
    // 1. Фаза
    let phase_cmp = a.phase_or_default().cmp(b.phase_or_default());
    if phase_cmp != Ordering::Equal {
        return phase_cmp;
    }

    // 2. Шифры
    if !a.code.is_empty() && !b.code.is_empty() {
        let segs_a = split_code(&a.code);
        let segs_b = split_code(&b.code);

        let prefix_cmp = numeric_value(segs_a.first()).cmp(&numeric_value(segs_b.first()));
        if prefix_cmp != Ordering::Equal {
            return prefix_cmp;
        }

        // Второй сегмент сравнивается только когда есть у обоих
        if segs_a.len() > 1 && segs_b.len() > 1 {
            let sub_cmp = numeric_value(segs_a.get(1)).cmp(&numeric_value(segs_b.get(1)));
            if sub_cmp != Ordering::Equal {
                return sub_cmp;
            }
        }

        return a.code.cmp(&b.code);
    }

    // 3. Без шифра: раздел, затем подраздел
    let section_cmp = a
        .section
        .as_deref()
        .unwrap_or("")
        .cmp(b.section.as_deref().unwrap_or(""));
    if section_cmp != Ordering::Equal {
        return section_cmp;
    }
    a.subsection
        .as_deref()
        .unwrap_or("")
        .cmp(b.subsection.as_deref().unwrap_or(""))
}

/// Разбиение шифра на сегменты по '-' и '.'
fn split_code(code: &str) -> Vec<&str> {
    code.split(['-', '.']).collect()
}

/// Числовое значение сегмента: ведущие цифры, нечисловой -> 0
fn numeric_value(segment: Option<&&str>) -> i64 {
    let seg = match segment {
        Some(s) => s.trim(),
        None => return 0,
    };
    let digits: String = seg.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().unwrap_or(0)
}
