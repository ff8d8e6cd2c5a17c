// ==========================================
// Система управления строительными сметами - реестр исходных цен
// ==========================================
// Назначение: первая наблюдённая цена каждой работы - якорь
// для коэффициентов и сброса
// Красная линия: seed никогда не перезаписывает существующую запись;
// единственный путь намеренной перезаписи - commit
// Удаления нет: записи живут до конца сессии
// ==========================================

use crate::domain::estimate::WorkItem;
use std::collections::HashMap;

// ==========================================
// OriginalPriceRegistry - реестр исходных цен
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct OriginalPriceRegistry {
    prices: HashMap<String, f64>, // ценовой ключ -> исходная цена
}

impl OriginalPriceRegistry {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// Посев реестра из работ
    ///
    /// Для каждой работы вычисляется ценовой ключ; цена записывается
    /// только если ключ ещё не встречался (первая запись побеждает).
    /// Вызывается после загрузки и после каждого add_works -
    /// никогда после простого редактирования цены.
    pub fn seed<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a WorkItem>,
    {
        for item in items {
            self.prices.entry(item.price_key()).or_insert(item.price);
        }
    }

    /// Исходная цена по ключу
    pub fn get(&self, key: &str) -> Option<f64> {
        self.prices.get(key).copied()
    }

    /// Фиксация новой базовой цены (безусловная перезапись)
    ///
    /// Единственный путь намеренного изменения якоря - когда пользователь
    /// явно отправляет пересмотренную цену в общий справочник
    pub fn commit(&mut self, key: &str, price: f64) {
        self.prices.insert(key.to_string(), price);
    }

    /// Количество записей
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
