//! Группировка и агрегация для отображения.
//!
//! Корзины — производное состояние: пересчитываются на каждое изменение
//! и никогда не мутируются напрямую. Деньги проходят весь конвейер в
//! минорных единицах (копейках); деление на 100 происходит один раз,
//! на границе рендера.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use contracts::collection::Item;

/// Операция агрегации по корзине.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Count,
    Min,
    Max,
}

/// Стабильная группировка: корзины идут в порядке первого появления ключа,
/// элементы внутри корзины сохраняют относительный порядок входа.
/// Элементы, для которых ключ не вычислился, пропускаются.
pub fn group_by<'a, K, F>(items: &'a [Item], key: F) -> Vec<(K, Vec<&'a Item>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Item) -> Option<K>,
{
    let mut buckets: Vec<(K, Vec<&Item>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let Some(k) = key(item) else { continue };
        match index.get(&k) {
            Some(&i) => buckets[i].1.push(item),
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push((k, vec![item]));
            }
        }
    }

    buckets
}

/// Агрегат по корзине.
///
/// `Sum` и `Count` по пустой корзине — `Some(0)`; `Min`/`Max` по пустой
/// корзине (или корзине без извлекаемых значений) — `None`: "нет данных"
/// отличимо от нуля и никогда не схлопывается в 0.
pub fn aggregate<F>(bucket: &[&Item], value: F, op: Aggregate) -> Option<i64>
where
    F: Fn(&Item) -> Option<i64>,
{
    let values = bucket.iter().filter_map(|item| value(item));
    match op {
        Aggregate::Sum => Some(values.sum()),
        Aggregate::Count => Some(values.count() as i64),
        Aggregate::Min => values.min(),
        Aggregate::Max => values.max(),
    }
}

/// Единый предикат принадлежности диапазона дат дню:
/// `starts_on <= day <= ends_on`, обе границы включительно.
///
/// Используется и для размещения в календаре, и для агрегации платежей —
/// других вариантов включительности в кодовой базе быть не должно.
pub fn covers_day(item: &Item, day: NaiveDate) -> bool {
    let Some(start) = item.starts_on else {
        return false;
    };
    let end = item.ends_on.unwrap_or(start);
    start <= day && day <= end
}

/// Раскладка элементов по дням календаря. День без элементов присутствует
/// в результате с пустой корзиной.
pub fn bucket_by_day<'a>(items: &'a [Item], days: &[NaiveDate]) -> Vec<(NaiveDate, Vec<&'a Item>)> {
    days.iter()
        .map(|&day| {
            let bucket = items.iter().filter(|item| covers_day(item, day)).collect();
            (day, bucket)
        })
        .collect()
}

/// Перевод минорных единиц в мажорные на границе рендера:
/// `123456` → `"1 234.56"`. Единственное место деления на 100.
pub fn format_minor_units(minor: i64) -> String {
    let negative = minor < 0;
    let abs = minor.unsigned_abs();
    let major = abs / 100;
    let cents = abs % 100;

    // Пробел-разделитель каждые 3 цифры с конца целой части
    let digits = major.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let integer_part: String = grouped.chars().rev().collect();

    format!(
        "{}{}.{:02}",
        if negative { "-" } else { "" },
        integer_part,
        cents
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn payment(id: &str, amount: i64, date: &str) -> Item {
        Item::new(id, id)
            .with_amount(amount)
            .with_dates(d(date), d(date))
    }

    #[test]
    fn test_group_by_is_stable() {
        let items = vec![
            payment("p1", 500, "2024-06-05"),
            payment("p2", 300, "2024-06-05"),
            payment("p3", 100, "2024-06-06"),
        ];

        let buckets = group_by(&items, |i| i.starts_on);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, d("2024-06-05"));
        let ids: Vec<&str> = buckets[0].1.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_group_by_skips_keyless_items() {
        let items = vec![Item::new("a", "Без даты"), payment("p1", 1, "2024-06-05")];
        let buckets = group_by(&items, |i| i.starts_on);
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn test_calendar_bucket_aggregation_scenario() {
        let items = vec![
            payment("p1", 500, "2024-06-05"),
            payment("p2", 300, "2024-06-05"),
            payment("p3", 100, "2024-06-06"),
        ];

        let buckets = group_by(&items, |i| i.starts_on);
        let sums: Vec<(NaiveDate, Option<i64>)> = buckets
            .iter()
            .map(|(day, bucket)| (*day, aggregate(bucket, |i| i.amount, Aggregate::Sum)))
            .collect();

        assert_eq!(
            sums,
            vec![
                (d("2024-06-05"), Some(800)),
                (d("2024-06-06"), Some(100)),
            ]
        );
    }

    #[test]
    fn test_sum_over_empty_bucket_is_zero() {
        assert_eq!(aggregate(&[], |i| i.amount, Aggregate::Sum), Some(0));
        assert_eq!(aggregate(&[], |i| i.amount, Aggregate::Count), Some(0));
    }

    #[test]
    fn test_min_max_over_empty_bucket_is_no_data() {
        assert_eq!(aggregate(&[], |i| i.amount, Aggregate::Min), None);
        assert_eq!(aggregate(&[], |i| i.amount, Aggregate::Max), None);
    }

    #[test]
    fn test_min_max_ignore_items_without_value() {
        let a = Item::new("a", "A");
        let b = payment("b", 42, "2024-01-01");
        let bucket = vec![&a, &b];
        assert_eq!(aggregate(&bucket, |i| i.amount, Aggregate::Min), Some(42));

        let only_empty = vec![&a];
        assert_eq!(aggregate(&only_empty, |i| i.amount, Aggregate::Max), None);
    }

    #[test]
    fn test_covers_day_inclusive_both_ends() {
        let item = Item::new("x", "X").with_dates(d("2024-03-01"), d("2024-03-01"));
        assert!(covers_day(&item, d("2024-03-01")));
        assert!(!covers_day(&item, d("2024-02-29")));
        assert!(!covers_day(&item, d("2024-03-02")));
    }

    #[test]
    fn test_covers_day_range() {
        let item = Item::new("x", "X").with_dates(d("2024-03-01"), d("2024-03-03"));
        assert!(covers_day(&item, d("2024-03-01")));
        assert!(covers_day(&item, d("2024-03-02")));
        assert!(covers_day(&item, d("2024-03-03")));
        assert!(!covers_day(&item, d("2024-03-04")));
    }

    #[test]
    fn test_bucket_by_day_keeps_empty_days() {
        let items = vec![payment("p1", 100, "2024-06-05")];
        let days = vec![d("2024-06-04"), d("2024-06-05")];

        let buckets = bucket_by_day(&items, &days);

        assert_eq!(buckets[0].1.len(), 0);
        assert_eq!(buckets[1].1.len(), 1);
    }

    #[test]
    fn test_format_minor_units() {
        assert_eq!(format_minor_units(123456), "1 234.56");
        assert_eq!(format_minor_units(123456789), "1 234 567.89");
        assert_eq!(format_minor_units(0), "0.00");
        assert_eq!(format_minor_units(-123456), "-1 234.56");
        assert_eq!(format_minor_units(5), "0.05");
    }
}
