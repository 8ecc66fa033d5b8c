//! Сопоставление полей схемы с колонками листа по заголовкам.
//!
//! Позиция колонки определяется один раз по строке заголовков. Если
//! обязательной колонки нет, разбор листа прерывается с описанием того,
//! каких колонок не хватает.

use std::collections::HashMap;
use thiserror::Error;

/// Ошибки разбора листа
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("Sheet '{schema}' is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        schema: &'static str,
        missing: Vec<&'static str>,
    },
}

/// Описание одного поля схемы листа
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: &'static str,
    /// Допустимые заголовки; сравниваются после нормализации
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(field: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            field,
            aliases,
            required: true,
        }
    }

    pub const fn optional(field: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            field,
            aliases,
            required: false,
        }
    }
}

/// Схема листа: имя для сообщений об ошибках и набор полей
#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

/// Результат сопоставления: поле -> индекс колонки
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<&'static str, usize>,
}

impl ColumnMap {
    /// Сопоставить схему со строкой заголовков.
    ///
    /// Каждая колонка закрепляется за первым подходящим полем схемы; при
    /// повторяющихся заголовках берётся первое вхождение.
    pub fn resolve(schema: &SheetSchema, header: &[String]) -> Result<Self, SheetError> {
        let normalized: Vec<String> = header.iter().map(|h| normalize_label(h)).collect();
        let mut taken = vec![false; header.len()];
        let mut indices = HashMap::new();
        let mut missing = Vec::new();

        for spec in schema.columns {
            let found = normalized.iter().enumerate().find(|(idx, label)| {
                !taken[*idx]
                    && !label.is_empty()
                    && spec.aliases.iter().any(|alias| normalize_label(alias) == **label)
            });

            match found {
                Some((idx, _)) => {
                    taken[idx] = true;
                    indices.insert(spec.field, idx);
                }
                None if spec.required => missing.push(spec.field),
                None => {
                    tracing::debug!(
                        "Sheet '{}': optional column '{}' not present",
                        schema.name,
                        spec.field
                    );
                }
            }
        }

        if !missing.is_empty() {
            return Err(SheetError::MissingColumns {
                schema: schema.name,
                missing,
            });
        }

        Ok(Self { indices })
    }

    pub fn index(&self, field: &str) -> Option<usize> {
        self.indices.get(field).copied()
    }

    /// Поля схемы, для которых нашлась колонка
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indices.keys().copied()
    }

    /// Ячейка поля в строке; None, если колонки нет или строка короче
    pub fn cell<'a>(&self, row: &'a [String], field: &str) -> Option<&'a str> {
        self.index(field)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }
}

/// Нормализация заголовка: нижний регистр, только буквы и цифры.
/// "Current Level", "current_level" и "CURRENT-LEVEL" дают одно и то же.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
