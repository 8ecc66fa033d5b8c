//! Слияние импортированных записей с текущей коллекцией use case.

use std::collections::HashMap;

use contracts::domain::a001_use_case::{ChannelLevelsUpdate, TargetLevelUpdate, UseCase};

use super::parser::UseCaseSheet;

/// Частичное обновление use case, применяемое по идентификатору
pub trait UseCasePatch {
    fn use_case_id(&self) -> &str;

    /// Применить обновление к копии записи с тем же id
    fn apply_to(&self, use_case: &mut UseCase);
}

impl UseCasePatch for TargetLevelUpdate {
    fn use_case_id(&self) -> &str {
        &self.id
    }

    /// Нераспознанный уровень не затирает существующий
    fn apply_to(&self, use_case: &mut UseCase) {
        if let Some(level) = self.target_level {
            use_case.target_level = Some(level);
        }
    }
}

impl UseCasePatch for ChannelLevelsUpdate {
    fn use_case_id(&self) -> &str {
        &self.id
    }

    fn apply_to(&self, use_case: &mut UseCase) {
        use_case.channel_levels = self.channel_levels.clone();
        use_case.channels = self
            .channel_levels
            .iter()
            .filter(|(_, level)| **level > 0)
            .map(|(channel, _)| channel.clone())
            .collect();
    }
}

/// Строка листа метаданных вместе с листом, из которого она прочитана
pub struct ImportedUseCase<'a> {
    pub use_case: &'a UseCase,
    pub sheet: &'a UseCaseSheet,
}

impl UseCasePatch for ImportedUseCase<'_> {
    fn use_case_id(&self) -> &str {
        &self.use_case.id
    }

    /// Поле без колонки в листе остаётся от существующей записи, как и всё,
    /// что лист не несёт вовсе (матрица каналов, шаги процесса и т.п.).
    /// Необязательные значения перезаписываются только заполненными.
    fn apply_to(&self, use_case: &mut UseCase) {
        let imported = self.use_case;
        let carries = |field: &str| self.sheet.carries(field);

        use_case.name = imported.name.clone();
        if carries("description") {
            use_case.description = imported.description.clone();
        }
        if carries("category") {
            use_case.category = imported.category.clone();
        }
        if carries("current_level") {
            use_case.current_level = imported.current_level;
        }
        if carries("in_production") {
            use_case.production_status = imported.production_status;
        }

        overlay_some(&mut use_case.target_level, &imported.target_level);
        overlay_some(&mut use_case.development_year, &imported.development_year);
        overlay_some(&mut use_case.business_unit, &imported.business_unit);
        overlay_some(&mut use_case.development_time, &imported.development_time);
        overlay_some(&mut use_case.monthly_reach, &imported.monthly_reach);
        overlay_some(&mut use_case.revenue_impact, &imported.revenue_impact);
        overlay_some(&mut use_case.implementation_cost, &imported.implementation_cost);
        overlay_some(&mut use_case.channel_costs, &imported.channel_costs);
        overlay_some(&mut use_case.time_to_optimize, &imported.time_to_optimize);
    }
}

fn overlay_some<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *target = value.clone();
    }
}

/// Индекс обновлений по id; при повторах побеждает первое
fn index_first<P: UseCasePatch>(updates: &[P]) -> HashMap<&str, &P> {
    let mut index = HashMap::with_capacity(updates.len());
    for update in updates {
        index.entry(update.use_case_id()).or_insert(update);
    }
    index
}

/// Применить обновления к базовой коллекции.
///
/// Результат той же длины и в том же порядке, что и `base`; записи без
/// обновления проходят без изменений, обновления без записи отбрасываются.
pub fn merge_updates<P: UseCasePatch>(base: &[UseCase], updates: &[P]) -> Vec<UseCase> {
    let index = index_first(updates);

    base.iter()
        .map(|use_case| match index.get(use_case.id.as_str()) {
            Some(update) => {
                let mut merged = use_case.clone();
                update.apply_to(&mut merged);
                merged
            }
            None => use_case.clone(),
        })
        .collect()
}

/// Импорт листа метаданных: совпавшие записи обновляются, новые
/// добавляются в конец в порядке листа.
pub fn merge_imported(existing: &[UseCase], sheet: &UseCaseSheet) -> Vec<UseCase> {
    let patches: Vec<ImportedUseCase> = sheet
        .use_cases
        .iter()
        .map(|use_case| ImportedUseCase { use_case, sheet })
        .collect();
    let mut merged = merge_updates(existing, &patches);

    let mut known: std::collections::HashSet<&str> =
        existing.iter().map(|uc| uc.id.as_str()).collect();
    let appended: Vec<UseCase> = sheet
        .use_cases
        .iter()
        .filter(|uc| known.insert(uc.id.as_str()))
        .cloned()
        .collect();

    if !appended.is_empty() {
        tracing::debug!("Merge: {} new use case(s) appended", appended.len());
    }

    merged.extend(appended);
    merged
}
