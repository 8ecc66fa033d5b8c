//! Приведение ячеек листа к типизированным значениям.
//!
//! Ни одна функция не возвращает ошибку: битая ячейка превращается в значение
//! по умолчанию, чтобы одна строка не срывала импорт всего листа.

use std::str::FromStr;

/// Ячейка строки по индексу колонки (None, если строка короче)
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}

/// Целое в десятичной записи. Пустая, нечисловая или отсутствующая ячейка -> None
pub fn parse_int<T: FromStr>(cell: Option<&str>) -> Option<T> {
    let value = cell?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<T>().ok()
}

pub fn int_or<T: FromStr>(cell: Option<&str>, default: T) -> T {
    parse_int(cell).unwrap_or(default)
}

/// Число с плавающей точкой; NaN и бесконечности считаются нераспознанными
pub fn parse_float(cell: Option<&str>) -> Option<f64> {
    let value = cell?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn float_or(cell: Option<&str>, default: f64) -> f64 {
    parse_float(cell).unwrap_or(default)
}

/// true только для "true" без учёта регистра и пробелов по краям
pub fn parse_bool(cell: Option<&str>) -> bool {
    cell.map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Непустая строка без пробелов по краям
pub fn text(cell: Option<&str>) -> Option<String> {
    let value = cell?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn text_or_empty(cell: Option<&str>) -> String {
    text(cell).unwrap_or_default()
}

/// Уровень канала в матрице: ровно "TRUE" означает развёрнутый канал (3),
/// всё остальное - 0. Это отдельное соглашение листа матрицы, не булево приведение.
pub const DEPLOYED_LEVEL: u8 = 3;

pub fn channel_level(cell: Option<&str>) -> u8 {
    match cell {
        Some("TRUE") => DEPLOYED_LEVEL,
        _ => 0,
    }
}

/// Строка без единой заполненной ячейки
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_valid_base10() {
        assert_eq!(parse_int::<i32>(Some("42")), Some(42));
        assert_eq!(parse_int::<i32>(Some(" -7 ")), Some(-7));
        assert_eq!(parse_int::<i64>(Some("+2023")), Some(2023));
        assert_eq!(parse_int::<i32>(Some("007")), Some(7));
    }

    #[test]
    fn test_parse_int_falls_back_to_default() {
        for input in [Some(""), Some("   "), Some("abc"), Some("2.5"), Some("12abc"), Some("0x1F"), None] {
            assert_eq!(int_or::<i32>(input, 0), 0, "input {:?}", input);
            assert_eq!(parse_int::<i32>(input), None, "input {:?}", input);
        }
        assert_eq!(int_or::<i32>(Some("99999999999"), -1), -1);
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(float_or(Some("1250.75"), 0.0), 1250.75);
        assert_eq!(float_or(Some("  3 "), 0.0), 3.0);
        assert_eq!(float_or(Some(""), 0.0), 0.0);
        assert_eq!(float_or(Some("n/a"), 0.0), 0.0);
        assert_eq!(float_or(Some("NaN"), 0.0), 0.0);
        assert_eq!(float_or(Some("inf"), 0.0), 0.0);
        assert_eq!(float_or(None, 0.0), 0.0);
    }

    #[test]
    fn test_bool_is_true_only_for_literal_true() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some("TRUE")));
        assert!(parse_bool(Some("  True ")));
        for input in [Some("yes"), Some("1"), Some(""), Some("false"), Some("truee"), None] {
            assert!(!parse_bool(input), "input {:?}", input);
        }
    }

    #[test]
    fn test_channel_level_requires_exact_upper_true() {
        assert_eq!(channel_level(Some("TRUE")), 3);
        assert_eq!(channel_level(Some("true")), 0);
        assert_eq!(channel_level(Some(" TRUE")), 0);
        assert_eq!(channel_level(Some("FALSE")), 0);
        assert_eq!(channel_level(None), 0);
    }

    #[test]
    fn test_text_and_blank_rows() {
        assert_eq!(text(Some("  Web ")), Some("Web".to_string()));
        assert_eq!(text(Some("   ")), None);
        assert!(is_blank_row(&["".to_string(), "  ".to_string()]));
        assert!(is_blank_row(&[]));
        assert!(!is_blank_row(&["".to_string(), "x".to_string()]));
    }
}
