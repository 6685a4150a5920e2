//! Localized earning labels

use serde::{Deserialize, Serialize};

/// Whether a model's normalized return compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateKind {
    Apy,
    Apr,
}

impl RateKind {
    pub fn acronym(&self) -> &'static str {
        match self {
            Self::Apy => "APY",
            Self::Apr => "APR",
        }
    }
}

/// Language part of a locale identifier (`en-US`, `pt_BR`)
fn language(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

pub fn avg_title(kind: RateKind, locale: &str) -> String {
    let rate = kind.acronym();
    match language(locale).as_str() {
        "ru" => format!("Средний {}", rate),
        "es" => format!("{} promedio", rate),
        "ja" => format!("平均{}", rate),
        _ => format!("Average {}", rate),
    }
}

pub fn max_title(kind: RateKind, locale: &str) -> String {
    let rate = kind.acronym();
    match language(locale).as_str() {
        "ru" => format!("Максимальный {}", rate),
        "es" => format!("{} máximo", rate),
        "ja" => format!("最大{}", rate),
        _ => format!("Max {}", rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(avg_title(RateKind::Apy, "en-US"), "Average APY");
        assert_eq!(max_title(RateKind::Apr, "es_ES"), "APR máximo");
        assert_eq!(avg_title(RateKind::Apy, "ru"), "Средний APY");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(max_title(RateKind::Apy, "xx"), "Max APY");
        assert_eq!(avg_title(RateKind::Apr, ""), "Average APR");
    }
}
