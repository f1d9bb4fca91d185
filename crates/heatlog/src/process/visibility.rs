//! Process and extended-field visibility filters.
//!
//! Hidden process codes are stored as one comma-joined string. Every
//! function here is pure and cheap enough to call on every render.

use serde::{Deserialize, Serialize};

use super::{ExtendedField, WeldingProcess, ARC_ENERGY_CODE, PROCESSES};

/// How the extended-data inputs are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldVisibility {
    /// Show the fields the selected process considers relevant.
    #[default]
    Smart,
    /// Show the user's own field set for every process.
    Custom,
}

impl FieldVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldVisibility::Smart => "smart",
            FieldVisibility::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "custom" => FieldVisibility::Custom,
            _ => FieldVisibility::Smart,
        }
    }
}

/// Splits the stored hidden-code string into codes.
pub fn parse_hidden_codes(hidden: &str) -> Vec<&str> {
    hidden
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Processes the user can pick from. The arc-energy process is always kept.
pub fn available_processes(hidden: &str) -> Vec<&'static WeldingProcess> {
    let hidden = parse_hidden_codes(hidden);
    PROCESSES
        .iter()
        .filter(|p| p.is_arc_energy() || !hidden.contains(&p.iso_code))
        .collect()
}

/// Number of selectable processes, as shown on the settings screen.
pub fn active_count(hidden: &str) -> usize {
    available_processes(hidden).len()
}

/// Hides `code` if visible, shows it if hidden. Returns the new stored string.
///
/// The arc-energy code is locked and never added to the set.
pub fn toggle_hidden(hidden: &str, code: &str) -> String {
    let mut codes: Vec<&str> = parse_hidden_codes(hidden);
    let code = code.trim();
    if code.is_empty() || code == ARC_ENERGY_CODE {
        return codes.join(",");
    }
    if codes.contains(&code) {
        codes.retain(|c| *c != code);
    } else {
        codes.push(code);
    }
    codes.join(",")
}

/// Extended fields to expose for `process`, in canonical order.
pub fn visible_fields(
    process: &WeldingProcess,
    visibility: FieldVisibility,
    custom: &[ExtendedField],
) -> Vec<ExtendedField> {
    ExtendedField::ALL
        .into_iter()
        .filter(|field| match visibility {
            FieldVisibility::Smart => process.is_relevant(*field),
            FieldVisibility::Custom => custom.contains(field),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::find_by_code;

    #[test]
    fn test_no_hidden_codes_returns_all() {
        assert_eq!(available_processes("").len(), PROCESSES.len());
        assert_eq!(active_count(""), PROCESSES.len());
    }

    #[test]
    fn test_hidden_code_is_removed() {
        let available = available_processes("141,15");
        assert!(!available.iter().any(|p| p.iso_code == "141"));
        assert!(!available.iter().any(|p| p.iso_code == "15"));
        assert_eq!(available.len(), PROCESSES.len() - 2);
    }

    #[test]
    fn test_arc_energy_cannot_be_hidden() {
        let available = available_processes("Arc,121");
        assert!(available.iter().any(|p| p.is_arc_energy()));
        assert!(!available.iter().any(|p| p.iso_code == "121"));
    }

    #[test]
    fn test_hidden_codes_tolerate_whitespace_and_empties() {
        assert_eq!(parse_hidden_codes(" 131, ,135,"), vec!["131", "135"]);
    }

    #[test]
    fn test_toggle_hidden() {
        let hidden = toggle_hidden("", "131");
        assert_eq!(hidden, "131");
        let hidden = toggle_hidden(&hidden, "141");
        assert_eq!(hidden, "131,141");
        let hidden = toggle_hidden(&hidden, "131");
        assert_eq!(hidden, "141");
    }

    #[test]
    fn test_toggle_hidden_ignores_arc_energy() {
        assert_eq!(toggle_hidden("141", "Arc"), "141");
    }

    #[test]
    fn test_smart_visibility_uses_process_fields() {
        let mma = find_by_code("111").unwrap();
        let fields = visible_fields(mma, FieldVisibility::Smart, &[ExtendedField::GasType]);
        assert!(!fields.contains(&ExtendedField::GasType));
        assert!(fields.contains(&ExtendedField::Polarity));
    }

    #[test]
    fn test_custom_visibility_overrides_process() {
        let mma = find_by_code("111").unwrap();
        let fields = visible_fields(
            mma,
            FieldVisibility::Custom,
            &[ExtendedField::GasType, ExtendedField::PassType],
        );
        assert_eq!(fields, vec![ExtendedField::PassType, ExtendedField::GasType]);
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(FieldVisibility::parse("custom"), FieldVisibility::Custom);
        assert_eq!(FieldVisibility::parse("smart"), FieldVisibility::Smart);
        assert_eq!(FieldVisibility::parse("garbage"), FieldVisibility::Smart);
    }
}
