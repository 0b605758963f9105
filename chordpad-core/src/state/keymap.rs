//! Physical keypad position → function mapping.

use crate::action::PhysicalKey;

/// What a mapped key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFunction {
    /// Sound the diatonic chord on this scale degree (0-6).
    Degree(u8),
    AdvanceRoot,
    AdvanceScale,
    /// Toggle the inversion-assignment sub-mode.
    InversionMode,
    /// Ask the host to restart.
    Reload,
}

impl KeyFunction {
    /// Short label for legends, e.g. "II" or "root".
    pub fn label(&self) -> String {
        const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
        match self {
            KeyFunction::Degree(d) => NUMERALS
                .get(*d as usize)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("?{}", d)),
            KeyFunction::AdvanceRoot => "root".to_string(),
            KeyFunction::AdvanceScale => "scale".to_string(),
            KeyFunction::InversionMode => "inv".to_string(),
            KeyFunction::Reload => "reload".to_string(),
        }
    }
}

/// Parse one layout entry. `Ok(None)` means the position is deliberately unmapped.
///
/// Accepted forms: `"root"`, `"scale"`, `"inversion"`, `"reload"`, a degree
/// `"0"`..`"6"`, or `"-"` / `""` for no function.
pub fn parse_key_function(s: &str) -> Result<Option<KeyFunction>, String> {
    match s.trim() {
        "" | "-" => Ok(None),
        "root" => Ok(Some(KeyFunction::AdvanceRoot)),
        "scale" => Ok(Some(KeyFunction::AdvanceScale)),
        "inversion" | "inv" => Ok(Some(KeyFunction::InversionMode)),
        "reload" => Ok(Some(KeyFunction::Reload)),
        other => match other.parse::<u8>() {
            Ok(d) if d < 7 => Ok(Some(KeyFunction::Degree(d))),
            Ok(d) => Err(format!("scale degree {} out of range 0-6", d)),
            Err(_) => Err(format!("unknown key function {:?}", other)),
        },
    }
}

/// Fixed relation from keypad positions to functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    slots: Vec<Option<KeyFunction>>,
}

impl KeyMap {
    /// Matrix width of the stock 3×4 keypad.
    pub const COLUMNS: usize = 4;

    /// Stock layout, row-major.
    pub const DEFAULT_LAYOUT: [&'static str; 12] = [
        "root", "scale", "reload", "inversion",
        "1", "3", "5", "-",
        "0", "2", "4", "6",
    ];

    /// Build from layout strings. Invalid entries are reported and left unmapped.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Self {
        let slots = layout
            .iter()
            .enumerate()
            .map(|(index, entry)| match parse_key_function(entry.as_ref()) {
                Ok(function) => function,
                Err(e) => {
                    log::warn!(target: "config", "keypad position {}: {}; leaving unmapped", index, e);
                    None
                }
            })
            .collect();
        Self { slots }
    }

    pub fn lookup(&self, key: PhysicalKey) -> Option<KeyFunction> {
        self.slots.get(key.index()).copied().flatten()
    }

    /// First position bound to `function`.
    pub fn key_for(&self, function: KeyFunction) -> Option<PhysicalKey> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(function))
            .map(|i| PhysicalKey(i as u8))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<KeyFunction>] {
        &self.slots
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_layout(&Self::DEFAULT_LAYOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_stock_keypad() {
        let map = KeyMap::default();
        assert_eq!(map.len(), 12);
        assert_eq!(map.lookup(PhysicalKey(0)), Some(KeyFunction::AdvanceRoot));
        assert_eq!(map.lookup(PhysicalKey(1)), Some(KeyFunction::AdvanceScale));
        assert_eq!(map.lookup(PhysicalKey(2)), Some(KeyFunction::Reload));
        assert_eq!(map.lookup(PhysicalKey(3)), Some(KeyFunction::InversionMode));
        assert_eq!(map.lookup(PhysicalKey(4)), Some(KeyFunction::Degree(1)));
        assert_eq!(map.lookup(PhysicalKey(7)), None);
        assert_eq!(map.lookup(PhysicalKey(8)), Some(KeyFunction::Degree(0)));
        assert_eq!(map.lookup(PhysicalKey(11)), Some(KeyFunction::Degree(6)));
    }

    #[test]
    fn every_degree_is_reachable_once() {
        let map = KeyMap::default();
        for d in 0..7 {
            assert!(map.key_for(KeyFunction::Degree(d)).is_some(), "degree {}", d);
        }
        let degrees = map
            .slots()
            .iter()
            .filter(|s| matches!(s, Some(KeyFunction::Degree(_))))
            .count();
        assert_eq!(degrees, 7);
    }

    #[test]
    fn out_of_matrix_is_unmapped() {
        assert_eq!(KeyMap::default().lookup(PhysicalKey(40)), None);
    }

    #[test]
    fn parse_entries() {
        assert_eq!(parse_key_function("root"), Ok(Some(KeyFunction::AdvanceRoot)));
        assert_eq!(parse_key_function(" 3 "), Ok(Some(KeyFunction::Degree(3))));
        assert_eq!(parse_key_function("-"), Ok(None));
        assert!(parse_key_function("7").is_err());
        assert!(parse_key_function("tempo").is_err());
    }

    #[test]
    fn invalid_layout_entries_become_unmapped() {
        let map = KeyMap::from_layout(&["0", "9", "bogus", "scale"]);
        assert_eq!(map.lookup(PhysicalKey(0)), Some(KeyFunction::Degree(0)));
        assert_eq!(map.lookup(PhysicalKey(1)), None);
        assert_eq!(map.lookup(PhysicalKey(2)), None);
        assert_eq!(map.lookup(PhysicalKey(3)), Some(KeyFunction::AdvanceScale));
    }

    #[test]
    fn labels() {
        assert_eq!(KeyFunction::Degree(0).label(), "I");
        assert_eq!(KeyFunction::Degree(6).label(), "VII");
        assert_eq!(KeyFunction::InversionMode.label(), "inv");
    }
}
