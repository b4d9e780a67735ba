use std::collections::HashMap;

use gametools::spinners::{Spinner, Wedge};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpinnerType {
    Movement,
    MoveRefused,
    EmptyPanel,
    QuitMsg,
    UnrecognizedCommand,
}

pub trait SpinnerExt {
    fn from_strs(words: &[&'static str]) -> Self;
}
impl SpinnerExt for Spinner<&'static str> {
    fn from_strs(words: &[&'static str]) -> Self {
        let wedges = words.iter().map(|w| Wedge::new(*w)).collect::<Vec<_>>();
        Spinner::new(wedges)
    }
}

/// Flavour text tables, one spinner per [`SpinnerType`].
pub struct Spinners {
    map: HashMap<SpinnerType, Spinner<&'static str>>,
}

impl Default for Spinners {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(
            SpinnerType::Movement,
            Spinner::from_strs(&[
                "You head that way...",
                "You set off.",
                "Onward.",
                "You pick your way forward.",
            ]),
        );
        map.insert(
            SpinnerType::MoveRefused,
            Spinner::from_strs(&[
                "Something stops you.",
                "That way is closed to you, for now.",
                "You stay put.",
            ]),
        );
        map.insert(
            SpinnerType::EmptyPanel,
            Spinner::from_strs(&["Nothing here.", "Empty.", "Not a thing."]),
        );
        map.insert(
            SpinnerType::QuitMsg,
            Spinner::from_strs(&["Until next time.", "Farewell, wayfarer.", "The road will wait."]),
        );
        map.insert(
            SpinnerType::UnrecognizedCommand,
            Spinner::from_strs(&[
                "Didn't quite catch that?",
                "Huh?",
                "Try that another way (or type 'help').",
            ]),
        );
        Self { map }
    }
}

impl Spinners {
    pub fn new() -> Self {
        Self::default()
    }

    /// A random line from the selected spinner, or `default` if it has none.
    pub fn spin(&self, spin_type: SpinnerType, default: &'static str) -> String {
        self.map
            .get(&spin_type)
            .and_then(Spinner::spin)
            .unwrap_or(default)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_lines() {
        let spinners = Spinners::new();
        for spin_type in [
            SpinnerType::Movement,
            SpinnerType::MoveRefused,
            SpinnerType::EmptyPanel,
            SpinnerType::QuitMsg,
            SpinnerType::UnrecognizedCommand,
        ] {
            assert!(!spinners.spin(spin_type, "").is_empty());
        }
    }

    #[test]
    fn empty_spinner_falls_back_to_default() {
        let spinners = Spinners { map: HashMap::new() };
        assert_eq!(spinners.spin(SpinnerType::Movement, "You go."), "You go.");
    }
}
