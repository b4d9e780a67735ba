//! module Icons
//!
//! Just a centralized out-of-the-way module to define Unicode icons used for
//! various message types. The use for each is self-evident from the constant
//! name.

pub(crate) const ICON_SUCCESS: &str = "\u{2611}"; // ✔
pub(crate) const ICON_FAILURE: &str = "\u{274C}"; // ✖
pub(crate) const ICON_ERROR: &str = "⚠︎"; // U+26A0 U+FE0E
pub(crate) const ICON_ENGINE: &str = "⚙";
pub(crate) const ICON_TRAVEL: &str = "→"; // U+2192
pub(crate) const ICON_IMAGE: &str = "▣";
pub(crate) const ICON_ENEMY: &str = "☠";
