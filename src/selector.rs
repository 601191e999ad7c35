//! BEM selectors derived from file names.
//!
//! `button__icon_size_l.css` describes block `button`, element `icon`,
//! modifier `size` with value `l`. The selector is informational: grouping
//! and ordering never look inside it.

use serde::Serialize;
use std::fmt;

const ELEM_SEPARATOR: &str = "__";
const MOD_SEPARATOR: char = '_';

/// Structural identity of a block file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selector {
    /// Block name
    pub block: String,
    /// Element name, if the file belongs to an element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem: Option<String>,
    /// Modifier name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_name: Option<String>,
    /// Modifier value; `None` for boolean modifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_val: Option<String>,
}

impl Selector {
    /// Resolve the selector of `file_name`, falling back to `owner` for the block
    ///
    /// The stem is everything before the first `.`, so `button.deps.js` and
    /// `button.css` both describe `button`.
    #[must_use]
    pub fn resolve(file_name: &str, owner: Option<&str>) -> Self {
        let stem = file_name.split('.').next().unwrap_or_default();

        let (block_part, elem_part) = match stem.split_once(ELEM_SEPARATOR) {
            Some((block, elem)) => (block, Some(elem)),
            None => (stem, None),
        };

        let (block, block_mod, block_val) = split_modifier(block_part);
        let block = if block.is_empty() {
            owner.unwrap_or_default().to_string()
        } else {
            block.to_string()
        };

        match elem_part {
            Some(elem_part) => {
                let (elem, mod_name, mod_val) = split_modifier(elem_part);
                Self {
                    block,
                    elem: Some(elem.to_string()).filter(|elem| !elem.is_empty()),
                    mod_name: mod_name.map(str::to_string),
                    mod_val: mod_val.map(str::to_string),
                }
            }
            None => Self {
                block,
                elem: None,
                mod_name: block_mod.map(str::to_string),
                mod_val: block_val.map(str::to_string),
            },
        }
    }

    /// Whether this selector names the block itself
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.elem.is_none() && self.mod_name.is_none()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block)?;
        if let Some(elem) = &self.elem {
            write!(f, "{ELEM_SEPARATOR}{elem}")?;
        }
        if let Some(mod_name) = &self.mod_name {
            write!(f, "{MOD_SEPARATOR}{mod_name}")?;
            if let Some(mod_val) = &self.mod_val {
                write!(f, "{MOD_SEPARATOR}{mod_val}")?;
            }
        }
        Ok(())
    }
}

/// `name_mod_val` → (`name`, `mod`, `val`)
fn split_modifier(part: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut pieces = part.splitn(3, MOD_SEPARATOR);
    let name = pieces.next().unwrap_or_default();
    let mod_name = pieces.next().filter(|piece| !piece.is_empty());
    let mod_val = pieces.next().filter(|piece| !piece.is_empty());
    (name, mod_name, mod_val.filter(|_| mod_name.is_some()))
}
