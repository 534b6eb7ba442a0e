//! Positional context threaded through the render recursion.

use mdvtree_core::Space;

/// Which table section encloses the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSection {
    /// Not inside `thead` or `tbody`.
    #[default]
    None,
    /// Inside `thead`.
    Head,
    /// Inside `tbody`.
    Body,
}

/// Context for one level of the recursion.
///
/// Values are never mutated in place; each level derives the context for
/// its descendants (or its next sibling) as a modified copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Nesting depth of the innermost list, `-1` outside any list.
    pub list_depth: i32,
    /// Whether the innermost list is ordered.
    pub list_ordered: bool,
    /// Index of the last item seen in the innermost list, `-1` before the first.
    pub list_item_index: i32,
    /// Enclosing table section.
    pub table_section: TableSection,
    /// Attribute namespace for property-name lookups.
    pub space: Space,
}

impl RenderContext {
    /// Context at the tree root.
    pub const fn root() -> Self {
        Self {
            list_depth: -1,
            list_ordered: false,
            list_item_index: -1,
            table_section: TableSection::None,
            space: Space::Html,
        }
    }

    /// Returns true if some list encloses the current position.
    pub fn in_list(&self) -> bool {
        self.list_depth >= 0
    }

    /// Context for the children of a `ul`/`ol`.
    pub fn enter_list(self, ordered: bool) -> Self {
        Self {
            list_depth: self.list_depth + 1,
            list_ordered: ordered,
            list_item_index: -1,
            ..self
        }
    }

    /// Same context with the item counter set to `index`.
    pub fn with_item_index(self, index: i32) -> Self {
        Self {
            list_item_index: index,
            ..self
        }
    }

    /// Context for the children of a `thead`/`tbody`.
    pub fn enter_table_section(self, section: TableSection) -> Self {
        Self {
            table_section: section,
            ..self
        }
    }

    /// Context for the children of an `svg` element.
    pub fn enter_space(self, space: Space) -> Self {
        Self { space, ..self }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::root()
    }
}
