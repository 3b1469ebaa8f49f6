//! Item context
//!
//! Carries "which image of which page am I working on" into log lines

use std::fmt::Display;

/// Context of one image inside a page
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// Group name of the page
    pub page_name: String,

    /// Page position in the run (1-based, logs only)
    pub page_index: usize,

    /// Image position in the page (1-based)
    pub item_index: usize,

    pub file_name: String,
}

impl ItemCtx {
    pub fn new(
        page_name: impl Into<String>,
        page_index: usize,
        item_index: usize,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            page_name: page_name.into(),
            page_index,
            item_index,
            file_name: file_name.into(),
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[page #{} {} item #{} {}]",
            self.page_index, self.page_name, self.item_index, self.file_name
        )
    }
}
