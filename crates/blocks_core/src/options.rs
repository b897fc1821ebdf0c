pub const DEFAULT_MAX_LIST_DEPTH: usize = 2;
pub const DEFAULT_SELECT_PLACEHOLDER: &str = "Select options:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Deepest list level that may still nest children, the root list being
    /// level 0. Items at this level keep their text but lose nested lists.
    pub max_list_depth: usize,
    /// Abort the whole conversion on the first unresolvable URL instead of
    /// skipping the offending element.
    pub strict_urls: bool,
    /// Use the document's own `<base href>` for resolution when present.
    pub honor_base_element: bool,
    /// Toggle header for a `select` without an `id`.
    pub select_placeholder: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_list_depth: DEFAULT_MAX_LIST_DEPTH,
            strict_urls: false,
            honor_base_element: true,
            select_placeholder: DEFAULT_SELECT_PLACEHOLDER.to_string(),
        }
    }
}
