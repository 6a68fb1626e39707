use oxc_sourcemap::SourceMap;

/// A module's source text as read by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    pub id: String,
    pub code: String,
}

impl SourceModule {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
        }
    }
}

/// Result of folding every `transform` hook over one module.
#[derive(Debug, Clone)]
pub struct TransformedModule {
    pub id: String,
    pub code: String,
    /// Source maps in the order their transforms were applied.
    pub maps: Vec<SourceMap>,
}

impl TransformedModule {
    /// `true` if no plugin produced a source map.
    pub fn is_unmapped(&self) -> bool {
        self.maps.is_empty()
    }
}
