use std::collections::HashSet;
use std::sync::Arc;

/// String intern cache for metadata fields.
///
/// Flow-cell ids, instrument names and multiplex tags repeat across every
/// read on a run; interning keeps one allocation per distinct value. One
/// interner is created per run and handed to record construction.
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared copy of `s`, storing it on first sight.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(s);
        self.strings.insert(Arc::clone(&shared));
        shared
    }

    /// Number of distinct strings held.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
