//! Read-through cache of one remote list.
//!
//! Every reload takes a fresh [`RequestSeq`]; an outcome is applied only if it
//! carries the newest one. A slow response to a superseded query can therefore
//! never overwrite the state produced by a newer query.

/// Monotonic tag of an issued request, per store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

/// What `finish` did with an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ResourceStore<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    latest: RequestSeq,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            latest: RequestSeq::default(),
        }
    }
}

impl<T> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a reload as issued and returns its tag.
    pub fn begin(&mut self) -> RequestSeq {
        self.latest = RequestSeq(self.latest.0 + 1);
        self.loading = true;
        self.latest
    }

    fn is_latest(&self, seq: RequestSeq) -> bool {
        seq == self.latest
    }

    /// Applies the outcome of the request tagged `seq`.
    ///
    /// Success replaces the whole list; failure empties it and records the
    /// message. Outcomes of superseded requests are dropped untouched.
    pub fn finish(&mut self, seq: RequestSeq, outcome: Result<Vec<T>, String>) -> Applied {
        if !self.is_latest(seq) {
            return Applied::Stale;
        }
        self.loading = false;
        match outcome {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(message) => {
                self.items.clear();
                self.error = Some(message);
            }
        }
        Applied::Fresh
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_replaces_and_failure_empties() {
        let mut store = ResourceStore::new();
        let seq = store.begin();
        assert!(store.loading());
        assert_eq!(store.finish(seq, Ok(vec![1, 2, 3])), Applied::Fresh);
        assert_eq!(store.items(), &[1, 2, 3]);
        assert!(!store.loading());

        let seq = store.begin();
        store.finish(seq, Err("server tidak dapat dihubungi".to_string()));
        assert!(store.is_empty());
        assert_eq!(store.error(), Some("server tidak dapat dihubungi"));

        let seq = store.begin();
        store.finish(seq, Ok(vec![4]));
        assert_eq!(store.error(), None);
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut store = ResourceStore::new();
        let old = store.begin();
        let new = store.begin();

        assert_eq!(store.finish(new, Ok(vec!["new"])), Applied::Fresh);
        assert_eq!(store.finish(old, Ok(vec!["old"])), Applied::Stale);
        assert_eq!(store.items(), &["new"]);

        let old = store.begin();
        let _new = store.begin();
        assert_eq!(store.finish(old, Err("boom".to_string())), Applied::Stale);
        assert!(store.loading());
        assert_eq!(store.items(), &["new"]);
    }
}
