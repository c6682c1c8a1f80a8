/// Ordered list of map identifiers and a cursor into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSequence {
    ids: Vec<String>,
    current: usize,
}

impl LevelSequence {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids, current: 0 }
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current_id(&self) -> Option<&str> {
        self.ids.get(self.current).map(String::as_str)
    }

    /// The level after the current one, if any.
    pub fn next_id(&self) -> Option<&str> {
        self.ids.get(self.current + 1).map(String::as_str)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.ids.len()
    }

    /// Move the cursor forward. Returns false at the end of the list.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> LevelSequence {
        LevelSequence::new(vec!["a".into(), "b".into(), "c".into()])
    }

    #[test]
    fn walks_in_order() {
        let mut s = seq();
        assert_eq!(s.current_id(), Some("a"));
        assert_eq!(s.next_id(), Some("b"));
        assert!(s.advance());
        assert!(s.advance());
        assert_eq!(s.current_id(), Some("c"));
        assert_eq!(s.index(), 2);
        assert!(s.is_last());
        assert!(s.next_id().is_none());
    }

    #[test]
    fn advance_stops_at_the_end() {
        let mut s = seq();
        s.advance();
        s.advance();
        assert!(!s.advance());
        assert_eq!(s.current_id(), Some("c"));
    }

    #[test]
    fn empty_sequence() {
        let s = LevelSequence::new(Vec::new());
        assert!(s.is_empty());
        assert!(s.current_id().is_none());
        assert!(s.is_last());
    }
}
