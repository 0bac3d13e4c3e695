//! Append-only bidirectional dictionary between label (or path) strings and dense integer ids.
//!
//! Ids are assigned strictly in first-seen order so a fixed traversal order over the graph
//! gives a deterministic dictionary. The dictionary never shrinks within one computation.


use indexmap::IndexSet;


/// label string <-> integer id table. An [IndexSet] keeps the insertion sequence and
/// the reverse lookup in one structure.
#[derive(Debug, Clone, Default)]
pub struct LabelDict {
    table : IndexSet<String>,
} // end of struct LabelDict


impl LabelDict {

    pub fn new() -> Self {
        LabelDict{table : IndexSet::new()}
    }

    /// id of label, assigning the next free id on first sight
    pub fn get_or_insert(&mut self, label : &str) -> usize {
        match self.table.get_index_of(label) {
            Some(id) => id,
            None => self.table.insert_full(label.to_string()).0,
        }
    } // end of get_or_insert

    /// id of an already seen label, None if the label was never inserted
    pub fn get_id(&self, label : &str) -> Option<usize> {
        self.table.get_index_of(label)
    }

    /// label from id
    pub fn get_label(&self, id : usize) -> Option<&str> {
        self.table.get_index(id).map(|s| s.as_str())
    }

    /// number of ids assigned so far
    pub fn len(&self) -> usize {
        self.table.len()
    }

    ///
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

} // end of impl LabelDict


//========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn dict_assigns_ids_in_first_seen_order() {
        let mut dict = LabelDict::new();
        assert_eq!(dict.get_or_insert("a"), 0);
        assert_eq!(dict.get_or_insert("b"), 1);
        assert_eq!(dict.get_or_insert("c"), 2);
        // reinserting must not assign a new id
        assert_eq!(dict.get_or_insert("b"), 1);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn dict_is_bidirectional() {
        let mut dict = LabelDict::new();
        let id = dict.get_or_insert("some label");
        assert_eq!(dict.get_label(id), Some("some label"));
        assert_eq!(dict.get_id("some label"), Some(id));
        assert_eq!(dict.get_id("never seen"), None);
        assert_eq!(dict.get_label(57), None);
    }

} // end of mod tests
