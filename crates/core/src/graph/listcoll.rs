use alloc::vec::Vec;

use super::{Index, NIL};

/// A collection of disjoint circular doubly-linked lists over a shared
/// element space `[0..capacity)`.
///
/// The `prev`/`next` pointers for element `e` live at offset `e` of two
/// parallel arrays, so membership costs no allocation and every operation
/// is O(1). A list is identified by its head element; `NIL` is the empty
/// list. An element belongs to at most one list at a time.
///
/// This is the substrate for the pertinent-bicomp lists and the separated
/// DFS child lists: both store vertex-sized element ids and are rebuilt as
/// scratch state during each iteration of the embedder's main loop.
#[derive(Debug, Clone)]
pub struct ListColl {
    prev: Vec<Index>,
    next: Vec<Index>,
}

impl ListColl {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            prev: alloc::vec![NIL; capacity],
            next: alloc::vec![NIL; capacity],
        }
    }

    /// Detach every element. O(capacity).
    pub fn reset(&mut self) {
        self.prev.fill(NIL);
        self.next.fill(NIL);
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.next.len()
    }

    /// True when `elem` is currently linked into some list.
    #[inline]
    #[must_use]
    pub fn is_linked(&self, elem: Index) -> bool {
        self.next[elem] != NIL
    }

    /// Append `elem` at the tail of `head`'s list; returns the new head.
    #[inline]
    pub fn append(&mut self, head: Index, elem: Index) -> Index {
        if head == NIL {
            self.prev[elem] = elem;
            self.next[elem] = elem;
            return elem;
        }
        let tail = self.prev[head];
        self.next[tail] = elem;
        self.prev[elem] = tail;
        self.next[elem] = head;
        self.prev[head] = elem;
        head
    }

    /// Insert `elem` before the current head; `elem` becomes the new head.
    #[inline]
    pub fn prepend(&mut self, head: Index, elem: Index) -> Index {
        self.append(head, elem);
        elem
    }

    /// Unlink `elem` from `head`'s list; returns the new head.
    #[inline]
    pub fn delete(&mut self, head: Index, elem: Index) -> Index {
        let new_head = if self.next[elem] == elem {
            NIL
        } else if elem == head {
            self.next[elem]
        } else {
            head
        };
        let (p, n) = (self.prev[elem], self.next[elem]);
        if p != NIL {
            self.next[p] = n;
            self.prev[n] = p;
        }
        self.prev[elem] = NIL;
        self.next[elem] = NIL;
        new_head
    }

    /// Successor of `elem` within `head`'s list, or `NIL` after the tail.
    #[inline]
    #[must_use]
    pub fn get_next(&self, head: Index, elem: Index) -> Index {
        let n = self.next[elem];
        if n == head {
            NIL
        } else {
            n
        }
    }

    /// Last element of `head`'s list, or `NIL` for the empty list.
    #[inline]
    #[must_use]
    pub fn last(&self, head: Index) -> Index {
        if head == NIL {
            NIL
        } else {
            self.prev[head]
        }
    }

    /// Iterate a list from head to tail.
    pub fn iter(&self, head: Index) -> ListIter<'_> {
        ListIter {
            coll: self,
            head,
            cur: head,
            started: false,
        }
    }
}

pub struct ListIter<'a> {
    coll: &'a ListColl,
    head: Index,
    cur: Index,
    started: bool,
}

impl Iterator for ListIter<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        if self.head == NIL {
            return None;
        }
        if self.started {
            self.cur = self.coll.next[self.cur];
            if self.cur == self.head {
                return None;
            }
        } else {
            self.started = true;
        }
        Some(self.cur)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn test_append_iter() {
        let mut coll = ListColl::new(8);
        let mut head = NIL;
        head = coll.append(head, 3);
        head = coll.append(head, 5);
        head = coll.append(head, 1);
        assert_eq!(head, 3);
        assert_eq!(coll.iter(head).collect::<Vec<_>>(), alloc::vec![3, 5, 1]);
        assert_eq!(coll.last(head), 1);
    }

    #[test]
    fn test_prepend() {
        let mut coll = ListColl::new(8);
        let mut head = NIL;
        head = coll.append(head, 2);
        head = coll.prepend(head, 7);
        assert_eq!(head, 7);
        assert_eq!(coll.iter(head).collect::<Vec<_>>(), alloc::vec![7, 2]);
    }

    #[test]
    fn test_delete() {
        let mut coll = ListColl::new(8);
        let mut head = NIL;
        for e in [4, 6, 2] {
            head = coll.append(head, e);
        }
        head = coll.delete(head, 6);
        assert_eq!(coll.iter(head).collect::<Vec<_>>(), alloc::vec![4, 2]);
        head = coll.delete(head, 4);
        assert_eq!(head, 2);
        head = coll.delete(head, 2);
        assert_eq!(head, NIL);
        assert!(!coll.is_linked(4));
    }

    #[test]
    fn test_get_next_wraps_to_nil() {
        let mut coll = ListColl::new(4);
        let head = coll.append(NIL, 0);
        let head = coll.append(head, 1);
        assert_eq!(coll.get_next(head, 0), 1);
        assert_eq!(coll.get_next(head, 1), NIL);
    }
}
