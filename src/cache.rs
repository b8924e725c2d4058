use ahash::AHashMap;
use parking_lot::Mutex;

use crate::errors::StmtCacheError;

#[derive(Debug)]
struct Node<H> {
    key: String,
    handle: H,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct LruState<H> {
    map: AHashMap<String, usize>,
    nodes: Vec<Option<Node<H>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

/// Fixed-capacity LRU cache of opaque prepared-statement handles.
///
/// Best-effort only: an entry may be evicted at any time and callers must
/// treat a miss as normal control flow. Eviction merely forgets the stored
/// handle clone; the driver disposes of the underlying resource when the
/// last clone drops.
///
/// Recency is a doubly linked list over an arena of nodes with index links
/// (head = most recent, tail = least recent); the key map holds non-owning
/// indices into the arena, so every operation is O(1).
#[derive(Debug)]
pub struct LruStatementCache<H> {
    capacity: usize,
    state: Mutex<LruState<H>>,
}

impl<H: Clone> LruStatementCache<H> {
    pub fn new(capacity: usize) -> Result<Self, StmtCacheError> {
        if capacity < 1 {
            return Err(StmtCacheError::invalid_config(
                "LRU cache capacity must be >= 1",
            ));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(LruState {
                map: AHashMap::with_capacity(capacity),
                nodes: Vec::with_capacity(capacity),
                free: Vec::new(),
                head: None,
                tail: None,
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a clone of the cached handle and marks the entry most
    /// recently used. `None` is a miss, never an error.
    pub fn get(&self, key: &str) -> Option<H> {
        let mut state = self.state.lock();
        let idx = *state.map.get(key)?;
        state.unlink(idx);
        state.link_front(idx);
        Some(state.node(idx).handle.clone())
    }

    /// Inserts or replaces `key`, making it the most recently used entry.
    /// A new key that pushes the cache over capacity evicts exactly the
    /// least recently used entry.
    pub fn set(&self, key: &str, handle: H) {
        let mut state = self.state.lock();
        if let Some(&idx) = state.map.get(key) {
            state.node_mut(idx).handle = handle;
            state.unlink(idx);
            state.link_front(idx);
            return;
        }

        let idx = state.allocate(key.to_string(), handle);
        state.map.insert(key.to_string(), idx);
        state.link_front(idx);

        if state.map.len() > self.capacity {
            state.evict_tail();
        }
    }

    /// Drops every entry; the cache afterwards behaves as newly constructed.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.map.clear();
        state.nodes.clear();
        state.free.clear();
        state.head = None;
        state.tail = None;
    }

    pub fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> LruState<H> {
    fn node(&self, idx: usize) -> &Node<H> {
        self.nodes[idx].as_ref().expect("live node")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<H> {
        self.nodes[idx].as_mut().expect("live node")
    }

    fn allocate(&mut self, key: String, handle: H) -> usize {
        let node = Node {
            key,
            handle,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            self.node_mut(h).prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    fn evict_tail(&mut self) {
        // Only called right after an insert pushed the map over capacity,
        // so the tail exists.
        let Some(idx) = self.tail else { return };
        self.unlink(idx);
        let node = self.nodes[idx].take().expect("live tail node");
        self.map.remove(&node.key);
        self.free.push(idx);
    }
}
