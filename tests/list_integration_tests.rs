//! Integration Tests for the Ordered List
//!
//! Exercises the public API the way a cache built on top of it would:
//! a caller-owned key index, a capacity policy and concurrent callers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

use recency_list::{ListConfig, ListError, NodeRef, OrderedList};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "recency_list=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Minimal cache over the list: the index and capacity policy live here.
struct TestCache {
    list: OrderedList<String>,
    index: HashMap<String, NodeRef>,
    capacity: usize,
}

impl TestCache {
    fn new(capacity: usize) -> Self {
        Self {
            list: OrderedList::new(),
            index: HashMap::new(),
            capacity,
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(node) = self.index.remove(key) {
            self.list.remove_node(node).unwrap();
        } else if self.index.len() >= self.capacity {
            let evicted = self.list.remove_last().unwrap();
            self.index.remove(&evicted.key);
        }
        let node = self.list.insert(key, value.to_string(), 60);
        self.index.insert(key.to_string(), node);
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let node = *self.index.get(key)?;
        let element = self.list.remove_node(node).ok()?;
        let refreshed = self.list.insert(element.key, element.value.clone(), element.ttl);
        self.index.insert(key.to_string(), refreshed);
        Some(element.value)
    }
}

// == Scenario Tests ==

#[test]
fn test_insert_peek_evict_remove_scenario() {
    init_tracing();
    let list = OrderedList::new();

    list.insert("a", 1, 60);
    let node_b = list.insert("b", 2, 60);

    assert_eq!(list.get_last_node().unwrap().key, "a");

    let evicted = list.remove_last().unwrap();
    assert_eq!(evicted.key, "a");
    assert_eq!(evicted.value, 1);
    assert_eq!(list.len(), 1);

    let removed = list.remove_node(node_b).unwrap();
    assert_eq!(removed.key, "b");
    assert_eq!(removed.value, 2);
    assert_eq!(list.len(), 0);

    assert_eq!(list.get_last_node().unwrap_err(), ListError::EmptyList);
}

#[test]
fn test_empty_list_reports_empty() {
    init_tracing();
    let list: OrderedList<i32> = OrderedList::with_config(&ListConfig::default());
    let node = OrderedList::new().insert("elsewhere", 0, 60);

    assert!(matches!(list.remove_last(), Err(ListError::EmptyList)));
    assert!(matches!(list.remove_node(node), Err(ListError::EmptyList)));
    assert!(matches!(list.get_last_node(), Err(ListError::EmptyList)));
    assert_eq!(list.len(), 0);
}

#[test]
fn test_sweeper_reads_ttl_metadata() {
    init_tracing();
    let list = OrderedList::new();
    list.insert("short", (), 0);
    list.insert("long", (), 3600);

    let oldest = list.get_last_node().unwrap();
    assert_eq!(oldest.key, "short");
    assert_eq!(oldest.expires_at(), Some(oldest.created_at));

    // The list keeps expired entries until the caller removes them.
    assert_eq!(list.len(), 2);
    list.remove_node(oldest.node()).unwrap();
    assert_eq!(list.keys(), vec!["long"]);
}

#[test]
fn test_cache_evicts_least_recently_used() {
    init_tracing();
    let mut cache = TestCache::new(3);

    cache.set("key1", "value1");
    cache.set("key2", "value2");
    cache.set("key3", "value3");

    // Refresh key1 so key2 becomes the eviction candidate.
    assert_eq!(cache.get("key1").as_deref(), Some("value1"));
    cache.set("key4", "value4");

    assert!(cache.get("key2").is_none());
    assert_eq!(cache.list.len(), 3);
    assert_eq!(cache.list.keys(), vec!["key4", "key1", "key3"]);
    assert_eq!(cache.list.stats().evictions, 1);
}

#[test]
fn test_cache_overwrite_keeps_single_entry() {
    init_tracing();
    let mut cache = TestCache::new(2);

    cache.set("key1", "value1");
    cache.set("key1", "value2");

    assert_eq!(cache.list.len(), 1);
    assert_eq!(cache.get("key1").as_deref(), Some("value2"));
}

// == Concurrency Tests ==

#[test]
fn test_concurrent_inserts_lose_nothing() {
    init_tracing();
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let list = OrderedList::new();
    thread::scope(|scope| {
        for t in 0..THREADS {
            let list = &list;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    list.insert(format!("t{}-{}", t, i), i, 60);
                }
            });
        }
    });

    assert_eq!(list.len(), THREADS * PER_THREAD);

    let keys = list.keys();
    let unique: HashSet<&String> = keys.iter().collect();
    assert_eq!(keys.len(), THREADS * PER_THREAD);
    assert_eq!(unique.len(), THREADS * PER_THREAD);

    let mut backward = list.keys_from_lru();
    backward.reverse();
    assert_eq!(backward, keys);
}

#[test]
fn test_concurrent_insert_and_evict() {
    init_tracing();
    const THREADS: usize = 4;
    const PER_THREAD: usize = 200;

    let list = Arc::new(OrderedList::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                let mut evicted = 0;
                for i in 0..PER_THREAD {
                    list.insert(format!("t{}-{}", t, i), i, 60);
                    if i % 2 == 1 && list.remove_last().is_ok() {
                        evicted += 1;
                    }
                }
                evicted
            })
        })
        .collect();

    let evicted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(list.len(), THREADS * PER_THREAD - evicted);
    assert_eq!(list.keys().len(), list.len());
    let stats = list.stats();
    assert_eq!(stats.inserts as usize, THREADS * PER_THREAD);
    assert_eq!(stats.evictions as usize, evicted);
}

#[test]
fn test_concurrent_remove_node_each_exactly_once() {
    init_tracing();
    let list = OrderedList::new();
    let nodes: Vec<NodeRef> = (0..400).map(|i| list.insert(format!("k{}", i), i, 60)).collect();

    let removed: usize = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let list = &list;
                let nodes = &nodes;
                // Every worker tries every handle; only one may succeed per handle.
                scope.spawn(move || nodes.iter().filter(|n| list.remove_node(**n).is_ok()).count())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).sum()
    });

    assert_eq!(removed, 400);
    assert!(list.is_empty());
}

// == Stats Report ==

#[test]
fn test_stats_serialize_to_json() {
    init_tracing();
    let list = OrderedList::new();
    list.insert("a", 1, 60);
    list.insert("b", 2, 60);
    list.remove_last().unwrap();

    let json: Value = serde_json::to_value(list.stats()).unwrap();
    assert_eq!(json["inserts"], 2);
    assert_eq!(json["evictions"], 1);
    assert_eq!(json["total_entries"], 1);
}
