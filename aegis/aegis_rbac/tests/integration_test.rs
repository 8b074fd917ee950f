//! End-to-end tests of the resolution pipeline: store, hierarchy,
//! checker, synchronizer, and cache working together.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aegis_core::error::CacheError;
use aegis_core::ResolutionConfig;
use aegis_rbac::{
    AssignmentStore, AssignmentSynchronizer, InMemoryAuthzStore, InMemoryResolutionCache,
    Permission, PermissionChecker, PermissionKind, ResolutionCache, Role,
};

struct Stack {
    store: Arc<InMemoryAuthzStore>,
    checker: PermissionChecker,
    sync: AssignmentSynchronizer,
}

fn stack_with_cache(cache: Arc<dyn ResolutionCache>) -> Stack {
    let store = Arc::new(InMemoryAuthzStore::new());
    let config = ResolutionConfig::default();
    let checker = PermissionChecker::with_cache(
        store.clone(),
        store.clone(),
        cache.clone(),
        config.clone(),
    );
    let sync = AssignmentSynchronizer::with_cache(store.clone(), store.clone(), cache, config);
    Stack {
        store,
        checker,
        sync,
    }
}

/// content (module)
///   content.posts (module)
///     content.posts.edit (action)
///   content.publish (action)
fn seed(store: &InMemoryAuthzStore) -> (Permission, Permission, Permission, Permission) {
    let m = Permission::new("Content", "content", PermissionKind::Module);
    store.insert(m.clone()).unwrap();
    let a = Permission::new("Posts", "content.posts", PermissionKind::Module).with_parent(m.id);
    store.insert(a.clone()).unwrap();
    let b = Permission::new("Publish", "content.publish", PermissionKind::Action)
        .with_parent(m.id);
    store.insert(b.clone()).unwrap();
    let c = Permission::new("Edit", "content.posts.edit", PermissionKind::Action)
        .with_parent(a.id);
    store.insert(c.clone()).unwrap();
    (m, a, b, c)
}

#[test]
fn sync_then_check_reflects_module_visibility() {
    let stack = stack_with_cache(Arc::new(InMemoryResolutionCache::new()));
    let (m, a, b, c) = seed(&stack.store);
    let editors = Role::new("Editors", "editors");

    stack
        .sync
        .sync_permissions(&editors, [c.id].into_iter().collect(), false)
        .unwrap();

    assert!(stack.checker.has_permission(&editors, &c.slug).unwrap());
    assert!(stack.checker.has_permission(&editors, &a.slug).unwrap());
    assert!(stack.checker.has_permission(&editors, &m.slug).unwrap());
    assert!(!stack.checker.has_permission(&editors, &b.slug).unwrap());
}

#[test]
fn resync_invalidates_cached_outcomes_immediately() {
    let stack = stack_with_cache(Arc::new(InMemoryResolutionCache::new()));
    let (_, _, b, c) = seed(&stack.store);
    let editors = Role::new("Editors", "editors");

    stack
        .sync
        .sync_permissions(&editors, [c.id].into_iter().collect(), false)
        .unwrap();
    // Populate the cache with a grant and a deny.
    assert!(stack.checker.has_permission(&editors, &c.slug).unwrap());
    assert!(!stack.checker.has_permission(&editors, &b.slug).unwrap());

    // Flip the assignment; the TTL has not expired, so only eviction
    // can make the new state visible.
    stack
        .sync
        .sync_permissions(&editors, [b.id].into_iter().collect(), false)
        .unwrap();

    assert!(!stack.checker.has_permission(&editors, &c.slug).unwrap());
    assert!(stack.checker.has_permission(&editors, &b.slug).unwrap());
}

#[test]
fn recursive_sync_grants_whole_subtree() {
    let stack = stack_with_cache(Arc::new(InMemoryResolutionCache::new()));
    let (m, a, b, c) = seed(&stack.store);
    let admins = Role::new("Admins", "admins");

    stack
        .sync
        .sync_permissions(&admins, [a.id].into_iter().collect(), true)
        .unwrap();

    let assigned: HashSet<_> = [a.id, c.id].into_iter().collect();
    assert_eq!(stack.store.assigned_ids(&admins.id).unwrap(), assigned);
    assert!(stack.checker.has_permission(&admins, &c.slug).unwrap());
    assert!(stack.checker.has_permission(&admins, &m.slug).unwrap());
    assert!(!stack.checker.has_permission(&admins, &b.slug).unwrap());
}

#[test]
fn descendant_and_ancestor_queries_round_out_the_surface() {
    let stack = stack_with_cache(Arc::new(InMemoryResolutionCache::new()));
    let (m, a, b, c) = seed(&stack.store);

    let descendants = stack.checker.all_descendant_ids(m.id).unwrap();
    assert_eq!(descendants, [a.id, b.id, c.id].into_iter().collect());

    let chain = stack.checker.ancestors(c.id).unwrap();
    let ids: Vec<_> = chain.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a.id, m.id]);

    let tree = stack.checker.permission_tree(m.id).unwrap().unwrap();
    assert_eq!(tree.slug, "content");
    assert_eq!(tree.children.len(), 2);
}

/// A cache without scoped eviction: the synchronizer must fall back to
/// a full flush rather than leave another role's entries stale.
struct UnscopedCache {
    inner: InMemoryResolutionCache,
    flushes: AtomicUsize,
}

impl UnscopedCache {
    fn new() -> Self {
        Self {
            inner: InMemoryResolutionCache::new(),
            flushes: AtomicUsize::new(0),
        }
    }
}

impl ResolutionCache for UnscopedCache {
    fn get(&self, key: &str) -> Result<Option<bool>, CacheError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: bool, ttl: Duration) -> Result<(), CacheError> {
        self.inner.put(key, value, ttl)
    }

    fn evict_scope(&self, _prefix: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend(
            "scoped eviction not supported".to_string(),
        ))
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.inner.clear()
    }

    fn supports_scoped_eviction(&self) -> bool {
        false
    }
}

#[test]
fn sync_falls_back_to_full_flush_without_scoped_eviction() {
    let cache = Arc::new(UnscopedCache::new());
    let stack = stack_with_cache(cache.clone());
    let (_, _, _, c) = seed(&stack.store);
    let editors = Role::new("Editors", "editors");
    let viewers = Role::new("Viewers", "viewers");

    stack
        .sync
        .sync_permissions(&editors, [c.id].into_iter().collect(), false)
        .unwrap();
    assert!(stack.checker.has_permission(&editors, &c.slug).unwrap());
    assert!(!stack.checker.has_permission(&viewers, &c.slug).unwrap());

    stack
        .sync
        .sync_permissions(&editors, HashSet::new(), false)
        .unwrap();

    assert!(cache.flushes.load(Ordering::Relaxed) >= 1);
    assert!(!stack.checker.has_permission(&editors, &c.slug).unwrap());
}

/// A cache whose backend is down. Checks must degrade to direct
/// computation and still answer.
struct BrokenCache;

impl ResolutionCache for BrokenCache {
    fn get(&self, _key: &str) -> Result<Option<bool>, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    fn put(&self, _key: &str, _value: bool, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    fn evict_scope(&self, _prefix: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    fn clear(&self) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    fn supports_scoped_eviction(&self) -> bool {
        true
    }
}

#[test]
fn broken_cache_never_fails_a_check_or_a_sync() {
    let stack = stack_with_cache(Arc::new(BrokenCache));
    let (m, _, _, c) = seed(&stack.store);
    let editors = Role::new("Editors", "editors");

    stack
        .sync
        .sync_permissions(&editors, [c.id].into_iter().collect(), false)
        .unwrap();

    assert!(stack.checker.has_permission(&editors, &c.slug).unwrap());
    assert!(stack.checker.has_permission(&editors, &m.slug).unwrap());
    assert!(!stack
        .checker
        .has_permission(&editors, "no.such.slug")
        .unwrap());
}

#[test]
fn master_role_bypasses_with_any_cache_state() {
    let stack = stack_with_cache(Arc::new(BrokenCache));
    seed(&stack.store);
    let master = Role::new("Master", "master-admin");

    assert!(stack.checker.has_permission(&master, "content").unwrap());
    assert!(stack
        .checker
        .has_permission(&master, "slug.that.does.not.exist")
        .unwrap());
}
