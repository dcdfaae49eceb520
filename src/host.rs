//! The host environment a registry creates instances in.
//!
//! The host owns the live object graph: it can list the objects of a type that
//! already exist, build a fresh one, pin an object so it survives context
//! transitions, and remove an object. [`LocalHost`] is an in-memory graph that is
//! enough for services and tests that have no engine of their own.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::Singleton;

/// Host environment contract consumed by the registry.
pub trait Host: Send + Sync + 'static {
    /// Live objects of type `T`, in the host's enumeration order.
    fn find_existing<T: Singleton>(&self) -> Vec<Arc<T>>;

    /// Builds and adds a fresh, minimal live instance.
    fn instantiate<T: Singleton>(&self) -> Arc<T>;

    /// Pins `instance` so it survives context transitions.
    fn mark_persistent<T: Singleton>(&self, instance: &Arc<T>);

    /// Removes `instance` from the live graph.
    ///
    /// The registry's teardown hook is run by `Registry::destroy`; a host that
    /// removes objects on its own must call `Registry::on_destroyed` itself.
    fn destroy<T: Singleton>(&self, instance: &Arc<T>);
}

#[derive(Debug, Clone)]
struct LiveObject {
    value: Arc<dyn Any + Send + Sync>,
    persistent: bool,
}

/// In-memory object graph.
///
/// `LocalHost` knows nothing about registries: removing an object through
/// [`Host::destroy`] does not run any teardown hook. Tear a held singleton down
/// with `Registry::destroy`, which removes the object and then notifies the
/// registry.
#[derive(Debug, Default)]
pub struct LocalHost {
    objects: DashMap<TypeId, Vec<LiveObject>>,
    instantiated: AtomicUsize,
    destroyed: AtomicUsize,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to the graph as if something else had created it.
    pub fn spawn<T: Singleton>(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.insert(value.clone());
        value
    }

    /// Live objects of type `T`.
    pub fn live<T: Singleton>(&self) -> Vec<Arc<T>> {
        self.objects
            .get(&TypeId::of::<T>())
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|o| o.value.clone().downcast::<T>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_persistent<T: Singleton>(&self, instance: &Arc<T>) -> bool {
        self.objects
            .get(&TypeId::of::<T>())
            .map(|objects| {
                objects
                    .iter()
                    .any(|o| o.persistent && same_object(&o.value, instance))
            })
            .unwrap_or(false)
    }

    /// Context transition: drops every object that was not marked persistent.
    /// Returns how many were dropped.
    pub fn end_context(&self) -> usize {
        let mut dropped = 0;
        for mut entry in self.objects.iter_mut() {
            let before = entry.len();
            entry.retain(|o| o.persistent);
            dropped += before - entry.len();
        }
        tracing::debug!(dropped, "context ended");
        dropped
    }

    /// Number of `instantiate` calls so far.
    pub fn instantiate_count(&self) -> usize {
        self.instantiated.load(Ordering::SeqCst)
    }

    /// Number of `destroy` calls that removed an object.
    pub fn destroy_count(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn insert<T: Singleton>(&self, value: Arc<T>) {
        self.objects
            .entry(TypeId::of::<T>())
            .or_default()
            .push(LiveObject {
                value: value as Arc<dyn Any + Send + Sync>,
                persistent: false,
            });
    }
}

fn same_object<T: Singleton>(object: &Arc<dyn Any + Send + Sync>, instance: &Arc<T>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(object) as *const (),
        Arc::as_ptr(instance) as *const (),
    )
}

impl Host for LocalHost {
    fn find_existing<T: Singleton>(&self) -> Vec<Arc<T>> {
        self.live::<T>()
    }

    fn instantiate<T: Singleton>(&self) -> Arc<T> {
        self.instantiated.fetch_add(1, Ordering::SeqCst);
        let value = Arc::new(T::default());
        self.insert(value.clone());
        value
    }

    fn mark_persistent<T: Singleton>(&self, instance: &Arc<T>) {
        if let Some(mut objects) = self.objects.get_mut(&TypeId::of::<T>()) {
            for object in objects.iter_mut() {
                if same_object(&object.value, instance) {
                    object.persistent = true;
                }
            }
        }
    }

    fn destroy<T: Singleton>(&self, instance: &Arc<T>) {
        if let Some(mut objects) = self.objects.get_mut(&TypeId::of::<T>()) {
            let before = objects.len();
            objects.retain(|o| !same_object(&o.value, instance));
            if objects.len() < before {
                self.destroyed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(
                    object = std::any::type_name::<T>(),
                    "object removed from host; registries are not notified"
                );
            }
        }
    }
}
