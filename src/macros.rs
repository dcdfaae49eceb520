//! Macros for creating named, process-wide lifecycle registries.

/// Creates a module holding a process-wide [`Registry`](crate::Registry) and free
/// functions for every lifecycle operation.
///
/// The registry is built lazily on first use from the given host expression.
///
/// # Examples
///
/// The macro expands to a module that glob-imports its parent, so the host type
/// and expression resolve against the invoking module's imports.
///
/// ```rust
/// use singleton_lifecycle::{define_lifecycle, LocalHost, Singleton};
/// use std::sync::Arc;
///
/// define_lifecycle!(app: LocalHost = LocalHost::new());
///
/// #[derive(Default)]
/// struct Audio;
/// impl Singleton for Audio {}
///
/// fn main() {
///     let a: Arc<Audio> = app::get_instance_sync().unwrap();
///     let b: Arc<Audio> = app::get_instance_sync().unwrap();
///     assert!(Arc::ptr_eq(&a, &b));
///     assert!(app::is_initialized::<Audio>());
/// }
/// ```
///
/// # Multiple Registries
///
/// Each invocation owns independent state:
///
/// ```rust
/// use singleton_lifecycle::{define_lifecycle, LocalHost, Singleton};
///
/// define_lifecycle!(client: LocalHost = LocalHost::new());
/// define_lifecycle!(server: LocalHost = LocalHost::new());
///
/// #[derive(Default)]
/// struct Session;
/// impl Singleton for Session {}
///
/// fn main() {
///     client::quit();
///     assert!(client::get_instance_sync::<Session>().is_none());
///     assert!(server::get_instance_sync::<Session>().is_some());
/// }
/// ```
#[macro_export]
macro_rules! define_lifecycle {
    ($name:ident : $host:ty = $init:expr) => {
        pub mod $name {
            #![allow(dead_code, unused_imports)]

            use super::*;
            use std::sync::{Arc, LazyLock};

            // Process-wide registry (module-private)
            static REGISTRY: LazyLock<$crate::Registry<$host>> =
                LazyLock::new(|| $crate::Registry::new($init));

            /// The underlying registry.
            pub fn registry() -> &'static $crate::Registry<$host> {
                &REGISTRY
            }

            pub fn register<T: $crate::Singleton>(config: $crate::SingletonConfig) -> bool {
                REGISTRY.register::<T>(config)
            }

            pub fn register_metadata<T: $crate::Singleton>(metadata: &str) -> bool {
                REGISTRY.register_metadata::<T>(metadata)
            }

            pub fn config<T: $crate::Singleton>() -> $crate::SingletonConfig {
                REGISTRY.config::<T>()
            }

            pub fn get_instance_sync<T: $crate::Singleton>() -> Option<Arc<T>> {
                REGISTRY.get_instance_sync::<T>()
            }

            pub fn is_initialized<T: $crate::Singleton>() -> bool {
                REGISTRY.is_initialized::<T>()
            }

            pub fn is_ready<T: $crate::Singleton>() -> bool {
                REGISTRY.is_ready::<T>()
            }

            pub fn is_destroyed<T: $crate::Singleton>() -> bool {
                REGISTRY.is_destroyed::<T>()
            }

            pub async fn wait_for_instance<T: $crate::Singleton>(
                cancel: Option<$crate::CancellationToken>,
            ) -> Result<Arc<T>, $crate::LifecycleError> {
                REGISTRY.wait_for_instance::<T>(cancel).await
            }

            pub async fn wait_for_ready<T: $crate::Singleton>(
                cancel: Option<$crate::CancellationToken>,
            ) -> Result<Arc<T>, $crate::LifecycleError> {
                REGISTRY.wait_for_ready::<T>(cancel).await
            }

            pub async fn initialize<T: $crate::Singleton>() -> Result<Arc<T>, $crate::LifecycleError> {
                REGISTRY.initialize::<T>().await
            }

            pub fn take_initialization<T: $crate::Singleton>() -> Option<$crate::InitHandle<T>> {
                REGISTRY.take_initialization::<T>()
            }

            pub fn on_destroyed<T: $crate::Singleton>(instance: &Arc<T>) -> bool {
                REGISTRY.on_destroyed(instance)
            }

            pub fn destroy<T: $crate::Singleton>() -> bool {
                REGISTRY.destroy::<T>()
            }

            pub fn boot() -> usize {
                REGISTRY.boot()
            }

            pub fn quit() {
                REGISTRY.quit()
            }

            pub fn is_quitting() -> bool {
                REGISTRY.is_quitting()
            }

            /// Set a tracing callback for lifecycle events.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::LifecycleEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
