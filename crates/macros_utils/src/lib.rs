//! Small declarative helpers shared by the HTTP apps.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web as __actix_web;

/// Generates a `pub fn routes(cfg: &mut ServiceConfig)` that registers
/// every listed handler (as produced by actix's route attributes) and
/// every listed sub-module's own `routes` function.
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
///     module sites,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($($kind:ident $item:ident),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::__actix_web::web::ServiceConfig) {
            $( $crate::routes!(@register cfg, $kind $item); )*
        }
    };
    (@register $cfg:ident, route $handler:ident) => {
        $cfg.service($handler);
    };
    (@register $cfg:ident, module $module:ident) => {
        $cfg.configure($module::routes);
    };
}
