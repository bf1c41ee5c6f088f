pub mod health;
pub mod sites;

macros_utils::routes! {
    module health,
    module sites,
}
