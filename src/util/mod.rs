pub mod guard;
pub mod mirror;
pub mod navigation;
pub mod routes;
pub mod subscription;
