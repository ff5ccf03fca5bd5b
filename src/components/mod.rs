pub mod carousel;
pub mod header;
pub mod protected_route;
