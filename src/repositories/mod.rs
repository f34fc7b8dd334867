pub mod booking_repository;
pub mod bus_repository;
pub mod favorite_repository;
pub mod location_repository;
pub mod route_repository;
pub mod template_repository;
