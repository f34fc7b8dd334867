pub mod booking_routes;
pub mod route_routes;
