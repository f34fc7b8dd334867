pub mod booking_controller;
pub mod route_controller;
