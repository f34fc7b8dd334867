pub mod booking;
pub mod bus;
pub mod location;
pub mod route;
