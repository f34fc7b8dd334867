pub mod route_search_service;
pub mod stop_resolution_service;
pub mod ticket_service;
