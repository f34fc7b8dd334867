use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Horario dentro de la publicación de una ruta
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub start_time: String,
    pub end_time: String,
}

// Descriptor de parada explícita: nombre + geodatos opcionales
#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub district: Option<String>,
    pub state: Option<String>,
}

// Geodatos opcionales para enriquecer un extremo de la ruta
#[derive(Debug, Deserialize)]
pub struct EndpointDetails {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub district: Option<String>,
    pub state: Option<String>,
}

// Request para publicar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub start_location: String,

    #[validate(length(min = 1, max = 100))]
    pub end_location: String,

    #[validate(length(max = 100))]
    pub via: Option<String>,

    pub trips: Vec<TripRequest>,

    // Solo se usan cuando no existe plantilla en ninguna dirección
    pub stops: Option<Vec<StopRequest>>,

    pub start_details: Option<EndpointDetails>,
    pub end_details: Option<EndpointDetails>,
}

// Response de parada dentro de una ruta
#[derive(Debug, Serialize)]
pub struct RouteStopResponse {
    pub stop_number: i32,
    pub location_name: String,
}

// Response de horario
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// Response de ruta para publicación, búsqueda y listados
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub bus_name: String,
    pub start_location: String,
    pub end_location: String,
    pub via: Option<String>,
    pub trips: Vec<TripResponse>,
    pub stop_list: Vec<RouteStopResponse>,
    pub is_booking_open: bool,
    pub effective_status: String,
}

// Query de búsqueda de itinerarios
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

// Query de sugerencias de ubicaciones
#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub q: Option<String>,
}

// Query de vias de plantilla entre dos extremos
#[derive(Debug, Deserialize)]
pub struct TemplateViasQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

// Una via conocida entre dos extremos, con su secuencia de paradas
#[derive(Debug, Serialize)]
pub struct TemplateViaResponse {
    pub via: String,
    pub stops: Vec<String>,
}

// Request para cambiar el estado de una ruta
#[derive(Debug, Deserialize)]
pub struct ToggleStatusRequest {
    pub route_id: Uuid,
    pub status: String,
}

// Request para marcar/desmarcar favorita
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub route_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub route_id: Uuid,
    pub favorited: bool,
}
