use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_dto::{
    CreateRouteRequest, RouteResponse, RouteStopResponse, TemplateViaResponse, ToggleFavoriteResponse,
    ToggleStatusRequest, TripResponse,
};
use crate::models::location::LocationInput;
use crate::models::route::Route;
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::location_repository::LocationRepository;
use crate::repositories::route_repository::{PublishRoute, RouteRepository, RouteWithBus};
use crate::repositories::template_repository::TemplateRepository;
use crate::services::route_search_service::{end_index, matches_direction, start_index};
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_not_empty, validate_route_status, validate_time};

pub struct RouteController {
    routes: RouteRepository,
    templates: TemplateRepository,
    locations: LocationRepository,
    buses: BusRepository,
    favorites: FavoriteRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            templates: TemplateRepository::new(pool.clone()),
            locations: LocationRepository::new(pool.clone()),
            buses: BusRepository::new(pool.clone()),
            favorites: FavoriteRepository::new(pool),
        }
    }

    pub async fn publish(
        &self,
        user_id: Uuid,
        request: CreateRouteRequest,
    ) -> Result<RouteResponse, AppError> {
        // La validación corta antes de cualquier mutación
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_not_empty(&request.start_location, "start_location")?;
        validate_not_empty(&request.end_location, "end_location")?;

        if request.trips.is_empty() {
            return Err(AppError::ValidationError("At least one trip is required".to_string()));
        }
        let mut trips = Vec::with_capacity(request.trips.len());
        for trip in &request.trips {
            trips.push((validate_time(&trip.start_time)?, validate_time(&trip.end_time)?));
        }

        // El chequeo de propiedad va antes de cualquier efecto
        let bus = self
            .buses
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not registered as a bus operator.".to_string())
            })?;

        let mut start = LocationInput::from_name(&request.start_location);
        if let Some(details) = &request.start_details {
            start.latitude = details.latitude;
            start.longitude = details.longitude;
            start.district = details.district.clone();
            start.state = details.state.clone();
        }
        let mut end = LocationInput::from_name(&request.end_location);
        if let Some(details) = &request.end_details {
            end.latitude = details.latitude;
            end.longitude = details.longitude;
            end.district = details.district.clone();
            end.state = details.state.clone();
        }

        let explicit_stops = request
            .stops
            .unwrap_or_default()
            .into_iter()
            .map(|stop| LocationInput {
                name: stop.name,
                latitude: stop.latitude,
                longitude: stop.longitude,
                district: stop.district,
                state: stop.state,
            })
            .collect();

        let route = self
            .routes
            .publish(PublishRoute {
                bus_id: bus.id,
                start,
                end,
                via: request.via.clone(),
                trips,
                explicit_stops,
            })
            .await?;

        let with_bus = RouteWithBus {
            route,
            bus_name: bus.bus_name,
            is_booking_open: bus.is_booking_open,
        };
        let stops = self.routes.stops_with_names(with_bus.route.id).await?;
        self.build_route_response(with_bus, stops).await
    }

    pub async fn my_routes(&self, user_id: Uuid) -> Result<Vec<RouteResponse>, AppError> {
        let bus = self
            .buses
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Not a bus operator".to_string()))?;

        let routes = self.routes.find_by_bus(bus.id).await?;

        let mut response = Vec::with_capacity(routes.len());
        for route in routes {
            let stops = self.routes.stops_with_names(route.route.id).await?;
            response.push(self.build_route_response(route, stops).await?);
        }
        Ok(response)
    }

    /// Búsqueda difusa origen -> destino. El filtrado de candidatas lo hace
    /// la base; el chequeo de orden (¿el origen precede al destino?) se
    /// decide aquí sobre la secuencia ordenada de paradas.
    pub async fn search(&self, from_query: &str, to_query: &str) -> Result<Vec<RouteResponse>, AppError> {
        let from_query = from_query.trim();
        let to_query = to_query.trim();

        if from_query.is_empty() || to_query.is_empty() {
            return Err(AppError::ValidationError(
                "Please provide start and end locations".to_string(),
            ));
        }

        let candidates = self.routes.search_candidates(from_query, to_query).await?;

        let mut valid = Vec::new();
        for candidate in candidates {
            let stops = self.routes.stops_with_names(candidate.route.id).await?;

            let start = start_index(from_query, &candidate.route.start_location, &stops);
            let end = end_index(to_query, &candidate.route.end_location, &stops);

            if matches_direction(start, end) {
                valid.push(self.build_route_response(candidate, stops).await?);
            }
        }

        Ok(valid)
    }

    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, AppError> {
        if query.is_empty() {
            return Ok(vec![]);
        }
        self.locations.suggestions(query).await
    }

    /// Vias conocidas entre dos extremos, en ambas direcciones. Se
    /// deduplica por via (gana la primera aparición, se saltan las vacías)
    /// y las paradas se invierten cuando la plantilla está guardada en el
    /// sentido opuesto al pedido.
    pub async fn template_vias(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<TemplateViaResponse>, AppError> {
        if start.is_empty() || end.is_empty() {
            return Ok(vec![]);
        }

        let rows = self.templates.vias_between(start, end).await?;

        let mut seen = HashSet::new();
        let mut response = Vec::new();
        for row in rows {
            let via = match row.via.as_deref() {
                Some(via) if !via.is_empty() => via.to_string(),
                _ => continue,
            };
            if !seen.insert(via.clone()) {
                continue;
            }

            let mut stops = self.templates.stop_names(row.id).await?;
            if !row.is_forward {
                stops.reverse();
            }
            response.push(TemplateViaResponse { via, stops });
        }

        Ok(response)
    }

    pub async fn delete(&self, user_id: Uuid, route_id: Uuid) -> Result<(), AppError> {
        let bus = self
            .buses
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Unauthorized".to_string()))?;

        let deleted = self.routes.delete_owned(route_id, bus.id).await?;
        if !deleted {
            return Err(AppError::NotFound("Route not found or access denied".to_string()));
        }
        Ok(())
    }

    pub async fn toggle_status(
        &self,
        user_id: Uuid,
        request: ToggleStatusRequest,
    ) -> Result<RouteResponse, AppError> {
        validate_route_status(&request.status)?;

        let bus = self
            .buses
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Not a bus operator".to_string()))?;

        let route = self
            .routes
            .update_status(request.route_id, bus.id, &request.status)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found or access denied".to_string()))?;

        let stops = self.routes.stops_with_names(route.id).await?;
        self.build_route_response(
            RouteWithBus {
                route,
                bus_name: bus.bus_name,
                is_booking_open: bus.is_booking_open,
            },
            stops,
        )
        .await
    }

    pub async fn toggle_favorite(
        &self,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<ToggleFavoriteResponse, AppError> {
        self.routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        let favorited = self.favorites.toggle(user_id, route_id).await?;
        Ok(ToggleFavoriteResponse { route_id, favorited })
    }

    pub async fn my_favorites(&self, user_id: Uuid) -> Result<Vec<RouteResponse>, AppError> {
        let routes = self.favorites.routes_for_user(user_id).await?;

        let mut response = Vec::with_capacity(routes.len());
        for route in routes {
            let stops = self.routes.stops_with_names(route.route.id).await?;
            response.push(self.build_route_response(route, stops).await?);
        }
        Ok(response)
    }

    /// Estado efectivo con su efecto colateral: la reversión por cambio de
    /// día se persiste la primera vez que alguien lee la ruta.
    async fn resolve_effective_status(&self, route: &Route) -> Result<String, AppError> {
        if route.needs_status_rollover() {
            self.routes.persist_status_rollover(route.id).await?;
            return Ok("active".to_string());
        }
        Ok(route.status.clone())
    }

    async fn build_route_response(
        &self,
        with_bus: RouteWithBus,
        stops: Vec<(i32, String)>,
    ) -> Result<RouteResponse, AppError> {
        let effective_status = self.resolve_effective_status(&with_bus.route).await?;
        let trips = self.routes.trips_for(with_bus.route.id).await?;

        Ok(RouteResponse {
            id: with_bus.route.id,
            bus_name: with_bus.bus_name,
            start_location: with_bus.route.start_location,
            end_location: with_bus.route.end_location,
            via: with_bus.route.via,
            trips: trips
                .into_iter()
                .map(|t| TripResponse {
                    start_time: t.start_time,
                    end_time: t.end_time,
                })
                .collect(),
            stop_list: stops
                .into_iter()
                .map(|(stop_number, location_name)| RouteStopResponse {
                    stop_number,
                    location_name,
                })
                .collect(),
            is_booking_open: with_bus.is_booking_open,
            effective_status,
        })
    }
}
