//! Resolución de paradas a partir de plantillas
//!
//! Al publicar una ruta, sus paradas intermedias se resuelven contra las
//! plantillas aprendidas: coincidencia directa, coincidencia inversa o
//! aprendizaje de un camino nuevo. La selección de rama es lógica pura;
//! el repositorio aporta las consultas y ejecuta el plan resultante.

use uuid::Uuid;

use crate::models::route::{RouteTemplate, TemplateStop};

/// Resultado de buscar una plantilla para (start, end, via)
#[derive(Debug, Clone)]
pub enum TemplateMatch {
    /// Plantilla exacta (start, end, via): copiar paradas tal cual
    Direct(RouteTemplate),
    /// Plantilla opuesta (end, start, via): copiar paradas invertidas
    Reverse(RouteTemplate),
    /// Sin plantilla en ninguna dirección: aprender un camino nuevo
    Learn,
}

/// Parada planificada para insertar en una ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStop {
    pub location_id: Uuid,
    pub stop_number: i32,
}

/// Decide la rama de resolución. La búsqueda directa tiene prioridad sobre
/// la inversa, y la inversa sobre el aprendizaje; solo una rama se ejecuta.
pub fn resolve_template_match(
    direct: Option<RouteTemplate>,
    reverse: Option<RouteTemplate>,
) -> TemplateMatch {
    match (direct, reverse) {
        (Some(template), _) => TemplateMatch::Direct(template),
        (None, Some(template)) => TemplateMatch::Reverse(template),
        (None, None) => TemplateMatch::Learn,
    }
}

/// Copia las paradas de la plantilla en su mismo orden, conservando
/// los stop_number originales. Se asume entrada ordenada por stop_number.
pub fn copy_stops_forward(template_stops: &[TemplateStop]) -> Vec<PlannedStop> {
    template_stops
        .iter()
        .map(|stop| PlannedStop {
            location_id: stop.location_id,
            stop_number: stop.stop_number,
        })
        .collect()
}

/// Copia las paradas de la plantilla en orden de iteración invertido,
/// renumerando secuencialmente desde 1: la última parada de la plantilla
/// pasa a ser la parada 1 de la ruta nueva.
pub fn copy_stops_reversed(template_stops: &[TemplateStop]) -> Vec<PlannedStop> {
    template_stops
        .iter()
        .rev()
        .enumerate()
        .map(|(index, stop)| PlannedStop {
            location_id: stop.location_id,
            stop_number: index as i32 + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn template() -> RouteTemplate {
        RouteTemplate {
            id: Uuid::new_v4(),
            start_location_id: Uuid::new_v4(),
            end_location_id: Uuid::new_v4(),
            via: Some("NH66".to_string()),
            created_at: Utc::now(),
        }
    }

    fn template_stops(numbers: &[i32]) -> Vec<TemplateStop> {
        numbers
            .iter()
            .map(|n| TemplateStop {
                id: Uuid::new_v4(),
                template_id: Uuid::new_v4(),
                location_id: Uuid::new_v4(),
                stop_number: *n,
            })
            .collect()
    }

    #[test]
    fn test_direct_match_takes_priority() {
        let direct = template();
        let direct_id = direct.id;
        match resolve_template_match(Some(direct), Some(template())) {
            TemplateMatch::Direct(t) => assert_eq!(t.id, direct_id),
            _ => panic!("expected direct match"),
        }
    }

    #[test]
    fn test_reverse_match_when_no_direct() {
        let reverse = template();
        let reverse_id = reverse.id;
        match resolve_template_match(None, Some(reverse)) {
            TemplateMatch::Reverse(t) => assert_eq!(t.id, reverse_id),
            _ => panic!("expected reverse match"),
        }
    }

    #[test]
    fn test_learn_when_no_template_either_direction() {
        assert!(matches!(resolve_template_match(None, None), TemplateMatch::Learn));
    }

    #[test]
    fn test_forward_copy_keeps_numbers() {
        let stops = template_stops(&[1, 2, 3]);
        let planned = copy_stops_forward(&stops);

        assert_eq!(planned.len(), 3);
        for (planned_stop, template_stop) in planned.iter().zip(stops.iter()) {
            assert_eq!(planned_stop.location_id, template_stop.location_id);
            assert_eq!(planned_stop.stop_number, template_stop.stop_number);
        }
    }

    #[test]
    fn test_forward_copy_preserves_gaps() {
        // Solo importa el orden relativo: los huecos se conservan tal cual
        let stops = template_stops(&[2, 5, 9]);
        let planned = copy_stops_forward(&stops);
        let numbers: Vec<i32> = planned.iter().map(|s| s.stop_number).collect();
        assert_eq!(numbers, vec![2, 5, 9]);
    }

    #[test]
    fn test_reversed_copy_renumbers_from_one() {
        let stops = template_stops(&[1, 2, 3]);
        let planned = copy_stops_reversed(&stops);

        // La última parada de la plantilla pasa a ser la parada 1
        assert_eq!(planned[0].location_id, stops[2].location_id);
        assert_eq!(planned[1].location_id, stops[1].location_id);
        assert_eq!(planned[2].location_id, stops[0].location_id);
        let numbers: Vec<i32> = planned.iter().map(|s| s.stop_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_reversed_copy_of_empty_template_is_empty() {
        assert!(copy_stops_reversed(&[]).is_empty());
    }
}
