//! Chequeo de orden origen -> destino para la búsqueda de itinerarios
//!
//! Dada una ruta candidata, decide si el origen consultado precede al
//! destino consultado en la secuencia ordenada de paradas. Los extremos de
//! la ruta se representan con centinelas: 0 para el inicio y 9999 para el
//! final, de modo que el inicio queda antes de toda parada y el final
//! después de todas.

/// Centinela: la consulta coincide con el end_location de la ruta
pub const END_OF_ROUTE_INDEX: i32 = 9999;

/// Centinela: la consulta no coincide con ningún punto de la ruta
pub const NOT_FOUND_INDEX: i32 = -1;

/// Coincidencia por subcadena sin distinguir mayúsculas
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Índice de origen: 0 si coincide con el inicio de la ruta; si no, el
/// stop_number de la primera parada coincidente (escaneo ascendente);
/// si no, -1. Las paradas deben venir ordenadas por stop_number.
pub fn start_index(from_query: &str, start_location: &str, stops: &[(i32, String)]) -> i32 {
    if contains_ci(start_location, from_query) {
        return 0;
    }
    for (stop_number, name) in stops {
        if contains_ci(name, from_query) {
            return *stop_number;
        }
    }
    NOT_FOUND_INDEX
}

/// Índice de destino: 9999 si coincide con el final de la ruta; si no, el
/// stop_number de la primera parada coincidente; si no, -1.
pub fn end_index(to_query: &str, end_location: &str, stops: &[(i32, String)]) -> i32 {
    if contains_ci(end_location, to_query) {
        return END_OF_ROUTE_INDEX;
    }
    for (stop_number, name) in stops {
        if contains_ci(name, to_query) {
            return *stop_number;
        }
    }
    NOT_FOUND_INDEX
}

/// Una ruta es válida solo si ambos índices existen y el origen queda
/// estrictamente antes del destino.
pub fn matches_direction(start_index: i32, end_index: i32) -> bool {
    start_index != NOT_FOUND_INDEX && end_index != NOT_FOUND_INDEX && start_index < end_index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<(i32, String)> {
        vec![
            (1, "Palarivattom".to_string()),
            (2, "Kalamassery".to_string()),
            (3, "Aluva".to_string()),
        ]
    }

    #[test]
    fn test_query_matching_endpoint_uses_sentinels() {
        assert_eq!(start_index("koch", "Kochi", &stops()), 0);
        assert_eq!(end_index("thris", "Thrissur", &stops()), END_OF_ROUTE_INDEX);
    }

    #[test]
    fn test_query_matching_stop_uses_stop_number() {
        assert_eq!(start_index("kalam", "Kochi", &stops()), 2);
        assert_eq!(end_index("aluva", "Thrissur", &stops()), 3);
    }

    #[test]
    fn test_first_matching_stop_wins() {
        let repeated = vec![
            (1, "Market North".to_string()),
            (2, "Market South".to_string()),
        ];
        assert_eq!(start_index("market", "Kochi", &repeated), 1);
    }

    #[test]
    fn test_unmatched_query_is_not_found() {
        assert_eq!(start_index("goa", "Kochi", &stops()), NOT_FOUND_INDEX);
        assert_eq!(end_index("goa", "Thrissur", &stops()), NOT_FOUND_INDEX);
    }

    #[test]
    fn test_direction_check_requires_strict_order() {
        // Parada intermedia hacia el final de la ruta: 2 < 9999
        assert!(matches_direction(2, END_OF_ROUTE_INDEX));
        // Contra el sentido del viaje: 3 < 2 es falso
        assert!(!matches_direction(3, 2));
        // Mismo índice en ambos lados queda excluido (desigualdad estricta)
        assert!(!matches_direction(2, 2));
        // Final -> inicio queda excluido
        assert!(!matches_direction(END_OF_ROUTE_INDEX, 0));
        // Cualquier lado sin coincidencia queda excluido
        assert!(!matches_direction(NOT_FOUND_INDEX, 5));
        assert!(!matches_direction(1, NOT_FOUND_INDEX));
    }

    #[test]
    fn test_endpoint_match_beats_stop_match() {
        // "aluva" también es parada, pero si coincide con el inicio gana el 0
        assert_eq!(start_index("aluva", "Aluva Depot", &stops()), 0);
    }
}
