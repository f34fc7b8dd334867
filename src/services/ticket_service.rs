//! Generación de identificadores de ticket
//!
//! Formato "TKT-" + 6 dígitos aleatorios (con ceros a la izquierda). La
//! unicidad la garantiza la restricción unique de la base de datos; el
//! bucle de reintentos del repositorio es solo una optimización y está
//! acotado para no colgarse bajo una tabla casi llena.

use rand::Rng;

/// Intentos máximos antes de rendirse con un error interno
pub const MAX_TICKET_ID_ATTEMPTS: u32 = 25;

/// Genera un candidato de ticket id: "TKT-" + 6 dígitos
pub fn generate_ticket_id<R: Rng>(rng: &mut R) -> String {
    format!("TKT-{:06}", rng.gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_id_format() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let ticket_id = generate_ticket_id(&mut rng);
            assert_eq!(ticket_id.len(), 10);
            assert!(ticket_id.starts_with("TKT-"));
            assert!(ticket_id[4..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_ticket_id_keeps_leading_zeros() {
        use rand::{rngs::StdRng, SeedableRng};

        // Recorre semillas hasta cubrir un valor por debajo de 100000
        let mut found_padded = false;
        for seed in 0..2000u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ticket_id = generate_ticket_id(&mut rng);
            if ticket_id[4..].starts_with('0') {
                found_padded = true;
                break;
            }
        }
        assert!(found_padded, "expected at least one zero-padded ticket id");
    }
}
