//! NASA Earth-science facts shown between games.

use rand::seq::SliceRandom;
use rand::Rng;

pub const NASA_FACTS: &[&str] = &[
    "SMAP (Soil Moisture Active Passive) provides global soil moisture maps from space.",
    "GPM (Global Precipitation Measurement) tracks rainfall intensity and helps forecast floods.",
    "NASA satellites combined with models help predict drought and irrigation needs.",
    "NASA Earth science supports precision agriculture to maximize yield and save water.",
    "NASA partners with researchers to develop soil and water monitoring tools for farmers.",
];

pub fn random_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    NASA_FACTS.choose(rng).copied().unwrap_or(NASA_FACTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_fact_from_catalogue() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(NASA_FACTS.contains(&random_fact(&mut rng)));
        }
    }
}
