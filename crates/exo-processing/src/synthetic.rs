//! Synthetic catalog generator.
//!
//! When no catalog file is present the loader substitutes a generated table
//! with statistically plausible distributions for every required column. The
//! generator is seeded, so repeated runs (and tests) see the same catalog.
//!
//! Star-level attributes are drawn once per host star and denormalized onto
//! every planet of that host, and `sy_pnum` is derived from the actual host
//! grouping. This keeps the generated table consistent with the catalog's
//! denormalization invariants instead of drawing each row independently.

use crate::error::{CatalogError, Result};
use polars::prelude::*;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Beta, LogNormal, Normal};
use tracing::debug;

const DISCOVERY_METHODS: [&str; 5] = [
    "Transit",
    "Radial Velocity",
    "Imaging",
    "Microlensing",
    "Timing",
];
const DISCOVERY_WEIGHTS: [f64; 5] = [0.5, 0.3, 0.1, 0.05, 0.05];

const SPECTRAL_TYPES: [&str; 7] = ["G", "K", "M", "F", "A", "B", "O"];
const SPECTRAL_WEIGHTS: [f64; 7] = [0.3, 0.3, 0.2, 0.1, 0.05, 0.03, 0.02];

const STAR_COUNTS: [i64; 3] = [1, 2, 3];
const STAR_COUNT_WEIGHTS: [f64; 3] = [0.8, 0.15, 0.05];

const MOON_COUNT_WEIGHTS: [f64; 5] = [0.4, 0.3, 0.15, 0.1, 0.05];

/// Planets per host star; the final host may hold fewer when the row count
/// is not a multiple.
const PLANETS_PER_HOST: usize = 3;

/// Star-level attributes, drawn once per host and shared by its planets.
struct HostStar {
    name: String,
    star_count: i64,
    moon_count: i64,
    spectral_type: &'static str,
    temperature: f64,
    radius: f64,
    mass: f64,
    age: f64,
    right_ascension: f64,
    declination: f64,
    distance: f64,
}

fn dist_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::InvalidConfig(format!("invalid synthetic distribution: {e}"))
}

/// Generate a synthetic catalog of `rows` planets with the fixed `seed`.
pub fn generate(rows: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let radius_dist = LogNormal::new(0.0, 1.0).map_err(dist_err)?;
    let mass_dist = LogNormal::new(0.0, 1.5).map_err(dist_err)?;
    let period_dist = LogNormal::new(3.0, 2.0).map_err(dist_err)?;
    let axis_dist = LogNormal::new(-0.5, 1.0).map_err(dist_err)?;
    let eq_temp_dist = Normal::new(300.0, 200.0).map_err(dist_err)?;
    let insolation_dist = LogNormal::new(0.0, 2.0).map_err(dist_err)?;
    let density_dist = LogNormal::new(1.0, 0.5).map_err(dist_err)?;
    let eccentricity_dist = Beta::new(1.0, 5.0).map_err(dist_err)?;
    let best_mass_dist = LogNormal::new(0.0, 1.5).map_err(dist_err)?;
    let star_temp_dist = Normal::new(5000.0, 1500.0).map_err(dist_err)?;
    let star_radius_dist = LogNormal::new(0.0, 0.5).map_err(dist_err)?;
    let star_mass_dist = LogNormal::new(0.0, 0.3).map_err(dist_err)?;
    let star_age_dist = LogNormal::new(0.0, 1.0).map_err(dist_err)?;
    let distance_dist = LogNormal::new(3.0, 1.0).map_err(dist_err)?;

    let method_weights = WeightedIndex::new(DISCOVERY_WEIGHTS).map_err(dist_err)?;
    let spectral_weights = WeightedIndex::new(SPECTRAL_WEIGHTS).map_err(dist_err)?;
    let star_count_weights = WeightedIndex::new(STAR_COUNT_WEIGHTS).map_err(dist_err)?;
    let moon_count_weights = WeightedIndex::new(MOON_COUNT_WEIGHTS).map_err(dist_err)?;

    let host_count = rows.div_ceil(PLANETS_PER_HOST);
    let hosts: Vec<HostStar> = (0..host_count)
        .map(|h| HostStar {
            name: format!("Star-{h}"),
            star_count: STAR_COUNTS[star_count_weights.sample(&mut rng)],
            moon_count: moon_count_weights.sample(&mut rng) as i64,
            spectral_type: SPECTRAL_TYPES[spectral_weights.sample(&mut rng)],
            temperature: star_temp_dist.sample(&mut rng),
            radius: star_radius_dist.sample(&mut rng),
            mass: star_mass_dist.sample(&mut rng),
            age: star_age_dist.sample(&mut rng) * 5.0,
            right_ascension: rng.gen_range(0.0..360.0),
            declination: rng.gen_range(-90.0..90.0),
            distance: distance_dist.sample(&mut rng),
        })
        .collect();

    // Planets per host, for the derived sy_pnum counter
    let mut planets_per_host = vec![0i64; host_count];
    for i in 0..rows {
        planets_per_host[i / PLANETS_PER_HOST] += 1;
    }

    let mut planet_names = Vec::with_capacity(rows);
    let mut host_names = Vec::with_capacity(rows);
    let mut discovery_years = Vec::with_capacity(rows);
    let mut discovery_methods = Vec::with_capacity(rows);
    let mut star_counts = Vec::with_capacity(rows);
    let mut planet_counts = Vec::with_capacity(rows);
    let mut moon_counts = Vec::with_capacity(rows);
    let mut radii = Vec::with_capacity(rows);
    let mut masses = Vec::with_capacity(rows);
    let mut periods = Vec::with_capacity(rows);
    let mut axes = Vec::with_capacity(rows);
    let mut eq_temps = Vec::with_capacity(rows);
    let mut insolations = Vec::with_capacity(rows);
    let mut densities = Vec::with_capacity(rows);
    let mut eccentricities = Vec::with_capacity(rows);
    let mut best_masses = Vec::with_capacity(rows);
    let mut spectral_types = Vec::with_capacity(rows);
    let mut star_temps = Vec::with_capacity(rows);
    let mut star_radii = Vec::with_capacity(rows);
    let mut star_masses = Vec::with_capacity(rows);
    let mut star_ages = Vec::with_capacity(rows);
    let mut right_ascensions = Vec::with_capacity(rows);
    let mut declinations = Vec::with_capacity(rows);
    let mut distances = Vec::with_capacity(rows);

    for i in 0..rows {
        let host_idx = i / PLANETS_PER_HOST;
        let host = &hosts[host_idx];

        planet_names.push(format!("Planet-{i}"));
        host_names.push(host.name.clone());
        discovery_years.push(rng.gen_range(1995i64..2025));
        discovery_methods.push(DISCOVERY_METHODS[method_weights.sample(&mut rng)]);
        star_counts.push(host.star_count);
        planet_counts.push(planets_per_host[host_idx]);
        moon_counts.push(host.moon_count);
        radii.push(radius_dist.sample(&mut rng));
        masses.push(mass_dist.sample(&mut rng));
        periods.push(period_dist.sample(&mut rng));
        axes.push(axis_dist.sample(&mut rng));
        eq_temps.push(eq_temp_dist.sample(&mut rng));
        insolations.push(insolation_dist.sample(&mut rng));
        densities.push(density_dist.sample(&mut rng));
        eccentricities.push(eccentricity_dist.sample(&mut rng));
        best_masses.push(best_mass_dist.sample(&mut rng));
        spectral_types.push(host.spectral_type);
        star_temps.push(host.temperature);
        star_radii.push(host.radius);
        star_masses.push(host.mass);
        star_ages.push(host.age);
        right_ascensions.push(host.right_ascension);
        declinations.push(host.declination);
        distances.push(host.distance);
    }

    let df = DataFrame::new(vec![
        Series::new("pl_name".into(), planet_names).into_column(),
        Series::new("hostname".into(), host_names).into_column(),
        Series::new("disc_year".into(), discovery_years).into_column(),
        Series::new("discoverymethod".into(), discovery_methods).into_column(),
        Series::new("sy_snum".into(), star_counts).into_column(),
        Series::new("sy_pnum".into(), planet_counts).into_column(),
        Series::new("sy_mnum".into(), moon_counts).into_column(),
        Series::new("pl_rade".into(), radii).into_column(),
        Series::new("pl_masse".into(), masses).into_column(),
        Series::new("pl_orbper".into(), periods).into_column(),
        Series::new("pl_orbsmax".into(), axes).into_column(),
        Series::new("pl_eqt".into(), eq_temps).into_column(),
        Series::new("pl_insol".into(), insolations).into_column(),
        Series::new("pl_dens".into(), densities).into_column(),
        Series::new("pl_orbeccen".into(), eccentricities).into_column(),
        Series::new("pl_bmasse".into(), best_masses).into_column(),
        Series::new("st_spectype".into(), spectral_types).into_column(),
        Series::new("st_teff".into(), star_temps).into_column(),
        Series::new("st_rad".into(), star_radii).into_column(),
        Series::new("st_mass".into(), star_masses).into_column(),
        Series::new("st_age".into(), star_ages).into_column(),
        Series::new("ra".into(), right_ascensions).into_column(),
        Series::new("dec".into(), declinations).into_column(),
        Series::new("sy_dist".into(), distances).into_column(),
    ])?;

    debug!(
        "Generated synthetic catalog: {} planets across {} host stars (seed {})",
        rows, host_count, seed
    );

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use std::collections::HashMap;

    #[test]
    fn test_generate_row_count() {
        let df = generate(500, 42).unwrap();
        assert_eq!(df.height(), 500);
        assert_eq!(df.width(), schema::CATALOG_SCHEMA.len());
    }

    #[test]
    fn test_generate_satisfies_schema() {
        let df = generate(50, 42).unwrap();
        schema::validate(&df).unwrap();
    }

    #[test]
    fn test_generate_is_reproducible() {
        let a = generate(100, 42).unwrap();
        let b = generate(100, 42).unwrap();
        assert!(a.equals(&b));

        let c = generate(100, 7).unwrap();
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_star_attributes_denormalized_consistently() {
        let df = generate(60, 42).unwrap();
        let hosts = df.column("hostname").unwrap().str().unwrap();
        let temps = df.column("st_teff").unwrap().f64().unwrap();

        let mut seen: HashMap<String, f64> = HashMap::new();
        for i in 0..df.height() {
            let host = hosts.get(i).unwrap().to_string();
            let temp = temps.get(i).unwrap();
            match seen.get(&host) {
                Some(prev) => assert_eq!(*prev, temp, "host {host} has divergent star temps"),
                None => {
                    seen.insert(host, temp);
                }
            }
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_planet_counts_match_host_grouping() {
        let df = generate(50, 42).unwrap();
        let hosts = df.column("hostname").unwrap().str().unwrap();
        let counts = df.column("sy_pnum").unwrap().i64().unwrap();

        let mut group_sizes: HashMap<String, i64> = HashMap::new();
        for host in hosts.into_iter().flatten() {
            *group_sizes.entry(host.to_string()).or_insert(0) += 1;
        }

        for i in 0..df.height() {
            let host = hosts.get(i).unwrap();
            assert_eq!(counts.get(i).unwrap(), group_sizes[host]);
        }
        // 50 rows over 3-planet hosts: the last host holds the remainder
        assert_eq!(group_sizes["Star-16"], 2);
    }

    #[test]
    fn test_physical_ranges() {
        let df = generate(200, 42).unwrap();

        let ra = df.column("ra").unwrap().f64().unwrap();
        assert!(ra.into_iter().flatten().all(|v| (0.0..360.0).contains(&v)));

        let dec = df.column("dec").unwrap().f64().unwrap();
        assert!(dec.into_iter().flatten().all(|v| (-90.0..90.0).contains(&v)));

        let ecc = df.column("pl_orbeccen").unwrap().f64().unwrap();
        assert!(ecc.into_iter().flatten().all(|v| (0.0..=1.0).contains(&v)));

        let years = df.column("disc_year").unwrap().i64().unwrap();
        assert!(years.into_iter().flatten().all(|y| (1995..2025).contains(&y)));
    }
}
