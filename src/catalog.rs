//! Static airport and destination catalogs for the onboarding pickers.

use crate::models::Airport;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A bucket-list destination offered during the preferences step.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Destination {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub region: &'static str,
}

struct AirportEntry {
    code: &'static str,
    name: &'static str,
    city: &'static str,
    country: &'static str,
    popular: bool,
}

// Popular EU airports, popular ones listed first.
const AIRPORTS: &[AirportEntry] = &[
    AirportEntry { code: "LHR", name: "Heathrow Airport", city: "London", country: "United Kingdom", popular: true },
    AirportEntry { code: "CDG", name: "Charles de Gaulle Airport", city: "Paris", country: "France", popular: true },
    AirportEntry { code: "AMS", name: "Amsterdam Airport Schiphol", city: "Amsterdam", country: "Netherlands", popular: true },
    AirportEntry { code: "FRA", name: "Frankfurt Airport", city: "Frankfurt", country: "Germany", popular: true },
    AirportEntry { code: "MAD", name: "Adolfo Suárez Madrid–Barajas Airport", city: "Madrid", country: "Spain", popular: true },
    AirportEntry { code: "FCO", name: "Leonardo da Vinci International Airport", city: "Rome", country: "Italy", popular: true },
    AirportEntry { code: "MUC", name: "Munich Airport", city: "Munich", country: "Germany", popular: true },
    AirportEntry { code: "BCN", name: "Josep Tarradellas Barcelona-El Prat Airport", city: "Barcelona", country: "Spain", popular: true },
    AirportEntry { code: "DUB", name: "Dublin Airport", city: "Dublin", country: "Ireland", popular: true },
    AirportEntry { code: "CPH", name: "Copenhagen Airport", city: "Copenhagen", country: "Denmark", popular: true },
    AirportEntry { code: "VIE", name: "Vienna International Airport", city: "Vienna", country: "Austria", popular: false },
    AirportEntry { code: "WAW", name: "Warsaw Chopin Airport", city: "Warsaw", country: "Poland", popular: false },
    AirportEntry { code: "BRU", name: "Brussels Airport", city: "Brussels", country: "Belgium", popular: false },
    AirportEntry { code: "LIS", name: "Humberto Delgado Airport", city: "Lisbon", country: "Portugal", popular: false },
    AirportEntry { code: "ARN", name: "Stockholm Arlanda Airport", city: "Stockholm", country: "Sweden", popular: false },
    AirportEntry { code: "HEL", name: "Helsinki-Vantaa Airport", city: "Helsinki", country: "Finland", popular: false },
    AirportEntry { code: "OSL", name: "Oslo Airport, Gardermoen", city: "Oslo", country: "Norway", popular: false },
    AirportEntry { code: "ATH", name: "Athens International Airport", city: "Athens", country: "Greece", popular: false },
];

const DESTINATIONS: &[Destination] = &[
    Destination { id: "santorini", name: "Santorini", description: "Greek island paradise with white-washed buildings", image: "https://images.unsplash.com/photo-1613395877344-13d4a8e0d49e?w=800&auto=format&fit=crop", region: "Europe" },
    Destination { id: "maldives", name: "Maldives", description: "Luxury overwater villas and crystal-clear waters", image: "https://images.unsplash.com/photo-1514282401047-d79a71a590e8?w=800&auto=format&fit=crop", region: "Asia" },
    Destination { id: "bali", name: "Bali", description: "Tropical paradise with rich culture and beaches", image: "https://images.unsplash.com/photo-1537996194471-e657df975ab4?w=800&auto=format&fit=crop", region: "Asia" },
    Destination { id: "paris", name: "Paris", description: "Iconic landmarks and romantic boulevards", image: "https://images.unsplash.com/photo-1502602898657-3e91760cbb34?w=800&auto=format&fit=crop", region: "Europe" },
    Destination { id: "tokyo", name: "Tokyo", description: "Futuristic cityscape meets ancient temples", image: "https://images.unsplash.com/photo-1503899036084-c55cdd92da26?w=800&auto=format&fit=crop", region: "Asia" },
    Destination { id: "nyc", name: "New York City", description: "Towering skyscrapers and vibrant culture", image: "https://images.unsplash.com/photo-1543716091-a840c05249ec?w=800&auto=format&fit=crop", region: "North America" },
    Destination { id: "dubai", name: "Dubai", description: "Desert luxury and architectural marvels", image: "https://images.unsplash.com/photo-1518684079-3c830dcef090?w=800&auto=format&fit=crop", region: "Middle East" },
    Destination { id: "rome", name: "Rome", description: "Timeless ruins and Italian elegance", image: "https://images.unsplash.com/photo-1529260830199-42c24126f198?w=800&auto=format&fit=crop", region: "Europe" },
    Destination { id: "capetown", name: "Cape Town", description: "Dramatic coastlines and mountain vistas", image: "https://images.unsplash.com/photo-1641325547688-16810956c293?w=800&auto=format&fit=crop", region: "Africa" },
];

fn to_airport(entry: &AirportEntry) -> Airport {
    Airport {
        code: entry.code.to_string(),
        name: entry.name.to_string(),
        city: entry.city.to_string(),
        country: entry.country.to_string(),
        popular: entry.popular,
    }
}

/// Look up an airport by IATA code.
pub fn airport_by_code(code: &str) -> Option<Airport> {
    AIRPORTS
        .iter()
        .find(|a| a.code.eq_ignore_ascii_case(code))
        .map(to_airport)
}

/// Search airports for the home-airport picker.
///
/// An empty query lists only the popular airports; otherwise the query
/// matches city, code, country, or name, case-insensitively. Results are
/// sorted popular-first, then alphabetically by city.
pub fn search_airports(query: &str) -> Vec<Airport> {
    let query = query.trim().to_lowercase();

    let mut matches: Vec<Airport> = AIRPORTS
        .iter()
        .filter(|a| {
            if query.is_empty() {
                a.popular
            } else {
                a.city.to_lowercase().contains(&query)
                    || a.code.to_lowercase().contains(&query)
                    || a.country.to_lowercase().contains(&query)
                    || a.name.to_lowercase().contains(&query)
            }
        })
        .map(to_airport)
        .collect();

    matches.sort_by(|a, b| {
        b.popular
            .cmp(&a.popular)
            .then_with(|| a.city.cmp(&b.city))
    });

    matches
}

/// All selectable bucket-list destinations.
pub fn destinations() -> &'static [Destination] {
    DESTINATIONS
}

/// Resolve destination ids to the comma-joined names text the profile
/// stores. Unknown ids are dropped rather than rejected.
pub fn bucket_list_text(ids: &[String]) -> String {
    ids.iter()
        .filter_map(|id| DESTINATIONS.iter().find(|d| d.id == id))
        .map(|d| d.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_lists_popular_only() {
        let results = search_airports("");
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|a| a.popular));
    }

    #[test]
    fn test_search_matches_any_field_case_insensitive() {
        // By code
        assert_eq!(search_airports("lhr")[0].city, "London");
        // By country
        assert!(search_airports("GERMANY").iter().any(|a| a.code == "FRA"));
        // By name fragment
        assert!(search_airports("schiphol").iter().any(|a| a.code == "AMS"));
    }

    #[test]
    fn test_search_sorts_popular_first_then_city() {
        let results = search_airports("a");
        let first_unpopular = results.iter().position(|a| !a.popular);
        if let Some(idx) = first_unpopular {
            assert!(results[idx..].iter().all(|a| !a.popular));
        }
        for pair in results.iter().collect::<Vec<_>>().windows(2) {
            if pair[0].popular == pair[1].popular {
                assert!(pair[0].city <= pair[1].city);
            }
        }
    }

    #[test]
    fn test_airport_by_code() {
        let cdg = airport_by_code("cdg").unwrap();
        assert_eq!(cdg.city, "Paris");
        assert!(airport_by_code("XXX").is_none());
    }

    #[test]
    fn test_bucket_list_text_resolves_names_and_drops_unknowns() {
        let ids = vec![
            "bali".to_string(),
            "missing".to_string(),
            "nyc".to_string(),
        ];
        assert_eq!(bucket_list_text(&ids), "Bali, New York City");
        assert_eq!(bucket_list_text(&[]), "");
    }
}
