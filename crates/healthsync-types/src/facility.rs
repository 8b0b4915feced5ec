//! Healthcare facility types used by the facility locator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default search radius in meters.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 5000;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Which kinds of facility a search should include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityFilter {
    Hospital,
    Doctor,
    Pharmacy,
    Health,
    #[default]
    All,
}

impl FacilityFilter {
    /// Places API types queried for this filter, in query order.
    pub fn place_types(self) -> &'static [&'static str] {
        match self {
            FacilityFilter::Hospital => &["hospital"],
            FacilityFilter::Doctor => &["doctor", "dentist", "physiotherapist"],
            FacilityFilter::Pharmacy => &["pharmacy", "drugstore"],
            FacilityFilter::Health => &["health"],
            FacilityFilter::All => &["hospital", "doctor", "dentist", "pharmacy", "drugstore", "health"],
        }
    }
}

impl fmt::Display for FacilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityFilter::Hospital => write!(f, "hospital"),
            FacilityFilter::Doctor => write!(f, "doctor"),
            FacilityFilter::Pharmacy => write!(f, "pharmacy"),
            FacilityFilter::Health => write!(f, "health"),
            FacilityFilter::All => write!(f, "all"),
        }
    }
}

impl FromStr for FacilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hospital" => Ok(FacilityFilter::Hospital),
            "doctor" => Ok(FacilityFilter::Doctor),
            "pharmacy" => Ok(FacilityFilter::Pharmacy),
            "health" => Ok(FacilityFilter::Health),
            "all" => Ok(FacilityFilter::All),
            other => Err(format!("invalid facility filter: '{other}'")),
        }
    }
}

/// Display category of a found facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityCategory {
    Hospital,
    Clinic,
    Pharmacy,
    Health,
    Unknown,
}

impl FacilityCategory {
    /// Categorize a place from its API types, then its name, then the
    /// type that was searched for.
    pub fn detect(types: &[String], name: &str, search_type: &str) -> Self {
        let name = name.to_lowercase();
        let has = |t: &str| types.iter().any(|x| x == t);

        if has("hospital") || name.contains("hospital") {
            return FacilityCategory::Hospital;
        }
        if has("pharmacy") || has("drugstore") || name.contains("pharmacy") || name.contains("chemist") {
            return FacilityCategory::Pharmacy;
        }
        if has("doctor")
            || has("dentist")
            || has("physiotherapist")
            || ["clinic", "doctor", "healthcare", "medical"]
                .iter()
                .any(|kw| name.contains(kw))
        {
            return FacilityCategory::Clinic;
        }
        if has("health") || name.contains("health") {
            return FacilityCategory::Health;
        }

        match search_type {
            "hospital" => FacilityCategory::Hospital,
            "pharmacy" | "drugstore" => FacilityCategory::Pharmacy,
            "doctor" | "dentist" | "physiotherapist" => FacilityCategory::Clinic,
            _ => FacilityCategory::Unknown,
        }
    }
}

impl fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityCategory::Hospital => write!(f, "hospital"),
            FacilityCategory::Clinic => write!(f, "clinic"),
            FacilityCategory::Pharmacy => write!(f, "pharmacy"),
            FacilityCategory::Health => write!(f, "health"),
            FacilityCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// A raw result from a nearby-places search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Coordinates,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub open_now: Option<bool>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A healthcare facility ready to be reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Coordinates,
    pub category: FacilityCategory,
    /// Distance from the user, when their location is known.
    pub distance_km: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub open_now: Option<bool>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl Facility {
    /// Build a facility from a place found while searching for `search_type`.
    pub fn from_place(place: PlaceResult, search_type: &str, origin: Option<&Coordinates>) -> Self {
        let category = FacilityCategory::detect(&place.types, &place.name, search_type);
        let distance_km = origin.map(|o| o.distance_km(&place.location));
        Self {
            id: place.place_id,
            name: if place.name.is_empty() {
                "Unknown Facility".to_string()
            } else {
                place.name
            },
            address: place
                .address
                .unwrap_or_else(|| "Address not available".to_string()),
            location: place.location,
            category,
            distance_km,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            open_now: place.open_now,
            phone: place.phone,
            website: place.website,
        }
    }

    /// Google Maps driving directions from `origin`, or a name search when
    /// the origin is unknown.
    pub fn directions_url(&self, origin: Option<&Coordinates>) -> String {
        match origin {
            Some(o) => format!(
                "https://www.google.com/maps/dir/?api=1&origin={},{}&destination=place_id:{}&travelmode=driving",
                o.lat, o.lng, self.id
            ),
            None => format!(
                "https://www.google.com/maps/search/{}",
                self.name.replace(' ', "+")
            ),
        }
    }
}

/// Request to search for nearby facilities, sent from the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySearchRequest {
    pub filter: FacilityFilter,
    pub radius_m: u32,
}

impl Default for FacilitySearchRequest {
    fn default() -> Self {
        Self {
            filter: FacilityFilter::All,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinates::new(28.6139, 77.2090);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_known_pair() {
        // New Delhi to Mumbai is roughly 1150 km great-circle.
        let delhi = Coordinates::new(28.6139, 77.2090);
        let mumbai = Coordinates::new(19.0760, 72.8777);
        let d = delhi.distance_km(&mumbai);
        assert!((1100.0..1200.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_filter_place_types() {
        assert_eq!(FacilityFilter::Hospital.place_types(), &["hospital"]);
        assert_eq!(FacilityFilter::Pharmacy.place_types(), &["pharmacy", "drugstore"]);
        assert_eq!(FacilityFilter::All.place_types().len(), 6);
        assert_eq!("DOCTOR".parse::<FacilityFilter>().unwrap(), FacilityFilter::Doctor);
    }

    #[test]
    fn test_category_from_types_beats_name() {
        let cat = FacilityCategory::detect(&types(&["hospital"]), "City Pharmacy", "pharmacy");
        assert_eq!(cat, FacilityCategory::Hospital);
    }

    #[test]
    fn test_category_from_name_keywords() {
        assert_eq!(
            FacilityCategory::detect(&[], "Green Cross Chemist", "health"),
            FacilityCategory::Pharmacy
        );
        assert_eq!(
            FacilityCategory::detect(&[], "Sunrise Medical Centre", "health"),
            FacilityCategory::Clinic
        );
        assert_eq!(
            FacilityCategory::detect(&types(&["point_of_interest"]), "Wellness Health Hub", "x"),
            FacilityCategory::Health
        );
    }

    #[test]
    fn test_category_falls_back_to_search_type() {
        assert_eq!(
            FacilityCategory::detect(&[], "Dr. Rao", "dentist"),
            FacilityCategory::Clinic
        );
        assert_eq!(
            FacilityCategory::detect(&[], "Apollo", "drugstore"),
            FacilityCategory::Pharmacy
        );
        assert_eq!(
            FacilityCategory::detect(&[], "Somewhere", "establishment"),
            FacilityCategory::Unknown
        );
    }

    #[test]
    fn test_facility_from_place_fills_defaults() {
        let place = PlaceResult {
            place_id: "abc".into(),
            name: String::new(),
            address: None,
            location: Coordinates::new(28.62, 77.21),
            types: types(&["pharmacy"]),
            rating: Some(4.5),
            user_ratings_total: Some(10),
            open_now: None,
            phone: None,
            website: None,
        };
        let origin = Coordinates::new(28.6139, 77.2090);
        let facility = Facility::from_place(place, "pharmacy", Some(&origin));
        assert_eq!(facility.name, "Unknown Facility");
        assert_eq!(facility.address, "Address not available");
        assert_eq!(facility.category, FacilityCategory::Pharmacy);
        assert!(facility.distance_km.unwrap() < 2.0);
    }

    #[test]
    fn test_directions_url() {
        let facility = Facility {
            id: "pid".into(),
            name: "AIIMS Hospital".into(),
            address: "Ansari Nagar".into(),
            location: Coordinates::new(28.56, 77.21),
            category: FacilityCategory::Hospital,
            distance_km: None,
            rating: None,
            user_ratings_total: None,
            open_now: None,
            phone: Some("011 2658 8500".into()),
            website: None,
        };
        let origin = Coordinates::new(28.6, 77.2);
        let url = facility.directions_url(Some(&origin));
        assert!(url.contains("origin=28.6,77.2"));
        assert!(url.contains("destination=place_id:pid"));
        assert_eq!(
            facility.directions_url(None),
            "https://www.google.com/maps/search/AIIMS+Hospital"
        );
    }
}
