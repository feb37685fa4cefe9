//! Domain types for trips, itineraries, and saved plans.
//!
//! Every type here serializes to the camelCase JSON shape the web client and
//! the generation contract use. A [`TravelPlan`] must round-trip through a
//! single JSON document losslessly -- that is the contract both the
//! generation step and blob persistence rely on.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Supported trip destinations.
///
/// This enumeration is closed: any destination-dependent branch must cover
/// exactly this set, and an unknown wire value is a deserialization error,
/// never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    #[serde(rename = "Osaka & Kyoto")]
    OsakaKyoto,
    #[serde(rename = "Tokyo")]
    Tokyo,
    #[serde(rename = "Fukuoka")]
    Fukuoka,
}

impl Destination {
    /// All supported destinations, in menu order.
    pub const ALL: [Destination; 3] = [
        Destination::OsakaKyoto,
        Destination::Tokyo,
        Destination::Fukuoka,
    ];

    /// IATA code of the arrival airport serving this destination.
    pub fn airport(&self) -> &'static str {
        match self {
            Self::OsakaKyoto => "KIX",
            Self::Tokyo => "NRT",
            Self::Fukuoka => "FUK",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OsakaKyoto => "Osaka & Kyoto",
            Self::Tokyo => "Tokyo",
            Self::Fukuoka => "Fukuoka",
        };
        f.write_str(s)
    }
}

impl FromStr for Destination {
    type Err = DestinationParseError;

    /// Accepts the canonical wire value, plus a kebab-case lowercase alias
    /// (`osaka-kyoto`, `tokyo`, `fukuoka`) for command-line use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Osaka & Kyoto" | "osaka-kyoto" => Ok(Self::OsakaKyoto),
            "Tokyo" | "tokyo" => Ok(Self::Tokyo),
            "Fukuoka" | "fukuoka" => Ok(Self::Fukuoka),
            other => Err(DestinationParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Destination`] string.
#[derive(Debug, Clone)]
pub struct DestinationParseError(pub String);

impl fmt::Display for DestinationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid destination: {:?}", self.0)
    }
}

impl std::error::Error for DestinationParseError {}

// ---------------------------------------------------------------------------
// Trip request
// ---------------------------------------------------------------------------

/// Structured parameters for one itinerary generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: Destination,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-text place names the itinerary must cover. May be empty.
    #[serde(default)]
    pub must_visit_places: Vec<String>,
}

impl TripRequest {
    /// Trip length in days, inclusive of both endpoints.
    ///
    /// Zero when the dates are inverted; callers validate the range before
    /// relying on this.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

// ---------------------------------------------------------------------------
// Itinerary
// ---------------------------------------------------------------------------

/// One timed entry in a day's schedule.
///
/// The type enforces no ordering; the generation prompt asks for
/// chronological order but the store never verifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub time: String,
    pub activity: String,
    pub description: String,
}

/// A single day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: String,
    pub date: String,
    pub theme: String,
    pub schedule: Vec<ScheduleItem>,
}

/// A rated point of interest (restaurant, sight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,
    pub area: String,
    /// Expected range 0-5; the generator is asked for it but the value is
    /// stored as received.
    pub rating: f64,
    pub notes: String,
}

/// A hotel recommendation: a [`Recommendation`] plus a price-range label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRecommendation {
    pub name: String,
    pub area: String,
    pub rating: f64,
    pub notes: String,
    pub price_range: String,
}

/// A complete generated itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub trip_title: String,
    pub daily_itinerary: Vec<DailyPlan>,
    pub hotel_recommendations: Vec<HotelRecommendation>,
    pub transportation_guide: String,
    pub restaurant_recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Saved plan
// ---------------------------------------------------------------------------

/// A persisted itinerary.
///
/// The client supplies `id` at save time (typically a millisecond
/// timestamp); it doubles as the blob key and as the descending sort key, so
/// listings come back most-recently-created first. A saved plan is immutable
/// except by full overwrite at the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: i64,
    pub plan: TravelPlan,
    pub destination: Destination,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_plan() -> TravelPlan {
        TravelPlan {
            trip_title: "도쿄 2박 3일".to_owned(),
            daily_itinerary: vec![DailyPlan {
                day: "1일차".to_owned(),
                date: "2026-04-01".to_owned(),
                theme: "시부야".to_owned(),
                schedule: vec![ScheduleItem {
                    time: "10:00".to_owned(),
                    activity: "시부야 스크램블".to_owned(),
                    description: "교차로 구경".to_owned(),
                }],
            }],
            hotel_recommendations: vec![HotelRecommendation {
                name: "호텔 A".to_owned(),
                area: "신주쿠".to_owned(),
                rating: 4.5,
                notes: "역 근처".to_owned(),
                price_range: "15-20만원".to_owned(),
            }],
            transportation_guide: "스이카 카드 추천".to_owned(),
            restaurant_recommendations: vec![Recommendation {
                name: "이치란".to_owned(),
                area: "시부야".to_owned(),
                rating: 4.2,
                notes: "라멘".to_owned(),
            }],
        }
    }

    #[test]
    fn destination_wire_values_are_fixed() {
        assert_eq!(
            serde_json::to_string(&Destination::OsakaKyoto).unwrap(),
            "\"Osaka & Kyoto\""
        );
        assert_eq!(serde_json::to_string(&Destination::Tokyo).unwrap(), "\"Tokyo\"");
        assert_eq!(
            serde_json::to_string(&Destination::Fukuoka).unwrap(),
            "\"Fukuoka\""
        );
    }

    #[test]
    fn destination_rejects_unknown_value() {
        let result: Result<Destination, _> = serde_json::from_str("\"Sapporo\"");
        assert!(result.is_err(), "unknown destination must not default");
    }

    #[test]
    fn destination_display_fromstr_roundtrip() {
        for dest in Destination::ALL {
            let parsed: Destination = dest.to_string().parse().unwrap();
            assert_eq!(parsed, dest);
        }
    }

    #[test]
    fn destination_fromstr_accepts_cli_alias() {
        assert_eq!(
            "osaka-kyoto".parse::<Destination>().unwrap(),
            Destination::OsakaKyoto
        );
        assert!("nagoya".parse::<Destination>().is_err());
    }

    #[test]
    fn destination_airports() {
        assert_eq!(Destination::OsakaKyoto.airport(), "KIX");
        assert_eq!(Destination::Tokyo.airport(), "NRT");
        assert_eq!(Destination::Fukuoka.airport(), "FUK");
    }

    #[test]
    fn trip_request_uses_camel_case_wire_names() {
        let req: TripRequest = serde_json::from_str(
            r#"{
                "destination": "Tokyo",
                "startDate": "2026-04-01",
                "endDate": "2026-04-03",
                "mustVisitPlaces": ["Shibuya Crossing"]
            }"#,
        )
        .unwrap();
        assert_eq!(req.destination, Destination::Tokyo);
        assert_eq!(req.duration_days(), 3);
        assert_eq!(req.must_visit_places, vec!["Shibuya Crossing"]);
    }

    #[test]
    fn trip_request_must_visit_defaults_to_empty() {
        let req: TripRequest = serde_json::from_str(
            r#"{"destination":"Fukuoka","startDate":"2026-05-01","endDate":"2026-05-02"}"#,
        )
        .unwrap();
        assert!(req.must_visit_places.is_empty());
    }

    #[test]
    fn travel_plan_json_roundtrip_is_lossless() {
        let plan = minimal_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: TravelPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn travel_plan_serializes_camel_case_fields() {
        let json = serde_json::to_value(minimal_plan()).unwrap();
        assert!(json.get("tripTitle").is_some());
        assert!(json.get("dailyItinerary").is_some());
        assert!(json.get("hotelRecommendations").is_some());
        assert!(json.get("transportationGuide").is_some());
        assert!(json.get("restaurantRecommendations").is_some());
        assert!(
            json["hotelRecommendations"][0].get("priceRange").is_some(),
            "hotel entries carry a priceRange label"
        );
    }

    #[test]
    fn saved_plan_roundtrip_keeps_dates_and_id() {
        let saved = SavedPlan {
            id: 1_700_000_000_000,
            plan: minimal_plan(),
            destination: Destination::Tokyo,
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 3).unwrap(),
        };
        let json = serde_json::to_string(&saved).unwrap();
        let back: SavedPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, saved);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["startDate"], "2026-04-01");
        assert_eq!(value["id"], 1_700_000_000_000_i64);
    }
}
