//! Prompt construction: pure string assembly, no I/O.
//!
//! Correctness here depends entirely on the literal wording fed to the
//! model, so these functions are deterministic and tested for exact string
//! content given each destination / must-visit combination.

use crate::model::{Destination, TripRequest};

/// Minimum number of hotel and restaurant recommendations the generator is
/// asked for.
pub const MIN_RECOMMENDATIONS: usize = 5;

/// Name of the structured call used in schema-constrained mode.
pub const STRUCTURED_CALL_NAME: &str = "return_travel_plan";

/// JSON shape reference included verbatim in the plan prompt.
const OUTPUT_SCHEMA_REFERENCE: &str = r#"## Output schema

{
  "tripTitle": "string",
  "dailyItinerary": [
    {
      "day": "string",
      "date": "YYYY-MM-DD",
      "theme": "string",
      "schedule": [
        { "time": "HH:MM", "activity": "string", "description": "string" }
      ]
    }
  ],
  "hotelRecommendations": [
    { "name": "string", "area": "string", "rating": 4.5, "notes": "string", "priceRange": "string" }
  ],
  "transportationGuide": "string",
  "restaurantRecommendations": [
    { "name": "string", "area": "string", "rating": 4.5, "notes": "string" }
  ]
}
"#;

/// Lodging clause for the split Osaka/Kyoto trip.
const SPLIT_STAY_CLAUSE: &str = "Split the stay between Osaka and Kyoto: recommend hotels in both \
     cities, and order the days so each city's sights are visited from the nearer hotel.";

/// Lodging clause for single-city trips.
const GENERIC_LODGING_CLAUSE: &str = "Recommend hotels clustered in one convenient area near the \
     city's main transit hub, and plan each day as an outing from that single base.";

/// Clause emitted instead of a bullet list when no must-visit places were
/// given.
const NO_MUST_VISIT_CLAUSE: &str = "No must-visit places were specified; build the route around \
     the destination's essential first-visit sights.";

/// Build the full itinerary-generation instruction for one request.
pub fn build_plan_prompt(request: &TripRequest) -> String {
    let mut prompt = String::with_capacity(2048);

    // Role and trip frame.
    prompt.push_str(
        "You are a professional travel planner specializing in Japan trips \
         for Korean travelers.\n\n",
    );
    prompt.push_str(&format!(
        "Plan a trip to {dest}, Japan, departing from Seoul (Incheon International \
         Airport) and arriving at {airport}, from {start} to {end}.\n\n",
        dest = request.destination,
        airport = request.destination.airport(),
        start = request.start_date,
        end = request.end_date,
    ));

    // Must-visit places.
    prompt.push_str("## Must-visit places\n\n");
    if request.must_visit_places.is_empty() {
        prompt.push_str(NO_MUST_VISIT_CLAUSE);
        prompt.push('\n');
    } else {
        for place in &request.must_visit_places {
            prompt.push_str(&format!("- {place}\n"));
        }
    }
    prompt.push('\n');

    // Lodging strategy, conditional on the destination.
    prompt.push_str("## Lodging\n\n");
    let lodging = match request.destination {
        Destination::OsakaKyoto => SPLIT_STAY_CLAUSE,
        Destination::Tokyo | Destination::Fukuoka => GENERIC_LODGING_CLAUSE,
    };
    prompt.push_str(lodging);
    prompt.push_str("\n\n");

    // Output contract.
    prompt.push_str("## Requirements\n\n");
    prompt.push_str(
        "- Route the days logically so every must-visit place above is covered.\n",
    );
    prompt.push_str(&format!(
        "- Recommend at least {MIN_RECOMMENDATIONS} hotels and at least \
         {MIN_RECOMMENDATIONS} restaurants.\n",
    ));
    prompt.push_str(
        "- Give every recommendation a numeric rating between 0 and 5, and sort \
         each recommendation list by rating, highest first.\n",
    );
    prompt.push_str("- Write every output text value in Korean.\n");
    prompt.push_str(
        "- Return exactly one JSON document matching the schema below. No \
         explanations, no markdown code fence, nothing outside the JSON.\n\n",
    );
    prompt.push_str(OUTPUT_SCHEMA_REFERENCE);

    prompt
}

/// Build the short free-text instruction for an information query.
///
/// The query is embedded verbatim; the reply has no structural contract.
pub fn build_search_prompt(query: &str) -> String {
    format!(
        "Answer the following Japan-travel question concisely, in Korean.\n\n\
         Question: \"{query}\"\n"
    )
}

/// JSON schema for the structured `return_travel_plan` call.
///
/// Mirrors [`OUTPUT_SCHEMA_REFERENCE`]; the free-text prompt and the
/// schema-constrained directive must describe the same shape.
pub fn travel_plan_schema() -> serde_json::Value {
    let recommendation_properties = serde_json::json!({
        "name": {"type": "string"},
        "area": {"type": "string"},
        "rating": {"type": "number"},
        "notes": {"type": "string"}
    });
    let mut hotel_properties = recommendation_properties.clone();
    hotel_properties["priceRange"] = serde_json::json!({"type": "string"});

    serde_json::json!({
        "type": "object",
        "properties": {
            "tripTitle": {"type": "string"},
            "dailyItinerary": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "day": {"type": "string"},
                        "date": {"type": "string"},
                        "theme": {"type": "string"},
                        "schedule": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "time": {"type": "string"},
                                    "activity": {"type": "string"},
                                    "description": {"type": "string"}
                                },
                                "required": ["time", "activity", "description"]
                            }
                        }
                    },
                    "required": ["day", "date", "theme", "schedule"]
                }
            },
            "hotelRecommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": hotel_properties,
                    "required": ["name", "area", "rating", "notes", "priceRange"]
                }
            },
            "transportationGuide": {"type": "string"},
            "restaurantRecommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": recommendation_properties,
                    "required": ["name", "area", "rating", "notes"]
                }
            }
        },
        "required": [
            "tripTitle",
            "dailyItinerary",
            "hotelRecommendations",
            "transportationGuide",
            "restaurantRecommendations"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(destination: Destination, must_visit: &[&str]) -> TripRequest {
        TripRequest {
            destination,
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 3).unwrap(),
            must_visit_places: must_visit.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn prompt_names_the_role_and_trip_frame() {
        let prompt = build_plan_prompt(&request(Destination::Tokyo, &[]));
        assert!(prompt.contains("professional travel planner"));
        assert!(prompt.contains("Seoul (Incheon International Airport)"));
        assert!(prompt.contains("Tokyo, Japan"));
        assert!(prompt.contains("arriving at NRT"));
        assert!(prompt.contains("from 2026-04-01 to 2026-04-03"));
    }

    #[test]
    fn osaka_kyoto_gets_the_split_stay_clause() {
        let prompt = build_plan_prompt(&request(Destination::OsakaKyoto, &[]));
        assert!(prompt.contains("Split the stay between Osaka and Kyoto"));
        assert!(!prompt.contains("single base"));
        assert!(prompt.contains("arriving at KIX"));
    }

    #[test]
    fn single_city_destinations_get_the_generic_clause() {
        for destination in [Destination::Tokyo, Destination::Fukuoka] {
            let prompt = build_plan_prompt(&request(destination, &[]));
            assert!(
                prompt.contains("single base"),
                "{destination} should use the generic lodging clause"
            );
            assert!(
                !prompt.contains("Split the stay"),
                "{destination} must not get the split-stay clause"
            );
        }
    }

    #[test]
    fn must_visit_places_are_bulleted_in_order() {
        let prompt = build_plan_prompt(&request(
            Destination::OsakaKyoto,
            &["Osaka Castle", "Fushimi Inari"],
        ));
        assert!(prompt.contains("- Osaka Castle\n- Fushimi Inari\n"));
        assert!(!prompt.contains("No must-visit places were specified"));
    }

    #[test]
    fn empty_must_visit_emits_the_none_clause_not_an_empty_list() {
        let prompt = build_plan_prompt(&request(Destination::Fukuoka, &[]));
        assert!(prompt.contains("No must-visit places were specified"));
        assert!(
            !prompt.contains("places\n\n- "),
            "no bullet list should follow the heading"
        );
    }

    #[test]
    fn prompt_mandates_cardinality_ratings_and_bare_json() {
        let prompt = build_plan_prompt(&request(Destination::Tokyo, &["Shibuya"]));
        assert!(prompt.contains("at least 5 hotels"));
        assert!(prompt.contains("at least 5 restaurants"));
        assert!(prompt.contains("sort each recommendation list by rating, highest first"));
        assert!(prompt.contains("exactly one JSON document"));
        assert!(prompt.contains("no markdown code fence"));
        assert!(prompt.contains("in Korean"));
    }

    #[test]
    fn prompt_embeds_the_schema_reference() {
        let prompt = build_plan_prompt(&request(Destination::Tokyo, &[]));
        assert!(prompt.contains("## Output schema"));
        assert!(prompt.contains("\"tripTitle\""));
        assert!(prompt.contains("\"dailyItinerary\""));
        assert!(prompt.contains("\"priceRange\""));
        assert!(prompt.contains("\"transportationGuide\""));
    }

    #[test]
    fn prompt_is_deterministic() {
        let req = request(Destination::OsakaKyoto, &["Osaka Castle"]);
        assert_eq!(build_plan_prompt(&req), build_plan_prompt(&req));
    }

    #[test]
    fn search_prompt_embeds_the_query_verbatim() {
        let prompt = build_search_prompt("JR 패스 살까?");
        assert!(prompt.contains("\"JR 패스 살까?\""));
        assert!(prompt.contains("concisely"));
    }

    #[test]
    fn schema_requires_every_top_level_field() {
        let schema = travel_plan_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "tripTitle",
            "dailyItinerary",
            "hotelRecommendations",
            "transportationGuide",
            "restaurantRecommendations",
        ] {
            assert!(required.contains(&field), "{field} should be required");
        }
        assert_eq!(
            schema["properties"]["hotelRecommendations"]["items"]["properties"]["priceRange"]
                ["type"],
            "string"
        );
    }
}
