use crate::error::PlanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 14;

/// Interest tags the form and the API accept.
pub const INTEREST_TAGS: &[&str] = &[
    "Beach",
    "Culture",
    "Food",
    "Adventure",
    "Shopping",
    "Art",
    "History",
    "Nature",
    "Nightlife",
    "Relaxation",
];

/// Raw fields as they arrive from the form or the JSON endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RawTripRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: String,
    pub duration_days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// A validated trip request. Constructed fresh per incoming request and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: Option<String>,
    pub destination: String,
    pub duration_days: u32,
    pub interests: Vec<String>,
    pub special_requests: Option<String>,
}

impl TryFrom<RawTripRequest> for TripRequest {
    type Error = PlanError;

    fn try_from(raw: RawTripRequest) -> Result<Self, PlanError> {
        let destination = raw.destination.trim().to_string();
        if destination.is_empty() {
            return Err(PlanError::validation(
                "destination",
                "destination must not be empty",
            ));
        }
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&raw.duration_days) {
            return Err(PlanError::validation(
                "duration_days",
                format!(
                    "trip duration must be between {} and {} days, got {}",
                    MIN_DURATION_DAYS, MAX_DURATION_DAYS, raw.duration_days
                ),
            ));
        }
        for interest in &raw.interests {
            if !INTEREST_TAGS.contains(&interest.as_str()) {
                return Err(PlanError::validation(
                    "interests",
                    format!("unsupported interest tag: {}", interest),
                ));
            }
        }
        let origin = raw
            .origin
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
        let special_requests = raw
            .special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(TripRequest {
            origin,
            destination,
            duration_days: raw.duration_days,
            interests: raw.interests,
            special_requests,
        })
    }
}

/// Expand a validated request into the instruction prompt handed to the
/// agent. Pure string templating, deterministic for a given request.
#[instrument(skip(request), fields(destination = %request.destination))]
pub fn build_prompt(request: &TripRequest) -> String {
    let interests = if request.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        request.interests.join(", ")
    };
    let mut prompt = format!(
        "Plan a {}-day trip to {}.\n\nInterests: {}\n",
        request.duration_days, request.destination, interests
    );
    if let Some(origin) = &request.origin {
        prompt.push_str(&format!("Traveling from: {}\n", origin));
    }
    if let Some(special) = &request.special_requests {
        prompt.push_str(&format!("Special requests: {}\n", special));
    }
    prompt.push_str(
        "\nPlease provide:\n\
         1. A detailed day-by-day itinerary with activities\n\
         2. Current weather information for the destination\n\
         3. Local cuisine recommendations\n\
         4. Best times to visit specific attractions\n\
         5. Travel tips and budget estimates\n\
         6. Current date and time reference",
    );
    prompt
}

/// The finished plan as handed to the rendering layer. Not persisted
/// server-side.
#[derive(Debug, Clone, Serialize)]
pub struct TravelPlanResult {
    pub plan_text: String,
    pub destination: String,
    pub duration_days: u32,
    pub generated_at: DateTime<Utc>,
}
