//! Shared test helpers: a scripted generation provider and plan fixtures.
//!
//! Lives in its own crate so every other crate's tests can exercise the
//! engine and the dispatcher without a live provider or blob backend.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use tabi_core::model::{
    DailyPlan, Destination, HotelRecommendation, Recommendation, SavedPlan, ScheduleItem,
    TravelPlan,
};
use tabi_core::provider::{
    GenerationRequest, GenerationResponse, ProviderError, TextGenerator,
};

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

enum Scripted {
    Reply(GenerationResponse),
    Failure { status: u16, message: String },
}

/// A [`TextGenerator`] that replays scripted responses and records every
/// request it receives.
///
/// Replies are consumed front-to-back; once the script runs dry, further
/// calls return [`ProviderError::Empty`].
#[derive(Default)]
pub struct StubGenerator {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubGenerator {
    /// A stub that answers every call with the same free-text reply.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::scripted_reply(GenerationResponse {
            text: Some(text.into()),
            structured: None,
        })
    }

    /// A stub that answers with a structured call payload.
    pub fn with_structured(args: serde_json::Value) -> Self {
        Self::scripted_reply(GenerationResponse {
            text: None,
            structured: Some(args),
        })
    }

    /// A stub whose every call fails with the given API error.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        let stub = Self::default();
        stub.script
            .try_lock()
            .expect("fresh stub lock")
            .push_back(Scripted::Failure {
                status,
                message: message.into(),
            });
        stub
    }

    fn scripted_reply(reply: GenerationResponse) -> Self {
        let stub = Self::default();
        stub.script
            .try_lock()
            .expect("fresh stub lock")
            .push_back(Scripted::Reply(reply));
        stub
    }

    /// Append another scripted reply (consumed after the existing ones).
    pub async fn push_text(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Reply(GenerationResponse {
                text: Some(text.into()),
                structured: None,
            }));
    }

    /// Every prompt received so far, in call order.
    pub async fn recorded_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Every full request received so far, in call order.
    pub async fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        self.requests.lock().await.push(request.clone());

        match self.script.lock().await.pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Failure { status, message }) => {
                Err(ProviderError::Api { status, message })
            }
            None => Err(ProviderError::Empty),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A small but complete plan: one day, five hotels, five restaurants.
pub fn sample_travel_plan(title: &str) -> TravelPlan {
    let hotels = (1..=5)
        .map(|n| HotelRecommendation {
            name: format!("호텔 {n}"),
            area: "난바".to_owned(),
            rating: 5.0 - n as f64 * 0.1,
            notes: "역에서 도보 5분".to_owned(),
            price_range: "12-18만원".to_owned(),
        })
        .collect();
    let restaurants = (1..=5)
        .map(|n| Recommendation {
            name: format!("맛집 {n}"),
            area: "도톤보리".to_owned(),
            rating: 4.8 - n as f64 * 0.1,
            notes: "웨이팅 있음".to_owned(),
        })
        .collect();

    TravelPlan {
        trip_title: title.to_owned(),
        daily_itinerary: vec![DailyPlan {
            day: "1일차".to_owned(),
            date: "2026-04-01".to_owned(),
            theme: "시내 중심".to_owned(),
            schedule: vec![
                ScheduleItem {
                    time: "10:00".to_owned(),
                    activity: "도착 및 체크인".to_owned(),
                    description: "공항에서 숙소로 이동".to_owned(),
                },
                ScheduleItem {
                    time: "14:00".to_owned(),
                    activity: "시내 산책".to_owned(),
                    description: "주변 상점가 구경".to_owned(),
                },
            ],
        }],
        hotel_recommendations: hotels,
        transportation_guide: "IC 카드 한 장이면 충분합니다.".to_owned(),
        restaurant_recommendations: restaurants,
    }
}

/// A saved Tokyo plan with the given id, for store and dispatcher tests.
pub fn sample_saved_plan(id: i64) -> SavedPlan {
    SavedPlan {
        id,
        plan: sample_travel_plan("도쿄 2박 3일"),
        destination: Destination::Tokyo,
        start_date: NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 4, 3).expect("valid date"),
    }
}
