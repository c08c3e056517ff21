//! Simulate Room use case
//!
//! Replays a timed script of member actions through a room actor, the same
//! way a live change feed would deliver them, and reports what happened.

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::question_catalog::QuestionCatalog;
use crate::ports::restaurant_catalog::RestaurantCatalog;
use crate::ports::tag_mapping_store::TagMappingStore;
use crate::use_cases::ingest_answers::{IngestError, classify_member};
use crate::use_cases::room_directory::{RoomDirectory, RoomError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablepick_domain::{
    DomainError, GeoPoint, MemberId, Questionnaire, RawAnswer, RestaurantId, RoomCode, RoomEvent,
    RoomView,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("Invalid script: {0}")]
    InvalidScript(#[from] DomainError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// A room script as read from JSON
///
/// ```json
/// {
///   "room": "ABCDEF",
///   "steps": [
///     { "at_ms": 0,    "action": { "type": "members", "members": ["ana", "ben"] } },
///     { "at_ms": 1000, "action": { "type": "answers", "member": "ana",
///                                  "answers": [{ "question": "Spicy?", "label": "Yes" }] } },
///     { "at_ms": 9000, "action": { "type": "vote", "member": "ana", "restaurant": "r-1" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomScript {
    pub room: String,
    /// Question mode for classifying answers; falls back to the configured mode
    #[serde(default)]
    pub mode: Option<String>,
    /// Where the group meets; distance answers only filter when set
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub at_ms: u64,
    pub action: ScriptAction,
}

/// Member-facing actions; answers arrive unclassified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    Members {
        members: Vec<String>,
    },
    Answers {
        member: String,
        answers: Vec<RawAnswer>,
    },
    Vote {
        member: String,
        #[serde(default)]
        restaurant: Option<String>,
    },
    Swipe {
        member: String,
        restaurant: String,
        #[serde(default = "default_liked")]
        liked: bool,
    },
    Recommend,
    Finalize {
        #[serde(default)]
        restaurant: Option<String>,
    },
    Retry,
    Abandon,
}

fn default_liked() -> bool {
    true
}

/// What one step did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub at_ms: u64,
    pub action: &'static str,
    /// Rejection or failure message; `None` when applied
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepOutcome>,
    pub view: RoomView,
}

impl SimulationReport {
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Use case for replaying a room script
pub struct SimulateRoomUseCase<
    R: RestaurantCatalog + 'static,
    T: TagMappingStore + 'static,
    Q: QuestionCatalog + 'static,
> {
    rooms: Arc<RoomDirectory<R, T>>,
    questions: Arc<Q>,
}

impl<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static, Q: QuestionCatalog + 'static>
    SimulateRoomUseCase<R, T, Q>
{
    pub fn new(rooms: Arc<RoomDirectory<R, T>>, questions: Arc<Q>) -> Self {
        Self { rooms, questions }
    }

    pub async fn execute(&self, script: &RoomScript) -> Result<SimulationReport, SimulateError> {
        self.execute_with_progress(script, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        script: &RoomScript,
        progress: &dyn ProgressNotifier,
    ) -> Result<SimulationReport, SimulateError> {
        let code = RoomCode::new(&script.room)?;
        let mode = script
            .mode
            .as_deref()
            .or(self.rooms.params().question_mode.as_deref());
        let questionnaire = self
            .questions
            .questionnaire(mode)
            .await
            .map_err(IngestError::from)?;

        let created_at = script.steps.first().map_or(0, |s| s.at_ms);
        let room = self.rooms.room_near(&code, created_at, script.location);
        info!("Simulating {} steps in room {}", script.steps.len(), code);
        progress.on_start(&code, script.steps.len());

        let mut steps = Vec::with_capacity(script.steps.len());
        for step in &script.steps {
            let event = to_event(&step.action, &questionnaire)?;
            let action = event.kind();
            let error = match room.send_at(event, step.at_ms).await {
                Ok(()) => None,
                Err(RoomError::Rejected(rejection)) => Some(rejection.to_string()),
                Err(e) => Some(e.to_string()),
            };
            if let Some(error) = &error {
                debug!("Step at {}ms ({}) failed: {}", step.at_ms, action, error);
            }
            let outcome = StepOutcome {
                at_ms: step.at_ms,
                action,
                error,
            };
            progress.on_step(&outcome, &room.view());
            steps.push(outcome);
        }

        let view = room.view();
        progress.on_finish(&view);
        Ok(SimulationReport { steps, view })
    }
}

fn to_event(action: &ScriptAction, questionnaire: &Questionnaire) -> Result<RoomEvent, SimulateError> {
    Ok(match action {
        ScriptAction::Members { members } => RoomEvent::MemberListChanged {
            members: members
                .iter()
                .map(|m| MemberId::new(m.as_str()))
                .collect::<Result<_, _>>()?,
        },
        ScriptAction::Answers { member, answers } => {
            let ingested = classify_member(questionnaire, member, answers)?;
            RoomEvent::AnswersSubmitted {
                member: ingested.member,
                answers: ingested.answers,
            }
        }
        ScriptAction::Vote { member, restaurant } => RoomEvent::VoteChanged {
            member: MemberId::new(member.as_str())?,
            restaurant: restaurant.as_deref().map(RestaurantId::from),
        },
        ScriptAction::Swipe {
            member,
            restaurant,
            liked,
        } => RoomEvent::Swiped {
            member: MemberId::new(member.as_str())?,
            restaurant: RestaurantId::from(restaurant.as_str()),
            liked: *liked,
        },
        ScriptAction::Recommend => RoomEvent::RecommendationsRequested,
        ScriptAction::Finalize { restaurant } => RoomEvent::FinalizeRequested {
            choice: restaurant.as_deref().map(RestaurantId::from),
        },
        ScriptAction::Retry => RoomEvent::RetryVoting,
        ScriptAction::Abandon => RoomEvent::Abandon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RecommendParams, RoomParams};
    use crate::ports::restaurant_catalog::CatalogError;
    use crate::ports::tag_mapping_store::StaticTagMappings;
    use crate::use_cases::recommend::RecommendUseCase;
    use async_trait::async_trait;
    use tablepick_domain::questionnaire::{BasicAttribute, Question};
    use tablepick_domain::restaurant::{Restaurant, Spiciness};
    use tablepick_domain::{Decision, RoomPhase};

    struct Catalog;

    #[async_trait]
    impl RestaurantCatalog for Catalog {
        async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
            Ok(vec![
                Restaurant::new("x", "X").with_spiciness(Spiciness::Yes),
                Restaurant::new("y", "Y").with_spiciness(Spiciness::Both),
                Restaurant::new("z", "Z").with_spiciness(Spiciness::No),
            ])
        }
    }

    struct Questions;

    #[async_trait]
    impl QuestionCatalog for Questions {
        async fn questionnaire(&self, _mode: Option<&str>) -> Result<Questionnaire, CatalogError> {
            Ok(Questionnaire::new(vec![Question::basic(
                "spice",
                "Spicy?",
                BasicAttribute::Spice,
                "Yes",
                "No",
            )]))
        }
    }

    fn use_case() -> SimulateRoomUseCase<Catalog, StaticTagMappings, Questions> {
        let recommend = RecommendUseCase::new(
            Arc::new(Catalog),
            Arc::new(StaticTagMappings::default()),
            RecommendParams::default().with_shuffle(false),
        );
        let rooms = RoomDirectory::new(Arc::new(recommend), RoomParams::default());
        SimulateRoomUseCase::new(Arc::new(rooms), Arc::new(Questions))
    }

    const TIE_SCRIPT: &str = r#"{
        "room": "ABCDEF",
        "steps": [
            {"at_ms": 0, "action": {"type": "members", "members": ["a", "b", "c", "d"]}},
            {"at_ms": 100, "action": {"type": "answers", "member": "a",
                "answers": [{"question": "Spicy?", "label": "Yes"}]}},
            {"at_ms": 200, "action": {"type": "recommend"}},
            {"at_ms": 300, "action": {"type": "vote", "member": "a", "restaurant": "x"}},
            {"at_ms": 400, "action": {"type": "vote", "member": "b", "restaurant": "y"}},
            {"at_ms": 500, "action": {"type": "vote", "member": "c", "restaurant": "y"}},
            {"at_ms": 600, "action": {"type": "vote", "member": "d", "restaurant": "x"}},
            {"at_ms": 700, "action": {"type": "vote", "member": "a", "restaurant": "y"}}
        ]
    }"#;

    #[tokio::test]
    async fn test_tie_script_is_reproducible() {
        let script: RoomScript = serde_json::from_str(TIE_SCRIPT).unwrap();

        let first = use_case().execute(&script).await.unwrap();
        let second = use_case().execute(&script).await.unwrap();

        assert_eq!(first.view.phase, RoomPhase::Completed);
        assert_eq!(first.view.decision, second.view.decision);
        match &first.view.decision {
            Some(Decision::Winner {
                restaurant,
                tie_broken,
                ..
            }) => {
                assert_eq!(restaurant.as_str(), "y");
                assert!(*tie_broken);
            }
            other => panic!("expected a winner, got {:?}", other),
        }
        // The vote after completion is rejected, not applied
        assert_eq!(first.rejected(), 1);
        assert_eq!(first.steps.last().and_then(|s| s.error.as_deref()), Some("Room already finalized"));
        assert_eq!(first.view.summary.as_ref().map(|s| s.latency_ms), Some(600));
    }

    #[tokio::test]
    async fn test_invalid_room_code() {
        let script = RoomScript {
            room: " ".to_string(),
            mode: None,
            location: None,
            steps: vec![],
        };
        assert!(matches!(
            use_case().execute(&script).await,
            Err(SimulateError::InvalidScript(_))
        ));
    }

    struct CountingProgress {
        started: std::sync::Mutex<Option<usize>>,
        phases: std::sync::Mutex<Vec<RoomPhase>>,
    }

    impl ProgressNotifier for CountingProgress {
        fn on_start(&self, _room: &tablepick_domain::RoomCode, total_steps: usize) {
            *self.started.lock().unwrap() = Some(total_steps);
        }

        fn on_step(&self, _outcome: &StepOutcome, view: &RoomView) {
            self.phases.lock().unwrap().push(view.phase);
        }

        fn on_finish(&self, _view: &RoomView) {}
    }

    #[tokio::test]
    async fn test_progress_sees_every_step() {
        let script: RoomScript = serde_json::from_str(TIE_SCRIPT).unwrap();
        let progress = CountingProgress {
            started: std::sync::Mutex::new(None),
            phases: std::sync::Mutex::new(Vec::new()),
        };

        use_case()
            .execute_with_progress(&script, &progress)
            .await
            .unwrap();

        assert_eq!(*progress.started.lock().unwrap(), Some(8));
        let phases = progress.phases.lock().unwrap();
        assert_eq!(phases.len(), 8);
        assert_eq!(phases[0], RoomPhase::Collecting);
        assert_eq!(phases[2], RoomPhase::Voting);
        assert_eq!(phases[7], RoomPhase::Completed);
    }

    #[test]
    fn test_script_location_is_optional() {
        let script: RoomScript = serde_json::from_str(TIE_SCRIPT).unwrap();
        assert_eq!(script.location, None);

        let script: RoomScript = serde_json::from_str(
            r#"{"room": "ABCDEF", "location": {"lat": 37.56, "lng": 126.97}, "steps": []}"#,
        )
        .unwrap();
        assert_eq!(script.location, Some(GeoPoint::new(37.56, 126.97)));
    }

    #[test]
    fn test_swipe_defaults_to_like() {
        let step: ScriptStep = serde_json::from_str(
            r#"{"at_ms": 5, "action": {"type": "swipe", "member": "a", "restaurant": "x"}}"#,
        )
        .unwrap();
        assert_eq!(
            step.action,
            ScriptAction::Swipe {
                member: "a".to_string(),
                restaurant: "x".to_string(),
                liked: true,
            }
        );
    }
}
