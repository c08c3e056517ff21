//! Room actors
//!
//! Each room code gets one tokio task that owns its [`Room`] and is the only
//! writer to it. Events arrive through an ordered mpsc inbox; the task applies
//! them to the reducer, carries out the returned effects (ranking the catalog,
//! publishing) and pushes a fresh [`RoomView`] into a `watch` channel.
//!
//! ```text
//!  RoomHandle ──mpsc──► actor task ──apply──► Room (reducer)
//!      ▲                    │
//!      └──────watch─────────┤ effects ──► RecommendUseCase / RoomPublisher
//! ```

use crate::config::RoomParams;
use crate::ports::restaurant_catalog::RestaurantCatalog;
use crate::ports::room_publisher::{NoRoomPublisher, RoomPublication, RoomPublisher};
use crate::ports::tag_mapping_store::TagMappingStore;
use crate::use_cases::recommend::{RecommendError, RecommendUseCase};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tablepick_domain::{
    GeoPoint, Room, RoomCode, RoomEffect, RoomEvent, RoomPhase, RoomRejection, RoomView,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("Room {0} is closed")]
    Closed(RoomCode),

    #[error("Rejected: {0}")]
    Rejected(#[from] RoomRejection),

    #[error("Recommendation failed: {0}")]
    Recommend(#[from] RecommendError),
}

impl RoomError {
    pub fn rejection(&self) -> Option<&RoomRejection> {
        match self {
            RoomError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

struct RoomCommand {
    event: RoomEvent,
    at_ms: u64,
    reply: oneshot::Sender<Result<(), RoomError>>,
}

/// Cheap, cloneable access to one room's actor
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    inbox: mpsc::Sender<RoomCommand>,
    view: watch::Receiver<RoomView>,
    cancel: CancellationToken,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Send an event stamped with the current time and wait until it is applied
    pub async fn send(&self, event: RoomEvent) -> Result<(), RoomError> {
        self.send_at(event, now_ms()).await
    }

    /// Send an event with an explicit timestamp and wait until it is applied
    pub async fn send_at(&self, event: RoomEvent, at_ms: u64) -> Result<(), RoomError> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(RoomCommand {
                event,
                at_ms,
                reply,
            })
            .await
            .map_err(|_| self.closed_error())?;
        response.await.map_err(|_| self.closed_error())?
    }

    /// Error for an event that reached a stopped actor, judged by its final view
    fn closed_error(&self) -> RoomError {
        match self.view.borrow().phase {
            RoomPhase::Completed => RoomRejection::Finalized.into(),
            RoomPhase::Abandoned => RoomRejection::Abandoned.into(),
            _ => RoomError::Closed(self.code.clone()),
        }
    }

    /// Latest published view
    pub fn view(&self) -> RoomView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RoomView> {
        self.view.clone()
    }

    /// Wait until the room reaches `phase`
    pub async fn wait_for_phase(&self, phase: RoomPhase) -> Result<RoomView, RoomError> {
        let mut rx = self.view.clone();
        rx.wait_for(|view| view.phase == phase)
            .await
            .map(|view| view.clone())
            .map_err(|_| RoomError::Closed(self.code.clone()))
    }

    /// Abandon the room; the actor stops after publishing it
    pub fn abandon(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }

    /// Wait until the actor has stopped
    pub async fn closed(&self) {
        self.inbox.closed().await
    }
}

/// Owns one actor per room code
pub struct RoomDirectory<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> {
    recommend: Arc<RecommendUseCase<R, T>>,
    publisher: Arc<dyn RoomPublisher>,
    params: RoomParams,
    rooms: Mutex<HashMap<RoomCode, RoomHandle>>,
    shutdown: CancellationToken,
}

impl<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> RoomDirectory<R, T> {
    pub fn new(recommend: Arc<RecommendUseCase<R, T>>, params: RoomParams) -> Self {
        Self {
            recommend,
            publisher: Arc::new(NoRoomPublisher),
            params,
            rooms: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn RoomPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Abandon every room when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn params(&self) -> &RoomParams {
        &self.params
    }

    /// Handle for `code`, opening the room now if it is not running
    pub fn room(&self, code: &RoomCode) -> RoomHandle {
        self.room_at(code, now_ms())
    }

    /// Like [`RoomDirectory::room`], with an explicit creation time for a new room
    pub fn room_at(&self, code: &RoomCode, created_at_ms: u64) -> RoomHandle {
        self.room_near(code, created_at_ms, None)
    }

    /// Like [`RoomDirectory::room_at`]; a new room ranks distance answers from `location`
    ///
    /// The location only applies when this call opens the room.
    pub fn room_near(
        &self,
        code: &RoomCode,
        created_at_ms: u64,
        location: Option<GeoPoint>,
    ) -> RoomHandle {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        prune(&mut rooms);
        if let Some(handle) = rooms.get(code) {
            return handle.clone();
        }
        let handle = self.spawn(code.clone(), created_at_ms, location);
        rooms.insert(code.clone(), handle.clone());
        handle
    }

    /// Handle of a running room
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        prune(&mut rooms);
        rooms.get(code).cloned()
    }

    /// Number of rooms still accepting events
    pub fn open_rooms(&self) -> usize {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        prune(&mut rooms);
        rooms.len()
    }

    /// Abandon every open room
    pub fn shutdown(&self) {
        info!("Shutting down room directory");
        self.shutdown.cancel();
    }

    fn spawn(&self, code: RoomCode, created_at_ms: u64, location: Option<GeoPoint>) -> RoomHandle {
        let aggregator = self.recommend.params().aggregator();
        let room = Room::with_aggregator(code.clone(), aggregator, created_at_ms);
        let (inbox_tx, inbox_rx) = mpsc::channel(self.params.inbox_capacity.max(1));
        let (view_tx, view_rx) = watch::channel(room.view());
        let cancel = self.shutdown.child_token();

        let actor = RoomActor {
            room,
            location,
            recommend: Arc::clone(&self.recommend),
            publisher: Arc::clone(&self.publisher),
            view: view_tx,
            cancel: cancel.clone(),
        };
        info!("Opening room {}", code);
        tokio::spawn(actor.run(inbox_rx));

        RoomHandle {
            code,
            inbox: inbox_tx,
            view: view_rx,
            cancel,
        }
    }
}

/// Drop handles whose actor has stopped
fn prune(rooms: &mut HashMap<RoomCode, RoomHandle>) {
    rooms.retain(|code, handle| {
        let open = !handle.is_closed();
        if !open {
            debug!("Forgetting closed room {}", code);
        }
        open
    });
}

struct RoomActor<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> {
    room: Room,
    /// Meeting point for distance answers
    location: Option<GeoPoint>,
    recommend: Arc<RecommendUseCase<R, T>>,
    publisher: Arc<dyn RoomPublisher>,
    view: watch::Sender<RoomView>,
    cancel: CancellationToken,
}

impl<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> RoomActor<R, T> {
    async fn run(mut self, mut inbox: mpsc::Receiver<RoomCommand>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    if !self.room.phase().is_terminal() {
                        let _ = self.handle(RoomEvent::Abandon, now_ms()).await;
                    }
                    break;
                }
                command = inbox.recv() => {
                    let Some(command) = command else {
                        debug!("Room {}: all handles dropped", self.room.code());
                        break;
                    };
                    let result = self.handle(command.event, command.at_ms).await;
                    let _ = command.reply.send(result);
                    if self.room.is_settled() {
                        break;
                    }
                }
            }
        }
        info!(
            "Room {} closed in phase {}",
            self.room.code(),
            self.room.phase().as_str()
        );
    }

    async fn handle(&mut self, event: RoomEvent, at_ms: u64) -> Result<(), RoomError> {
        debug!("Room {}: {}", self.room.code(), event.kind());
        let effects = match self.room.apply(&event, at_ms) {
            Ok(effects) => effects,
            Err(rejection) => {
                debug!("Room {}: {} rejected: {}", self.room.code(), event.kind(), rejection);
                return Err(rejection.into());
            }
        };
        let result = self.perform(effects, at_ms).await;
        self.view.send_replace(self.room.view());
        result
    }

    async fn perform(&mut self, effects: Vec<RoomEffect>, at_ms: u64) -> Result<(), RoomError> {
        let mut queue: VecDeque<RoomEffect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                RoomEffect::PhaseChanged { from, to } => {
                    info!("Room {}: {} -> {}", self.room.code(), from.as_str(), to.as_str());
                }
                RoomEffect::ShortlistRequested { merged } => {
                    self.publish(RoomPublication::AnswersMerged {
                        merged: merged.clone(),
                    });
                    let group = merged.member_count() > 1;
                    let ranked = self
                        .recommend
                        .rank_merged(&merged, group, self.location, Some(self.room.code()))
                        .await;
                    let (shortlist, _, _) = match ranked {
                        Ok(ranked) => ranked,
                        Err(e) => {
                            warn!("Room {}: ranking failed: {}", self.room.code(), e);
                            return Err(e.into());
                        }
                    };
                    let more = self
                        .room
                        .apply(&RoomEvent::ShortlistReady { shortlist }, at_ms)?;
                    queue.extend(more);
                }
                RoomEffect::ShortlistInstalled(shortlist) => {
                    self.publish(RoomPublication::ShortlistPublished { shortlist });
                }
                RoomEffect::TallyChanged {
                    tally,
                    voted,
                    total,
                } => {
                    debug!("Room {}: {}/{} voted", self.room.code(), voted, total);
                    self.publish(RoomPublication::TallyChanged {
                        tally,
                        voted,
                        total,
                    });
                }
                RoomEffect::Finalized(decision) => {
                    match decision.winner() {
                        Some(winner) => info!("Room {}: decided on {}", self.room.code(), winner),
                        None => info!("Room {}: completed without a result", self.room.code()),
                    }
                    self.publish(RoomPublication::Finalized { decision });
                    if let Some(summary) = self.room.summary() {
                        self.publish(RoomPublication::Summary { summary });
                    }
                }
                RoomEffect::Abandoned => {
                    info!("Room {}: abandoned", self.room.code());
                    self.publish(RoomPublication::Abandoned);
                    self.cancel.cancel();
                }
            }
        }
        Ok(())
    }

    fn publish(&self, publication: RoomPublication) {
        self.publisher.publish(self.room.code(), publication);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommendParams;
    use crate::ports::restaurant_catalog::CatalogError;
    use crate::ports::tag_mapping_store::StaticTagMappings;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tablepick_domain::questionnaire::{Answer, BasicAnswer, DistancePreference, SpiceChoice};
    use tablepick_domain::restaurant::{Restaurant, RestaurantId, Spiciness};
    use tablepick_domain::{AnswerSet, Decision, MemberId};

    struct FixedCatalog {
        restaurants: Vec<Restaurant>,
        fail_once: AtomicBool,
    }

    #[async_trait]
    impl RestaurantCatalog for FixedCatalog {
        async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
            if self.fail_once.swap(false, Ordering::SeqCst) {
                return Err(CatalogError::Io("flaky".to_string()));
            }
            Ok(self.restaurants.clone())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<&'static str>>,
    }

    impl RoomPublisher for RecordingPublisher {
        fn publish(&self, _room: &RoomCode, publication: RoomPublication) {
            self.events.lock().unwrap().push(publication.event_type());
        }
    }

    fn directory_with(
        fail_once: bool,
        publisher: Arc<dyn RoomPublisher>,
    ) -> RoomDirectory<FixedCatalog, StaticTagMappings> {
        let restaurants = (0..6)
            .map(|i| {
                let spice = if i < 3 { Spiciness::Yes } else { Spiciness::No };
                Restaurant::new(format!("r{}", i), format!("R{}", i)).with_spiciness(spice)
            })
            .collect();
        let catalog = FixedCatalog {
            restaurants,
            fail_once: AtomicBool::new(fail_once),
        };
        let recommend = RecommendUseCase::new(
            Arc::new(catalog),
            Arc::new(StaticTagMappings::default()),
            RecommendParams::default().with_shuffle(false),
        );
        RoomDirectory::new(Arc::new(recommend), RoomParams::default()).with_publisher(publisher)
    }

    fn directory() -> RoomDirectory<FixedCatalog, StaticTagMappings> {
        directory_with(false, Arc::new(NoRoomPublisher))
    }

    fn member(id: &str) -> MemberId {
        MemberId::new(id).unwrap()
    }

    fn code(s: &str) -> RoomCode {
        RoomCode::new(s).unwrap()
    }

    fn members(ids: &[&str]) -> RoomEvent {
        RoomEvent::MemberListChanged {
            members: ids.iter().map(|id| member(id)).collect(),
        }
    }

    fn vote(m: &str, r: &str) -> RoomEvent {
        RoomEvent::VoteChanged {
            member: member(m),
            restaurant: Some(RestaurantId::new(r)),
        }
    }

    fn spicy() -> AnswerSet {
        AnswerSet::new().with(Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy)))
    }

    #[tokio::test]
    async fn test_full_room_flow() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dir = directory_with(false, publisher.clone());
        let room = dir.room(&code("ROOM01"));

        room.send(members(&["a", "b"])).await.unwrap();
        for m in ["a", "b"] {
            room.send(RoomEvent::AnswersSubmitted {
                member: member(m),
                answers: spicy(),
            })
            .await
            .unwrap();
        }

        // All members answered: the actor ranked and opened voting
        let view = room.view();
        assert_eq!(view.phase, RoomPhase::Voting);
        let shortlist = view.shortlist.unwrap();
        let ids: Vec<_> = shortlist.picks.iter().map(|s| s.restaurant.id.as_str()).collect();
        assert_eq!(ids, vec!["r0", "r1", "r2"]);

        room.send(vote("a", "r1")).await.unwrap();
        room.send(vote("b", "r1")).await.unwrap();

        let view = room.wait_for_phase(RoomPhase::Completed).await.unwrap();
        assert_eq!(
            view.decision.as_ref().and_then(|d| d.winner()).map(|r| r.as_str()),
            Some("r1")
        );
        assert_eq!(view.summary.map(|s| s.vote_count), Some(2));

        let events = publisher.events.lock().unwrap().clone();
        assert_eq!(events.first(), Some(&"answers_merged"));
        assert!(events.contains(&"shortlist_published"));
        assert!(events.contains(&"tally_changed"));
        assert_eq!(&events[events.len() - 2..], &["finalized", "summary"]);
    }

    #[tokio::test]
    async fn test_late_vote_rejected_as_finalized() {
        let dir = directory();
        let room = dir.room(&code("ROOM02"));
        room.send(members(&["a"])).await.unwrap();
        room.send(RoomEvent::RecommendationsRequested).await.unwrap();
        room.send(vote("a", "r0")).await.unwrap();

        let err = room.send(vote("a", "r1")).await.unwrap_err();
        assert_eq!(err.rejection(), Some(&RoomRejection::Finalized));
        assert_eq!(
            room.view().decision.and_then(|d| d.winner().cloned()),
            Some(RestaurantId::new("r0"))
        );
    }

    #[tokio::test]
    async fn test_completed_rooms_are_released() {
        let dir = directory();
        let mut handles = Vec::new();
        for i in 0..20 {
            let room = dir.room(&code(&format!("DONE{:02}", i)));
            room.send(members(&["a"])).await.unwrap();
            room.send(RoomEvent::RecommendationsRequested).await.unwrap();
            room.send(vote("a", "r0")).await.unwrap();
            handles.push(room);
        }
        for room in &handles {
            room.closed().await;
        }

        assert_eq!(dir.open_rooms(), 0);
        assert!(dir.get(&code("DONE00")).is_none());
        // The final view outlives the actor
        let last = &handles[19];
        assert_eq!(last.view().phase, RoomPhase::Completed);
        let err = last.send(vote("a", "r1")).await.unwrap_err();
        assert_eq!(err.rejection(), Some(&RoomRejection::Finalized));
    }

    #[tokio::test]
    async fn test_no_result_room_stays_open_for_retry() {
        let dir = directory();
        let room = dir.room(&code("RETRY1"));
        room.send(members(&["a"])).await.unwrap();
        room.send(RoomEvent::RecommendationsRequested).await.unwrap();
        room.send(RoomEvent::FinalizeRequested { choice: None }).await.unwrap();

        assert_eq!(dir.open_rooms(), 1);
        room.send(RoomEvent::RetryVoting).await.unwrap();
        room.send(vote("a", "r0")).await.unwrap();
        room.closed().await;
        assert_eq!(dir.open_rooms(), 0);
    }

    /// Shortlisted ids once a single member has answered
    async fn shortlist_ids(room: RoomHandle, answers: &AnswerSet) -> Vec<String> {
        room.send(members(&["a"])).await.unwrap();
        room.send(RoomEvent::AnswersSubmitted {
            member: member("a"),
            answers: answers.clone(),
        })
        .await
        .unwrap();
        room.view()
            .shortlist
            .unwrap()
            .picks
            .iter()
            .map(|s| s.restaurant.id.as_str().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_room_location_filters_distance_answers() {
        let here = GeoPoint::new(37.5665, 126.9780);
        let catalog = FixedCatalog {
            restaurants: vec![
                Restaurant::new("far", "Far").with_location(GeoPoint::new(37.4563, 126.7052)),
                Restaurant::new("near", "Near").with_location(GeoPoint::new(37.5670, 126.9785)),
            ],
            fail_once: AtomicBool::new(false),
        };
        let recommend = RecommendUseCase::new(
            Arc::new(catalog),
            Arc::new(StaticTagMappings::default()),
            RecommendParams::default().with_shuffle(false),
        );
        let dir = RoomDirectory::new(Arc::new(recommend), RoomParams::default());
        let nearby = AnswerSet::new().with(Answer::basic(
            "How far?",
            "Nearby",
            BasicAnswer::Distance(DistancePreference::Nearby),
        ));

        let located = shortlist_ids(dir.room_near(&code("NEAR01"), 0, Some(here)), &nearby).await;
        assert_eq!(located, vec!["near"]);

        let unlocated = shortlist_ids(dir.room_at(&code("NEAR02"), 0), &nearby).await;
        assert_eq!(unlocated, vec!["far", "near"]);
    }

    #[tokio::test]
    async fn test_same_code_shares_one_actor() {
        let dir = directory();
        let a = dir.room(&code("SHARED"));
        let b = dir.room(&code("SHARED"));
        a.send(members(&["x", "y"])).await.unwrap();
        assert_eq!(b.view().members.len(), 2);
        assert_eq!(dir.open_rooms(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_votes_converge() {
        let dir = directory();
        let room = dir.room(&code("RACE01"));
        let ids: Vec<String> = (0..8).map(|i| format!("m{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        room.send(members(&id_refs)).await.unwrap();
        room.send(RoomEvent::RecommendationsRequested).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for (i, id) in ids.iter().enumerate() {
            let handle = room.clone();
            let event = vote(id, if i % 3 == 0 { "r2" } else { "r0" });
            tasks.spawn(async move { handle.send(event).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let view = room.view();
        assert_eq!(view.phase, RoomPhase::Completed);
        assert_eq!(view.tally.total(), 8);
        assert_eq!(view.tally.get(&RestaurantId::new("r0")), 5);
        assert_eq!(view.decision.and_then(|d| d.winner().cloned()), Some(RestaurantId::new("r0")));
    }

    #[tokio::test]
    async fn test_abandon_closes_room() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dir = directory_with(false, publisher.clone());
        let room = dir.room(&code("GONE01"));
        room.send(members(&["a"])).await.unwrap();

        room.abandon();
        let view = room.wait_for_phase(RoomPhase::Abandoned).await.unwrap();
        assert_eq!(view.phase, RoomPhase::Abandoned);

        // The actor exits; further events fail
        let result = room.send(vote("a", "r0")).await;
        assert!(matches!(
            result,
            Err(RoomError::Closed(_)) | Err(RoomError::Rejected(RoomRejection::Abandoned))
        ));
        assert!(publisher.events.lock().unwrap().contains(&"abandoned"));
    }

    #[tokio::test]
    async fn test_shutdown_abandons_all_rooms() {
        let dir = directory();
        let a = dir.room(&code("ROOMA1"));
        let b = dir.room(&code("ROOMB1"));
        dir.shutdown();
        assert_eq!(a.wait_for_phase(RoomPhase::Abandoned).await.unwrap().phase, RoomPhase::Abandoned);
        assert_eq!(b.wait_for_phase(RoomPhase::Abandoned).await.unwrap().phase, RoomPhase::Abandoned);
    }

    #[tokio::test]
    async fn test_ranking_failure_can_be_retried() {
        let dir = directory_with(true, Arc::new(NoRoomPublisher));
        let room = dir.room(&code("FLAKY1"));
        room.send(members(&["a"])).await.unwrap();

        let err = room.send(RoomEvent::RecommendationsRequested).await.unwrap_err();
        assert!(matches!(err, RoomError::Recommend(_)));
        assert_eq!(room.view().phase, RoomPhase::Recommending);

        room.send(RoomEvent::RecommendationsRequested).await.unwrap();
        assert_eq!(room.view().phase, RoomPhase::Voting);
    }

    #[tokio::test]
    async fn test_no_result_exposed() {
        let dir = directory();
        let room = dir.room(&code("EMPTY1"));
        room.send(members(&["a", "b"])).await.unwrap();
        room.send(RoomEvent::RecommendationsRequested).await.unwrap();
        room.send(RoomEvent::FinalizeRequested { choice: None }).await.unwrap();

        let view = room.view();
        assert_eq!(view.phase, RoomPhase::Completed);
        assert_eq!(view.decision, Some(Decision::NoResult));
    }
}
