//! Recommend use case
//!
//! Merges one or more members' answers, ranks the catalog against the merged
//! set and splits the result into a shortlist. A single member goes through
//! the same path with no group counts and no shuffle.

use crate::config::RecommendParams;
use crate::ports::restaurant_catalog::{CatalogError, RestaurantCatalog};
use crate::ports::tag_mapping_store::TagMappingStore;
use serde::Serialize;
use std::sync::Arc;
use tablepick_domain::{
    AnswerSet, GeoPoint, MatchScorer, MergedAnswers, RecommendationRanker, RoomCode,
    ScoringContext, Shortlist,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Input for the Recommend use case
#[derive(Debug, Clone, Default)]
pub struct RecommendInput {
    /// Answer sets in first-seen member order
    pub members: Vec<AnswerSet>,
    pub user_location: Option<GeoPoint>,
    /// Seeds the shortlist shuffle when set
    pub room: Option<RoomCode>,
}

impl RecommendInput {
    pub fn solo(answers: AnswerSet) -> Self {
        Self {
            members: vec![answers],
            ..Default::default()
        }
    }

    pub fn group(members: Vec<AnswerSet>) -> Self {
        Self {
            members,
            ..Default::default()
        }
    }

    pub fn with_room(mut self, room: RoomCode) -> Self {
        self.room = Some(room);
        self
    }

    pub fn with_user_location(mut self, location: GeoPoint) -> Self {
        self.user_location = Some(location);
        self
    }
}

/// Ranked, split recommendations
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendations {
    pub merged: MergedAnswers,
    pub shortlist: Shortlist,
    pub catalog_size: usize,
    /// Every restaurant fell under the threshold and the raw top list was used
    pub fell_back: bool,
}

impl Recommendations {
    /// Only an empty catalog yields no recommendations
    pub fn is_empty(&self) -> bool {
        self.shortlist.is_empty()
    }
}

/// Use case for ranking the catalog against members' answers
pub struct RecommendUseCase<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> {
    catalog: Arc<R>,
    tags: Arc<T>,
    params: RecommendParams,
}

impl<R: RestaurantCatalog + 'static, T: TagMappingStore + 'static> RecommendUseCase<R, T> {
    pub fn new(catalog: Arc<R>, tags: Arc<T>, params: RecommendParams) -> Self {
        Self {
            catalog,
            tags,
            params,
        }
    }

    pub fn params(&self) -> &RecommendParams {
        &self.params
    }

    pub async fn execute(&self, input: RecommendInput) -> Result<Recommendations, RecommendError> {
        let merged = self.params.aggregator().merge(&input.members);
        let group = input.members.len() > 1;
        info!(
            "Recommending for {} member(s), {} merged answers",
            input.members.len(),
            merged.answers.len()
        );

        let seed = if group { input.room.as_ref() } else { None };
        let (shortlist, catalog_size, fell_back) = self
            .rank_merged(&merged, group, input.user_location, seed)
            .await?;
        Ok(Recommendations {
            merged,
            shortlist,
            catalog_size,
            fell_back,
        })
    }

    /// Rank the catalog against already merged answers
    ///
    /// Returns the shortlist, the catalog size, and whether the fallback list
    /// was used. Group counts enable the consensus bonus; `room` enables the
    /// seeded shuffle when configured.
    pub async fn rank_merged(
        &self,
        merged: &MergedAnswers,
        group: bool,
        user_location: Option<GeoPoint>,
        room: Option<&RoomCode>,
    ) -> Result<(Shortlist, usize, bool), RecommendError> {
        let catalog = self.catalog.restaurants().await?;
        let tags = self.tags.mapping().await?;

        if catalog.is_empty() {
            warn!("Restaurant catalog is empty; no recommendations");
            return Ok((Shortlist::default(), 0, false));
        }

        let mut ctx = ScoringContext {
            strict_basic_match: self.params.strict_basic_match,
            distance: self.params.distance,
            ..Default::default()
        };
        if group {
            ctx = ctx.with_group(&merged.selection);
        }
        if let Some(location) = user_location {
            ctx = ctx.with_user_location(location);
        }

        let scorer = MatchScorer::new(&self.params.weights, &tags);
        let ranker = RecommendationRanker::new(scorer, self.params.rank);
        let ranking = ranker.rank(&catalog, &merged.answers, &ctx);
        if ranking.fell_back {
            debug!(
                "No restaurant reached threshold {:.2}; using top {}",
                ranker.threshold(),
                ranking.len()
            );
        }

        let mut shortlist = Shortlist::split(
            &ranking.ranked,
            self.params.shortlist_size,
            self.params.alternates_size,
        );
        if let Some(room) = room.filter(|_| self.params.shuffle_shortlist) {
            shortlist = shortlist.shuffled_for(room.seed());
        }

        info!(
            "Ranked {} restaurants: {} picks, {} alternates",
            catalog.len(),
            shortlist.picks.len(),
            shortlist.alternates.len()
        );
        Ok((shortlist, catalog.len(), ranking.fell_back))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tag_mapping_store::StaticTagMappings;
    use async_trait::async_trait;
    use tablepick_domain::questionnaire::{Answer, BasicAnswer, SpiceChoice};
    use tablepick_domain::restaurant::{Restaurant, Spiciness};
    use tablepick_domain::scoring::WeightedTag;
    use tablepick_domain::TagMapping;

    struct FixedCatalog(Vec<Restaurant>);

    #[async_trait]
    impl RestaurantCatalog for FixedCatalog {
        async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl RestaurantCatalog for BrokenCatalog {
        async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
            Err(CatalogError::NotFound("restaurants.json".to_string()))
        }
    }

    fn spicy(label: &str, choice: SpiceChoice) -> AnswerSet {
        AnswerSet::new().with(Answer::basic("Spicy?", label, BasicAnswer::Spice(choice)))
    }

    fn catalog(n: usize) -> Vec<Restaurant> {
        (0..n)
            .map(|i| {
                let spice = if i % 2 == 0 { Spiciness::Yes } else { Spiciness::No };
                Restaurant::new(format!("r{}", i), format!("R{}", i)).with_spiciness(spice)
            })
            .collect()
    }

    fn use_case(restaurants: Vec<Restaurant>) -> RecommendUseCase<FixedCatalog, StaticTagMappings> {
        RecommendUseCase::new(
            Arc::new(FixedCatalog(restaurants)),
            Arc::new(StaticTagMappings::default()),
            RecommendParams::default(),
        )
    }

    #[tokio::test]
    async fn test_solo_recommendation() {
        let result = use_case(catalog(30))
            .execute(RecommendInput::solo(spicy("Yes", SpiceChoice::Spicy)))
            .await
            .unwrap();

        assert!(!result.fell_back);
        assert_eq!(result.catalog_size, 30);
        assert_eq!(result.shortlist.picks.len(), 10);
        assert_eq!(result.shortlist.alternates.len(), 5);
        // Solo mode keeps ranked order
        assert_eq!(result.shortlist.picks[0].restaurant.id.as_str(), "r0");
        assert!(result
            .shortlist
            .iter()
            .all(|s| s.restaurant.spiciness == Some(Spiciness::Yes)));
    }

    #[tokio::test]
    async fn test_fallback_when_all_filtered() {
        let restaurants: Vec<Restaurant> = (0..50)
            .map(|i| Restaurant::new(format!("r{}", i), "mild").with_spiciness(Spiciness::No))
            .collect();
        let result = use_case(restaurants)
            .execute(RecommendInput::solo(spicy("Yes", SpiceChoice::Spicy)))
            .await
            .unwrap();

        assert!(result.fell_back);
        assert_eq!(result.shortlist.picks.len(), 10);
        assert!(result.shortlist.alternates.is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_is_not_an_error() {
        let result = use_case(Vec::new())
            .execute(RecommendInput::solo(AnswerSet::new()))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_group_majority_and_seeded_shuffle() {
        let members = vec![
            spicy("Yes", SpiceChoice::Spicy),
            spicy("No", SpiceChoice::Mild),
            spicy("Yes", SpiceChoice::Spicy),
        ];
        let room = RoomCode::new("ABCDEF").unwrap();
        let uc = use_case(catalog(30));

        let a = uc
            .execute(RecommendInput::group(members.clone()).with_room(room.clone()))
            .await
            .unwrap();
        let b = uc
            .execute(RecommendInput::group(members).with_room(room))
            .await
            .unwrap();

        assert_eq!(a.merged.answers.answers()[0].label, "Yes");
        assert_eq!(a.shortlist, b.shortlist);
        let ids: Vec<_> = a.shortlist.picks.iter().map(|s| s.restaurant.id.as_str()).collect();
        // Even-numbered (spicy) restaurants r0..r18, shuffled with the room seed
        assert_eq!(
            ids,
            vec!["r2", "r8", "r12", "r16", "r18", "r0", "r14", "r10", "r4", "r6"]
        );
    }

    #[tokio::test]
    async fn test_fun_answers_use_tag_mapping() {
        let restaurants = vec![
            Restaurant::new("plain", "Plain"),
            Restaurant::new("cozy", "Cozy Cafe").with_tags(["warm"]),
        ];
        let tags = TagMapping::new().with("Cozy", [WeightedTag::new("warm", 1.0)]);
        let uc = RecommendUseCase::new(
            Arc::new(FixedCatalog(restaurants)),
            Arc::new(StaticTagMappings::new(tags)),
            RecommendParams::default(),
        );
        let answers = AnswerSet::new().with(Answer::fun("Mood?", "Cozy"));

        let result = uc.execute(RecommendInput::solo(answers)).await.unwrap();
        assert_eq!(result.shortlist.picks[0].restaurant.id.as_str(), "cozy");
    }

    #[tokio::test]
    async fn test_catalog_error_propagates() {
        let uc = RecommendUseCase::new(
            Arc::new(BrokenCatalog),
            Arc::new(StaticTagMappings::default()),
            RecommendParams::default(),
        );
        let result = uc.execute(RecommendInput::solo(AnswerSet::new())).await;
        assert!(matches!(result, Err(RecommendError::Catalog(CatalogError::NotFound(_)))));
    }
}
