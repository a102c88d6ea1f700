//! Process-wide collaborators, built once and shared by every service.
//!
//! A [`MoodlensContext`] owns the generator, classifier, moderator, event
//! sink and analysis cache. Services are cheap views over it, so callers
//! build one context at startup, hand out services from it, and call
//! [`MoodlensContext::shutdown`] when done.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::analysis::{AnalysisCache, EmotionAnalyzer, InMemoryAnalysisCache};
use crate::classify::ClassifierService;
use crate::config::MoodlensConfig;
use crate::errors::Result;
use crate::events::{names, EventSink, NoOpEventSink};
use crate::moderation::ModerationService;
use crate::providers::{
    Classifier, Generator, Moderator, UnavailableClassifier, UnavailableGenerator,
    UnavailableModerator,
};
use crate::rewrite::Rewriter;

/// Shared collaborators and configuration.
#[derive(Clone)]
pub struct MoodlensContext {
    generator: Arc<dyn Generator>,
    classifier: Arc<dyn Classifier>,
    moderator: Arc<dyn Moderator>,
    events: Arc<dyn EventSink>,
    cache: Arc<dyn AnalysisCache>,
    config: MoodlensConfig,
}

impl std::fmt::Debug for MoodlensContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodlensContext")
            .field("config", &self.config)
            .field("cached_analyses", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl MoodlensContext {
    /// Starts building a context.
    #[must_use]
    pub fn builder() -> MoodlensContextBuilder {
        MoodlensContextBuilder::default()
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> &MoodlensConfig {
        &self.config
    }

    /// The shared event sink.
    #[must_use]
    pub fn event_sink(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    /// A rewriter over the shared generator.
    #[must_use]
    pub fn rewriter(&self) -> Rewriter {
        Rewriter::new(self.generator.clone())
            .with_event_sink(self.events.clone())
            .with_config(self.config.rewrite.clone())
    }

    /// A classification service over the shared classifier.
    #[must_use]
    pub fn classifier_service(&self) -> ClassifierService {
        ClassifierService::new(self.classifier.clone()).with_event_sink(self.events.clone())
    }

    /// A moderation service over the shared moderator.
    #[must_use]
    pub fn moderation_service(&self) -> ModerationService {
        ModerationService::new(self.moderator.clone()).with_event_sink(self.events.clone())
    }

    /// An emotion analyzer over the shared generator and cache.
    #[must_use]
    pub fn emotion_analyzer(&self) -> EmotionAnalyzer {
        EmotionAnalyzer::new(self.generator.clone(), self.cache.clone())
            .with_event_sink(self.events.clone())
    }

    /// Releases cached state. Services handed out earlier keep working but
    /// start from an empty analysis cache.
    pub async fn shutdown(&self) {
        let cleared = self.cache.len();
        self.cache.clear();
        info!(cleared, "Context shut down");
        self.events
            .emit(names::CONTEXT_SHUTDOWN, Some(json!({ "cleared_analyses": cleared })))
            .await;
    }
}

/// Builder for [`MoodlensContext`]. Unset collaborators are filled with
/// placeholders that fail every call.
#[derive(Default)]
pub struct MoodlensContextBuilder {
    generator: Option<Arc<dyn Generator>>,
    classifier: Option<Arc<dyn Classifier>>,
    moderator: Option<Arc<dyn Moderator>>,
    events: Option<Arc<dyn EventSink>>,
    cache: Option<Arc<dyn AnalysisCache>>,
    config: MoodlensConfig,
}

impl std::fmt::Debug for MoodlensContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodlensContextBuilder")
            .field("has_generator", &self.generator.is_some())
            .field("has_classifier", &self.classifier.is_some())
            .field("has_moderator", &self.moderator.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MoodlensContextBuilder {
    /// Sets the text generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Sets the emotion classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Sets the content moderator.
    #[must_use]
    pub fn with_moderator(mut self, moderator: Arc<dyn Moderator>) -> Self {
        self.moderator = Some(moderator);
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Sets the analysis cache. Defaults to an in-memory cache using the
    /// configured TTL.
    #[must_use]
    pub fn with_analysis_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: MoodlensConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and builds the context.
    pub fn build(self) -> Result<MoodlensContext> {
        self.config.validate()?;

        let cache = self.cache.unwrap_or_else(|| {
            Arc::new(InMemoryAnalysisCache::new(self.config.analysis.cache_ttl()))
        });
        Ok(MoodlensContext {
            generator: self.generator.unwrap_or_else(|| Arc::new(UnavailableGenerator)),
            classifier: self.classifier.unwrap_or_else(|| Arc::new(UnavailableClassifier)),
            moderator: self.moderator.unwrap_or_else(|| Arc::new(UnavailableModerator)),
            events: self.events.unwrap_or_else(|| Arc::new(NoOpEventSink)),
            cache,
            config: self.config,
        })
    }
}
