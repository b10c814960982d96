#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::Utc;
use deeplink_service::api::routes::deeplink_routes;
use deeplink_service::application::services::{
    ConversionService, ResolveService, ResolverSettings,
};
use deeplink_service::domain::entities::{
    ClickEvent, Conversion, Deeplink, NewConversion, Variant,
};
use deeplink_service::domain::repositories::{AnalyticsRepository, DeeplinkRepository};
use deeplink_service::error::AppError;
use deeplink_service::infrastructure::cache::MemoryCache;
use deeplink_service::infrastructure::geo::NullGeoLookup;
use deeplink_service::state::AppState;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// Destination store stand-in. Applies the same eligibility rule as the
/// SQL query and counts lookups so tests can see cache hits.
#[derive(Default)]
pub struct InMemoryDeeplinks {
    links: Mutex<HashMap<String, Deeplink>>,
    variants: Mutex<HashMap<String, Vec<Variant>>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryDeeplinks {
    pub fn insert(&self, link: Deeplink) {
        self.links
            .lock()
            .unwrap()
            .insert(link.short_code.clone(), link);
    }

    pub fn add_variant(&self, variant: Variant) {
        self.variants
            .lock()
            .unwrap()
            .entry(variant.deeplink_id.clone())
            .or_default()
            .push(variant);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::unavailable("Database unavailable", json!({})))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeeplinkRepository for InMemoryDeeplinks {
    async fn find_active_by_code(&self, short_code: &str) -> Result<Option<Deeplink>, AppError> {
        self.check_available()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now();
        Ok(self
            .links
            .lock()
            .unwrap()
            .get(short_code)
            .filter(|link| link.is_eligible_at(now))
            .cloned())
    }

    async fn find_variants(&self, deeplink_id: &str) -> Result<Vec<Variant>, AppError> {
        self.check_available()?;
        Ok(self
            .variants
            .lock()
            .unwrap()
            .get(deeplink_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

/// Append-only analytics tables stand-in.
#[derive(Default)]
pub struct InMemoryAnalytics {
    clicks: Mutex<Vec<ClickEvent>>,
    conversions: Mutex<Vec<Conversion>>,
    unavailable: AtomicBool,
}

impl InMemoryAnalytics {
    pub fn clicks(&self) -> Vec<ClickEvent> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn conversions(&self) -> Vec<Conversion> {
        self.conversions.lock().unwrap().clone()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Waits for the background recorder to write `count` clicks.
    pub async fn wait_for_clicks(&self, count: usize) -> Vec<ClickEvent> {
        for _ in 0..100 {
            let clicks = self.clicks();
            if clicks.len() >= count {
                return clicks;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} clicks, got {}", count, self.clicks().len());
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalytics {
    async fn record_click(&self, event: ClickEvent) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Database unavailable", json!({})));
        }
        self.clicks.lock().unwrap().push(event);
        Ok(())
    }

    async fn record_conversion(&self, conversion: NewConversion) -> Result<Conversion, AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Database unavailable", json!({})));
        }

        let mut conversions = self.conversions.lock().unwrap();
        let stored = Conversion {
            id: conversions.len() as i64 + 1,
            user_id: conversion.user_id,
            deeplink_id: conversion.deeplink_id,
            campaign_id: conversion.campaign_id,
            event_type: conversion.event_type,
            amount: conversion.amount,
            created_at: Utc::now(),
        };
        conversions.push(stored.clone());
        Ok(stored)
    }
}

/// Supplies `ConnectInfo` the way `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// A running router plus handles on its fakes.
pub struct TestApp {
    pub server: TestServer,
    pub deeplinks: Arc<InMemoryDeeplinks>,
    pub analytics: Arc<InMemoryAnalytics>,
    pub cache: Arc<MemoryCache>,
}

pub struct TestAppBuilder {
    settings: ResolverSettings,
    behind_proxy: bool,
    peer: SocketAddr,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            settings: ResolverSettings::default(),
            behind_proxy: false,
            peer: PEER_ADDR.parse().unwrap(),
        }
    }
}

impl TestAppBuilder {
    pub fn settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn behind_proxy(mut self) -> Self {
        self.behind_proxy = true;
        self
    }

    /// State wired to fresh fakes, for tests that drive the full router.
    pub fn build_state(
        self,
    ) -> (
        AppState,
        Arc<InMemoryDeeplinks>,
        Arc<InMemoryAnalytics>,
        Arc<MemoryCache>,
    ) {
        let deeplinks = Arc::new(InMemoryDeeplinks::default());
        let analytics = Arc::new(InMemoryAnalytics::default());
        let cache = Arc::new(MemoryCache::new());

        let resolve_service = Arc::new(ResolveService::new(
            cache.clone(),
            deeplinks.clone(),
            analytics.clone(),
            Arc::new(NullGeoLookup),
            self.settings,
        ));
        let conversion_service = Arc::new(ConversionService::new(analytics.clone()));

        let state = AppState::new(
            resolve_service,
            conversion_service,
            deeplinks.clone(),
            cache.clone(),
            self.behind_proxy,
        );

        (state, deeplinks, analytics, cache)
    }

    pub fn build(self) -> TestApp {
        let peer = self.peer;
        let (state, deeplinks, analytics, cache) = self.build_state();

        let app = Router::new()
            .nest("/deeplink", deeplink_routes())
            .layer(MockConnectInfoLayer(peer))
            .with_state(state);

        TestApp {
            server: TestServer::new(app).unwrap(),
            deeplinks,
            analytics,
            cache,
        }
    }
}

pub fn test_app() -> TestApp {
    TestAppBuilder::default().build()
}
