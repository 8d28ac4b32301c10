use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::api::FetchError;
use crate::carousel::Carousel;
use crate::config::Config;
use crate::host::Host;
use crate::markup::UNAVAILABLE_MESSAGE;
use crate::scheduler::RefreshTimer;
use crate::types::{CoinRecord, Cursor, DisplayMode, ScrollBehavior, ScrollDirection};
use crate::view::{build_cards, compute_visible_set};

pub type FetchResult = Result<Vec<CoinRecord>, FetchError>;

/// One carousel instance: the coin cache, the active mode, the refresh
/// schedule and the gesture state, all driving a single [`Host`].
pub struct Widget<H: Host> {
    host: H,
    cache: Vec<CoinRecord>,
    mode: DisplayMode,
    visible: Vec<CoinRecord>,
    carousel: Carousel,
    timer: RefreshTimer,
    refresh_interval: Duration,
    visible_count: usize,
    affiliate_base: String,
    last_refresh: Option<DateTime<Local>>,
    render_count: usize,
}

impl<H: Host> Widget<H> {
    pub fn new(host: H, config: &Config) -> Self {
        Self {
            host,
            cache: Vec::new(),
            mode: DisplayMode::default(),
            visible: Vec::new(),
            carousel: Carousel::new(config.scroll_step),
            timer: RefreshTimer::new(),
            refresh_interval: config.refresh_interval(),
            visible_count: config.visible_count,
            affiliate_base: config.affiliate_base.clone(),
            last_refresh: None,
            render_count: 0,
        }
    }

    /// Mode to start in. Only meaningful before [`Widget::init`].
    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Brings the mount points in line with the widget state.
    pub fn mount(&mut self) {
        self.sync_tabs();
        self.host.set_cursor(Cursor::Grab);
        self.host.set_scroll_snap(true);
    }

    /// Mounts and (re)arms the refresh schedule. Calling it again cancels the
    /// earlier schedule first.
    pub fn init<F, Fut>(&mut self, refresh: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.mount();
        self.timer.arm(self.refresh_interval, refresh);
        info!(
            mode = self.mode.label(),
            interval_secs = self.refresh_interval.as_secs(),
            "widget initialised"
        );
    }

    pub fn shutdown(&mut self) {
        self.timer.cancel();
    }

    /// Completion handler for one refresh cycle. Success replaces the cache
    /// and re-renders; failure keeps the cache and only surfaces a message
    /// when there is nothing to show.
    pub fn apply_fetch(&mut self, result: FetchResult) {
        match result {
            Ok(coins) => {
                info!(count = coins.len(), "market data refreshed");
                self.cache = coins;
                self.last_refresh = Some(Local::now());
                if self.cache.is_empty() {
                    self.visible.clear();
                    self.host.show_unavailable(UNAVAILABLE_MESSAGE);
                } else {
                    self.render_by_mode();
                }
            }
            Err(e) => {
                error!(error = %e, cached = self.cache.len(), "market refresh failed");
                if self.cache.is_empty() {
                    self.host.show_unavailable(UNAVAILABLE_MESSAGE);
                }
            }
        }
    }

    fn render_by_mode(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        self.visible = compute_visible_set(&self.cache, self.mode, self.visible_count);
        let cards = build_cards(&self.visible, &self.affiliate_base);
        self.host.render_cards(&cards);
        self.render_count += 1;
    }

    fn sync_tabs(&mut self) {
        for mode in DisplayMode::ALL {
            self.host.set_tab_active(mode, mode == self.mode);
        }
    }

    /// Switches the display mode. Returns false, touching nothing, when the
    /// mode is already active.
    pub fn set_mode(&mut self, mode: DisplayMode) -> bool {
        if mode == self.mode {
            return false;
        }
        debug!(from = self.mode.label(), to = mode.label(), "switching mode");
        self.mode = mode;
        self.sync_tabs();
        self.carousel.reset();
        self.render_by_mode();
        self.host.scroll_to(0.0);
        true
    }

    pub fn scroll_arrow(&mut self, direction: ScrollDirection) {
        let delta = self.carousel.button_delta(direction);
        self.host.scroll_by(delta, ScrollBehavior::Smooth);
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.carousel.pointer_down(x, self.host.scroll_offset());
        self.host.set_cursor(Cursor::Grabbing);
        self.host.set_scroll_snap(false);
    }

    /// Returns whether the move scrolled the track.
    pub fn pointer_move(&mut self, x: f64) -> bool {
        match self.carousel.pointer_move(x) {
            Some(offset) => {
                self.host.scroll_to(offset);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    pub fn pointer_leave(&mut self) {
        self.end_drag();
    }

    fn end_drag(&mut self) {
        self.carousel.pointer_release();
        self.host.set_cursor(Cursor::Grab);
        self.host.set_scroll_snap(true);
    }

    /// Scroll event from the host. Returns true when the host should run
    /// [`Widget::on_animation_frame`] on its next frame.
    pub fn on_scroll(&mut self) -> bool {
        self.carousel.on_scroll()
    }

    pub fn on_animation_frame(&mut self) {
        let offset = self.host.scroll_offset();
        let max = self.host.max_scroll_offset();
        if let Some(dot) = self.carousel.on_animation_frame(offset, max) {
            self.host.set_active_dot(dot);
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn cache(&self) -> &[CoinRecord] {
        &self.cache
    }

    pub fn visible(&self) -> &[CoinRecord] {
        &self.visible
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    pub fn is_dragging(&self) -> bool {
        self.carousel.is_dragging()
    }

    pub fn is_refresh_armed(&self) -> bool {
        self.timer.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::parse_markets;
    use crate::config::DEFAULT_AFFILIATE_BASE;
    use crate::host::MemoryHost;
    use serde_json::json;

    fn listing(n: usize) -> Vec<CoinRecord> {
        let coins: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "id": format!("coin-{}", i),
                    "symbol": format!("c{}", i),
                    "name": format!("Coin {}", i),
                    "image": format!("https://assets.example/{}.png", i),
                    "current_price": if i % 3 == 0 { 0.00042 * (i + 1) as f64 } else { 12.5 * i as f64 },
                    "market_cap": ((i * 37) % 30) as f64 * 1.0e9 + 1.0,
                    "price_change_percentage_24h": if i % 4 == 0 { serde_json::Value::Null } else { json!(i as f64 - 15.0) },
                    "sparkline_in_7d": { "price": [1.0, 1.5, 1.2, 1.8] }
                })
            })
            .collect();
        parse_markets(&serde_json::to_string(&coins).unwrap()).unwrap()
    }

    fn widget() -> Widget<MemoryHost> {
        Widget::new(MemoryHost::new(1000.0, 316.0), &Config::default())
    }

    fn offline() -> FetchError {
        parse_markets("<html>offline</html>").unwrap_err()
    }

    /// A real transport failure: nothing listens on port 0.
    async fn unreachable() -> FetchError {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:0/coins/markets")
            .send()
            .await
            .unwrap_err();
        FetchError::from(err)
    }

    fn rate_limited() -> FetchError {
        FetchError::Status {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: r#"{"status":{"error_code":429}}"#.into(),
        }
    }

    #[test]
    fn trending_renders_ten_cards_by_market_cap() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));

        assert_eq!(w.cache().len(), 30);
        assert_eq!(w.visible().len(), 10);
        assert_eq!(w.host().card_count, 10);
        assert!(w.visible().windows(2).all(|p| p[0].market_cap >= p[1].market_cap));

        let track = &w.host().track;
        assert_eq!(track.matches(r#"<div class="icaw-card">"#).count(), 10);
        assert_eq!(track.matches("% 24H</span>").count(), 10);
        assert!(!track.contains(r#"<span class="icaw-price">$ "#));
        for card in build_cards(w.visible(), DEFAULT_AFFILIATE_BASE) {
            assert!(!card.price.is_empty(), "{} has no price", card.symbol);
        }

        // Cards appear in visible-set order.
        let mut last = 0;
        for coin in w.visible() {
            let at = track.find(&format!(">{}</span>", coin.name)).unwrap();
            assert!(at >= last);
            last = at;
        }
    }

    #[test]
    fn failed_first_fetch_shows_placeholder() {
        let mut w = widget();
        w.apply_fetch(Err(offline()));
        assert!(w.cache().is_empty());
        assert!(w.host().track.contains(UNAVAILABLE_MESSAGE));
        assert_eq!(w.render_count(), 0);
        assert!(w.last_refresh().is_none());
    }

    #[tokio::test]
    async fn network_failure_on_empty_cache_shows_placeholder() {
        let mut w = widget();
        let err = unreachable().await;
        assert!(matches!(err, FetchError::Network(_)));
        w.apply_fetch(Err(err));
        assert!(w.cache().is_empty());
        assert_eq!(w.host().card_count, 0);
        assert!(w.host().track.contains(UNAVAILABLE_MESSAGE));
    }

    #[test]
    fn http_error_status_is_handled_like_any_failure() {
        let mut w = widget();
        w.apply_fetch(Err(rate_limited()));
        assert!(w.host().track.contains(UNAVAILABLE_MESSAGE));

        w.apply_fetch(Ok(listing(30)));
        let before = w.host().track.clone();
        w.apply_fetch(Err(rate_limited()));
        assert_eq!(w.host().track, before);
        assert_eq!(w.cache().len(), 30);
    }

    #[test]
    fn empty_listing_replaces_stale_cards_with_placeholder() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.apply_fetch(Ok(Vec::new()));

        assert!(w.cache().is_empty());
        assert!(w.visible().is_empty());
        assert_eq!(w.host().card_count, 0);
        assert!(w.host().track.contains(UNAVAILABLE_MESSAGE));
        assert!(!w.host().track.contains("icaw-card"));
        assert_eq!(w.render_count(), 1);
        assert!(w.last_refresh().is_some());
    }

    #[test]
    fn failed_refresh_keeps_stale_cards() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        let before = w.host().track.clone();

        w.apply_fetch(Err(offline()));
        assert_eq!(w.cache().len(), 30);
        assert_eq!(w.host().track, before);
        assert!(!w.host().track.contains(UNAVAILABLE_MESSAGE));
    }

    #[test]
    fn new_fetch_replaces_cache() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.apply_fetch(Ok(listing(4)));
        assert_eq!(w.cache().len(), 4);
        assert_eq!(w.host().card_count, 4);
        assert_eq!(w.render_count(), 2);
    }

    #[test]
    fn set_mode_is_idempotent() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.host_mut().scroll_to(500.0);

        assert!(!w.set_mode(DisplayMode::Trending));
        assert_eq!(w.render_count(), 1);
        assert_eq!(w.host().scroll_offset(), 500.0);

        assert!(w.set_mode(DisplayMode::Movers));
        assert_eq!(w.render_count(), 2);
        assert_eq!(w.host().scroll_offset(), 0.0);

        w.host_mut().scroll_to(300.0);
        assert!(!w.set_mode(DisplayMode::Movers));
        assert_eq!(w.render_count(), 2);
        assert_eq!(w.host().scroll_offset(), 300.0);
    }

    #[test]
    fn movers_mode_reorders_by_change_and_flips_tabs() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.set_mode(DisplayMode::Movers);

        assert!(w.host().tab_active(DisplayMode::Movers));
        assert!(!w.host().tab_active(DisplayMode::Trending));
        assert!(w.visible().windows(2).all(|p| p[0].change_24h() >= p[1].change_24h()));
        assert_eq!(w.visible()[0].id, "coin-29");
    }

    #[test]
    fn mode_switch_before_data_renders_nothing() {
        let mut w = widget();
        assert!(w.set_mode(DisplayMode::Movers));
        assert_eq!(w.render_count(), 0);
        assert_eq!(w.host().card_count, 0);
    }

    #[test]
    fn drag_scrolls_and_toggles_affordances() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.host_mut().scroll_to(400.0);

        w.pointer_down(200.0);
        assert!(w.is_dragging());
        assert_eq!(w.host().cursor, Cursor::Grabbing);
        assert!(!w.host().snap);

        assert!(w.pointer_move(150.0));
        assert_eq!(w.host().scroll_offset(), 500.0);

        w.pointer_leave();
        assert!(!w.is_dragging());
        assert_eq!(w.host().cursor, Cursor::Grab);
        assert!(w.host().snap);
        assert!(!w.pointer_move(0.0));
        assert_eq!(w.host().scroll_offset(), 500.0);
    }

    #[test]
    fn arrows_scroll_smoothly_by_step() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        w.scroll_arrow(ScrollDirection::Right);
        w.scroll_arrow(ScrollDirection::Right);
        w.scroll_arrow(ScrollDirection::Left);
        assert_eq!(w.host().scroll_offset(), 350.0);
        assert_eq!(w.host().smooth_scrolls, 3);
    }

    #[test]
    fn dots_follow_scroll_once_per_frame() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(30)));
        // 10 cards * 316 - 1000 = 2160 scrollable units.
        let max = w.host().max_scroll_offset();
        assert_eq!(max, 2160.0);

        w.host_mut().scroll_to(max * 0.3);
        assert!(w.on_scroll());
        w.host_mut().scroll_to(max * 0.7);
        assert!(!w.on_scroll());
        w.on_animation_frame();
        assert_eq!(w.host().active_dot, Some(2));

        w.host_mut().scroll_to(0.0);
        w.on_animation_frame();
        assert_eq!(w.host().active_dot, Some(2));
        w.on_scroll();
        w.on_animation_frame();
        assert_eq!(w.host().active_dot, Some(0));
    }

    #[test]
    fn dots_untouched_without_overflow() {
        let mut w = widget();
        w.apply_fetch(Ok(listing(2)));
        w.host_mut().active_dot = Some(1);
        w.on_scroll();
        w.on_animation_frame();
        assert_eq!(w.host().active_dot, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn init_rearms_refresh() {
        let mut w = widget().with_mode(DisplayMode::Movers);
        w.init(|| std::future::ready(()));
        assert!(w.host().tab_active(DisplayMode::Movers));
        assert!(!w.host().tab_active(DisplayMode::Trending));
        w.init(|| std::future::ready(()));
        assert!(w.is_refresh_armed());
        w.shutdown();
        assert!(!w.is_refresh_armed());
    }
}
