//! A tank icon that re-renders when its inputs change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::TankResult;
use media::Canvas;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::renderer::{RenderOutcome, RenderRequest, RenderState, TankRenderer};

/// Result of feeding new inputs to a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewUpdate {
    /// The surface now shows these inputs.
    Rendered(RenderOutcome),
    /// The inputs match the last ones; nothing was rendered.
    Unchanged,
    /// Newer inputs arrived while rendering; the result was discarded.
    Superseded,
}

/// Owns a surface and keeps it in sync with the latest inputs.
///
/// Every render draws off-screen and is committed only if no newer render
/// was started in the meantime, so a slow render for stale inputs can never
/// overwrite a newer result.
pub struct TankView {
    renderer: Arc<TankRenderer>,
    props: RwLock<Option<RenderRequest>>,
    state: RwLock<RenderState>,
    generation: AtomicU64,
    surface: Mutex<Canvas>,
    outcome: RwLock<Option<RenderOutcome>>,
}

impl TankView {
    pub fn new(renderer: Arc<TankRenderer>) -> Self {
        Self {
            renderer,
            props: RwLock::new(None),
            state: RwLock::new(RenderState::Idle),
            generation: AtomicU64::new(0),
            surface: Mutex::new(Canvas::new(0, 0)),
            outcome: RwLock::new(None),
        }
    }

    /// Apply new inputs, rendering only when they differ from the inputs
    /// of the last committed render.
    pub async fn set_props(&self, props: RenderRequest) -> TankResult<ViewUpdate> {
        if self.props.read().as_ref() == Some(&props) {
            return Ok(ViewUpdate::Unchanged);
        }

        self.render(props).await
    }

    /// Render the current inputs again.
    pub async fn refresh(&self) -> TankResult<ViewUpdate> {
        let props = self.props.read().clone();
        match props {
            Some(props) => self.render(props).await,
            None => Ok(ViewUpdate::Unchanged),
        }
    }

    async fn render(&self, props: RenderRequest) -> TankResult<ViewUpdate> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(generation, RenderState::Fetching);

        let (custom, source) = self.renderer.resolve(&props.player_id).await;
        if self.is_superseded(generation) {
            debug!(player = %props.player_id, generation, "superseded after lookup");
            return Ok(ViewUpdate::Superseded);
        }
        self.transition(generation, RenderState::Drawing(source));

        let mut canvas = Canvas::new(0, 0);
        let stats = match self
            .renderer
            .draw(&custom, props.size, props.outline, &mut canvas)
            .await
        {
            Ok(stats) => stats,
            Err(err) => {
                warn!(player = %props.player_id, generation, %err, "render failed");
                self.transition(generation, RenderState::Failed);
                return Err(err);
            }
        };

        let mut surface = self.surface.lock();
        if self.is_superseded(generation) {
            debug!(player = %props.player_id, generation, "superseded while drawing");
            return Ok(ViewUpdate::Superseded);
        }
        *surface = canvas;
        *self.props.write() = Some(props.clone());

        let outcome = RenderOutcome::new(custom, source, &props, stats);
        *self.outcome.write() = Some(outcome.clone());
        *self.state.write() = RenderState::Done;
        debug!(player = %props.player_id, generation, "committed");

        Ok(ViewUpdate::Rendered(outcome))
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn transition(&self, generation: u64, state: RenderState) {
        if !self.is_superseded(generation) {
            *self.state.write() = state;
        }
    }

    pub fn state(&self) -> RenderState {
        *self.state.read()
    }

    /// Inputs of the last committed render.
    pub fn props(&self) -> Option<RenderRequest> {
        self.props.read().clone()
    }

    /// Outcome of the last committed render.
    pub fn outcome(&self) -> Option<RenderOutcome> {
        self.outcome.read().clone()
    }

    /// Copy of the surface as last committed.
    pub fn snapshot(&self) -> Canvas {
        self.surface.lock().clone()
    }

    /// Run `f` against the committed surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&Canvas) -> R) -> R {
        f(&self.surface.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::PlayerSource;
    use crate::testing::{plain_details, populate, populate_with_latency, renderer};
    use common::{PlayerCustomization, RenderSize};
    use compositor::{AssetPaths, Compositor};
    use networking::{ImageLoader, MemoryAssetSource, StaticPlayerLookup};
    use std::time::Duration;

    fn players() -> Arc<StaticPlayerLookup> {
        let lookup = Arc::new(StaticPlayerLookup::new());
        lookup.insert("slow", plain_details("slow", "0xff0000"));
        lookup.insert("fast", plain_details("fast", "0x0000ff"));
        lookup
    }

    #[tokio::test]
    async fn test_mount_renders() {
        let lookup = players();
        let source = Arc::new(MemoryAssetSource::new());
        let custom = PlayerCustomization::from(&plain_details("fast", "0x0000ff"));
        populate(&source, &AssetPaths::default(), &custom, RenderSize::Small);
        let view = TankView::new(Arc::new(renderer(lookup, source, 1.0)));

        assert_eq!(view.state(), RenderState::Idle);
        let update = view.set_props(RenderRequest::new("fast", RenderSize::Small)).await.unwrap();

        let outcome = match update {
            ViewUpdate::Rendered(outcome) => outcome,
            other => panic!("expected a render, got {other:?}"),
        };
        assert_eq!(outcome.display_name, "fast");
        assert_eq!(outcome.source, PlayerSource::Found);
        assert_eq!(view.state(), RenderState::Done);
        assert_eq!(view.outcome(), Some(outcome));
        assert_eq!(view.with_surface(|s| s.size()), RenderSize::Small.canvas_size());
        assert!(!view.snapshot().is_blank());
    }

    #[tokio::test]
    async fn test_rerenders_only_on_change() {
        let lookup = players();
        let source = Arc::new(MemoryAssetSource::new());
        let view = TankView::new(Arc::new(renderer(lookup.clone(), source, 1.0)));

        let props = RenderRequest::new("fast", RenderSize::Medium);
        assert!(matches!(view.set_props(props.clone()).await, Ok(ViewUpdate::Rendered(_))));
        assert_eq!(view.set_props(props.clone()).await.unwrap(), ViewUpdate::Unchanged);
        assert_eq!(lookup.calls().len(), 1);

        assert!(matches!(
            view.set_props(props.clone().with_outline(true)).await,
            Ok(ViewUpdate::Rendered(_))
        ));
        assert!(matches!(
            view.set_props(RenderRequest::new("fast", RenderSize::Large).with_outline(true)).await,
            Ok(ViewUpdate::Rendered(_))
        ));
        assert!(matches!(
            view.set_props(RenderRequest::new("slow", RenderSize::Large).with_outline(true)).await,
            Ok(ViewUpdate::Rendered(_))
        ));
        assert_eq!(lookup.calls(), vec!["fast", "fast", "fast", "slow"]);

        assert!(matches!(view.refresh().await, Ok(ViewUpdate::Rendered(_))));
        assert_eq!(lookup.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_stale_lookup_is_superseded() {
        let lookup = players();
        lookup.set_latency("slow", Duration::from_millis(80));
        let source = Arc::new(MemoryAssetSource::new());
        let fast = PlayerCustomization::from(&plain_details("fast", "0x0000ff"));
        populate(&source, &AssetPaths::default(), &fast, RenderSize::Small);
        let renderer = Arc::new(renderer(lookup, source, 1.0));
        let view = TankView::new(renderer.clone());

        let (first, second) = tokio::join!(
            view.set_props(RenderRequest::new("slow", RenderSize::Small)),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                view.set_props(RenderRequest::new("fast", RenderSize::Small)).await
            }
        );

        assert_eq!(first.unwrap(), ViewUpdate::Superseded);
        assert!(matches!(second.unwrap(), ViewUpdate::Rendered(ref o) if o.display_name == "fast"));
        assert_eq!(view.outcome().unwrap().display_name, "fast");

        let mut expected = Canvas::new(0, 0);
        renderer.draw(&fast, RenderSize::Small, false, &mut expected).await.unwrap();
        assert_eq!(view.snapshot().data(), expected.data());
    }

    #[tokio::test]
    async fn test_stale_draw_is_superseded() {
        let lookup = players();
        let source = Arc::new(MemoryAssetSource::new());
        let slow = PlayerCustomization::from(&plain_details("slow", "0xff0000"));
        let fast = PlayerCustomization::from(&plain_details("fast", "0x0000ff"));
        populate_with_latency(&source, &slow, RenderSize::Large, Duration::from_millis(80));
        populate(&source, &AssetPaths::default(), &fast, RenderSize::Small);
        let view = TankView::new(Arc::new(renderer(lookup, source, 1.0)));

        let (first, second) = tokio::join!(
            view.set_props(RenderRequest::new("slow", RenderSize::Large)),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                view.set_props(RenderRequest::new("fast", RenderSize::Small)).await
            }
        );

        assert_eq!(first.unwrap(), ViewUpdate::Superseded);
        assert!(matches!(second.unwrap(), ViewUpdate::Rendered(_)));
        assert_eq!(view.snapshot().size(), RenderSize::Small.canvas_size());
        assert_eq!(view.state(), RenderState::Done);
        assert_eq!(view.props(), Some(RenderRequest::new("fast", RenderSize::Small)));
    }

    #[tokio::test]
    async fn test_failed_render_settles_and_retries() {
        let lookup = players();
        // Sprite paths cannot be resolved against this base, so drawing fails.
        let compositor = Compositor::new(
            ImageLoader::new(Arc::new(MemoryAssetSource::new())),
            AssetPaths::parse("mailto:cdn@example.com").unwrap(),
        );
        let renderer = TankRenderer::new(lookup.clone(), compositor, 1.0).unwrap();
        let view = TankView::new(Arc::new(renderer));
        let props = RenderRequest::new("fast", RenderSize::Small);

        assert!(view.set_props(props.clone()).await.is_err());
        assert_eq!(view.state(), RenderState::Failed);
        assert_eq!(view.props(), None);
        assert_eq!(view.outcome(), None);
        assert_eq!(view.refresh().await.unwrap(), ViewUpdate::Unchanged);

        assert!(view.set_props(props).await.is_err());
        assert_eq!(lookup.calls(), vec!["fast", "fast"]);
    }
}
