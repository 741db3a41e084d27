//! Render orchestration: player lookup, compositing and outlining.

use std::fmt;
use std::sync::Arc;

use common::{PlayerCustomization, RenderSize, TankError, TankResult};
use compositor::{AssetPaths, CompositeStats, Compositor, LayerPlan, OutlineSynthesizer};
use media::Canvas;
use networking::{
    AssetSource, DirectoryAssetSource, HttpAssetSource, HttpClientBuilder, ImageLoader,
    LookupResponse, PlayerLookup, ProxyPlayerLookup,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RendererConfig;

/// One render invocation's inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub player_id: String,
    pub size: RenderSize,
    pub outline: bool,
}

impl RenderRequest {
    pub fn new(player_id: impl Into<String>, size: RenderSize) -> Self {
        Self {
            player_id: player_id.into(),
            size,
            outline: false,
        }
    }

    pub fn with_outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }
}

/// Where the customization of a render came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerSource {
    /// The player service returned the player's record.
    Found,
    /// The player service does not know the player.
    NotFound,
    /// The player service could not be reached or answered garbage.
    LookupFailed,
}

impl PlayerSource {
    /// Whether the fallback record was drawn.
    pub fn is_fallback(self) -> bool {
        !matches!(self, PlayerSource::Found)
    }
}

/// Progress of a render invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    Fetching,
    Drawing(PlayerSource),
    Done,
    /// The last render stopped with an error; nothing was committed.
    Failed,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderState::Idle => f.write_str("idle"),
            RenderState::Fetching => f.write_str("fetching"),
            RenderState::Drawing(source) if source.is_fallback() => f.write_str("drawing fallback"),
            RenderState::Drawing(_) => f.write_str("drawing"),
            RenderState::Done => f.write_str("done"),
            RenderState::Failed => f.write_str("failed"),
        }
    }
}

/// Summary of a finished render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Name of the player drawn, or the placeholder name for fallbacks.
    pub display_name: String,
    pub source: PlayerSource,
    pub size: RenderSize,
    pub layers_drawn: usize,
    pub layers_skipped: usize,
    pub outlined: bool,
}

impl RenderOutcome {
    pub(crate) fn new(
        custom: PlayerCustomization,
        source: PlayerSource,
        request: &RenderRequest,
        stats: CompositeStats,
    ) -> Self {
        Self {
            display_name: custom.display_name,
            source,
            size: request.size,
            layers_drawn: stats.drawn,
            layers_skipped: stats.skipped,
            outlined: request.outline,
        }
    }
}

/// Renders tank icons onto caller-supplied surfaces.
pub struct TankRenderer {
    lookup: Arc<dyn PlayerLookup>,
    compositor: Compositor,
    outline: OutlineSynthesizer,
}

impl TankRenderer {
    /// Create a renderer from its collaborators. Fails when the device
    /// pixel ratio is not finite and positive.
    pub fn new(
        lookup: Arc<dyn PlayerLookup>,
        compositor: Compositor,
        device_pixel_ratio: f64,
    ) -> TankResult<Self> {
        Ok(Self {
            lookup,
            compositor,
            outline: OutlineSynthesizer::new(device_pixel_ratio)?,
        })
    }

    /// Create a renderer talking to the configured proxy and CDN.
    pub fn from_config(config: &RendererConfig) -> TankResult<Self> {
        let client = HttpClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TankError::network(e.to_string()))?;
        let client = Arc::new(client);

        let source: Arc<dyn AssetSource> = match &config.asset_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "serving assets from directory");
                Arc::new(DirectoryAssetSource::new(dir.clone()))
            }
            None => Arc::new(HttpAssetSource::new(client.clone())),
        };

        let lookup = ProxyPlayerLookup::new(client, Url::parse(&config.proxy_url)?);
        let compositor = Compositor::new(ImageLoader::new(source), AssetPaths::parse(&config.cdn_url)?);

        Self::new(Arc::new(lookup), compositor, config.device_pixel_ratio)
    }

    pub fn outline(&self) -> &OutlineSynthesizer {
        &self.outline
    }

    /// Look up a player. Absent or unreachable players resolve to the
    /// fallback record; this never fails.
    pub async fn resolve(&self, player_id: &str) -> (PlayerCustomization, PlayerSource) {
        match self.lookup.lookup(player_id).await {
            Ok(LookupResponse::Found(details)) => {
                debug!(player = player_id, name = %details.username, "player found");
                (PlayerCustomization::from(&*details), PlayerSource::Found)
            }
            Ok(LookupResponse::NotFound) => {
                info!(player = player_id, "player not found, drawing fallback");
                (PlayerCustomization::fallback(), PlayerSource::NotFound)
            }
            Err(err) => {
                warn!(player = player_id, %err, "player lookup failed, drawing fallback");
                (PlayerCustomization::fallback(), PlayerSource::LookupFailed)
            }
        }
    }

    /// Draw `custom` onto `surface`, which is resized to the size's canvas
    /// dimensions first.
    pub async fn draw(
        &self,
        custom: &PlayerCustomization,
        size: RenderSize,
        outline: bool,
        surface: &mut Canvas,
    ) -> TankResult<CompositeStats> {
        surface.set_size(size.canvas_size());
        if surface.context_2d().is_none() {
            return Err(TankError::missing_context("destination surface"));
        }

        let plan = LayerPlan::build(custom, size);
        let stats = self.compositor.composite(&plan, surface).await?;

        if outline {
            self.outline.apply(surface)?;
        }

        Ok(stats)
    }

    /// Render the icon for a player.
    pub async fn render(&self, request: &RenderRequest, surface: &mut Canvas) -> TankResult<RenderOutcome> {
        debug!(player = %request.player_id, state = %RenderState::Fetching, "render started");
        let (custom, source) = self.resolve(&request.player_id).await;

        debug!(player = %request.player_id, state = %RenderState::Drawing(source), "drawing");
        let stats = self.draw(&custom, request.size, request.outline, surface).await?;

        info!(
            player = %request.player_id,
            name = %custom.display_name,
            size = %request.size,
            drawn = stats.drawn,
            "tank rendered"
        );

        Ok(RenderOutcome::new(custom, source, request, stats))
    }
}

impl fmt::Debug for TankRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TankRenderer")
            .field("compositor", &self.compositor)
            .field("outline", &self.outline)
            .finish_non_exhaustive()
    }
}
