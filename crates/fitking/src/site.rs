//! Site composition.
//!
//! Builds the landing page (hero section with call-to-action, goal tiles)
//! and mounts the effects on it: one cursor overlay per page, a particle
//! field and neon title in the hero, and a glow card on every goal tile.
//! The page is laid out before the cursor mounts so the cursor's snapshot
//! of interactive elements sees every tile.

use std::path::Path;
use std::sync::Arc;

use fitking_effects::effects::Effect;
use fitking_effects::{
    ElementId, ElementSpec, GlowCard, GlowCardProps, Grid, NeonCursor, NeonText, NeonTextProps,
    Page, ParticleField, ParticleFieldProps, Rect, Tag, UIRenderer,
};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::session::{AuthProvider, SessionController};

/// Hero headline.
pub const HERO_TITLE: &str = "FITNESSKING";

/// Training goals shown as tiles, in display order.
pub const GOALS: [&str; 5] = ["weight-loss", "muscle-gain", "cardio", "flexibility", "strength"];

const TITLE_HEIGHT: f32 = 96.0;
const CTA_SIZE: (f32, f32) = (220.0, 56.0);
const PARTICLE_CLASS: &str = "hero-particles";

/// Element IDs of the laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLayout {
    /// Hero section.
    pub hero: ElementId,
    /// Hero title.
    pub title: ElementId,
    /// Call-to-action button in the hero.
    pub cta: ElementId,
    /// Goals section.
    pub goals: ElementId,
    /// One tile per entry of [`GOALS`].
    pub goal_tiles: Vec<ElementId>,
}

/// The running site: page, effects and session.
pub struct Site {
    page: Page,
    config: SiteConfig,
    layout: SiteLayout,
    particles: ParticleField,
    title: NeonText,
    cards: Vec<GlowCard>,
    cursor: Option<NeonCursor>,
    session: SessionController,
    last_activated: Arc<Mutex<Option<usize>>>,
}

impl Site {
    /// Lays out the page, mounts every effect and starts the session.
    ///
    /// A provider that cannot report the current session does not stop
    /// the site; the controller keeps listening for later events.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteError::Page`] if the page cannot be built.
    pub fn mount(config: SiteConfig, provider: Arc<dyn AuthProvider>) -> SiteResult<Self> {
        let mut page = Page::new(config.viewport.into());
        let layout = build_layout(&mut page)?;
        let effects = &config.effects;

        let particles = ParticleField::mount(
            &page,
            layout.hero,
            ParticleFieldProps {
                count: effects.particle_count,
                class_name: Some(PARTICLE_CLASS.to_string()),
            },
        )?;

        let title = NeonText::mount(
            &page,
            layout.title,
            NeonTextProps::new(HERO_TITLE)
                .with_color(effects.text_color)
                .with_animate(effects.text_animate),
        )?;

        let last_activated = Arc::new(Mutex::new(None));
        let mut cards = Vec::with_capacity(layout.goal_tiles.len());
        for (index, &tile) in layout.goal_tiles.iter().enumerate() {
            let activated = Arc::clone(&last_activated);
            let props = GlowCardProps::default()
                .with_color(effects.glow_color)
                .with_intensity(effects.intensity)
                .on_activate(move || {
                    debug!(goal = GOALS[index], "goal tile activated");
                    *activated.lock() = Some(index);
                });
            cards.push(GlowCard::mount(&page, tile, props)?);
        }

        // Last, so its interactive-element snapshot covers the whole page.
        let cursor = effects
            .cursor_enabled
            .then(|| NeonCursor::mount(&page, effects.hover_detection));

        let mut session = SessionController::new(provider);
        if let Err(err) = session.start() {
            debug!(%err, "site mounting signed out");
        }

        info!(
            particles = effects.particle_count,
            tiles = cards.len(),
            cursor = cursor.as_ref().is_some_and(NeonCursor::is_enabled),
            listeners = page.listener_count(),
            "site mounted"
        );

        Ok(Self {
            page,
            config,
            layout,
            particles,
            title,
            cards,
            cursor,
            session,
            last_activated,
        })
    }

    /// Reads the config file at `path`, then mounts as [`Site::mount`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteError::Config`] if the file cannot be read or
    /// parsed, and [`crate::SiteError::Page`] as [`Site::mount`] does.
    pub fn load(path: impl AsRef<Path>, provider: Arc<dyn AuthProvider>) -> SiteResult<Self> {
        let config = SiteConfig::load(path)?;
        Self::mount(config, provider)
    }

    /// The page.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Element IDs of the page.
    #[must_use]
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Session controller.
    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Hero particle field.
    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Hero title.
    #[must_use]
    pub fn title(&self) -> &NeonText {
        &self.title
    }

    /// Goal tile glow cards, in [`GOALS`] order.
    #[must_use]
    pub fn cards(&self) -> &[GlowCard] {
        &self.cards
    }

    /// Cursor overlay, if enabled in config.
    #[must_use]
    pub fn cursor(&self) -> Option<&NeonCursor> {
        self.cursor.as_ref()
    }

    /// Goal of the most recently clicked tile.
    #[must_use]
    pub fn last_activated_goal(&self) -> Option<&'static str> {
        (*self.last_activated.lock()).map(|i| GOALS[i])
    }

    /// Every mounted effect, back to front.
    pub fn effects(&self) -> impl Iterator<Item = &dyn Effect> {
        std::iter::once(&self.particles as &dyn Effect)
            .chain(std::iter::once(&self.title as &dyn Effect))
            .chain(self.cards.iter().map(|c| c as &dyn Effect))
            .chain(self.cursor.iter().map(|c| c as &dyn Effect))
    }

    /// Forwards a pointer move.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.page.pointer_move(x, y);
    }

    /// Forwards a button press.
    pub fn pointer_down(&mut self) {
        self.page.pointer_down();
    }

    /// Forwards a button release.
    pub fn pointer_up(&mut self) {
        self.page.pointer_up();
    }

    /// Advances every animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.page.tick(dt);
    }

    /// Emits this frame's commands for every effect.
    pub fn render(&self, renderer: &mut UIRenderer) {
        for effect in self.effects() {
            effect.render(&self.page, renderer);
        }
    }

    /// Releases every listener and the session subscription.
    pub fn unmount(&mut self) {
        self.particles.unmount();
        self.title.unmount();
        for card in &mut self.cards {
            card.unmount();
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.unmount();
        }
        self.session.shutdown();
        info!(listeners = self.page.listener_count(), "site unmounted");
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("page", &self.page)
            .field("layout", &self.layout)
            .field("cards", &self.cards.len())
            .field("cursor", &self.cursor.is_some())
            .field("session", &self.session)
            .finish()
    }
}

/// Creates the hero and goals sections sized to the viewport.
fn build_layout(page: &mut Page) -> SiteResult<SiteLayout> {
    let viewport = page.viewport();
    let (width, height) = (viewport.width, viewport.height);

    let hero = page.create_element(
        ElementSpec::new(Tag::Section).with_bounds(Rect::new(0.0, 0.0, width, height)),
    );
    let title_top = height * 0.35;
    let title = page.append_child(
        hero,
        ElementSpec::new(Tag::Span).with_bounds(Rect::new(0.0, title_top, width, TITLE_HEIGHT)),
    )?;
    let cta = page.append_child(
        hero,
        ElementSpec::new(Tag::Button).with_bounds(Rect::new(
            (width - CTA_SIZE.0) * 0.5,
            title_top + TITLE_HEIGHT + 32.0,
            CTA_SIZE.0,
            CTA_SIZE.1,
        )),
    )?;

    let grid = Grid::with_columns(if width < 640.0 { 1 } else { 3 });
    let goals_bounds = Rect::new(0.0, height, width, grid.content_height(GOALS.len()));
    let goals = page.create_element(ElementSpec::new(Tag::Section).with_bounds(goals_bounds));
    let goal_tiles = grid
        .arrange(goals_bounds, GOALS.len())
        .into_iter()
        .map(|bounds| page.append_child(goals, ElementSpec::new(Tag::Button).with_bounds(bounds)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SiteLayout {
        hero,
        title,
        cta,
        goals,
        goal_tiles,
    })
}
