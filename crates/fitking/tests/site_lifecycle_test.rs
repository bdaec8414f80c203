//! Integration test for the site shell: config, session and effects together.

use std::sync::Arc;

use fitking::{
    ConfigError, InMemoryAuthProvider, Session, SessionState, Site, SiteConfig, SiteError, User,
    GOALS,
};
use fitking_effects::effects::{CursorPhase, Effect};
use fitking_effects::UIRenderer;

fn member() -> Session {
    Session {
        user: User {
            id: "member-1".to_string(),
            email: Some("member@fitnessking.example".to_string()),
        },
        access_token: "abc".to_string(),
    }
}

fn tile_centre(site: &Site, index: usize) -> (f32, f32) {
    let tile = site.layout().goal_tiles[index];
    site.page()
        .element(tile)
        .and_then(|e| e.bounds)
        .map(|b| b.center())
        .unwrap()
}

#[test]
fn test_default_site_mounts_everything() {
    let provider = InMemoryAuthProvider::with_session(member());
    let site = Site::mount(SiteConfig::default(), Arc::new(provider.clone())).unwrap();

    assert_eq!(site.cards().len(), GOALS.len());
    assert_eq!(site.particles().count(), 30);
    assert_eq!(site.particles().class_name(), Some("hero-particles"));
    assert!(site.cursor().is_some_and(|c| c.is_enabled()));
    assert!(site.effects().all(|e| e.is_mounted()));
    assert!(site.page().listener_count() > 0);

    assert!(site.session().is_authenticated());
    assert_eq!(provider.subscriber_count(), 1);
}

#[test]
fn test_goal_tile_hover_and_click() {
    let site_provider = InMemoryAuthProvider::new();
    let mut site = Site::mount(SiteConfig::default(), Arc::new(site_provider)).unwrap();

    let (x, y) = tile_centre(&site, 2);
    site.pointer_move(x, y);
    for _ in 0..60 {
        site.tick(1.0 / 60.0);
    }

    assert_eq!(site.cursor().map(|c| c.phase()), Some(CursorPhase::Hovering));
    assert!(site.cards()[2].state().is_hovered());
    assert!(site.cards()[2].state().light_opacity() > 0.0);
    assert!(!site.cards()[0].state().is_hovered());

    site.pointer_down();
    assert_eq!(site.cursor().map(|c| c.phase()), Some(CursorPhase::Pressed));
    site.pointer_up();
    assert_eq!(site.last_activated_goal(), Some("cardio"));
}

#[test]
fn test_render_layers_cursor_on_top() {
    let mut site =
        Site::mount(SiteConfig::default(), Arc::new(InMemoryAuthProvider::new())).unwrap();
    site.pointer_move(400.0, 300.0);
    for _ in 0..45 {
        site.tick(1.0 / 60.0);
    }

    let mut renderer = UIRenderer::new();
    renderer.begin_frame();
    site.render(&mut renderer);
    let depths: Vec<i32> = renderer.end_frame().iter().map(|b| b.z_index).collect();
    assert_eq!(depths, vec![0, 9998, 9999]);
}

#[test]
fn test_unmount_releases_listeners_and_session() {
    let provider = InMemoryAuthProvider::new();
    let mut site = Site::mount(SiteConfig::default(), Arc::new(provider.clone())).unwrap();

    site.unmount();
    assert_eq!(site.page().listener_count(), 0);
    assert_eq!(provider.subscriber_count(), 0);
    assert!(site.effects().all(|e| !e.is_mounted()));

    let before: Vec<u64> = site.effects().map(|e| e.revision()).collect();
    let (x, y) = tile_centre(&site, 0);
    site.pointer_move(x, y);
    site.pointer_down();
    site.pointer_up();
    let after: Vec<u64> = site.effects().map(|e| e.revision()).collect();
    assert_eq!(before, after);
    assert_eq!(site.last_activated_goal(), None);

    provider.sign_in(member());
    assert!(!site.session().is_authenticated());
}

#[test]
fn test_narrow_viewport_disables_cursor() {
    let config = SiteConfig::from_toml_str("[viewport]\nwidth = 600.0\nheight = 900.0").unwrap();
    let mut site = Site::mount(config, Arc::new(InMemoryAuthProvider::new())).unwrap();

    assert!(site.cursor().is_some_and(|c| !c.is_enabled()));

    // One column on narrow screens: tiles stack vertically.
    let xs: Vec<f32> = (0..GOALS.len()).map(|i| tile_centre(&site, i).0).collect();
    assert!(xs.windows(2).all(|w| (w[0] - w[1]).abs() < f32::EPSILON));

    site.pointer_move(300.0, 300.0);
    let mut renderer = UIRenderer::new();
    renderer.begin_frame();
    site.cursor().unwrap().render(site.page(), &mut renderer);
    assert_eq!(renderer.command_count(), 0);
}

#[test]
fn test_config_drives_effects() {
    let config = SiteConfig::from_toml_str(
        r#"
        [effects]
        particle_count = 0
        text_animate = false
        cursor_enabled = false
        "#,
    )
    .unwrap();
    let site = Site::mount(config, Arc::new(InMemoryAuthProvider::new())).unwrap();

    assert!(site.cursor().is_none());
    assert_eq!(site.particles().count(), 0);
    assert!(!site.title().animates());
    assert!((site.title().state().opacity() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_session_follows_provider_after_mount() {
    let provider = InMemoryAuthProvider::new();
    let site = Site::mount(SiteConfig::default(), Arc::new(provider.clone())).unwrap();
    assert_eq!(site.session().state(), SessionState::default());

    provider.sign_in(member());
    assert_eq!(site.session().user().map(|u| u.id), Some("member-1".to_string()));

    site.session().sign_out().unwrap();
    assert!(!site.session().is_authenticated());
}

#[test]
fn test_unavailable_provider_does_not_block_mount() {
    let provider = InMemoryAuthProvider::new();
    provider.set_unavailable(true);
    let site = Site::mount(SiteConfig::default(), Arc::new(provider.clone())).unwrap();

    assert!(!site.session().is_authenticated());
    assert!(site.session().is_running());

    provider.set_unavailable(false);
    provider.sign_in(member());
    assert!(site.session().is_authenticated());
}

#[test]
fn test_load_reads_config_file() {
    let path = std::env::temp_dir().join(format!("fitking-site-{}.toml", std::process::id()));
    std::fs::write(&path, "[effects]\nparticle_count = 7\ncursor_enabled = false\n").unwrap();

    let site = Site::load(&path, Arc::new(InMemoryAuthProvider::new()));
    std::fs::remove_file(&path).unwrap();

    let site = site.unwrap();
    assert_eq!(site.particles().count(), 7);
    assert!(site.cursor().is_none());
}

#[test]
fn test_load_missing_file_is_config_error() {
    let result = Site::load(
        "/definitely/not/here/fitking.toml",
        Arc::new(InMemoryAuthProvider::new()),
    );
    assert!(matches!(result, Err(SiteError::Config(ConfigError::Io { .. }))));
}
