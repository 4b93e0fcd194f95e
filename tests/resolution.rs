//! End-to-end resolution tests against an in-memory navigator.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hash_router::config::{parse_config, RouterSettings};
use hash_router::{
    ActiveRoute, MemoryNavigator, Navigator, Resolution, Route, RouteParams, RouteTable, Router, RouterError, Shutdown,
};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

mod common;

fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn test_user_fragment_with_query() {
    let (router, _, _) = common::router("#/users/42?tab=profile");

    let resolution = router.resolve().await;
    assert_eq!(
        resolution,
        Resolution::Activated {
            screen: "User".into(),
            name: Some("user".into()),
            params: params(&[("id", "42"), ("tab", "profile")]),
        }
    );
    assert_eq!(router.current().params, params(&[("id", "42"), ("tab", "profile")]));
}

#[tokio::test]
async fn test_url_then_navigate_resolves_named_route() {
    let (router, navigator, _) = common::router("");

    let cases = [
        ("user", params(&[("id", "42")])),
        ("track", params(&[("album", "blue train"), ("track", "3")])),
        ("settings", params(&[])),
    ];

    for (name, values) in cases {
        let url = router.url(name, &values).unwrap();
        router.go(&url, false).unwrap();
        assert_eq!(navigator.hash(), url.trim_start_matches('/'));

        router.resolve().await;
        let current = router.current();
        assert_eq!(current.name(), Some(name));
        for (key, value) in &values {
            assert_eq!(current.params.get(key), Some(value), "param {key} of {name}");
        }
    }
}

#[tokio::test]
async fn test_root_fragments_resolve_home() {
    for hash in ["", "#/", "#!/"] {
        let (router, navigator, _) = common::router(hash);

        let resolution = router.resolve().await;
        assert_eq!(resolution, Resolution::Home { to: "#/home".into() });
        assert_eq!(navigator.hash(), "#/home");

        // The replaced location then resolves to the home route itself.
        router.resolve().await;
        assert!(router.current().route.is_home());
    }
}

#[tokio::test]
async fn test_unmatched_fragment_is_not_found() {
    let (router, _, _) = common::router("#/no/such/page");
    router.go("/users/1", false).unwrap();
    router.resolve().await;
    assert_eq!(router.current().screen(), "User");

    router.go("/no/such/page", false).unwrap();
    assert_eq!(router.resolve().await, Resolution::NotFound);
    let current = router.current();
    assert!(current.route.is_not_found());
    assert!(current.params.is_empty());
}

#[tokio::test]
async fn test_guard_false_falls_back_to_not_found() {
    let (router, _, session) = common::router("#/admin");

    assert_eq!(
        router.resolve().await,
        Resolution::Denied { route: "admin".into() }
    );
    assert!(router.current().route.is_not_found());

    session.admin.store(true, Ordering::SeqCst);
    router.resolve().await;
    assert_eq!(router.current().screen(), "Admin");
}

#[tokio::test]
async fn test_failing_guard_is_treated_as_false() {
    let (router, _, _) = common::router("#/broken");
    assert_eq!(
        router.resolve().await,
        Resolution::Denied { route: "broken".into() }
    );
    assert!(router.current().route.is_not_found());
}

#[tokio::test]
async fn test_string_redirect_navigates() {
    let (router, navigator, _) = common::router("#/u/7");

    assert_eq!(
        router.resolve().await,
        Resolution::Redirected { to: "#/users/7".into() }
    );
    assert_eq!(navigator.hash(), "#/users/7");
    assert_eq!(navigator.len(), 2);

    router.resolve().await;
    assert_eq!(router.current().params["id"], "7");
}

#[tokio::test]
async fn test_route_redirect_keeps_params() {
    let (router, navigator, _) = common::router("#/preferences?section=audio");

    router.resolve().await;
    let current = router.current();
    assert_eq!(current.screen(), "Settings");
    assert_eq!(current.params["section"], "audio");
    // No navigation happened.
    assert_eq!(navigator.hash(), "#/preferences?section=audio");
}

#[tokio::test]
async fn test_cache_survives_table_replacement() {
    let (router, navigator, _) = common::router("#/users/42");

    let first = router.resolve().await;
    assert_eq!(router.cached_fragments(), 1);

    router.replace_table(RouteTable::new(vec![
        Route::new("/home", "Home").unwrap(),
        Route::new("/404", "404").unwrap(),
        Route::new("/users/:id", "Member").unwrap().named("member"),
    ]));

    let second = router.resolve().await;
    assert_eq!(first, second);
    assert_eq!(router.current().screen(), "User");

    // Fragments never seen before use the new table.
    navigator.assign("#/users/43").unwrap();
    router.resolve().await;
    assert_eq!(router.current().screen(), "Member");
    assert!(router.url("user", &params(&[("id", "1")])).is_err());
}

#[tokio::test]
async fn test_disabled_cache_rematches() {
    let session = Arc::new(common::Session::default());
    let navigator = Arc::new(MemoryNavigator::new(&format!("{}#/users/42", common::BASE)).unwrap());
    let settings = RouterSettings {
        cache_enabled: false,
        ..RouterSettings::default()
    };
    let router = Router::with_settings(common::table(session), navigator, &settings).unwrap();

    router.resolve().await;
    router.replace_table(RouteTable::new(vec![
        Route::new("/home", "Home").unwrap(),
        Route::new("/404", "404").unwrap(),
        Route::new("/users/:id", "Member").unwrap(),
    ]));
    router.resolve().await;

    assert_eq!(router.cached_fragments(), 0);
    assert_eq!(router.current().screen(), "Member");
}

#[tokio::test]
async fn test_handlers_fire_in_registration_order() {
    let (router, _, _) = common::router("#/settings");
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    for id in 0..3 {
        let tx = tx.clone();
        router.on_route_changed(move |new, _old| {
            let _ = tx.send((id, new.screen().to_string()));
            async {}
        });
    }

    router.resolve().await;
    for expected in 0..3 {
        assert_eq!(rx.recv().await.unwrap(), (expected, "Settings".to_string()));
    }
}

#[tokio::test]
async fn test_run_loop_follows_history() {
    let (router, navigator, _) = common::router("");
    let shutdown = Shutdown::new();
    let mut watcher = router.subscribe();

    let task = tokio::spawn(router.clone().run(shutdown.subscribe()));

    // Initial load: root → replace with #/home → popstate → Home.
    tokio::time::timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(router.current().route.is_home());

    router.go("/users/5", false).unwrap();
    tokio::time::timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(router.current().params["id"], "5");

    router.go_by(-1);
    tokio::time::timeout(Duration::from_secs(1), watcher.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(router.current().route.is_home());
    assert_eq!(navigator.hash(), "#/home");

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test]
async fn test_stale_resolution_is_discarded() {
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));

    let slow = Route::new("/slow", "Slow").unwrap().with_guard(move |_| {
        let release_rx = release_rx.clone();
        async move {
            if let Some(rx) = release_rx.lock().await.take() {
                let _ = rx.await;
            }
            Ok(true)
        }
    });
    let table = RouteTable::new(vec![
        Route::new("/home", "Home").unwrap(),
        Route::new("/404", "404").unwrap(),
        slow,
        Route::new("/fast", "Fast").unwrap(),
    ]);

    let navigator = Arc::new(MemoryNavigator::new(&format!("{}#/slow", common::BASE)).unwrap());
    let settings = RouterSettings {
        discard_stale_resolutions: true,
        ..RouterSettings::default()
    };
    let router = Arc::new(Router::with_settings(table, navigator.clone(), &settings).unwrap());

    let pending = tokio::spawn({
        let router = router.clone();
        async move { router.resolve().await }
    });
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    navigator.assign("#/fast").unwrap();
    router.resolve().await;
    assert_eq!(router.current().screen(), "Fast");

    release_tx.send(()).unwrap();
    assert_eq!(pending.await.unwrap(), Resolution::Superseded);
    assert_eq!(router.current().screen(), "Fast");
}

/// Router over `/slow` (guarded by `gate`) and `/fast`, starting on home.
///
/// The guard notifies `entered` once it is awaiting, so a test knows the slow
/// resolution has read its fragment before navigating elsewhere.
fn gated_router(
    gate: Arc<Notify>,
    entered: Arc<Notify>,
    discard_stale_resolutions: bool,
) -> Arc<Router> {
    let slow = Route::new("/slow", "Slow").unwrap().with_guard(move |_| {
        let gate = gate.clone();
        let entered = entered.clone();
        async move {
            entered.notify_one();
            gate.notified().await;
            Ok::<_, RouterError>(true)
        }
    });
    let table = RouteTable::new(vec![
        Route::new("/home", "Home").unwrap(),
        Route::new("/404", "404").unwrap(),
        slow,
        Route::new("/fast", "Fast").unwrap(),
    ]);
    let navigator = Arc::new(MemoryNavigator::new(&format!("{}#/home", common::BASE)).unwrap());
    let settings = RouterSettings {
        discard_stale_resolutions,
        ..RouterSettings::default()
    };
    Arc::new(Router::with_settings(table, navigator, &settings).unwrap())
}

async fn next_screen(watcher: &mut watch::Receiver<Arc<ActiveRoute>>) -> String {
    tokio::time::timeout(Duration::from_secs(1), watcher.changed())
        .await
        .expect("route change within a second")
        .unwrap();
    watcher.borrow_and_update().screen().to_string()
}

/// Starts the loop, waits for home, then leaves the slow guard pending and
/// lands on `/fast`.
async fn slow_then_fast(
    router: &Arc<Router>,
    entered: &Notify,
) -> (Shutdown, JoinHandle<()>, watch::Receiver<Arc<ActiveRoute>>) {
    let shutdown = Shutdown::new();
    let mut watcher = router.subscribe();
    let task = tokio::spawn(router.clone().run(shutdown.subscribe()));
    assert_eq!(next_screen(&mut watcher).await, "Home");

    router.go("/slow", false).unwrap();
    tokio::time::timeout(Duration::from_secs(1), entered.notified())
        .await
        .expect("slow guard entered");

    router.go("/fast", false).unwrap();
    assert_eq!(next_screen(&mut watcher).await, "Fast");
    (shutdown, task, watcher)
}

#[tokio::test]
async fn test_pending_guard_does_not_block_run_loop() {
    let gate = Arc::new(Notify::new());
    let entered = Arc::new(Notify::new());
    let router = gated_router(gate, entered.clone(), false);

    // The slow guard is never released.
    let (shutdown, task, _watcher) = slow_then_fast(&router, &entered).await;
    assert_eq!(router.current().screen(), "Fast");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("run loop exits while a guard is pending")
        .unwrap();
}

#[tokio::test]
async fn test_run_loop_last_activation_wins() {
    let gate = Arc::new(Notify::new());
    let entered = Arc::new(Notify::new());
    let router = gated_router(gate.clone(), entered.clone(), false);

    let (shutdown, task, mut watcher) = slow_then_fast(&router, &entered).await;

    gate.notify_one();
    assert_eq!(next_screen(&mut watcher).await, "Slow");
    assert_eq!(router.current().screen(), "Slow");

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test]
async fn test_run_loop_discards_stale_activation() {
    let gate = Arc::new(Notify::new());
    let entered = Arc::new(Notify::new());
    let router = gated_router(gate.clone(), entered.clone(), true);

    let (shutdown, task, watcher) = slow_then_fast(&router, &entered).await;

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!watcher.has_changed().unwrap());
    assert_eq!(router.current().screen(), "Fast");

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test]
async fn test_router_from_config_file() {
    let config = parse_config(
        r#"
        base_url = "https://music.example/player/"

        [[routes]]
        name = "home"
        path = "/home"
        screen = "Home"

        [[routes]]
        path = "/404"
        screen = "404"

        [[routes]]
        path = "/artist/:id"
        screen = "Artist"
        redirect = "/artists/:id"

        [[routes]]
        name = "artist"
        path = "/artists/:id"
        screen = "Artist"
        params = { tab = "albums" }
        "#,
    )
    .unwrap();

    let navigator = Arc::new(MemoryNavigator::new(&config.base_url).unwrap());
    navigator.replace("#/artist/9").unwrap();
    let table = RouteTable::from_config(&config.routes).unwrap();
    let router = Router::with_settings(table, navigator.clone(), &config.router).unwrap();

    router.resolve().await;
    assert_eq!(navigator.href(), "https://music.example/player/#/artists/9");

    router.resolve().await;
    let current = router.current();
    assert_eq!(current.name(), Some("artist"));
    assert_eq!(current.params, params(&[("id", "9")]));
    assert_eq!(current.route.params()["tab"], "albums");
}
