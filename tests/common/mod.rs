//! Shared route table fixture for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hash_router::{MemoryNavigator, Redirect, Route, RouteTable, Router, RouterError};

pub const BASE: &str = "http://localhost/app/";

/// Toggles the admin guard.
#[derive(Debug, Default)]
pub struct Session {
    pub admin: AtomicBool,
}

/// A music-library style route table.
pub fn routes(session: Arc<Session>) -> Vec<Route> {
    let settings = Arc::new(Route::new("/settings", "Settings").unwrap().named("settings"));

    vec![
        Route::new("/home", "Home").unwrap().named("home"),
        Route::new("/404", "404").unwrap().named("not-found"),
        Route::new("/users/(?<id>[^/]+)", "User").unwrap().named("user"),
        Route::new("/albums/:album/tracks/:track", "Track").unwrap().named("track"),
        Route::new("/admin", "Admin")
            .unwrap()
            .named("admin")
            .with_guard(move |_| {
                let session = session.clone();
                async move { Ok(session.admin.load(Ordering::SeqCst)) }
            }),
        Route::new("/broken", "Broken")
            .unwrap()
            .named("broken")
            .with_guard(|_| async { Err(RouterError::Guard("backend unavailable".into())) }),
        Route::new("/u/:id", "Legacy").unwrap().redirect_to("/users/:id").unwrap(),
        Route::new("/preferences", "Preferences")
            .unwrap()
            .with_redirect(move |_| Redirect::Route(settings.clone())),
        Route::new("/settings", "Settings").unwrap().named("settings"),
    ]
}

pub fn table(session: Arc<Session>) -> RouteTable {
    RouteTable::new(routes(session))
}

/// A router over the fixture table, starting at `hash`.
#[allow(dead_code)]
pub fn router(hash: &str) -> (Arc<Router>, Arc<MemoryNavigator>, Arc<Session>) {
    let session = Arc::new(Session::default());
    let navigator = Arc::new(MemoryNavigator::new(&format!("{BASE}{hash}")).unwrap());
    let router = Router::new(table(session.clone()), navigator.clone()).unwrap();
    (Arc::new(router), navigator, session)
}
