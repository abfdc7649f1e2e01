//! Navigation system for JW Companion
//!
//! This module provides:
//! - Route definitions and path matching
//! - The navigation boundary ([`Navigator`]) and an in-memory stack that
//!   implements it
//! - The auth route guard, which redirects based on session and location

use app_state::session::Session;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Path of the login screen
pub const LOGIN_PATH: &str = "/login";

/// Path of the home screen
pub const HOME_PATH: &str = "/";

/// First segments that belong to the auth flow
pub const AUTH_SEGMENTS: [&str; 3] = ["login", "register", "reset-password"];

/// Reserved token for design-preview routes; never a redirect target
pub const PREVIEW_PREFIX: &str = "preview";

// =============================================================================
// Route Definitions
// =============================================================================

/// Parameters for a route
pub type RouteParams = HashMap<String, String>;

/// All screens in the application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    /// Dashboard (tab root)
    #[default]
    Home,
    /// Bible reading tracker
    BibleReading,
    /// Habit list
    Habits,
    /// Login screen
    Login,
    /// Create account
    Register,
    /// Request a password reset email
    ResetPassword,
    /// Design-time preview of a screen
    Preview {
        /// Wireframe name
        name: String,
    },
    /// Not found
    NotFound,
}

impl Route {
    /// Get the URL path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::BibleReading => "/bible-reading".to_string(),
            Route::Habits => "/habits".to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Preview { name } => {
                format!("/{}/{}", PREVIEW_PREFIX, urlencoding::encode(name))
            }
            Route::NotFound => "/not-found".to_string(),
        }
    }

    /// Check if this route is part of the auth flow
    pub fn is_auth_route(&self) -> bool {
        matches!(self, Route::Login | Route::Register | Route::ResetPassword)
    }

    /// Check if this route requires a signed-in user
    pub fn requires_auth(&self) -> bool {
        !self.is_auth_route() && !matches!(self, Route::Preview { .. })
    }

    /// Screen title
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Dashboard",
            Route::BibleReading => "Bible Reading",
            Route::Habits => "Habits",
            Route::Login => "Sign In",
            Route::Register => "Create Account",
            Route::ResetPassword => "Reset Password",
            Route::Preview { .. } => "Preview",
            Route::NotFound => "Not Found",
        }
    }
}

// =============================================================================
// Route Path
// =============================================================================

/// Current navigation position as ordered, decoded path segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoutePath {
    segments: Vec<String>,
}

impl RoutePath {
    /// Build from segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Parse a path string, ignoring any query string
    pub fn parse(path: &str) -> Self {
        let pathname = path.split_once('?').map_or(path, |(p, _)| p);
        let segments = pathname
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();
        Self { segments }
    }

    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    /// All segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, if any
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Whether this is a design-preview path
    pub fn is_preview(&self) -> bool {
        self.first().is_some_and(|s| s.starts_with(PREVIEW_PREFIX))
    }

    /// Whether this path is in the auth group; preview paths count as auth
    pub fn is_auth_route(&self) -> bool {
        self.first().is_some_and(|s| AUTH_SEGMENTS.contains(&s)) || self.is_preview()
    }

    /// Encoded path string
    pub fn to_path_string(&self) -> String {
        let encoded: Vec<String> = self
            .segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("/{}", encoded.join("/"))
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

impl From<&Route> for RoutePath {
    fn from(route: &Route) -> Self {
        RoutePath::parse(&route.to_path())
    }
}

// =============================================================================
// Router
// =============================================================================

/// Segment type in a pattern
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// A route pattern
struct RoutePattern {
    segments: Vec<PatternSegment>,
    builder: fn(RouteParams) -> Option<Route>,
}

/// Path router
pub struct Router {
    patterns: Vec<RoutePattern>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new router with all routes
    pub fn new() -> Self {
        let mut router = Self { patterns: Vec::new() };

        router.add_route("/", |_| Some(Route::Home));
        router.add_route("/bible-reading", |_| Some(Route::BibleReading));
        router.add_route("/habits", |_| Some(Route::Habits));

        // Auth
        router.add_route("/login", |_| Some(Route::Login));
        router.add_route("/register", |_| Some(Route::Register));
        router.add_route("/reset-password", |_| Some(Route::ResetPassword));

        router.add_route("/preview/:name", |params| {
            Some(Route::Preview { name: params.get("name")?.clone() })
        });

        router
    }

    fn add_route(&mut self, pattern: &str, builder: fn(RouteParams) -> Option<Route>) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(RoutePattern { segments, builder });
    }

    /// Match a path to a route
    pub fn match_path(&self, path: &str) -> Route {
        self.match_route_path(&RoutePath::parse(path))
    }

    /// Match parsed segments to a route
    pub fn match_route_path(&self, path: &RoutePath) -> Route {
        for pattern in &self.patterns {
            if let Some(params) = Self::match_pattern(&pattern.segments, path.segments()) {
                if let Some(route) = (pattern.builder)(params) {
                    return route;
                }
            }
        }
        Route::NotFound
    }

    fn match_pattern(pattern: &[PatternSegment], path: &[String]) -> Option<RouteParams> {
        if pattern.len() != path.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, actual) in pattern.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), actual.clone());
                }
            }
        }
        Some(params)
    }
}

// =============================================================================
// Navigation Boundary
// =============================================================================

/// Navigation primitives the app relies on
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Current location
    fn current_path(&self) -> RoutePath;

    /// Replace the current location; no back-navigation to it
    fn replace(&self, path: &str);

    /// Navigate forward
    fn push(&self, path: &str);

    /// Go back; returns false when there is nothing to go back to
    fn back(&self) -> bool;
}

/// A navigation stack entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The location
    pub path: RoutePath,
    /// Unique key for this entry
    pub key: String,
}

impl StackEntry {
    /// Create a new stack entry
    pub fn new(path: RoutePath) -> Self {
        Self { path, key: uuid::Uuid::new_v4().to_string() }
    }
}

/// In-memory navigation stack
///
/// Publishes the top-of-stack path to subscribers after every change.
pub struct NavigationStack {
    entries: Mutex<Vec<StackEntry>>,
    path_tx: watch::Sender<RoutePath>,
}

impl NavigationStack {
    /// Create a stack with a single root entry
    pub fn new(root: RoutePath) -> Self {
        let (path_tx, _) = watch::channel(root.clone());
        Self { entries: Mutex::new(vec![StackEntry::new(root)]), path_tx }
    }

    /// Subscribe to location changes
    pub fn subscribe(&self) -> watch::Receiver<RoutePath> {
        self.path_tx.subscribe()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.depth() > 1
    }

    /// Snapshot of all entries (bottom to top)
    pub fn entries(&self) -> Vec<StackEntry> {
        self.entries.lock().clone()
    }

    fn publish(&self, entries: &[StackEntry]) {
        if let Some(top) = entries.last() {
            tracing::debug!(path = %top.path, depth = entries.len(), "navigation changed");
            self.path_tx.send_replace(top.path.clone());
        }
    }
}

impl Navigator for NavigationStack {
    fn current_path(&self) -> RoutePath {
        self.path_tx.borrow().clone()
    }

    fn replace(&self, path: &str) {
        let mut entries = self.entries.lock();
        let entry = StackEntry::new(RoutePath::parse(path));
        match entries.last_mut() {
            Some(last) => *last = entry,
            None => entries.push(entry),
        }
        self.publish(&entries);
    }

    fn push(&self, path: &str) {
        let mut entries = self.entries.lock();
        entries.push(StackEntry::new(RoutePath::parse(path)));
        self.publish(&entries);
    }

    fn back(&self) -> bool {
        let mut entries = self.entries.lock();
        if entries.len() > 1 {
            entries.pop();
            self.publish(&entries);
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Route Guard
// =============================================================================

/// Outcome of one guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading: show a loading indicator, do not navigate
    Suspend,
    /// Stay where we are
    Stay,
    /// Replace navigation with this route
    Redirect(Route),
}

/// Decide whether to redirect, given the session and current location
///
/// | user | auth route | preview | decision |
/// |---|---|---|---|
/// | no | no | - | redirect to login |
/// | no | yes | - | stay |
/// | yes | yes | no | redirect to home |
/// | yes | yes | yes | stay |
/// | yes | no | - | stay |
pub fn decide(session: &Session, path: &RoutePath) -> GuardDecision {
    if session.is_loading {
        return GuardDecision::Suspend;
    }

    match (session.is_authenticated(), path.is_auth_route()) {
        (false, false) => GuardDecision::Redirect(Route::Login),
        (true, true) if !path.is_preview() => GuardDecision::Redirect(Route::Home),
        _ => GuardDecision::Stay,
    }
}

/// Applies [`decide`] to a navigator on every session or location change
pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    /// Create a guard driving `navigator`
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Evaluate once and perform the redirect, if any
    pub fn evaluate(&self, session: &Session, path: &RoutePath) -> GuardDecision {
        let decision = decide(session, path);
        if let GuardDecision::Redirect(route) = &decision {
            tracing::debug!(from = %path, to = %route.to_path(), "route guard redirect");
            self.navigator.replace(&route.to_path());
        }
        decision
    }

    /// Evaluate against the navigator's current location
    pub fn check(&self, session: &Session) -> GuardDecision {
        let path = self.navigator.current_path();
        self.evaluate(session, &path)
    }

    /// Re-evaluate on every session or location change until either source closes
    pub async fn run(
        self,
        mut session_rx: watch::Receiver<Session>,
        mut path_rx: watch::Receiver<RoutePath>,
    ) {
        loop {
            let session = session_rx.borrow_and_update().clone();
            let path = path_rx.borrow_and_update().clone();
            self.evaluate(&session, &path);

            tokio::select! {
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = path_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("route guard stopped");
    }

    /// Spawn [`RouteGuard::run`] on the current runtime
    pub fn spawn(
        self,
        session_rx: watch::Receiver<Session>,
        path_rx: watch::Receiver<RoutePath>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(session_rx, path_rx))
    }
}

// =============================================================================
// Tests
// =============================================================================
