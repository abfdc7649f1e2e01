//! Design-time wireframes
//!
//! Static sample content for screens that are not wired to data yet. They are
//! reached through `/preview/<name>` routes, which the route guard never
//! redirects.

use crate::navigation::Route;
use serde::Serialize;

/// Wireframe names, in menu order
pub const WIREFRAME_NAMES: [&str; 3] = ["dashboard", "bible-reading", "habits"];

/// A labelled figure on a summary card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    /// Card label
    pub label: &'static str,
    /// Displayed value
    pub value: &'static str,
}

/// One day's reading assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingItem {
    /// Passage, e.g. "Genesis 1-3"
    pub passage: &'static str,
    /// Whether the passage has been read
    pub completed: bool,
}

/// One tracked habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitItem {
    /// Habit name
    pub name: &'static str,
    /// Consecutive days completed
    pub streak_days: u32,
    /// Whether today's check-in is done
    pub done_today: bool,
}

/// A wireframe screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Wireframe {
    /// Overview with summary cards
    Dashboard {
        /// Greeting line
        greeting: &'static str,
        /// Summary cards
        stats: Vec<StatCard>,
    },
    /// Reading plan progress
    BibleReading {
        /// Plan name
        plan: &'static str,
        /// Assignments
        items: Vec<ReadingItem>,
    },
    /// Habit check-ins
    Habits {
        /// Habits
        items: Vec<HabitItem>,
    },
}

impl Wireframe {
    /// Wireframe name as used in preview routes
    pub fn name(&self) -> &'static str {
        match self {
            Wireframe::Dashboard { .. } => "dashboard",
            Wireframe::BibleReading { .. } => "bible-reading",
            Wireframe::Habits { .. } => "habits",
        }
    }

    /// Route that shows this wireframe
    pub fn route(&self) -> Route {
        Route::Preview { name: self.name().to_string() }
    }
}

/// Dashboard sample
pub fn dashboard() -> Wireframe {
    Wireframe::Dashboard {
        greeting: "Good morning",
        stats: vec![
            StatCard { label: "Reading streak", value: "12 days" },
            StatCard { label: "Habits today", value: "2 / 3" },
            StatCard { label: "Chapters this month", value: "34" },
        ],
    }
}

/// Bible reading sample
pub fn bible_reading() -> Wireframe {
    Wireframe::BibleReading {
        plan: "Whole Bible in a Year",
        items: vec![
            ReadingItem { passage: "Genesis 1-3", completed: true },
            ReadingItem { passage: "Genesis 4-7", completed: true },
            ReadingItem { passage: "Genesis 8-11", completed: false },
        ],
    }
}

/// Habits sample
pub fn habits() -> Wireframe {
    Wireframe::Habits {
        items: vec![
            HabitItem { name: "Daily text", streak_days: 21, done_today: true },
            HabitItem { name: "Personal study", streak_days: 5, done_today: false },
            HabitItem { name: "Prayer", streak_days: 40, done_today: true },
        ],
    }
}

/// Wireframe for a preview name
pub fn preview_for(name: &str) -> Option<Wireframe> {
    match name {
        "dashboard" => Some(dashboard()),
        "bible-reading" => Some(bible_reading()),
        "habits" => Some(habits()),
        _ => None,
    }
}

/// Wireframe for a route, if it is a known preview
pub fn preview_for_route(route: &Route) -> Option<Wireframe> {
    match route {
        Route::Preview { name } => preview_for(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{RoutePath, Router};

    #[test]
    fn test_every_name_resolves() {
        for name in WIREFRAME_NAMES {
            let wireframe = preview_for(name).unwrap();
            assert_eq!(wireframe.name(), name);
        }
        assert!(preview_for("settings").is_none());
    }

    #[test]
    fn test_preview_routes_are_auth_exempt_paths() {
        let router = Router::new();
        for name in WIREFRAME_NAMES {
            let path = preview_for(name).unwrap().route().to_path();
            let parsed = RoutePath::parse(&path);
            assert!(parsed.is_preview());

            let route = router.match_path(&path);
            assert_eq!(preview_for_route(&route).unwrap().name(), name);
        }
    }

    #[test]
    fn test_non_preview_route_has_no_wireframe() {
        assert!(preview_for_route(&Route::Habits).is_none());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(habits()).unwrap();
        assert_eq!(json["kind"], "habits");
        assert_eq!(json["items"].as_array().unwrap().len(), 3);
    }
}
