//! Navigation intents emitted by the loaders and the shell that applies them.
//!
//! The shell owns the current route and the theme as plain values and
//! scrolls through an injected [`ScrollController`]; nothing reads global
//! page state back.

use std::fmt;

use crate::models::Entry;

/// Anchor id of the newsletter signup section on the insights page.
pub const NEWSLETTER_ANCHOR: &str = "newsletter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Services,
    Contact,
    Insights,
    InsightDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Services => "/services".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Insights => "/insights".to_string(),
            Route::InsightDetail(slug) => format!("/insights/{}", slug),
        }
    }

    /// Parses a site path. `/insights/` with an empty slug parses as a detail
    /// route with an empty slug, which the detail loader reports as not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use sponsr_core::navigation::Route;
    ///
    /// assert_eq!(
    ///     Route::parse("/insights/pricing-sponsorship"),
    ///     Some(Route::InsightDetail("pricing-sponsorship".to_string()))
    /// );
    /// assert_eq!(Route::parse("/insights"), Some(Route::Insights));
    /// assert_eq!(Route::parse("/nowhere"), None);
    /// ```
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Some(Route::Home),
            "/services" => Some(Route::Services),
            "/contact" => Some(Route::Contact),
            "/insights" if !path.ends_with("/insights/") => Some(Route::Insights),
            "/insights" => Some(Route::InsightDetail(String::new())),
            _ => {
                let slug = trimmed.strip_prefix("/insights/")?;
                if slug.contains('/') {
                    return None;
                }
                Some(Route::InsightDetail(slug.to_string()))
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Anchor(String),
}

impl ScrollTarget {
    pub fn newsletter() -> Self {
        ScrollTarget::Anchor(NEWSLETTER_ANCHOR.to_string())
    }

    pub fn selector(&self) -> String {
        match self {
            ScrollTarget::Top => "top".to_string(),
            ScrollTarget::Anchor(id) => format!("#{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    GoTo(Route),
    ScrollTo(ScrollTarget),
}

impl NavigationIntent {
    /// Opens the entry's detail page, or scrolls to the newsletter signup
    /// when the entry has no slug.
    pub fn for_entry(entry: &Entry) -> Self {
        if entry.has_detail_page() {
            NavigationIntent::GoTo(Route::InsightDetail(entry.slug.clone()))
        } else {
            NavigationIntent::ScrollTo(ScrollTarget::newsletter())
        }
    }
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationIntent::GoTo(route) => write!(f, "{}", route),
            NavigationIntent::ScrollTo(target) => f.write_str(&target.selector()),
        }
    }
}

/// Programmatic scrolling capability, injected into the shell.
pub trait ScrollController {
    /// Scrolls to `target`, jumping without animation when `immediate`.
    fn scroll_to(&mut self, target: &ScrollTarget, immediate: bool);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeState {
    #[default]
    Dark,
    Light,
}

impl ThemeState {
    pub fn toggle(self) -> Self {
        match self {
            ThemeState::Dark => ThemeState::Light,
            ThemeState::Light => ThemeState::Dark,
        }
    }

    /// Class applied to the page body, if any.
    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            ThemeState::Dark => None,
            ThemeState::Light => Some("light-mode"),
        }
    }
}

/// Navigation shell: current route, theme, and a scroll capability.
pub struct Navigator<S> {
    scroll: S,
    current: Route,
    theme: ThemeState,
}

impl<S: ScrollController> Navigator<S> {
    pub fn new(scroll: S, start: Route) -> Self {
        Self {
            scroll,
            current: start,
            theme: ThemeState::default(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn theme(&self) -> ThemeState {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeState {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    /// Applies an intent. A route change jumps to the top of the new page;
    /// an anchor scroll animates. Returns true when the route changed.
    pub fn dispatch(&mut self, intent: NavigationIntent) -> bool {
        match intent {
            NavigationIntent::GoTo(route) => {
                if route == self.current {
                    return false;
                }
                tracing::debug!(from = %self.current, to = %route, "navigating");
                self.current = route;
                self.scroll.scroll_to(&ScrollTarget::Top, true);
                true
            }
            NavigationIntent::ScrollTo(target) => {
                self.scroll.scroll_to(&target, false);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingScroll {
        calls: Vec<(ScrollTarget, bool)>,
    }

    impl ScrollController for RecordingScroll {
        fn scroll_to(&mut self, target: &ScrollTarget, immediate: bool) {
            self.calls.push((target.clone(), immediate));
        }
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Insights.path(), "/insights");
        assert_eq!(Route::Contact.path(), "/contact");
        assert_eq!(
            Route::InsightDetail("roi".to_string()).path(),
            "/insights/roi"
        );
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/contact/"), Some(Route::Contact));
        assert_eq!(
            Route::parse("/insights/roi?ref=nav"),
            Some(Route::InsightDetail("roi".to_string()))
        );
        assert_eq!(
            Route::parse("/insights/"),
            Some(Route::InsightDetail(String::new()))
        );
        assert_eq!(Route::parse("/insights/a/b"), None);
    }

    #[test]
    fn test_intent_for_entry() {
        let mut entry = Entry {
            slug: "roi".to_string(),
            ..Entry::default()
        };
        assert_eq!(
            NavigationIntent::for_entry(&entry),
            NavigationIntent::GoTo(Route::InsightDetail("roi".to_string()))
        );

        entry.slug.clear();
        let intent = NavigationIntent::for_entry(&entry);
        assert_eq!(intent, NavigationIntent::ScrollTo(ScrollTarget::newsletter()));
        assert_eq!(intent.to_string(), "#newsletter");
    }

    #[test]
    fn test_route_change_scrolls_to_top_immediately() {
        let mut nav = Navigator::new(RecordingScroll::default(), Route::Insights);

        assert!(nav.dispatch(NavigationIntent::GoTo(Route::InsightDetail("roi".into()))));
        assert_eq!(nav.current(), &Route::InsightDetail("roi".into()));
        assert_eq!(nav.scroll().calls, vec![(ScrollTarget::Top, true)]);

        assert!(!nav.dispatch(NavigationIntent::GoTo(Route::InsightDetail("roi".into()))));
        assert_eq!(nav.scroll().calls.len(), 1);
    }

    #[test]
    fn test_anchor_scroll_is_animated() {
        let mut nav = Navigator::new(RecordingScroll::default(), Route::Insights);
        assert!(!nav.dispatch(NavigationIntent::ScrollTo(ScrollTarget::newsletter())));
        assert_eq!(nav.current(), &Route::Insights);
        assert_eq!(nav.scroll().calls, vec![(ScrollTarget::newsletter(), false)]);
    }

    #[test]
    fn test_theme_toggle() {
        let mut nav = Navigator::new(RecordingScroll::default(), Route::Home);
        assert_eq!(nav.theme(), ThemeState::Dark);
        assert_eq!(nav.theme().body_class(), None);
        assert_eq!(nav.toggle_theme(), ThemeState::Light);
        assert_eq!(nav.theme().body_class(), Some("light-mode"));
        assert_eq!(nav.toggle_theme(), ThemeState::Dark);
    }
}
