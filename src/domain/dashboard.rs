// Dashboard view state: display mode and tab selection
//
// Both pieces of state are owned by the view and only move through the pure
// transition functions below.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Light => "Light Mode",
            DisplayMode::Dark => "Dark Mode",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "light" => Some(DisplayMode::Light),
            "dark" => Some(DisplayMode::Dark),
            _ => None,
        }
    }
}

pub fn toggle_mode(mode: DisplayMode) -> DisplayMode {
    match mode {
        DisplayMode::Light => DisplayMode::Dark,
        DisplayMode::Dark => DisplayMode::Light,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Clones,
    Views,
}

impl Tab {
    /// Display order of the tab bar.
    pub const ALL: [Tab; 2] = [Tab::Clones, Tab::Views];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Clones => "Git Repo Clones",
            Tab::Views => "Git Repo Views",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Tab::Clones => "clones",
            Tab::Views => "views",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Tab::ALL.into_iter().find(|tab| tab.slug() == slug)
    }

    pub fn enabled(self) -> bool {
        match self {
            Tab::Clones => true,
            // Views display is not built yet
            Tab::Views => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSelection(Tab);

impl Default for TabSelection {
    fn default() -> Self {
        Self(Tab::ALL[0])
    }
}

impl TabSelection {
    pub fn active(self) -> Tab {
        self.0
    }
}

/// Moves to `target` only when that tab accepts selection.
pub fn select_tab(selection: TabSelection, target: Tab) -> TabSelection {
    if target.enabled() {
        TabSelection(target)
    } else {
        selection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: DisplayMode,
    pub tab: TabSelection,
}

impl ViewState {
    /// Rebuilds the state named by request parameters, starting from the
    /// default state. Unknown values leave the default in place.
    pub fn from_params(mode: Option<&str>, tab: Option<&str>) -> Self {
        let mut state = ViewState::default();
        if mode.and_then(DisplayMode::from_slug) == Some(DisplayMode::Dark) {
            state.mode = toggle_mode(state.mode);
        }
        if let Some(target) = tab.and_then(Tab::from_slug) {
            state.tab = select_tab(state.tab, target);
        }
        state
    }

    pub fn toggled(self) -> Self {
        Self {
            mode: toggle_mode(self.mode),
            ..self
        }
    }

    pub fn with_tab(self, target: Tab) -> Self {
        Self {
            tab: select_tab(self.tab, target),
            ..self
        }
    }

    pub fn query_string(self) -> String {
        format!("mode={}&tab={}", self.mode.slug(), self.tab.active().slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_mode() {
        for mode in [DisplayMode::Light, DisplayMode::Dark] {
            assert_eq!(toggle_mode(toggle_mode(mode)), mode);
            assert_ne!(toggle_mode(mode), mode);
        }
    }

    #[test]
    fn test_disabled_tab_never_selected() {
        let selection = TabSelection::default();
        assert_eq!(selection.active(), Tab::Clones);

        let after = select_tab(selection, Tab::Views);
        assert_eq!(after, selection);
        assert_eq!(after.active(), Tab::Clones);
    }

    #[test]
    fn test_selecting_active_tab_is_noop() {
        let selection = TabSelection::default();
        assert_eq!(select_tab(selection, Tab::Clones), selection);
    }

    #[test]
    fn test_tab_flags() {
        assert!(Tab::Clones.enabled());
        assert!(!Tab::Views.enabled());
        assert_eq!(Tab::from_slug("views"), Some(Tab::Views));
        assert_eq!(Tab::from_slug("stars"), None);
    }

    #[test]
    fn test_state_from_params() {
        assert_eq!(ViewState::from_params(None, None), ViewState::default());

        let state = ViewState::from_params(Some("dark"), Some("views"));
        assert_eq!(state.mode, DisplayMode::Dark);
        assert_eq!(state.tab.active(), Tab::Clones);

        let state = ViewState::from_params(Some("purple"), Some("clones"));
        assert_eq!(state.mode, DisplayMode::Light);
    }

    #[test]
    fn test_follow_up_states() {
        let state = ViewState::default();
        assert_eq!(state.toggled().mode, DisplayMode::Dark);
        assert_eq!(state.toggled().toggled(), state);
        assert_eq!(state.with_tab(Tab::Views), state);
        assert_eq!(state.toggled().query_string(), "mode=dark&tab=clones");
    }
}
