// src/backend/shell/navigation.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};

pub const GIZMOS_URL: &str = "https://gizmosforseniors.com";

#[derive(CandidType, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Schedule,
    News,
    Account,
    Notes,
    Contacts,
    Chat,
    Supplies,
    Food,
    ActionNeeded,
    Documents,
    Rx,
    Emergency,
    Profile,
    Subscription,
    TeamMembers,
    AboutUs,
    ContactUs,
}

impl Screen {
    pub const ALL: [Screen; 18] = [
        Screen::Home,
        Screen::Schedule,
        Screen::News,
        Screen::Account,
        Screen::Notes,
        Screen::Contacts,
        Screen::Chat,
        Screen::Supplies,
        Screen::Food,
        Screen::ActionNeeded,
        Screen::Documents,
        Screen::Rx,
        Screen::Emergency,
        Screen::Profile,
        Screen::Subscription,
        Screen::TeamMembers,
        Screen::AboutUs,
        Screen::ContactUs,
    ];

    pub fn route(self) -> &'static str {
        match self {
            Screen::Home => "/home",
            Screen::Schedule => "/schedule",
            Screen::News => "/news",
            Screen::Account => "/profile",
            Screen::Notes => "/notes",
            Screen::Contacts => "/contacts",
            Screen::Chat => "/photos",
            Screen::Supplies => "/supplies",
            Screen::Food => "/food",
            Screen::ActionNeeded => "/action",
            Screen::Documents => "/documents",
            Screen::Rx => "/rx",
            Screen::Emergency => "/ambulance",
            Screen::Profile => "/profileInfo",
            Screen::Subscription => "/subscription",
            Screen::TeamMembers => "/team-members",
            Screen::AboutUs => "/aboutUs",
            Screen::ContactUs => "/contactUs",
        }
    }
}

/// Bottom tab bar entries.
#[derive(CandidType, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Schedule,
    /// Opens the external gizmo store and leaves the user on Home.
    Gizmos,
    News,
    Account,
}

/// What pressing a tab does.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum TabAction {
    Show(Screen),
    OpenExternal { url: String, then: Screen },
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Home, Tab::Schedule, Tab::Gizmos, Tab::News, Tab::Account];

    pub fn press(self) -> TabAction {
        match self {
            Tab::Home => TabAction::Show(Screen::Home),
            Tab::Schedule => TabAction::Show(Screen::Schedule),
            Tab::Gizmos => TabAction::OpenExternal {
                url: GIZMOS_URL.to_string(),
                then: Screen::Home,
            },
            Tab::News => TabAction::Show(Screen::News),
            Tab::Account => TabAction::Show(Screen::Account),
        }
    }
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub screen: Screen,
}

fn entries(items: &[(&str, Screen)]) -> Vec<MenuEntry> {
    items
        .iter()
        .map(|(label, screen)| MenuEntry {
            label: label.to_string(),
            screen: *screen,
        })
        .collect()
}

/// Icon grid on the home tab.
pub fn home_menu() -> Vec<MenuEntry> {
    entries(&[
        ("Notes", Screen::Notes),
        ("Contacts", Screen::Contacts),
        ("Chat", Screen::Chat),
        ("Supplies", Screen::Supplies),
        ("Food", Screen::Food),
        ("Action Needed", Screen::ActionNeeded),
        ("Documents", Screen::Documents),
        ("Rx", Screen::Rx),
        ("Emergency", Screen::Emergency),
    ])
}

/// Option cards on the account tab.
pub fn account_options() -> Vec<MenuEntry> {
    entries(&[
        ("Profile", Screen::Profile),
        ("Subscriptions", Screen::Subscription),
        ("Team Members", Screen::TeamMembers),
        ("About Us", Screen::AboutUs),
        ("Contact Us", Screen::ContactUs),
    ])
}

/// A parsed navigation target.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub screen: Screen,
}

impl Route {
    /// Maps a route path such as `/notes` or `/(tabs)/schedule` to its
    /// screen. Query strings and trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let path = path.strip_prefix("/(tabs)").unwrap_or(path);
        let path = if path.is_empty() { "/home" } else { path };
        Screen::ALL
            .into_iter()
            .find(|screen| screen.route() == path)
            .map(|screen| Route { screen })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_parse_back_to_their_screen() {
        for screen in Screen::ALL {
            assert_eq!(Route::parse(screen.route()), Some(Route { screen }));
        }
    }

    #[test]
    fn parse_tolerates_tab_group_and_query() {
        assert_eq!(Route::parse("/(tabs)/schedule").unwrap().screen, Screen::Schedule);
        assert_eq!(Route::parse("/rx?from=home").unwrap().screen, Screen::Rx);
        assert_eq!(Route::parse("/notes/").unwrap().screen, Screen::Notes);
        assert_eq!(Route::parse("/").unwrap().screen, Screen::Home);
        assert_eq!(Route::parse("/unknown"), None);
    }

    #[test]
    fn gizmos_opens_store_and_returns_home() {
        assert_eq!(
            Tab::Gizmos.press(),
            TabAction::OpenExternal {
                url: GIZMOS_URL.to_string(),
                then: Screen::Home,
            }
        );
        assert_eq!(Tab::Schedule.press(), TabAction::Show(Screen::Schedule));
    }

    #[test]
    fn menus_list_expected_entries() {
        let home: Vec<String> = home_menu().into_iter().map(|e| e.label).collect();
        assert_eq!(home.len(), 9);
        assert_eq!(home[2], "Chat");
        assert_eq!(account_options()[1].screen, Screen::Subscription);
    }
}
