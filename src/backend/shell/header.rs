// src/backend/shell/header.rs
use crate::models::common::OwnerId;
use crate::shell::navigation::Screen;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// Caption under the header title on the care pages.
const CARE_TITLE: &str = "Taking care of";
const CARE_SUBTITLE: &str = "Mom";

/// Everything the shared header draws for one screen.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HeaderConfig {
    /// `None` shows the app logo instead of a title.
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub help_title: String,
    /// `None` hides the help button.
    pub help_text: Option<String>,
}

impl HeaderConfig {
    fn new(title: Option<&str>, subtitle: Option<&str>, help_title: &str, help_text: Option<&str>) -> Self {
        HeaderConfig {
            title: title.map(String::from),
            subtitle: subtitle.map(String::from),
            help_title: help_title.to_string(),
            help_text: help_text.map(String::from),
        }
    }

    fn care_page(help_title: &str, help_text: &str) -> Self {
        Self::new(Some(CARE_TITLE), Some(CARE_SUBTITLE), help_title, Some(help_text))
    }

    pub fn has_help(&self) -> bool {
        self.help_text.is_some()
    }
}

impl Screen {
    /// The fixed header configuration of this screen.
    pub fn header(self) -> HeaderConfig {
        match self {
            Screen::Home => HeaderConfig::new(
                None,
                None,
                "Home Help",
                Some("This is your home screen. Tap any icon to manage caregiving tasks like notes, contacts, or medicine reminders."),
            ),
            Screen::Schedule => HeaderConfig::new(
                Some("Schedule Page"),
                None,
                "Schedule Page",
                Some("Use this page to view, add, and manage scheduled events. Tap on a date in the calendar to see scheduled items, and use the + button to create a new event with optional reminders."),
            ),
            Screen::News => HeaderConfig::new(Some("Senior News"), Some("Latest Tips & Articles"), "Senior News", None),
            Screen::Account => HeaderConfig::new(
                Some("Account"),
                None,
                "Account",
                Some("Manage your account settings and view information about the CareKeeper Hub."),
            ),
            Screen::Notes => HeaderConfig::care_page(
                "Notes Page",
                "This page allows you to log and view caregiving notes. Tap a note to see full details, or use the search to filter notes.",
            ),
            Screen::Contacts => HeaderConfig::new(
                Some("Contacts Page"),
                None,
                "Contacts Page",
                Some("This page stores important contacts related to your loved one. You can add family, doctors, and other support contacts. Tap a row for details or use the icons to call, email, or get directions."),
            ),
            Screen::Chat => HeaderConfig::care_page(
                "Chat Page",
                "This page lets caregivers communicate in real time. Enter your name, send a message, and see replies from others.",
            ),
            Screen::Supplies => HeaderConfig::care_page(
                "Supplies Page",
                "Use this page to track medical or caregiving supplies. Tap the checkbox to mark an item as needed.",
            ),
            Screen::Food => HeaderConfig::care_page(
                "Food Page",
                "Track food supplies for your loved one. Add items with descriptions and sources. You can mark items as needed using the checkbox.",
            ),
            Screen::ActionNeeded => HeaderConfig::new(
                Some("Action Needed"),
                Some("Supplies"),
                "Help",
                Some("This page shows the supplies that need to be replenished."),
            ),
            Screen::Documents => HeaderConfig::care_page(
                "Documents Page",
                "This page allows you to upload and store important documents like prescriptions, discharge papers, or notes from appointments. Tap on a document row to view or edit details.",
            ),
            Screen::Rx => HeaderConfig::new(
                Some("Prescriptions"),
                Some("Medication List"),
                "Rx Page",
                Some("Use this page to manage prescription medications. Tap a medication to see full details. You can also select medications to include on the ambulance info page."),
            ),
            Screen::Emergency => HeaderConfig::care_page(
                "Ambulance Info",
                "This page stores emergency medical info for first responders. You can edit it anytime, and it also includes current medications and insurance card images.",
            ),
            Screen::Profile => HeaderConfig::new(
                Some("Profile Info"),
                None,
                "Profile Info",
                Some("Your basic information and login details."),
            ),
            Screen::Subscription => HeaderConfig::new(
                Some("Subscription"),
                None,
                "Subscription",
                Some("Subscribe to unlock premium features."),
            ),
            Screen::TeamMembers => HeaderConfig::new(Some("Team Members"), None, "Team Members", None),
            Screen::AboutUs => HeaderConfig::new(
                Some("About Us"),
                None,
                "About Us",
                Some("This page provides insight into the mission and purpose of the app."),
            ),
            Screen::ContactUs => HeaderConfig::new(
                Some("Contact Us"),
                None,
                "Contact Us",
                Some("Use this page to send us questions, feedback, or concerns."),
            ),
        }
    }
}

/// Open/closed state of a screen's help dialog.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HelpDialog {
    config: HeaderConfig,
    open: bool,
}

impl HelpDialog {
    pub fn for_screen(screen: Screen) -> Self {
        HelpDialog {
            config: screen.header(),
            open: false,
        }
    }

    /// Opens the dialog. Screens without help text stay closed.
    pub fn open(&mut self) -> bool {
        self.open = self.config.has_help();
        self.open
    }

    /// "Got it".
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Title and body while open.
    pub fn content(&self) -> Option<(&str, &str)> {
        if !self.open {
            return None;
        }
        self.config
            .help_text
            .as_deref()
            .map(|text| (self.config.help_title.as_str(), text))
    }
}

/// Help dialog title and body as shown to the user.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HelpContent {
    pub title: String,
    pub text: String,
}

thread_local! {
    // The dialog each caller currently has open. Cleared on upgrade.
    static OPEN_DIALOGS: RefCell<HashMap<OwnerId, HelpDialog>> = RefCell::new(HashMap::new());
}

/// Opens `screen`'s help for `owner`, closing whatever dialog they had open.
/// Screens without help text open nothing and return `None`.
pub fn open_help(owner: &str, screen: Screen) -> Option<HelpContent> {
    let mut dialog = HelpDialog::for_screen(screen);
    let opened = dialog.open();
    let content = dialog.content().map(|(title, text)| HelpContent {
        title: title.to_string(),
        text: text.to_string(),
    });
    OPEN_DIALOGS.with(|dialogs| {
        let mut dialogs = dialogs.borrow_mut();
        if opened {
            dialogs.insert(owner.to_string(), dialog);
        } else {
            dialogs.remove(owner);
        }
    });
    content
}

/// Closes `owner`'s dialog, if any.
pub fn close_help(owner: &str) {
    OPEN_DIALOGS.with(|dialogs| {
        if let Some(dialog) = dialogs.borrow_mut().get_mut(owner) {
            dialog.close();
        }
    });
}

pub fn is_help_open(owner: &str) -> bool {
    OPEN_DIALOGS.with(|dialogs| dialogs.borrow().get(owner).is_some_and(HelpDialog::is_open))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_screen_has_a_header() {
        for screen in Screen::ALL {
            let header = screen.header();
            assert!(!header.help_title.is_empty(), "{:?}", screen);
        }
    }

    #[test]
    fn care_pages_share_caption() {
        let header = Screen::Supplies.header();
        assert_eq!(header.title.as_deref(), Some("Taking care of"));
        assert_eq!(header.subtitle.as_deref(), Some("Mom"));
        assert_eq!(header.help_title, "Supplies Page");
    }

    #[test]
    fn help_dialog_opens_and_closes() {
        let mut dialog = HelpDialog::for_screen(Screen::Rx);
        assert!(!dialog.is_open());
        assert!(dialog.open());
        let (title, text) = dialog.content().unwrap();
        assert_eq!(title, "Rx Page");
        assert!(text.contains("ambulance info page"));
        dialog.close();
        assert!(dialog.content().is_none());
    }

    #[test]
    fn screens_without_help_never_open() {
        let mut dialog = HelpDialog::for_screen(Screen::News);
        assert!(!dialog.open());
        assert!(!dialog.is_open());
    }

    #[test]
    fn caller_dialogs_are_independent() {
        let content = open_help("alice", Screen::Rx).unwrap();
        assert_eq!(content.title, "Rx Page");
        assert!(is_help_open("alice"));
        assert!(!is_help_open("bob"));

        assert!(open_help("alice", Screen::News).is_none());
        assert!(!is_help_open("alice"));

        open_help("bob", Screen::Supplies).unwrap();
        close_help("bob");
        close_help("bob");
        assert!(!is_help_open("bob"));
    }
}
