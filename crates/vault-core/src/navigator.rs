//! Screen navigation of the main view.
//!
//! Navigation is a finite set of screens with one level of history. The
//! selected album survives trips into detail and add so `back()` can return
//! to it. The dashboard is a flag layered over whatever screen is current.

use thiserror::Error;

use crate::models::EntryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Feed,
    Album(String),
    Detail(EntryId),
    Add,
    Edit(EntryId),
}

impl Screen {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Album(_) => "album",
            Self::Detail(_) => "detail",
            Self::Add => "add",
            Self::Edit(_) => "edit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Cannot {action} from the {from} screen")]
    NotAllowed {
        action: &'static str,
        from: &'static str,
    },
    #[error("Album label is empty")]
    EmptyAlbum,
}

/// Current screen plus the album selection and dashboard flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    screen: Screen,
    selected_album: Option<String>,
    dashboard: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            screen: Screen::Feed,
            selected_album: None,
            dashboard: false,
        }
    }

    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn selected_album(&self) -> Option<&str> {
        self.selected_album.as_deref()
    }

    pub const fn dashboard_visible(&self) -> bool {
        self.dashboard
    }

    /// Entry shown by the detail or edit screen.
    pub const fn current_entry(&self) -> Option<EntryId> {
        match self.screen {
            Screen::Detail(id) | Screen::Edit(id) => Some(id),
            _ => None,
        }
    }

    fn deny(&self, action: &'static str) -> NavigationError {
        NavigationError::NotAllowed {
            action,
            from: self.screen.name(),
        }
    }

    /// Feed or the selected album, whichever the user came from.
    fn listing(&self) -> Screen {
        self.selected_album
            .clone()
            .map_or(Screen::Feed, Screen::Album)
    }

    /// Go back to the unfiltered feed and forget the album selection.
    pub fn show_feed(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Feed | Screen::Album(_) | Screen::Detail(_) => {
                self.selected_album = None;
                self.screen = Screen::Feed;
                Ok(())
            }
            Screen::Add | Screen::Edit(_) => Err(self.deny("show the feed")),
        }
    }

    pub fn open_album(&mut self, label: &str) -> Result<(), NavigationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(NavigationError::EmptyAlbum);
        }
        match self.screen {
            Screen::Feed | Screen::Album(_) | Screen::Detail(_) => {
                self.selected_album = Some(label.to_string());
                self.screen = Screen::Album(label.to_string());
                Ok(())
            }
            Screen::Add | Screen::Edit(_) => Err(self.deny("open an album")),
        }
    }

    pub fn open_detail(&mut self, id: EntryId) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Feed | Screen::Album(_) => {
                self.screen = Screen::Detail(id);
                Ok(())
            }
            _ => Err(self.deny("open an entry")),
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Detail(id) => {
                self.screen = Screen::Edit(id);
                Ok(())
            }
            _ => Err(self.deny("edit")),
        }
    }

    pub fn begin_add(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Feed | Screen::Album(_) | Screen::Detail(_) => {
                self.screen = Screen::Add;
                Ok(())
            }
            Screen::Add | Screen::Edit(_) => Err(self.deny("add")),
        }
    }

    /// Return from the edit screen after a successful save.
    pub fn finish_edit(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Edit(id) => {
                self.screen = Screen::Detail(id);
                Ok(())
            }
            _ => Err(self.deny("finish editing")),
        }
    }

    /// Return from the add screen after a successful create.
    pub fn finish_add(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Add => {
                self.screen = self.listing();
                Ok(())
            }
            _ => Err(self.deny("finish adding")),
        }
    }

    /// Leave the detail or edit screen of an entry that no longer exists.
    pub fn entry_deleted(&mut self) -> Result<(), NavigationError> {
        match self.screen {
            Screen::Detail(_) | Screen::Edit(_) => {
                self.screen = self.listing();
                Ok(())
            }
            _ => Err(self.deny("leave a deleted entry")),
        }
    }

    pub fn show_dashboard(&mut self) {
        self.dashboard = true;
    }

    pub fn hide_dashboard(&mut self) {
        self.dashboard = false;
    }

    /// One step back. Hides the dashboard first when it is shown.
    pub fn back(&mut self) {
        if self.dashboard {
            self.dashboard = false;
            return;
        }
        self.screen = match &self.screen {
            Screen::Feed => Screen::Feed,
            Screen::Album(_) => {
                self.selected_album = None;
                Screen::Feed
            }
            Screen::Detail(_) | Screen::Add => self.listing(),
            Screen::Edit(id) => Screen::Detail(*id),
        };
    }
}
