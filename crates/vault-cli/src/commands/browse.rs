//! Line-driven interactive browser over the navigator.

use std::io::{self, BufRead, Write};
use std::path::Path;

use vault_core::api::{MediaUpload, VaultApi};
use vault_core::flows::{create_memory, delete_memory, update_memory, MemoryDraft};
use vault_core::insights::{load_dashboard, Dashboard};
use vault_core::navigator::{Navigator, Screen};
use vault_core::session::{resolve_user_id, SessionToken};
use vault_core::store::EntryStore;
use vault_core::{Entry, EntryId};

use crate::commands::common::{
    find_album, format_album_header, format_album_lines, format_dashboard, format_entry_detail,
    format_entry_lines, parse_entry_id,
};
use crate::error::CliError;
use crate::settings::AppContext;

/// Prompt answer that empties a field.
const CLEAR_ANSWER: &str = "-";

const HELP_LINES: [&str; 14] = [
    "feed              show all memories",
    "albums            list monthly albums",
    "album <n|name>    open an album by number or name",
    "open <id>         show one memory",
    "edit              edit the open memory",
    "add               create a memory",
    "delete            delete the open memory",
    "search <query>    search on the server",
    "clear             leave search results",
    "refresh           refetch all memories",
    "dashboard         mood history and insight",
    "back              go back one screen",
    "help              show this help",
    "quit              leave",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Feed,
    Albums,
    Album(String),
    Open(String),
    Edit,
    Add,
    Delete,
    Search(String),
    Clear,
    Refresh,
    Dashboard,
    Back,
    Help,
    Quit,
}

/// Parse one input line; `Ok(None)` for blank lines.
pub fn parse_browse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let needs_argument = |usage: &str| {
        if rest.is_empty() {
            Err(format!("Usage: {usage}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "feed" | "list" | "home" => BrowseCommand::Feed,
        "albums" => BrowseCommand::Albums,
        "album" => BrowseCommand::Album(needs_argument("album <n|name>")?),
        "open" | "show" => BrowseCommand::Open(needs_argument("open <id>")?),
        "edit" => BrowseCommand::Edit,
        "add" | "new" => BrowseCommand::Add,
        "delete" | "rm" => BrowseCommand::Delete,
        "search" => BrowseCommand::Search(needs_argument("search <query>")?),
        "clear" => BrowseCommand::Clear,
        "refresh" | "reload" => BrowseCommand::Refresh,
        "dashboard" | "insights" => BrowseCommand::Dashboard,
        "back" | "b" => BrowseCommand::Back,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => return Err(format!("Unknown command '{other}'. Type `help`.")),
    };
    Ok(Some(command))
}

/// Commands that would act on the screen the dashboard covers.
const fn acts_on_hidden_screen(command: &BrowseCommand) -> bool {
    matches!(
        command,
        BrowseCommand::Edit
            | BrowseCommand::Add
            | BrowseCommand::Delete
            | BrowseCommand::Clear
            | BrowseCommand::Refresh
    )
}

pub struct Browser<'a, A: ?Sized, R, W> {
    api: &'a A,
    token: SessionToken,
    configured_user_id: Option<u64>,
    store: EntryStore,
    navigator: Navigator,
    dashboard: Option<Dashboard>,
    input: R,
    output: W,
}

impl<'a, A, R, W> Browser<'a, A, R, W>
where
    A: VaultApi + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(
        api: &'a A,
        token: SessionToken,
        configured_user_id: Option<u64>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            api,
            token,
            configured_user_id,
            store: EntryStore::new(),
            navigator: Navigator::new(),
            dashboard: None,
            input,
            output,
        }
    }

    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub const fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Fetch, render, then execute commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<(), CliError> {
        self.refresh().await?;
        self.render()?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            let command = match parse_browse_command(&line) {
                Ok(Some(BrowseCommand::Quit)) => break,
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(self.output, "{message}")?;
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(()) => {}
                Err(CliError::Io(error)) => return Err(CliError::Io(error)),
                Err(error) => writeln!(self.output, "Error: {error}")?,
            }
            self.render()?;
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: BrowseCommand) -> Result<(), CliError> {
        if self.navigator.dashboard_visible() && acts_on_hidden_screen(&command) {
            return Err(CliError::DashboardOpen);
        }

        match command {
            BrowseCommand::Feed => {
                self.navigator.hide_dashboard();
                self.navigator.show_feed()?;
            }
            BrowseCommand::Albums => {
                self.navigator.hide_dashboard();
                self.navigator.show_feed()?;
                let lines = format_album_lines(&self.store.albums());
                self.write_lines(&lines)?;
            }
            BrowseCommand::Album(selector) => {
                let label = self.album_label(&selector)?;
                self.navigator.hide_dashboard();
                self.navigator.open_album(&label)?;
            }
            BrowseCommand::Open(raw_id) => {
                let id = parse_entry_id(&raw_id)?;
                if self.store.find(id).is_none() {
                    return Err(vault_core::Error::NotFound(id.to_string()).into());
                }
                self.navigator.hide_dashboard();
                self.navigator.open_detail(id)?;
            }
            BrowseCommand::Edit => self.edit().await?,
            BrowseCommand::Add => self.add().await?,
            BrowseCommand::Delete => self.delete().await?,
            BrowseCommand::Search(query) => {
                let user_id = resolve_user_id(&self.token, self.configured_user_id)?;
                self.store
                    .search(self.api, &self.token, user_id, &query)
                    .await?;
                self.navigator.hide_dashboard();
                if !matches!(self.navigator.screen(), Screen::Feed) {
                    self.navigator.show_feed()?;
                }
            }
            BrowseCommand::Clear => self.store.clear_search(),
            BrowseCommand::Refresh => self.refresh().await?,
            BrowseCommand::Dashboard => {
                let user_id = resolve_user_id(&self.token, self.configured_user_id)?;
                self.dashboard = Some(load_dashboard(self.api, &self.token, user_id).await?);
                self.navigator.show_dashboard();
            }
            BrowseCommand::Back => self.navigator.back(),
            BrowseCommand::Help => {
                for line in HELP_LINES {
                    writeln!(self.output, "  {line}")?;
                }
            }
            BrowseCommand::Quit => {}
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), CliError> {
        if self.store.fetch_all(self.api, &self.token).await.is_err() {
            let message = self.store.error().unwrap_or("Failed to fetch memories.");
            writeln!(self.output, "{message}")?;
        }
        Ok(())
    }

    async fn add(&mut self) -> Result<(), CliError> {
        self.navigator.begin_add()?;
        let draft = match self.prompt_draft(None) {
            Ok(Some(draft)) => draft,
            Ok(None) => {
                self.navigator.back();
                return Ok(());
            }
            Err(error) => {
                self.navigator.back();
                return Err(error);
            }
        };
        let user_id = match resolve_user_id(&self.token, self.configured_user_id) {
            Ok(user_id) => user_id,
            Err(error) => {
                self.navigator.back();
                return Err(error.into());
            }
        };

        match create_memory(self.api, &self.token, user_id, &mut self.store, &draft).await {
            Ok(created) => {
                self.navigator.finish_add()?;
                writeln!(self.output, "Created memory #{}", created.id)?;
                Ok(())
            }
            Err(error) => {
                self.navigator.back();
                Err(error.into())
            }
        }
    }

    async fn edit(&mut self) -> Result<(), CliError> {
        self.navigator.begin_edit()?;
        let id = self.navigator.current_entry().ok_or(CliError::EmptyEntryId)?;
        let Some(current) = self.store.find(id).cloned() else {
            self.navigator.back();
            return Err(vault_core::Error::NotFound(id.to_string()).into());
        };

        let draft = match self.prompt_draft(Some(&current)) {
            Ok(Some(draft)) => draft,
            Ok(None) => {
                self.navigator.back();
                return Ok(());
            }
            Err(error) => {
                self.navigator.back();
                return Err(error);
            }
        };

        match update_memory(self.api, &self.token, &mut self.store, &current, &draft).await {
            Ok(_) => {
                self.navigator.finish_edit()?;
                writeln!(self.output, "Saved memory #{}", current.id)?;
                Ok(())
            }
            Err(error) => {
                self.navigator.back();
                Err(error.into())
            }
        }
    }

    async fn delete(&mut self) -> Result<(), CliError> {
        let Screen::Detail(id) = *self.navigator.screen() else {
            writeln!(self.output, "Open a memory first.")?;
            return Ok(());
        };
        let title = self
            .store
            .find(id)
            .map(|entry| entry.title.clone())
            .unwrap_or_default();
        let answer = self
            .prompt(&format!("Delete '{title}'? [y/N]"), None)?
            .unwrap_or_default();
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            writeln!(self.output, "Kept.")?;
            return Ok(());
        }

        delete_memory(self.api, &self.token, &mut self.store, id).await?;
        self.navigator.entry_deleted()?;
        writeln!(self.output, "Deleted memory #{id}")?;
        Ok(())
    }

    /// Album label from a 1-based list number or a name.
    fn album_label(&self, selector: &str) -> Result<String, CliError> {
        let albums = self.store.albums();
        if let Ok(number) = selector.trim().parse::<usize>() {
            return albums
                .get(number.wrapping_sub(1))
                .map(|album| album.name.clone())
                .ok_or_else(|| CliError::AlbumNotFound(selector.trim().to_string()));
        }
        Ok(find_album(&albums, selector)?.name.clone())
    }

    /// Ask for the form fields. Blank answers keep the current value when
    /// editing and `-` clears it. `None` when input ends.
    fn prompt_draft(&mut self, current: Option<&Entry>) -> Result<Option<MemoryDraft>, CliError> {
        let mut draft = current.map(MemoryDraft::from_entry).unwrap_or_default();

        let Some(title) = self.prompt("Title", current.map(|_| draft.title.as_str()))? else {
            return Ok(None);
        };
        let Some(content) = self.prompt("Content", current.map(|_| draft.content.as_str()))?
        else {
            return Ok(None);
        };
        let Some(tags) = self.prompt("Tags (- for none)", current.map(|_| draft.tags.as_str()))? else {
            return Ok(None);
        };
        let Some(photo) = self.prompt("Photo path (blank for none)", None)? else {
            return Ok(None);
        };

        draft.title = title;
        draft.content = content;
        draft.tags = tags;
        if !photo.is_empty() {
            draft.photo = Some(MediaUpload::from_path(Path::new(&photo))?);
        }
        Ok(Some(draft))
    }

    fn prompt(&mut self, label: &str, current: Option<&str>) -> io::Result<Option<String>> {
        match current {
            Some(value) if !value.is_empty() => write!(self.output, "{label} [{value}]: ")?,
            _ => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        match answer.trim() {
            "" => Ok(Some(current.unwrap_or_default().to_string())),
            CLEAR_ANSWER => Ok(Some(String::new())),
            answer => Ok(Some(answer.to_string())),
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn render(&mut self) -> io::Result<()> {
        if self.navigator.dashboard_visible() {
            if let Some(dashboard) = &self.dashboard {
                let lines = format_dashboard(dashboard);
                return self.write_lines(&lines);
            }
        }

        let lines = match self.navigator.screen().clone() {
            Screen::Feed => self.feed_lines(),
            Screen::Album(label) => self.album_lines(&label),
            Screen::Detail(id) => self.detail_lines(id),
            Screen::Add | Screen::Edit(_) => Vec::new(),
        };
        self.write_lines(&lines)
    }

    fn feed_lines(&self) -> Vec<String> {
        let entries = self.store.displayed();
        let mut lines = vec![match self.store.search_overlay() {
            Some(overlay) => format!(
                "Search results for '{}' ({}). Type `clear` to return.",
                overlay.query,
                entries.len()
            ),
            None => format!("Memories ({})", entries.len()),
        }];
        if entries.is_empty() {
            lines.push("No memories found.".to_string());
        } else {
            lines.extend(format_entry_lines(entries));
        }
        lines
    }

    fn album_lines(&self, label: &str) -> Vec<String> {
        let albums = self.store.albums();
        match find_album(&albums, label) {
            Ok(album) => {
                let mut lines = format_album_header(album);
                lines.push(String::new());
                lines.extend(format_entry_lines(&album.entries));
                lines
            }
            Err(_) => vec![format!("Album '{label}' has no memories.")],
        }
    }

    fn detail_lines(&self, id: EntryId) -> Vec<String> {
        self.store.find(id).map_or_else(
            || vec![format!("Memory #{id} is no longer available.")],
            format_entry_detail,
        )
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }
}

pub async fn run_browse(ctx: &AppContext) -> Result<(), CliError> {
    let token = ctx.token()?;
    let client = ctx.client()?;
    let configured_user_id = ctx.resolved()?.user_id;
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut browser = Browser::new(
        &client,
        token,
        configured_user_id,
        stdin.lock(),
        stdout.lock(),
    );
    browser.run().await
}
