use vault_core::store::EntryStore;

use crate::commands::common::{
    find_album, format_album_header, format_album_lines, format_entry_lines, print_lines,
};
use crate::error::CliError;
use crate::settings::AppContext;

async fn fetch_store(ctx: &AppContext) -> Result<EntryStore, CliError> {
    let token = ctx.token()?;
    let client = ctx.client()?;
    let mut store = EntryStore::new();
    store.fetch_all(&client, &token).await?;
    Ok(store)
}

pub async fn run_albums(ctx: &AppContext, as_json: bool) -> Result<(), CliError> {
    let albums = fetch_store(ctx).await?.albums();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&albums)?);
    } else if albums.is_empty() {
        println!("No memories yet.");
    } else {
        print_lines(&format_album_lines(&albums));
    }
    Ok(())
}

pub async fn run_album(ctx: &AppContext, label: &str, as_json: bool) -> Result<(), CliError> {
    let albums = fetch_store(ctx).await?.albums();
    let album = find_album(&albums, label)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(album)?);
    } else {
        print_lines(&format_album_header(album));
        println!();
        print_lines(&format_entry_lines(&album.entries));
    }
    Ok(())
}
