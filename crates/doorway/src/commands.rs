//! Command handlers
//!
//! Every handler works on an injected [`SessionStore`]. Sessions are loaded
//! from the save directory on first use and written back after each action.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use tracing::{debug, info};

use dw_core::{RoomReport, Session, SessionId, SessionOptions, SessionStore};
use dw_render::{PngRenderer, write_png};
use dw_save::{delete_save, list_saves, load_session_for, save_exists, save_session, session_path};

/// Where a command runs
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub session: SessionId,
}

impl Context {
    pub fn new(data_dir: PathBuf, session: SessionId) -> Self {
        Self { data_dir, session }
    }

    pub fn save_path(&self) -> PathBuf {
        session_path(&self.data_dir, &self.session)
    }

    /// Default output path for rendered frames
    pub fn frame_path(&self) -> PathBuf {
        self.save_path().with_extension("png")
    }

    /// Same directory, another session
    pub fn with_session(&self, session: SessionId) -> Self {
        Self::new(self.data_dir.clone(), session)
    }
}

/// Make sure the context's session is in the store, restoring it if saved
pub fn ensure_loaded(store: &mut SessionStore, ctx: &Context) -> Result<()> {
    if store.contains(&ctx.session) {
        return Ok(());
    }
    let path = ctx.save_path();
    if !save_exists(&path) {
        bail!(
            "no game for session {:?}, start one with `doorway new`",
            ctx.session.as_str()
        );
    }
    let snapshot = load_session_for(&path, &ctx.session)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let session = Session::restore(snapshot, None)
        .with_context(|| format!("failed to restore {}", path.display()))?;
    debug!(session = %ctx.session, "restored from disk");
    store.insert(ctx.session.clone(), session);
    Ok(())
}

/// Load the session if it has a save file, otherwise start a new game
///
/// A save that exists but cannot be restored is an error; it is never
/// replaced by a fresh game.
pub fn open_or_create(
    store: &mut SessionStore,
    ctx: &Context,
    options: SessionOptions,
) -> Result<()> {
    if store.contains(&ctx.session) || save_exists(ctx.save_path()) {
        return ensure_loaded(store, ctx);
    }
    new_game(store, ctx, options)?;
    Ok(())
}

/// Write the session to its save file
pub fn persist(store: &SessionStore, ctx: &Context) -> Result<()> {
    let session = store
        .get(&ctx.session)
        .with_context(|| format!("session {:?} is not loaded", ctx.session.as_str()))?;
    std::fs::create_dir_all(&ctx.data_dir)
        .with_context(|| format!("failed to create {}", ctx.data_dir.display()))?;
    save_session(&ctx.session, &session.snapshot(), ctx.save_path())?;
    Ok(())
}

/// Write the last rendered frame of the session
pub fn write_frame(store: &SessionStore, ctx: &Context, out: Option<&Path>) -> Result<PathBuf> {
    let session = store
        .get(&ctx.session)
        .with_context(|| format!("session {:?} is not loaded", ctx.session.as_str()))?;
    let path = out.map_or_else(|| ctx.frame_path(), Path::to_path_buf);
    write_png(session.frame(), &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// `new`: start a game, replacing any existing one for the session
pub fn new_game(
    store: &mut SessionStore,
    ctx: &Context,
    options: SessionOptions,
) -> Result<RoomReport> {
    let session = store.create(ctx.session.clone(), options)?;
    info!(
        session = %ctx.session,
        rooms = session.map().room_count(),
        "dungeon built"
    );
    let report = store.show_map(&ctx.session, &PngRenderer)?;
    persist(store, ctx)?;
    Ok(report)
}

/// `map`: render the current room without moving
pub fn show_map(store: &mut SessionStore, ctx: &Context) -> Result<RoomReport> {
    ensure_loaded(store, ctx)?;
    Ok(store.show_map(&ctx.session, &PngRenderer)?)
}

/// `move`: walk through a connection of the current room
pub fn move_to(store: &mut SessionStore, ctx: &Context, index: usize) -> Result<RoomReport> {
    ensure_loaded(store, ctx)?;
    let report = store.move_to(&ctx.session, index, &PngRenderer);
    // A render failure after a successful move still leaves progress to save.
    persist(store, ctx)?;
    Ok(report?)
}

/// `reveal`: mark every room visited (debugging)
pub fn reveal(store: &mut SessionStore, ctx: &Context) -> Result<RoomReport> {
    ensure_loaded(store, ctx)?;
    if let Some(session) = store.get_mut(&ctx.session) {
        session.reveal_all();
    }
    let report = store.show_map(&ctx.session, &PngRenderer)?;
    persist(store, ctx)?;
    Ok(report)
}

/// `saves`: one line per save file, newest first
pub fn saves(data_dir: &Path) -> Result<Vec<String>> {
    let saves = list_saves(data_dir)
        .with_context(|| format!("failed to list {}", data_dir.display()))?;
    Ok(saves
        .into_iter()
        .map(|(path, header)| {
            format!("{}\t{}\t{}", header.session, header.timestamp, path.display())
        })
        .collect())
}

/// `delete`: remove the save file of the session
pub fn delete(store: &mut SessionStore, ctx: &Context) -> Result<()> {
    store.remove(&ctx.session);
    let path = ctx.save_path();
    delete_save(&path).with_context(|| format!("failed to delete {}", path.display()))?;
    info!(session = %ctx.session, "save deleted");
    Ok(())
}
