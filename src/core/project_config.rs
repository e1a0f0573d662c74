//! `Config/` edits: the project identifier in every config file, the URL game
//! name and the game name redirects in the engine defaults file.

use serde::Serialize;
use std::path::Path;

use crate::backup::BackupManager;
use crate::context::ProjectContext;
use crate::defaults::RenamerConfig;
use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::ini::{self, IniDocument, RedirectChanges};
use crate::patcher;
use crate::utils::{io, parser};

const STAGE: &str = "config";

/// What changed in the engine defaults file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDefaultsUpdate {
    pub replaced_lines: usize,
    pub redirects_added: usize,
    pub redirects_updated: usize,
    pub redirects_removed: usize,
    pub written: bool,
}

/// Edit engine defaults content in memory.
///
/// Redirect lines keep their historical names during the substring pass; the
/// redirect upsert is what rewrites them.
pub fn update_engine_defaults_content(
    content: &str,
    from: &str,
    to: &str,
    with_redirects: bool,
) -> (String, EngineDefaultsUpdate) {
    let mut doc = IniDocument::parse(content);
    let replaced_lines = doc.map_lines(ini::is_redirect_line, |line| {
        parser::replace_literal(line, from, to).0
    });

    doc.set_key(ini::URL_SECTION, ini::GAME_NAME_KEY, to);

    let changes = if with_redirects {
        doc.upsert_redirect(from, to)
    } else {
        RedirectChanges::default()
    };

    let update = EngineDefaultsUpdate {
        replaced_lines,
        redirects_added: changes.added,
        redirects_updated: changes.updated,
        redirects_removed: changes.removed,
        written: false,
    };
    (doc.serialize(), update)
}

/// Read, edit and atomically write the engine defaults file in one pass.
pub fn update_engine_defaults(
    path: &Path,
    from: &str,
    to: &str,
    with_redirects: bool,
) -> Result<EngineDefaultsUpdate> {
    let mut update = EngineDefaultsUpdate::default();
    let result = patcher::rewrite_file(path, |content| {
        let (patched, edit) = update_engine_defaults_content(content, from, to, with_redirects);
        update = edit;
        (patched, edit.replaced_lines)
    })?;
    update.written = result.written;
    Ok(update)
}

/// Config stage. A missing `Config/` fails the stage; a missing engine
/// defaults file is a warning.
pub fn run(
    ctx: &ProjectContext,
    backups: &BackupManager,
    config: &RenamerConfig,
    log: &mut EventLog,
) -> Result<()> {
    if !ctx.config_dir.is_dir() {
        return Err(Error::file_not_found(
            "Config directory",
            ctx.config_dir.to_string_lossy(),
        ));
    }

    let from = ctx.config_rename_from();
    let to = ctx.new_project_name.as_str();
    let engine_defaults = ctx.config_dir.join(&config.engine_defaults_file);

    for file in io::list_files(&ctx.config_dir)? {
        backups.backup_file(STAGE, &file, log);
        if file == engine_defaults {
            continue;
        }
        match patcher::patch_file(&file, &[(from, to)]) {
            Ok(result) if result.written => log.success(
                STAGE,
                Some(&file),
                format!("Updated config file ({} replacements)", result.replacements),
            ),
            Ok(_) => log.success(STAGE, Some(&file), "Config file already up to date"),
            Err(err) => log.failure(STAGE, Some(&file), &err),
        }
    }

    if !engine_defaults.is_file() {
        log.warning(
            STAGE,
            Some(&engine_defaults),
            format!("{} does not exist", config.engine_defaults_file),
        );
        return Ok(());
    }

    match update_engine_defaults(&engine_defaults, from, to, ctx.is_source_project) {
        Ok(update) => log.success(
            STAGE,
            Some(&engine_defaults),
            format!(
                "Updated {} (GameName={}, redirects +{} ~{} -{})",
                config.engine_defaults_file,
                to,
                update.redirects_added,
                update.redirects_updated,
                update.redirects_removed
            ),
        ),
        Err(err) => log.failure(STAGE, Some(&engine_defaults), &err),
    }

    Ok(())
}
