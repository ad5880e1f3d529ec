//! `courses save` / `programs save` handlers.

use tabled::Tabled;

use edudash_core::upload::precheck;
use edudash_core::{AssetFile, AssetKind, CoreError, RecordForm, RecordKind, SaveOutcome};

use crate::cli::{GlobalOpts, RecordArgs, RecordCommand, SaveArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    kind: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn form_from(args: &SaveArgs) -> RecordForm {
    RecordForm {
        title: args.title.clone().unwrap_or_default(),
        description: args.description.clone().unwrap_or_default(),
        price: args.price.clone(),
        duration_hours: args.duration_hours.clone(),
        level: args.level.clone(),
    }
}

async fn collect_assets(args: &SaveArgs) -> Result<Vec<AssetFile>, CliError> {
    let mut assets = Vec::new();
    for (kind, path) in [(AssetKind::Image, &args.image), (AssetKind::Video, &args.video)] {
        if let Some(path) = path {
            let file = AssetFile::from_path(kind, path.clone()).await?;
            precheck(&file).map_err(CoreError::from)?;
            assets.push(file);
        }
    }
    Ok(assets)
}

fn outcome_rows(outcome: &SaveOutcome, assets: &[AssetFile]) -> Vec<AssetRow> {
    assets
        .iter()
        .map(|asset| {
            let kind = asset.kind.to_string();
            let result = outcome
                .failed
                .iter()
                .find(|f| f.kind == kind)
                .map_or_else(|| "uploaded".to_owned(), |f| format!("failed: {}", f.message));
            AssetRow {
                kind,
                file: asset.file_name.clone(),
                result,
            }
        })
        .collect()
}

pub async fn handle(
    kind: RecordKind,
    args: RecordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecordCommand::Save(save) => {
            // Reject bad input before asking for a password.
            let form = form_from(&save);
            form.validate().map_err(CoreError::from)?;
            let assets = collect_assets(&save).await?;

            let dashboard = util::connect(global).await?;
            let sp = output::spinner(&format!("Saving {kind} {}", save.id), global.quiet);
            let result = dashboard.save_record(kind, &save.id, &form, &assets).await;
            sp.finish_and_clear();
            dashboard.logout().await;
            let outcome = result?;

            let out = output::render_single(
                &global.output,
                &outcome,
                |o| {
                    if assets.is_empty() {
                        String::new()
                    } else {
                        output::render_table(&outcome_rows(o, &assets))
                    }
                },
                |o| o.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if !global.quiet {
                let mark = if outcome.is_complete() { "✓" } else { "!" };
                eprintln!("{mark} {}", outcome.message());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudash_core::AssetFailure;
    use serde_json::json;

    fn args() -> SaveArgs {
        SaveArgs {
            id: "42".into(),
            title: Some("Intro".into()),
            description: None,
            price: Some("10".into()),
            duration_hours: None,
            level: None,
            image: None,
            video: None,
        }
    }

    #[test]
    fn missing_flags_become_blank_fields() {
        let form = form_from(&args());
        assert_eq!(form.title, "Intro");
        assert!(form.description.is_empty());
        assert!(form.validate().is_err());
    }

    #[test]
    fn rows_mark_failed_assets() {
        let assets = vec![
            AssetFile::with_size(AssetKind::Image, "cover.png".into(), 10),
            AssetFile::with_size(AssetKind::Video, "intro.mp4".into(), 10),
        ];
        let outcome = SaveOutcome {
            kind: "course".into(),
            id: "42".into(),
            record: json!({}),
            uploaded: vec!["image".into()],
            failed: vec![AssetFailure {
                kind: "video".into(),
                file_name: "intro.mp4".into(),
                message: "too large".into(),
            }],
        };
        let rows = outcome_rows(&outcome, &assets);
        assert_eq!(rows[0].result, "uploaded");
        assert_eq!(rows[1].result, "failed: too large");
        assert_eq!(rows[1].file, "intro.mp4");
    }
}
