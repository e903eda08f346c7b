mod cli;

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;

use slarc::assets::{AssetFetcher, FetchMode};
use slarc::import;
use slarc::output::{self, color::ColorWriter};
use slarc::store;

use cli::{Cli, Commands, WorkspacesCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pool = store::create_store_pool(cli.db_path.clone(), cli.verbose).await?;

    match cli.command {
        Commands::Import {
            archive,
            token,
            proxy_url,
            skip_assets,
        } => {
            let archive_name = archive
                .file_name()
                .and_then(|n| n.to_str())
                .context("Archive path has no file name")?
                .to_string();

            let bytes = tokio::fs::read(&archive)
                .await
                .with_context(|| format!("Failed to read {}", archive.display()))?;

            // The fetch mode is fixed once for the whole run: a configured
            // token routes every fetch through the proxy, otherwise each
            // asset gets a best-effort direct fetch.
            let fetcher = if skip_assets {
                None
            } else {
                let mode = match token {
                    Some(token) => FetchMode::Proxy {
                        base_url: proxy_url,
                        token,
                    },
                    None => FetchMode::Direct,
                };
                Some(AssetFetcher::new(mode)?)
            };

            let report =
                import::run_import(&pool, bytes, &archive_name, fetcher.as_ref(), cli.verbose)
                    .await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "yaml" => println!("{}", serde_yaml::to_string(&report)?),
                _ => {
                    let mut writer = ColorWriter::new(cli.no_color);
                    output::report_formatter::format_import_report(&report, &mut writer)?;
                    print!("{}", writer.into_string()?);
                }
            }
        }
        Commands::Workspaces { command } => match command {
            WorkspacesCommands::List => {
                let mut conn = store::get_connection(&pool).await?;
                let workspaces = store::operations::list_workspaces(&mut conn)?;

                match cli.format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&workspaces)?),
                    "yaml" => println!("{}", serde_yaml::to_string(&workspaces)?),
                    _ => {
                        let mut writer = ColorWriter::new(cli.no_color);
                        output::workspace_formatter::format_workspaces_list(
                            &workspaces,
                            &mut writer,
                        )?;
                        print!("{}", writer.into_string()?);
                    }
                }
            }
            WorkspacesCommands::Delete { id } => {
                let mut conn = store::get_connection(&pool).await?;
                store::operations::delete_workspace(&mut conn, id, cli.verbose)
                    .with_context(|| format!("Failed to delete workspace {}", id))?;
                println!("Deleted workspace {}", id);
            }
        },
        Commands::Channels { workspace } => {
            let mut conn = store::get_connection(&pool).await?;
            let channels = store::operations::get_channels(&mut conn, workspace)?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&channels)?),
                "yaml" => println!("{}", serde_yaml::to_string(&channels)?),
                _ => {
                    let mut writer = ColorWriter::new(cli.no_color);
                    output::channel_formatter::format_channels_list(&channels, &mut writer)?;
                    print!("{}", writer.into_string()?);
                }
            }
        }
        Commands::Users {
            workspace,
            include_deleted,
        } => {
            let mut conn = store::get_connection(&pool).await?;
            let users = store::operations::get_users(&mut conn, workspace, include_deleted)?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&users)?),
                "yaml" => println!("{}", serde_yaml::to_string(&users)?),
                _ => {
                    let mut writer = ColorWriter::new(cli.no_color);
                    output::user_formatter::format_users_list(&users, &mut writer)?;
                    print!("{}", writer.into_string()?);
                }
            }
        }
        Commands::Messages {
            workspace,
            channel,
            limit,
        } => {
            let mut conn = store::get_connection(&pool).await?;

            let channel_name = channel.strip_prefix('#').unwrap_or(&channel);
            let stored_channel =
                store::operations::get_channel_by_name(&mut conn, workspace, channel_name)?
                    .with_context(|| {
                        format!("Channel '{}' not found in workspace {}", channel_name, workspace)
                    })?;

            // Messages join on the channel's origin id, not its local row id.
            let messages = store::operations::get_messages(
                &mut conn,
                workspace,
                &stored_channel.slack_id,
                limit,
            )?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&messages)?),
                "yaml" => println!("{}", serde_yaml::to_string(&messages)?),
                _ => {
                    let users = store::operations::get_users(&mut conn, workspace, true)?;
                    let user_map: HashMap<String, store::models::StoredUser> = users
                        .into_iter()
                        .map(|u| (u.slack_id.clone(), u))
                        .collect();

                    let mut writer = ColorWriter::new(cli.no_color);
                    output::message_formatter::format_messages(
                        &messages,
                        &stored_channel,
                        &user_map,
                        &mut writer,
                    )?;
                    print!("{}", writer.into_string()?);
                }
            }
        }
    }

    Ok(())
}
